#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// Acquire the next surface texture.
///
/// A lost or outdated surface is reconfigured and the frame skipped, as is a
/// timeout. Anything else is returned as an error.
pub fn acquire_frame(
    surface: &wgpu::Surface<'_>,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> Result<Option<wgpu::SurfaceTexture>, RenderError> {
    match surface.get_current_texture() {
        Ok(frame) => Ok(Some(frame)),
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            tracing::debug!("surface lost or outdated, reconfiguring");
            surface.configure(device, config);
            Ok(None)
        }
        Err(wgpu::SurfaceError::Timeout) => {
            tracing::warn!("surface timeout, frame skipped");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
