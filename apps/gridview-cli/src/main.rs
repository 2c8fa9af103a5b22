use clap::{Parser, Subcommand};
use glam::{UVec2, Vec2, Vec3};
use gridview_common::EntityId;
use gridview_driver::{
    AnimationDriver, DriverConfig, FrameOutcome, FrameTarget, ManualClock, ManualScheduler,
};
use gridview_interact::{HoverMotion, Interactables, PointerPicker};
use gridview_render::{
    DebugTextRenderer, GridCommand, GridConfig, GridSettings, Renderer, ViewCamera,
};
use gridview_scene::{Node, Scene};
use gridview_tools::{FrameStats, SceneInspector, StatsPanel};
use std::convert::Infallible;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gridview-cli", about = "Headless grid viewer tools")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default settings
    Info,
    /// Drive the hover animation with a fixed frame time
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Frame time in milliseconds
        #[arg(long, default_value = "16")]
        dt_ms: u64,
        /// Frames the pointer stays over the cube before leaving it
        #[arg(long, default_value = "30")]
        hover_frames: u64,
        /// Hover easing rate per second
        #[arg(long, default_value = "5")]
        rate: f32,
        /// Primary grid spacing applied before the first frame
        #[arg(long)]
        primary_size: Option<f32>,
        /// Print the debug render of the last frame
        #[arg(long)]
        dump: bool,
    },
    /// Report which nodes lie under a pixel
    Pick {
        x: f32,
        y: f32,
        #[arg(long, default_value = "1280")]
        width: u32,
        #[arg(long, default_value = "720")]
        height: u32,
    },
}

/// The single-cube demo scene.
struct Demo {
    scene: Scene,
    interactables: Interactables,
    camera: ViewCamera,
    grid: GridSettings,
    cube: EntityId,
}

impl Demo {
    fn new(motion: HoverMotion, viewport: UVec2) -> Self {
        let mut scene = Scene::new();
        let cube = scene.add(Node::cube(Vec3::ZERO, [1.0, 0.0, 0.0, 1.0]));
        let mut interactables = Interactables::new(motion);
        interactables.register(cube, &scene);
        let mut camera = ViewCamera::default();
        camera.set_viewport(viewport.x, viewport.y);
        Self {
            scene,
            interactables,
            camera,
            grid: GridSettings::new(GridConfig::default()),
            cube,
        }
    }
}

/// Headless frame target: updates the demo and renders it to text.
struct HeadlessFrame<'a> {
    demo: &'a mut Demo,
    renderer: DebugTextRenderer,
    last: String,
}

impl FrameTarget for HeadlessFrame<'_> {
    type Error = Infallible;

    fn update(&mut self, delta: f32) {
        self.demo.grid.apply_pending();
        self.demo
            .interactables
            .update_all(delta, &mut self.demo.scene);
    }

    fn render(&mut self) -> Result<(), Infallible> {
        self.last = self
            .renderer
            .render(&self.demo.scene, self.demo.grid.config(), &self.demo.camera);
        Ok(())
    }
}

/// Parameters of a headless hover run.
struct Simulation {
    frames: u64,
    dt: Duration,
    hover_frames: u64,
    rate: f32,
    primary_size: Option<f32>,
}

/// State left behind by a finished headless run.
struct SimulationResult {
    demo: Demo,
    frames: u64,
    render_time: String,
    last_render: String,
}

impl SimulationResult {
    fn cube_offset(&self) -> f32 {
        self.demo
            .interactables
            .get(self.demo.cube)
            .map(|i| i.current_offset())
            .unwrap_or_default()
    }
}

fn run_simulation(sim: &Simulation) -> anyhow::Result<SimulationResult> {
    anyhow::ensure!(
        sim.rate.is_finite() && sim.rate >= 0.0,
        "--rate must be a finite number >= 0, got {}",
        sim.rate
    );

    let viewport = UVec2::new(1280, 720);
    let motion = HoverMotion {
        rate: sim.rate,
        ..HoverMotion::default()
    };
    let mut demo = Demo::new(motion, viewport);
    if let Some(size) = sim.primary_size {
        demo.grid.submit(GridCommand::SetPrimarySize(size))?;
    }

    let mut picker = PointerPicker::new();
    let mut driver = AnimationDriver::new(
        ManualScheduler::new(),
        ManualClock::new(),
        DriverConfig::default(),
    );
    let mut stats = FrameStats::with_clock(ManualClock::new(), StatsPanel::Ms);
    let mut target = HeadlessFrame {
        demo: &mut demo,
        renderer: DebugTextRenderer::new(),
        last: String::new(),
    };

    let mut pointer: Option<Vec2> = None;
    driver.start();
    while driver.scheduler_mut().take_request() {
        let frame = driver.frames();
        if frame >= sim.frames {
            driver.stop();
            break;
        }
        // Pointer sits on the cube's center, then moves to the corner.
        let pixel = if frame < sim.hover_frames {
            viewport.as_vec2() / 2.0
        } else {
            Vec2::ZERO
        };
        // Hover is re-evaluated on pointer motion only, as in the viewer.
        if pointer != Some(pixel) {
            pointer = Some(pixel);
            picker.on_pointer_move(pixel, viewport);
            picker.pick(
                &target.demo.camera,
                &target.demo.scene,
                &mut target.demo.interactables,
            );
        }

        driver.clock_mut().advance(sim.dt);
        stats.clock_mut().advance(sim.dt);
        match driver.step(&mut target, &mut stats)? {
            FrameOutcome::Rendered { frame, delta } => {
                let offset = target
                    .demo
                    .interactables
                    .get(target.demo.cube)
                    .map(|i| i.current_offset())
                    .unwrap_or_default();
                tracing::debug!(frame, delta, offset, "frame");
            }
            FrameOutcome::Stopped => break,
        }
    }

    let last_render = std::mem::take(&mut target.last);
    let render_time = format!(
        "{} avg {:.1} ms",
        stats.readout(),
        stats.render_times().average().as_secs_f32() * 1000.0
    );
    Ok(SimulationResult {
        demo,
        frames: driver.frames(),
        render_time,
        last_render,
    })
}

fn simulate(sim: &Simulation, dump: bool) -> anyhow::Result<()> {
    let result = run_simulation(sim)?;
    let demo = &result.demo;

    let summary = SceneInspector::summary(&demo.scene, &demo.interactables);
    println!(
        "Simulated {} frames at {} ms",
        result.frames,
        sim.dt.as_millis()
    );
    println!("{summary}");
    for info in SceneInspector::list(&demo.scene, &demo.interactables) {
        println!("  {info}");
    }
    println!("Cube offset: {:.3}", result.cube_offset());
    println!("Grid primary size: {}", demo.grid.config().primary_size);
    println!("Render time: {}", result.render_time);
    if dump {
        print!("{}", result.last_render);
    }
    Ok(())
}

fn pick(x: f32, y: f32, viewport: UVec2) {
    let mut demo = Demo::new(HoverMotion::default(), viewport);
    let mut picker = PointerPicker::new();
    let ndc = picker.on_pointer_move(Vec2::new(x, y), viewport);
    let hits = picker.pick(&demo.camera, &demo.scene, &mut demo.interactables);

    println!("Pointer ({x}, {y}) -> ndc ({:.3}, {:.3})", ndc.x, ndc.y);
    if hits.is_empty() {
        println!("No hits");
    }
    for hit in hits {
        println!(
            "  hit [{}] distance={:.3} point=({:.3}, {:.3}, {:.3})",
            hit.id.short(),
            hit.distance,
            hit.point.x,
            hit.point.y,
            hit.point.z
        );
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let grid = GridConfig::default();
            let motion = HoverMotion::default();
            println!("gridview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "hover: raised={} rest={} rate={}/s",
                motion.raised_offset, motion.rest_offset, motion.rate
            );
            println!(
                "grid: visible={} color=#{:02x}{:02x}{:02x} primary={} secondary={}",
                grid.visible,
                grid.color[0],
                grid.color[1],
                grid.color[2],
                grid.primary_size,
                grid.secondary_size
            );
            println!(
                "driver: max_delta={} ms",
                DriverConfig::default().max_delta.as_millis()
            );
        }
        Commands::Simulate {
            frames,
            dt_ms,
            hover_frames,
            rate,
            primary_size,
            dump,
        } => simulate(
            &Simulation {
                frames,
                dt: Duration::from_millis(dt_ms),
                hover_frames,
                rate,
                primary_size,
            },
            dump,
        )?,
        Commands::Pick {
            x,
            y,
            width,
            height,
        } => pick(x, y, UVec2::new(width, height)),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim(frames: u64, hover_frames: u64) -> Simulation {
        Simulation {
            frames,
            dt: Duration::from_millis(16),
            hover_frames,
            rate: 5.0,
            primary_size: None,
        }
    }

    #[test]
    fn held_pointer_raises_cube_toward_target() {
        let result = run_simulation(&sim(120, 120)).unwrap();
        assert_eq!(result.frames, 120);
        let cube = result.demo.interactables.get(result.demo.cube).unwrap();
        assert!(cube.hovered());
        let offset = result.cube_offset();
        assert!((offset - 2.0).abs() < 0.01, "offset {offset}");
    }

    #[test]
    fn rising_cube_stays_hovered() {
        let mut last = 0.0;
        for frames in [10, 20, 30, 40] {
            let result = run_simulation(&sim(frames, frames)).unwrap();
            let offset = result.cube_offset();
            assert!(offset > last, "offset {offset} after {frames} frames");
            last = offset;
        }
        assert!(last > 1.5, "offset {last}");
    }

    #[test]
    fn leaving_pointer_lowers_cube() {
        let result = run_simulation(&sim(120, 30)).unwrap();
        let cube = result.demo.interactables.get(result.demo.cube).unwrap();
        assert!(!cube.hovered());
        assert!(result.cube_offset() < 0.1, "offset {}", result.cube_offset());
    }

    #[test]
    fn rejects_non_finite_rate() {
        let mut bad = sim(10, 10);
        bad.rate = f32::NAN;
        assert!(run_simulation(&bad).is_err());
        bad.rate = -1.0;
        assert!(run_simulation(&bad).is_err());
    }

    #[test]
    fn primary_size_applies_before_first_frame() {
        let mut with_size = sim(1, 1);
        with_size.primary_size = Some(5.0);
        let result = run_simulation(&with_size).unwrap();
        assert_eq!(result.demo.grid.config().primary_size, 5.0);
        assert!(result.last_render.contains("primary=5.0"));
    }
}
