use egui::{Color32, Pos2, Rect, Sense, Stroke, Vec2};
use gridview_tools::{FrameStats, StatsPanel};

const GRAPH_SIZE: Vec2 = Vec2::new(80.0, 30.0);

/// What the overlay draws for one frame, captured before the frame starts.
#[derive(Debug, Clone, Default)]
pub struct StatsView {
    pub panel: StatsPanel,
    pub readout: String,
    pub history: Vec<f32>,
}

impl StatsView {
    pub fn capture(stats: &FrameStats) -> Self {
        Self {
            panel: stats.panel(),
            readout: stats.readout(),
            history: stats.history(),
        }
    }
}

/// Polyline for `samples` scaled into `rect`: oldest on the left, the
/// largest sample touching the top edge.
pub fn graph_points(samples: &[f32], rect: Rect) -> Vec<Pos2> {
    if samples.is_empty() {
        return Vec::new();
    }
    let max = samples.iter().copied().fold(f32::EPSILON, f32::max);
    let step = if samples.len() > 1 {
        rect.width() / (samples.len() - 1) as f32
    } else {
        0.0
    };
    samples
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let y = rect.bottom() - (v / max).clamp(0.0, 1.0) * rect.height();
            Pos2::new(rect.left() + i as f32 * step, y)
        })
        .collect()
}

/// Draw the stats overlay in the top-left corner. Returns true when it was
/// clicked.
pub fn show(ctx: &egui::Context, view: &StatsView) -> bool {
    let color = match view.panel {
        StatsPanel::Fps => Color32::from_rgb(0x00, 0xff, 0xff),
        StatsPanel::Ms => Color32::from_rgb(0x00, 0xff, 0x00),
        StatsPanel::Mb => Color32::from_rgb(0xff, 0x00, 0x88),
    };
    let response = egui::Area::new(egui::Id::new("stats_overlay"))
        .anchor(egui::Align2::LEFT_TOP, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style())
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(&view.readout).monospace().color(color));
                    let (rect, _) = ui.allocate_exact_size(GRAPH_SIZE, Sense::hover());
                    let points = graph_points(&view.history, rect);
                    if points.len() > 1 {
                        ui.painter().add(egui::Shape::line(points, Stroke::new(1.0, color)));
                    }
                })
                .response
                .interact(Sense::click())
        })
        .inner;
    response.clicked()
}
