use eframe::egui::{self, Stroke, Ui};
use egui_plot::{Corner, Legend, Line, Plot, PlotBounds, PlotPoints};

use crate::color::FRAME_GREY;
use crate::figure::{Figure, FRAME_WIDTH, X_TITLE};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Stacked pattern plot (central panel)
// ---------------------------------------------------------------------------

/// Render the current figure in the central panel, at its export size.
pub fn stacked_plot(ui: &mut Ui, state: &AppState) {
    let Some(figure) = &state.figure else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open .xy files to plot  (File → Open…)");
        });
        return;
    };

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::Frame::new()
                .stroke(Stroke::new(FRAME_WIDTH as f32, FRAME_GREY))
                .show(ui, |ui: &mut Ui| figure_plot(ui, figure));
        });
}

fn figure_plot(ui: &mut Ui, figure: &Figure) {
    let layout = &figure.layout;
    let (x0, x1) = layout.x_range;
    let x1 = if x1 > x0 { x1 } else { x0 + 1.0 };
    let (y0, y1) = layout.y_range;

    Plot::new("stacked_plot")
        .width(layout.width as f32)
        .height(layout.height as f32)
        .legend(
            Legend::default()
                .position(Corner::RightTop)
                .background_alpha(1.0),
        )
        .x_axis_label(X_TITLE)
        .show_axes([true, false])
        .show_grid(false)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_double_click_reset(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([x0, y0], [x1, y1]));

            for trace in &figure.traces {
                let points: PlotPoints = trace
                    .points()
                    .filter(|(_, y)| y.is_finite())
                    .map(|(x, y)| [x, y])
                    .collect();

                let line = Line::new(points)
                    .name(&trace.name)
                    .color(trace.color)
                    .width(1.5);

                plot_ui.line(line);
            }
        });
}
