use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, Slider, Ui};

use crate::export::ExportFormat;
use crate::state::{
    AppState, ANGLE_BOUNDS, EXPORT_SIZE_RANGE, EXPORT_SIZE_STEP, OFFSET_RANGE, OFFSET_STEP,
    WINDOW_RANGE,
};

// ---------------------------------------------------------------------------
// Left side panel – plot controls
// ---------------------------------------------------------------------------

/// Render the control sliders. Returns `true` when any value changed.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) -> bool {
    let controls = &mut state.controls;
    let mut changed = false;

    ui.heading("Plot");
    ui.separator();

    changed |= ui
        .add(
            Slider::new(&mut controls.offset, OFFSET_RANGE)
                .step_by(OFFSET_STEP)
                .text("Y Offset"),
        )
        .changed();
    changed |= ui
        .add(Slider::new(&mut controls.window, WINDOW_RANGE).text("Moving Avg"))
        .changed();

    ui.add_space(6.0);
    ui.strong("X Range");
    let (mut lo, mut hi) = controls.x_range;
    let lo_changed = ui
        .add(Slider::new(&mut lo, ANGLE_BOUNDS).step_by(1.0).text("from"))
        .changed();
    let hi_changed = ui
        .add(Slider::new(&mut hi, ANGLE_BOUNDS).step_by(1.0).text("to"))
        .changed();
    // Dragging one end past the other pushes the other along.
    if lo_changed {
        hi = hi.max(lo);
    }
    if hi_changed {
        lo = lo.min(hi);
    }
    if lo_changed || hi_changed {
        controls.x_range = (lo, hi);
        changed = true;
    }

    ui.add_space(6.0);
    ui.heading("Export");
    ui.separator();

    changed |= ui
        .add(
            Slider::new(&mut controls.export_width, EXPORT_SIZE_RANGE)
                .step_by(EXPORT_SIZE_STEP)
                .text("Export Width"),
        )
        .changed();
    changed |= ui
        .add(
            Slider::new(&mut controls.export_height, EXPORT_SIZE_RANGE)
                .step_by(EXPORT_SIZE_STEP)
                .text("Export Height"),
        )
        .changed();

    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_files(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if ui.button("Save Plot").clicked() {
            let path = save_file_dialog();
            state.save_to(path);
        }

        ui.separator();

        let drawn = state.figure.as_ref().map_or(0, |f| f.traces.len());
        ui.label(format!(
            "{} series loaded, {} drawn",
            state.dataset.len(),
            drawn
        ));

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

/// Multi-select dialog for `.xy` files. `None` when cancelled.
pub fn pick_xy_files() -> Option<Vec<PathBuf>> {
    rfd::FileDialog::new()
        .set_title("Select .xy Data Files")
        .add_filter("XY Files", &["xy"])
        .pick_files()
        .filter(|paths| !paths.is_empty())
}

/// Save dialog restricted to the export formats, PNG first.
fn save_file_dialog() -> Option<PathBuf> {
    ExportFormat::ALL
        .into_iter()
        .fold(rfd::FileDialog::new().set_title("Save plot"), |dialog, f| {
            dialog.add_filter(f.filter_name(), &[f.extension()])
        })
        .set_file_name("plot.png")
        .save_file()
}

fn open_files(state: &mut AppState) {
    let Some(paths) = pick_xy_files() else {
        return;
    };
    if let Err(e) = state.load(&paths) {
        log::error!("Failed to load files: {e:#}");
        state.status_message = Some(format!("Error: {e:#}"));
    }
}
