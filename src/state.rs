use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::data::loader::load_files;
use crate::data::model::Dataset;
use crate::export::{self, ExportFormat};
use crate::figure::{build_figure, Figure};

// ---------------------------------------------------------------------------
// Control bounds and defaults
// ---------------------------------------------------------------------------

pub const OFFSET_RANGE: RangeInclusive<f64> = 0.0..=1.2;
pub const OFFSET_STEP: f64 = 0.01;
pub const WINDOW_RANGE: RangeInclusive<usize> = 0..=100;
pub const ANGLE_BOUNDS: RangeInclusive<f64> = 0.0..=130.0;
pub const EXPORT_SIZE_RANGE: RangeInclusive<u32> = 100..=2000;
pub const EXPORT_SIZE_STEP: f64 = 10.0;

/// Pixel multiplier applied when saving.
pub const EXPORT_SCALE: u32 = 6;

// ---------------------------------------------------------------------------
// Control state
// ---------------------------------------------------------------------------

/// Values of the five controls. Read by the renderer on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    /// Vertical distance between consecutive drawn traces.
    pub offset: f64,
    /// Moving-average window; 0 disables smoothing.
    pub window: usize,
    /// Visible 2θ range, `x_range.0 <= x_range.1`.
    pub x_range: (f64, f64),
    pub export_width: u32,
    pub export_height: u32,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            offset: 1.1,
            window: 3,
            x_range: (20.0, 60.0),
            export_width: 500,
            export_height: 400,
        }
    }
}

impl ControlState {
    /// Pull every value back inside its control's bounds.
    pub fn clamped(self) -> Self {
        let (a, b) = self.x_range;
        let lo = a.min(b).clamp(*ANGLE_BOUNDS.start(), *ANGLE_BOUNDS.end());
        let hi = a.max(b).clamp(*ANGLE_BOUNDS.start(), *ANGLE_BOUNDS.end());
        Self {
            offset: self.offset.clamp(*OFFSET_RANGE.start(), *OFFSET_RANGE.end()),
            window: self.window.clamp(*WINDOW_RANGE.start(), *WINDOW_RANGE.end()),
            x_range: (lo, hi),
            export_width: self
                .export_width
                .clamp(*EXPORT_SIZE_RANGE.start(), *EXPORT_SIZE_RANGE.end()),
            export_height: self
                .export_height
                .clamp(*EXPORT_SIZE_RANGE.start(), *EXPORT_SIZE_RANGE.end()),
        }
    }

    /// Pixel size of saved images.
    pub fn export_size(&self) -> (u32, u32) {
        (
            self.export_width * EXPORT_SCALE,
            self.export_height * EXPORT_SCALE,
        )
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded series, in file-selection order.
    pub dataset: Dataset,

    /// Current control values.
    pub controls: ControlState,

    /// Most recently built figure; replaced on every render.
    pub figure: Option<Figure>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Take ownership of a dataset and draw the first figure.
    pub fn new(dataset: Dataset, controls: ControlState) -> Self {
        let mut state = Self {
            dataset,
            controls,
            figure: None,
            status_message: None,
        };
        state.render();
        state
    }

    /// Rebuild the figure from the dataset and controls.
    pub fn render(&mut self) {
        self.figure = Some(build_figure(&self.dataset, &self.controls));
    }

    /// Replace the dataset with freshly loaded files and re-render.
    /// On failure the current dataset is kept.
    pub fn load(&mut self, paths: &[PathBuf]) -> Result<()> {
        let dataset = load_files(paths).context("loading .xy files")?;
        log::info!("Loaded {} series: {:?}", dataset.len(), dataset.names());
        self.dataset = dataset;
        self.status_message = None;
        self.render();
        Ok(())
    }

    /// Write the current figure to `path` at the export scale.
    ///
    /// Returns `Ok(false)` without touching the disk when nothing has been
    /// rendered yet.
    pub fn save(&self, path: &Path) -> Result<bool> {
        let Some(figure) = &self.figure else {
            return Ok(false);
        };
        let path = export::with_default_extension(path);
        let format = ExportFormat::from_path(&path)?;
        log::debug!(
            "exporting {format:?} at {:?} px",
            self.controls.export_size()
        );
        export::save_figure(
            figure,
            &path,
            format,
            self.controls.export_width,
            self.controls.export_height,
            EXPORT_SCALE,
        )
        .with_context(|| format!("saving plot to {}", path.display()))?;
        Ok(true)
    }

    /// Save-button handler: no path (dialog cancelled) is a no-op.
    pub fn save_to(&mut self, path: Option<PathBuf>) {
        let Some(path) = path else {
            return;
        };
        match self.save(&path) {
            Ok(true) => self.status_message = None,
            Ok(false) => {}
            Err(e) => {
                log::error!("Failed to save plot: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Series;

    fn dataset() -> Dataset {
        let rows = [(0.0, 1.0), (1.0, 2.0), (2.0, 1.0), (3.0, 4.0), (4.0, 2.0)];
        ["A", "B"]
            .into_iter()
            .map(|name| {
                Series::new(
                    name,
                    rows.iter().map(|r| r.0).collect(),
                    rows.iter().map(|r| r.1).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn defaults_match_control_panel() {
        let c = ControlState::default();
        assert_eq!(c.offset, 1.1);
        assert_eq!(c.window, 3);
        assert_eq!(c.x_range, (20.0, 60.0));
        assert_eq!((c.export_width, c.export_height), (500, 400));
        assert_eq!(c.export_size(), (3000, 2400));
        assert_eq!(c.clone().clamped(), c);
    }

    #[test]
    fn clamping_pulls_values_into_bounds() {
        let c = ControlState {
            offset: 5.0,
            window: 500,
            x_range: (200.0, -3.0),
            export_width: 10,
            export_height: 9000,
        }
        .clamped();
        assert_eq!(c.offset, 1.2);
        assert_eq!(c.window, 100);
        assert_eq!(c.x_range, (0.0, 130.0));
        assert_eq!((c.export_width, c.export_height), (100, 2000));
    }

    #[test]
    fn new_state_renders_immediately() {
        let state = AppState::new(dataset(), ControlState::default());
        assert_eq!(state.figure.as_ref().map(|f| f.traces.len()), Some(2));
    }

    #[test]
    fn render_replaces_figure_without_touching_the_old_one() {
        let mut state = AppState::new(dataset(), ControlState::default());
        let before = state.figure.clone().unwrap();

        state.controls.offset = 0.5;
        state.render();

        let after = state.figure.as_ref().unwrap();
        assert_ne!(&before, after);
        assert!((before.traces[1].offset - 1.15).abs() < 1e-9);
        assert!((after.traces[1].offset - 0.55).abs() < 1e-9);
    }

    #[test]
    fn save_without_figure_is_a_noop() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("plot.png");
        let mut state = AppState::new(dataset(), ControlState::default());
        state.figure = None;

        assert!(!state.save(&path).expect("save"));
        assert!(!path.exists());
    }

    #[test]
    fn cancelled_save_dialog_is_a_noop() {
        let mut state = AppState::new(dataset(), ControlState::default());
        state.save_to(None);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn unsupported_extension_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = AppState::new(dataset(), ControlState::default());
        state.save_to(Some(dir.path().join("plot.jpg")));
        assert!(state.status_message.is_some());
        assert!(!dir.path().join("plot.jpg").exists());
    }

    #[test]
    fn failed_reload_keeps_previous_dataset() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bad = dir.path().join("bad.xy");
        std::fs::write(&bad, "1 2 3\n").unwrap();

        let mut state = AppState::new(dataset(), ControlState::default());
        assert!(state.load(&[bad]).is_err());
        assert_eq!(state.dataset.names(), vec!["A", "B"]);
    }

    #[test]
    fn reload_replaces_dataset_and_rerenders() {
        let dir = tempfile::tempdir().expect("tempdir");
        let c = dir.path().join("C.xy");
        std::fs::write(&c, "10 1\n11 3\n12 2\n13 5\n").unwrap();

        let mut state = AppState::new(dataset(), ControlState::default());
        state.load(&[c]).expect("load");
        assert_eq!(state.dataset.names(), vec!["C"]);
        let fig = state.figure.as_ref().unwrap();
        assert_eq!(fig.traces.len(), 1);
        assert_eq!(fig.traces[0].name, "C");
    }
}
