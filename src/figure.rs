use eframe::egui::Color32;

use crate::color::trace_palette;
use crate::data::model::{Dataset, Series};
use crate::data::transform::{normalize, smooth};
use crate::state::ControlState;

/// Vertical position of the first drawn trace.
pub const BASE_OFFSET: f64 = 0.05;

/// Angle axis title.
pub const X_TITLE: &str = "2θ";

/// Frame line width around the plotting area, in pixels.
pub const FRAME_WIDTH: u32 = 2;

/// Legend inset from the top-right corner, as a fraction of the plot size.
pub const LEGEND_INSET: f64 = 0.02;

/// Plot margins in pixels: left, right, top, bottom.
pub const MARGIN: (u32, u32, u32, u32) = (0, 40, 0, 0);

// ---------------------------------------------------------------------------
// Figure – a fully resolved, immutable picture description
// ---------------------------------------------------------------------------

/// One drawn line. `intensity` already includes `offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub name: String,
    pub angle: Vec<f64>,
    pub intensity: Vec<f64>,
    pub offset: f64,
    pub color: Color32,
}

impl Trace {
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.angle.iter().copied().zip(self.intensity.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Visible angle range, independent of the data.
    pub x_range: (f64, f64),
    /// Intensity range fitted to the drawn traces.
    pub y_range: (f64, f64),
    /// Canvas size in pixels (before export scaling).
    pub width: u32,
    pub height: u32,
}

/// Rebuilt from scratch on every control change and never edited afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub traces: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.name == name)
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Build the stacked figure for the current controls.
///
/// Each series is normalised and smoothed in dataset order. A series whose
/// smoothed intensities are all exactly zero is left out and does not
/// advance the stacking offset.
pub fn build_figure(dataset: &Dataset, controls: &ControlState) -> Figure {
    let mut cumulative_offset = BASE_OFFSET;
    let mut stacked: Vec<(Series, f64)> = Vec::with_capacity(dataset.len());

    for series in dataset.iter() {
        let mut smoothed = smooth(normalize(series.clone()), controls.window);
        if smoothed.is_all_zero() {
            log::debug!("skipping '{}': all intensities are zero", smoothed.name);
            continue;
        }
        let offset = cumulative_offset;
        cumulative_offset += controls.offset;
        for v in &mut smoothed.intensity {
            *v += offset;
        }
        stacked.push((smoothed, offset));
    }

    let palette = trace_palette(stacked.len());
    let traces: Vec<Trace> = stacked
        .into_iter()
        .zip(palette)
        .map(|((series, offset), color)| Trace {
            name: series.name,
            angle: series.angle,
            intensity: series.intensity,
            offset,
            color,
        })
        .collect();

    let layout = Layout {
        x_range: controls.x_range,
        y_range: fit_y_range(&traces),
        width: controls.export_width,
        height: controls.export_height,
    };
    log::debug!("rendered {} of {} series", traces.len(), dataset.len());

    Figure { traces, layout }
}

/// Span of all finite intensities plus 5% padding; `[0, 1]` when there are none.
fn fit_y_range(traces: &[Trace]) -> (f64, f64) {
    let (lo, hi) = traces
        .iter()
        .flat_map(|t| t.intensity.iter().copied())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    let pad = if span > 0.0 { span * 0.05 } else { 0.5 };
    (lo - pad, hi + pad)
}
