use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Grey used for axis frames and the legend border.
pub const FRAME_GREY: Color32 = Color32::from_rgb(128, 128, 128);

// ---------------------------------------------------------------------------
// Trace palette
// ---------------------------------------------------------------------------

/// `n` distinct line colours with evenly spaced hues, starting at blue so a
/// single trace looks like a conventional pattern plot.
pub fn trace_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (220.0 + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.70, 0.45);
            let rgb: Srgb = hsl.into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(trace_palette(0).is_empty());
        assert_eq!(trace_palette(7).len(), 7);
    }

    #[test]
    fn palette_colours_are_distinct() {
        let colours = trace_palette(5);
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
