use super::model::Series;

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

/// Divide every intensity by the series maximum.
///
/// A zero maximum is not special-cased: the result holds `inf`/`NaN`, which
/// the renderer plots (or drops from axis fitting) as-is.
pub fn normalize(mut series: Series) -> Series {
    let max = series
        .intensity
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    for v in &mut series.intensity {
        *v /= max;
    }
    series
}

// ---------------------------------------------------------------------------
// Moving average
// ---------------------------------------------------------------------------

/// Uniform moving average over `window` points, valid positions only.
///
/// * `window == 0` returns the series untouched.
/// * Otherwise the result has `len - window + 1` points and keeps the
///   *first* `len - window + 1` angles, so the curve is left-aligned rather
///   than centred (shifted by `(window - 1) / 2` samples).
/// * `window > len` yields an empty series.
pub fn smooth(mut series: Series, window: usize) -> Series {
    if window == 0 {
        return series;
    }
    let averaged: Vec<f64> = series
        .intensity
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect();

    series.angle.truncate(averaged.len());
    series.intensity = averaged;
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn series(y: &[f64]) -> Series {
        let x = (0..y.len()).map(|i| 10.0 + i as f64).collect();
        Series::new("s", x, y.to_vec())
    }

    #[test]
    fn normalize_scales_max_to_one() {
        let out = normalize(series(&[2.0, 8.0, 4.0, 0.5]));
        let max = out.intensity.iter().copied().fold(f64::MIN, f64::max);
        assert_eq!(max, 1.0);
        assert!(approx(out.intensity[0], 0.25));
        assert!(approx(out.intensity[3], 0.0625));
        assert_eq!(out.angle, vec![10.0, 11.0, 12.0, 13.0]);
    }

    #[test]
    fn normalize_with_zero_max_is_non_finite() {
        let out = normalize(series(&[0.0, -1.0, 0.0]));
        assert!(out.intensity[0].is_nan());
        assert_eq!(out.intensity[1], f64::NEG_INFINITY);
    }

    #[test]
    fn normalize_empty_is_empty() {
        assert!(normalize(series(&[])).is_empty());
    }

    #[test]
    fn window_zero_is_identity() {
        let input = series(&[1.0, 5.0, 3.0]);
        assert_eq!(smooth(input.clone(), 0), input);
    }

    #[test]
    fn valid_window_trims_and_left_aligns() {
        let out = smooth(series(&[1.0, 2.0, 1.0, 4.0, 2.0]), 3);
        assert_eq!(out.len(), 3);
        assert_eq!(out.angle, vec![10.0, 11.0, 12.0]);
        assert!(approx(out.intensity[0], 4.0 / 3.0));
        assert!(approx(out.intensity[1], 7.0 / 3.0));
        assert!(approx(out.intensity[2], 7.0 / 3.0));
    }

    #[test]
    fn window_equal_to_length_gives_one_point() {
        let out = smooth(series(&[1.0, 2.0, 3.0]), 3);
        assert_eq!(out.angle, vec![10.0]);
        assert!(approx(out.intensity[0], 2.0));
    }

    #[test]
    fn window_of_one_keeps_every_point() {
        let input = series(&[3.0, 1.0]);
        assert_eq!(smooth(input.clone(), 1), input);
    }

    #[test]
    fn window_longer_than_series_is_empty() {
        let out = smooth(series(&[1.0, 2.0]), 5);
        assert!(out.is_empty());
        assert!(out.angle.is_empty());
        assert!(out.is_all_zero());
    }
}
