// ---------------------------------------------------------------------------
// Series – one (angle, intensity) pattern from one .xy file
// ---------------------------------------------------------------------------

/// A single diffraction pattern.
///
/// `angle` and `intensity` always have the same length; transforms never
/// reorder points.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Legend label, taken from the source file name.
    pub name: String,
    /// 2θ axis (x).
    pub angle: Vec<f64>,
    /// Intensity axis (y) – same length as `angle`.
    pub intensity: Vec<f64>,
}

impl Series {
    pub fn new(name: impl Into<String>, angle: Vec<f64>, intensity: Vec<f64>) -> Self {
        debug_assert_eq!(angle.len(), intensity.len());
        Series {
            name: name.into(),
            angle,
            intensity,
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.intensity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intensity.is_empty()
    }

    /// True when every intensity is exactly zero (vacuously true when empty).
    pub fn is_all_zero(&self) -> bool {
        self.intensity.iter().all(|&v| v == 0.0)
    }
}

// ---------------------------------------------------------------------------
// Dataset – named series in file-selection order
// ---------------------------------------------------------------------------

/// Series keyed by name. Iteration order is insertion order, which is also
/// the stacking order in the plot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    series: Vec<Series>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a series. A series with the same name is replaced in place,
    /// keeping its original stacking position.
    pub fn insert(&mut self, series: Series) {
        match self.series.iter_mut().find(|s| s.name == series.name) {
            Some(existing) => *existing = series,
            None => self.series.push(series),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Series> {
        self.series.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }

    /// Number of series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl FromIterator<Series> for Dataset {
    fn from_iter<I: IntoIterator<Item = Series>>(iter: I) -> Self {
        let mut dataset = Dataset::new();
        for series in iter {
            dataset.insert(series);
        }
        dataset
    }
}
