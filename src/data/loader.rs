use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::{Dataset, Series};

/// Why an `.xy` file could not be turned into a [`Series`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: expected 2 columns, found {found}", path.display())]
    ColumnCount {
        path: PathBuf,
        line: usize,
        found: usize,
    },

    #[error("{}:{line}: '{token}' is not a number", path.display())]
    Number {
        path: PathBuf,
        line: usize,
        token: String,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load every file into one [`Dataset`], in the given order.
///
/// The first bad file aborts the whole load; nothing partial is returned.
pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<Dataset, LoadError> {
    let mut dataset = Dataset::new();
    for path in paths {
        let series = load_xy_file(path.as_ref())?;
        log::debug!("{}: {} points", series.name, series.len());
        dataset.insert(series);
    }
    Ok(dataset)
}

/// Load a single whitespace-delimited two-column `.xy` file.
pub fn load_xy_file(path: &Path) -> Result<Series, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (angle, intensity) = parse_xy(&text, path)?;
    Ok(Series::new(series_name(path), angle, intensity))
}

/// Legend name for a file: the base name up to its first `.`.
///
/// `scan.v2.xy` becomes `scan`.
pub fn series_name(path: &Path) -> String {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match base.split_once('.') {
        Some((head, _)) => head.to_string(),
        None => base,
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse `.xy` text: no header, blank lines ignored, every other line exactly
/// two numbers separated by any whitespace.
///
/// `path` is only used for error messages.
pub fn parse_xy(text: &str, path: &Path) -> Result<(Vec<f64>, Vec<f64>), LoadError> {
    let mut angle = Vec::new();
    let mut intensity = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        if tokens.len() != 2 {
            return Err(LoadError::ColumnCount {
                path: path.to_path_buf(),
                line: line_no,
                found: tokens.len(),
            });
        }
        let parse = |tok: &str| {
            tok.parse::<f64>().map_err(|_| LoadError::Number {
                path: path.to_path_buf(),
                line: line_no,
                token: tok.to_string(),
            })
        };
        angle.push(parse(tokens[0])?);
        intensity.push(parse(tokens[1])?);
    }

    Ok((angle, intensity))
}
