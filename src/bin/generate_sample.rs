//! Writes a handful of synthetic powder patterns as `.xy` files for trying
//! out the viewer.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Generate synthetic .xy diffraction patterns")]
struct Args {
    /// Output directory (created if missing).
    #[arg(default_value = "sample_xy")]
    out_dir: PathBuf,

    /// RNG seed for the noise.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Gaussian peak profile.
fn gaussian(x: f64, center: f64, fwhm: f64, height: f64) -> f64 {
    let sigma = fwhm / 2.354_82;
    height * (-(x - center).powi(2) / (2.0 * sigma * sigma)).exp()
}

/// Deterministic xorshift64* generator.
struct Noise(u64);

impl Noise {
    fn new(seed: u64) -> Self {
        Noise(seed.max(1))
    }

    fn next_f64(&mut self) -> f64 {
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        let v = self.0.wrapping_mul(0x2545_F491_4F6C_DD1D);
        (v >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        std_dev * (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut noise = Noise::new(args.seed);

    // 2θ from 10° to 80° in 0.02° steps.
    let angles: Vec<f64> = (0..=3500).map(|i| 10.0 + i as f64 * 0.02).collect();

    // (name, [(2θ, fwhm, height)])
    let phases: [(&str, &[(f64, f64, f64)]); 3] = [
        ("quartz", &[(20.86, 0.12, 220.0), (26.64, 0.12, 1000.0), (36.54, 0.14, 80.0), (50.14, 0.16, 140.0)]),
        ("calcite", &[(23.06, 0.12, 90.0), (29.41, 0.12, 1000.0), (39.40, 0.14, 180.0), (43.16, 0.15, 150.0), (48.51, 0.16, 170.0)]),
        ("halite", &[(27.37, 0.10, 130.0), (31.70, 0.10, 1000.0), (45.45, 0.12, 550.0), (56.47, 0.14, 150.0)]),
    ];

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    for (name, peaks) in phases {
        let mut text = String::new();
        for &x in &angles {
            let background = 40.0 * (-x / 60.0).exp();
            let signal: f64 = peaks.iter().map(|&(c, w, h)| gaussian(x, c, w, h)).sum();
            let y = (background + signal + noise.gauss(3.0)).max(0.0);
            writeln!(text, "{x:.4} {y:.3}")?;
        }
        let path = args.out_dir.join(format!("{name}.xy"));
        std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        println!("wrote {}", path.display());
    }

    Ok(())
}
