//! Texture demo: GLCM statistics on a synthetic gray-level image
//!
//! Generates a 120x120 image quantized to 8 gray levels with:
//! - A smooth left half (horizontal ramp, slowly varying)
//! - A noisy right half (pseudo-random levels from an LCG)
//! - A small hole of missing cells (NaN) in the noisy half
//!
//! Then computes every statistic in the registry for a 5x5 window shifted one
//! cell to the right and prints per-layer summaries, once for each
//! missing-value policy.
//!
//! Run:
//!   cargo run -p glcmkit-algorithms --example texture_demo [-- --verbose]

use glcmkit_algorithms::texture::{calc_texture, NaPolicy, Statistic, TextureParams};
use glcmkit_core::Raster;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const ROWS: usize = 120;
const COLS: usize = 120;
const N_GREY: usize = 8;

fn main() {
    let verbose = std::env::args().any(|a| a == "-v" || a == "--verbose");
    setup_logging(verbose);

    let input = build_synthetic_image();
    let stats = input.statistics();
    info!(
        "Synthetic image: {}x{}, {} valid cells, {} missing",
        COLS, ROWS, stats.valid_count, stats.nodata_count
    );

    for policy in [NaPolicy::Ignore, NaPolicy::Center, NaPolicy::Any] {
        let params = TextureParams {
            n_grey: N_GREY,
            window: (5, 5),
            shift: (0, 1),
            statistics: Statistic::ALL.to_vec(),
            na_policy: policy,
            na_val: f64::NAN,
            ..Default::default()
        };

        let textures = calc_texture(&input, &params).expect("texture computation failed");
        println!("\n--- na_opt = {:?} ---", policy);
        for (idx, stat) in textures.statistics().iter().enumerate() {
            let layer = textures.layer(idx).expect("layer index in range");
            print_stats(stat.name(), &layer);
        }

        compare_halves(&textures.layer_by(Statistic::Contrast).expect("contrast requested"));
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

/// Smooth ramp on the left, LCG noise on the right, a NaN hole in the noise.
fn build_synthetic_image() -> Raster<f64> {
    let mut img = Raster::filled(ROWS, COLS, 1.0);

    for r in 0..ROWS {
        for c in 0..COLS / 2 {
            let level = c * N_GREY / (COLS / 2) + 1;
            img.set(r, c, level as f64).unwrap();
        }
    }

    let mut seed: u64 = 42;
    for r in 0..ROWS {
        for c in COLS / 2..COLS {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            let level = ((seed >> 33) as usize) % N_GREY + 1;
            img.set(r, c, level as f64).unwrap();
        }
    }

    for r in 58..62 {
        for c in 88..92 {
            img.set(r, c, f64::NAN).unwrap();
        }
    }

    img
}

fn print_stats(label: &str, raster: &Raster<f64>) {
    let s = raster.statistics();
    println!(
        "{:<14} min={:>8.3}  max={:>8.3}  mean={:>8.3}  valid={:>6}  nodata={:>6}",
        label,
        s.min.unwrap_or(f64::NAN),
        s.max.unwrap_or(f64::NAN),
        s.mean.unwrap_or(f64::NAN),
        s.valid_count,
        s.nodata_count,
    );
}

/// The noisy half should have far higher contrast than the ramp.
fn compare_halves(contrast: &Raster<f64>) {
    let half_mean = |cols: std::ops::Range<usize>| {
        let mut sum = 0.0;
        let mut n = 0usize;
        for r in 0..ROWS {
            for c in cols.clone() {
                let v = contrast.get(r, c).unwrap();
                if v.is_finite() {
                    sum += v;
                    n += 1;
                }
            }
        }
        sum / n.max(1) as f64
    };
    let smooth = half_mean(5..COLS / 2 - 5);
    let noisy = half_mean(COLS / 2 + 5..COLS - 5);
    println!("mean contrast: smooth half {:.3}, noisy half {:.3}", smooth, noisy);
}
