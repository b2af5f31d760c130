//! Taylor factor distribution of a random cubic polycrystal in uniaxial tension
//! (see `RunConfig` for all run parameters).

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use taylor::config::{parse_axis, sample_count, RunConfig};
use taylor::sampler::PolycrystalSampler;
use taylor::TaylorError;
use tracing::info;

#[derive(Parser)]
#[command(about = "Monte Carlo Taylor factor of a random fcc/bcc polycrystal")]
struct Cli {
    /// Crystal family: fcc or bcc
    #[arg(long, default_value = "fcc")]
    family: String,

    /// Temperature regime: room or elevated (bcc only)
    #[arg(long, default_value = "room")]
    regime: String,

    /// Number of random orientations
    #[arg(long, default_value = "5000", allow_hyphen_values = true)]
    samples: i64,

    /// Seed for the random orientations
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Tension axis in the sample frame
    #[arg(long, default_value = "1,0,0", allow_hyphen_values = true)]
    axis: String,

    /// Histogram bins
    #[arg(long, default_value = "30")]
    bins: usize,

    /// Draw every orientation from one RNG on a single thread
    #[arg(long)]
    sequential: bool,
}

fn main() -> Result<(), TaylorError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Cli::parse();
    let cfg = RunConfig {
        family: args.family.parse()?,
        regime: args.regime.parse()?,
        samples: sample_count(args.samples)?,
        seed: args.seed,
        loading_axis: parse_axis(&args.axis)?,
        histogram_bins: args.bins,
    };
    cfg.validate()?;
    info!("Configuration:\n{cfg:#?}");

    let catalog = cfg.catalog()?;
    info!(catalog = catalog.name(), systems = catalog.len(), "slip systems generated");
    let sampler = PolycrystalSampler::new(&catalog, cfg.loading_axis)?;

    let dist = if args.sequential {
        let mut rng = ChaCha20Rng::seed_from_u64(cfg.seed);
        sampler.simulate(cfg.samples, &mut rng)?
    } else {
        let bar = ProgressBar::new(cfg.samples as u64);
        if let Ok(style) = ProgressStyle::with_template(" {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]") {
            bar.set_style(style);
        }
        let dist = sampler.simulate_parallel_with(cfg.samples, cfg.seed, |_| bar.inc(1))?;
        bar.finish();
        dist
    };

    println!("\n{:=<80}", "");
    println!("TAYLOR FACTOR ({}, axis {})", catalog.name(), args.axis);
    println!("{:=<80}", "");
    println!(
        "{:<16} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "Quantity", "N", "Mean", "Std err", "Std dev", "Min", "Max"
    );
    match dist.summary() {
        Some(summary) => println!("{}", summary.format_row("M")),
        None => println!("no sample could be solved"),
    }
    println!("{:-<80}", "");
    println!("requested: {}  excluded: {}  degenerate optima: {}", dist.requested, dist.n_excluded(), dist.n_degenerate());

    if !dist.samples.is_empty() {
        println!("\nHistogram of M:");
        for line in dist.histogram(cfg.histogram_bins)?.render(50) {
            println!("{line}");
        }
    }

    Ok(())
}
