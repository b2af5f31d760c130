//! Taylor factor, active slip systems and Schmid factors of one orientation.

use clap::Parser;
use taylor::config::parse_axis;
use taylor::schmid::schmid_factors;
use taylor::{Orientation, PolycrystalSampler, SlipSystemCatalog, TaylorError};

#[derive(Parser)]
struct Cli {
    /// Crystal family: fcc or bcc
    #[arg(long, default_value = "fcc")]
    family: String,

    /// Temperature regime: room or elevated (bcc only)
    #[arg(long, default_value = "room")]
    regime: String,

    /// Bunge Euler angles φ1,Φ,φ2 in degrees
    #[arg(long, default_value = "0,0,0", allow_hyphen_values = true, value_delimiter = ',')]
    euler: Vec<f64>,

    /// Tension axis in the sample frame
    #[arg(long, default_value = "1,0,0", allow_hyphen_values = true)]
    axis: String,

    /// Schmid factors to list
    #[arg(long, default_value = "5")]
    top: usize,
}

fn main() -> Result<(), TaylorError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Cli::parse();
    let &[phi1, phi, phi2] = args.euler.as_slice() else {
        return Err(TaylorError::config("expected three Euler angles"));
    };

    let catalog = SlipSystemCatalog::from_keys(&args.family, &args.regime)?;
    let orientation = Orientation::from_euler_degrees(phi1, phi, phi2)?;
    let axis = parse_axis(&args.axis)?;
    let sampler = PolycrystalSampler::new(&catalog, axis)?;
    let result = sampler.single(&orientation)?;

    println!("orientation {}  catalog {}  axis {}", orientation.euler(), catalog.name(), args.axis);
    println!("Taylor factor M = {:.6}", result.taylor_factor);
    println!("active systems: {}{}", result.n_active(), if result.degenerate { " (non-unique optimum)" } else { "" });

    println!("\n{:>3} {:<24} {:>12}", "#", "system", "shear");
    for row in result.shear.rows(&catalog) {
        println!("{}", row.format_row());
    }

    println!("\n{:>3} {:<24} {:>12}", "#", "system", "Schmid m");
    for sf in schmid_factors(&catalog, &orientation, &axis)?.into_iter().take(args.top) {
        println!("{:>3} {:<24} {:>12.6}", sf.index, catalog.systems()[sf.index].label(), sf.factor);
    }

    Ok(())
}
