mod host;
mod watch;

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use crate::host::{Overrides, clock_seed, generate_once, log_params, resolve_params};

#[derive(Parser, Debug)]
#[command(name = "strata", version, about = "Procedural heightfield terrain generator")]
struct Args {
    /// TOML terrain config; built-in defaults when omitted
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Regenerate whenever the config file changes (requires --config)
    #[arg(long, requires = "config")]
    watch: bool,

    /// Tile an N x N grid of chunks (0 disables tiling)
    #[arg(long, value_name = "N")]
    chunks: Option<usize>,

    /// Noise seed axis value
    #[arg(long, allow_hyphen_values = true)]
    seed: Option<f32>,

    /// Seed from the clock instead of the config
    #[arg(long, conflicts_with = "seed")]
    random_seed: bool,

    /// Fade heights toward the grid edges
    #[arg(long)]
    falloff: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let seed = if args.random_seed {
        let s = clock_seed();
        log::info!("random seed {}", s);
        Some(s)
    } else {
        args.seed
    };
    let overrides = Overrides {
        chunks: args.chunks,
        seed,
        falloff: args.falloff,
    };

    let params = match resolve_params(args.config.as_deref(), &overrides) {
        Ok(p) => p,
        Err(e) => {
            log::error!("failed to load terrain config: {}", e);
            return Err(e);
        }
    };
    log_params(&params);

    match (&args.config, args.watch) {
        (Some(path), true) => watch::run(path, &overrides, params),
        _ => generate_once(&params),
    }
    Ok(())
}
