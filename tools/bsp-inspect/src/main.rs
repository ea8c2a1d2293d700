use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[clap(version, about)]
struct Params {
    #[clap(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Build a tree from a JSON array of `{ "mins": [x, y], "maxs": [x, y] }`.
    Build {
        #[clap(short, long)]
        input: PathBuf,

        /// Build parameters; defaults are used when the file is missing.
        #[clap(short, long, default_value = "bsp.toml")]
        config: PathBuf,

        /// Where to write the dump. Stdout when omitted.
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// Print statistics about a dumped tree.
    Inspect { dump: PathBuf },

    /// Print the boxes of a dumped tree matching a point or a region.
    Query {
        dump: PathBuf,

        #[clap(
            long,
            num_args = 2,
            value_names = ["X", "Y"],
            allow_negative_numbers = true,
            conflicts_with = "region",
            required_unless_present = "region"
        )]
        point: Option<Vec<f32>>,

        #[clap(
            long,
            num_args = 4,
            value_names = ["MIN_X", "MIN_Y", "MAX_X", "MAX_Y"],
            allow_negative_numbers = true
        )]
        region: Option<Vec<f32>>,
    },

    /// Render a dumped tree to a png.
    #[cfg(feature = "plot")]
    Plot {
        dump: PathBuf,

        #[clap(short, long, default_value = "bsp.png")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let params = Params::parse();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match params.command {
        Cmd::Build {
            input,
            config,
            output,
        } => commands::build(&input, &config, output.as_deref(), &mut out),
        Cmd::Inspect { dump } => commands::inspect(&dump, &mut out),
        Cmd::Query {
            dump,
            point,
            region,
        } => {
            let probe = match (point, region) {
                (Some(point), _) => commands::Probe::point(&point)?,
                (None, Some(region)) => commands::Probe::region(&region)?,
                (None, None) => anyhow::bail!("either --point or --region is required"),
            };
            commands::query(&dump, &probe, &mut out)
        }
        #[cfg(feature = "plot")]
        Cmd::Plot { dump, output } => commands::plot(&dump, &output),
    }
}
