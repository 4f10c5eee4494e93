//! Point d'entrée CLI pour modis-convert

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;

use cli::Commands;

/// Reprojeter un produit raster multi-couches vers un SRS cible
#[derive(Parser)]
#[command(name = "modis-convert")]
#[command(author, version)]
#[command(about = "Reprojeter les sub-datasets d'un produit MODIS vers un SRS cible, une bande par fichier")]
#[command(long_about = "Convertit un conteneur raster multi-couches (granule MODIS HDF4-EOS, HDF5, NetCDF…) \
en fichiers mono-bande reprojetés vers un SRS cible, sur une grille de destination commune.\n\n\
Le SRS de destination est donné par --epsg ou --wkt (exactement l'un des deux).")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Convert(args) => cli::cmd_convert(args),
        Commands::List { source } => cli::cmd_list(&source),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
