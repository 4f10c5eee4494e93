//! Définition et implémentation des commandes CLI
//!
//! - `convert`: reprojeter les sub-datasets sélectionnés vers le SRS cible
//! - `list`: énumérer les sub-datasets d'un conteneur sans convertir

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use gdal::Dataset;
use tracing::info;

use modiswarp::{subdataset, ConversionJob, DstSrs, Resampling};

#[derive(Subcommand)]
pub enum Commands {
    /// Reproject selected subdatasets onto a common destination grid
    Convert(ConvertArgs),

    /// List the subdatasets of a container without converting
    List {
        /// Path to the multi-subdataset container (HDF4/HDF5/NetCDF…)
        #[arg(short, long)]
        source: PathBuf,
    },
}

/// SRS de destination: exactement l'un de --epsg / --wkt, imposé par clap
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct SrsArgs {
    /// EPSG code of the destination SRS (e.g. 3857)
    #[arg(long)]
    pub epsg: Option<u32>,

    /// Raw WKT definition of the destination SRS
    #[arg(long)]
    pub wkt: Option<String>,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Path to the multi-subdataset container (HDF4/HDF5/NetCDF…)
    #[arg(short, long)]
    pub source: PathBuf,

    /// Output name prefix ({prefix}_{layer}.{ext}; default: {layer}.{ext})
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Layer selection mask aligned to enumeration order, comma-separated
    /// 0/1 or true/false (e.g. "1,0,1"); default: all layers
    #[arg(long)]
    pub subset: Option<String>,

    /// Requested pixel resolution in destination SRS units
    /// (default: grid auto-derived from the first subdataset)
    #[arg(short, long)]
    pub resolution: Option<f64>,

    /// GDAL output format name
    #[arg(short, long, default_value = "GTiff")]
    pub format: String,

    #[command(flatten)]
    pub srs: SrsArgs,

    /// Resampling method (AVERAGE, BILINEAR, LANCZOS, MODE, CUBIC,
    /// CUBIC_SPLINE…); any unrecognized name falls back to nearest neighbour
    #[arg(long, default_value = "NEAREST_NEIGHBOR")]
    pub resampling: String,
}

/// Exécute la commande convert
pub fn cmd_convert(args: ConvertArgs) -> Result<()> {
    // Le groupe clap garantit exactement l'un des deux.
    let dst_srs = match (args.srs.epsg, args.srs.wkt) {
        (Some(code), None) => DstSrs::Epsg(code),
        (None, Some(wkt)) => DstSrs::Wkt(wkt),
        _ => unreachable!("clap group enforces exactly one of --epsg/--wkt"),
    };

    let subset = args
        .subset
        .as_deref()
        .map(parse_subset_mask)
        .transpose()
        .context("Invalid --subset mask")?;

    info!(
        source = %args.source.display(),
        format = args.format.as_str(),
        resolution = ?args.resolution,
        "Starting conversion"
    );

    let job = ConversionJob {
        source: args.source.clone(),
        prefix: args.prefix,
        subset,
        resolution: args.resolution,
        format: args.format,
        dst_srs,
        resampling: Resampling::from_name(&args.resampling),
    };

    let written = job
        .run()
        .with_context(|| format!("Conversion failed for {}", args.source.display()))?;

    println!("\n=== Summary ===");
    println!("Source: {}", args.source.display());
    println!("Layers written: {}", written.len());
    for path in &written {
        println!("- {}", path.display());
    }

    Ok(())
}

/// Exécute la commande list
pub fn cmd_list(source: &Path) -> Result<()> {
    let dataset = Dataset::open(source)
        .with_context(|| format!("Cannot open {}", source.display()))?;

    let layers = subdataset::list(&dataset);
    if layers.is_empty() {
        bail!("No subdatasets found in {}", source.display());
    }

    println!("{} subdatasets in {}:", layers.len(), source.display());
    for layer in &layers {
        println!("  [{}] {} ({})", layer.index, layer.layer_name(), layer.identifier);
    }

    Ok(())
}

/// Parse un masque de sélection "1,0,1" ou "true,false,true"
fn parse_subset_mask(raw: &str) -> Result<Vec<bool>> {
    raw.split(',')
        .map(|token| match token.trim().to_ascii_lowercase().as_str() {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            other => bail!("Expected 0/1 or true/false, got '{}'", other),
        })
        .collect()
}
