//! # modiswarp
//!
//! Reprojection de produits raster multi-couches (granules MODIS HDF4-EOS,
//! HDF5, NetCDF…) vers un SRS cible, une bande par fichier de sortie, sur
//! une grille de destination commune à toutes les couches.
//!
//! ## Features
//!
//! - Énumération des sub-datasets via les métadonnées GDAL `SUBDATASETS`
//! - Grille de destination dérivée d'une vue warpée virtuelle, avec
//!   résolution optionnelle préservant l'emprise géographique
//! - Propagation du no-data (`_FillValue` ou attribut de bande) et des
//!   métadonnées source vers chaque sortie
//! - SRS de destination par code EPSG ou WKT (union taguée [`DstSrs`])
//!
//! ## Usage
//!
//! ```rust,ignore
//! use modiswarp::{ConversionJob, DstSrs, Resampling};
//!
//! let mut job = ConversionJob::new("MOD13Q1.hdf", DstSrs::Epsg(3857));
//! job.prefix = Some("mod13".to_string());
//! job.resampling = Resampling::from_name("BILINEAR");
//!
//! for path in job.run()? {
//!     println!("written: {}", path.display());
//! }
//! ```

pub mod convert;
pub mod error;
pub mod grid;
pub mod resampling;
pub mod subdataset;
pub mod types;
pub mod warp;

pub use convert::ConversionJob;
pub use error::ConvertError;
pub use grid::ERROR_THRESHOLD;
pub use resampling::Resampling;
pub use types::{BoundingBox, DstGrid, DstSrs, Subdataset};
