//! Types d'erreurs pour le crate modiswarp

use thiserror::Error;

/// Axe du grillage destination (pour les erreurs de dimensionnement)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
        }
    }
}

/// Erreurs pouvant survenir lors de la conversion d'un produit MODIS
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Erreur remontée par GDAL (ouverture, création, métadonnées…)
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    /// Format de sortie inconnu du registre de drivers GDAL
    #[error("Output format `{0}` is not supported by the available GDAL drivers")]
    UnsupportedFormat(String),

    /// La résolution demandée ne tient pas dans l'emprise
    #[error("Requested resolution {resolution} yields a zero-sized {axis} dimension")]
    ZeroSizedGrid { axis: Axis, resolution: f64 },

    /// Le conteneur source n'expose aucun sub-dataset
    #[error("No subdatasets found in {0}")]
    NoSubdatasets(String),

    /// Type de pixel de la bande source non représentable en sortie
    #[error("Unsupported band data type `{data_type}` for subdataset {subdataset}")]
    UnsupportedBandType {
        subdataset: String,
        data_type: String,
    },

    /// Échec de création du raster de destination
    #[error("Failed to create output raster {path}: {source}")]
    CreateFailed {
        path: String,
        source: gdal::errors::GdalError,
    },

    /// Le moteur de warp a signalé un échec pour un sub-dataset donné
    #[error("Not possible to reproject subdataset {subdataset}: {reason}")]
    ReprojectFailed { subdataset: String, reason: String },

    /// Erreur bas niveau du moteur de warp (appel gdal-sys)
    #[error("GDAL warp failed: {0}")]
    Warp(String),
}

impl ConvertError {
    /// Crée une erreur de reprojection avec contexte
    pub fn reproject_failed(subdataset: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ReprojectFailed {
            subdataset: subdataset.into(),
            reason: reason.into(),
        }
    }

    /// Crée une erreur de type de bande non supporté
    pub fn unsupported_band_type(
        subdataset: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self::UnsupportedBandType {
            subdataset: subdataset.into(),
            data_type: data_type.into(),
        }
    }
}
