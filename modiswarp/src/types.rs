//! Types de données pour le crate modiswarp

use gdal::spatial_ref::SpatialRef;
use gdal::GeoTransform;

use crate::ConvertError;

/// Système de référence spatiale de destination.
///
/// Exactement l'un des deux: un code EPSG ou une chaîne WKT brute.
/// L'invariant "l'un ou l'autre" est porté par le type lui-même plutôt
/// que par deux champs optionnels validés à l'exécution.
#[derive(Debug, Clone, PartialEq)]
pub enum DstSrs {
    /// Code EPSG (ex: 3857 pour Web Mercator)
    Epsg(u32),
    /// Définition WKT brute
    Wkt(String),
}

impl DstSrs {
    /// Résout le SRS en WKT via GDAL/OSR.
    ///
    /// Un code EPSG inconnu ou un WKT non parsable remonte l'erreur OSR.
    pub fn to_wkt(&self) -> Result<String, ConvertError> {
        match self {
            DstSrs::Epsg(code) => Ok(SpatialRef::from_epsg(*code)?.to_wkt()?),
            DstSrs::Wkt(wkt) => Ok(SpatialRef::from_wkt(wkt)?.to_wkt()?),
        }
    }
}

/// Grille de pixels de destination, partagée par toutes les couches.
///
/// Calculée une seule fois par job (depuis le premier sub-dataset) puis
/// lue sans modification par chaque conversion de couche.
#[derive(Debug, Clone, PartialEq)]
pub struct DstGrid {
    /// Largeur en pixels (> 0)
    pub x_size: usize,

    /// Hauteur en pixels (> 0)
    pub y_size: usize,

    /// Géotransformation affine à 6 coefficients
    /// (origine X, taille pixel X, rotation ligne, origine Y, rotation colonne, taille pixel Y négative)
    pub geo_transform: GeoTransform,
}

/// Enveloppe min/max alignée sur les axes, en coordonnées terrain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Coin (x min, y min)
    pub min: (f64, f64),

    /// Coin (x max, y max)
    pub max: (f64, f64),
}

/// Référence vers un sub-dataset du conteneur source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subdataset {
    /// Identifiant GDAL complet, ré-ouvrable indépendamment
    /// (ex: `HDF4_EOS:EOS_GRID:"granule.hdf":MOD_Grid:NDVI`)
    pub identifier: String,

    /// Position ordinale dans l'énumération du conteneur
    pub index: usize,
}

impl Subdataset {
    /// Nom lisible de la couche: dernier segment de l'identifiant
    /// délimité par `:`, utilisé pour nommer le fichier de sortie.
    pub fn layer_name(&self) -> &str {
        self.identifier
            .rsplit(':')
            .next()
            .unwrap_or(&self.identifier)
    }
}
