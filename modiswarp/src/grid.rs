//! Dérivation de la grille de pixels de destination
//!
//! La grille (taille + géotransformation) est calculée une seule fois par
//! job, depuis une vue warpée virtuelle du premier sub-dataset, puis
//! partagée telle quelle par toutes les conversions de couches. Quand une
//! résolution est demandée, elle remplace la taille de pixel auto-dérivée
//! mais préserve l'emprise géographique de la vue warpée.

use gdal::{Dataset, GeoTransform};
use tracing::debug;

use crate::error::Axis;
use crate::types::{BoundingBox, DstGrid};
use crate::{warp, ConvertError, Resampling};

/// Seuil d'erreur (en pixels destination) toléré par la transformation
/// approchée du moteur de warp. Constante du design, non réglable.
pub const ERROR_THRESHOLD: f64 = 0.125;

/// Enveloppe terrain d'un raster: les quatre coins pixel passés par la
/// géotransformation affine, puis min/max par composante.
///
/// Les quatre coins (et pas seulement deux) rendent le calcul correct
/// pour les grilles pivotées ou cisaillées. Fonction pure, sans échec.
pub fn bounding_box(x_size: usize, y_size: usize, gt: &GeoTransform) -> BoundingBox {
    let w = x_size as f64;
    let h = y_size as f64;
    let corners = [(0.0, 0.0), (0.0, h), (w, 0.0), (w, h)];

    let mut min = (f64::INFINITY, f64::INFINITY);
    let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);

    for (px, py) in corners {
        let x = gt[0] + gt[1] * px + gt[2] * py;
        let y = gt[3] + gt[4] * px + gt[5] * py;
        min = (min.0.min(x), min.1.min(y));
        max = (max.0.max(x), max.1.max(y));
    }

    BoundingBox { min, max }
}

/// Construit la grille de destination à partir d'un raster de référence.
///
/// Une vue warpée virtuelle du raster vers `dst_wkt` fournit la grille de
/// sortie naturelle. Sans résolution demandée (ou à 0), cette grille est
/// adoptée telle quelle. Avec une résolution positive, la taille est
/// recalculée depuis l'enveloppe de la vue: `round((max - min) / res)`,
/// une dimension nulle étant une erreur de configuration fatale.
///
/// La vue virtuelle est libérée en sortie de fonction (Drop), le raster
/// de référence reste la propriété de l'appelant.
pub fn build_grid(
    reference: &Dataset,
    dst_wkt: &str,
    resampling: Resampling,
    resolution: Option<f64>,
) -> Result<DstGrid, ConvertError> {
    let vrt = warp::auto_create_warped_vrt(
        reference,
        &reference.projection(),
        dst_wkt,
        resampling,
        ERROR_THRESHOLD,
    )?;

    let (x_size, y_size) = vrt.raster_size();
    let vrt_gt = vrt.geo_transform()?;

    let grid = match resolution.filter(|r| *r > 0.0) {
        None => DstGrid {
            x_size,
            y_size,
            geo_transform: vrt_gt,
        },
        Some(res) => {
            let bbox = bounding_box(x_size, y_size, &vrt_gt);
            sized_grid(&bbox, res)?
        }
    };

    debug!(
        x_size = grid.x_size,
        y_size = grid.y_size,
        origin_x = grid.geo_transform[0],
        origin_y = grid.geo_transform[3],
        "Destination grid"
    );

    Ok(grid)
}

/// Grille couvrant `bbox` à la résolution demandée, origine au coin
/// haut-gauche (x min, y max), taille de pixel Y négative par convention
/// raster (lignes du haut vers le bas).
pub fn sized_grid(bbox: &BoundingBox, resolution: f64) -> Result<DstGrid, ConvertError> {
    let x_size = ((bbox.max.0 - bbox.min.0) / resolution).round() as usize;
    if x_size == 0 {
        return Err(ConvertError::ZeroSizedGrid {
            axis: Axis::X,
            resolution,
        });
    }

    let y_size = ((bbox.max.1 - bbox.min.1) / resolution).round() as usize;
    if y_size == 0 {
        return Err(ConvertError::ZeroSizedGrid {
            axis: Axis::Y,
            resolution,
        });
    }

    Ok(DstGrid {
        x_size,
        y_size,
        geo_transform: [bbox.min.0, resolution, 0.0, bbox.max.1, 0.0, -resolution],
    })
}
