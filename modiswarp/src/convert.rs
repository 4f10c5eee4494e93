//! Pipeline de conversion: un fichier de sortie par sub-dataset sélectionné
//!
//! Séquentiel et bloquant: chaque étape possède exclusivement ses handles
//! source et destination, libérés par `Drop` sur tous les chemins de
//! sortie. La première erreur est fatale pour le run entier; les sorties
//! déjà écrites restent sur disque.

use std::path::{Path, PathBuf};

use gdal::raster::{GdalDataType, RasterBand};
use gdal::{Dataset, Driver, DriverManager, Metadata};
use tracing::info;

use crate::grid::{self, ERROR_THRESHOLD};
use crate::types::{DstGrid, DstSrs, Subdataset};
use crate::{subdataset, warp, ConvertError, Resampling};

/// Clé de métadonnées MODIS portant la valeur de remplissage
const FILL_VALUE_KEY: &str = "_FillValue";

/// Format de sortie par défaut
const DEFAULT_FORMAT: &str = "GTiff";

/// Configuration d'un run de conversion.
///
/// Construit une fois, immuable ensuite, consommé par un unique [`run`].
///
/// [`run`]: ConversionJob::run
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Chemin du conteneur multi-couches source
    pub source: PathBuf,

    /// Préfixe des fichiers de sortie (`{prefix}_{couche}.{ext}`);
    /// absent: `{couche}.{ext}`
    pub prefix: Option<String>,

    /// Masque de sélection aligné sur l'ordre d'énumération des
    /// sub-datasets; absent: toutes les couches
    pub subset: Option<Vec<bool>>,

    /// Résolution de pixel demandée, en unités du SRS de destination;
    /// absente ou ≤ 0: grille auto-dérivée
    pub resolution: Option<f64>,

    /// Nom du format de sortie GDAL (vide: GTiff)
    pub format: String,

    /// SRS de destination (EPSG ou WKT, exactement l'un des deux)
    pub dst_srs: DstSrs,

    /// Algorithme de ré-échantillonnage
    pub resampling: Resampling,
}

impl ConversionJob {
    /// Job minimal: toutes les couches, grille auto-dérivée, GTiff,
    /// plus proche voisin.
    pub fn new(source: impl Into<PathBuf>, dst_srs: DstSrs) -> Self {
        Self {
            source: source.into(),
            prefix: None,
            subset: None,
            resolution: None,
            format: DEFAULT_FORMAT.to_string(),
            dst_srs,
            resampling: Resampling::default(),
        }
    }

    /// Convertit toutes les couches sélectionnées et retourne les chemins
    /// des fichiers écrits, dans l'ordre d'énumération.
    ///
    /// La grille de destination est dérivée une seule fois du sub-dataset
    /// 0 (référence de résolution, qu'il soit sélectionné ou non), puis
    /// partagée sans modification par toutes les couches.
    pub fn run(&self) -> Result<Vec<PathBuf>, ConvertError> {
        let src_ds = Dataset::open(&self.source)?;
        let layers = subdataset::list(&src_ds);
        if layers.is_empty() {
            return Err(ConvertError::NoSubdatasets(
                self.source.display().to_string(),
            ));
        }

        let dst_wkt = self.dst_srs.to_wkt()?;
        let format = if self.format.is_empty() {
            DEFAULT_FORMAT
        } else {
            self.format.as_str()
        };
        let driver = DriverManager::get_driver_by_name(format)
            .map_err(|_| ConvertError::UnsupportedFormat(format.to_string()))?;
        let extension = output_extension(&driver);

        let grid = {
            let reference = Dataset::open(Path::new(&layers[0].identifier))?;
            grid::build_grid(&reference, &dst_wkt, self.resampling, self.resolution)?
        };

        info!(
            source = %self.source.display(),
            layers = layers.len(),
            x_size = grid.x_size,
            y_size = grid.y_size,
            "Converting container"
        );

        let mask = self.subset.as_deref();
        let mut written = Vec::new();
        for layer in &layers {
            if !is_selected(mask, layer.index) {
                continue;
            }
            written.push(self.reproject_one(layer, &grid, &driver, &dst_wkt, &extension)?);
        }

        Ok(written)
    }

    /// Reprojette un sub-dataset sur la grille partagée et écrit le
    /// fichier de sortie correspondant.
    fn reproject_one(
        &self,
        layer: &Subdataset,
        grid: &DstGrid,
        driver: &Driver,
        dst_wkt: &str,
        extension: &str,
    ) -> Result<PathBuf, ConvertError> {
        let l_src = Dataset::open(Path::new(&layer.identifier))?;
        let band = l_src.rasterband(1)?;
        let no_data = resolve_no_data(&l_src, &band);
        let data_type = band.band_type();
        drop(band);

        let out_path = output_name(self.prefix.as_deref(), layer.layer_name(), extension);

        let mut dst = create_output(driver, &out_path, grid, data_type, layer)?;
        dst.set_projection(dst_wkt)?;
        dst.set_geo_transform(&grid.geo_transform)?;

        if let Some(value) = no_data {
            let mut dst_band = dst.rasterband(1)?;
            dst_band.set_no_data_value(Some(value))?;
            // Pré-remplissage: les pixels que le warp ne touche pas
            // restent marqués no-data au lieu de valoir 0.
            dst_band.fill(value, None)?;
        }

        warp::reproject_image(
            &l_src,
            &dst,
            &l_src.projection(),
            dst_wkt,
            self.resampling,
            ERROR_THRESHOLD,
        )
        .map_err(|e| ConvertError::reproject_failed(&layer.identifier, e.to_string()))?;

        copy_metadata(&l_src, &mut dst)?;
        dst.flush_cache()?;

        info!(
            layer = layer.layer_name(),
            no_data = ?no_data,
            output = %out_path.display(),
            "Layer reprojected"
        );

        Ok(out_path)
    }
}

/// Sélection par index: le masque absent vaut "tout", un masque trop
/// court laisse la fin non sélectionnée, un masque trop long est ignoré
/// au-delà de la liste. L'itération ne peut jamais dépasser la liste.
fn is_selected(mask: Option<&[bool]>, index: usize) -> bool {
    match mask {
        None => true,
        Some(mask) => mask.get(index).copied().unwrap_or(false),
    }
}

/// Valeur no-data d'une couche: l'item de métadonnées `_FillValue` du
/// dataset en priorité, sinon l'attribut no-data intrinsèque de la bande.
/// L'absence des deux n'est pas une erreur.
fn resolve_no_data(dataset: &Dataset, band: &RasterBand) -> Option<f64> {
    dataset
        .metadata_item(FILL_VALUE_KEY, "")
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .or_else(|| band.no_data_value())
}

/// Nom du fichier de sortie: `{prefix}_{couche}.{ext}` ou `{couche}.{ext}`
fn output_name(prefix: Option<&str>, layer_name: &str, extension: &str) -> PathBuf {
    match prefix.filter(|p| !p.is_empty()) {
        Some(prefix) => PathBuf::from(format!("{prefix}_{layer_name}.{extension}")),
        None => PathBuf::from(format!("{layer_name}.{extension}")),
    }
}

/// Extension de fichier annoncée par le driver (métadonnée
/// `DMD_EXTENSION`), repli sur `tif`
fn output_extension(driver: &Driver) -> String {
    driver
        .metadata_item("DMD_EXTENSION", "")
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "tif".to_string())
}

/// Crée le raster de destination avec le type de pixel de la bande
/// source (bande unique, dimensions de la grille partagée).
fn create_output(
    driver: &Driver,
    path: &Path,
    grid: &DstGrid,
    data_type: GdalDataType,
    layer: &Subdataset,
) -> Result<Dataset, ConvertError> {
    let (w, h) = (grid.x_size, grid.y_size);
    let created = match data_type {
        GdalDataType::UInt8 => driver.create_with_band_type::<u8, _>(path, w, h, 1),
        GdalDataType::UInt16 => driver.create_with_band_type::<u16, _>(path, w, h, 1),
        GdalDataType::Int16 => driver.create_with_band_type::<i16, _>(path, w, h, 1),
        GdalDataType::UInt32 => driver.create_with_band_type::<u32, _>(path, w, h, 1),
        GdalDataType::Int32 => driver.create_with_band_type::<i32, _>(path, w, h, 1),
        GdalDataType::Float32 => driver.create_with_band_type::<f32, _>(path, w, h, 1),
        GdalDataType::Float64 => driver.create_with_band_type::<f64, _>(path, w, h, 1),
        other => {
            return Err(ConvertError::unsupported_band_type(
                &layer.identifier,
                format!("{other:?}"),
            ))
        }
    };

    created.map_err(|source| ConvertError::CreateFailed {
        path: path.display().to_string(),
        source,
    })
}

/// Recopie les métadonnées du domaine par défaut de la source vers la
/// destination (paires clé/valeur)
fn copy_metadata(src: &Dataset, dst: &mut Dataset) -> Result<(), ConvertError> {
    for entry in src.metadata_domain("").unwrap_or_default() {
        if let Some((key, value)) = entry.split_once('=') {
            dst.set_metadata_item(key, value, "")?;
        }
    }
    Ok(())
}
