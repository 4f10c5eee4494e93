//! Enveloppes sûres autour du moteur de warp GDAL
//!
//! Le crate `gdal` n'expose ni `GDALAutoCreateWarpedVRT` ni le contrôle
//! de l'algorithme et du seuil d'erreur de `GDALReprojectImage`; ces deux
//! appels passent donc par `gdal-sys` avec marshalling CString des WKT.

use std::ffi::{c_char, CStr, CString};
use std::ptr::{null, null_mut};

use gdal::Dataset;
use gdal_sys::CPLErr;

use crate::{ConvertError, Resampling};

/// Limite mémoire passée au warp (0.0 = défaut GDAL)
const WARP_MEMORY_LIMIT: f64 = 0.0;

/// Construit une vue virtuelle (VRT) du raster source warpé vers `dst_wkt`.
///
/// La vue n'alloue pas de pixels: elle sert uniquement à connaître la
/// grille de sortie naturelle (taille, géotransformation) que GDAL
/// dériverait pour cette reprojection.
pub fn auto_create_warped_vrt(
    src: &Dataset,
    src_wkt: &str,
    dst_wkt: &str,
    resampling: Resampling,
    max_error: f64,
) -> Result<Dataset, ConvertError> {
    let src_wkt = optional_c_string(src_wkt)?;
    let dst_wkt = optional_c_string(dst_wkt)?;

    let handle = unsafe {
        gdal_sys::CPLErrorReset();
        gdal_sys::GDALAutoCreateWarpedVRT(
            src.c_dataset(),
            as_ptr(&src_wkt),
            as_ptr(&dst_wkt),
            resampling.to_gdal(),
            max_error,
            null(),
        )
    };

    if handle.is_null() {
        return Err(ConvertError::Warp(last_error_message()));
    }
    Ok(unsafe { Dataset::from_c_dataset(handle) })
}

/// Ré-échantillonne les pixels de `src` dans `dst` (déjà dimensionné et
/// géoréférencé) sous l'algorithme et le seuil d'erreur donnés.
pub fn reproject_image(
    src: &Dataset,
    dst: &Dataset,
    src_wkt: &str,
    dst_wkt: &str,
    resampling: Resampling,
    max_error: f64,
) -> Result<(), ConvertError> {
    let src_wkt = optional_c_string(src_wkt)?;
    let dst_wkt = optional_c_string(dst_wkt)?;

    let rv = unsafe {
        gdal_sys::CPLErrorReset();
        gdal_sys::GDALReprojectImage(
            src.c_dataset(),
            as_ptr(&src_wkt),
            dst.c_dataset(),
            as_ptr(&dst_wkt),
            resampling.to_gdal(),
            WARP_MEMORY_LIMIT,
            max_error,
            None,
            null_mut(),
            null_mut(),
        )
    };

    if rv != CPLErr::CE_None {
        return Err(ConvertError::Warp(last_error_message()));
    }
    Ok(())
}

/// WKT vide → pointeur nul, GDAL retombe alors sur la projection du dataset
fn optional_c_string(value: &str) -> Result<Option<CString>, ConvertError> {
    if value.is_empty() {
        return Ok(None);
    }
    CString::new(value)
        .map(Some)
        .map_err(|_| ConvertError::Warp("interior NUL byte in SRS definition".to_string()))
}

fn as_ptr(value: &Option<CString>) -> *const c_char {
    value.as_ref().map_or(null(), |s| s.as_ptr())
}

/// Dernier message d'erreur CPL, pour attribuer les échecs du moteur
fn last_error_message() -> String {
    let msg = unsafe { gdal_sys::CPLGetLastErrorMsg() };
    if msg.is_null() {
        "unknown GDAL error".to_string()
    } else {
        let text = unsafe { CStr::from_ptr(msg) }.to_string_lossy();
        if text.is_empty() {
            "unknown GDAL error".to_string()
        } else {
            text.into_owned()
        }
    }
}
