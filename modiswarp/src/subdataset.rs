//! Énumération des sub-datasets d'un conteneur multi-couches
//!
//! GDAL expose les couches d'un conteneur (HDF4-EOS, HDF5, NetCDF…) dans
//! le domaine de métadonnées `SUBDATASETS`, sous forme de paires
//! `SUBDATASET_n_NAME=<identifiant>` / `SUBDATASET_n_DESC=<description>`.
//! Seules les entrées `_NAME` nous intéressent: l'identifiant est
//! ré-ouvrable indépendamment par `Dataset::open`.

use gdal::{Dataset, Metadata};

use crate::types::Subdataset;

/// Domaine de métadonnées GDAL portant l'énumération des couches
const SUBDATASETS_DOMAIN: &str = "SUBDATASETS";

/// Liste les sub-datasets du conteneur, dans l'ordre d'énumération GDAL.
///
/// Retourne une liste vide si le conteneur n'expose aucun sub-dataset
/// (raster mono-couche ou domaine absent); c'est à l'appelant d'en faire
/// une erreur s'il en attend.
pub fn list(dataset: &Dataset) -> Vec<Subdataset> {
    let entries = dataset
        .metadata_domain(SUBDATASETS_DOMAIN)
        .unwrap_or_default();
    parse_entries(&entries)
}

/// Extrait les identifiants des entrées `KEY=VALUE` du domaine SUBDATASETS
fn parse_entries(entries: &[String]) -> Vec<Subdataset> {
    entries
        .iter()
        .filter_map(|entry| {
            let (key, value) = entry.split_once('=')?;
            if key.starts_with("SUBDATASET_") && key.ends_with("_NAME") {
                Some(value.to_string())
            } else {
                None
            }
        })
        .enumerate()
        .map(|(index, identifier)| Subdataset { identifier, index })
        .collect()
}
