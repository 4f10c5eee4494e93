//! Résolution du nom d'algorithme de ré-échantillonnage

use gdal_sys::GDALResampleAlg;

/// Algorithme de ré-échantillonnage du moteur de warp.
///
/// Le défaut est le plus proche voisin: c'est aussi le repli pour tout
/// nom non reconnu (voir [`Resampling::from_name`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resampling {
    #[default]
    NearestNeighbour,
    Average,
    Bilinear,
    Lanczos,
    Mode,
    Cubic,
    CubicSpline,
}

impl Resampling {
    /// Résout un nom lisible en algorithme, insensible à la casse.
    ///
    /// Fonction totale: tout nom non reconnu (chaîne vide comprise)
    /// dégrade silencieusement vers le plus proche voisin. C'est un
    /// défaut délibéré hérité du comportement historique, pas un oubli.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "AVERAGE" => Resampling::Average,
            "BILINEAR" | "BICUBIC" => Resampling::Bilinear,
            "LANCZOS" => Resampling::Lanczos,
            "MODE" => Resampling::Mode,
            "CUBIC_CONVOLUTION" | "CUBIC" => Resampling::Cubic,
            "CUBIC_SPLINE" => Resampling::CubicSpline,
            _ => Resampling::NearestNeighbour,
        }
    }

    /// Constante GDAL correspondante pour les appels gdal-sys
    pub(crate) fn to_gdal(self) -> GDALResampleAlg::Type {
        match self {
            Resampling::NearestNeighbour => GDALResampleAlg::GRA_NearestNeighbour,
            Resampling::Average => GDALResampleAlg::GRA_Average,
            Resampling::Bilinear => GDALResampleAlg::GRA_Bilinear,
            Resampling::Lanczos => GDALResampleAlg::GRA_Lanczos,
            Resampling::Mode => GDALResampleAlg::GRA_Mode,
            Resampling::Cubic => GDALResampleAlg::GRA_Cubic,
            Resampling::CubicSpline => GDALResampleAlg::GRA_CubicSpline,
        }
    }
}

impl std::str::FromStr for Resampling {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Resampling::from_name(s))
    }
}
