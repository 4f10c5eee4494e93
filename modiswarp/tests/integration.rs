//! Tests d'intégration GDAL: dérivation de grille, warp, et conversion
//! de bout en bout sur une vraie granule MODIS quand la fixture est là.

use std::path::Path;

use gdal::spatial_ref::SpatialRef;
use gdal::{Dataset, DriverManager, Metadata};

use modiswarp::{grid, warp, ConversionJob, DstSrs, Resampling, ERROR_THRESHOLD};

/// Crée un GTiff 100x100 en EPSG:4326 (1°x1° au-dessus de l'équateur),
/// bande u8 remplie avec `fill`.
fn create_source_tiff(path: &Path, fill: f64) -> Dataset {
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let mut ds = driver
        .create_with_band_type::<u8, _>(path, 100, 100, 1)
        .unwrap();
    ds.set_geo_transform(&[10.0, 0.01, 0.0, 45.0, 0.0, -0.01])
        .unwrap();
    let wkt = SpatialRef::from_epsg(4326).unwrap().to_wkt().unwrap();
    ds.set_projection(&wkt).unwrap();
    ds.rasterband(1).unwrap().fill(fill, None).unwrap();
    ds.flush_cache().unwrap();
    ds
}

fn epsg_3857_wkt() -> String {
    SpatialRef::from_epsg(3857).unwrap().to_wkt().unwrap()
}

#[test]
fn test_dst_srs_resolution() {
    let from_epsg = DstSrs::Epsg(3857).to_wkt().unwrap();
    assert!(
        from_epsg.contains("3857") || from_epsg.contains("Mercator"),
        "EPSG:3857 WKT should mention the projection, got: {}",
        from_epsg
    );

    let roundtrip = DstSrs::Wkt(from_epsg.clone()).to_wkt().unwrap();
    assert!(roundtrip.contains("Mercator") || roundtrip.contains("3857"));

    assert!(
        DstSrs::Epsg(999_999).to_wkt().is_err(),
        "Unknown EPSG code should fail"
    );
}

#[test]
fn test_auto_grid_matches_warped_vrt() {
    let dir = tempfile::tempdir().unwrap();
    let src_path = dir.path().join("source.tif");
    let src = create_source_tiff(&src_path, 0.0);

    let dst_wkt = epsg_3857_wkt();

    // Sans résolution demandée, la grille adopte exactement la vue
    // warpée virtuelle (taille et géotransformation).
    let vrt = warp::auto_create_warped_vrt(
        &src,
        &src.projection(),
        &dst_wkt,
        Resampling::NearestNeighbour,
        ERROR_THRESHOLD,
    )
    .unwrap();

    let built = grid::build_grid(&src, &dst_wkt, Resampling::NearestNeighbour, None).unwrap();

    assert_eq!(built.x_size, vrt.raster_size().0);
    assert_eq!(built.y_size, vrt.raster_size().1);
    assert_eq!(built.geo_transform, vrt.geo_transform().unwrap());
    assert!(built.x_size > 0 && built.y_size > 0);
}

#[test]
fn test_resolution_override_preserves_extent() {
    let dir = tempfile::tempdir().unwrap();
    let src_path = dir.path().join("source.tif");
    let src = create_source_tiff(&src_path, 0.0);

    let dst_wkt = epsg_3857_wkt();

    let auto = grid::build_grid(&src, &dst_wkt, Resampling::NearestNeighbour, None).unwrap();
    let auto_bbox = grid::bounding_box(auto.x_size, auto.y_size, &auto.geo_transform);

    // 1° de longitude ≈ 111 km en Web Mercator: 500 m de pixel donne une
    // grille de quelques centaines de pixels.
    let res = 500.0;
    let built =
        grid::build_grid(&src, &dst_wkt, Resampling::NearestNeighbour, Some(res)).unwrap();

    // Origine: coin haut-gauche de l'enveloppe auto-dérivée.
    assert!((built.geo_transform[0] - auto_bbox.min.0).abs() < 1e-6);
    assert!((built.geo_transform[3] - auto_bbox.max.1).abs() < 1e-6);
    assert_eq!(built.geo_transform[1], res);
    assert_eq!(built.geo_transform[5], -res);

    // Même emprise à moins d'un pixel près (arrondi).
    let built_bbox = grid::bounding_box(built.x_size, built.y_size, &built.geo_transform);
    assert!((built_bbox.max.0 - auto_bbox.max.0).abs() < res);
    assert!((built_bbox.min.1 - auto_bbox.min.1).abs() < res);
}

#[test]
fn test_zero_resolution_behaves_like_auto() {
    let dir = tempfile::tempdir().unwrap();
    let src_path = dir.path().join("source.tif");
    let src = create_source_tiff(&src_path, 0.0);

    let dst_wkt = epsg_3857_wkt();
    let auto = grid::build_grid(&src, &dst_wkt, Resampling::NearestNeighbour, None).unwrap();
    let zero =
        grid::build_grid(&src, &dst_wkt, Resampling::NearestNeighbour, Some(0.0)).unwrap();

    assert_eq!(auto, zero);
}

#[test]
fn test_reproject_image_carries_pixels() {
    let dir = tempfile::tempdir().unwrap();
    let src_path = dir.path().join("source.tif");
    let dst_path = dir.path().join("dest.tif");

    let src = create_source_tiff(&src_path, 42.0);
    let dst_wkt = epsg_3857_wkt();

    let grid = grid::build_grid(&src, &dst_wkt, Resampling::NearestNeighbour, None).unwrap();

    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let mut dst = driver
        .create_with_band_type::<u8, _>(&dst_path, grid.x_size, grid.y_size, 1)
        .unwrap();
    dst.set_projection(&dst_wkt).unwrap();
    dst.set_geo_transform(&grid.geo_transform).unwrap();

    warp::reproject_image(
        &src,
        &dst,
        &src.projection(),
        &dst_wkt,
        Resampling::NearestNeighbour,
        ERROR_THRESHOLD,
    )
    .unwrap();
    dst.flush_cache().unwrap();

    // Le centre de l'emprise est forcément couvert par la source.
    let band = dst.rasterband(1).unwrap();
    let center = (grid.x_size as isize / 2, grid.y_size as isize / 2);
    let buffer = band.read_as::<u8>(center, (1, 1), (1, 1), None).unwrap();
    assert_eq!(buffer.data()[0], 42);
}

#[test]
fn test_convert_real_modis_granule() {
    // Fixture réelle non versionnée; le test se dégrade en skip.
    let fixture = Path::new("../fixtures/MOD13Q1.A2023001.h18v04.061.hdf");
    if !fixture.exists() {
        eprintln!("Fixture not found, skipping test");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("mod13").display().to_string();

    let mut job = ConversionJob::new(fixture, DstSrs::Epsg(3857));
    job.prefix = Some(prefix);
    job.resampling = Resampling::from_name("NEAREST_NEIGHBOR");

    let written = job.run().expect("conversion should succeed");
    assert!(!written.is_empty(), "Should write at least one layer");

    // Toutes les sorties partagent la même grille.
    let mut transforms = Vec::new();
    for path in &written {
        assert!(path.exists(), "Output {} should exist", path.display());
        let ds = Dataset::open(path).unwrap();
        transforms.push((ds.raster_size(), ds.geo_transform().unwrap()));

        // Le no-data source est propagé quand il existe.
        let band = ds.rasterband(1).unwrap();
        if let Some(fill) = ds
            .metadata_item("_FillValue", "")
            .and_then(|v| v.trim().parse::<f64>().ok())
        {
            assert_eq!(band.no_data_value(), Some(fill));
        }
        println!("{}: {:?}", path.display(), ds.raster_size());
    }
    for pair in transforms.windows(2) {
        assert_eq!(pair[0], pair[1], "All layers share the destination grid");
    }
}
