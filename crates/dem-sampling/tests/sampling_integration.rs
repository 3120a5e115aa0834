//! Integration tests for windowing, interpolation and profile sampling.

use dem_sampling::{
    get_window, horseshoe_sample_count, window_bounds, GridInterpolator, ProfileSampler,
    SamplerConfig,
};
use hydro_common::{BoundingBox, GeoTransform, HydroError, InputGeometry, RasterGrid, Vertex};
use ndarray::{array, Array2};
use test_utils::{
    arange_raster, assert_approx_eq, assert_grid_approx_eq, flat_raster, plane_raster,
    punch_nodata, window_bbox, window_expected, window_expected_geotransform,
    window_source_raster, WINDOW_NODATA,
};

const NODATA: f64 = -9999.0;

/// 20×20 raster with 1 m pixels covering x 0..20, y 0..20, z = x + 2y.
fn plane_dem() -> RasterGrid {
    plane_raster(20, 20, GeoTransform::north_up(0.0, 20.0, 1.0, -1.0), 1.0, 2.0, 0.0)
}

fn plane_z(x: f64, y: f64) -> f64 {
    x + 2.0 * y
}

fn flat_dem() -> RasterGrid {
    flat_raster(20, 20, GeoTransform::north_up(0.0, 20.0, 1.0, -1.0), 7.0, Some(NODATA))
}

/// Horseshoe with open edge A–D along y = 5 and closed edge B–C along y = 8.
fn horseshoe() -> InputGeometry {
    InputGeometry::line_string([(5.0, 5.0), (5.0, 8.0), (9.0, 8.0), (9.0, 5.0)])
}

// ============================================================================
// Window extraction tests
// ============================================================================

#[test]
fn test_window_reference_scenario() {
    let source = window_source_raster();
    let window = get_window(&source, &window_bbox()).unwrap();

    assert_grid_approx_eq!(window.data(), window_expected(), 1e-9);

    let actual = window.geotransform().to_gdal();
    for (a, e) in actual.iter().zip(window_expected_geotransform()) {
        assert_approx_eq!(*a, e, 1e-6);
    }
    assert_eq!(window.nodata(), Some(WINDOW_NODATA));
}

#[test]
fn test_window_alignment_and_padding() {
    let transforms = [
        GeoTransform::north_up(600000.0, 6200000.0, 0.4, -0.4),
        GeoTransform::north_up(-50.0, -20.0, 2.5, 2.5),
        GeoTransform::north_up(1000.0, 0.0, -1.0, -0.5),
    ];
    let bboxes = [
        (0.13, 0.87, 0.21, 0.33),
        (3.0, 3.0, 4.0, 4.0),
        (-7.31, 12.004, -2.5, 9.99),
        (0.0, 0.4, 0.0, 0.4),
    ];

    for gt in transforms {
        let source = RasterGrid::filled(50, 50, 1.0, gt, None);
        for (dx0, dx1, dy0, dy1) in bboxes {
            let bbox = BoundingBox::new(
                gt.origin_x + dx0,
                gt.origin_x + dx1,
                gt.origin_y + dy0,
                gt.origin_y + dy1,
            );
            let window = get_window(&source, &bbox).unwrap();
            let wgt = window.geotransform();

            // pixel size unchanged
            assert_eq!(wgt.pixel_width, gt.pixel_width);
            assert_eq!(wgt.pixel_height, gt.pixel_height);

            // origin sits on the source pixel lattice
            let (col, row) = gt.geo_to_pixel(wgt.origin_x, wgt.origin_y);
            assert_approx_eq!(col, col.round(), 1e-6);
            assert_approx_eq!(row, row.round(), 1e-6);

            // at least one full pixel of padding on every side
            let extent = window.bbox();
            let (px, py) = (gt.pixel_width.abs(), gt.pixel_height.abs());
            assert!(extent.strictly_contains(&bbox), "{:?} vs {:?}", extent, bbox);
            assert!(extent.x_min <= bbox.x_min - px + 1e-9);
            assert!(extent.x_max >= bbox.x_max + px - 1e-9);
            assert!(extent.y_min <= bbox.y_min - py + 1e-9);
            assert!(extent.y_max >= bbox.y_max + py - 1e-9);
        }
    }
}

#[test]
fn test_window_outside_source_is_nodata() {
    let source = window_source_raster();
    let far = BoundingBox::new(600010.0, 600010.5, 6199990.0, 6199990.5);
    let window = get_window(&source, &far).unwrap();
    assert!(window.data().iter().all(|&v| v == WINDOW_NODATA));
}

#[test]
fn test_window_is_independent_copy() {
    let mut source = window_source_raster();
    let window = get_window(&source, &window_bbox()).unwrap();
    source.data_mut().fill(0.0);
    assert_eq!(window.get(0, 0), Some(6.0));
}

#[test]
fn test_window_deterministic() {
    let source = window_source_raster();
    let a = get_window(&source, &window_bbox()).unwrap();
    let b = get_window(&source, &window_bbox()).unwrap();
    assert_eq!(
        window_bounds(&source, &window_bbox()).unwrap(),
        window_bounds(&source, &window_bbox()).unwrap()
    );
    let bytes = |r: &RasterGrid| -> Vec<u64> { r.data().iter().map(|v| v.to_bits()).collect() };
    assert_eq!(bytes(&a), bytes(&b));
    assert_eq!(a.geotransform(), b.geotransform());
}

// ============================================================================
// Interpolator tests
// ============================================================================

#[test]
fn test_interpolator_exact_at_cell_centers() {
    let gt = GeoTransform::from_gdal([600000.0, 1.0, 0.0, 6200000.0, 0.0, -1.0]);
    let raster = arange_raster(4, 5, gt, None);
    let interp = GridInterpolator::build(&raster).unwrap();

    for row in 0..4 {
        for col in 0..5 {
            let (x, y) = gt.cell_center(col, row);
            assert_eq!(interp.query(x, y), raster.get(row, col).unwrap());
        }
    }
}

#[test]
fn test_interpolator_reproduces_plane() {
    let transforms = [
        GeoTransform::north_up(0.0, 20.0, 1.0, -1.0),
        GeoTransform::north_up(20.0, 0.0, -1.0, 1.0),
        GeoTransform::north_up(0.0, 0.0, 0.5, 2.0),
    ];
    for gt in transforms {
        let raster = plane_raster(10, 10, gt, 3.0, -1.5, 100.0);
        let interp = GridInterpolator::build(&raster).unwrap();
        let domain = interp.domain();
        for k in 0..=10 {
            let t = k as f64 / 10.0;
            let x = (domain.x_min + t * domain.width()).min(domain.x_max);
            let y = (domain.y_max - t * domain.height()).max(domain.y_min);
            assert_approx_eq!(interp.query(x, y), 3.0 * x - 1.5 * y + 100.0, 1e-9);
        }
    }
}

#[test]
fn test_interpolator_outside_domain_is_nan() {
    let gt = GeoTransform::north_up(0.0, 4.0, 1.0, -1.0);
    let raster = arange_raster(4, 4, gt, None);
    let interp = GridInterpolator::build(&raster).unwrap();

    // cell centers span 0.5..3.5 on both axes
    assert!(interp.query(0.49, 2.0).is_nan());
    assert!(interp.query(3.51, 2.0).is_nan());
    assert!(interp.query(2.0, 0.4).is_nan());
    assert!(interp.query(2.0, 3.6).is_nan());
    assert!(interp.query(0.5, 0.5).is_finite());
    assert!(interp.query(3.5, 3.5).is_finite());
}

#[test]
fn test_interpolator_nodata_neighborhood_is_nan() {
    let raster = window_source_raster();
    let gt = *raster.geotransform();
    let interp = GridInterpolator::build(&raster).unwrap();

    // between the centers of (3, 1) and (3, 2), the latter being nodata
    let (x0, y0) = gt.cell_center(1, 3);
    let (x1, _) = gt.cell_center(2, 3);
    assert!(interp.query(0.5 * (x0 + x1), y0).is_nan());

    // diagonal neighbor cell of the nodata pixel
    let (xa, ya) = gt.cell_center(2, 3);
    let (xb, yb) = gt.cell_center(3, 4);
    assert!(interp.query(0.5 * (xa + xb), 0.5 * (ya + yb)).is_nan());

    // far away from it
    let (x, y) = gt.cell_center(0, 0);
    assert_eq!(interp.query(x, y), 0.0);
}

#[test]
fn test_interpolator_batch_shapes() {
    let interp = GridInterpolator::build(&plane_dem()).unwrap();

    let points = interp.query_points(&[[1.0, 1.0], [2.0, 3.0], [-5.0, 1.0]]);
    assert_eq!(points.len(), 3);
    assert_approx_eq!(points[0], plane_z(1.0, 1.0), 1e-9);
    assert!(points[2].is_nan());

    let paired = interp.query_xy(&[1.0, 2.0], &[1.0, 3.0]).unwrap();
    assert_approx_eq!(paired[1], plane_z(2.0, 3.0), 1e-9);

    let xs: Array2<f64> = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
    let ys: Array2<f64> = array![[1.5, 1.5, 1.5], [9.0, 9.0, 9.0]];
    let zs = interp.query_array(&xs, &ys).unwrap();
    assert_eq!(zs.dim(), (2, 3));
    assert_approx_eq!(zs[[1, 2]], plane_z(6.0, 9.0), 1e-9);

    let bad: Array2<f64> = Array2::zeros((3, 2));
    assert!(matches!(
        interp.query_array(&xs, &bad),
        Err(HydroError::ShapeMismatch { .. })
    ));
}

// ============================================================================
// Line mode tests
// ============================================================================

#[test]
fn test_line_mode_samples_endpoints() {
    let dem = plane_dem();
    let lines = vec![InputGeometry::line_string([(2.5, 2.5), (10.25, 12.75)])];

    let output = ProfileSampler::default().sample_lines(&dem, &lines).unwrap();

    assert_eq!(output.counters.processed, 1);
    assert_eq!(output.counters.valid, 1);
    assert_eq!(output.lines.len(), 1);

    let v = &output.lines[0].vertices;
    assert_eq!(v.len(), 2);
    assert_eq!((v[0].x, v[0].y), (2.5, 2.5));
    assert_approx_eq!(v[0].z, plane_z(2.5, 2.5), 1e-9);
    assert_approx_eq!(v[1].z, plane_z(10.25, 12.75), 1e-9);
}

#[test]
fn test_line_mode_counters() {
    let dem = plane_dem();
    let lines = vec![
        InputGeometry::line_string([(2.5, 2.5), (3.5, 3.5)]),
        // endpoint outside the raster
        InputGeometry::line_string([(2.5, 2.5), (30.0, 3.5)]),
        // three points is not a line object
        InputGeometry::line_string([(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]),
        InputGeometry::LineString(vec![Vertex::with_z(4.0, 4.0, 99.0), Vertex::new(5.0, 5.0)]),
    ];

    let output = ProfileSampler::default().sample_lines(&dem, &lines).unwrap();

    assert_eq!(output.counters.processed, 3);
    assert_eq!(output.counters.valid, 2);
    assert_eq!(output.counters.invalid_nodata, 1);
    assert_eq!(output.counters.shape_mismatch, 1);
    assert_eq!(output.lines.len(), 2);
    // input Z is replaced by the sampled Z
    assert_approx_eq!(output.lines[1].vertices[0].z, plane_z(4.0, 4.0), 1e-9);
}

#[test]
fn test_foreign_geometry_type_is_fatal() {
    let dem = plane_dem();
    let lines = vec![
        InputGeometry::line_string([(2.5, 2.5), (3.5, 3.5)]),
        InputGeometry::Other("Polygon".to_string()),
    ];

    let err = ProfileSampler::default().sample_lines(&dem, &lines).unwrap_err();
    match err {
        HydroError::InvalidGeometry {
            index,
            geometry_type,
        } => {
            assert_eq!(index, 1);
            assert_eq!(geometry_type, "Polygon");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_rotated_raster_is_fatal() {
    let raster = RasterGrid::filled(
        4,
        4,
        1.0,
        GeoTransform::from_gdal([0.0, 1.0, 0.1, 4.0, 0.0, -1.0]),
        None,
    );
    let lines = vec![InputGeometry::line_string([(1.0, 1.0), (2.0, 2.0)])];
    assert!(matches!(
        ProfileSampler::default().sample_lines(&raster, &lines),
        Err(HydroError::UnsupportedGeoTransform { .. })
    ));
}

// ============================================================================
// Horseshoe mode tests
// ============================================================================

#[test]
fn test_horseshoe_default_sample_distance() {
    let dem = plane_dem();
    let output = ProfileSampler::default()
        .sample_horseshoes(&dem, &[horseshoe()])
        .unwrap();

    // profiles are 4 m long, default spacing is sqrt(2)/2
    let expected = horseshoe_sample_count(4.0, 4.0, 0.5 * 2f64.sqrt());
    assert_eq!(expected, 7);
    assert_eq!(output.lines.len(), expected);
    assert_eq!(output.counters.valid, 1);
    assert_eq!(output.counters.processed, 1);
}

#[test]
fn test_horseshoe_lines_join_matching_profile_positions() {
    let dem = plane_dem();
    let config = SamplerConfig::default().with_max_sample_dist(1.0);
    let output = ProfileSampler::new(config)
        .sample_horseshoes(&dem, &[horseshoe()])
        .unwrap();

    // ceil(4 / 1) + 1 samples at t = 0, 0.25, .., 1
    assert_eq!(output.lines.len(), 5);
    for (k, line) in output.lines.iter().enumerate() {
        let t = k as f64 / 4.0;
        let open = line.vertices[0];
        let closed = line.vertices[1];
        assert_approx_eq!(open.x, 5.0 + 4.0 * t, 1e-12);
        assert_approx_eq!(open.y, 5.0, 1e-12);
        assert_approx_eq!(closed.x, 5.0 + 4.0 * t, 1e-12);
        assert_approx_eq!(closed.y, 8.0, 1e-12);
        assert_approx_eq!(open.z, plane_z(open.x, open.y), 1e-9);
        assert_approx_eq!(closed.z, plane_z(closed.x, closed.y), 1e-9);
    }
}

#[test]
fn test_horseshoe_single_missing_sample_discards_all() {
    let config = SamplerConfig::default().with_max_sample_dist(2.0);
    let sampler = ProfileSampler::new(config);

    let dem = flat_dem();
    let output = sampler.sample_horseshoes(&dem, &[horseshoe()]).unwrap();
    assert_eq!(output.lines.len(), 3);

    // Only the closed-profile sample at t = 1, (9, 8), touches this pixel.
    let mut dem = flat_dem();
    punch_nodata(&mut dem, &[(11, 9)]);
    let output = sampler.sample_horseshoes(&dem, &[horseshoe()]).unwrap();

    assert!(output.lines.is_empty());
    assert_eq!(output.counters.processed, 1);
    assert_eq!(output.counters.valid, 0);
    assert_eq!(output.counters.invalid_nodata, 1);
}

#[test]
fn test_horseshoe_point_count_mismatch_is_counted() {
    let dem = plane_dem();
    let geometries = vec![
        horseshoe(),
        InputGeometry::line_string([(1.0, 1.0), (2.0, 2.0)]),
        InputGeometry::line_string([(1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0), (1.0, 1.0)]),
    ];
    let output = ProfileSampler::default()
        .sample_horseshoes(&dem, &geometries)
        .unwrap();
    assert_eq!(output.counters.processed, 1);
    assert_eq!(output.counters.shape_mismatch, 2);
    assert_eq!(output.counters.valid, 1);
}

#[test]
fn test_horseshoe_invalid_sample_distance() {
    let config = SamplerConfig::default().with_max_sample_dist(-1.0);
    let result = ProfileSampler::new(config).sample_horseshoes(&plane_dem(), &[horseshoe()]);
    assert!(matches!(result, Err(HydroError::InvalidConfig(_))));
}

#[test]
fn test_horseshoe_tiny_sample_distance_rejected() {
    // 4 m profiles at 1e-9 m spacing
    let config = SamplerConfig::default().with_max_sample_dist(1e-9);
    let result = ProfileSampler::new(config).sample_horseshoes(&plane_dem(), &[horseshoe()]);
    assert!(matches!(result, Err(HydroError::InvalidConfig(_))));
}

// ============================================================================
// Determinism tests
// ============================================================================

fn mixed_inputs() -> Vec<InputGeometry> {
    (0..40)
        .map(|i| {
            let o = 0.37 * i as f64;
            match i % 4 {
                0 => InputGeometry::line_string([(o, 1.0 + o), (o + 2.0, 3.0 + 0.5 * o)]),
                1 => InputGeometry::line_string([(1.0, o), (25.0, o)]),
                2 => InputGeometry::line_string([(o, 2.0), (o + 1.0, 2.5), (o, 3.0)]),
                _ => InputGeometry::line_string([(o + 0.1, 9.9), (o + 1.7, 4.2)]),
            }
        })
        .collect()
}

#[test]
fn test_sampling_is_idempotent() {
    let dem = plane_dem();
    let inputs = mixed_inputs();
    let sampler = ProfileSampler::default();

    let first = sampler.sample_lines(&dem, &inputs).unwrap();
    let second = sampler.sample_lines(&dem, &inputs).unwrap();

    assert_eq!(first.counters, second.counters);
    assert_eq!(
        serde_json::to_string(&first.lines).unwrap(),
        serde_json::to_string(&second.lines).unwrap()
    );
}

#[test]
fn test_parallel_matches_sequential() {
    let dem = plane_dem();
    let inputs = mixed_inputs();

    let sequential = ProfileSampler::new(SamplerConfig::default())
        .sample_lines(&dem, &inputs)
        .unwrap();
    let parallel = ProfileSampler::new(SamplerConfig::default().with_parallel(true))
        .sample_lines(&dem, &inputs)
        .unwrap();

    assert_eq!(sequential, parallel);
    assert_eq!(sequential.counters.shape_mismatch, 10);
}
