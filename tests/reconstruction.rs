use fbp::{
    phantom::{HollowSphere, Scanner},
    CancelToken, ConeParameters, FilterKind, Pose, ProjectionImage, ProjectionSet,
    Reconstruction, Volume, FOV,
};
use float_eq::assert_float_eq;
use ndarray::Array2;
use units::{degree, mm, Angle};

fn scan(recon: Reconstruction, step: Angle, n_views: usize) -> ProjectionSet {
    let views = Scanner::new(HollowSphere::reference(recon.fov), recon).scan(step, n_views);
    ProjectionSet::from_views(recon.detector, n_views, step, views).unwrap()
}

/// Mean voxel value over the voxels whose distance from the isocentre (in
/// voxel units) lies in `lo..hi`
fn band_mean(volume: &Volume, lo: f32, hi: f32) -> f32 {
    let fov = volume.fov;
    let (sum, count) = (0..fov.n_voxels())
        .map(|i| {
            let [x, y, z] = fov.voxel_position1(i).map(|l| units::mm_(l) / units::mm_(fov.voxel_size));
            ((x * x + y * y + z * z).sqrt(), volume[i])
        })
        .filter(|(r, _)| (lo..hi).contains(r))
        .fold((0.0, 0), |(s, n), (_, v)| (s + v, n + 1));
    assert!(count > 0, "empty band {lo}..{hi}");
    sum / count as f32
}

fn mean_abs_difference(a: &Volume, b: &Volume) -> f32 {
    assert_eq!(a.data.len(), b.data.len());
    let total: f32 = a.data.iter().zip(&b.data).map(|(x, y)| (x - y).abs()).sum();
    total / a.data.len() as f32
}

// ----- Determinism --------------------------------------------------------------------
#[test]
fn repeated_runs_are_bit_identical() {
    let recon = Reconstruction::parallel(16, 16);
    let views = Scanner::new(HollowSphere::reference(recon.fov), recon)
        .with_noise(0.05, 7).unwrap()
        .scan(degree(4.0), 45);
    let set = ProjectionSet::from_views(16, 45, degree(4.0), views).unwrap();

    let one  = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
    let many = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();
    let a = one .install(|| recon.run(&set)).unwrap();
    let b = many.install(|| recon.run(&set)).unwrap();
    let c = recon.run(&set).unwrap();
    assert_eq!(a.data, b.data);
    assert_eq!(a.data, c.data);
}

// ----- Normalization bounds -----------------------------------------------------------
#[test]
fn reconstruction_spans_unit_interval() {
    let recon = Reconstruction::parallel(16, 16);
    let volume = recon.run(&scan(recon, degree(2.0), 90)).unwrap();
    assert!(volume.data.iter().all(|v| (0.0..=1.0).contains(v)));
    assert!(volume.data.iter().any(|&v| v == 0.0));
    assert!(volume.data.iter().any(|&v| v == 1.0));
}

#[test]
fn no_views_reconstructs_to_zero() {
    let set = ProjectionSet::new(8, 10, degree(1.0));
    let volume = fbp::reconstruct(&set, &Reconstruction::parallel(8, 8)).unwrap();
    assert!(volume.data.iter().all(|&v| v == 0.0));
}

// ----- Geometric identity -------------------------------------------------------------
#[test]
fn single_constant_view_accumulates_c_over_d_squared() {
    let (d, c) = (16, 0.6);
    let mut set = ProjectionSet::new(d, 1, degree(1.0));
    set.append(ProjectionImage::filled(d, c), Pose::Angle(degree(0.0))).unwrap();
    for filter in [FilterKind::None, FilterKind::Cutoff] {
        let (raw, _) = Reconstruction::parallel(d, d).with_filter(filter).accumulate(&set).unwrap();
        for &v in &raw.data {
            assert_float_eq!(v, c / (d * d) as f32, rmax <= 1e-5);
        }
    }
}

#[test]
fn bright_pixel_smears_along_ray() {
    let d = 8;
    let mut pixels = Array2::zeros((d, d));
    pixels[(2, 5)] = 1.0;
    let mut set = ProjectionSet::new(d, 1, degree(1.0));
    set.append(ProjectionImage::new(pixels).unwrap(), Pose::Angle(degree(0.0))).unwrap();
    let (raw, _) = Reconstruction::parallel(d, d).with_filter(FilterKind::None).accumulate(&set).unwrap();
    for z in 0..d { for y in 0..d { for x in 0..d {
        let expected = if (x, y) == (5, 2) { 1.0 / 64.0 } else { 0.0 };
        assert_eq!(raw[[x, y, z]], expected, "voxel {x} {y} {z}");
    }}}
}

// ----- Bounds skipping ----------------------------------------------------------------
#[test]
fn voxels_beyond_detector_rows_stay_zero() {
    // Volume twice as tall as the detector: the top and bottom quarters never
    // project onto it, whatever the angle.
    let (d, v) = (8, 16);
    let views = (0..12).map(|n| (ProjectionImage::filled(d, 1.0), Pose::Angle(degree(15.0 * n as f32))));
    let set = ProjectionSet::from_views(d, 12, degree(15.0), views).unwrap();
    let (raw, _) = Reconstruction::parallel(d, v).with_filter(FilterKind::None).accumulate(&set).unwrap();
    for z in 0..v { for y in 0..v { for x in 0..v {
        let value = raw[[x, y, z]];
        if !(4..12).contains(&y) { assert_eq!(value, 0.0, "voxel {x} {y} {z}") }
    }}}
    assert!(raw[[8, 8, 8]] > 0.0);
}

// ----- Rotational symmetry: the hollow-sphere scenario ---------------------------------
#[test]
fn hollow_sphere_is_recovered_with_ramp_filter() {
    let recon = Reconstruction::parallel(32, 32).with_filter(FilterKind::Ramp);
    let volume = recon.run(&scan(recon, degree(2.0), 180)).unwrap();
    // True shell spans radii 4 .. 12
    let shell   = band_mean(&volume,  6.0, 10.0);
    let centre  = band_mean(&volume,  0.0,  2.0);
    let corners = band_mean(&volume, 16.0, 30.0);
    assert!(shell > 0.5, "shell {shell}");
    assert!(centre  < 0.35, "centre {centre}");
    assert!(corners < 0.35, "corners {corners}");
    assert!(shell - centre > 0.25);
}

#[test]
fn hollow_sphere_shell_stands_out_with_default_filter() {
    let recon = Reconstruction::parallel(32, 32);
    let volume = recon.run(&scan(recon, degree(2.0), 180)).unwrap();
    let shell   = band_mean(&volume,  6.0, 10.0);
    let centre  = band_mean(&volume,  0.0,  2.0);
    let corners = band_mean(&volume, 16.0, 30.0);
    assert!(shell > centre , "shell {shell} centre {centre}");
    assert!(shell > corners, "shell {shell} corners {corners}");
}

#[test]
fn reconstruction_is_symmetric_about_rotation_axis() {
    let recon = Reconstruction::parallel(16, 16).with_filter(FilterKind::Ramp);
    let volume = recon.run(&scan(recon, degree(2.0), 180)).unwrap();
    // Quarter turns about y map the voxel grid onto itself
    let (c, r) = (8, 4);
    let ring = [volume[[c + r, c, c]], volume[[c, c, c + r]], volume[[c - r, c, c]], volume[[c, c, c - r]]];
    for v in ring { assert_float_eq!(v, ring[0], abs <= 0.05) }
}

// ----- Cone beam versus parallel beam ---------------------------------------------------
fn cone_at(distance: f32, d: usize) -> Reconstruction {
    let params = ConeParameters {
        detector_width   : mm(d as f32),
        source_distance  : mm(distance),
        detector_distance: mm(distance),
    };
    Reconstruction::cone(d, FOV::unit(d), params)
}

#[test]
fn cone_beam_differs_from_parallel_beam_at_finite_distance() {
    let d = 16;
    let (step, n) = (degree(4.0), 90);
    let parallel = Reconstruction::parallel(d, d);
    let cone = cone_at(24.0, d);
    let p = parallel.run(&scan(parallel, step, n)).unwrap();
    let c = cone    .run(&scan(cone    , step, n)).unwrap();
    assert_ne!(p.data, c.data);
}

#[test]
fn cone_beam_converges_to_parallel_beam_as_source_recedes() {
    let d = 16;
    let (step, n) = (degree(4.0), 90);
    let parallel = Reconstruction::parallel(d, d);
    let reference = parallel.run(&scan(parallel, step, n)).unwrap();
    let difference = |distance| {
        let cone = cone_at(distance, d);
        mean_abs_difference(&cone.run(&scan(cone, step, n)).unwrap(), &reference)
    };
    let near = difference(24.0);
    let far  = difference(1.0e5);
    assert!(far < near, "near {near} far {far}");
    assert!(far < 1e-2, "far {far}");
}

#[test]
fn cone_voxels_behind_source_are_skipped() {
    // Source inside the volume: some voxels lie at or behind it
    let d = 8;
    let params = ConeParameters { detector_width: mm(8.0), source_distance: mm(2.0), detector_distance: mm(4.0) };
    let recon = Reconstruction::cone(d, FOV::unit(d), params);
    let set = ProjectionSet::from_views(d, 4, degree(90.0),
        (0..4).map(|n| (ProjectionImage::filled(d, 1.0), Pose::Angle(degree(90.0 * n as f32))))).unwrap();
    let out = recon.run_with_cancel(&set, &CancelToken::new()).unwrap();
    assert!(out.stats.singular > 0);
    assert!(out.volume.data.iter().all(|v| v.is_finite()));
}
