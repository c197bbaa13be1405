use serde::Deserialize;
use specfit_core::common::{LineMode, ModelSettings};
use specfit_core::domain::{
    AbsorptionLine, ContinuumPoint, SpecfitError, SpecfitErrorCategory, WavelengthWindow,
};
use specfit_core::numerics::WaveIndexLocator;
use specfit_core::spectrum::{
    SpectrumError, SpectrumKernel, SpectrumModelApi, SpectrumRequest, evaluate_continuum,
    update_continuum_region,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[derive(Debug, Deserialize)]
struct ScenarioFixture {
    request: SpectrumRequest,
    expected: ScenarioExpectation,
}

#[derive(Debug, Deserialize)]
struct ScenarioExpectation {
    covered: [usize; 2],
    tolerance: f64,
    model: BTreeMap<usize, f64>,
    window_pixels: [usize; 2],
}

fn load_fixture(name: &str) -> ScenarioFixture {
    let path = fixture_path(name);
    let source = fs::read_to_string(&path)
        .unwrap_or_else(|error| panic!("failed to read '{}': {error}", path.display()));
    serde_json::from_str(&source)
        .unwrap_or_else(|error| panic!("failed to parse '{}': {error}", path.display()))
}

fn assert_close(label: &str, expected: f64, actual: f64, tolerance: f64) {
    assert!(
        (expected - actual).abs() <= tolerance,
        "{label} expected={expected:.15e} actual={actual:.15e} tolerance={tolerance:.3e}"
    );
}

#[test]
fn single_absorber_fixture_matches_reference_model() {
    let fixture = load_fixture("single_absorber.json");
    let evaluation = fixture
        .request
        .evaluate()
        .expect("fixture request should evaluate");
    let expected = &fixture.expected;

    assert_eq!(evaluation.covered, expected.covered[0]..expected.covered[1]);
    for (pixel, value) in &expected.model {
        assert_close(
            &format!("model[{pixel}]"),
            *value,
            evaluation.model[*pixel],
            expected.tolerance,
        );
    }
    for pixel in 0..evaluation.model.len() {
        if !evaluation.covered.contains(&pixel) {
            assert!(evaluation.continuum[pixel].is_nan(), "continuum[{pixel}]");
            assert!(evaluation.model[pixel].is_nan(), "model[{pixel}]");
        }
    }

    let window = &evaluation.windows[0];
    assert_eq!(
        window.pixels,
        expected.window_pixels[0]..expected.window_pixels[1]
    );
    let recomputed: f64 = window
        .pixels
        .clone()
        .map(|pixel| {
            let residual = (fixture.request.flux[pixel] - evaluation.model[pixel])
                / fixture.request.uncertainty[pixel];
            residual * residual
        })
        .sum();
    assert_close("chi_squared", recomputed, evaluation.chi_squared, 1.0e-12);
}

#[test]
fn fixture_settings_round_trip_through_the_kernel() {
    let mut fixture = load_fixture("single_absorber.json");
    fixture.request.settings = ModelSettings::default().with_line_mode(LineMode::Emission);
    let kernel = SpectrumKernel;

    let request = &fixture.request;
    let points = request.control_points().expect("control points");
    let lines = request.absorption_lines().expect("lines");
    let continuum = kernel
        .continuum(&request.wavelength, &points, &request.settings)
        .expect("continuum");
    let emitted = kernel
        .composite(&request.wavelength, &continuum.values, &lines, &request.settings)
        .expect("emission composite");
    let absorbed = kernel
        .composite(&request.wavelength, &emitted.model, &lines, &ModelSettings::default())
        .expect("absorption composite");

    for pixel in continuum.covered.clone() {
        assert_close(
            &format!("pixel {pixel}"),
            continuum.values[pixel],
            absorbed.model[pixel],
            1.0e-12,
        );
    }
}

#[test]
fn interactive_refit_updates_only_the_moved_neighbourhood() {
    let grid: Vec<f64> = (0..3_001).map(|index| 5000.0 + 0.01 * index as f64).collect();
    let mut points: Vec<ContinuumPoint> = (0..11)
        .map(|index| {
            ContinuumPoint::new(
                5000.0 + 3.0 * index as f64,
                1.0 + 0.1 * (index as f64 * 0.7).sin(),
            )
        })
        .collect();
    let settings = ModelSettings::default();
    let mut curve = evaluate_continuum(&grid, &points, &settings).expect("initial continuum");
    let before = curve.values.clone();

    points[6].y += 0.25;
    let rewritten =
        update_continuum_region(&grid, &points, 6, &settings, &mut curve).expect("update");
    let full = evaluate_continuum(&grid, &points, &settings).expect("full continuum");

    for pixel in curve.covered.clone() {
        assert_close(
            &format!("pixel {pixel}"),
            full.values[pixel],
            curve.values[pixel],
            1.0e-12,
        );
        if !rewritten.contains(&pixel) {
            assert_eq!(before[pixel].to_bits(), curve.values[pixel].to_bits());
        }
    }
    assert!(rewritten.start > curve.covered.start);
    assert!(rewritten.end < curve.covered.end);
}

#[test]
fn window_errors_map_to_computation_category() {
    let fixture = load_fixture("single_absorber.json");
    let kernel = SpectrumKernel;
    let observed = fixture.request.observed();
    let model = vec![1.0; observed.len()];

    let error = kernel
        .chi_squared(
            &observed,
            &model,
            &[WavelengthWindow::new(3990.0, 4004.0)],
            &ModelSettings::default(),
        )
        .expect_err("start lies blueward of the grid");
    assert!(matches!(
        error,
        SpectrumError::WindowIndexNotFound {
            endpoint: "start",
            ..
        }
    ));

    let domain_error = SpecfitError::from(error);
    assert_eq!(domain_error.category(), SpecfitErrorCategory::ComputationError);
    assert_eq!(domain_error.placeholder(), "RUN.INDEX_NOT_FOUND");
}

#[test]
fn locator_agrees_with_grid_for_redshifted_line_centers() {
    let grid: Vec<f64> = (0..2_000).map(|index| 4800.0 + 0.05 * index as f64).collect();
    let locator = WaveIndexLocator::default();
    let line = AbsorptionLine::new(13.0, 25.0, 0.2345, 4000.0, 6.27e8, 0.416);

    let center = locator
        .locate(&grid, line.observed_wavelength())
        .expect("center should be on the grid");

    let target = line.observed_wavelength();
    let tolerance = locator.tolerance(target);
    assert!((grid[center] - target).abs() <= tolerance);
    assert!(center == 0 || (grid[center - 1] - target).abs() > tolerance);
}
