use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn scenario_request() -> Value {
    let wavelength: Vec<f64> = (0..21).map(|index| 4000.0 + 0.5 * index as f64).collect();
    json!({
        "wavelength": wavelength,
        "flux": vec![1.0; 21],
        "uncertainty": vec![0.1; 21],
        "continuum_x": [4000.0, 4003.0, 4007.0, 4010.0],
        "continuum_y": [1.0, 1.0, 1.0, 1.0],
        "column_density": [13.0, 13.0],
        "doppler": [20.0, 20.0],
        "redshift": [0.0, 0.0],
        "rest_wavelength": [4004.0, 4001.0],
        "gamma": [6.27e8, 6.27e8],
        "oscillator_strength": [0.416, 0.416],
        "window_starts": [4003.5],
        "window_ends": [4006.5]
    })
}

fn write_json(path: &Path, value: &Value) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent directory should be created");
    }
    fs::write(
        path,
        serde_json::to_string_pretty(value).expect("json should serialise"),
    )
    .expect("json should be written");
}

fn run_specfit(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_specfit"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("specfit should run")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp path should be valid UTF-8")
}

#[test]
fn evaluate_writes_report_with_null_outside_coverage() {
    let temp = TempDir::new().expect("tempdir should be created");
    let request_path = temp.path().join("request.json");
    let report_path = temp.path().join("out/report.json");
    write_json(&request_path, &scenario_request());

    let output = run_specfit(&[
        "evaluate",
        "--input",
        path_arg(&request_path),
        "--output",
        path_arg(&report_path),
    ]);

    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Evaluation status: OK"), "stdout: {stdout}");
    assert!(stdout.contains("skipped lines: 1"), "stdout: {stdout}");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("absorption line skipped"),
        "skipped line should be logged at warn, stderr: {stderr}"
    );

    let report: Value = serde_json::from_str(
        &fs::read_to_string(&report_path).expect("report should be written"),
    )
    .expect("report should be valid JSON");
    assert_eq!(report["pixels"], 21);
    assert_eq!(report["covered_start"], 7);
    assert_eq!(report["covered_end"], 14);
    assert!(report["continuum"][0].is_null());
    assert!(report["continuum"][7].is_number());
    assert_eq!(report["skipped"][0]["index"], 1);
    assert_eq!(report["skipped"][0]["reason"]["kind"], "near_edge");
    assert_eq!(report["windows"][0]["pixels"]["start"], 7);
    assert_eq!(report["windows"][0]["pixels"]["end"], 13);

    let chi_squared = report["chi_squared"].as_f64().expect("chi-squared is a number");
    assert!(chi_squared > 48.0 && chi_squared < 49.0, "chi_squared={chi_squared}");
}

#[test]
fn settings_file_switches_to_emission() {
    let temp = TempDir::new().expect("tempdir should be created");
    let request_path = temp.path().join("request.json");
    let settings_path = temp.path().join("settings.json");
    let report_path = temp.path().join("report.json");
    write_json(&request_path, &scenario_request());
    write_json(&settings_path, &json!({ "line_mode": "emission" }));

    let output = run_specfit(&[
        "evaluate",
        "--input",
        path_arg(&request_path),
        "--settings",
        path_arg(&settings_path),
        "--output",
        path_arg(&report_path),
    ]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report: Value =
        serde_json::from_str(&fs::read_to_string(&report_path).expect("report should exist"))
            .expect("report should be valid JSON");
    assert_eq!(report["settings"]["line_mode"], "emission");
    let peak = report["model"][8].as_f64().expect("model pixel is a number");
    assert!(peak > 2.5, "emission should raise the center pixel, got {peak}");
}

#[test]
fn window_endpoint_off_grid_exits_with_computation_code() {
    let temp = TempDir::new().expect("tempdir should be created");
    let request_path = temp.path().join("request.json");
    let mut request = scenario_request();
    request["window_ends"] = json!([4006.25]);
    write_json(&request_path, &request);

    let output = run_specfit(&[
        "evaluate",
        "--input",
        path_arg(&request_path),
        "--output",
        path_arg(&temp.path().join("report.json")),
    ]);

    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: [RUN.INDEX_NOT_FOUND]"), "stderr: {stderr}");
    assert!(stderr.contains("FATAL EXIT CODE: 4"), "stderr: {stderr}");
}

#[test]
fn malformed_inputs_exit_with_input_code() {
    let temp = TempDir::new().expect("tempdir should be created");
    let request_path = temp.path().join("request.json");
    let mut request = scenario_request();
    request["continuum_x"] = json!([4000.0, 4003.0, 4010.0]);
    request["continuum_y"] = json!([1.0, 1.0, 1.0]);
    write_json(&request_path, &request);

    let output = run_specfit(&["evaluate", "--input", path_arg(&request_path)]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[INPUT.CONTROL_POINTS]"), "stderr: {stderr}");
}

#[test]
fn missing_request_file_exits_with_io_code() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = run_specfit(&[
        "evaluate",
        "--input",
        path_arg(&temp.path().join("absent.json")),
    ]);

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read request"));
}

#[test]
fn grid_prints_wavelengths_as_json() {
    let output = run_specfit(&[
        "grid", "--crval", "4000", "--cdelt", "0.5", "--crpix", "0", "--len", "4",
    ]);

    assert!(output.status.success());
    let grid: Vec<f64> =
        serde_json::from_slice(&output.stdout).expect("grid output should be a JSON array");
    assert_eq!(grid, vec![4000.0, 4000.5, 4001.0, 4001.5]);
}

#[test]
fn grid_rejects_non_increasing_scale() {
    let output = run_specfit(&[
        "grid", "--crval", "4000", "--cdelt", "0", "--crpix", "0", "--len", "4",
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[INPUT.SCALE]"));
}
