use super::CliError;
use anyhow::Context;
use serde::Serialize;
use specfit_core::common::{ModelSettings, SettingsError, WavelengthScale, load_model_settings};
use specfit_core::domain::SpecfitError;
use specfit_core::spectrum::{SkippedLine, SpectrumEvaluation, SpectrumRequest, WindowContribution};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(clap::Args)]
pub(super) struct EvaluateArgs {
    /// JSON request with parallel observation, continuum, line and window arrays
    #[arg(long)]
    input: PathBuf,

    /// JSON model settings overriding those embedded in the request
    #[arg(long)]
    settings: Option<PathBuf>,

    /// JSON report output path
    #[arg(long, default_value = "specfit-report.json")]
    output: PathBuf,
}

#[derive(clap::Args)]
pub(super) struct GridArgs {
    /// Wavelength at the reference pixel
    #[arg(long, allow_negative_numbers = true)]
    crval: f64,

    /// Step per pixel, in wavelength or log10 wavelength
    #[arg(long)]
    cdelt: f64,

    /// Reference pixel
    #[arg(long, allow_negative_numbers = true)]
    crpix: f64,

    /// Number of pixels
    #[arg(long)]
    len: usize,

    /// Treat crval and cdelt as log10 wavelength
    #[arg(long)]
    log_linear: bool,
}

#[derive(Debug, Serialize)]
struct EvaluationReport<'a> {
    pixels: usize,
    covered_start: usize,
    covered_end: usize,
    chi_squared: f64,
    settings: ModelSettings,
    continuum: Vec<Option<f64>>,
    model: Vec<Option<f64>>,
    windows: &'a [WindowContribution],
    skipped: &'a [SkippedLine],
}

impl<'a> EvaluationReport<'a> {
    fn new(evaluation: &'a SpectrumEvaluation, settings: ModelSettings) -> Self {
        Self {
            pixels: evaluation.model.len(),
            covered_start: evaluation.covered.start,
            covered_end: evaluation.covered.end,
            chi_squared: evaluation.chi_squared,
            settings,
            continuum: finite_or_null(&evaluation.continuum),
            model: finite_or_null(&evaluation.model),
            windows: &evaluation.windows,
            skipped: &evaluation.skipped,
        }
    }
}

pub(super) fn run_evaluate_command(args: EvaluateArgs) -> Result<i32, CliError> {
    let mut request = load_request(&args.input)?;
    if let Some(path) = &args.settings {
        request.settings = load_model_settings(path).map_err(settings_error)?;
    }

    let evaluation = request
        .evaluate()
        .map_err(|error| CliError::Compute(error.into()))?;
    info!(
        pixels = evaluation.model.len(),
        lines = request.column_density.len(),
        windows = evaluation.windows.len(),
        "evaluation finished"
    );

    println!("{}", render_human_summary(&evaluation));
    write_report(&args.output, &EvaluationReport::new(&evaluation, request.settings))?;
    println!("JSON report: {}", args.output.display());
    Ok(0)
}

pub(super) fn run_grid_command(args: GridArgs) -> Result<i32, CliError> {
    let scale = WavelengthScale {
        crval: args.crval,
        cdelt: args.cdelt,
        crpix: args.crpix,
        log_linear: args.log_linear,
    };
    let grid = scale.grid(args.len).map_err(|error| {
        CliError::Compute(SpecfitError::input_validation(
            "INPUT.SCALE",
            error.to_string(),
        ))
    })?;

    let rendered = serde_json::to_string(&grid).context("failed to serialise wavelength grid")?;
    println!("{rendered}");
    Ok(0)
}

fn load_request(path: &Path) -> Result<SpectrumRequest, CliError> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read request '{}'", path.display()))?;
    serde_json::from_str(&source).map_err(|error| {
        CliError::Compute(SpecfitError::input_validation(
            "INPUT.REQUEST",
            format!("failed to parse request '{}': {}", path.display(), error),
        ))
    })
}

fn settings_error(error: SettingsError) -> CliError {
    let message = error.to_string();
    CliError::Compute(match error {
        SettingsError::Read { .. } => SpecfitError::io_system("IO.SETTINGS", message),
        SettingsError::Invalid(_) | SettingsError::Parse { .. } => {
            SpecfitError::input_validation("INPUT.SETTINGS", message)
        }
    })
}

fn write_report(path: &Path, report: &EvaluationReport<'_>) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create report directory '{}'", parent.display()))?;
    }
    let rendered = serde_json::to_string_pretty(report).context("failed to serialise report")?;
    fs::write(path, rendered)
        .with_context(|| format!("failed to write report '{}'", path.display()))?;
    Ok(())
}

fn render_human_summary(evaluation: &SpectrumEvaluation) -> String {
    format!(
        "Evaluation status: OK | pixels: {} | continuum: {}..{} | skipped lines: {} | chi-squared: {:.6e}",
        evaluation.model.len(),
        evaluation.covered.start,
        evaluation.covered.end,
        evaluation.skipped.len(),
        evaluation.chi_squared
    )
}

fn finite_or_null(values: &[f64]) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|value| value.is_finite().then_some(*value))
        .collect()
}
