use crate::common::InvalidSetting;
use crate::domain::SpecfitError;
use crate::numerics::LocatorError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpectrumError {
    #[error("wavelength grid must contain at least one pixel")]
    EmptyGrid,
    #[error("wavelength grid entry must be finite at index {index}, got {value}")]
    NonFiniteWavelength { index: usize, value: f64 },
    #[error(
        "wavelength grid must be strictly increasing, index {index} has {current} after {previous}"
    )]
    NonIncreasingWavelength {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("{field} length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("continuum requires at least {minimum} control points, got {actual}")]
    TooFewControlPoints { minimum: usize, actual: usize },
    #[error("continuum control point {index} must be finite, got ({x}, {y})")]
    NonFiniteControlPoint { index: usize, x: f64, y: f64 },
    #[error(
        "continuum control points must be strictly increasing in x, index {index} has {current} after {previous}"
    )]
    NonIncreasingControlPoints {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("absorption line {index} has invalid {field}: {value}")]
    InvalidLine {
        index: usize,
        field: &'static str,
        value: f64,
    },
    #[error("wavelength window {index} must be finite with start <= end, got [{start}, {end})")]
    InvalidWindow { index: usize, start: f64, end: f64 },
    #[error(transparent)]
    InvalidSettings(#[from] InvalidSetting),
    #[error(
        "incremental continuum update needs a control point index in 3..={max} for {len} points, got {index}"
    )]
    UpdateIndexNearEdge { index: usize, len: usize, max: i64 },
    #[error("wavelength window {index} {endpoint} is not on the grid: {source}")]
    WindowIndexNotFound {
        index: usize,
        endpoint: &'static str,
        #[source]
        source: LocatorError,
    },
    #[error("continuum spline spans [{start}, {end}) and covers no grid pixel")]
    ContinuumOffGrid { start: f64, end: f64 },
    #[error(
        "wavelength window {index} pixels {start}..{end} extend outside the continuum coverage {covered_start}..{covered_end}"
    )]
    WindowOutsideContinuum {
        index: usize,
        start: usize,
        end: usize,
        covered_start: usize,
        covered_end: usize,
    },
    #[error("chi-squared returned an impossible value: {value}")]
    ImpossibleChiSquared { value: f64 },
}

impl SpectrumError {
    pub const fn placeholder(&self) -> &'static str {
        match self {
            Self::EmptyGrid | Self::NonFiniteWavelength { .. } | Self::NonIncreasingWavelength { .. } => {
                "INPUT.GRID"
            }
            Self::LengthMismatch { .. } => "INPUT.LENGTH",
            Self::TooFewControlPoints { .. }
            | Self::NonFiniteControlPoint { .. }
            | Self::NonIncreasingControlPoints { .. } => "INPUT.CONTROL_POINTS",
            Self::InvalidLine { .. } => "INPUT.LINE",
            Self::InvalidWindow { .. } | Self::WindowOutsideContinuum { .. } => "INPUT.WINDOW",
            Self::InvalidSettings(_) => "INPUT.SETTINGS",
            Self::UpdateIndexNearEdge { .. } => "INPUT.UPDATE_INDEX",
            Self::WindowIndexNotFound { .. } => "RUN.INDEX_NOT_FOUND",
            Self::ContinuumOffGrid { .. } => "RUN.CONTINUUM_COVERAGE",
            Self::ImpossibleChiSquared { .. } => "SYS.CHI2",
        }
    }
}

impl From<SpectrumError> for SpecfitError {
    fn from(error: SpectrumError) -> Self {
        let placeholder = error.placeholder();
        let message = error.to_string();
        match error {
            SpectrumError::WindowIndexNotFound { .. } | SpectrumError::ContinuumOffGrid { .. } => {
                SpecfitError::computation(placeholder, message)
            }
            SpectrumError::ImpossibleChiSquared { .. } => SpecfitError::internal(placeholder, message),
            _ => SpecfitError::input_validation(placeholder, message),
        }
    }
}
