pub mod absorption;
pub mod chi2;
pub mod continuum;
mod error;
pub mod request;
pub(crate) mod validate;

pub use absorption::{
    CompositeSpectrum, LineOpacity, LineProfile, SkipReason, SkippedLine, composite_absorbers,
    line_profile, optically_thin_equivalent_width,
};
pub use chi2::{
    ChiSquaredBreakdown, WindowContribution, chi_squared, chi_squared_breakdown, locate_windows,
};
pub use continuum::{ContinuumCurve, evaluate_continuum, update_continuum_region};
pub use error::SpectrumError;
pub use request::{SpectrumEvaluation, SpectrumModelInput, SpectrumRequest, evaluate_spectrum};

use crate::common::ModelSettings;
use crate::domain::{AbsorptionLine, ContinuumPoint, ObservedSpectrum, WavelengthWindow};

pub trait SpectrumModelApi {
    fn continuum(
        &self,
        grid: &[f64],
        points: &[ContinuumPoint],
        settings: &ModelSettings,
    ) -> Result<ContinuumCurve, SpectrumError>;

    fn composite(
        &self,
        grid: &[f64],
        continuum: &[f64],
        lines: &[AbsorptionLine],
        settings: &ModelSettings,
    ) -> Result<CompositeSpectrum, SpectrumError>;

    fn chi_squared(
        &self,
        observed: &ObservedSpectrum<'_>,
        model: &[f64],
        windows: &[WavelengthWindow],
        settings: &ModelSettings,
    ) -> Result<ChiSquaredBreakdown, SpectrumError>;

    fn evaluate(&self, input: SpectrumModelInput<'_>) -> Result<SpectrumEvaluation, SpectrumError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpectrumKernel;

impl SpectrumModelApi for SpectrumKernel {
    fn continuum(
        &self,
        grid: &[f64],
        points: &[ContinuumPoint],
        settings: &ModelSettings,
    ) -> Result<ContinuumCurve, SpectrumError> {
        evaluate_continuum(grid, points, settings)
    }

    fn composite(
        &self,
        grid: &[f64],
        continuum: &[f64],
        lines: &[AbsorptionLine],
        settings: &ModelSettings,
    ) -> Result<CompositeSpectrum, SpectrumError> {
        composite_absorbers(grid, continuum, lines, settings)
    }

    fn chi_squared(
        &self,
        observed: &ObservedSpectrum<'_>,
        model: &[f64],
        windows: &[WavelengthWindow],
        settings: &ModelSettings,
    ) -> Result<ChiSquaredBreakdown, SpectrumError> {
        chi_squared_breakdown(observed, model, windows, settings)
    }

    fn evaluate(&self, input: SpectrumModelInput<'_>) -> Result<SpectrumEvaluation, SpectrumError> {
        evaluate_spectrum(input)
    }
}
