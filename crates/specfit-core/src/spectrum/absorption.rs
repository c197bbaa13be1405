//! Voigt absorbers composited onto a continuum.
//!
//! Every line touches only its local support: the optical depth is evaluated
//! at the center pixel and then pixel by pixel outwards until it drops below
//! `tau_threshold`. Updates are multiplicative, so the composite does not
//! depend on the order the lines are applied in.

use super::SpectrumError;
use super::validate::{validate_grid, validate_length, validate_lines};
use crate::common::constants::{
    CLASSICAL_LINE_STRENGTH, DOPPLER_FREQUENCY_SCALE, PI, SPEED_OF_LIGHT_KMS, SQRT_PI,
};
use crate::common::{LineMode, ModelSettings};
use crate::domain::AbsorptionLine;
use crate::numerics::{WaveIndexLocator, voigt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use tracing::{debug, warn};

/// Per-line quantities shared by every pixel of its profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineOpacity {
    center: f64,
    doppler: f64,
    damping: f64,
    strength: f64,
}

impl LineOpacity {
    pub fn new(line: &AbsorptionLine) -> Self {
        let center = line.observed_wavelength();
        let stretch = 1.0 + line.redshift;
        let doppler_frequency = line.doppler / center * DOPPLER_FREQUENCY_SCALE;
        Self {
            center,
            doppler: line.doppler,
            damping: line.gamma / (4.0 * PI * doppler_frequency) / stretch,
            strength: 10.0_f64.powf(line.column_density)
                * CLASSICAL_LINE_STRENGTH
                * line.oscillator_strength
                / (SQRT_PI * doppler_frequency)
                / stretch,
        }
    }

    /// Observed-frame line center.
    pub fn center(&self) -> f64 {
        self.center
    }

    /// Voigt damping parameter `a`.
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Optical depth per unit Voigt function.
    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn optical_depth(&self, wavelength: f64) -> f64 {
        let velocity_offset = SPEED_OF_LIGHT_KMS / self.doppler * (wavelength / self.center - 1.0);
        self.strength * voigt(velocity_offset, self.damping)
    }

    fn boundary_average(&self, grid: &[f64], pixel: usize) -> f64 {
        let low = 0.5 * (grid[pixel] + grid[pixel - 1]);
        let high = 0.5 * (grid[pixel] + grid[pixel + 1]);
        0.5 * (self.optical_depth(low) + self.optical_depth(high))
    }

    fn center_average(&self, grid: &[f64], pixel: usize, samples: usize) -> f64 {
        let low = 0.5 * (grid[pixel] + grid[pixel - 1]);
        let high = 0.5 * (grid[pixel] + grid[pixel + 1]);
        let step = (high - low) / samples as f64;
        let total: f64 = (0..samples)
            .map(|sample| self.optical_depth(low + (sample as f64 + 0.5) * step))
            .sum();
        total / samples as f64
    }
}

/// Truncated optical-depth profile of a single line on the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct LineProfile {
    pub start: usize,
    pub optical_depths: Vec<f64>,
    pub mode: LineMode,
}

impl LineProfile {
    pub fn pixels(&self) -> Range<usize> {
        self.start..self.start + self.optical_depths.len()
    }

    /// Multiplicative factor per pixel of [`Self::pixels`].
    pub fn factors(&self) -> impl Iterator<Item = f64> + '_ {
        let sign = match self.mode {
            LineMode::Absorption => -1.0,
            LineMode::Emission => 1.0,
        };
        self.optical_depths.iter().map(move |tau| (sign * tau).exp())
    }

    pub fn apply(&self, model: &mut [f64]) {
        let pixels = &mut model[self.pixels()];
        for (value, tau) in pixels.iter_mut().zip(&self.optical_depths) {
            match self.mode {
                LineMode::Absorption => *value /= tau.exp(),
                LineMode::Emission => *value *= tau.exp(),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    CenterOffGrid {
        tolerance: f64,
    },
    NearEdge {
        center_pixel: usize,
        len: usize,
        margin: usize,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CenterOffGrid { tolerance } => {
                write!(f, "no grid pixel within {tolerance:.3e} of the line center")
            }
            Self::NearEdge {
                center_pixel,
                len,
                margin,
            } => write!(
                f,
                "center pixel {center_pixel} is within {margin} pixels of an end of {len}"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SkippedLine {
    pub index: usize,
    pub center_wavelength: f64,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeSpectrum {
    pub model: Vec<f64>,
    pub skipped: Vec<SkippedLine>,
}

/// Computes one line's truncated profile, or why it cannot be placed.
///
/// `grid` must already be validated as strictly increasing.
pub fn line_profile(
    grid: &[f64],
    line: &AbsorptionLine,
    settings: &ModelSettings,
) -> Result<LineProfile, SkipReason> {
    let opacity = LineOpacity::new(line);
    let locator = WaveIndexLocator::new(settings.velocity_dispersion_kms);
    let len = grid.len();

    let center = locator
        .locate(grid, opacity.center())
        .map_err(|_| SkipReason::CenterOffGrid {
            tolerance: locator.tolerance(opacity.center()),
        })?;
    let margin = settings.edge_margin;
    if center < margin || center + margin >= len {
        return Err(SkipReason::NearEdge {
            center_pixel: center,
            len,
            margin,
        });
    }

    let center_tau = opacity.center_average(grid, center, settings.center_samples);

    let mut blue = Vec::new();
    let mut tau = center_tau;
    let mut pixel = center;
    while tau > settings.tau_threshold && pixel > 1 {
        pixel -= 1;
        tau = opacity.boundary_average(grid, pixel);
        blue.push(tau);
    }
    let start = pixel;

    let mut red = Vec::new();
    tau = center_tau;
    pixel = center;
    while tau > settings.tau_threshold && pixel + 3 < len {
        pixel += 1;
        tau = opacity.boundary_average(grid, pixel);
        red.push(tau);
    }

    let mut optical_depths = Vec::with_capacity(blue.len() + 1 + red.len());
    optical_depths.extend(blue.iter().rev());
    optical_depths.push(center_tau);
    optical_depths.extend(red);

    debug!(
        center_wavelength = opacity.center(),
        center_pixel = center,
        start,
        width = optical_depths.len(),
        center_tau,
        "line support"
    );
    Ok(LineProfile {
        start,
        optical_depths,
        mode: settings.line_mode,
    })
}

/// Applies every line to a copy of `continuum`, reporting lines that could not
/// be placed instead of failing.
pub fn composite_absorbers(
    grid: &[f64],
    continuum: &[f64],
    lines: &[AbsorptionLine],
    settings: &ModelSettings,
) -> Result<CompositeSpectrum, SpectrumError> {
    validate_grid(grid)?;
    validate_length("continuum", grid.len(), continuum.len())?;
    validate_lines(lines)?;
    settings.validate()?;

    let mut model = continuum.to_vec();
    let mut skipped = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        match line_profile(grid, line, settings) {
            Ok(profile) => profile.apply(&mut model),
            Err(reason) => {
                let center_wavelength = line.observed_wavelength();
                warn!(
                    line = index,
                    center_wavelength,
                    %reason,
                    "absorption line skipped"
                );
                skipped.push(SkippedLine {
                    index,
                    center_wavelength,
                    reason,
                });
            }
        }
    }

    Ok(CompositeSpectrum { model, skipped })
}

/// Rest-frame oscillator strength and column density expressed as an
/// observed-frame equivalent width in Angstrom, valid while the line is
/// optically thin.
pub fn optically_thin_equivalent_width(line: &AbsorptionLine) -> f64 {
    10.0_f64.powf(line.column_density)
        * CLASSICAL_LINE_STRENGTH
        * line.oscillator_strength
        * line.rest_wavelength
        * line.rest_wavelength
        * (1.0 + line.redshift)
        / (DOPPLER_FREQUENCY_SCALE * SPEED_OF_LIGHT_KMS)
}
