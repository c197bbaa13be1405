//! Physical constants and reference model parameters.
//!
//! The model defaults mirror the HIRES reduction this forward model was first
//! tuned for; runtime overrides live in [`super::settings::ModelSettings`].

pub const PI: f64 = std::f64::consts::PI;
pub const SQRT_PI: f64 = 1.772_453_850_905_516_027_298_167_483_341_145_2_f64;

/// Speed of light in km/s.
pub const SPEED_OF_LIGHT_KMS: f64 = 2.997_924_58e5_f64;

/// Instrumental velocity dispersion of one resolution element, km/s.
pub const DEFAULT_VELOCITY_DISPERSION_KMS: f64 = 2.14;

pub const DEFAULT_SPLINE_SUBDIVISIONS: usize = 50;
pub const DEFAULT_CENTER_SAMPLES: usize = 10;
pub const DEFAULT_TAU_THRESHOLD: f64 = 1.0e-3;

/// Center pixels closer than this to either end of the grid are skipped.
pub const DEFAULT_EDGE_MARGIN: usize = 3;

/// Converts `b / wavelength` (km/s over Angstrom) into the Doppler frequency width in Hz.
pub const DOPPLER_FREQUENCY_SCALE: f64 = 1.0e13;

/// `pi e^2 / (m_e c)` in cgs units (cm^2 s^-1).
pub const CLASSICAL_LINE_STRENGTH: f64 = 2.647e-2;

pub const MIN_CONTROL_POINTS: usize = 4;
