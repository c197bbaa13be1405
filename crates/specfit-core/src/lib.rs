//! Synthetic absorption-line spectra: a B-spline continuum, Voigt absorbers
//! composited onto it, and a windowed chi-squared against an observation.

pub mod common;
pub mod domain;
pub mod numerics;
pub mod spectrum;
