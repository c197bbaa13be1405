pub mod locator;
pub mod spline;
pub mod voigt;

pub use locator::{LocatorError, WaveIndexLocator, pixel_span};
pub use spline::{SplineOffset, SplineOffsetError, spline_basis, spline_weights};
pub use voigt::{faddeeva, voigt};
