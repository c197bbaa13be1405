//! Continuum from a uniform cubic B-spline through the control points.
//!
//! Each spline interval is sampled at `spline_subdivisions` points and the
//! secant through consecutive samples is rasterised onto the pixels it spans.
//! Pixels outside the spline's x-range are not evaluated and stay `NaN`.

use super::SpectrumError;
use super::validate::{validate_control_points, validate_grid, validate_length};
use crate::common::ModelSettings;
use crate::domain::ContinuumPoint;
use crate::numerics::{pixel_span, spline_weights};
use std::ops::{Range, RangeInclusive};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct ContinuumCurve {
    /// Per-pixel continuum; `NaN` outside `covered`.
    pub values: Vec<f64>,
    pub covered: Range<usize>,
}

impl ContinuumCurve {
    pub fn is_covered(&self, pixel: usize) -> bool {
        self.covered.contains(&pixel)
    }

    /// True when every pixel of `pixels` lies inside the evaluated range.
    pub fn covers(&self, pixels: &Range<usize>) -> bool {
        pixels.is_empty()
            || (pixels.start >= self.covered.start && pixels.end <= self.covered.end)
    }

    pub fn covered_values(&self) -> &[f64] {
        &self.values[self.covered.clone()]
    }
}

/// Evaluates the continuum over `grid` from control points sorted by `x`.
pub fn evaluate_continuum(
    grid: &[f64],
    points: &[ContinuumPoint],
    settings: &ModelSettings,
) -> Result<ContinuumCurve, SpectrumError> {
    validate_grid(grid)?;
    validate_control_points(points)?;
    settings.validate()?;

    let mut values = vec![f64::NAN; grid.len()];
    let last_interval = points.len() - 3;
    let covered = rasterize_intervals(
        grid,
        points,
        1..=last_interval,
        settings.spline_subdivisions,
        &mut values,
    );

    if covered.is_empty() {
        return Err(SpectrumError::ContinuumOffGrid {
            start: spline_sample(&points[0..4], 0.0).x,
            end: spline_sample(&points[last_interval - 1..], 1.0).x,
        });
    }

    debug!(
        pixels = grid.len(),
        covered_start = covered.start,
        covered_end = covered.end,
        intervals = last_interval,
        "continuum evaluated"
    );
    Ok(ContinuumCurve { values, covered })
}

/// Re-rasterises the four spline intervals influenced by control point
/// `moved_index` after it has been moved, leaving every other pixel intact.
///
/// Only indices `3..=len-4` are accepted: nearer the ends the spline's own
/// x-range depends on the moved point and a full evaluation is required.
/// Returns the rewritten pixel range.
pub fn update_continuum_region(
    grid: &[f64],
    points: &[ContinuumPoint],
    moved_index: usize,
    settings: &ModelSettings,
    curve: &mut ContinuumCurve,
) -> Result<Range<usize>, SpectrumError> {
    validate_grid(grid)?;
    validate_control_points(points)?;
    settings.validate()?;
    validate_length("continuum", grid.len(), curve.values.len())?;

    let len = points.len();
    if moved_index < 3 || moved_index + 4 > len {
        return Err(SpectrumError::UpdateIndexNearEdge {
            index: moved_index,
            len,
            max: len as i64 - 4,
        });
    }

    let rewritten = rasterize_intervals(
        grid,
        points,
        moved_index - 2..=moved_index + 1,
        settings.spline_subdivisions,
        &mut curve.values,
    );
    debug!(
        moved_index,
        rewritten_start = rewritten.start,
        rewritten_end = rewritten.end,
        "continuum region updated"
    );
    Ok(rewritten)
}

/// Point on the spline interval blending `neighbours[0..4]` at parameter `t`.
fn spline_sample(neighbours: &[ContinuumPoint], t: f64) -> ContinuumPoint {
    spline_weights(t)
        .iter()
        .zip(neighbours)
        .fold(ContinuumPoint::new(0.0, 0.0), |acc, (weight, point)| {
            ContinuumPoint::new(acc.x + weight * point.x, acc.y + weight * point.y)
        })
}

fn rasterize_intervals(
    grid: &[f64],
    points: &[ContinuumPoint],
    intervals: RangeInclusive<usize>,
    subdivisions: usize,
    values: &mut [f64],
) -> Range<usize> {
    let mut written: Option<Range<usize>> = None;

    for interval in intervals {
        let neighbours = &points[interval - 1..=interval + 2];
        let mut start = spline_sample(neighbours, 0.0);
        for step in 0..subdivisions {
            let t = (step + 1) as f64 / subdivisions as f64;
            let end = spline_sample(neighbours, t);
            let span = set_continuum_line(start, end, grid, values);
            written = Some(match written {
                Some(previous) => previous.start..span.end.max(previous.end),
                None => span,
            });
            start = end;
        }
    }

    written.unwrap_or(0..0)
}

fn set_continuum_line(
    start: ContinuumPoint,
    end: ContinuumPoint,
    grid: &[f64],
    values: &mut [f64],
) -> Range<usize> {
    let span = pixel_span(grid, start.x, end.x);
    if span.is_empty() {
        return span;
    }

    let slope = (end.y - start.y) / (end.x - start.x);
    let intercept = start.y - start.x * slope;
    for pixel in span.clone() {
        values[pixel] = grid[pixel] * slope + intercept;
    }
    span
}
