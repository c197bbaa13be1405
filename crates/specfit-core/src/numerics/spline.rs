//! Uniform cubic B-spline blending functions.
//!
//! A segment starting at control point `i` blends points `i-1..=i+2`; the
//! offset of each point relative to `i` selects its weight.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplineOffset {
    Previous,
    Current,
    Next,
    AfterNext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("uniform cubic B-spline offsets are -1, 0, 1 or 2, got {offset}")]
pub struct SplineOffsetError {
    pub offset: i64,
}

impl SplineOffset {
    pub const ALL: [Self; 4] = [Self::Previous, Self::Current, Self::Next, Self::AfterNext];

    pub const fn as_i64(self) -> i64 {
        match self {
            Self::Previous => -1,
            Self::Current => 0,
            Self::Next => 1,
            Self::AfterNext => 2,
        }
    }
}

impl TryFrom<i64> for SplineOffset {
    type Error = SplineOffsetError;

    fn try_from(offset: i64) -> Result<Self, Self::Error> {
        match offset {
            -1 => Ok(Self::Previous),
            0 => Ok(Self::Current),
            1 => Ok(Self::Next),
            2 => Ok(Self::AfterNext),
            _ => Err(SplineOffsetError { offset }),
        }
    }
}

/// Blending weight of the point at `offset` for segment parameter `t` in `[0, 1]`.
pub fn spline_basis(offset: SplineOffset, t: f64) -> f64 {
    match offset {
        SplineOffset::Previous => (((3.0 - t) * t - 3.0) * t + 1.0) / 6.0,
        SplineOffset::Current => (((3.0 * t - 6.0) * t) * t + 4.0) / 6.0,
        SplineOffset::Next => (((3.0 - 3.0 * t) * t + 3.0) * t + 1.0) / 6.0,
        SplineOffset::AfterNext => (t * t * t) / 6.0,
    }
}

/// All four weights, ordered as [`SplineOffset::ALL`].
pub fn spline_weights(t: f64) -> [f64; 4] {
    SplineOffset::ALL.map(|offset| spline_basis(offset, t))
}

#[cfg(test)]
mod tests {
    use super::{SplineOffset, SplineOffsetError, spline_basis, spline_weights};

    #[test]
    fn weights_form_a_partition_of_unity() {
        for step in 0..=1_000 {
            let t = step as f64 / 1_000.0;
            let weights = spline_weights(t);
            let sum: f64 = weights.iter().sum();
            assert!((sum - 1.0).abs() <= 1.0e-14, "t={t} sum={sum}");
            assert!(weights.iter().all(|weight| *weight >= 0.0), "t={t}");
        }
    }

    #[test]
    fn segment_endpoints_use_one_four_one_weights() {
        let start = spline_weights(0.0);
        let end = spline_weights(1.0);

        assert_eq!(start, [1.0 / 6.0, 4.0 / 6.0, 1.0 / 6.0, 0.0]);
        assert_eq!(end, [0.0, 1.0 / 6.0, 4.0 / 6.0, 1.0 / 6.0]);
    }

    #[test]
    fn weights_are_mirror_symmetric() {
        for step in 0..=20 {
            let t = step as f64 / 20.0;
            let forward = spline_weights(t);
            let mirrored = spline_weights(1.0 - t);
            for (lhs, rhs) in forward.iter().zip(mirrored.iter().rev()) {
                assert!((lhs - rhs).abs() <= 1.0e-15, "t={t}");
            }
        }
    }

    #[test]
    fn offsets_outside_support_are_rejected() {
        for offset in SplineOffset::ALL {
            assert_eq!(SplineOffset::try_from(offset.as_i64()), Ok(offset));
        }
        assert_eq!(
            SplineOffset::try_from(3),
            Err(SplineOffsetError { offset: 3 })
        );
        assert_eq!(
            SplineOffset::try_from(-2),
            Err(SplineOffsetError { offset: -2 })
        );
        assert_eq!(spline_basis(SplineOffset::AfterNext, 0.5), 0.125 / 6.0);
    }
}
