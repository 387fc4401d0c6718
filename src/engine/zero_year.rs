//! Zero-crossing extrapolation.
//!
//! Projects the year the mitigated accumulation reaches zero by extending the
//! line through the last two points of the series. Only the most recent trend
//! counts, so the result jumps when the final step spans a regime change such
//! as cleanup onset.

use super::integrator::DataPoint;

/// Default multiple of the maximum projection year beyond which an
/// extrapolated crossing is discarded.
pub const DEFAULT_HORIZON_FACTOR: f64 = 2.0;

/// Two-point linear extrapolator with a sanity horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZeroYearExtrapolator {
    max_projection_year: i32,
    horizon_factor: f64,
}

impl ZeroYearExtrapolator {
    /// Create an extrapolator whose horizon is
    /// `horizon_factor × max_projection_year`.
    #[must_use]
    pub const fn new(max_projection_year: i32, horizon_factor: f64) -> Self {
        Self {
            max_projection_year,
            horizon_factor,
        }
    }

    /// Latest year an extrapolated crossing may fall on.
    #[must_use]
    pub fn horizon(&self) -> f64 {
        self.horizon_factor * f64::from(self.max_projection_year)
    }

    /// Year the mitigated total reaches zero, if the trend gets there.
    ///
    /// Returns `None` when removal capacity is not positive, fewer than two
    /// points exist, the last total is already zero, the trend is not
    /// decreasing, or the crossing lies beyond the horizon.
    #[must_use]
    pub fn zero_year(&self, points: &[DataPoint], removal_capacity: f64) -> Option<i32> {
        if removal_capacity.is_nan() || removal_capacity <= 0.0 {
            return None;
        }

        let [.., prev, last] = points else {
            return None;
        };
        if last.cumulative_million_tons == 0.0 {
            return None;
        }

        let (x1, y1) = (f64::from(prev.year), prev.cumulative_million_tons);
        let (x2, y2) = (f64::from(last.year), last.cumulative_million_tons);

        let slope = (y2 - y1) / (x2 - x1);
        if slope.is_nan() || slope >= 0.0 {
            return None;
        }

        // x-intercept of the line through (x2, y2), rounded up
        let crossing = (x2 - y2 / slope).ceil();
        if !crossing.is_finite() || crossing > self.horizon() {
            return None;
        }

        Some(crossing as i32)
    }
}

/// Zero-crossing year with the default horizon of twice `max_projection_year`.
#[must_use]
pub fn zero_year(points: &[DataPoint], removal_capacity: f64, max_projection_year: i32) -> Option<i32> {
    ZeroYearExtrapolator::new(max_projection_year, DEFAULT_HORIZON_FACTOR)
        .zero_year(points, removal_capacity)
}
