/// The golden ratio: φ = (1 + √5) / 2
const PHI: f64 = 1.618_033_988_749_895;

/// The probe fraction: ρ = 2 − φ ≈ 0.382
///
/// New points sit a fraction `ρ` of the way into the larger subinterval.
pub(super) const RHO: f64 = 2.0 - PHI;

/// Which side of `mid` the next probe lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Side {
    /// Probe into `(mid, high)`.
    Upper,

    /// Probe into `(low, mid)`.
    Lower,
}

/// Search interval with its known interior point.
///
/// Holds `low < mid < high` for any non-degenerate bounds, with `mid` at the
/// golden section point when the interval is first established.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

impl Interval {
    /// Creates an interval from bounds with `mid` placed by the golden ratio.
    ///
    /// If the bounds are reversed, they are swapped.
    pub(super) fn new(bounds: [f64; 2]) -> Self {
        let [a, b] = bounds;
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self {
            low,
            mid: low + RHO * (high - low),
            high,
        }
    }

    /// Returns the width of the interval.
    #[must_use]
    pub fn width(&self) -> f64 {
        (self.high - self.low).abs()
    }

    /// Returns the center of the outer bounds.
    #[must_use]
    pub fn center(&self) -> f64 {
        0.5 * (self.high + self.low)
    }

    /// The larger subinterval is always probed; `Lower` wins a tie.
    pub(super) fn side(&self) -> Side {
        if self.high - self.mid > self.mid - self.low {
            Side::Upper
        } else {
            Side::Lower
        }
    }

    /// Returns the next probe point.
    pub(super) fn candidate(&self) -> f64 {
        match self.side() {
            Side::Upper => self.mid + RHO * (self.high - self.mid),
            Side::Lower => self.mid - RHO * (self.mid - self.low),
        }
    }

    /// Relative stopping rule, scaled by the magnitudes of `mid` and `x`.
    pub(super) fn is_converged(&self, x: f64, tolerance: f64) -> bool {
        self.width() < tolerance * (self.mid.abs() + x.abs())
    }

    /// Keeps the side containing `x` when `x` beat `mid`; `x` becomes the new `mid`.
    #[must_use]
    pub(super) fn toward(self, x: f64) -> Self {
        match self.side() {
            Side::Upper => Self {
                low: self.mid,
                mid: x,
                high: self.high,
            },
            Side::Lower => Self {
                low: self.low,
                mid: x,
                high: self.mid,
            },
        }
    }

    /// Drops the side beyond `x` when `mid` was at least as good; `mid` stays.
    #[must_use]
    pub(super) fn away_from(self, x: f64) -> Self {
        match self.side() {
            Side::Upper => Self {
                low: self.low,
                mid: self.mid,
                high: x,
            },
            Side::Lower => Self {
                low: x,
                mid: self.mid,
                high: self.high,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn mid_starts_at_golden_section_point() {
        let interval = Interval::new([0.0, 1.0]);

        assert_relative_eq!(interval.low, 0.0);
        assert_relative_eq!(interval.high, 1.0);
        assert_relative_eq!(interval.mid, 0.381_966_011_250_105_1, epsilon = 1e-15);
        assert_relative_eq!(interval.center(), 0.5);
    }

    #[test]
    fn reversed_bounds_are_swapped() {
        let interval = Interval::new([1.0, -2.0]);

        assert_relative_eq!(interval.low, -2.0);
        assert_relative_eq!(interval.high, 1.0);
        assert!(interval.low < interval.mid && interval.mid < interval.high);
    }

    #[test]
    fn first_probe_lands_on_mirror_point() {
        // With mid at ρ, the probe into the larger upper side lands at 1 − ρ.
        let interval = Interval::new([0.0, 1.0]);

        assert_eq!(interval.side(), Side::Upper);
        assert_relative_eq!(interval.candidate(), 1.0 - RHO, epsilon = 1e-15);
    }

    #[test]
    fn probes_lower_side_when_it_is_larger() {
        let interval = Interval {
            low: 0.0,
            mid: 0.7,
            high: 1.0,
        };

        assert_eq!(interval.side(), Side::Lower);
        assert_relative_eq!(interval.candidate(), 0.7 - RHO * 0.7);
    }

    #[test]
    fn toward_upper_probe_moves_low_to_mid() {
        let interval = Interval::new([0.0, 1.0]);
        let x = interval.candidate();

        let next = interval.toward(x);

        assert_relative_eq!(next.low, interval.mid);
        assert_relative_eq!(next.mid, x);
        assert_relative_eq!(next.high, 1.0);
    }

    #[test]
    fn away_from_upper_probe_cuts_high_at_probe() {
        let interval = Interval::new([0.0, 1.0]);
        let x = interval.candidate();

        let next = interval.away_from(x);

        assert_relative_eq!(next.low, 0.0);
        assert_relative_eq!(next.mid, interval.mid);
        assert_relative_eq!(next.high, x);
    }

    #[test]
    fn lower_probe_shrinks_toward_or_away() {
        let interval = Interval {
            low: 0.0,
            mid: 0.7,
            high: 1.0,
        };
        let x = interval.candidate();

        let toward = interval.toward(x);
        assert_relative_eq!(toward.low, 0.0);
        assert_relative_eq!(toward.mid, x);
        assert_relative_eq!(toward.high, 0.7);

        let away = interval.away_from(x);
        assert_relative_eq!(away.low, x);
        assert_relative_eq!(away.mid, 0.7);
        assert_relative_eq!(away.high, 1.0);
    }

    #[test]
    fn subintervals_keep_golden_proportion() {
        // After either shrink the retained interior point still splits its
        // interval in the golden ratio, so the next probe reuses it.
        let interval = Interval::new([0.0, 1.0]);
        let x = interval.candidate();

        for next in [interval.toward(x), interval.away_from(x)] {
            let larger = (next.high - next.mid).max(next.mid - next.low);
            assert_relative_eq!(larger / next.width(), 1.0 - RHO, epsilon = 1e-12);
        }
    }

    #[test]
    fn convergence_is_relative_to_point_magnitudes() {
        let near_one = Interval {
            low: 0.99,
            mid: 1.0,
            high: 1.01,
        };
        assert!(near_one.is_converged(1.005, 0.02));
        assert!(!near_one.is_converged(1.005, 0.001));

        let near_thousand = Interval {
            low: 999.0,
            mid: 1000.0,
            high: 1001.0,
        };
        assert!(near_thousand.is_converged(1000.5, 0.01));
    }
}
