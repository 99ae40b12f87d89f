use thiserror::Error;

/// Relative tolerance used when none is given.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Step limit used when none is given.
pub const DEFAULT_MAX_ITERS: usize = 200;

/// Configuration for the golden section solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    tolerance: f64,
    max_iters: usize,
}

/// Errors that can occur when validating a golden section solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tolerance must be strictly between 0 and 1")]
    Tolerance,

    #[error("max_iters must be at least 1")]
    MaxIters,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iters: DEFAULT_MAX_ITERS,
        }
    }
}

impl Config {
    /// Creates a new config with a validated tolerance.
    ///
    /// The tolerance is relative: the search stops once the interval width
    /// falls below `tolerance * (|mid| + |x|)` for the current probe points.
    ///
    /// # Errors
    ///
    /// Returns an error if `tolerance` is not in the open interval `(0, 1)`
    /// or `max_iters` is zero.
    pub fn new(tolerance: f64, max_iters: usize) -> Result<Self, ConfigError> {
        if !(tolerance > 0.0 && tolerance < 1.0) {
            return Err(ConfigError::Tolerance);
        }
        if max_iters == 0 {
            return Err(ConfigError::MaxIters);
        }

        Ok(Self {
            tolerance,
            max_iters,
        })
    }

    /// Returns the relative tolerance.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the maximum number of search steps.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tolerance_is_one_percent() {
        let config = Config::default();
        assert_eq!(config.tolerance(), 0.01);
        assert_eq!(config, Config::new(0.01, 200).unwrap());
    }

    #[test]
    fn rejects_tolerance_outside_unit_interval() {
        for tolerance in [0.0, 1.0, 1.5, -0.1, f64::NAN, f64::INFINITY] {
            assert_eq!(Config::new(tolerance, 10), Err(ConfigError::Tolerance));
        }
    }

    #[test]
    fn rejects_zero_iterations() {
        assert_eq!(Config::new(0.1, 0), Err(ConfigError::MaxIters));
    }
}
