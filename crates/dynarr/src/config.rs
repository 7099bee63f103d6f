//! Resize policy configuration and validation.

use std::error::Error;
use std::fmt;

/// Resize policy for a [`DynArray`](crate::DynArray).
///
/// Controls the capacity floor, the growth multiplier, and the shrink
/// hysteresis. Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayConfig {
    /// Capacity floor. Requested capacities below this are raised to it,
    /// and shrinking never goes under it.
    ///
    /// Default: 8. Must be at least 1.
    pub min_capacity: usize,

    /// Multiplier applied to capacity when a push finds the array full.
    ///
    /// Default: 2. Must be at least 2.
    pub growth_factor: usize,

    /// Occupancy fraction at or below which a removal triggers a shrink.
    ///
    /// Default: 0.25. Must lie in `(0, 1)`.
    pub shrink_threshold: f64,

    /// Multiplier applied to capacity on shrink.
    ///
    /// Default: 0.5. Must lie in `(0, 1)` and be no smaller than
    /// `shrink_threshold`.
    pub shrink_factor: f64,
}

impl ArrayConfig {
    /// Default capacity floor.
    pub const DEFAULT_MIN_CAPACITY: usize = 8;

    /// Default growth multiplier.
    pub const DEFAULT_GROWTH_FACTOR: usize = 2;

    /// Default shrink trigger (25% occupancy).
    pub const DEFAULT_SHRINK_THRESHOLD: f64 = 0.25;

    /// Default shrink multiplier (halve).
    pub const DEFAULT_SHRINK_FACTOR: f64 = 0.5;

    /// Create a config with the default policy.
    pub const fn new() -> Self {
        Self {
            min_capacity: Self::DEFAULT_MIN_CAPACITY,
            growth_factor: Self::DEFAULT_GROWTH_FACTOR,
            shrink_threshold: Self::DEFAULT_SHRINK_THRESHOLD,
            shrink_factor: Self::DEFAULT_SHRINK_FACTOR,
        }
    }

    /// Check every policy invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_capacity == 0 {
            return Err(ConfigError::ZeroMinCapacity);
        }
        if self.growth_factor < 2 {
            return Err(ConfigError::GrowthFactorTooSmall {
                value: self.growth_factor,
            });
        }
        if !unit_interval(self.shrink_threshold) {
            return Err(ConfigError::InvalidShrinkThreshold {
                value: self.shrink_threshold,
            });
        }
        if !unit_interval(self.shrink_factor) {
            return Err(ConfigError::InvalidShrinkFactor {
                value: self.shrink_factor,
            });
        }
        // A freshly grown array sits just above 1/growth_factor occupancy;
        // it must not qualify for a shrink on the very next removal.
        if self.shrink_threshold * self.growth_factor as f64 >= 1.0 {
            return Err(ConfigError::Oscillation {
                shrink_threshold: self.shrink_threshold,
                growth_factor: self.growth_factor,
            });
        }
        if self.shrink_threshold > self.shrink_factor {
            return Err(ConfigError::ShrinkBelowLength {
                shrink_threshold: self.shrink_threshold,
                shrink_factor: self.shrink_factor,
            });
        }
        Ok(())
    }

    /// Initial capacity for a requested size: `max(requested, min_capacity)`.
    pub fn initial_capacity(&self, requested: usize) -> usize {
        requested.max(self.min_capacity)
    }

    /// Capacity after one growth step, or `None` on arithmetic overflow.
    pub fn growth_target(&self, capacity: usize) -> Option<usize> {
        capacity
            .checked_mul(self.growth_factor)
            .map(|cap| cap.max(self.min_capacity))
    }

    /// Whether an array of `len` live elements in `capacity` slots should shrink.
    pub fn should_shrink(&self, len: usize, capacity: usize) -> bool {
        len > 0 && (len as f64) <= capacity as f64 * self.shrink_threshold
    }

    /// Capacity after one shrink step, clamped to `min_capacity`.
    pub fn shrink_target(&self, capacity: usize) -> usize {
        let scaled = (capacity as f64 * self.shrink_factor) as usize;
        scaled.max(self.min_capacity)
    }
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn unit_interval(v: f64) -> bool {
    v.is_finite() && v > 0.0 && v < 1.0
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`ArrayConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `min_capacity` is zero.
    ZeroMinCapacity,
    /// `growth_factor` is below 2, so a full array could not gain a slot.
    GrowthFactorTooSmall {
        /// The configured factor.
        value: usize,
    },
    /// `shrink_threshold` is NaN, infinite, or outside `(0, 1)`.
    InvalidShrinkThreshold {
        /// The invalid value.
        value: f64,
    },
    /// `shrink_factor` is NaN, infinite, or outside `(0, 1)`.
    InvalidShrinkFactor {
        /// The invalid value.
        value: f64,
    },
    /// Growth would immediately satisfy the shrink trigger.
    Oscillation {
        /// The configured shrink threshold.
        shrink_threshold: f64,
        /// The configured growth factor.
        growth_factor: usize,
    },
    /// A shrink could leave fewer slots than live elements.
    ShrinkBelowLength {
        /// The configured shrink threshold.
        shrink_threshold: f64,
        /// The configured shrink factor.
        shrink_factor: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroMinCapacity => write!(f, "min_capacity must be at least 1"),
            Self::GrowthFactorTooSmall { value } => {
                write!(f, "growth_factor {value} is below minimum of 2")
            }
            Self::InvalidShrinkThreshold { value } => {
                write!(f, "shrink_threshold must lie in (0, 1), got {value}")
            }
            Self::InvalidShrinkFactor { value } => {
                write!(f, "shrink_factor must lie in (0, 1), got {value}")
            }
            Self::Oscillation {
                shrink_threshold,
                growth_factor,
            } => {
                write!(
                    f,
                    "shrink_threshold {shrink_threshold} x growth_factor {growth_factor} must be below 1"
                )
            }
            Self::ShrinkBelowLength {
                shrink_threshold,
                shrink_factor,
            } => {
                write!(
                    f,
                    "shrink_threshold {shrink_threshold} exceeds shrink_factor {shrink_factor}"
                )
            }
        }
    }
}

impl Error for ConfigError {}
