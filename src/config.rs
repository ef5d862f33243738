use thiserror::Error;

/// Read-only simulation parameters, populated before [`crate::World`] init.
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of stars. At least 2.
    pub stars: usize,
    /// Controls the radius of the initial cloud: rmax = sqrt(stars) / density.
    pub galaxy_density: f64,
    /// Scale of the initial orbital velocities.
    pub star_speed: f64,
    /// Barnes-Hut acceptance parameter: a node is treated as a single mass
    /// when the distance to its center of mass exceeds `size * accuracy`.
    /// Larger values recurse deeper and cost more.
    pub accuracy: f64,
    /// Gravitational softening, added to the squared distance in the force
    /// kernel. Must be positive so the kernel never divides by zero.
    pub epsilon: f64,
    /// Force strength.
    pub gravity: f64,
    /// Time-scaling multiplier applied after the timestep clamp.
    pub speed: f64,
    /// Timestep clamp: never integrate more than `1 / min_fps` seconds of
    /// simulated time per frame.
    pub min_fps: f64,
    /// Worker threads for the acceleration phase. 0 picks the hardware
    /// parallelism, capped at the star count.
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stars: 1000,
            galaxy_density: 1.0,
            star_speed: 1.0,
            accuracy: 0.7,
            epsilon: 1e-4,
            gravity: 1.0,
            speed: 1.0,
            min_fps: 30.0,
            workers: 0,
        }
    }
}

impl Config {
    /// Checks the parameter ranges the engine relies on.
    ///
    /// The comparisons are written so that NaN is rejected too.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stars < 2 {
            return Err(ConfigError::TooFewStars(self.stars));
        }
        if !(self.galaxy_density > 0.0) {
            return Err(ConfigError::Density(self.galaxy_density));
        }
        if !(self.accuracy > 0.0) {
            return Err(ConfigError::Accuracy(self.accuracy));
        }
        if !(self.epsilon > 0.0) {
            return Err(ConfigError::Epsilon(self.epsilon));
        }
        if !(self.min_fps > 0.0) {
            return Err(ConfigError::MinFps(self.min_fps));
        }
        Ok(())
    }
}

/// A configuration value the engine cannot run with.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("at least 2 stars are required, got {0}")]
    TooFewStars(usize),
    #[error("galaxy_density must be positive, got {0}")]
    Density(f64),
    #[error("accuracy must be positive, got {0}")]
    Accuracy(f64),
    #[error("epsilon must be positive, got {0}")]
    Epsilon(f64),
    #[error("min_fps must be positive, got {0}")]
    MinFps(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn single_star_is_rejected() {
        let config = Config {
            stars: 1,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::TooFewStars(1)));
    }

    #[test]
    fn non_positive_kernel_parameters_are_rejected() {
        let config = Config {
            accuracy: 0.0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Accuracy(0.0)));

        let config = Config {
            epsilon: -1.0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Epsilon(-1.0)));

        let config = Config {
            epsilon: f64::NAN,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Epsilon(_))));
    }

    #[test]
    fn non_positive_min_fps_is_rejected() {
        let config = Config {
            min_fps: 0.0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::MinFps(0.0)));
    }

    #[test]
    fn non_positive_density_is_rejected() {
        let config = Config {
            galaxy_density: 0.0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Density(0.0)));
    }
}
