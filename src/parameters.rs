use serde::Serialize;

use crate::{
    config::{self, Float},
    error::{AntSystemError, AntSystemResult},
};

/// Ant System constants for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Parameters {
    pub ant_count: usize,
    pub max_iterations: u32,
    pub alpha: Float,
    pub beta: Float,
    pub rho: Float,
    pub init_intensity: Float,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            ant_count: config::ANT_COUNT,
            max_iterations: config::MAX_ITERATIONS,
            alpha: config::ALPHA,
            beta: config::BETA,
            rho: config::RHO,
            init_intensity: config::INITIAL_TRAIL_INTENSITY,
        }
    }
}

impl Parameters {
    pub fn validate(&self) -> AntSystemResult<()> {
        if self.ant_count == 0 {
            return Err(AntSystemError::NonPositive { name: "ant count" });
        }
        if self.max_iterations == 0 {
            return Err(AntSystemError::NonPositive {
                name: "iteration count",
            });
        }
        check("alpha", self.alpha, |v| v >= 0.0, "must be non-negative")?;
        check("beta", self.beta, |v| v >= 0.0, "must be non-negative")?;
        check("rho", self.rho, |v| v > 0.0 && v < 1.0, "must be in (0, 1)")?;
        check(
            "initial trail intensity",
            self.init_intensity,
            |v| v > 0.0,
            "must be positive",
        )
    }
}

fn check(
    name: &'static str,
    value: Float,
    valid: impl Fn(Float) -> bool,
    reason: &'static str,
) -> AntSystemResult<()> {
    if value.is_finite() && valid(value) {
        Ok(())
    } else {
        Err(AntSystemError::InvalidParameter {
            name,
            value,
            reason,
        })
    }
}
