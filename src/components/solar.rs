//! Solar generation profiles for solar components.

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::inputs::SolarRequest;
use crate::error::{AssemblyError, AssemblyResult};

/// Source of hourly solar generation for a requested array.
///
/// Production deployments wrap an external resource-modeling service; tests
/// and the command line use [`SyntheticSolarResource`].
pub trait SolarResource {
    /// Returns the generation profile (kW per step) of the requested array.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::SolarResource`] if no profile can be produced.
    fn hourly_profile(&self, request: &SolarRequest) -> AssemblyResult<Vec<f64>>;
}

impl<F> SolarResource for F
where
    F: Fn(&SolarRequest) -> AssemblyResult<Vec<f64>>,
{
    fn hourly_profile(&self, request: &SolarRequest) -> AssemblyResult<Vec<f64>> {
        self(request)
    }
}

/// Deterministic clear-sky model with seeded multiplicative noise.
///
/// Generation follows a half-sine between sunrise and sunset, peaking at
/// `system_capacity`, and is zero at night. The same seed always yields the
/// same profile.
#[derive(Debug, Clone)]
pub struct SyntheticSolarResource {
    /// Steps per simulated day.
    pub steps_per_day: usize,
    /// Days in the profile.
    pub days: usize,
    /// Sunrise step index (inclusive).
    pub sunrise_idx: usize,
    /// Sunset step index (exclusive).
    pub sunset_idx: usize,
    /// Standard deviation of the noise as a fraction of output.
    pub noise_std: f64,
    pub seed: u64,
}

impl SyntheticSolarResource {
    /// Creates a model covering `days` days of `steps_per_day` steps.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::SolarResource`] if the day is empty or the
    /// daylight window is not inside it.
    pub fn new(
        steps_per_day: usize,
        days: usize,
        sunrise_idx: usize,
        sunset_idx: usize,
        noise_std: f64,
        seed: u64,
    ) -> AssemblyResult<Self> {
        if steps_per_day == 0 || days == 0 {
            return Err(AssemblyError::SolarResource(
                "profile must cover at least one step".to_string(),
            ));
        }
        if sunrise_idx >= sunset_idx || sunset_idx > steps_per_day {
            return Err(AssemblyError::SolarResource(format!(
                "daylight window {sunrise_idx}..{sunset_idx} does not fit a {steps_per_day}-step day"
            )));
        }
        Ok(Self {
            steps_per_day,
            days,
            sunrise_idx,
            sunset_idx,
            noise_std: noise_std.max(0.0),
            seed,
        })
    }

    /// Fraction of peak output at step `t` of a day, ignoring noise.
    fn daylight_frac(&self, t: usize) -> f64 {
        let step = t % self.steps_per_day;
        if step < self.sunrise_idx || step >= self.sunset_idx {
            return 0.0;
        }
        let span = (self.sunset_idx - self.sunrise_idx) as f64;
        let x = (step - self.sunrise_idx) as f64 / span;
        (std::f64::consts::PI * x).sin()
    }
}

impl SolarResource for SyntheticSolarResource {
    fn hourly_profile(&self, request: &SolarRequest) -> AssemblyResult<Vec<f64>> {
        if !request.system_capacity.is_finite() || request.system_capacity < 0.0 {
            return Err(AssemblyError::SolarResource(format!(
                "system capacity must be a non-negative number, got {}",
                request.system_capacity
            )));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let steps = self.steps_per_day * self.days;
        let profile = (0..steps)
            .map(|t| {
                let frac = self.daylight_frac(t);
                if frac <= 0.0 {
                    return 0.0;
                }
                let noise_mult = 1.0 + gaussian_noise(&mut rng, self.noise_std);
                (request.system_capacity * frac * noise_mult).max(0.0)
            })
            .collect();
        Ok(profile)
    }
}

/// Gaussian noise with mean 0 via the Box-Muller transform.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-9, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(noise_std: f64, seed: u64) -> SyntheticSolarResource {
        SyntheticSolarResource::new(24, 1, 6, 18, noise_std, seed)
            .unwrap_or_else(|e| panic!("valid model: {e}"))
    }

    fn request(system_capacity: f64) -> SolarRequest {
        SolarRequest {
            system_capacity,
            base_cost: 1000.0,
            perw_cost: 0.5,
        }
    }

    #[test]
    fn profile_covers_every_step() {
        let m = SyntheticSolarResource::new(24, 3, 6, 18, 0.0, 1);
        let profile = m.and_then(|m| m.hourly_profile(&request(5.0)));
        assert_eq!(profile.map(|p| p.len()).ok(), Some(72));
    }

    #[test]
    fn no_generation_at_night() {
        let profile = model(0.0, 42).hourly_profile(&request(5.0)).unwrap_or_default();
        for t in [0, 5, 18, 23] {
            assert_eq!(profile[t], 0.0, "step {t}");
        }
    }

    #[test]
    fn peak_at_noon_equals_capacity() {
        let profile = model(0.0, 42).hourly_profile(&request(5.0)).unwrap_or_default();
        assert!((profile[12] - 5.0).abs() < 1e-9);
        assert!((profile[9] - profile[15]).abs() < 1e-9);
    }

    #[test]
    fn deterministic_with_same_seed() {
        let a = model(0.1, 42).hourly_profile(&request(5.0)).ok();
        let b = model(0.1, 42).hourly_profile(&request(5.0)).ok();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = model(0.1, 42).hourly_profile(&request(5.0)).ok();
        let b = model(0.1, 43).hourly_profile(&request(5.0)).ok();
        assert_ne!(a, b);
    }

    #[test]
    fn never_negative() {
        let profile = model(0.8, 7).hourly_profile(&request(5.0)).unwrap_or_default();
        assert!(profile.iter().all(|kw| *kw >= 0.0));
    }

    #[test]
    fn rejects_bad_window() {
        assert!(SyntheticSolarResource::new(24, 1, 18, 6, 0.0, 0).is_err());
        assert!(SyntheticSolarResource::new(24, 1, 6, 25, 0.0, 0).is_err());
        assert!(SyntheticSolarResource::new(0, 1, 0, 0, 0.0, 0).is_err());
    }

    #[test]
    fn rejects_negative_capacity() {
        assert!(model(0.0, 0).hourly_profile(&request(-1.0)).is_err());
    }

    #[test]
    fn closures_are_resources() {
        let flat = |r: &SolarRequest| -> AssemblyResult<Vec<f64>> { Ok(vec![r.system_capacity; 4]) };
        assert_eq!(flat.hourly_profile(&request(2.0)).ok(), Some(vec![2.0; 4]));
    }
}
