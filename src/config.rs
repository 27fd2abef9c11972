//! Run configuration for the delay-coupled oscillator simulation.
//!
//! All run-level parameters live in an explicit [`SimulationConfig`]
//! passed to the system at construction; nothing is process-global and
//! nothing persists between runs. Validation is fail-fast: a rejected
//! configuration never starts stepping.

use ndarray::{Array1, Array2};

use crate::error::{RhythmError, RhythmResult};
use crate::history::LookbackPolicy;

/// Parameters of one simulation run.
///
/// The `Default` instance is the reference four-oscillator ensemble:
/// near-unison natural frequencies, millisecond-scale pairwise delays,
/// weak repulsive coupling and strong per-step phase noise.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Natural frequencies ω_i in radians per time unit. The length
    /// of this vector fixes the oscillator count.
    pub natural_frequencies: Array1<f64>,
    /// Propagation delay `delay[[i, j]]` from oscillator j to
    /// oscillator i, in time units. The diagonal is unused
    /// (self-coupling is excluded). Symmetry is not assumed.
    pub delay: Array2<f64>,
    /// Coupling strength k (signed). The per-pair term is scaled by
    /// k/N.
    pub coupling: f64,
    /// Standard deviation σ of the independent Gaussian perturbation
    /// added to each oscillator's rate every step.
    pub noise_scale: f64,
    /// Euler step size in time units.
    pub dt: f64,
    /// Number of integration steps; the trajectory holds steps + 1
    /// rows including the initial condition.
    pub steps: usize,
    /// Steps at the start of the run during which coupling is
    /// disabled. The step numbered `warmup_steps` is still uncoupled;
    /// coupling begins on the step after it.
    pub warmup_steps: usize,
    /// Initial phase vector θ(0).
    pub initial_phases: Array1<f64>,
    /// Behavior when a delay lookback reaches past recorded history.
    pub lookback: LookbackPolicy,
    /// Clamp each oscillator's rate to be nonnegative so phases never
    /// run backward and beat times stay monotone. A policy choice,
    /// off by default.
    pub clamp_nonnegative_rate: bool,
    /// Seed for the noise generator. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            natural_frequencies: Array1::from_vec(vec![1.0, 0.99, 1.01, 1.0]),
            delay: Array2::from_shape_vec(
                (4, 4),
                vec![
                    0.00, 0.01, 0.01, 0.03, //
                    0.01, 0.00, 0.02, 0.01, //
                    0.01, 0.02, 0.00, 0.01, //
                    0.03, 0.01, 0.01, 0.00,
                ],
            )
            .expect("4x4 literal"),
            coupling: -0.1,
            noise_scale: 0.5,
            dt: 0.01,
            steps: 20_000,
            warmup_steps: 100,
            initial_phases: Array1::from_vec(vec![0.0, 2.0, 1.0, 3.0]),
            lookback: LookbackPolicy::default(),
            clamp_nonnegative_rate: false,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Configuration with explicit per-oscillator parameters and the
    /// default step scheme.
    pub fn new(
        natural_frequencies: Array1<f64>,
        delay: Array2<f64>,
        initial_phases: Array1<f64>,
    ) -> Self {
        Self {
            natural_frequencies,
            delay,
            initial_phases,
            ..Self::default()
        }
    }

    /// Derive the step count from a run duration, for audio-rate step
    /// sizes where the duration is the natural run parameter.
    pub fn with_duration(mut self, duration: f64, dt: f64) -> Self {
        self.dt = dt;
        self.steps = (duration / dt).round() as usize;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_lookback(mut self, lookback: LookbackPolicy) -> Self {
        self.lookback = lookback;
        self
    }

    /// Number of oscillators N.
    pub fn oscillators(&self) -> usize {
        self.natural_frequencies.len()
    }

    /// Simulated duration in time units.
    pub fn duration(&self) -> f64 {
        self.steps as f64 * self.dt
    }

    /// Integer step count a delay value quantizes to.
    pub fn delay_steps(&self, i: usize, j: usize) -> usize {
        (self.delay[[i, j]] / self.dt) as usize
    }

    /// Check every run parameter before simulation starts.
    pub fn validate(&self) -> RhythmResult<()> {
        let n = self.oscillators();
        if n == 0 {
            return Err(invalid("at least one oscillator is required"));
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(invalid(format!("step size must be positive, got {}", self.dt)));
        }
        if self.steps == 0 {
            return Err(invalid("step count must be nonzero"));
        }
        if !self.noise_scale.is_finite() || self.noise_scale < 0.0 {
            return Err(invalid(format!(
                "noise scale must be nonnegative, got {}",
                self.noise_scale
            )));
        }
        if !self.coupling.is_finite() {
            return Err(invalid("coupling strength must be finite"));
        }
        if self.natural_frequencies.iter().any(|w| !w.is_finite()) {
            return Err(invalid("natural frequencies must be finite"));
        }
        if self.initial_phases.len() != n {
            return Err(invalid(format!(
                "initial phase vector has length {}, expected {}",
                self.initial_phases.len(),
                n
            )));
        }
        if self.initial_phases.iter().any(|t| !t.is_finite()) {
            return Err(invalid("initial phases must be finite"));
        }
        if self.delay.shape() != [n, n] {
            return Err(invalid(format!(
                "delay matrix is {:?}, expected [{n}, {n}]",
                self.delay.shape()
            )));
        }
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let d = self.delay[[i, j]];
                if !d.is_finite() || d < 0.0 {
                    return Err(invalid(format!(
                        "delay[{i}][{j}] must be a nonnegative real, got {d}"
                    )));
                }
            }
        }
        if self.lookback == LookbackPolicy::Strict {
            let max_step = (0..n)
                .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
                .map(|(i, j)| self.delay_steps(i, j))
                .max()
                .unwrap_or(0);
            if max_step > self.warmup_steps {
                return Err(invalid(format!(
                    "delay of {max_step} steps exceeds the {} warm-up steps of \
                     recorded history available when coupling starts",
                    self.warmup_steps
                )));
            }
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> RhythmError {
    RhythmError::InvalidConfiguration(msg.into())
}
