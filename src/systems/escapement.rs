//! Escapement Metronome: Self-Sustained Mechanical Tick
//!
//! A damped mass-spring oscillator kept ringing by an escapement-style
//! impulse:
//!
//!   m·d²x/dt² = −k·x − γ·dx/dt + p(x, v)
//!
//! The impulse p acts only inside a narrow displacement window
//! (x₁, x₂), rising linearly to a peak force p₁ at the window midpoint
//! and falling back to zero: the triangular profile of a pallet
//! pushing the balance through its impulse arc. The mechanism is
//! symmetric under reversal: the forcing is a single odd function of
//! the swing direction,
//!
//!   p(x, v) = s·ramp(s·x),  s = sign(v)
//!
//! so the return swing receives the mirrored kick automatically.
//!
//! Integrated with the same fixed-step explicit Euler scheme as the
//! coupled ensemble.

use super::traits::DynamicalSystem;

/// Snapshot of the metronome.
#[derive(Debug, Clone, Copy)]
pub struct EscapementState {
    /// Displacement x.
    pub position: f64,
    /// Velocity v.
    pub velocity: f64,
    /// Simulation time.
    pub time: f64,
}

/// Escapement-driven metronome oscillator.
#[derive(Debug, Clone)]
pub struct EscapementMetronome {
    mass: f64,
    stiffness: f64,
    damping: f64,
    /// Impulse window start x₁.
    window_start: f64,
    /// Impulse window end x₂.
    window_end: f64,
    /// Peak impulse force p₁ at the window midpoint.
    peak_force: f64,
    x: f64,
    v: f64,
    dt: f64,
    time: f64,
}

impl EscapementMetronome {
    /// Reference metronome: unit mass and stiffness, light damping,
    /// impulse window (0.01, 0.11) peaking at 0.4, released from
    /// x = 0.02 at rest.
    pub fn new() -> Self {
        Self::with_params(1.0, 1.0, 0.2, 0.01, 0.11, 0.4, 0.02, 0.01)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_params(
        mass: f64,
        stiffness: f64,
        damping: f64,
        window_start: f64,
        window_end: f64,
        peak_force: f64,
        x0: f64,
        dt: f64,
    ) -> Self {
        Self {
            mass,
            stiffness,
            damping,
            window_start,
            window_end,
            peak_force,
            x: x0,
            v: 0.0,
            dt,
            time: 0.0,
        }
    }

    /// Triangular impulse profile on (x₁, x₂), zero outside.
    fn ramp(&self, x: f64) -> f64 {
        let (x1, x2) = (self.window_start, self.window_end);
        if x <= x1 || x >= x2 {
            return 0.0;
        }
        let half = (x2 - x1) / 2.0;
        if x < x1 + half {
            (x - x1) / half * self.peak_force
        } else {
            (x2 - x) / half * self.peak_force
        }
    }

    /// Escapement forcing, odd under simultaneous reversal of
    /// displacement and velocity: p(−x, −v) = −p(x, v).
    pub fn impulse(&self, x: f64, v: f64) -> f64 {
        let s = if v < 0.0 { -1.0 } else { 1.0 };
        s * self.ramp(s * x)
    }

    pub fn position(&self) -> f64 {
        self.x
    }

    pub fn velocity(&self) -> f64 {
        self.v
    }
}

impl Default for EscapementMetronome {
    fn default() -> Self {
        Self::new()
    }
}

impl DynamicalSystem for EscapementMetronome {
    type State = EscapementState;

    fn step(&mut self) {
        let accel =
            (-self.stiffness * self.x - self.damping * self.v + self.impulse(self.x, self.v))
                / self.mass;
        self.x += self.dt * self.v;
        self.v += self.dt * accel;
        self.time += self.dt;
    }

    fn state(&self) -> EscapementState {
        EscapementState {
            position: self.x,
            velocity: self.v,
            time: self.time,
        }
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn n_elements(&self) -> usize {
        1
    }
}
