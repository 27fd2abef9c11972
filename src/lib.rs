//! # rhythm-dynamics
//!
//! Emergent Percussion from Delay-Coupled Phase Oscillators
//!
//! ## Model
//!
//! A small ensemble of Kuramoto phase oscillators is coupled through
//! finite signal propagation delays:
//!
//!   dθᵢ/dt = ωᵢ + σ·ξᵢ(t) + (k/N) Σⱼ sin(θᵢ(t) − θⱼ(t − τᵢⱼ))
//!
//! Each oscillator "claps" every time its unbounded phase crosses a
//! multiple of 2π. Delay coupling makes the ensemble drift into
//! rhythmic patterns no single oscillator was programmed to play.
//!
//! ## Pipeline
//!
//! 1. **Simulate**: fixed-step Euler integration against a pre-sized
//!    phase history buffer; an initial warm-up window runs uncoupled.
//! 2. **Extract beats**: scan each phase trajectory for 2π wraps and
//!    refine every crossing to sub-step accuracy by linear
//!    interpolation.
//! 3. **Render**: overlay a percussion kernel at each beat instant,
//!    superpose across oscillators, peak-normalize once, write WAV.
//!
//! ```no_run
//! use rhythm_dynamics::{
//!     extract_beats, render_beats, write_wav, DelayCoupledKuramoto,
//!     PercussionSample, SimulationConfig,
//! };
//!
//! # fn main() -> Result<(), rhythm_dynamics::RhythmError> {
//! let config = SimulationConfig::default().with_seed(7);
//! let dt = config.dt;
//! let duration = config.duration();
//!
//! let trajectory = DelayCoupledKuramoto::new(config)?.simulate();
//! let beats = extract_beats(&trajectory, dt);
//!
//! let kernel = PercussionSample::click(44_100);
//! let track = render_beats(&beats, &kernel, 44_100, duration);
//! write_wav("rhythm.wav", &track, 44_100)?;
//! # Ok(())
//! # }
//! ```
//!
//! The companion [`EscapementMetronome`] simulates the mechanical
//! tick source: a damped mass-spring oscillator kept ringing by an
//! escapement impulse.

pub mod audio;
pub mod config;
pub mod error;
pub mod history;
pub mod rhythm;
pub mod systems;
pub mod trace;

// Re-exports from config
pub use config::SimulationConfig;

// Re-exports from error
pub use error::{RhythmError, RhythmResult};

// Re-exports from history
pub use history::{LookbackPolicy, PhaseHistory, PhaseTrajectory};

// Re-exports from systems
pub use systems::{
    // Traits
    DynamicalSystem,
    // Delay-coupled ensemble
    DelayCoupledKuramoto,
    DelayKuramotoState,
    // Escapement metronome
    EscapementMetronome,
    EscapementState,
};

// Re-exports from rhythm
pub use rhythm::{beat_events, beat_times, extract_beats, BeatEvent};

// Re-exports from audio
pub use audio::{normalize_peak, render_beats, write_wav, PercussionSample};

// Re-exports from trace
pub use trace::SeriesRecorder;
