//! Dynamical systems producing rhythmic trajectories.
//!
//! - **Delay-coupled Kuramoto**: the core ensemble whose phase wraps
//!   become percussion beats.
//! - **Escapement metronome**: a self-sustained mechanical tick, the
//!   single-oscillator companion model.

mod delay_kuramoto;
mod escapement;
mod traits;

pub use delay_kuramoto::{DelayCoupledKuramoto, DelayKuramotoState};
pub use escapement::{EscapementMetronome, EscapementState};
pub use traits::DynamicalSystem;
