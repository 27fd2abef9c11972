//! Phase-Wrap Beat Extraction
//!
//! Each full revolution of an oscillator is one beat. On the raw
//! (unbounded) trajectory a beat is the instant the phase crosses a
//! multiple of 2π; on the 2π-wrapped trajectory it shows up as the
//! wrapped value decreasing from one step to the next.
//!
//! Integer-step resolution is far too coarse for audible rhythm, so
//! the crossing instant is refined by linear interpolation inside the
//! step: with unbounded phases x_y and x_{y+1} bracketing the multiple
//! m·2π,
//!
//!   a = m·2π − x_y,  b = x_{y+1} − m·2π,
//!   t_beat = (y + a/(a+b)) · dt
//!
//! The crossed multiple is read off the bracketing values themselves,
//! so a wrapped-value dip caused by a noisy phase briefly running
//! backward (possible when the nonnegative-rate clamp is disabled) is
//! discarded instead of being mistaken for a revolution.

use ndarray::ArrayView1;
use std::f64::consts::TAU;

use crate::history::PhaseTrajectory;

/// One extracted beat: an oscillator finishing a revolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatEvent {
    /// Oscillator index.
    pub oscillator: usize,
    /// Continuous beat time in time units, sub-step accurate.
    pub time: f64,
}

/// Beat times for a single oscillator's unbounded phase series.
///
/// Returns strictly ascending continuous times.
pub fn beat_times(phases: ArrayView1<f64>, dt: f64) -> Vec<f64> {
    let mut beats = Vec::new();

    for y in 0..phases.len().saturating_sub(1) {
        let x0 = phases[y];
        let x1 = phases[y + 1];

        // Wrap event: the 2π-reduced phase decreases across the step.
        if x1.rem_euclid(TAU) >= x0.rem_euclid(TAU) {
            continue;
        }

        // The multiple just below the right endpoint is the one
        // crossed; a dip with no forward crossing lands in the same
        // multiple as x0 and is rejected by the bracket check.
        let target = x1.div_euclid(TAU) * TAU;
        let a = target - x0;
        let b = x1 - target;
        if a < 0.0 || b < 0.0 || a + b <= 0.0 {
            continue;
        }

        let fraction = a / (a + b);
        beats.push((y as f64 + fraction) * dt);
    }

    beats
}

/// Beat times for every oscillator in a trajectory, one ascending
/// list per column.
pub fn extract_beats(trajectory: &PhaseTrajectory, dt: f64) -> Vec<Vec<f64>> {
    (0..trajectory.ncols())
        .map(|i| beat_times(trajectory.column(i), dt))
        .collect()
}

/// All beats across all oscillators, flattened and sorted by time.
pub fn beat_events(trajectory: &PhaseTrajectory, dt: f64) -> Vec<BeatEvent> {
    let mut events: Vec<BeatEvent> = extract_beats(trajectory, dt)
        .into_iter()
        .enumerate()
        .flat_map(|(oscillator, times)| {
            times
                .into_iter()
                .map(move |time| BeatEvent { oscillator, time })
        })
        .collect();
    events.sort_by(|a, b| a.time.total_cmp(&b.time));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    /// Linear phase ramp θ(t) = ω·t sampled at dt.
    fn ramp(omega: f64, dt: f64, steps: usize) -> Array1<f64> {
        Array1::from_iter((0..=steps).map(|t| omega * t as f64 * dt))
    }

    #[test]
    fn unit_frequency_beats_once_per_turn() {
        // ω = 1, dt = 0.01: the first revolution completes near step
        // 628 and every beat lands 2π apart.
        let phases = ramp(1.0, 0.01, 1000);
        let beats = beat_times(phases.view(), 0.01);

        assert_eq!(beats.len(), 1);
        assert!((beats[0] - TAU).abs() < 0.01, "beat at {}", beats[0]);
    }

    #[test]
    fn beat_times_are_strictly_increasing() {
        let phases = ramp(5.0, 0.01, 2000);
        let beats = beat_times(phases.view(), 0.01);

        assert!(beats.len() >= 10);
        for pair in beats.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        // Successive revolutions are 2π/ω apart.
        for pair in beats.windows(2) {
            assert!((pair[1] - pair[0] - TAU / 5.0).abs() < 0.01);
        }
    }

    #[test]
    fn interpolation_stays_inside_the_step() {
        let phases = ramp(3.7, 0.005, 5000);
        let dt = 0.005;
        let beats = beat_times(phases.view(), dt);

        // Recompute the wrap indices independently and check each
        // beat lies inside its bracketing step.
        let mut wraps = Vec::new();
        for y in 0..phases.len() - 1 {
            if phases[y + 1].rem_euclid(TAU) < phases[y].rem_euclid(TAU) {
                wraps.push(y);
            }
        }
        assert_eq!(wraps.len(), beats.len());
        for (&y, &t) in wraps.iter().zip(&beats) {
            assert!(t >= y as f64 * dt);
            assert!(t <= (y + 1) as f64 * dt);
        }
    }

    #[test]
    fn exact_multiple_at_a_sample_point() {
        // Phase hits 2π exactly on a step boundary; exactly one beat.
        let phases = Array1::from_vec(vec![0.0, TAU / 2.0, TAU, 1.5 * TAU]);
        let beats = beat_times(phases.view(), 1.0);
        assert_eq!(beats.len(), 1);
        assert!((beats[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn backward_dip_is_not_a_beat() {
        // Wrapped value decreases but no multiple is crossed.
        let phases = Array1::from_vec(vec![5.0, 6.0, 5.8, 6.0, 6.2]);
        let beats = beat_times(phases.view(), 1.0);
        assert!(beats.is_empty());
    }

    #[test]
    fn nonzero_initial_phase_keeps_first_beat_honest() {
        // Starting at 3 rad, the first crossing of 2π happens after
        // (2π − 3) time units at ω = 1.
        let phases = Array1::from_iter((0..=700).map(|t| 3.0 + t as f64 * 0.01));
        let beats = beat_times(phases.view(), 0.01);
        assert_eq!(beats.len(), 1);
        assert!((beats[0] - (TAU - 3.0)).abs() < 0.01);
    }

    #[test]
    fn events_interleave_across_oscillators() {
        let steps = 2000;
        let mut traj = Array2::zeros((steps + 1, 2));
        for t in 0..=steps {
            traj[[t, 0]] = 4.0 * t as f64 * 0.01;
            traj[[t, 1]] = 1.0 + 4.0 * t as f64 * 0.01;
        }

        let events = beat_events(&traj, 0.01);
        assert!(!events.is_empty());
        for pair in events.windows(2) {
            assert!(pair[1].time >= pair[0].time);
        }
        // The head-started oscillator 1 beats first.
        assert_eq!(events[0].oscillator, 1);
    }

    #[test]
    fn matched_oscillators_beat_together() {
        // The end-to-end scenario: two identical uncoupled noiseless
        // oscillators must produce matching beats near step 628.
        let phases = ramp(1.0, 0.01, 1000);
        let mut traj = Array2::zeros((1001, 2));
        for t in 0..=1000 {
            traj[[t, 0]] = phases[t];
            traj[[t, 1]] = phases[t];
        }

        let per_osc = extract_beats(&traj, 0.01);
        assert_eq!(per_osc[0].len(), 1);
        assert_eq!(per_osc[1].len(), 1);
        assert!((per_osc[0][0] - per_osc[1][0]).abs() < 1e-12);
        assert!((per_osc[0][0] / 0.01 - 628.3).abs() < 1.0);
    }
}
