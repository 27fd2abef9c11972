//! Phase history buffer with delayed lookback.
//!
//! The integrator needs every past phase vector because coupling terms
//! read other oscillators' phases from `delay/dt` steps ago. The final
//! step count is known up front, so the buffer is pre-sized and rows
//! are written in place rather than grown by repeated appends.

use ndarray::{s, Array2, ArrayView1, ArrayView2};

/// Full phase trajectory: one row per recorded step, one column per
/// oscillator. Row 0 is the initial condition.
pub type PhaseTrajectory = Array2<f64>;

/// What `lookback` should do when a delay reaches past the recorded
/// history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookbackPolicy {
    /// Clamp to the oldest row, i.e. the initial phase vector.
    #[default]
    ClampToInitial,
    /// Reject at validation time any configuration whose delays could
    /// reach past the history available once coupling switches on.
    /// With this policy a running buffer never sees an out-of-range
    /// lookback.
    Strict,
}

/// Append-only buffer of phase vectors, indexed backwards from the
/// most recent row.
#[derive(Debug, Clone)]
pub struct PhaseHistory {
    data: Array2<f64>,
    len: usize,
}

impl PhaseHistory {
    /// Pre-size for `capacity` rows and record the initial phase
    /// vector as row 0.
    pub fn new(capacity: usize, initial: ArrayView1<f64>) -> Self {
        assert!(capacity >= 1, "history needs room for the initial row");
        let mut data = Array2::zeros((capacity, initial.len()));
        data.row_mut(0).assign(&initial);
        Self { data, len: 1 }
    }

    /// Record the next phase vector.
    pub fn push(&mut self, row: ArrayView1<f64>) {
        assert!(self.len < self.data.nrows(), "phase history full");
        self.data.row_mut(self.len).assign(&row);
        self.len += 1;
    }

    /// Most recently recorded phase vector.
    pub fn latest(&self) -> ArrayView1<f64> {
        self.data.row(self.len - 1)
    }

    /// Phase vector `steps_back` steps before the latest row, clamped
    /// to row 0 when the request reaches past the recorded history.
    pub fn lookback(&self, steps_back: usize) -> ArrayView1<f64> {
        let idx = (self.len - 1).saturating_sub(steps_back);
        self.data.row(idx)
    }

    /// Number of recorded rows (at least 1).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// View of the recorded prefix.
    pub fn view(&self) -> ArrayView2<f64> {
        self.data.slice(s![..self.len, ..])
    }

    /// Consume the buffer and return the recorded trajectory.
    pub fn into_trajectory(self) -> PhaseTrajectory {
        if self.len == self.data.nrows() {
            self.data
        } else {
            self.data.slice(s![..self.len, ..]).to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn initial_row_is_recorded() {
        let hist = PhaseHistory::new(10, array![0.0, 2.0, 1.0].view());
        assert_eq!(hist.len(), 1);
        assert_eq!(hist.latest(), array![0.0, 2.0, 1.0]);
    }

    #[test]
    fn lookback_walks_backwards_from_latest() {
        let mut hist = PhaseHistory::new(4, array![0.0, 0.0].view());
        hist.push(array![1.0, 10.0].view());
        hist.push(array![2.0, 20.0].view());

        assert_eq!(hist.lookback(0), array![2.0, 20.0]);
        assert_eq!(hist.lookback(1), array![1.0, 10.0]);
        assert_eq!(hist.lookback(2), array![0.0, 0.0]);
    }

    #[test]
    fn lookback_past_history_clamps_to_initial() {
        let mut hist = PhaseHistory::new(4, array![5.0].view());
        hist.push(array![6.0].view());

        assert_eq!(hist.lookback(100), array![5.0]);
    }

    #[test]
    fn trajectory_keeps_insertion_order() {
        let mut hist = PhaseHistory::new(3, array![0.0].view());
        hist.push(array![1.0].view());
        hist.push(array![2.0].view());

        let traj = hist.into_trajectory();
        assert_eq!(traj, array![[0.0], [1.0], [2.0]]);
    }

    #[test]
    fn partial_trajectory_is_truncated() {
        let mut hist = PhaseHistory::new(10, array![0.0].view());
        hist.push(array![1.0].view());

        let traj = hist.into_trajectory();
        assert_eq!(traj.nrows(), 2);
    }

    #[test]
    #[should_panic(expected = "phase history full")]
    fn push_past_capacity_panics() {
        let mut hist = PhaseHistory::new(1, array![0.0].view());
        hist.push(array![1.0].view());
    }
}
