//! Beat extraction from phase trajectories.

mod beats;

pub use beats::{beat_events, beat_times, extract_beats, BeatEvent};
