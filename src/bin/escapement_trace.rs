//! Escapement Trace: Metronome Limit Cycle
//!
//! Runs the escapement metronome from rest near the center and dumps
//! the phase-plane trajectory (x, v) as CSV. Released inside the
//! impulse window, the mechanism pumps itself up to a steady tick.

use rhythm_dynamics::{DynamicalSystem, EscapementMetronome, RhythmError, SeriesRecorder};

fn main() -> Result<(), RhythmError> {
    println!("═══════════════════════════════════════════════════════════════");
    println!("  Escapement Metronome: Limit Cycle Trace");
    println!("═══════════════════════════════════════════════════════════════\n");

    let mut metronome = EscapementMetronome::new();
    let steps = 10_000; // t ∈ [0, 100] at dt = 0.01
    let stride = 10;

    println!("Running {} Euler steps...", steps);

    let mut recorder = SeriesRecorder::new();
    let mut ticks = 0usize;
    let mut last_positive = metronome.position() >= 0.0;

    recorder.record("time", metronome.time());
    recorder.record("position", metronome.position());
    recorder.record("velocity", metronome.velocity());

    for i in 1..=steps {
        metronome.step();

        let positive = metronome.position() >= 0.0;
        if positive != last_positive {
            ticks += 1;
            last_positive = positive;
        }

        if i % stride == 0 {
            recorder.record("time", metronome.time());
            recorder.record("position", metronome.position());
            recorder.record("velocity", metronome.velocity());
        }
    }

    let state = metronome.state();
    println!("  final state: x = {:.4}, v = {:.4}", state.position, state.velocity);
    println!("  {} center crossings ({} full periods)", ticks, ticks / 2);

    recorder.write_csv("escapement_phase.csv")?;
    println!("\n  wrote escapement_phase.csv");

    Ok(())
}
