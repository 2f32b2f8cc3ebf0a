//! CLI walkthrough of the room pipeline.
//!
//! Places a 5.1 layout in a plaster shoebox with a carpeted floor, runs one
//! simulation and prints the traced paths, listener levels, per-band T60 and
//! the Schroeder decay of the impulse response.
//!
//! Run with:
//!   RUST_LOG=debug cargo run -p room-core --example surround_demo

use std::sync::Arc;

use room_core::constants::BANDS_6;
use room_core::impulse_response::energy_decay_curve;
use room_core::layout::SurroundLayout;
use room_core::reverb::t60_per_band;
use room_core::{AcousticMaterial, DVec3, Listener, Room, SimulationConfig, Simulator};

fn main() {
    env_logger::init();
    println!("=== Surround Room Demo ===");

    // 1. Room and layout.
    let mut room = Room::shoebox(7.0, 6.0, 2.8, Arc::new(AcousticMaterial::plaster()));
    room.set_material("floor", Arc::new(AcousticMaterial::carpet()));

    let listening = DVec3::new(0.0, 1.1, 0.0);
    let layout = SurroundLayout::surround_5_1();
    let speakers = layout.build(DVec3::ZERO, listening);
    let listener = Listener::new(listening);
    println!(
        "Room {}x{}x{} m, layout {}, {} speakers",
        room.width,
        room.length,
        room.height,
        layout.name,
        speakers.len()
    );

    // 2. Simulate at 20 °C.
    let simulator = match Simulator::new(SimulationConfig::from_temperature(20.0)) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("invalid config: {e}");
            std::process::exit(1);
        }
    };
    let result = match simulator.run(&room, &speakers, &listener) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("simulation failed: {e}");
            std::process::exit(1);
        }
    };

    // 3. Paths.
    println!("\n{} paths:", result.paths.len());
    for path in &result.paths {
        println!("  {path}");
    }

    // 4. Levels.
    println!("\nLevels at listener:");
    for (channel, db) in &result.levels.per_speaker_db {
        println!("  {channel:>4}: {db:6.1} dB");
    }
    println!("  overall: {:.1} dB", result.overall_db());

    // 5. Reverberation.
    println!("\nSabine T60 (volume {:.1} m³):", room.volume());
    for (freq, t60) in BANDS_6.iter().zip(t60_per_band(&room)) {
        println!("  {freq:>6.0} Hz: {t60:.2} s");
    }

    // 6. Decay of h(t). Only first-order paths are traced, so the energy
    //    runs out long before the statistical T60.
    let edc = energy_decay_curve(&result.impulse_response);
    println!("\nSchroeder decay of h(t):");
    for threshold in [-5.0, -10.0, -20.0] {
        match edc.iter().position(|&db| db <= threshold) {
            Some(n) => println!(
                "  {threshold:>4.0} dB at {:.1} ms",
                n as f64 * 1000.0 / result.sample_rate
            ),
            None => println!("  {threshold:>4.0} dB not reached"),
        }
    }
    println!("Done.");
}
