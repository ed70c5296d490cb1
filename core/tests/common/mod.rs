#![allow(dead_code)]

use motiongrade_core::{Recording, Sample, Vec3};

pub const IDLE: usize = 100;
pub const CYCLE: usize = 50; // samples per repetition at 100 Hz
pub const REPS: usize = 10;
pub const DT_MS: f64 = 10.0;

/// Idle lead-in followed by `REPS` stomps. Gyro bumps of height
/// `gyro_peak` sit in the middle of every cycle; the accelerometer swings
/// by `accel_swing` around gravity with a constant lateral `lateral` part.
pub fn stomp_side(gyro_peak: f64, accel_swing: f64, lateral: f64) -> Vec<Sample> {
    let mut out = Vec::with_capacity(IDLE + REPS * CYCLE);
    for j in 0..IDLE {
        out.push(Sample::new(
            j as f64 * DT_MS,
            Vec3::new(0.0, 0.0, 9.81),
            Vec3::new(0.0, 0.0, 0.0),
        ));
    }
    for k in 0..REPS * CYCLE {
        let j = IDLE + k;
        let phase = (k % CYCLE) as f64;
        let u = (phase - 25.0) * 0.2;
        let g = gyro_peak * (-u * u).exp();
        let z = 9.81 + accel_swing * (2.0 * std::f64::consts::PI * phase / CYCLE as f64).sin();
        out.push(Sample::new(
            j as f64 * DT_MS,
            Vec3::new(lateral, 0.0, z),
            Vec3::new(0.0, 0.0, g),
        ));
    }
    out
}

pub fn flat_side(n: usize, z: f64) -> Vec<Sample> {
    (0..n)
        .map(|j| Sample::new(j as f64 * DT_MS, Vec3::new(0.0, 0.0, z), Vec3::default()))
        .collect()
}

/// Strong left foot, weaker right foot, same rhythm.
pub fn asymmetric_recording(name: &str) -> Recording {
    Recording::new(
        name,
        Default::default(),
        stomp_side(50.0, 5.0, 4.0),
        stomp_side(30.0, 3.0, 1.0),
    )
}

pub fn canonical_body(recording: &Recording) -> String {
    let [left, right] = recording.sides();
    serde_json::json!({ "LEFT": left.samples(), "RIGHT": right.samples() }).to_string()
}
