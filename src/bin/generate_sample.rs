//! Write a deterministic sample `Results.txt` sweep for trying the explorer.

use std::fmt::Write as _;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // Full factorial sweep: speed × mass × target waypoint.
    let speeds = [0.5, 1.0, 1.5, 2.0];
    let masses = [1.0, 2.0, 5.0];
    let targets: [[f64; 3]; 3] = [
        [0.4, 0.0, 0.8],
        [0.2, 0.3, 1.1],
        [-0.1, 0.5, 0.9],
    ];

    let mut out = String::new();
    out.push_str("speed m/s;mass kg;target m|time s;error m;effort J\n");

    let mut trials = 0usize;
    for &speed in &speeds {
        for &mass in &masses {
            for target in &targets {
                let distance: f64 = target.iter().map(|c| c * c).sum::<f64>().sqrt();
                let time = distance / speed + rng.gauss(0.0, 0.02).abs();
                let error = (0.01 * mass / speed + rng.gauss(0.0, 0.002)).abs();
                let effort = 0.5 * mass * speed * speed * distance
                    + rng.gauss(0.0, 0.05).abs();

                let target_cell = target
                    .iter()
                    .map(|c| format!("{c:.3}"))
                    .collect::<Vec<_>>()
                    .join(",");
                writeln!(
                    out,
                    "{speed:.3};{mass:.3};{target_cell}|{time:.6};{error:.6};{effort:.6}"
                )
                .expect("writing to a String cannot fail");
                trials += 1;
            }
        }
    }

    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Results.txt".to_string());
    std::fs::write(&output_path, out).expect("Failed to write sample file");

    println!(
        "Wrote {trials} evaluations ({} speeds × {} masses × {} targets) to {output_path}",
        speeds.len(),
        masses.len(),
        targets.len()
    );
}
