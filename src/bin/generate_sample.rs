use anyhow::{Context, Result};
use serde::Serialize;

/// One row of the demo survey table. `None` fields are written as empty cells.
#[derive(Debug, Serialize)]
struct SurveyRow {
    respondent_id: u32,
    age: Option<u32>,
    height_cm: f64,
    weight_kg: Option<f64>,
    income: Option<f64>,
    city: Option<&'static str>,
    segment: &'static str,
    member: bool,
}

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_dataset.csv".to_string());

    let mut rng = SimpleRng::new(42);
    let cities = ["Paris", "Lyon", "Nice", "Lille", "Nantes"];
    let segments = ["student", "employee", "self-employed", "retired"];

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;

    let n_rows = 500;
    for respondent_id in 1..=n_rows {
        let segment = rng.pick(&segments);
        let age_mean = match segment {
            "student" => 22.0,
            "retired" => 70.0,
            _ => 42.0,
        };
        let age = rng.gauss(age_mean, 6.0).clamp(16.0, 95.0).round() as u32;
        let height_cm = round2(rng.gauss(171.0, 9.0));
        // weight tracks height so the heatmap has something to show
        let weight_kg = round2(0.9 * (height_cm - 100.0) + rng.gauss(0.0, 8.0));
        let income = round2((rng.gauss(10.3, 0.45)).exp());

        let row = SurveyRow {
            respondent_id,
            age: (!rng.chance(0.03)).then_some(age),
            height_cm,
            weight_kg: (!rng.chance(0.05)).then_some(weight_kg),
            income: (segment != "student" || rng.chance(0.3)).then_some(income),
            city: (!rng.chance(0.02)).then(|| rng.pick(&cities)),
            segment,
            member: rng.chance(0.4),
        };
        writer
            .serialize(&row)
            .with_context(|| format!("writing row {respondent_id}"))?;
    }
    writer.flush().context("flushing CSV writer")?;

    println!("Wrote {n_rows} survey rows to {output_path}");
    Ok(())
}
