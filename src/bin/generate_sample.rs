use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use shopping_trends::data::model::Record;
use shopping_trends::data::writer::{write_csv, write_parquet};

const CATEGORIES: [(&str, f64); 4] = [
    ("Clothing", 0.45),
    ("Accessories", 0.32),
    ("Footwear", 0.15),
    ("Outerwear", 0.08),
];
const AGE_GROUPS: [&str; 6] = ["18-25", "26-35", "36-45", "46-55", "56-65", "65+"];
const SEASONS: [&str; 4] = ["Winter", "Spring", "Summer", "Fall"];
const PAYMENT_METHODS: [&str; 6] = [
    "Credit Card",
    "PayPal",
    "Cash",
    "Debit Card",
    "Venmo",
    "Bank Transfer",
];
/// Label and the yearly purchase count it implies.
const FREQUENCIES: [(&str, f64); 7] = [
    ("Weekly", 52.0),
    ("Bi-Weekly", 26.0),
    ("Fortnightly", 26.0),
    ("Monthly", 12.0),
    ("Quarterly", 4.0),
    ("Every 3 Months", 4.0),
    ("Annually", 1.0),
];

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_f64() * items.len() as f64) as usize % items.len()]
    }

    /// Pick by weight; weights need not sum to one.
    fn weighted<'a>(&mut self, items: &'a [(&'a str, f64)]) -> &'a str {
        let total: f64 = items.iter().map(|(_, w)| w).sum();
        let mut roll = self.next_f64() * total;
        for (item, w) in items {
            if roll < *w {
                return *item;
            }
            roll -= w;
        }
        items[items.len() - 1].0
    }
}

fn generate(rows: usize, rng: &mut SimpleRng) -> Vec<Record> {
    (0..rows)
        .map(|_| {
            let category = rng.weighted(&CATEGORIES);
            // Skewed towards the younger age groups.
            let age_idx = (rng.next_f64() * rng.next_f64() * AGE_GROUPS.len() as f64) as usize;
            let age_group = AGE_GROUPS[age_idx.min(AGE_GROUPS.len() - 1)];
            let season = if rng.next_f64() < 0.3 {
                "Winter"
            } else {
                *rng.pick(&SEASONS)
            };
            let (frequency_label, per_year) = *rng.pick(&FREQUENCIES);
            let purchase_amount = (20.0 + rng.next_f64() * 80.0).round();
            let review_rating = ((2.5 + rng.next_f64() * 2.5) * 10.0).round() / 10.0;

            Record {
                category: category.to_string(),
                age_group: age_group.to_string(),
                season: season.to_string(),
                review_rating,
                purchase_amount,
                purchase_frequency: per_year,
                total_purchase_amount: purchase_amount * per_year,
                payment_method: rng.pick(&PAYMENT_METHODS).to_string(),
                frequency_label: frequency_label.to_string(),
            }
        })
        .collect()
}

/// Write a synthetic shopping dataset as CSV and Parquet.
#[derive(Debug, Parser)]
#[command(name = "generate_sample", version, about)]
struct Args {
    /// Directory receiving processed_dataset.csv and processed_dataset.parquet.
    #[arg(default_value = ".")]
    out_dir: PathBuf,

    /// Number of transactions to generate.
    #[arg(default_value_t = 3900)]
    rows: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut rng = SimpleRng::new(42);
    let records = generate(args.rows, &mut rng);

    let csv_path = args.out_dir.join("processed_dataset.csv");
    write_csv(&csv_path, &records)
        .with_context(|| format!("writing {}", csv_path.display()))?;
    let parquet_path = args.out_dir.join("processed_dataset.parquet");
    write_parquet(&parquet_path, &records)
        .with_context(|| format!("writing {}", parquet_path.display()))?;

    println!(
        "Wrote {} records to {} and {}",
        records.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn args_default_to_current_dir_and_3900_rows() {
        let args = Args::try_parse_from(["generate_sample"]).unwrap();
        assert_eq!(args.out_dir, PathBuf::from("."));
        assert_eq!(args.rows, 3900);

        let args = Args::try_parse_from(["generate_sample", "out", "10"]).unwrap();
        assert_eq!(args.out_dir, PathBuf::from("out"));
        assert_eq!(args.rows, 10);
    }

    #[test]
    fn help_and_bad_row_counts_are_not_output_dirs() {
        Args::command().debug_assert();
        let help = Args::try_parse_from(["generate_sample", "--help"]).unwrap_err();
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
        assert!(Args::try_parse_from(["generate_sample", "out", "many"]).is_err());
    }

    #[test]
    fn generated_totals_are_amount_times_frequency() {
        let records = generate(200, &mut SimpleRng::new(42));
        assert_eq!(records.len(), 200);
        for r in &records {
            assert_eq!(r.total_purchase_amount, r.purchase_amount * r.purchase_frequency);
            assert!(AGE_GROUPS.contains(&r.age_group.as_str()));
        }
        assert_eq!(records, generate(200, &mut SimpleRng::new(42)));
    }
}
