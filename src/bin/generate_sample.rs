use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Write a synthetic import/export transactions file.
#[derive(Parser, Debug)]
#[command(name = "generate_sample", version)]
struct Args {
    /// Output CSV path.
    #[arg(long, short, default_value = "Imports_Exports_Dataset.csv")]
    output: PathBuf,

    /// Number of transactions to generate.
    #[arg(long, default_value_t = 15000)]
    rows: usize,

    /// RNG seed; the same seed always produces the same file.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const CATEGORIES: [(&str, f64); 5] = [
    ("Electronics", 6200.0),
    ("Machinery", 7400.0),
    ("Clothing", 3100.0),
    ("Furniture", 4800.0),
    ("Toys", 2200.0),
];
const PRODUCTS: [&str; 8] = [
    "Laptop", "Turbine", "Jacket", "Sofa", "Drone", "Printer", "Boots", "Puzzle",
];
const DIRECTIONS: [&str; 2] = ["Import", "Export"];
const PAYMENT_TERMS: [&str; 4] = ["Prepaid", "Net 30", "Net 60", "Cash on Delivery"];
const SHIPPING_METHODS: [&str; 3] = ["Air", "Sea", "Land"];
const COUNTRIES: [&str; 12] = [
    "Chile", "Peru", "Germany", "India", "Japan", "Kenya", "Brazil", "Canada", "France",
    "Vietnam", "Mexico", "Norway",
];
const SURNAMES: [&str; 10] = [
    "Garcia", "Smith", "Okafor", "Tanaka", "Müller", "Dubois", "Singh", "Silva", "Novak",
    "Kowalski",
];

fn pick<'a, R: Rng>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    // A fixed pool so customers repeat and rankings are meaningful.
    let customers: Vec<String> = (0..400)
        .map(|i| {
            let suffix = ["Ltd", "Inc", "Group", "LLC"][i % 4];
            format!("{} {suffix}", pick(&mut rng, &SURNAMES))
        })
        .collect();

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    writer.write_record([
        "Transaction_ID",
        "Country",
        "Product",
        "Import_Export",
        "Quantity",
        "Value",
        "Date",
        "Category",
        "Shipping_Method",
        "Customer",
        "Payment_Terms",
    ])?;

    for i in 0..args.rows {
        let (category, typical_value) = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
        let value: f64 = typical_value * rng.gen_range(0.05..1.6);
        let date = format!(
            "{:02}-{:02}-{}",
            rng.gen_range(1..=28),
            rng.gen_range(1..=12),
            rng.gen_range(2019..=2024)
        );
        let customer = customers
            .choose(&mut rng)
            .map(String::as_str)
            .unwrap_or_default();

        writer.write_record([
            format!("T{:06}", i + 1).as_str(),
            pick(&mut rng, &COUNTRIES),
            pick(&mut rng, &PRODUCTS),
            pick(&mut rng, &DIRECTIONS),
            rng.gen_range(1..=5000).to_string().as_str(),
            format!("{value:.2}").as_str(),
            date.as_str(),
            category,
            pick(&mut rng, &SHIPPING_METHODS),
            customer,
            pick(&mut rng, &PAYMENT_TERMS),
        ])?;
    }

    writer.flush().context("flushing CSV")?;
    println!("Wrote {} transactions to {}", args.rows, args.output.display());
    Ok(())
}
