use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

/// Write a synthetic superstore campaign dataset
#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
struct Args {
    /// Output file; `.parquet` writes Parquet, anything else CSV
    #[arg(default_value = "superstorecampaign_data.csv")]
    output: PathBuf,

    /// Number of customers
    #[arg(short, long, default_value = "2240")]
    rows: usize,

    /// PRNG seed
    #[arg(short, long, default_value = "42")]
    seed: u64,
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

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a>(&mut self, weighted: &[(&'a str, f64)]) -> &'a str {
        let total: f64 = weighted.iter().map(|(_, w)| w).sum();
        let mut r = self.next_f64() * total;
        for &(name, w) in weighted {
            if r < w {
                return name;
            }
            r -= w;
        }
        weighted[weighted.len() - 1].0
    }
}

const EDUCATION: [(&str, f64); 5] = [
    ("Graduation", 0.50),
    ("PhD", 0.22),
    ("Master", 0.16),
    ("2n Cycle", 0.09),
    ("Basic", 0.03),
];

const MARITAL: [(&str, f64); 5] = [
    ("Married", 0.39),
    ("Together", 0.26),
    ("Single", 0.21),
    ("Divorced", 0.10),
    ("Widow", 0.04),
];

/// One generated customer. `income` is missing for ~1% of rows and
/// `years_since_enrollment` is occasionally not a number.
struct Customer {
    id: i64,
    education: &'static str,
    marital_status: &'static str,
    income: Option<f64>,
    kidhome: i64,
    teenhome: i64,
    recency: i64,
    spending: [i64; 6],
    purchases: [i64; 4],
    web_visits: i64,
    response: i64,
    complain: i64,
    customer_age: i64,
    years_since_enrollment: String,
}

const HEADER: [&str; 22] = [
    "Id",
    "Education",
    "Marital_Status",
    "Income",
    "Kidhome",
    "Teenhome",
    "Recency",
    "MntWines",
    "MntFruits",
    "MntMeatProducts",
    "MntFishProducts",
    "MntSweetProducts",
    "MntGoldProds",
    "NumDealsPurchases",
    "NumWebPurchases",
    "NumCatalogPurchases",
    "NumStorePurchases",
    "NumWebVisitsMonth",
    "Response",
    "Complain",
    "Customer_Age",
    "Years_Since_Enrollment",
];

fn generate(rng: &mut SimpleRng, id: i64) -> Customer {
    let education = rng.pick(&EDUCATION);
    let marital_status = rng.pick(&MARITAL);
    let customer_age = rng.gauss(55.0, 11.0).clamp(27.0, 90.0).round() as i64;

    let base_income = match education {
        "PhD" => 56000.0,
        "Master" => 52000.0,
        "Graduation" => 52000.0,
        "2n Cycle" => 47000.0,
        _ => 20000.0,
    };
    let income_value = rng.gauss(base_income, 20000.0).clamp(1730.0, 160000.0).round();
    let income = (!rng.chance(0.01)).then_some(income_value);

    // Spending scales with income.
    let wealth = income_value / 50000.0;
    let spend = |rng: &mut SimpleRng, scale: f64| -> i64 {
        (rng.next_f64().powi(2) * scale * wealth).round() as i64
    };
    let spending = [
        spend(rng, 900.0),
        spend(rng, 90.0),
        spend(rng, 500.0),
        spend(rng, 120.0),
        spend(rng, 90.0),
        spend(rng, 100.0),
    ];

    let purchases = [
        rng.below(8) as i64,
        rng.below(12) as i64,
        (rng.below(10) as f64 * wealth.min(1.5)) as i64,
        2 + rng.below(12) as i64,
    ];

    let years_since_enrollment = if rng.chance(0.005) {
        "unknown".to_string()
    } else {
        (9 + rng.below(3)).to_string()
    };

    Customer {
        id,
        education,
        marital_status,
        income,
        kidhome: rng.below(3) as i64,
        teenhome: rng.below(3) as i64,
        recency: rng.below(100) as i64,
        spending,
        purchases,
        web_visits: rng.below(10) as i64,
        response: i64::from(rng.chance(0.15)),
        complain: i64::from(rng.chance(0.01)),
        customer_age,
        years_since_enrollment,
    }
}

fn write_csv(path: &Path, customers: &[Customer]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(HEADER)?;
    for c in customers {
        let mut record: Vec<String> = vec![
            c.id.to_string(),
            c.education.to_string(),
            c.marital_status.to_string(),
            c.income.map(|v| format!("{v:.1}")).unwrap_or_default(),
            c.kidhome.to_string(),
            c.teenhome.to_string(),
            c.recency.to_string(),
        ];
        record.extend(c.spending.iter().map(|v| v.to_string()));
        record.extend(c.purchases.iter().map(|v| v.to_string()));
        record.extend([
            c.web_visits.to_string(),
            c.response.to_string(),
            c.complain.to_string(),
            c.customer_age.to_string(),
            c.years_since_enrollment.clone(),
        ]);
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, customers: &[Customer]) -> Result<()> {
    let ints = |f: &dyn Fn(&Customer) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(customers.iter().map(f).collect::<Vec<_>>()))
    };
    let strs = |f: &dyn Fn(&Customer) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(customers.iter().map(f).collect::<Vec<_>>()))
    };

    let mut fields = Vec::new();
    let mut arrays: Vec<ArrayRef> = Vec::new();
    for name in HEADER {
        let (data_type, array) = match name {
            "Id" => (DataType::Int64, ints(&|c| c.id)),
            "Education" => (DataType::Utf8, strs(&|c| c.education)),
            "Marital_Status" => (DataType::Utf8, strs(&|c| c.marital_status)),
            "Income" => (
                DataType::Float64,
                Arc::new(Float64Array::from(
                    customers.iter().map(|c| c.income).collect::<Vec<_>>(),
                )) as ArrayRef,
            ),
            "Kidhome" => (DataType::Int64, ints(&|c| c.kidhome)),
            "Teenhome" => (DataType::Int64, ints(&|c| c.teenhome)),
            "Recency" => (DataType::Int64, ints(&|c| c.recency)),
            "NumWebVisitsMonth" => (DataType::Int64, ints(&|c| c.web_visits)),
            "Response" => (DataType::Int64, ints(&|c| c.response)),
            "Complain" => (DataType::Int64, ints(&|c| c.complain)),
            "Customer_Age" => (DataType::Int64, ints(&|c| c.customer_age)),
            "Years_Since_Enrollment" => {
                (DataType::Utf8, strs(&|c| c.years_since_enrollment.as_str()))
            }
            other => {
                let i = HEADER
                    .iter()
                    .position(|h| *h == other)
                    .context("unknown column")?;
                // Columns 7..13 are spending, 13..17 purchases.
                let array = if i < 13 {
                    ints(&|c| c.spending[i - 7])
                } else {
                    ints(&|c| c.purchases[i - 13])
                };
                (DataType::Int64, array)
            }
        };
        fields.push(Field::new(name, data_type, name == "Income"));
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let customers: Vec<Customer> = (0..args.rows)
        .map(|i| generate(&mut rng, 1000 + i as i64))
        .collect();

    let is_parquet = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));

    if is_parquet {
        write_parquet(&args.output, &customers)?;
    } else {
        write_csv(&args.output, &customers)?;
    }

    println!("Wrote {} customers to {}", customers.len(), args.output.display());
    Ok(())
}
