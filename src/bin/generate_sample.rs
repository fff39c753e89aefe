use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;

use personality_dashboard::data::model::{
    Record, DRAINED_AFTER_SOCIALIZING, FRIENDS_CIRCLE_SIZE, GOING_OUTSIDE, PERSONALITY,
    POST_FREQUENCY, SOCIAL_EVENT_ATTENDANCE, STAGE_FEAR, TIME_SPENT_ALONE,
};

const ROWS: usize = 1000;

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

    /// Whole-number draw from N(mean, std_dev) clamped to `[0, max]`.
    fn score(&mut self, mean: f64, std_dev: f64, max: f64) -> f64 {
        self.gauss(mean, std_dev).round().clamp(0.0, max)
    }

    fn yes_no(&mut self, p_yes: f64) -> String {
        let answer = if self.next_f64() < p_yes { "Yes" } else { "No" };
        answer.to_string()
    }
}

/// Per-type trait profile: (mean, std_dev) per numeric column, P(yes).
struct Profile {
    name: &'static str,
    alone: (f64, f64),
    social: (f64, f64),
    outside: (f64, f64),
    friends: (f64, f64),
    posts: (f64, f64),
    p_fear: f64,
    p_drained: f64,
}

static PROFILES: [Profile; 2] = [
    Profile {
        name: "Extrovert",
        alone: (2.0, 1.5),
        social: (7.0, 1.8),
        outside: (5.0, 1.3),
        friends: (9.5, 3.0),
        posts: (6.5, 2.0),
        p_fear: 0.15,
        p_drained: 0.12,
    },
    Profile {
        name: "Introvert",
        alone: (7.5, 2.0),
        social: (2.0, 1.5),
        outside: (1.5, 1.1),
        friends: (3.0, 2.0),
        posts: (1.5, 1.3),
        p_fear: 0.85,
        p_drained: 0.88,
    },
];

fn generate(rng: &mut SimpleRng) -> Vec<Record> {
    (0..ROWS)
        .map(|_| {
            let p = &PROFILES[(rng.next_f64() < 0.48) as usize];
            Record {
                time_spent_alone: rng.score(p.alone.0, p.alone.1, 11.0),
                stage_fear: rng.yes_no(p.p_fear),
                social_event_attendance: rng.score(p.social.0, p.social.1, 10.0),
                going_outside: rng.score(p.outside.0, p.outside.1, 7.0),
                drained_after_socializing: rng.yes_no(p.p_drained),
                friends_circle_size: rng.score(p.friends.0, p.friends.1, 15.0) as u32,
                post_frequency: rng.score(p.posts.0, p.posts.1, 10.0),
                personality: p.name.to_string(),
            }
        })
        .collect()
}

fn write_csv(path: &Path, records: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for r in records {
        writer.serialize(r).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn to_batch(records: &[Record]) -> Result<RecordBatch> {
    let f64_col = |f: fn(&Record) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(records.iter().map(f).collect::<Vec<_>>()))
    };
    let str_col = |f: fn(&Record) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(records.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new(TIME_SPENT_ALONE, DataType::Float64, false),
        Field::new(STAGE_FEAR, DataType::Utf8, false),
        Field::new(SOCIAL_EVENT_ATTENDANCE, DataType::Float64, false),
        Field::new(GOING_OUTSIDE, DataType::Float64, false),
        Field::new(DRAINED_AFTER_SOCIALIZING, DataType::Utf8, false),
        Field::new(FRIENDS_CIRCLE_SIZE, DataType::Int64, false),
        Field::new(POST_FREQUENCY, DataType::Float64, false),
        Field::new(PERSONALITY, DataType::Utf8, false),
    ]));

    let friends: ArrayRef = Arc::new(Int64Array::from(
        records
            .iter()
            .map(|r| r.friends_circle_size as i64)
            .collect::<Vec<_>>(),
    ));

    RecordBatch::try_new(
        schema,
        vec![
            f64_col(|r| r.time_spent_alone),
            str_col(|r| r.stage_fear.as_str()),
            f64_col(|r| r.social_event_attendance),
            f64_col(|r| r.going_outside),
            str_col(|r| r.drained_after_socializing.as_str()),
            friends,
            f64_col(|r| r.post_frequency),
            str_col(|r| r.personality.as_str()),
        ],
    )
    .context("building record batch")
}

fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let records = generate(&mut rng);

    let csv_path = out_dir.join("personality_sample.csv");
    write_csv(&csv_path, &records)?;

    let batch = to_batch(&records)?;
    let parquet_path = out_dir.join("personality_sample.parquet");
    write_parquet(&parquet_path, &batch)?;

    let preview = pretty_format_batches(&[batch.slice(0, 5)]).context("formatting preview")?;
    log::info!("First rows:\n{preview}");

    println!(
        "Wrote {} records to {} and {}",
        records.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
