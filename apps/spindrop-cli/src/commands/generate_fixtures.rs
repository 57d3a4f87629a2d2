use crate::error::{CliError, CliResult};
use csv::Writer;
use rand::{rngs::StdRng, Rng, SeedableRng};
use solana_sdk::pubkey::Pubkey;
use spindrop_csvs::ALLOCATION_CSV_HEADERS;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AmountDistribution {
    Uniform,
    /// Weighted towards small amounts
    Realistic,
    Exponential,
}

impl AmountDistribution {
    fn parse(name: &str) -> CliResult<Self> {
        match name {
            "uniform" => Ok(Self::Uniform),
            "realistic" => Ok(Self::Realistic),
            "exponential" => Ok(Self::Exponential),
            _ => Err(CliError::InvalidConfig(format!(
                "Unknown distribution type: {}. Valid options: uniform, realistic, exponential",
                name
            ))),
        }
    }

    /// Whole-token amount in `min..=max`
    fn sample(&self, rng: &mut StdRng, min: u64, max: u64) -> u64 {
        let fraction = match self {
            Self::Uniform => return rng.gen_range(min..=max),
            Self::Realistic => {
                let x: f64 = rng.gen();
                1.0 - (-x * 2.0).exp()
            }
            Self::Exponential => {
                let x: f64 = rng.gen_range(f64::EPSILON..1.0);
                (-x.ln() / 2.0).min(1.0)
            }
        };

        // Offset within max - min, which spans all of u64 when min is 0
        let span = max - min;
        let offset = (fraction * (span as f64 + 1.0)) as u64;
        min + offset.min(span)
    }
}

/// Generate a deterministic allocation file for benchmarking and testing
pub fn execute(
    count: u64,
    seed: u64,
    output: PathBuf,
    distribution: String,
    min_amount: u64,
    max_amount: u64,
    fraction_digits: u8,
) -> CliResult<()> {
    if min_amount > max_amount {
        return Err(CliError::InvalidConfig(format!(
            "min_amount {} exceeds max_amount {}",
            min_amount, max_amount
        )));
    }
    if fraction_digits > 9 {
        return Err(CliError::InvalidConfig(
            "fraction_digits must be at most 9".to_string(),
        ));
    }
    let distribution = AmountDistribution::parse(&distribution)?;

    println!("Generating {} recipients with seed {}", count, seed);
    println!("Distribution: {:?}", distribution);
    println!("Amount range: {} - {}", min_amount, max_amount);

    write_fixtures(
        &output,
        count,
        seed,
        distribution,
        min_amount,
        max_amount,
        fraction_digits,
    )?;

    println!("✅ Generated allocations: {}", output.display());
    Ok(())
}

fn write_fixtures(
    path: &Path,
    count: u64,
    seed: u64,
    distribution: AmountDistribution,
    min_amount: u64,
    max_amount: u64,
    fraction_digits: u8,
) -> CliResult<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(ALLOCATION_CSV_HEADERS)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let fraction_scale = 10u64.pow(fraction_digits as u32);

    for i in 0..count {
        let recipient = Pubkey::new_from_array(rng.gen());
        let whole = distribution.sample(&mut rng, min_amount, max_amount);

        let amount = if fraction_digits == 0 {
            whole.to_string()
        } else {
            let fraction = rng.gen_range(0..fraction_scale);
            format!(
                "{}.{:0width$}",
                whole,
                fraction,
                width = fraction_digits as usize
            )
        };

        writer.write_record([recipient.to_string(), amount])?;

        if count > 10_000 && i % 10_000 == 0 {
            debug!(generated = i, total = count, "generating fixtures");
        }
    }

    writer.flush()?;
    Ok(())
}
