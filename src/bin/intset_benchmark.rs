use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use redis_intset::config::BenchmarkConfig;
use redis_intset::stress::{create_set, stress_add_delete, stress_lookups, stress_upgrades, StressReport};
use redis_intset::Result;

#[derive(Parser, Clone, Debug)]
#[command(name = "intset-benchmark")]
#[command(about = "Stress and timing runs for the intset encoding", long_about = None)]
struct Cli {
    /// json or toml config file
    #[arg(short, long)]
    config: Option<String>,
    #[arg(short, long)]
    size: Option<usize>,
    #[arg(short, long)]
    bits: Option<u32>,
    #[arg(short, long)]
    lookups: Option<usize>,
    #[arg(short, long)]
    rounds: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    /// lookups, add-delete, upgrade; all when empty
    #[arg(short, long, num_args = 1..)]
    tests: Vec<String>,
}

impl Cli {
    fn merge(&self, mut config: BenchmarkConfig) -> BenchmarkConfig {
        if let Some(size) = self.size {
            config.set_size = size;
        }
        if let Some(bits) = self.bits {
            config.bits = bits;
        }
        if let Some(lookups) = self.lookups {
            config.lookups = lookups;
        }
        if let Some(rounds) = self.rounds {
            config.add_delete_rounds = rounds;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config
    }
}

fn test_is_selected(tests: &[String], name: &str) -> bool {
    tests.is_empty() || tests.iter().any(|t| t == name)
}

fn print_report(report: &StressReport) {
    let hist = &report.latency;
    println!("======{}======", report.name.to_uppercase());
    println!(" {} operations completed in {:.3} seconds", report.ops, report.elapsed.as_secs_f64());
    println!(" final set: {} elements, {} encoding", report.final_len, report.final_encoding);
    println!(" Throughput summary: {:.2} ops per second", report.ops_per_sec());
    println!(" Latency summary (ns):");
    println!("     {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}", "avg", "min", "p50", "p95", "p99", "max");
    println!(
        "     {:>8.0} {:>8} {:>8} {:>8} {:>8} {:>8}",
        hist.mean(),
        hist.min(),
        hist.value_at_quantile(0.5),
        hist.value_at_quantile(0.95),
        hist.value_at_quantile(0.99),
        hist.max()
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::try_init()?;
    let cli = Cli::parse();
    let config = cli.merge(BenchmarkConfig::new(cli.config.as_deref()));
    info!(?config, "intset benchmark start");

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    if test_is_selected(&cli.tests, "lookups") {
        let is = create_set(&mut rng, config.bits, config.set_size);
        let report = stress_lookups(&mut rng, &is, config.bits, config.lookups)?;
        print_report(&report);
    }
    if test_is_selected(&cli.tests, "add-delete") {
        let report = stress_add_delete(&mut rng, config.add_delete_rounds, config.add_delete_range)?;
        print_report(&report);
    }
    if test_is_selected(&cli.tests, "upgrade") {
        let report = stress_upgrades(&mut rng, config.set_size)?;
        print_report(&report);
    }

    Ok(())
}
