//! Forge command line front end.
//!
//! A text-mode caller of the enhancement core: inspect the rule table,
//! resolve single attempts, run batches and the auto-enhance loop.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use forge::build_info;
use forge::enhancement::{
    clamp_attempts, clamp_level, enhancement_rule, level_prefix, reach_target_probability,
    AttemptOutcome, MAX_LEVEL, MIN_LEVEL,
};
use forge::session::EnhanceSession;
use forge::statistics::Statistics;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "forge")]
#[command(about = "Gear enhancement odds, attempts and statistics", long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Print version and build information
    #[arg(short = 'V', long)]
    version: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the rule table with the no-fail chance of reaching each level
    Rules,

    /// Resolve one attempt at a level
    Attempt {
        #[arg(short, long, default_value_t = 7)]
        level: i64,
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Attempt repeatedly until the target or the attempt limit
    Batch {
        #[arg(long, default_value_t = 1)]
        start: i64,
        #[arg(short, long, default_value_t = 10)]
        target: i64,
        #[arg(short, long, default_value_t = 100)]
        max: i64,
        #[arg(short, long)]
        seed: Option<u64>,
        /// Print every attempt, not just the summary
        #[arg(long)]
        log: bool,
    },

    /// Chance of reaching a level from another with no failures
    Reach {
        #[arg(long, default_value_t = 1)]
        from: i64,
        #[arg(long, default_value_t = 15)]
        to: i64,
    },

    /// Attempt on a timer until the target, max level or Ctrl-C
    Auto {
        #[arg(long, default_value_t = 1)]
        start: i64,
        #[arg(short, long, default_value_t = 10)]
        target: i64,
        #[arg(short, long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = forge::constants::TICK_INTERVAL_MS)]
        interval_ms: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.version {
        println!("{}", build_info::version_line());
        return Ok(());
    }

    match cli.command {
        Some(Command::Rules) => print_rules(),
        Some(Command::Attempt { level, seed }) => {
            let mut rng = make_rng(seed);
            let outcome = forge::resolve_attempt(clamp_level(level), &mut rng)?;
            print_outcome(&outcome);
        }
        Some(Command::Batch {
            start,
            target,
            max,
            seed,
            log,
        }) => {
            let mut rng = make_rng(seed);
            let mut session = EnhanceSession::new();
            session.jump_to_level(clamp_level(start))?;
            session.set_target_level(clamp_level(target))?;
            let result = session.run_batch(clamp_attempts(max), &mut rng)?;
            if log {
                for outcome in &result.outcomes {
                    print_outcome(outcome);
                }
            }
            println!("Stopped: {:?}", result.stop_reason());
            print_statistics(&session.statistics());
        }
        Some(Command::Reach { from, to }) => {
            let (from, to) = (clamp_level(from), clamp_level(to));
            println!(
                "{} -> {}: {:.6}%",
                level_prefix(from),
                level_prefix(to),
                reach_target_probability(from, to) * 100.0
            );
        }
        Some(Command::Auto {
            start,
            target,
            seed,
            interval_ms,
        }) => run_auto(clamp_level(start), clamp_level(target), seed, interval_ms)?,
        None => Cli::command().print_help()?,
    }

    Ok(())
}

fn make_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn print_rules() {
    println!("Level  Success  Damage  Penalty  No-Fail From +1");
    println!("─────  ───────  ──────  ───────  ───────────────");
    for level in MIN_LEVEL..=MAX_LEVEL {
        if let Some(rule) = enhancement_rule(level) {
            println!(
                "{:>5}  {:>6.0}%  {:>5.0}%  {:>7}  {:>14.6}%",
                level_prefix(level),
                rule.success_rate * 100.0,
                rule.damage_rate * 100.0,
                rule.failure_penalty,
                reach_target_probability(MIN_LEVEL, level) * 100.0
            );
        }
    }
}

fn print_outcome(outcome: &AttemptOutcome) {
    println!(
        "{} -> {}  {}{}  (gold {}, shards {}, crystals {}, essence {})",
        level_prefix(outcome.previous_level),
        level_prefix(outcome.new_level),
        if outcome.success { "SUCCESS" } else { "FAILED" },
        if outcome.damage_occurred { " +damage" } else { "" },
        outcome.cost.gold,
        outcome.cost.shards,
        outcome.cost.crystals,
        outcome.cost.essence
    );
}

fn print_statistics(stats: &Statistics) {
    println!("Attempts:      {}", stats.total_attempts);
    println!(
        "Success Rate:  {:.1}% ({} ok, {} failed)",
        stats.success_rate() * 100.0,
        stats.successes,
        stats.failures
    );
    println!("Damage Events: {}", stats.damage_count);
    println!("Final Level:   {}", level_prefix(stats.final_level));
    println!("Highest Level: {}", level_prefix(stats.highest_level));
    println!("Gold:          {}", stats.total_gold_spent());
    println!("Shards:        {}", stats.spent.shards);
    println!("Crystals:      {}", stats.spent.crystals);
    println!("Essence:       {}", stats.spent.essence);
    println!("PHP:           {:.2}", stats.monetary_equivalent());
}

fn run_auto(start: u8, target: u8, seed: Option<u64>, interval_ms: u64) -> Result<()> {
    use forge::auto_enhance::{spawn_auto_enhance, AutoConfig};
    use forge::session::SharedSession;
    use std::time::Duration;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let mut session = EnhanceSession::new();
        session.jump_to_level(start)?;
        session.set_target_level(target)?;
        let shared = SharedSession::new(session);

        let config = AutoConfig {
            interval: Duration::from_millis(interval_ms.max(1)),
            seed,
        };
        let mut handle = spawn_auto_enhance(shared.clone(), config)?;
        let stopper = handle.stopper();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                stopper.stop();
            }
        });

        while let Some(outcome) = handle.next_outcome().await {
            print_outcome(&outcome);
        }
        let summary = handle.join().await?;
        println!(
            "Auto-enhance ended: {:?} after {} attempts at {}",
            summary.stop_reason,
            summary.attempts,
            level_prefix(summary.final_level)
        );
        print_statistics(&shared.statistics());
        Ok::<(), anyhow::Error>(())
    })
}
