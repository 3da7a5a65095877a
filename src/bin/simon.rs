//! Simon CLI: recover hidden vectors from Simon's-problem measurements
//!
//! Commands:
//!   simon solve  validate and solve one hand-written measurement set
//!   simon run    orchestrated run against the sampling oracle
//!   simon cases  run the six reference scenarios and print a summary
//!   simon help   show usage

use simon_core::scenario::{self, Expectation, Source};
use simon_core::{
    AttemptRecord, BitOrder, BitVector, MeasurementBatch, MeasurementValidator, NoiseConfig,
    NullspaceSolver, OrthogonalSampler, Outcome, RetryOrchestrator, RunReport, Solution,
    SolverConfig, Verdict,
};
use std::env;
use std::process::ExitCode;

fn print_usage() {
    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║        simon v0.1 — Simon's Problem Post-Processing          ║
║        GF(2) Solver + Measurement Validation + Retries       ║
╚══════════════════════════════════════════════════════════════╝

Usage: simon <command> [options]

Commands:
  solve <n> <y...> [--lsb]                          Validate and solve one measurement set
  run   <n> <s> [shots] [attempts] [options]        Orchestrated run with retries
  cases [--seed k]                                  Run the six reference scenarios
  help                                              Show this message

Run options:
  --noise <p>     Flip one bit of each observed string with probability p
  --seed <k>      Seed for sampling and noise (default: OS entropy)
  --limit <k>     Keep only the first k distinct measurements per attempt
  --json          Print the full run report as JSON

Examples:
  simon solve 4 0010 0111 1001 0000
  simon solve 4 0110 0110
  simon run 4 1101
  simon run 4 1101 1024 3 --noise 0.4 --seed 7
  simon cases --seed 42
"#
    );
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let ok = match args[1].as_str() {
        "solve" => cmd_solve(&args[2..]),
        "run" => cmd_run(&args[2..]),
        "cases" => cmd_cases(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage();
            true
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            false
        }
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Positional arguments and `--flag value` pairs
struct ParsedArgs {
    positional: Vec<String>,
    noise: Option<f64>,
    seed: Option<u64>,
    limit: Option<usize>,
    json: bool,
    lsb: bool,
}

fn parse_args(args: &[String]) -> Result<ParsedArgs, String> {
    let mut parsed = ParsedArgs {
        positional: Vec::new(),
        noise: None,
        seed: None,
        limit: None,
        json: false,
        lsb: false,
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--noise" => parsed.noise = Some(flag_value(&mut iter, "--noise")?),
            "--seed" => parsed.seed = Some(flag_value(&mut iter, "--seed")?),
            "--limit" => parsed.limit = Some(flag_value(&mut iter, "--limit")?),
            "--json" => parsed.json = true,
            "--lsb" => parsed.lsb = true,
            _ => parsed.positional.push(arg.clone()),
        }
    }
    Ok(parsed)
}

fn flag_value<'a, T: std::str::FromStr>(
    iter: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> Result<T, String> {
    iter.next()
        .ok_or_else(|| format!("{} needs a value", flag))?
        .parse()
        .map_err(|_| format!("invalid value for {}", flag))
}

fn parse_positional<T: std::str::FromStr>(value: &str, name: &str) -> Result<T, String> {
    value.parse().map_err(|_| format!("{} must be a number, got '{}'", name, value))
}

fn cmd_solve(args: &[String]) -> bool {
    let parsed = match parse_args(args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("  {}", e);
            return false;
        }
    };
    if parsed.positional.len() < 2 {
        eprintln!("Usage: simon solve <n> <y...> [--lsb]");
        return false;
    }
    let n: usize = match parse_positional(&parsed.positional[0], "n") {
        Ok(n) => n,
        Err(e) => {
            eprintln!("  {}", e);
            return false;
        }
    };
    let order = if parsed.lsb { BitOrder::LsbFirst } else { BitOrder::MsbFirst };
    let batch = match MeasurementBatch::from_counts(
        n,
        parsed.positional[1..].iter().map(|s| (s.as_str(), 1)),
        order,
    ) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("  Bad measurement: {}", e);
            return false;
        }
    };

    println!("\n  Measured vectors: {}", join(batch.vectors()));
    println!("  Useful vectors:   {}", join(MeasurementValidator::clean(&batch).iter()));

    let set = match MeasurementValidator::validate(&batch) {
        Ok(set) => set,
        Err(e) => {
            println!("\n  Result: FAILURE");
            println!("  Reason: {}", e);
            println!("  Status: RETRY needed");
            return false;
        }
    };
    println!("  Rank: {}/{} needed", set.rank(), n - 1);

    match NullspaceSolver::solve(&set.reduction) {
        Ok(Solution::Found(s)) => {
            println!("\n  Result: SUCCESS");
            println!("  Recovered s = {}", s);
            true
        }
        Ok(Solution::TrivialOnly) => {
            println!("\n  Result: SUCCESS");
            println!("  Recovered s = {} (full rank, only the trivial solution)", "0".repeat(n));
            true
        }
        Ok(Solution::Insufficient { rank, needed }) => {
            println!("\n  Result: FAILURE");
            println!("  Reason: rank {} < {}", rank, needed);
            false
        }
        Err(e) => {
            eprintln!("  Solver error: {}", e);
            false
        }
    }
}

fn cmd_run(args: &[String]) -> bool {
    let parsed = match parse_args(args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("  {}", e);
            return false;
        }
    };
    if parsed.positional.len() < 2 {
        eprintln!("Usage: simon run <n> <s> [shots] [attempts] [--noise p] [--seed k] [--limit k] [--json]");
        return false;
    }

    let config = match build_config(&parsed) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("  {}", e);
            return false;
        }
    };
    let hidden = match BitVector::from_bits(&parsed.positional[1]) {
        Ok(s) if s.width() == config.width => s,
        Ok(s) => {
            eprintln!("  s has {} bits but n = {}", s.width(), config.width);
            return false;
        }
        Err(e) => {
            eprintln!("  Bad hidden vector: {}", e);
            return false;
        }
    };

    let oracle = match parsed.seed {
        Some(seed) => OrthogonalSampler::seeded(seed),
        None => OrthogonalSampler::from_entropy(),
    };
    let report = RetryOrchestrator::new(config, oracle, hidden.to_u64())
        .and_then(|o| o.with_expected(hidden))
        .and_then(|mut o| o.run());
    let report = match report {
        Ok(r) => r,
        Err(e) => {
            eprintln!("  Run aborted: {}", e);
            return false;
        }
    };

    if parsed.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("  Failed to encode report: {}", e);
                return false;
            }
        }
    } else {
        print_report(&report, Some(hidden));
    }
    report.is_success()
}

fn build_config(parsed: &ParsedArgs) -> Result<SolverConfig, String> {
    let defaults = SolverConfig::default();
    let width = parse_positional(&parsed.positional[0], "n")?;
    let shots = match parsed.positional.get(2) {
        Some(v) => parse_positional(v, "shots")?,
        None => defaults.shots,
    };
    let max_attempts = match parsed.positional.get(3) {
        Some(v) => parse_positional(v, "attempts")?,
        None => defaults.max_attempts,
    };
    let config = SolverConfig {
        width,
        shots,
        max_attempts,
        noise: parsed.noise.map(|probability| NoiseConfig {
            probability,
            seed: parsed.seed.map(|s| s.wrapping_add(1)),
        }),
        measurement_limit: parsed.limit,
    };
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn cmd_cases(args: &[String]) -> bool {
    let parsed = match parse_args(args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("  {}", e);
            return false;
        }
    };
    let seed = parsed.seed.unwrap_or_else(rand::random);

    println!("{}", "=".repeat(80));
    println!("SIMON'S ALGORITHM - REFERENCE SCENARIOS (seed {})", seed);
    println!("{}", "=".repeat(80));

    let mut rows = Vec::new();
    for case in scenario::catalog() {
        println!("\n{}", "=".repeat(80));
        println!("Case {}: {}", case.id, case.description);
        println!("{}", "=".repeat(80));
        let hidden = case.hidden_vector().ok();
        println!(
            "Input: n={}, s={}",
            case.width,
            hidden.map(|h| h.to_string()).unwrap_or_default()
        );
        if let Source::Fixed(strings) = &case.source {
            println!("Measurements supplied: {:?}", strings);
        }

        match case.run(seed) {
            Ok(report) => {
                print_report(&report, hidden);
                let observed = if report.is_success() { "Recovers s" } else { "Retry" };
                rows.push((case, observed.to_string()));
            }
            Err(e) => {
                println!("  Run aborted: {}", e);
                rows.push((case, "Aborted".to_string()));
            }
        }
    }

    println!("\n{}", "=".repeat(80));
    println!("SUMMARY TABLE");
    println!("{}", "=".repeat(80));
    println!(
        "{:<6} {:<4} {:<8} {:<30} {:<14} {:<14}",
        "Case", "n", "s", "Description", "Expected", "Observed"
    );
    println!("{}", "-".repeat(80));
    for (case, observed) in &rows {
        let expected = match case.expectation {
            Expectation::Recovers => "Recovers s",
            Expectation::Retry => "Retry",
        };
        let s = case.hidden_vector().map(|h| h.to_string()).unwrap_or_default();
        println!(
            "{:<6} {:<4} {:<8} {:<30} {:<14} {:<14}",
            case.id, case.width, s, case.description, expected, observed
        );
    }
    println!("{}", "=".repeat(80));
    true
}

fn print_report(report: &RunReport, expected: Option<BitVector>) {
    println!("  Run {}", report.run_id);
    for attempt in &report.attempts {
        print_attempt(attempt, report.config.width, expected);
    }
    match &report.outcome {
        Outcome::Success(s) => {
            println!("\n  Outcome: SUCCESS after {} attempt(s)", report.attempts.len());
            println!("  Recovered s = {}", s);
        }
        Outcome::Exhausted(e) => {
            println!("\n  Outcome: FAILURE");
            println!("  Reason: {}", e);
        }
    }
}

fn print_attempt(attempt: &AttemptRecord, width: usize, expected: Option<BitVector>) {
    if attempt.attempt_index > 1 {
        println!("\n  --- Retry #{} ---", attempt.attempt_index - 1);
    }
    println!(
        "  Attempt {} | {} shot(s) | batch {}",
        attempt.attempt_index,
        attempt.total_shots,
        &attempt.batch_fingerprint[..12.min(attempt.batch_fingerprint.len())]
    );
    println!("  Useful vectors: {}", join(attempt.cleaned_vectors.iter()));
    if let Some(rank) = attempt.rank {
        println!("  Rank: {}/{} needed", rank, width.saturating_sub(1));
    }
    if let Some(s) = attempt.recovered {
        println!("  Recovered s = {}", s);
    }
    match &attempt.verdict {
        Verdict::Accepted => match expected {
            Some(e) => println!("  Verification: CORRECT (matches expected s={})", e),
            None => println!("  Verification: skipped (no ground truth)"),
        },
        Verdict::Rejected(reason) => {
            println!("  Result: FAILURE");
            println!("  Reason: {}", reason);
        }
        Verdict::Pending => println!("  Result: in progress"),
    }
}

fn join<'a>(vectors: impl Iterator<Item = &'a BitVector>) -> String {
    let parts: Vec<String> = vectors.map(|v| v.to_string()).collect();
    format!("{{{}}}", parts.join(", "))
}
