use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the user operations dispatcher workspace",
    long_about = "A unified CLI for formatting, linting, and testing the\n\
                  user operations dispatcher and its Lambda runtime."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI checks (fmt, clippy, tests)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Run the ignored tests that need a live PostgreSQL server
    LiveTest {
        /// Database host exported to the tests as DB_HOST
        #[arg(long, env = "DB_HOST", default_value = "localhost")]
        db_host: String,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting and clippy
    Lint,
    /// Unit and integration tests
    Test,
    /// Lint + test
    Check,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str], envs: &[(&str, &str)]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .envs(envs.iter().copied())
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    run_cargo_with_env(args, &[]);
}

fn run_cargo_with_env(args: &[&str], envs: &[(&str, &str)]) {
    let status = cargo(args, envs);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_lint() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);
}

fn ci_test() {
    step("Test user_ops_core");
    run_cargo(&["test", "-p", "user_ops_core"]);

    step("Test user_ops_lambda");
    run_cargo(&["test", "-p", "user_ops_lambda"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { job } => {
            match job {
                CiJob::Lint => ci_lint(),
                CiJob::Test => ci_test(),
                CiJob::Check => {
                    ci_lint();
                    ci_test();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::LiveTest { db_host } => {
            step("Run live PostgreSQL tests");
            run_cargo_with_env(
                &[
                    "test",
                    "-p",
                    "user_ops_lambda",
                    "--test",
                    "live_postgres_tests",
                    "--",
                    "--ignored",
                ],
                &[("DB_HOST", db_host.as_str())],
            );
        }
    }
}
