// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask
//!
//! `cargo xtask <command>` runs the checks CI runs for the `SkillBridge`
//! workspace, plus a `serve` shortcut that starts the HTTP server against
//! `demos/seed.json`.
//!
//! - `cargo xtask ci`: lint, dependency audit, build, test
//! - `cargo xtask test`: every workspace test, doc tests last
//! - `cargo xtask test-concurrency`: the file-database race tests alone
//! - `cargo xtask serve`: run `skillbridge-server` with demo data

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

/// Port the demo server listens on unless `--port` is given.
const DEFAULT_SERVE_PORT: u16 = 8080;

/// Seed file loaded by `cargo xtask serve`.
const DEMO_SEED: &str = "demos/seed.json";

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    if let Err(err) = args.command.run() {
        tracing::error!("{err}");
        std::process::exit(1);
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run every CI step in order, stopping at the first failure
    CI,

    /// Build all targets
    #[command(visible_alias = "b")]
    Build,

    /// Type-check all targets
    #[command(visible_alias = "c")]
    Check,

    /// Write an lcov report to target/lcov.info
    #[command(visible_alias = "cov")]
    Coverage,

    /// Audit dependencies with cargo-deny
    #[command(visible_alias = "cd")]
    Deny,

    /// Look for unused dependencies with cargo-machete
    #[command(visible_alias = "m")]
    Machete,

    /// Run clippy, rustdoc, rustfmt and typos checks
    #[command(visible_alias = "l")]
    Lint,

    /// Apply clippy suggestions and rustfmt
    #[command(visible_alias = "f")]
    Fix,

    /// Run lib, integration and doc tests
    #[command(visible_alias = "t")]
    Test,

    /// Run only the file-database concurrency tests
    #[command(visible_alias = "tc")]
    TestConcurrency,

    /// Start the HTTP server with the demo seed loaded
    #[command(visible_alias = "s")]
    Serve {
        /// `SQLite` file to use instead of an in-memory database
        #[arg(long)]
        database: Option<String>,

        /// Port to listen on
        #[arg(long, default_value_t = DEFAULT_SERVE_PORT)]
        port: u16,
    },
}

/// A named CI step.
type Step = (&'static str, fn() -> Result<()>);

const CI_STEPS: &[Step] = &[
    ("lint", lint),
    ("deny", deny),
    ("machete", machete),
    ("build", build),
    ("test", test),
];

const LINT_STEPS: &[Step] = &[
    ("clippy", lint_clippy),
    ("rustdoc", lint_docs),
    ("rustfmt", lint_format),
    ("typos", lint_typos),
];

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => run_steps("ci", CI_STEPS),
            Self::Build => build(),
            Self::Check => run_cargo(&["check", "--all-targets", "--all-features"]),
            Self::Coverage => run_cargo(&[
                "llvm-cov",
                "--lcov",
                "--output-path",
                "target/lcov.info",
                "--all-features",
            ]),
            Self::Deny => deny(),
            Self::Machete => machete(),
            Self::Lint => lint(),
            Self::Fix => fix(),
            Self::Test => test(),
            Self::TestConcurrency => test_concurrency(),
            Self::Serve { database, port } => serve(database.as_deref(), port),
        }
    }
}

fn run_steps(group: &str, steps: &[Step]) -> Result<()> {
    for (name, step) in steps {
        tracing::info!("{group}: {name}");
        step().wrap_err_with(|| format!("{group} step '{name}' failed"))?;
    }
    Ok(())
}

fn build() -> Result<()> {
    run_cargo(&["build", "--all-targets", "--all-features"])
}

fn deny() -> Result<()> {
    run_cargo(&["deny", "check"])
}

fn machete() -> Result<()> {
    cmd!("cargo-machete").run_with_trace()?;
    Ok(())
}

fn lint() -> Result<()> {
    run_steps("lint", LINT_STEPS)
}

fn lint_clippy() -> Result<()> {
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Build docs for each workspace package with docs.rs flags
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        nightly_cargo(&[
            "doc",
            "--no-deps",
            "--all-features",
            "--package",
            &package.name,
        ])
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }
    Ok(())
}

fn lint_format() -> Result<()> {
    nightly_cargo(&["fmt", "--all", "--check"]).run_with_trace()?;
    Ok(())
}

fn lint_typos() -> Result<()> {
    cmd!("typos").run_with_trace()?;
    Ok(())
}

fn fix() -> Result<()> {
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
    ])?;
    nightly_cargo(&["fmt", "--all"]).run_with_trace()?;
    Ok(())
}

/// Run every test; doc tests go last because they are slow
fn test() -> Result<()> {
    run_cargo(&["test", "--all-targets", "--all-features"])?;
    run_cargo(&["test", "--doc", "--all-features"])
}

/// Run the persistence concurrency tests on their own
///
/// These open a file database in a temporary directory and race two
/// connections for the same employee; running them alone makes a flaky
/// lock timeout easy to spot.
fn test_concurrency() -> Result<()> {
    run_cargo(&[
        "test",
        "--package",
        "skillbridge-persistence",
        "concurrency_tests",
    ])
}

fn serve(database: Option<&str>, port: u16) -> Result<()> {
    let port: String = port.to_string();
    let mut args: Vec<&str> = vec![
        "run",
        "--package",
        "skillbridge-server",
        "--",
        "--seed",
        DEMO_SEED,
        "--port",
        &port,
    ];
    if let Some(database) = database {
        args.extend(["--database", database]);
    }
    run_cargo(&args)
}

fn run_cargo(args: &[&str]) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// A cargo invocation pinned to the nightly toolchain
fn nightly_cargo(args: &[&str]) -> duct::Expression {
    cmd("cargo", args)
        // set by the outer cargo when running as a subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
}

/// Logs a `duct::Expression` before running it.
trait ExpressionExt {
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // repeat the command; its output may have scrolled it away
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
