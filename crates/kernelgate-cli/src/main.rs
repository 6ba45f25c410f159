//! kernelgate command-line runner.
//!
//! Runs the conformance catalog against the in-process reference runtime
//! (optionally with an injected fault, to demonstrate how a defective
//! runtime is reported) and prints a human or JSON report. Exit code is
//! non-zero when any check fails.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use kernelgate_core::{BundleState, CapabilitySet, ExistenceFacts, KernelId};
use kernelgate_harness::{HarnessConfig, SkipMatrix, run_bundle_checks, run_catalog};
use kernelgate_harness::scenario::catalog;
use kernelgate_runtime::{Backend, Device, FaultConfig, ReferenceRuntime};

/// Conformance suite for capability-gated kernel submission runtimes.
#[derive(Parser)]
#[command(name = "kernelgate")]
#[command(about = "Capability-gated kernel submission conformance suite")]
#[command(version)]
struct Cli {
    /// Configuration file path (TOML).
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, value_name = "LEVEL", global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the conformance catalog against the reference runtime.
    Run {
        /// Device capabilities, comma-separated (`fp16,fp64`, `all`, `none`).
        #[arg(long, value_name = "CAPS", default_value = "fp16")]
        device_caps: String,

        /// Inject a deliberate defect into the reference runtime.
        #[arg(long, value_enum, default_value_t = Fault::None)]
        fault: Fault,

        /// Emit the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// List the scenario catalog.
    List,
}

/// Deliberate reference-runtime defects selectable from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Fault {
    /// Fully conformant behavior.
    None,
    /// Accept submissions the gate must reject.
    Gate,
    /// Reject with the wrong error classification.
    Classify,
    /// Answer batched existence queries inconsistently.
    Batched,
}

impl Fault {
    fn config(self) -> FaultConfig {
        match self {
            Fault::None => FaultConfig::none(),
            Fault::Gate => {
                FaultConfig { ignore_capability_gate: true, ..FaultConfig::none() }
            }
            Fault::Classify => {
                FaultConfig { misclassify_errors: true, ..FaultConfig::none() }
            }
            Fault::Batched => {
                FaultConfig { invert_batched_queries: true, ..FaultConfig::none() }
            }
        }
    }
}

fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn load_config(path: Option<&PathBuf>) -> Result<HarnessConfig> {
    match path {
        Some(path) => HarnessConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => HarnessConfig::from_env().context("reading config from environment"),
    }
}

/// The demo kernel set for bundle checks: obtainable everywhere except one
/// kernel whose executable form is missing.
fn demo_facts() -> (Vec<KernelId>, ExistenceFacts) {
    let kernels = vec![
        KernelId::new("kernel_alpha"),
        KernelId::new("kernel_beta"),
        KernelId::new("kernel_gamma"),
    ];
    let mut facts = ExistenceFacts::new();
    facts.set_all_states(kernels[0].clone(), true);
    facts.set_all_states(kernels[1].clone(), true);
    facts.set(kernels[2].clone(), BundleState::Source, true);
    facts.set(kernels[2].clone(), BundleState::Object, true);
    facts.set(kernels[2].clone(), BundleState::Executable, false);
    (kernels, facts)
}

fn run(device_caps: &str, fault: Fault, json: bool, config: &HarnessConfig) -> Result<bool> {
    let caps = CapabilitySet::parse_list(device_caps).context("parsing --device-caps")?;
    let device = Device::with_env_fake("reference-device", Backend::Reference, caps);
    info!(%device, ?fault, "starting conformance run");

    let mut runtime = ReferenceRuntime::with_faults(fault.config());
    let (kernels, facts) = demo_facts();
    runtime.register_facts(&device, facts);

    let mut report = run_catalog(&mut runtime, &device, config, &SkipMatrix::builtin());
    let bundle_report = run_bundle_checks(&runtime, &device, &kernels);
    report.records.extend(bundle_report.records);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(report.is_conforming())
}

fn list() {
    for scenario in catalog() {
        println!("{:<50} [{}]", scenario.name, scenario.tag);
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Run { device_caps, fault, json } => {
            let conforming = run(&device_caps, fault, json, &config)?;
            Ok(if conforming { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::List => {
            list();
            Ok(ExitCode::SUCCESS)
        }
    }
}
