//! CLI entrypoint for quantizer
//!
//! Wires the layers together: configuration, provider adapters, the pod
//! registry, and the exchange/broadcast/export use cases.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use quantizer_application::{
    AgentGateway, BroadcastUseCase, ExportDatasetUseCase, ExportOutcome, PodRegistry,
    RunExchangeUseCase,
};
use quantizer_domain::{AgentId, Pod, PromptContract, classify};
use quantizer_infrastructure::{ConfigLoader, build_gateway, write_dataset};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quantizer", about = "Concurrent conversation-pod engine", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Explicit config file, merged on top of the layered defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Spin up pods, broadcast a prompt through escalating rounds, and
    /// optionally export the best turns
    Run {
        /// Seed prompt for the first round
        prompt: String,

        /// Number of pods to create
        #[arg(short, long, default_value_t = 2)]
        pods: u32,

        /// Exchange rounds to drive (each adds four turns per pod)
        #[arg(short, long, default_value_t = 1)]
        rounds: u32,

        /// Agent pair, e.g. "gemini,claude"
        #[arg(short, long)]
        agents: Option<String>,

        /// Crown the highest-scoring answer per pod and write a dataset
        /// artifact into this directory
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// List models served by the local backbone
    Models,

    /// Short connectivity check against the backbone
    Probe,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = ConfigLoader::load(cli.config.as_deref());
    let gateway = Arc::new(build_gateway(&config));

    match cli.command {
        Command::Models => {
            let models = gateway.available_models().await?;
            if models.is_empty() {
                println!("No models installed on the backbone.");
            } else {
                for model in models {
                    println!("{model}");
                }
            }
        }

        Command::Probe => {
            gateway.probe().await?;
            println!(
                "Backbone reachable at {}:{}",
                config.backbone.host, config.backbone.port
            );
        }

        Command::Run {
            prompt,
            pods,
            rounds,
            agents,
            export,
        } => {
            if pods == 0 {
                bail!("At least one pod is required");
            }

            let pair = parse_agent_pair(agents.as_deref())?;
            info!("Starting {} pods with {} and {}", pods, pair[0], pair[1]);

            let registry = Arc::new(PodRegistry::new(config.pods.max_turns));
            let mut pod_ids = Vec::new();
            for _ in 0..pods {
                pod_ids.push(registry.create_pod(pair.clone(), None).await.id);
            }

            let exchange = Arc::new(RunExchangeUseCase::new(gateway, Arc::clone(&registry)));
            let broadcast = BroadcastUseCase::new(exchange);

            let contract = PromptContract::new(
                "default",
                "You are a rigorous reasoning agent. Work the problem step by step \
                 and commit to a concrete answer.",
            );

            for round in 1..=rounds {
                println!("=== Round {round}/{rounds} ===");
                let report = broadcast
                    .execute(pod_ids.clone(), &prompt, &contract)
                    .await;
                println!(
                    "{} completed, {} busy, {} failed",
                    report.completed(),
                    report.rejected_busy(),
                    report.results.len() - report.completed() - report.rejected_busy()
                );

                if let Some(alert) = registry.take_architect_alert() {
                    println!("!! Architect requested by {}: {}", alert.pod_name, alert.text);
                }
            }

            for pod in registry.list().await {
                print_pod(&pod);
            }

            if let Some(dir) = export {
                crown_best_answers(&registry).await;

                let export_use_case = ExportDatasetUseCase::new(Arc::clone(&registry));
                match export_use_case.execute(contract.version).await {
                    ExportOutcome::NothingCrowned => {
                        println!("Nothing crowned; no artifact written.");
                    }
                    ExportOutcome::Records(records) => {
                        let path = write_dataset(&dir, contract.version, &records)?;
                        println!("Wrote {} records to {}", records.len(), path.display());
                    }
                }
            }
        }
    }

    Ok(())
}

fn parse_agent_pair(raw: Option<&str>) -> Result<[AgentId; 2]> {
    let Some(raw) = raw else {
        return Ok(AgentId::default_pair());
    };

    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        bail!("Expected exactly two agents, e.g. \"gemini,claude\"");
    }

    let a = parts[0]
        .parse()
        .map_err(|_| anyhow::anyhow!("Unknown agent: {}", parts[0]))?;
    let b = parts[1]
        .parse()
        .map_err(|_| anyhow::anyhow!("Unknown agent: {}", parts[1]))?;
    Ok([a, b])
}

fn print_pod(pod: &Pod) {
    println!();
    println!(
        "--- {} [{}] alert={} signal={} turn {}/{} ---",
        pod.name,
        pod.status,
        classify(pod),
        pod.signal_strength,
        pod.current_turn,
        pod.max_turns
    );

    for turn in &pod.transcript {
        let score = turn
            .reasoning_score
            .map(|s| format!(" (score {s})"))
            .unwrap_or_default();
        let crown = if turn.crowned { " *crowned*" } else { "" };
        println!("[{}]{}{} {}", turn.role, score, crown, turn.text);
    }
}

/// Crown the highest-scoring agent answer in each pod, if any
async fn crown_best_answers(registry: &PodRegistry) {
    for pod in registry.list().await {
        let best = pod
            .transcript
            .iter()
            .filter(|t| t.role.is_scorable())
            .max_by_key(|t| t.reasoning_score.unwrap_or(0));

        if let Some(turn) = best {
            let turn_id = turn.id.clone();
            if registry.crown_turn(&pod.id, &turn_id).await.is_ok() {
                info!("Crowned {} in {}", turn_id, pod.name);
            }
        }
    }
}
