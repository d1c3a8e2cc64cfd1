//! snaprun CLI
//!
//! Install or remove snap packages through pkexec from the command line

use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use tracing::info;

use snaprun_core::{Confinement, OperationKind, PackageDescriptor, PackageRunner, RunReport};
use snaprun_exec::local::TokioSpawner;

#[derive(Parser)]
#[command(name = "snaprun")]
#[command(about = "Privileged snap package operation runner", long_about = None)]
struct Cli {
    /// Print the terminal report as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install a package
    Install {
        /// Package name as understood by snap
        name: String,

        /// Release channel to track
        #[arg(long, default_value = "stable")]
        channel: String,

        /// Install with devmode confinement
        #[arg(long, conflicts_with = "classic")]
        devmode: bool,

        /// Install with classic confinement
        #[arg(long)]
        classic: bool,
    },
    /// Remove an installed package
    Remove {
        /// Package name as understood by snap
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let spawner = Arc::new(TokioSpawner::new());

    let report = match cli.command {
        Commands::Install {
            name,
            channel,
            devmode,
            classic,
        } => {
            let confinement = if devmode {
                Confinement::Devmode
            } else if classic {
                Confinement::Classic
            } else {
                Confinement::None
            };
            let descriptor =
                PackageDescriptor::new(name, channel)?.with_confinement(confinement);
            PackageRunner::new(descriptor, OperationKind::Install, spawner)
                .run()
                .await
        }
        Commands::Remove { name } => {
            let descriptor = PackageDescriptor::new(name, "stable")?;
            PackageRunner::new(descriptor, OperationKind::Uninstall, spawner)
                .run()
                .await
        }
    };

    render(&report, cli.json)?;

    if !report.outcome.success {
        std::process::exit(report.outcome.exit_code.unwrap_or(1));
    }
    Ok(())
}

fn render(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    if report.outcome.success {
        info!(
            package = %report.descriptor.package_name,
            duration = ?report.duration,
            "{} succeeded", report.kind
        );
    } else {
        eprintln!(
            "{} of {} failed (exit code {})",
            report.kind,
            report.descriptor.package_name,
            report
                .outcome
                .exit_code
                .map_or_else(|| "none".to_string(), |c| c.to_string()),
        );
        for line in &report.log.stderr {
            eprintln!("  {line}");
        }
    }
    Ok(())
}
