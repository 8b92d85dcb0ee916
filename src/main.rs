//! Tessera CLI: boot distributors from a manifest and dispatch paths.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use tessera::config::{load_manifest, CompiledManifest, ManifestWatcher};
use tessera::distributor::DistributorRegistry;
use tessera::observability::init_logging;

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Multi-tenant module routing engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Boot every distributor in a manifest and print the boot report
    Check {
        /// Path to the manifest TOML file
        manifest: PathBuf,
    },
    /// Resolve a single path within a distributor
    Resolve {
        manifest: PathBuf,
        /// Distributor id
        distributor: String,
        /// Request path, e.g. /blog/post/42
        path: String,
        /// Print the match as JSON
        #[arg(long)]
        json: bool,
    },
    /// Boot, then hot-reload distributors when the manifest changes
    Watch { manifest: PathBuf },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging("tessera=info");

    let cli = Cli::parse();
    match cli.command {
        Commands::Check { manifest } => check(&manifest),
        Commands::Resolve {
            manifest,
            distributor,
            path,
            json,
        } => resolve(&manifest, &distributor, &path, json),
        Commands::Watch { manifest } => watch(&manifest).await,
    }
}

/// Boot every distributor, reporting failures without stopping at the first.
fn boot_all(registry: &DistributorRegistry, compiled: &CompiledManifest) -> bool {
    let mut ok = true;
    for (id, enabled) in &compiled.distributors {
        match registry.boot(id, enabled.clone(), compiled.modules.clone()) {
            Ok(report) => {
                println!("distributor '{id}':");
                for (code, version) in &report.loaded {
                    println!("  loaded {code}@{version}");
                }
                for warning in &report.warnings {
                    println!("  warning: {} ({})", warning.module, warning.issue);
                }
            }
            Err(e) => {
                ok = false;
                eprintln!("distributor '{id}' failed to boot: {e}");
            }
        }
    }
    ok
}

fn check(manifest: &PathBuf) -> ExitCode {
    let compiled = match load_manifest(manifest) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let registry = DistributorRegistry::new();
    if boot_all(&registry, &compiled) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn resolve(manifest: &PathBuf, distributor: &str, path: &str, json: bool) -> ExitCode {
    let compiled = match load_manifest(manifest) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let registry = DistributorRegistry::new();
    if !boot_all(&registry, &compiled) {
        return ExitCode::FAILURE;
    }

    match registry.dispatch(distributor, path) {
        Ok(m) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "module": m.handler.module,
                        "handler": m.handler.symbol,
                        "params": m.params,
                    })
                );
            } else {
                println!("handler: {}", m.handler);
                if !m.params.is_empty() {
                    println!("params:  {:?}", m.params);
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn watch(manifest: &PathBuf) -> ExitCode {
    let compiled = match load_manifest(manifest) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let registry = DistributorRegistry::new();
    boot_all(&registry, &compiled);

    let (_guard, mut updates) = match ManifestWatcher::new(manifest).spawn() {
        Ok(started) => started,
        Err(e) => {
            eprintln!("failed to start watcher: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(manifest = %manifest.display(), "Watching for manifest changes");
    loop {
        tokio::select! {
            Some(update) = updates.recv() => {
                apply_update(&registry, &update);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown requested");
                break;
            }
        }
    }
    ExitCode::SUCCESS
}

/// Rebuild only the distributors the reload touched; retire removed ones.
fn apply_update(registry: &DistributorRegistry, update: &tessera::config::ManifestUpdate) {
    tracing::info!(changed = update.changed.len(), "Applying reloaded manifest");
    for id in &update.changed {
        let present = update
            .manifest
            .distributors
            .iter()
            .find(|(dist_id, _)| dist_id == id);
        match present {
            Some((_, enabled)) => {
                match registry.boot(id, enabled.clone(), update.manifest.modules.clone()) {
                    Ok(report) => {
                        for warning in &report.warnings {
                            println!("  warning: {} ({})", warning.module, warning.issue);
                        }
                    }
                    Err(e) => eprintln!("distributor '{id}' failed to rebuild: {e}"),
                }
            }
            None => {
                registry.retire(id);
            }
        }
    }
}
