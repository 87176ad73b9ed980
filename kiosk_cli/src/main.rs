//! `kiosk`: run the height/weight kiosk, check its wiring, decode scale payloads.

mod cli;
mod error_fmt;
mod run;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use kiosk_core::error::Result;

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    if let Err(err) = real_main(cli) {
        tracing::error!(error = %err, "kiosk failed");
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn real_main(cli: Cli) -> Result<()> {
    color_eyre::install()?;
    match cli.cmd {
        Commands::Decode { hex } => {
            run::init_tracing(cli.json, &cli.log_level, None)?;
            let kg = run::decode(&hex)?;
            if cli.json {
                println!("{}", serde_json::json!({ "weight_kg": kg }));
            } else {
                println!("{kg:.2} kg");
            }
            Ok(())
        }
        Commands::SelfCheck => {
            let cfg = run::load_config(&cli.config)?;
            run::init_tracing(cli.json, &cli.log_level, Some(&cfg.logging))?;
            let probes = run::self_check(&cfg)?;
            if cli.json {
                let items: Vec<_> = probes
                    .iter()
                    .map(|p| serde_json::json!({ "name": p.name, "ok": p.ok, "detail": p.detail }))
                    .collect();
                println!("{}", serde_json::json!({ "config": "ok", "probes": items }));
            } else {
                println!("config: ok ({})", cli.config.display());
                for p in &probes {
                    let mark = if p.ok { "ok" } else { "WARN" };
                    println!("{}: {mark} ({})", p.name, p.detail);
                }
            }
            Ok(())
        }
        Commands::Run {
            max_cycles,
            ble_feed,
        } => {
            let cfg = run::load_config(&cli.config)?;
            run::init_tracing(cli.json, &cli.log_level, Some(&cfg.logging))?;

            let shutdown = Arc::new(AtomicBool::new(false));
            {
                let flag = shutdown.clone();
                ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))?;
            }

            let summary = run::run_kiosk(&cfg, max_cycles, ble_feed.as_deref(), shutdown)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "cycles": summary.cycles,
                        "ticks": summary.ticks,
                        "interrupted": summary.interrupted,
                    })
                );
            } else {
                println!(
                    "Stopped after {} cycle(s){}",
                    summary.cycles,
                    if summary.interrupted { " (interrupted)" } else { "" }
                );
            }
            Ok(())
        }
    }
}
