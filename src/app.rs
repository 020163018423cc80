//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the signal handler, validates
//! the roots, builds the plan, then previews it or applies it (after confirmation).

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing::{debug, error};

use synchronize::cli::Args;
use synchronize::config::{CONFIG_ENV, load_config};
use synchronize::executor::{ExecOptions, apply_plan};
use synchronize::output as out;
use synchronize::plan::build_plan;
use synchronize::prompt::confirm;
use synchronize::report::{write_listing, write_totals};
use synchronize::{Config, Sha256Hasher, SyncError, default_config_path, shutdown, validate_roots};

use crate::logging::init_tracing;

fn print_config_location() {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        out::print_info(&format!(
            "Using {CONFIG_ENV} (explicit):\n  {}",
            std::path::Path::new(&explicit).display()
        ));
        return;
    }
    match default_config_path() {
        Some(p) => {
            out::print_info(&format!("Default synchronize config path:\n  {}", p.display()));
            if p.exists() {
                out::print_info("A config file exists at that location.");
            } else {
                out::print_info("No config file exists there; built-in defaults are used.");
            }
        }
        None => out::print_error("Could not determine a default config path"),
    }
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    if args.print_config {
        print_config_location();
        return Ok(());
    }

    // Config file first, CLI wins.
    let mut cfg = load_config()?.unwrap_or_default();
    args.apply_overrides(&mut cfg)?;

    let guard_opt = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    // Guard needs to be dropped on SIGINT to flush logs
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; stopping after the current file...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        })
        .context("install Ctrl-C handler")?;
    }

    debug!("Starting synchronize: {:?}", args);
    let result = sync(&cfg);
    if let Err(e) = &result {
        match e.downcast_ref::<SyncError>() {
            Some(se) => error!(code = se.code(), "{se}"),
            None => error!(error = ?e, "Synchronization failed"),
        }
    }

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }
    result
}

fn sync(cfg: &Config) -> Result<()> {
    let roots = validate_roots(&cfg.source, &cfg.destination)?;
    let verbosity = cfg.effective_verbosity();
    let scope = cfg.scope();
    let exclusions = cfg.exclude.clone().with_platform_defaults();

    if verbosity > 1 {
        out::print_user(&format!("Source: {}", roots.source.display()));
        out::print_user(&format!("Destination: {}", roots.destination.display()));
        if !exclusions.is_empty() {
            let list: Vec<&str> = exclusions.iter().collect();
            out::print_user(&format!("Excluding: {}", list.join(", ")));
        }
    }

    let hasher = Sha256Hasher::with_chunk_size(cfg.hash_chunk_bytes);
    let plan = build_plan(&roots, &exclusions, &hasher, cfg.parallel)?;
    if !plan.skipped.is_empty() {
        out::print_warn(&format!(
            "{} unreadable entries were skipped",
            plan.skipped.len()
        ));
    }

    let stdout = io::stdout();
    if verbosity > 1 {
        write_totals(&mut stdout.lock(), &plan, scope)?;
    }

    if plan.is_up_to_date(scope) {
        if verbosity > 0 {
            out::print_user("Backup is up-to-date");
        }
        return Ok(());
    }

    if !cfg.apply {
        write_listing(&mut stdout.lock(), &plan, scope)?;
        return Ok(());
    }

    if !cfg.force {
        let approved = confirm(&mut io::stdin().lock(), &mut stdout.lock(), &plan, scope)?;
        if !approved {
            out::print_user("No changes applied");
            return Ok(());
        }
    }

    if verbosity > 1 {
        out::print_user("Applying changes:");
    }
    let opts = ExecOptions {
        scope,
        announce: verbosity > 1,
        durability: cfg.durability(),
    };
    let report = apply_plan(&plan, &roots, &exclusions, &opts)?;
    stdout.lock().flush()?;
    if verbosity > 1 {
        out::print_user(&format!(
            "Done: {} added, {} updated, {} removed",
            report.added, report.updated, report.removed
        ));
    }
    Ok(())
}
