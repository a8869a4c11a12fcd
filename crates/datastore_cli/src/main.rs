//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `datastore_core` linkage.
//! - Run one save/load/delete cycle against a scratch directory.

use datastore_core::{
    default_log_level, init_logging, DataStore, LocalFileBackend, StoreOptions, StoreRecord,
};
use serde::{Deserialize, Serialize};
use std::process::ExitCode;

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct ProbeRecord {
    runs: u32,
    label: String,
}

impl StoreRecord for ProbeRecord {
    const STORE_KEY: &'static str = "datastore_cli.ProbeRecord";
}

fn main() -> ExitCode {
    println!("datastore_core ping={}", datastore_core::ping());
    println!("datastore_core version={}", datastore_core::core_version());

    let log_dir = std::env::temp_dir().join("datastore-cli-logs");
    let log_dir = log_dir.to_string_lossy();
    match init_logging(default_log_level().as_str(), &log_dir) {
        Ok(()) => println!("datastore_core log_dir={log_dir}"),
        Err(err) => eprintln!("datastore_core logging=disabled error={err}"),
    }

    match run_probe() {
        Ok(()) => {
            println!("datastore_core probe=ok");
            ExitCode::SUCCESS
        }
        Err(step) => {
            eprintln!("datastore_core probe=failed step={step}");
            ExitCode::FAILURE
        }
    }
}

fn run_probe() -> Result<(), String> {
    let root = std::env::temp_dir().join(format!("datastore-probe-{}", uuid::Uuid::new_v4()));
    let result = probe_cycle(&root);
    if let Err(err) = std::fs::remove_dir_all(&root) {
        log::debug!(
            "event=probe_cleanup module=cli status=skipped path={} error={}",
            root.display(),
            err
        );
    }
    result
}

fn probe_cycle(root: &std::path::Path) -> Result<(), String> {
    let backend =
        LocalFileBackend::<ProbeRecord>::for_record(root).map_err(|err| err.to_string())?;
    let mut store = DataStore::new(backend);
    store.data_mut().runs += 1;
    store.data_mut().label = "probe".to_string();
    if !store.save() {
        return Err("save".to_string());
    }

    let backend =
        LocalFileBackend::<ProbeRecord>::for_record(root).map_err(|err| err.to_string())?;
    let mut reopened = DataStore::with_options(backend, StoreOptions::default());
    if reopened.data() != store.data() {
        return Err("load".to_string());
    }

    if !reopened.delete() || !reopened.delete() {
        return Err("delete".to_string());
    }
    Ok(())
}
