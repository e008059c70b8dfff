//! hytrack daemon entrypoint.
//!
//! A single-threaded presence tracker: it polls the Hypixel status endpoint
//! for one player, detects login/logout transitions, and records each
//! completed session to SQLite and to a plain-text session log.

use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod backoff;
mod config;
mod db;
mod monitor;
mod presence;
mod recorder;
mod status;

use config::Config;
use db::Db;
use monitor::Monitor;
use recorder::{LogSink, Recorder};
use status::HypixelStatusAdapter;

fn main() {
    init_logging();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    let db = match Db::new(config.db_path.clone()) {
        Ok(db) => db,
        Err(err) => {
            error!(error = %err, path = %config.db_path.display(), "Failed to initialize session database");
            std::process::exit(1);
        }
    };

    let sink = match LogSink::new(config.log_path.clone()) {
        Ok(sink) => sink,
        Err(err) => {
            error!(error = %err, path = %config.log_path.display(), "Failed to open session log");
            std::process::exit(1);
        }
    };

    let adapter = HypixelStatusAdapter::new(&config);
    let recorder = Recorder::new(config.subject_uuid.clone(), db, sink);

    info!(
        subject = %config.subject_uuid,
        db = %config.db_path.display(),
        log = %config.log_path.display(),
        url = %config.status_url,
        "hytrack started"
    );

    Monitor::new(adapter, recorder).run();
}

fn init_logging() {
    let debug_enabled = env::var("HYTRACK_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
