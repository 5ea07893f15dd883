//! Background worker thread: pipeline runs happen here.
//!
//! Communication with the UI thread is via `mpsc` channels. Each run uses a
//! private rayon pool so the dashboard never competes with the global one.

use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use scoutlab_runner::{run_pipeline, PipelineConfig, RunError, RunSummary};

/// Commands sent from the UI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    RunPipeline { config: Box<PipelineConfig> },
    Shutdown,
}

/// Responses sent from the worker back to the UI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    PipelineDone { summary: Box<RunSummary> },
    PipelineError { error: String },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("scoutlab-worker".into())
        .spawn(move || worker_loop(rx, tx))
}

fn worker_loop(rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(2)
        .thread_name(|i| format!("scoutlab-pool-{i}"))
        .build()
        .map_err(|e| warn!(error = %e, "private pool unavailable, using the global pool"))
        .ok();

    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::RunPipeline { config }) => {
                info!(season = config.pipeline.season, "pipeline run requested");
                let result = match &pool {
                    Some(pool) => pool.install(|| run_pipeline(&config, &[])),
                    None => run_pipeline(&config, &[]),
                };
                if tx.send(respond(result)).is_err() {
                    break;
                }
            }
        }
    }
}

fn respond(result: Result<RunSummary, RunError>) -> WorkerResponse {
    match result {
        Ok(summary) => WorkerResponse::PipelineDone {
            summary: Box::new(summary),
        },
        Err(e) => {
            warn!(error = %e, "pipeline run failed");
            WorkerResponse::PipelineError {
                error: e.to_string(),
            }
        }
    }
}
