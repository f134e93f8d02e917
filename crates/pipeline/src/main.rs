//! Cabin Pipeline - Main Entry Point
//!
//! Runs the classification and delivery half of the pipeline with stdin as
//! the transcript source: each input line is treated as a finalized voice
//! transcript, classified, arbitrated, and printed as a JSON record. Camera
//! and microphone loops attach through the library's worker functions when
//! real devices are wired in.

use anyhow::Result;
use cabin_pipeline::{init_logging, workers, PipelineConfig};
use intent_bridge::{ChatCompletionsClient, DriverEvent, EventNormalizer, EventSource};
use output_channel::OutputQueue;
use safety_arbiter::SafetyArbiter;
use std::io::BufRead;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    info!("=== Cabin Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let config = PipelineConfig::load()?;
    info!(
        occupant = config.occupant.name,
        role = ?config.occupant.role,
        model = config.classifier.model,
        "configuration loaded"
    );

    let queue = Arc::new(OutputQueue::new(config.channels.output_capacity));
    let (tx, rx) = mpsc::channel(config.channels.event_capacity);

    let worker = tokio::spawn(workers::classification_worker(
        rx,
        ChatCompletionsClient::new(config.classifier_config()),
        EventNormalizer::new(),
        SafetyArbiter::new(config.occupant.role),
        config.occupant.name.clone(),
        Arc::clone(&queue),
        config.classifier_timeout(),
    ));

    let printer = {
        let queue = Arc::clone(&queue);
        std::thread::spawn(move || {
            while let Some(record) = queue.pop() {
                match serde_json::to_string(&record) {
                    Ok(line) => println!("{line}"),
                    Err(e) => tracing::warn!("record serialization failed: {e}"),
                }
            }
        })
    };

    // Blocking stdin reader feeding the event channel.
    let reader = tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let transcript = line.trim();
            if transcript.is_empty() {
                continue;
            }
            let event = DriverEvent::new(EventSource::Voice, transcript);
            if tx.blocking_send(event).is_err() {
                break;
            }
        }
    });

    reader.await?;
    worker.await?;
    queue.close();
    printer.join().expect("printer thread panicked");

    info!("pipeline shut down");
    Ok(())
}
