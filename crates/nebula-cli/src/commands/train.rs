use anyhow::Result;
use nebula_etl::{build_training_pipeline, execute_training, Config, TrainingRun};
use std::path::PathBuf;
use tokio::sync::broadcast;
use treadle::WorkflowEvent;

pub async fn run_train(config: &Config, data_path: PathBuf) -> Result<()> {
    log::info!("Training from {}", data_path.display());

    let workflow =
        build_training_pipeline(data_path.clone(), &config.model_dir, config.train_options())?;
    let run = TrainingRun::new(data_path);

    // Subscribe to events for progress display
    let mut events = workflow.subscribe();
    let training = execute_training(&workflow, &run, &config.model_dir);
    tokio::pin!(training);

    let manifest = loop {
        tokio::select! {
            biased;
            Ok(event) = events.recv() => print_progress(&event),
            result = &mut training => break result?,
        }
    };
    drain_pending(&mut events, print_progress);

    println!("\n✓ Training complete ({run})");
    println!("  Songs:      {}", manifest.rows);
    println!("  Vocabulary: {}", manifest.vocabulary_size);
    println!("  Model:      {}", config.model_dir.display());
    Ok(())
}

fn print_progress(event: &WorkflowEvent) {
    match event {
        WorkflowEvent::StageStarted { stage, .. } => {
            println!("  ⏳ [{stage}] Starting...");
        }
        WorkflowEvent::StageCompleted { stage, .. } => {
            println!("  ✓ [{stage}] Complete");
        }
        WorkflowEvent::StageFailed { stage, error, .. } => {
            eprintln!("  ✗ [{stage}] FAILED: {error}");
        }
        _ => {}
    }
}

/// Hand every event still queued on `events` to `handle`, without waiting.
/// Returns how many were handled.
fn drain_pending<T: Clone>(events: &mut broadcast::Receiver<T>, mut handle: impl FnMut(&T)) -> usize {
    let mut handled = 0;
    loop {
        match events.try_recv() {
            Ok(event) => {
                handle(&event);
                handled += 1;
            }
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                log::warn!("Dropped {skipped} progress events");
            }
            Err(_) => return handled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_delivers_queued_events_in_order() {
        let (tx, mut rx) = broadcast::channel(8);
        for stage in ["clean", "fit", "publish"] {
            tx.send(stage.to_string()).unwrap();
        }
        drop(tx);

        let mut seen = Vec::new();
        let handled = drain_pending(&mut rx, |stage: &String| seen.push(stage.clone()));
        assert_eq!(handled, 3);
        assert_eq!(seen, ["clean", "fit", "publish"]);
    }

    #[test]
    fn test_drain_returns_when_queue_is_empty() {
        let (tx, mut rx) = broadcast::channel::<String>(8);
        assert_eq!(drain_pending(&mut rx, |_| {}), 0);
        drop(tx);
    }

    #[test]
    fn test_drain_skips_past_lagged_events() {
        let (tx, mut rx) = broadcast::channel(2);
        for stage in ["clean", "fit", "publish"] {
            tx.send(stage.to_string()).unwrap();
        }

        let mut seen = Vec::new();
        drain_pending(&mut rx, |stage: &String| seen.push(stage.clone()));
        assert_eq!(seen, ["fit", "publish"]);
    }
}
