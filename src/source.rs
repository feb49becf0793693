use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use anyhow::{Result, anyhow};
use crossbeam_channel::Sender;

use crate::types::FrameBatch;

/// Handle to a running frame producer; stops and joins on drop.
#[derive(Debug)]
pub struct FrameFeed {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FrameFeed {
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for FrameFeed {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Plays a pre-built batch script at a fixed tick, standing in for a live
/// sensor. Batches the consumer has not kept up with are dropped rather than
/// queued (the same policy a real sensor feed needs: only the most recent
/// skeleton snapshot matters).
pub fn start_scripted_stream(
    script: Vec<FrameBatch>,
    tick: Duration,
    frame_tx: Sender<FrameBatch>,
) -> Result<FrameFeed> {
    if script.is_empty() {
        return Err(anyhow!("scripted stream needs at least one batch"));
    }

    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();

    let handle = thread::spawn(move || {
        for batch in script {
            if stop_flag.load(Ordering::Relaxed) {
                break;
            }
            // Drop the batch if the consumer is behind; never block.
            if frame_tx.try_send(batch).is_err() {
                log::debug!("consumer behind, dropping scripted batch");
            }
            thread::sleep(tick);
        }
        log::info!("scripted stream exhausted");
    });

    Ok(FrameFeed {
        stop,
        handle: Some(handle),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BodyFrame;
    use crossbeam_channel::bounded;

    #[test]
    fn empty_script_is_rejected() {
        let (tx, _rx) = bounded(1);
        assert!(start_scripted_stream(Vec::new(), Duration::from_millis(1), tx).is_err());
    }

    #[test]
    fn script_is_delivered_in_order() {
        let (tx, rx) = bounded(16);
        let script = (1..=3)
            .map(|frame| FrameBatch::new(frame, vec![BodyFrame::new(1)]))
            .collect();

        let feed = start_scripted_stream(script, Duration::from_millis(1), tx).unwrap();

        let mut indices = Vec::new();
        while let Ok(batch) = rx.recv_timeout(Duration::from_secs(1)) {
            indices.push(batch.frame_index);
            if indices.len() == 3 {
                break;
            }
        }
        feed.stop();
        assert_eq!(indices, [1, 2, 3]);
    }
}
