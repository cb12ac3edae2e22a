//! Background render thread.
//!
//! Requests are tagged with a generation. The worker only renders the newest
//! request waiting in its queue and never publishes a result that a newer
//! request has already superseded.

use crate::{
    loader::Bitmap,
    renderer::{self, RenderOptions, RenderParameters},
};
use crossbeam::channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use log::{debug, warn};
use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub generation: u64,
    pub display: Arc<Bitmap>,
    pub params: RenderParameters,
    pub options: RenderOptions,
}

#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub generation: u64,
    pub params: RenderParameters,
    pub output: Bitmap,
}

impl RenderRequest {
    /// Renders on the calling thread.
    pub fn run(&self) -> RenderOutcome {
        RenderOutcome {
            generation: self.generation,
            params: self.params,
            output: renderer::render_with(&self.display, self.params, self.options),
        }
    }
}

pub struct RenderWorker {
    sender: Option<Sender<RenderRequest>>,
    outcomes: Receiver<RenderOutcome>,
    latest: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl RenderWorker {
    pub fn spawn() -> io::Result<Self> {
        let (sender, requests) = unbounded::<RenderRequest>();
        let (outcome_sender, outcomes) = unbounded();
        let latest = Arc::new(AtomicU64::new(0));

        let latest_worker = latest.clone();
        let handle = thread::Builder::new()
            .name("render-worker".to_string())
            .spawn(move || render_loop(requests, outcome_sender, latest_worker))?;

        Ok(Self {
            sender: Some(sender),
            outcomes,
            latest,
            handle: Some(handle),
        })
    }

    /// Queues `request`, superseding everything submitted before it.
    pub fn submit(&self, request: RenderRequest) {
        self.latest.fetch_max(request.generation, Ordering::AcqRel);

        let Some(sender) = &self.sender else {
            return;
        };

        if let Err(e) = sender.send(request) {
            warn!("render worker is gone, request {} dropped", e.0.generation);
        }
    }

    pub fn outcomes(&self) -> &Receiver<RenderOutcome> {
        &self.outcomes
    }

    /// Blocks until the outcome for `generation` (or a newer one) arrives.
    /// Returns `None` if the worker stopped or `timeout` elapsed.
    pub fn wait(&self, generation: u64, timeout: Duration) -> Option<RenderOutcome> {
        let deadline = std::time::Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            match self.outcomes.recv_timeout(remaining) {
                Ok(outcome) if outcome.generation >= generation => return Some(outcome),
                Ok(outcome) => debug!("skip outcome {}", outcome.generation),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None;
                }
            }
        }
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        // closing the channel ends the loop
        self.sender.take();

        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("render worker panicked");
        }
    }
}

fn render_loop(
    requests: Receiver<RenderRequest>,
    outcomes: Sender<RenderOutcome>,
    latest: Arc<AtomicU64>,
) {
    while let Ok(mut request) = requests.recv() {
        while let Ok(newer) = requests.try_recv() {
            debug!("request {} superseded by {}", request.generation, newer.generation);
            request = newer;
        }

        if request.generation < latest.load(Ordering::Acquire) {
            continue;
        }

        let outcome = request.run();

        if outcome.generation < latest.load(Ordering::Acquire) {
            debug!("discard stale render {}", outcome.generation);
            continue;
        }

        if outcomes.send(outcome).is_err() {
            break;
        }
    }

    debug!("render worker exit");
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn request(generation: u64, block_size: u32) -> RenderRequest {
        let display = Bitmap::from_fn(24, 24, |x, y| Rgba([x as u8 * 10, y as u8 * 10, 0, 255]));

        RenderRequest {
            generation,
            display: Arc::new(display),
            params: RenderParameters::default().with_block_size(block_size),
            options: RenderOptions::default(),
        }
    }

    #[test]
    fn test_worker_renders_request() {
        let worker = RenderWorker::spawn().unwrap();
        let req = request(1, 4);
        let expected = req.run().output;

        worker.submit(req);
        let outcome = worker.wait(1, Duration::from_secs(10)).unwrap();

        assert_eq!(outcome.generation, 1);
        assert_eq!(outcome.output, expected);
    }

    #[test]
    fn test_latest_request_wins() {
        let worker = RenderWorker::spawn().unwrap();
        let last = request(5, 8);
        let expected = last.run().output;

        for generation in 1..5 {
            worker.submit(request(generation, generation as u32));
        }
        worker.submit(last);

        let outcome = worker.wait(5, Duration::from_secs(10)).unwrap();
        assert_eq!(outcome.generation, 5);
        assert_eq!(outcome.output, expected);

        // nothing older than the newest request may show up afterwards
        while let Ok(extra) = worker.outcomes().try_recv() {
            assert!(extra.generation >= 5);
        }
    }

    #[test]
    fn test_drop_joins_thread() {
        let worker = RenderWorker::spawn().unwrap();
        worker.submit(request(1, 2));
        drop(worker);
    }
}
