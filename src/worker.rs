//! Off-thread generation where only the newest request matters.
//!
//! Interactive hosts regenerate whenever the face or the options change. Each
//! request snapshots its inputs and runs on its own thread; results of requests
//! that were superseded before they finished are dropped instead of delivered.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::error::{Error, Result};
use crate::{Face, Format, SourceCodeGenerator};

/// Result of one generation request.
#[derive(Debug)]
pub struct Generated {
    /// Ticket returned by [`GenerationQueue::request`].
    pub ticket: u64,
    /// Generated source code, or the reason generation failed.
    pub result: Result<String>,
}

/// Runs generation requests in the background, delivering only the latest.
#[derive(Debug)]
pub struct GenerationQueue {
    latest: Arc<AtomicU64>,
    tx: Sender<Generated>,
    rx: Receiver<Generated>,
}

impl Default for GenerationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationQueue {
    /// Creates an idle queue.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            latest: Arc::new(AtomicU64::new(0)),
            tx,
            rx,
        }
    }

    /// Ticket of the most recent request, `0` before the first one.
    #[must_use]
    pub fn latest_ticket(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Starts generating `face` on a background thread, superseding every
    /// earlier request. Returns the request's ticket.
    pub fn request(&self, face: Arc<Face>, generator: SourceCodeGenerator, format: Format, font_name: &str) -> u64 {
        let ticket = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        let latest = Arc::clone(&self.latest);
        let tx = self.tx.clone();
        let font_name = font_name.to_owned();

        thread::spawn(move || deliver(ticket, &latest, &tx, || generator.generate(&face, format, &font_name)));

        ticket
    }

    /// Blocks until the result of the latest request arrives.
    ///
    /// Returns `None` if no request was ever made. A request that panicked
    /// arrives as [`Error::GenerationPanicked`].
    pub fn recv_latest(&self) -> Option<Result<String>> {
        if self.latest_ticket() == 0 {
            return None;
        }
        loop {
            let generated = self.rx.recv().ok()?;
            if generated.ticket == self.latest_ticket() {
                return Some(generated.result);
            }
        }
    }

    /// Returns the latest request's result if it has already arrived,
    /// discarding stale results queued before it.
    pub fn try_recv_latest(&self) -> Option<Result<String>> {
        while let Ok(generated) = self.rx.try_recv() {
            if generated.ticket == self.latest_ticket() {
                return Some(generated.result);
            }
        }
        None
    }
}

/// Runs `job` and sends its result unless `ticket` was superseded meanwhile.
fn deliver(ticket: u64, latest: &AtomicU64, tx: &Sender<Generated>, job: impl FnOnce() -> Result<String>) {
    let result = panic::catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_default();
        log::error!("generation request {ticket} panicked: {message}");
        Err(Error::GenerationPanicked(message))
    });

    if latest.load(Ordering::Acquire) != ticket {
        log::debug!("dropping result of superseded generation request {ticket}");
        return;
    }
    // the queue may be gone already, nobody is waiting then
    let _ = tx.send(Generated { ticket, result });
}
