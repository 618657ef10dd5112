//! Background insertion queue.
//!
//! One worker thread owns the providers and handles submissions strictly in the
//! order they were made. The UI thread polls outcomes without blocking and
//! commits them in arrival order, so the store's append order always matches
//! the submission order even when several inputs are queued.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};

use crate::error::{InsertError, ProviderError};
use crate::provider::{PreparedInsert, Providers};

/// Submission sequence number, increasing by one per accepted submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub u64);

struct InsertRequest {
    ticket: Ticket,
    text: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InsertOutcome {
    pub ticket: Ticket,
    pub result: Result<PreparedInsert, ProviderError>,
}

pub struct InsertQueue {
    requests: Option<Sender<InsertRequest>>,
    outcomes: Receiver<InsertOutcome>,
    worker: Option<JoinHandle<()>>,
    next_ticket: u64,
    in_flight: usize,
}

impl InsertQueue {
    pub fn spawn(providers: Providers) -> std::io::Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<InsertRequest>();
        let (outcome_tx, outcome_rx) = mpsc::channel();

        let worker = thread::Builder::new()
            .name("insert-worker".to_owned())
            .spawn(move || {
                info!("insert worker started: embedder={}", providers.embedder_name());
                for request in request_rx {
                    let result = providers.prepare(&request.text);
                    if let Err(error) = &result {
                        warn!("insert {:?} failed in providers: {error}", request.ticket);
                    }
                    let outcome = InsertOutcome {
                        ticket: request.ticket,
                        result,
                    };
                    if outcome_tx.send(outcome).is_err() {
                        break;
                    }
                }
                info!("insert worker stopped");
            })?;

        Ok(Self {
            requests: Some(request_tx),
            outcomes: outcome_rx,
            worker: Some(worker),
            next_ticket: 0,
            in_flight: 0,
        })
    }

    /// Queues `text` behind every earlier submission.
    pub fn submit(&mut self, text: &str) -> Result<Ticket, InsertError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(InsertError::EmptyInput);
        }

        let requests = self.requests.as_ref().ok_or(InsertError::WorkerDisconnected)?;
        let ticket = Ticket(self.next_ticket);
        requests
            .send(InsertRequest {
                ticket,
                text: text.to_owned(),
            })
            .map_err(|_| InsertError::WorkerDisconnected)?;

        self.next_ticket += 1;
        self.in_flight += 1;
        debug!("queued insert {ticket:?}, {} in flight", self.in_flight);
        Ok(ticket)
    }

    /// Next finished outcome, if one is ready.
    pub fn poll(&mut self) -> Result<Option<InsertOutcome>, InsertError> {
        match self.outcomes.try_recv() {
            Ok(outcome) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Ok(Some(outcome))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(InsertError::WorkerDisconnected),
        }
    }

    /// Blocks until the next outcome arrives.
    pub fn wait(&mut self) -> Result<InsertOutcome, InsertError> {
        let outcome = self
            .outcomes
            .recv()
            .map_err(|_| InsertError::WorkerDisconnected)?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Ok(outcome)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

impl Drop for InsertQueue {
    fn drop(&mut self) {
        self.requests.take();
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            warn!("insert worker panicked");
        }
    }
}
