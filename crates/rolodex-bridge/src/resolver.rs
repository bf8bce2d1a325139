// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Completion queue and resolver thread.
//
// Native workers never touch host promise state. They post a completion
// message; a single named resolver thread owns the registry of pending
// promises and settles each one. On teardown every call still pending is
// rejected with `TornDown` instead of being left to hang.

use std::collections::HashMap;
use std::sync::mpsc;
use std::thread::{JoinHandle, ThreadId};

use rolodex_core::error::{Result, RolodexError};
use rolodex_core::types::CallId;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::marshal::FromHost;
use crate::promise::{self, HostPromise, HostSettler};

enum Completion {
    Register {
        call_id: CallId,
        settler: HostSettler,
    },
    Settle {
        call_id: CallId,
        outcome: Result<Value>,
    },
    Shutdown,
}

/// Owner of the resolver thread.
///
/// Dropping the resolver shuts the thread down and rejects whatever is
/// still pending.
pub struct Resolver {
    tx: mpsc::Sender<Completion>,
    thread: Option<JoinHandle<()>>,
    thread_id: ThreadId,
}

impl Resolver {
    /// Start the resolver thread.
    pub fn spawn(thread_name: &str) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let thread = std::thread::Builder::new()
            .name(thread_name.to_string())
            .spawn(move || run(rx))
            .map_err(|e| RolodexError::Bridge(format!("failed to spawn resolver thread: {e}")))?;
        let thread_id = thread.thread().id();

        info!(thread = thread_name, "resolver thread started");
        Ok(Self {
            tx,
            thread: Some(thread),
            thread_id,
        })
    }

    /// Thread on which every host promise is settled.
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Register a pending call and hand back both ends: the promise for the
    /// host and the completer for the native continuation.
    pub fn register<T: FromHost>(&self, call_id: CallId) -> (HostPromise<T>, Completer) {
        let (promise, settler) = promise::channel(call_id);
        if let Err(mpsc::SendError(Completion::Register { settler, .. })) =
            self.tx.send(Completion::Register { call_id, settler })
        {
            warn!(%call_id, "resolver thread is not running");
            let _ = settler.send(Err(RolodexError::Bridge(
                "resolver thread is not running".into(),
            )));
        }
        (
            promise,
            Completer {
                call_id,
                tx: Some(self.tx.clone()),
            },
        )
    }
}

impl Drop for Resolver {
    fn drop(&mut self) {
        let _ = self.tx.send(Completion::Shutdown);
        if let Some(thread) = self.thread.take() {
            if std::thread::current().id() == self.thread_id {
                return;
            }
            if thread.join().is_err() {
                warn!("resolver thread panicked");
            }
        }
    }
}

/// Posts the outcome of one call to the resolver. Completes at most once.
///
/// A completer dropped without completing rejects its call with a bridge
/// error.
pub struct Completer {
    call_id: CallId,
    tx: Option<mpsc::Sender<Completion>>,
}

impl Completer {
    pub fn complete(mut self, outcome: Result<Value>) {
        self.post(outcome);
    }

    fn post(&mut self, outcome: Result<Value>) {
        let Some(tx) = self.tx.take() else {
            return;
        };
        let call_id = self.call_id;
        if tx.send(Completion::Settle { call_id, outcome }).is_err() {
            debug!(%call_id, "resolver already shut down, completion dropped");
        }
    }
}

impl Drop for Completer {
    fn drop(&mut self) {
        if self.tx.is_some() {
            self.post(Err(RolodexError::Bridge(format!(
                "call {} abandoned before completion",
                self.call_id
            ))));
        }
    }
}

fn run(rx: mpsc::Receiver<Completion>) {
    let mut pending: HashMap<CallId, HostSettler> = HashMap::new();

    while let Ok(message) = rx.recv() {
        match message {
            Completion::Register { call_id, settler } => {
                pending.insert(call_id, settler);
            }
            Completion::Settle { call_id, outcome } => match pending.remove(&call_id) {
                Some(settler) => {
                    let resolved = outcome.is_ok();
                    if settler.send(outcome).is_err() {
                        debug!(%call_id, "host dropped the promise before it settled");
                    } else {
                        debug!(%call_id, resolved, "call settled");
                    }
                }
                None => debug!(%call_id, "completion for unknown call dropped"),
            },
            Completion::Shutdown => break,
        }
    }

    if !pending.is_empty() {
        warn!(count = pending.len(), "rejecting calls still pending at teardown");
    }
    for (call_id, settler) in pending.drain() {
        let _ = settler.send(Err(RolodexError::TornDown(call_id)));
    }
    info!("resolver thread stopped");
}
