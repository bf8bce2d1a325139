// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native-side asynchronous handle.
//
// A native implementation answers a query immediately with a
// `NativePromise` and settles it later from whatever worker thread did the
// work. The bridge attaches exactly one continuation; it runs on the
// settling thread (or inline, if the promise had already settled).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rolodex_core::error::{Result, RolodexError};

type Continuation<T> = Box<dyn FnOnce(Result<T>) + Send>;

enum State<T> {
    /// Not settled yet; holds the continuation once one is attached.
    Pending(Option<Continuation<T>>),
    /// Settled before anyone attached a continuation.
    Settled(Result<T>),
    /// Outcome handed to the continuation.
    Done,
}

type Shared<T> = Arc<Mutex<State<T>>>;

fn lock<T>(shared: &Shared<T>) -> MutexGuard<'_, State<T>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Pending work owned by the native runtime.
pub struct NativePromise<T> {
    shared: Shared<T>,
}

/// Write side of a [`NativePromise`]. Settles at most once.
///
/// Dropping an unsettled resolver rejects the promise, so a native
/// implementation that loses track of a query cannot leave the host waiting
/// forever.
pub struct NativeResolver<T> {
    shared: Option<Shared<T>>,
}

impl<T: Send + 'static> NativePromise<T> {
    /// Create an unsettled promise and the resolver that settles it.
    pub fn pending() -> (Self, NativeResolver<T>) {
        let shared = Arc::new(Mutex::new(State::Pending(None)));
        (
            Self {
                shared: Arc::clone(&shared),
            },
            NativeResolver {
                shared: Some(shared),
            },
        )
    }

    pub fn resolved(value: T) -> Self {
        Self {
            shared: Arc::new(Mutex::new(State::Settled(Ok(value)))),
        }
    }

    pub fn rejected(error: RolodexError) -> Self {
        Self {
            shared: Arc::new(Mutex::new(State::Settled(Err(error)))),
        }
    }

    /// Attach the completion continuation.
    pub fn on_settled<F>(self, continuation: F)
    where
        F: FnOnce(Result<T>) + Send + 'static,
    {
        let mut state = lock(&self.shared);
        match std::mem::replace(&mut *state, State::Done) {
            State::Pending(_) => *state = State::Pending(Some(Box::new(continuation))),
            State::Settled(outcome) => {
                drop(state);
                continuation(outcome);
            }
            State::Done => {}
        }
    }
}

impl<T> NativeResolver<T> {
    pub fn resolve(mut self, value: T) {
        self.settle(Ok(value));
    }

    pub fn reject(mut self, error: RolodexError) {
        self.settle(Err(error));
    }

    fn settle(&mut self, outcome: Result<T>) {
        let Some(shared) = self.shared.take() else {
            return;
        };
        let mut state = lock(&shared);
        match std::mem::replace(&mut *state, State::Done) {
            State::Pending(Some(continuation)) => {
                drop(state);
                continuation(outcome);
            }
            State::Pending(None) => *state = State::Settled(outcome),
            settled @ (State::Settled(_) | State::Done) => *state = settled,
        }
    }
}

impl<T> Drop for NativeResolver<T> {
    fn drop(&mut self) {
        if self.shared.is_some() {
            tracing::warn!("native resolver dropped without settling");
            self.settle(Err(RolodexError::PlatformQuery(
                "native implementation dropped the query without settling".into(),
            )));
        }
    }
}
