// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host-side promise.
//
// What crosses the boundary is always a host value (or an error); the
// awaiting side decodes it into `T`. Only the resolver thread holds the
// write half of a pending promise.

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

use rolodex_core::error::{Result, RolodexError};
use rolodex_core::types::CallId;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::marshal::FromHost;

/// Write half of a [`HostPromise`].
pub(crate) type HostSettler = oneshot::Sender<Result<Value>>;

/// A host-runtime promise for the outcome of one bridged call.
#[must_use = "a host promise does nothing unless awaited"]
pub struct HostPromise<T> {
    call_id: CallId,
    rx: oneshot::Receiver<Result<Value>>,
    _decode: PhantomData<fn() -> T>,
}

pub(crate) fn channel<T>(call_id: CallId) -> (HostPromise<T>, HostSettler) {
    let (tx, rx) = oneshot::channel();
    (
        HostPromise {
            call_id,
            rx,
            _decode: PhantomData,
        },
        tx,
    )
}

impl<T: FromHost> HostPromise<T> {
    /// A promise that is already resolved with `value`.
    pub fn resolved(call_id: CallId, value: Value) -> Self {
        let (promise, tx) = channel(call_id);
        let _ = tx.send(Ok(value));
        promise
    }

    /// A promise that is already rejected with `error`.
    pub fn rejected(call_id: CallId, error: RolodexError) -> Self {
        let (promise, tx) = channel(call_id);
        let _ = tx.send(Err(error));
        promise
    }

    pub fn call_id(&self) -> CallId {
        self.call_id
    }

    /// Forget the decoded type and hand the raw host value to the caller.
    pub fn into_host(self) -> HostPromise<Value> {
        HostPromise {
            call_id: self.call_id,
            rx: self.rx,
            _decode: PhantomData,
        }
    }

    /// Block the current thread until the promise settles.
    ///
    /// For hosts without an async executor. Panics if called from inside a
    /// tokio runtime, like `oneshot::Receiver::blocking_recv`.
    pub fn wait(self) -> Result<T> {
        let call_id = self.call_id;
        settle(call_id, self.rx.blocking_recv())
    }
}

fn settle<T: FromHost>(
    call_id: CallId,
    received: std::result::Result<Result<Value>, oneshot::error::RecvError>,
) -> Result<T> {
    match received {
        Ok(Ok(value)) => T::from_host(&value),
        Ok(Err(error)) => Err(error),
        Err(_) => Err(RolodexError::Bridge(format!(
            "promise for call {call_id} was dropped before settling"
        ))),
    }
}

impl<T: FromHost> Future for HostPromise<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let call_id = self.call_id;
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| settle(call_id, received))
    }
}

impl<T> std::fmt::Debug for HostPromise<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostPromise")
            .field("call_id", &self.call_id)
            .finish_non_exhaustive()
    }
}
