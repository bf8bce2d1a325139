// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory contacts store for desktop/CI builds and tests.
//
// Stands in for the platform address book: every query runs on its own
// worker thread and settles a `NativePromise`, the way the OS contacts
// frameworks answer from a background queue.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rolodex_core::error::{Result, RolodexError};
use rolodex_core::types::{Contact, ContactFieldSet, ContactFields};
use tracing::{debug, info, instrument};

use crate::marshal::FromHost;
use crate::native::NativePromise;
use crate::traits::NativeContacts;

/// Fixed per-store bookkeeping counted by the memory estimate.
const STORE_OVERHEAD_BYTES: usize = std::mem::size_of::<InMemoryContactStore>();

/// Address book held in process memory.
pub struct InMemoryContactStore {
    contacts: Arc<Vec<Contact>>,
    access_granted: AtomicBool,
    query_delay: Duration,
}

impl InMemoryContactStore {
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self {
            contacts: Arc::new(contacts),
            access_granted: AtomicBool::new(true),
            query_delay: Duration::ZERO,
        }
    }

    /// Load a store from a JSON file holding an array of host-shaped
    /// contact records.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_fixture(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        let contacts = Vec::<Contact>::from_host(&value)?;
        info!(count = contacts.len(), "contacts fixture loaded");
        Ok(Self::new(contacts))
    }

    /// Add artificial latency to every query.
    pub fn with_query_delay(mut self, delay: Duration) -> Self {
        self.query_delay = delay;
        self
    }

    /// Simulate the user granting or revoking contacts permission.
    pub fn set_access_granted(&self, granted: bool) {
        self.access_granted.store(granted, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

impl NativeContacts for InMemoryContactStore {
    fn get_all(&self, keys: &[ContactFields]) -> NativePromise<Vec<Contact>> {
        let keys: ContactFieldSet = keys.iter().copied().collect();
        let granted = self.access_granted.load(Ordering::SeqCst);
        let contacts = Arc::clone(&self.contacts);
        let delay = self.query_delay;

        let (promise, resolver) = NativePromise::pending();
        let spawned = std::thread::Builder::new()
            .name("rolodex-query".into())
            .spawn(move || {
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
                if !granted {
                    debug!("contacts query denied");
                    resolver.reject(RolodexError::PermissionDenied);
                    return;
                }
                let projected: Vec<Contact> =
                    contacts.iter().map(|contact| contact.project(keys)).collect();
                debug!(count = projected.len(), ?keys, "contacts query finished");
                resolver.resolve(projected);
            });

        match spawned {
            Ok(_) => promise,
            Err(e) => NativePromise::rejected(RolodexError::PlatformQuery(format!(
                "failed to start query worker: {e}"
            ))),
        }
    }

    fn memory_size(&self) -> usize {
        STORE_OVERHEAD_BYTES
            + self.contacts.capacity() * std::mem::size_of::<Contact>()
            + self.contacts.iter().map(Contact::heap_size).sum::<usize>()
    }
}
