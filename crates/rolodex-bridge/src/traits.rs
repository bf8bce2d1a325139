// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Trait definitions on both sides of the bridge.
//
// `ContactsModuleSpec` is what the host runtime sees. `NativeContacts` is
// what a platform implementation (iOS Contacts framework, Android
// ContactsContract, or the in-memory store) provides.

use rolodex_core::types::{Contact, ContactFieldSet, ContactFields};

use crate::native::NativePromise;
use crate::promise::HostPromise;

/// Contract shared by every object exposed to the host runtime.
pub trait HybridObject: Send + Sync {
    /// Name under which the host registers the object.
    fn name(&self) -> &str;

    /// Best-effort byte estimate of memory held outside the host allocator.
    ///
    /// Polled by the host's memory-pressure heuristics. Never fails and
    /// never blocks.
    fn external_memory_size(&self) -> usize;
}

/// Host-facing contacts capability.
pub trait ContactsModuleSpec: HybridObject {
    /// Fetch every address-book entry, projected to `keys`.
    ///
    /// Returns immediately with a pending promise. Rejects with a platform
    /// error if the store denies access or the query fails.
    fn get_all(&self, keys: ContactFieldSet) -> HostPromise<Vec<Contact>>;
}

/// Platform-side contacts implementation.
pub trait NativeContacts: Send + Sync {
    /// Start a query and return its handle without waiting for it.
    fn get_all(&self, keys: &[ContactFields]) -> NativePromise<Vec<Contact>>;

    /// Bytes this implementation holds that the host cannot see.
    fn memory_size(&self) -> usize;
}
