// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Rolodex — asynchronous cross-runtime bridge for the platform contacts store.
//!
//! The host runtime calls into a [`HybridContactsModule`]; the module
//! marshals arguments, starts the query on a [`NativeContacts`]
//! implementation, and settles a [`HostPromise`] on its resolver thread once
//! the native side completes. Failures of any kind arrive as a rejected
//! promise, never as a panic across the boundary.

pub mod hybrid;
pub mod marshal;
pub mod native;
pub mod promise;
pub mod resolver;
pub mod store;
pub mod traits;

pub use hybrid::HybridContactsModule;
pub use marshal::{FromHost, ToHost};
pub use native::{NativePromise, NativeResolver};
pub use promise::HostPromise;
pub use store::InMemoryContactStore;
pub use traits::{ContactsModuleSpec, HybridObject, NativeContacts};
