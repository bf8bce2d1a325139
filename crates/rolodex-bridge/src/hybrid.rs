// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Hybrid object wrapper for the contacts module.
//
// The wrapper owns the native implementation exclusively and is the only
// path from the host into it. Every method is a marshal / call / marshal
// triple listed in `METHODS`; adding a method means adding a row there.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread::ThreadId;

use rolodex_core::config::BridgeConfig;
use rolodex_core::error::{Result, RolodexError};
use rolodex_core::types::{CallId, Contact, ContactFieldSet, ContactFields};
use serde_json::Value;
use tracing::{Instrument as _, debug, info, info_span, warn};

use crate::marshal::{FromHost, ToHost};
use crate::promise::HostPromise;
use crate::resolver::Resolver;
use crate::traits::{ContactsModuleSpec, HybridObject, NativeContacts};

type Invoker = fn(&HybridContactsModule, CallId, &[Value]) -> HostPromise<Value>;

/// One row of the dynamic dispatch table.
pub struct MethodEntry {
    pub name: &'static str,
    pub arity: usize,
    invoke: Invoker,
}

/// Methods reachable through [`HybridContactsModule::call`].
pub const METHODS: &[MethodEntry] = &[
    MethodEntry {
        name: "getAll",
        arity: 1,
        invoke: invoke_get_all,
    },
    MethodEntry {
        name: "getExternalMemorySize",
        arity: 0,
        invoke: invoke_external_memory_size,
    },
];

fn invoke_get_all(module: &HybridContactsModule, call_id: CallId, args: &[Value]) -> HostPromise<Value> {
    match ContactFieldSet::decode(&args[0], "keys") {
        Ok(keys) => module.dispatch_get_all(call_id, keys).into_host(),
        Err(e) => {
            debug!(%call_id, error = %e, "getAll arguments rejected");
            HostPromise::rejected(call_id, e)
        }
    }
}

fn invoke_external_memory_size(
    module: &HybridContactsModule,
    call_id: CallId,
    _args: &[Value],
) -> HostPromise<Value> {
    HostPromise::resolved(call_id, module.external_memory_size().to_host())
}

/// Host-facing wrapper around one native contacts implementation.
pub struct HybridContactsModule {
    // Dropped first: pending calls are rejected as torn down before the
    // native side gets a chance to abandon them.
    resolver: Resolver,
    native: Box<dyn NativeContacts>,
}

impl HybridContactsModule {
    pub const TAG: &'static str = "ContactsModule";

    /// Wrap `native`. The binding is fixed for the wrapper's lifetime.
    pub fn new(native: impl NativeContacts + 'static, config: &BridgeConfig) -> Result<Self> {
        let resolver = Resolver::spawn(&config.resolver_thread_name)?;
        info!(tag = Self::TAG, "hybrid contacts module created");
        Ok(Self {
            resolver,
            native: Box::new(native),
        })
    }

    /// Thread on which this module settles host promises.
    pub fn resolver_thread(&self) -> ThreadId {
        self.resolver.thread_id()
    }

    /// Names of the methods the host can call.
    pub fn methods() -> impl Iterator<Item = &'static str> {
        METHODS.iter().map(|entry| entry.name)
    }

    /// Invoke a method by name with host-side arguments.
    ///
    /// Unknown names, wrong arity, and undecodable arguments all come back
    /// as a rejected promise.
    pub fn call(&self, method: &str, args: &[Value]) -> HostPromise<Value> {
        let call_id = CallId::new();
        let Some(entry) = METHODS.iter().find(|entry| entry.name == method) else {
            warn!(%call_id, method, "call to unknown method");
            return HostPromise::rejected(call_id, RolodexError::UnknownMethod(method.to_string()));
        };
        if args.len() != entry.arity {
            return HostPromise::rejected(
                call_id,
                RolodexError::BadArity {
                    method: entry.name,
                    expected: entry.arity,
                    actual: args.len(),
                },
            );
        }
        (entry.invoke)(self, call_id, args)
    }

    fn dispatch_get_all(&self, call_id: CallId, keys: ContactFieldSet) -> HostPromise<Vec<Contact>> {
        let span = info_span!("get_all", %call_id, ?keys);
        let _entered = span.enter();

        let (promise, completer) = self.resolver.register(call_id);
        let native_keys: Vec<ContactFields> = keys.iter().collect();

        let handle = match catch_unwind(AssertUnwindSafe(|| self.native.get_all(&native_keys))) {
            Ok(handle) => handle,
            Err(_) => {
                warn!("native implementation panicked while starting the query");
                completer.complete(Err(RolodexError::PlatformQuery(
                    "native implementation panicked".into(),
                )));
                return promise;
            }
        };

        let continuation_span = span.clone();
        handle.on_settled(move |outcome| {
            let _entered = continuation_span.enter();
            let outcome = match outcome {
                Ok(contacts) => {
                    debug!(count = contacts.len(), "native query resolved");
                    // Re-project so a sloppy implementation cannot leak
                    // fields the caller did not ask for.
                    let projected: Vec<Contact> =
                        contacts.iter().map(|contact| contact.project(keys)).collect();
                    Ok(projected.to_host())
                }
                Err(e) => {
                    let e = e.into_platform();
                    debug!(error = %e, "native query rejected");
                    Err(e)
                }
            };
            completer.complete(outcome);
        });

        debug!("native query dispatched");
        promise
    }
}

impl HybridObject for HybridContactsModule {
    fn name(&self) -> &str {
        Self::TAG
    }

    fn external_memory_size(&self) -> usize {
        self.native.memory_size()
    }
}

impl ContactsModuleSpec for HybridContactsModule {
    fn get_all(&self, keys: ContactFieldSet) -> HostPromise<Vec<Contact>> {
        self.dispatch_get_all(CallId::new(), keys)
    }
}

/// Await a host promise inside a span tagged with its call id.
pub async fn settle<T: FromHost>(promise: HostPromise<T>) -> Result<T> {
    let call_id = promise.call_id();
    promise
        .instrument(tracing::debug_span!("await", %call_id))
        .await
}
