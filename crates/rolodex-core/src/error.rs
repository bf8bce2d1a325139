// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Rolodex.
//
// Nothing in this enum is ever raised across the runtime boundary: every
// variant is delivered to the host as a rejected promise.

use thiserror::Error;

use crate::types::CallId;

/// Top-level error type for all Rolodex operations.
#[derive(Debug, Error)]
pub enum RolodexError {
    // -- Marshalling --
    #[error("unrecognized {type_name} discriminant: {value}")]
    UnknownDiscriminant { type_name: &'static str, value: i64 },

    #[error("missing required field `{field}` in {record} at {path}")]
    MissingField {
        path: String,
        record: &'static str,
        field: &'static str,
    },

    #[error("type mismatch at {path}: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("unknown contact field name: {0}")]
    UnknownFieldName(String),

    // -- Platform query --
    #[error("access to the contacts store was denied")]
    PermissionDenied,

    #[error("contacts query failed: {0}")]
    PlatformQuery(String),

    // -- Bridge --
    #[error("bridge torn down before call {0} settled")]
    TornDown(CallId),

    #[error("unknown bridge method: {0}")]
    UnknownMethod(String),

    #[error("method `{method}` takes {expected} argument(s), got {actual}")]
    BadArity {
        method: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("platform bridge error: {0}")]
    Bridge(String),

    // -- Configuration / fixtures --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification of a [`RolodexError`].
///
/// Host code uses this to tell a marshalling failure from a platform
/// failure without matching on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value could not be converted across the runtime boundary.
    Marshal,
    /// The platform contacts store failed or refused the query.
    PlatformQuery,
    /// The bridge itself could not route or settle the call.
    Bridge,
    /// Configuration or fixture loading failed.
    Config,
}

impl RolodexError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownDiscriminant { .. }
            | Self::MissingField { .. }
            | Self::TypeMismatch { .. }
            | Self::UnknownFieldName(_) => ErrorKind::Marshal,
            Self::PermissionDenied | Self::PlatformQuery(_) => ErrorKind::PlatformQuery,
            Self::TornDown(_) | Self::UnknownMethod(_) | Self::BadArity { .. } | Self::Bridge(_) => {
                ErrorKind::Bridge
            }
            Self::Io(_) | Self::Serialization(_) => ErrorKind::Config,
        }
    }

    /// Normalise an error reported by a native implementation.
    ///
    /// Platform errors pass through unchanged; anything else the native side
    /// produced is reduced to its description under `PlatformQuery`.
    pub fn into_platform(self) -> Self {
        match self.kind() {
            ErrorKind::PlatformQuery => self,
            _ => Self::PlatformQuery(self.to_string()),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RolodexError>;
