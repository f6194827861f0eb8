// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types.
//!
//! Only ingestion (payload, configuration) surfaces errors to callers.
//! Slot derivation and view rendering swallow [`ClockError`]s and omit the
//! affected data instead.

/// Result type for payload and configuration operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// A clock-time string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    #[error("empty time string")]
    Empty,

    #[error("malformed time string: {0:?}")]
    Malformed(String),
}

/// Error type for payload and configuration ingestion.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Time error: {0}")]
    Clock(#[from] ClockError),

    #[error("Invalid date {0:?}, expected DD/MM/YYYY")]
    InvalidDate(String),

    #[cfg(feature = "serde")]
    #[error("Payload error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
