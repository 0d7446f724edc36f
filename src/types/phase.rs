// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::fmt;

/// Outcome of a reconcile call as reported to the orchestrating caller.
///
/// Created, updated and unchanged writes all collapse to `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPhase {
    Completed,
    Failed,
}

impl StatusPhase {
    pub fn from_result<T>(result: &crate::error::Result<T>) -> Self {
        match result {
            Ok(_) => StatusPhase::Completed,
            Err(e) => e.phase(),
        }
    }
}

impl fmt::Display for StatusPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusPhase::Completed => write!(f, "completed"),
            StatusPhase::Failed => write!(f, "failed"),
        }
    }
}

/// What the upsert primitive did to the stored resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationResult {
    Created,
    Updated,
    Unchanged,
}

impl fmt::Display for OperationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationResult::Created => write!(f, "created"),
            OperationResult::Updated => write!(f, "updated"),
            OperationResult::Unchanged => write!(f, "unchanged"),
        }
    }
}
