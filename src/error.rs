// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::types::StatusPhase;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlertKeeperError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Invalid rule identity: {0}")]
    InvalidIdentity(String),

    #[error("error creating/updating {product} alert rule PrometheusRule {rule}: {source}")]
    AlertRule {
        product: String,
        rule: String,
        #[source]
        source: StoreError,
    },
}

impl AlertKeeperError {
    /// Phase reported to the orchestrating caller for this failure
    pub fn phase(&self) -> StatusPhase {
        StatusPhase::Failed
    }
}

pub type Result<T> = std::result::Result<T, AlertKeeperError>;

/// Failures surfaced by a [`crate::store::RuleStore`]
#[derive(Error, Debug)]
pub enum StoreError {
    /// Optimistic concurrency failure, safe to retry after a fresh read
    #[error("write conflict: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("mutation changed the object identity: {0}")]
    InvalidMutation(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("Kubernetes API error: {0}")]
    Kube(kube::Error),
}

impl From<kube::Error> for StoreError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) if resp.code == 409 => StoreError::Conflict(resp.message),
            kube::Error::Api(resp) if resp.code == 404 => StoreError::NotFound(resp.message),
            other => StoreError::Kube(other),
        }
    }
}
