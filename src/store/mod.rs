// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Storage capability the reconcilers write rule resources through.

pub mod cluster;
pub mod memory;

pub use cluster::KubeRuleStore;
pub use memory::InMemoryRuleStore;

use crate::error::StoreError;
use crate::types::{PrometheusRule, RuleIdentity};
use async_trait::async_trait;

/// Object store keyed by (name, namespace) with optimistic concurrency.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Read a rule; `Ok(None)` when it does not exist
    async fn get(&self, id: &RuleIdentity) -> Result<Option<PrometheusRule>, StoreError>;

    /// Create a rule; an already existing object is reported as [`StoreError::Conflict`]
    async fn create(&self, rule: &PrometheusRule) -> Result<PrometheusRule, StoreError>;

    /// Replace a rule. The object's resource version must match the stored one,
    /// otherwise [`StoreError::Conflict`] is returned.
    async fn update(&self, rule: &PrometheusRule) -> Result<PrometheusRule, StoreError>;
}
