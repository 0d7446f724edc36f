// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! In-memory rule store with resource versioning and fault injection.

use super::RuleStore;
use crate::error::StoreError;
use crate::types::{PrometheusRule, RuleIdentity};
use async_trait::async_trait;
use kube::ResourceExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone, Default)]
pub struct InMemoryRuleStore {
    rules: Arc<Mutex<HashMap<RuleIdentity, PrometheusRule>>>,
    version: Arc<AtomicU64>,
    writes: Arc<AtomicUsize>,
    /// Number of upcoming writes that fail with a conflict
    pending_conflicts: Arc<AtomicUsize>,
    /// When set, every write fails with this message and stores nothing
    write_failure: Arc<Mutex<Option<String>>>,
}

impl InMemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a rule as-is, bypassing conflict checks. Assigns a fresh resource version.
    pub async fn insert(&self, mut rule: PrometheusRule) -> Result<PrometheusRule, StoreError> {
        let id = identity_of(&rule)?;
        rule.metadata.resource_version = Some(self.next_version());
        self.rules.lock().await.insert(id, rule.clone());
        Ok(rule)
    }

    pub async fn snapshot(&self, id: &RuleIdentity) -> Option<PrometheusRule> {
        self.rules.lock().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.rules.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rules.lock().await.is_empty()
    }

    /// Successful creates and updates so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn inject_conflicts(&self, count: usize) {
        self.pending_conflicts.store(count, Ordering::SeqCst);
    }

    pub async fn fail_writes(&self, message: impl Into<String>) {
        *self.write_failure.lock().await = Some(message.into());
    }

    pub async fn heal(&self) {
        *self.write_failure.lock().await = None;
        self.pending_conflicts.store(0, Ordering::SeqCst);
    }

    fn next_version(&self) -> String {
        (self.version.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }

    async fn check_write(&self, id: &RuleIdentity) -> Result<(), StoreError> {
        if let Some(message) = self.write_failure.lock().await.as_ref() {
            return Err(StoreError::Unavailable(message.clone()));
        }
        let injected = self
            .pending_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(StoreError::Conflict(format!("injected conflict on {}", id)));
        }
        Ok(())
    }
}

fn identity_of(rule: &PrometheusRule) -> Result<RuleIdentity, StoreError> {
    let namespace = rule.namespace().unwrap_or_default();
    RuleIdentity::new(rule.name_any(), namespace)
        .map_err(|e| StoreError::InvalidMutation(e.to_string()))
}

#[async_trait]
impl RuleStore for InMemoryRuleStore {
    async fn get(&self, id: &RuleIdentity) -> Result<Option<PrometheusRule>, StoreError> {
        Ok(self.rules.lock().await.get(id).cloned())
    }

    async fn create(&self, rule: &PrometheusRule) -> Result<PrometheusRule, StoreError> {
        let id = identity_of(rule)?;
        self.check_write(&id).await?;

        let mut rules = self.rules.lock().await;
        if rules.contains_key(&id) {
            return Err(StoreError::Conflict(format!("{} already exists", id)));
        }

        let mut stored = rule.clone();
        stored.metadata.resource_version = Some(self.next_version());
        rules.insert(id, stored.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(stored)
    }

    async fn update(&self, rule: &PrometheusRule) -> Result<PrometheusRule, StoreError> {
        let id = identity_of(rule)?;
        self.check_write(&id).await?;

        let mut rules = self.rules.lock().await;
        let Some(current) = rules.get(&id) else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        if current.metadata.resource_version != rule.metadata.resource_version {
            return Err(StoreError::Conflict(format!(
                "{} has resource version {:?}, update carried {:?}",
                id, current.metadata.resource_version, rule.metadata.resource_version
            )));
        }

        let mut stored = rule.clone();
        stored.metadata.resource_version = Some(self.next_version());
        rules.insert(id, stored.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(stored)
    }
}
