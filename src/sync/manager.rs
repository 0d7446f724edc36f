// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Periodic reconciliation of every product's alert rules.

use crate::config::Config;
use crate::reconcilers::AlertReconciler;
use crate::store::RuleStore;
use crate::types::StatusPhase;
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, instrument};

/// Phase reported for one product after a sync pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPhase {
    pub product: String,
    pub phase: StatusPhase,
    pub error: Option<String>,
}

pub struct SyncManager {
    store: Arc<dyn RuleStore>,
    labels: BTreeMap<String, String>,
    reconcilers: Vec<AlertReconciler>,
    interval: Duration,
}

impl SyncManager {
    pub fn new(store: Arc<dyn RuleStore>, config: &Config, reconcilers: Vec<AlertReconciler>) -> Self {
        Self {
            store,
            labels: config.rule_labels(),
            reconcilers,
            interval: config.sync_interval,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        info!(
            "SyncManager started for {} products, syncing every {:?}",
            self.reconcilers.len(),
            self.interval
        );

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // First tick completes immediately
            ticker.tick().await;
            self.sync_all().await;
        }
    }

    /// Reconcile all products concurrently and report each product's phase
    #[instrument(skip(self))]
    pub async fn sync_all(&self) -> Vec<ProductPhase> {
        let store = self.store.as_ref();
        let results = join_all(
            self.reconcilers
                .iter()
                .map(|r| r.reconcile_alerts(store, &self.labels)),
        )
        .await;

        self.reconcilers
            .iter()
            .zip(results)
            .map(|(reconciler, result)| {
                let phase = StatusPhase::from_result(&result);
                let error = match result {
                    Ok(_) => {
                        info!("Alerts for {} reconciled: {}", reconciler.product_name, phase);
                        None
                    }
                    Err(e) => {
                        error!(
                            "Failed to reconcile alerts for {}: {}",
                            reconciler.product_name, e
                        );
                        Some(e.to_string())
                    }
                };
                ProductPhase {
                    product: reconciler.product_name.clone(),
                    phase,
                    error,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::alert_reconcilers;
    use crate::store::InMemoryRuleStore;

    fn manager(store: &InMemoryRuleStore) -> SyncManager {
        let config = Config::default();
        SyncManager::new(Arc::new(store.clone()), &config, alert_reconcilers(&config))
    }

    #[tokio::test]
    async fn test_sync_all_creates_every_rule() {
        let store = InMemoryRuleStore::new();

        let phases = manager(&store).sync_all().await;

        assert_eq!(phases.len(), 2);
        assert!(phases.iter().all(|p| p.phase == StatusPhase::Completed && p.error.is_none()));
        assert_eq!(store.len().await, 5);
        assert_eq!(store.write_count(), 5);
    }

    #[tokio::test]
    async fn test_second_sync_writes_nothing() {
        let store = InMemoryRuleStore::new();
        let manager = manager(&store);

        manager.sync_all().await;
        manager.sync_all().await;

        assert_eq!(store.write_count(), 5);
    }

    #[tokio::test]
    async fn test_sync_all_reports_failures_per_product() {
        let store = InMemoryRuleStore::new();
        store.fail_writes("apiserver unavailable").await;

        let phases = manager(&store).sync_all().await;

        assert!(phases.iter().all(|p| p.phase == StatusPhase::Failed));
        let rhsso = phases.iter().find(|p| p.product == "rhsso").unwrap();
        assert!(rhsso
            .error
            .as_deref()
            .unwrap()
            .contains("error creating/updating rhsso alert rule"));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_concurrent_products_complete_independently() {
        let store = InMemoryRuleStore::new();
        let config = Config::default();
        let reconcilers = alert_reconcilers(&config);
        let labels = config.rule_labels();

        let (rhsso, threescale) = tokio::join!(
            reconcilers[0].reconcile_alerts(&store, &labels),
            reconcilers[1].reconcile_alerts(&store, &labels)
        );

        assert_eq!(rhsso.unwrap(), StatusPhase::Completed);
        assert_eq!(threescale.unwrap(), StatusPhase::Completed);
        assert_eq!(store.len().await, 5);
    }
}
