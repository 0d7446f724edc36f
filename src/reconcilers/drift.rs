// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Drift reconciler - watches managed PrometheusRules and restores their desired state.

use crate::config::Config;
use crate::constants::labels;
use crate::error::{AlertKeeperError, Result};
use crate::reconcilers::alerts::{reconcile_alert_rule, AlertReconciler};
use crate::store::RuleStore;
use crate::types::{PrometheusRule, RuleGroup, RuleIdentity};
use futures::StreamExt;
use kube::{
    runtime::{controller::Action, watcher, Controller},
    Api, Client, ResourceExt,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Desired content of one managed rule resource
#[derive(Debug, Clone)]
pub struct DesiredRule {
    pub product: String,
    pub groups: Vec<RuleGroup>,
}

/// Index of every managed identity to the content it must hold
#[derive(Debug, Clone, Default)]
pub struct DesiredState {
    labels: BTreeMap<String, String>,
    rules: HashMap<RuleIdentity, DesiredRule>,
}

impl DesiredState {
    pub fn new(labels: BTreeMap<String, String>, reconcilers: &[AlertReconciler]) -> Result<Self> {
        let mut rules = HashMap::new();
        for reconciler in reconcilers {
            for alert in &reconciler.alerts {
                rules.insert(
                    alert.identity()?,
                    DesiredRule {
                        product: reconciler.product_name.clone(),
                        groups: alert.groups(),
                    },
                );
            }
        }
        Ok(Self { labels, rules })
    }

    pub fn get(&self, id: &RuleIdentity) -> Option<&DesiredRule> {
        self.rules.get(id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Converge `id` back to its desired content; unmanaged identities are left alone.
    pub async fn restore<S>(&self, store: &S, id: &RuleIdentity) -> Result<bool>
    where
        S: RuleStore + ?Sized,
    {
        let Some(desired) = self.get(id) else {
            debug!("PrometheusRule {} is not managed, skipping", id);
            return Ok(false);
        };
        reconcile_alert_rule(store, &desired.product, id, &self.labels, &desired.groups).await?;
        Ok(true)
    }
}

pub struct DriftReconciler {
    client: Client,
    store: Arc<dyn RuleStore>,
    desired: DesiredState,
    resync: Duration,
}

impl DriftReconciler {
    pub fn new(
        client: Client,
        store: Arc<dyn RuleStore>,
        config: &Config,
        reconcilers: &[AlertReconciler],
    ) -> Result<Self> {
        Ok(Self {
            client,
            store,
            desired: DesiredState::new(config.rule_labels(), reconcilers)?,
            resync: config.sync_interval,
        })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let rules: Api<PrometheusRule> = Api::all(self.client.clone());
        let selector = format!("{}={}", labels::INTEGREATLY, labels::INTEGREATLY_VALUE);
        let context = Arc::new(self);

        Controller::new(rules, watcher::Config::default().labels(&selector))
            .run(reconcile, error_policy, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled PrometheusRule: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }
}

async fn reconcile(rule: Arc<PrometheusRule>, ctx: Arc<DriftReconciler>) -> Result<Action> {
    let id = RuleIdentity::new(rule.name_any(), rule.namespace().unwrap_or_default())?;

    if ctx.desired.restore(ctx.store.as_ref(), &id).await? {
        Ok(Action::requeue(ctx.resync))
    } else {
        Ok(Action::await_change())
    }
}

fn error_policy(
    _rule: Arc<PrometheusRule>,
    error: &AlertKeeperError,
    _ctx: Arc<DriftReconciler>,
) -> Action {
    error!("Reconciliation error: {}", error);
    Action::requeue(Duration::from_secs(60))
}
