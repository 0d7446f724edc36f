// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Product alert reconciliation on top of the upsert primitive.

use crate::error::{AlertKeeperError, Result};
use crate::reconcilers::upsert::create_or_update;
use crate::store::RuleStore;
use crate::types::{
    OperationResult, PrometheusRule, PrometheusRuleSpec, Rule, RuleGroup, RuleIdentity,
    StatusPhase,
};
use futures::future::join_all;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Ensure the rule resource `id` holds exactly `labels` and `groups`.
///
/// Returns `Completed` whether the resource was created, updated or left alone.
/// A store failure is returned as an [`AlertKeeperError::AlertRule`] whose
/// [`phase`](AlertKeeperError::phase) is `Failed`.
#[instrument(skip(store, labels, groups), fields(rule = %id, group_count = groups.len()))]
pub async fn reconcile_alert_rule<S>(
    store: &S,
    product: &str,
    id: &RuleIdentity,
    labels: &BTreeMap<String, String>,
    groups: &[RuleGroup],
) -> Result<StatusPhase>
where
    S: RuleStore + ?Sized,
{
    let result = create_or_update(store, id, |rule: &mut PrometheusRule| {
        rule.metadata.labels = Some(labels.clone());
        rule.spec = PrometheusRuleSpec::new(groups.to_vec());
    })
    .await
    .map_err(|source| AlertKeeperError::AlertRule {
        product: product.to_string(),
        rule: id.to_string(),
        source,
    })?;

    match result {
        OperationResult::Unchanged => {
            debug!("The operation result for {} {} was {}", product, id.name(), result)
        }
        _ => info!("The operation result for {} {} was {}", product, id.name(), result),
    }

    Ok(StatusPhase::Completed)
}

/// One PrometheusRule holding a single rule group
#[derive(Debug, Clone, PartialEq)]
pub struct AlertConfiguration {
    pub alert_name: String,
    pub namespace: String,
    pub group_name: String,
    pub rules: Vec<Rule>,
}

impl AlertConfiguration {
    pub fn identity(&self) -> Result<RuleIdentity> {
        RuleIdentity::new(&self.alert_name, &self.namespace)
    }

    pub fn groups(&self) -> Vec<RuleGroup> {
        vec![RuleGroup::new(&self.group_name, self.rules.clone())]
    }
}

/// The alert rules owned by one product
#[derive(Debug, Clone, PartialEq)]
pub struct AlertReconciler {
    pub product_name: String,
    pub alerts: Vec<AlertConfiguration>,
}

impl AlertReconciler {
    /// Reconcile every configured rule resource of this product.
    ///
    /// Resources are independent identities and are written concurrently;
    /// the first failure in table order is returned.
    #[instrument(skip(self, store, labels), fields(product = %self.product_name))]
    pub async fn reconcile_alerts<S>(
        &self,
        store: &S,
        labels: &BTreeMap<String, String>,
    ) -> Result<StatusPhase>
    where
        S: RuleStore + ?Sized,
    {
        let results = join_all(
            self.alerts
                .iter()
                .map(|alert| self.reconcile_alert(store, alert, labels)),
        )
        .await;

        for result in results {
            result?;
        }

        Ok(StatusPhase::Completed)
    }

    async fn reconcile_alert<S>(
        &self,
        store: &S,
        alert: &AlertConfiguration,
        labels: &BTreeMap<String, String>,
    ) -> Result<StatusPhase>
    where
        S: RuleStore + ?Sized,
    {
        let id = alert.identity()?;
        reconcile_alert_rule(store, &self.product_name, &id, labels, &alert.groups()).await
    }

    /// The objects [`reconcile_alerts`](Self::reconcile_alerts) converges to
    pub fn desired_rules(&self, labels: &BTreeMap<String, String>) -> Result<Vec<PrometheusRule>> {
        self.alerts
            .iter()
            .map(|alert| {
                let id = alert.identity()?;
                let mut rule = PrometheusRule::new(
                    id.name(),
                    PrometheusRuleSpec::new(alert.groups()),
                );
                rule.metadata.namespace = Some(id.namespace().to_string());
                rule.metadata.labels = Some(labels.clone());
                Ok(rule)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::InMemoryRuleStore;

    fn labels() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("integreatly".to_string(), "yes".to_string()),
            ("monitoring-key".to_string(), "middleware".to_string()),
        ])
    }

    fn id() -> RuleIdentity {
        RuleIdentity::new("ksm-endpoint-alerts", "rhsso-ns").unwrap()
    }

    fn group(name: &str) -> RuleGroup {
        RuleGroup::new(
            name,
            vec![Rule::alert("RHMIRhssoKeycloakServiceEndpointDown", "up < 1")
                .for_duration("5m")
                .label("severity", "warning")
                .annotation("message", "No {{  $labels.endpoint  }} endpoints")],
        )
    }

    fn seeded_rule(groups: Vec<RuleGroup>, labels: BTreeMap<String, String>) -> PrometheusRule {
        let mut rule = PrometheusRule::new("ksm-endpoint-alerts", PrometheusRuleSpec::new(groups));
        rule.metadata.namespace = Some("rhsso-ns".to_string());
        rule.metadata.labels = Some(labels);
        rule
    }

    #[tokio::test]
    async fn test_reconcile_creates_rule() {
        let store = InMemoryRuleStore::new();

        let phase = reconcile_alert_rule(&store, "rhsso", &id(), &labels(), &[group("g1")])
            .await
            .unwrap();

        assert_eq!(phase, StatusPhase::Completed);
        let stored = store.snapshot(&id()).await.unwrap();
        assert_eq!(stored.spec.groups, vec![group("g1")]);
        assert_eq!(stored.metadata.labels, Some(labels()));
    }

    #[tokio::test]
    async fn test_reconcile_twice_is_idempotent() {
        let store = InMemoryRuleStore::new();

        reconcile_alert_rule(&store, "rhsso", &id(), &labels(), &[group("g1")])
            .await
            .unwrap();
        let after_first = store.snapshot(&id()).await.unwrap();
        reconcile_alert_rule(&store, "rhsso", &id(), &labels(), &[group("g1")])
            .await
            .unwrap();

        assert_eq!(store.snapshot(&id()).await.unwrap(), after_first);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_reconcile_replaces_extra_groups_and_labels() {
        let store = InMemoryRuleStore::new();
        let mut foreign_labels = labels();
        foreign_labels.insert("team".to_string(), "someone-else".to_string());
        store
            .insert(seeded_rule(vec![group("g1"), group("unmanaged")], foreign_labels))
            .await
            .unwrap();

        reconcile_alert_rule(&store, "rhsso", &id(), &labels(), &[group("g1")])
            .await
            .unwrap();

        let stored = store.snapshot(&id()).await.unwrap();
        assert_eq!(stored.spec.groups, vec![group("g1")]);
        assert_eq!(stored.metadata.labels, Some(labels()));
    }

    #[tokio::test]
    async fn test_reconcile_empty_groups() {
        let store = InMemoryRuleStore::new();
        store
            .insert(seeded_rule(vec![group("g1")], labels()))
            .await
            .unwrap();

        let phase = reconcile_alert_rule(&store, "rhsso", &id(), &labels(), &[])
            .await
            .unwrap();

        assert_eq!(phase, StatusPhase::Completed);
        assert!(store.snapshot(&id()).await.unwrap().spec.groups.is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_failure_wraps_error() {
        let store = InMemoryRuleStore::new();
        store.fail_writes("connection refused").await;

        let err = reconcile_alert_rule(&store, "3scale", &id(), &labels(), &[group("g1")])
            .await
            .unwrap_err();

        assert_eq!(err.phase(), StatusPhase::Failed);
        assert!(err.to_string().contains("3scale alert rule PrometheusRule"));
        assert!(err.to_string().contains("connection refused"));
        assert!(matches!(
            err,
            AlertKeeperError::AlertRule {
                source: StoreError::Unavailable(_),
                ..
            }
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_previous_state() {
        let store = InMemoryRuleStore::new();
        reconcile_alert_rule(&store, "rhsso", &id(), &labels(), &[group("g1")])
            .await
            .unwrap();
        store.fail_writes("etcd leader lost").await;

        let result = reconcile_alert_rule(&store, "rhsso", &id(), &labels(), &[group("g2")]).await;

        assert!(result.is_err());
        assert_eq!(
            store.snapshot(&id()).await.unwrap().spec.groups,
            vec![group("g1")]
        );
    }

    fn reconciler(namespaces: &[&str]) -> AlertReconciler {
        AlertReconciler {
            product_name: "rhsso".to_string(),
            alerts: namespaces
                .iter()
                .map(|ns| AlertConfiguration {
                    alert_name: "ksm-endpoint-alerts".to_string(),
                    namespace: ns.to_string(),
                    group_name: format!("{}-endpoint.rules", ns),
                    rules: vec![Rule::alert("EndpointDown", "up < 1")],
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_reconcile_alerts_writes_every_identity() {
        let store = InMemoryRuleStore::new();

        let phase = reconciler(&["ns-a", "ns-b"])
            .reconcile_alerts(&store, &labels())
            .await
            .unwrap();

        assert_eq!(phase, StatusPhase::Completed);
        assert_eq!(store.len().await, 2);
        let b = store
            .snapshot(&RuleIdentity::new("ksm-endpoint-alerts", "ns-b").unwrap())
            .await
            .unwrap();
        assert_eq!(b.spec.groups[0].name, "ns-b-endpoint.rules");
    }

    #[tokio::test]
    async fn test_reconcile_alerts_rejects_empty_namespace() {
        let store = InMemoryRuleStore::new();

        let err = reconciler(&["ns-a", ""])
            .reconcile_alerts(&store, &labels())
            .await
            .unwrap_err();

        assert!(matches!(err, AlertKeeperError::InvalidIdentity(_)));
        assert_eq!(err.phase(), StatusPhase::Failed);
    }

    #[test]
    fn test_desired_rules_match_configuration() {
        let rules = reconciler(&["ns-a"]).desired_rules(&labels()).unwrap();

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].metadata.namespace.as_deref(), Some("ns-a"));
        assert_eq!(rules[0].metadata.labels, Some(labels()));
        assert_eq!(rules[0].spec.groups[0].rules.len(), 1);
    }
}
