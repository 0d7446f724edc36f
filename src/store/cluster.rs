// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! PrometheusRule storage backed by the Kubernetes API

use super::RuleStore;
use crate::constants::OPERATOR_NAME;
use crate::error::StoreError;
use crate::types::{PrometheusRule, RuleIdentity};
use async_trait::async_trait;
use kube::{api::PostParams, Api, Client, ResourceExt};
use tracing::{debug, instrument};

pub struct KubeRuleStore {
    client: Client,
}

impl KubeRuleStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<PrometheusRule> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn post_params() -> PostParams {
        PostParams {
            field_manager: Some(OPERATOR_NAME.to_string()),
            ..Default::default()
        }
    }
}

fn namespace_of(rule: &PrometheusRule) -> Result<String, StoreError> {
    rule.namespace().ok_or_else(|| {
        StoreError::InvalidMutation(format!("PrometheusRule {} has no namespace", rule.name_any()))
    })
}

#[async_trait]
impl RuleStore for KubeRuleStore {
    #[instrument(skip(self), fields(rule = %id))]
    async fn get(&self, id: &RuleIdentity) -> Result<Option<PrometheusRule>, StoreError> {
        let rule = self.api(id.namespace()).get_opt(id.name()).await?;
        debug!("PrometheusRule present: {}", rule.is_some());
        Ok(rule)
    }

    #[instrument(skip(self, rule), fields(rule = %rule.name_any()))]
    async fn create(&self, rule: &PrometheusRule) -> Result<PrometheusRule, StoreError> {
        let namespace = namespace_of(rule)?;
        let created = self
            .api(&namespace)
            .create(&Self::post_params(), rule)
            .await?;
        Ok(created)
    }

    #[instrument(skip(self, rule), fields(rule = %rule.name_any()))]
    async fn update(&self, rule: &PrometheusRule) -> Result<PrometheusRule, StoreError> {
        let namespace = namespace_of(rule)?;
        let updated = self
            .api(&namespace)
            .replace(&rule.name_any(), &Self::post_params(), rule)
            .await?;
        Ok(updated)
    }
}
