// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::CustomResource;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Fields of the resource this operator does not model.
///
/// They are kept on read so that a stored object carrying them never compares
/// equal to a desired object without them.
pub type UnmodeledFields = BTreeMap<String, Value>;

/// Subset of the prometheus-operator `PrometheusRule` resource that this operator manages.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[kube(
    group = "monitoring.coreos.com",
    version = "v1",
    kind = "PrometheusRule",
    plural = "prometheusrules"
)]
#[kube(namespaced)]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct PrometheusRuleSpec {
    #[serde(default)]
    pub groups: Vec<RuleGroup>,
    #[serde(flatten)]
    pub extra: UnmodeledFields,
}

impl PrometheusRuleSpec {
    pub fn new(groups: Vec<RuleGroup>) -> Self {
        Self {
            groups,
            extra: UnmodeledFields::new(),
        }
    }
}

/// An ordered set of rules evaluated together
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuleGroup {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    /// e.g. `limit`, `partial_response_strategy`
    #[serde(flatten)]
    pub extra: UnmodeledFields,
}

impl RuleGroup {
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            interval: None,
            rules,
            extra: UnmodeledFields::new(),
        }
    }
}

/// A single alerting (or recording) rule.
///
/// `expr` and annotation values are opaque to this operator; template
/// placeholders such as `{{ $labels.endpoint }}` are resolved by the alert engine.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,
    /// Stored as int-or-string by the API; integers are read back as their decimal text
    #[serde(deserialize_with = "expr_from_int_or_string")]
    pub expr: String,
    #[serde(rename = "for", default, skip_serializing_if = "Option::is_none")]
    pub for_duration: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    /// e.g. `keep_firing_for`
    #[serde(flatten)]
    pub extra: UnmodeledFields,
}

fn expr_from_int_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(n) => n.to_string(),
        IntOrString::String(s) => s,
    })
}

impl Rule {
    /// Start an alerting rule with the given name and expression
    pub fn alert(name: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            alert: Some(name.into()),
            expr: expr.into(),
            ..Default::default()
        }
    }

    pub fn for_duration(mut self, duration: impl Into<String>) -> Self {
        self.for_duration = Some(duration.into());
        self
    }

    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }
}
