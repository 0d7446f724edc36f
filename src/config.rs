// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{defaults, labels};
use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Flavour of the installation the alerts belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallationType {
    Managed,
    Workshop,
    SelfManaged,
    ManagedApi,
}

impl InstallationType {
    /// Short installation name used in alert names and `product` labels
    pub fn installation_name(&self) -> &'static str {
        match self {
            InstallationType::ManagedApi => "rhoam",
            _ => "rhmi",
        }
    }
}

impl FromStr for InstallationType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "managed" => Ok(InstallationType::Managed),
            "workshop" => Ok(InstallationType::Workshop),
            "self-managed" => Ok(InstallationType::SelfManaged),
            "managed-api" => Ok(InstallationType::ManagedApi),
            other => bail!("unknown installation type '{}'", other),
        }
    }
}

impl fmt::Display for InstallationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstallationType::Managed => "managed",
            InstallationType::Workshop => "workshop",
            InstallationType::SelfManaged => "self-managed",
            InstallationType::ManagedApi => "managed-api",
        };
        write!(f, "{}", s)
    }
}

/// Managed products that own alert rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Product {
    Rhsso,
    ThreeScale,
}

impl Product {
    pub fn as_str(&self) -> &'static str {
        match self {
            Product::Rhsso => "rhsso",
            Product::ThreeScale => "3scale",
        }
    }
}

/// Namespaces of a single product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductConfig {
    namespace: String,
    operator_namespace: String,
}

impl ProductConfig {
    pub fn new(namespace: impl Into<String>, operator_namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            operator_namespace: operator_namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn operator_namespace(&self) -> &str {
        &self.operator_namespace
    }
}

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix of every product namespace, e.g. `redhat-rhmi-`
    pub namespace_prefix: String,
    pub installation_type: InstallationType,
    /// Label selector pair the alert engine discovers rules with
    pub monitoring_label_key: String,
    pub monitoring_label_value: String,
    pub sync_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace_prefix: defaults::NAMESPACE_PREFIX.to_string(),
            installation_type: InstallationType::Managed,
            monitoring_label_key: labels::DEFAULT_MONITORING_KEY.to_string(),
            monitoring_label_value: labels::DEFAULT_MONITORING_VALUE.to_string(),
            sync_interval: Duration::from_secs(defaults::SYNC_INTERVAL_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let namespace_prefix =
            env::var("NAMESPACE_PREFIX").unwrap_or_else(|_| defaults::NAMESPACE_PREFIX.to_string());

        let installation_type = env::var("INSTALLATION_TYPE")
            .unwrap_or_else(|_| defaults::INSTALLATION_TYPE.to_string())
            .parse::<InstallationType>()
            .context("INSTALLATION_TYPE is invalid")?;

        let monitoring_label_key = env::var("MONITORING_LABEL_KEY")
            .unwrap_or_else(|_| labels::DEFAULT_MONITORING_KEY.to_string());
        let monitoring_label_value = env::var("MONITORING_LABEL_VALUE")
            .unwrap_or_else(|_| labels::DEFAULT_MONITORING_VALUE.to_string());

        let sync_interval_secs: u64 = match env::var("SYNC_INTERVAL_SECS") {
            Ok(v) => v
                .parse::<u64>()
                .with_context(|| format!("SYNC_INTERVAL_SECS '{}' is not a number", v))?,
            Err(_) => defaults::SYNC_INTERVAL_SECS,
        };
        if sync_interval_secs == 0 {
            bail!("SYNC_INTERVAL_SECS must be greater than zero");
        }

        Ok(Config {
            namespace_prefix,
            installation_type,
            monitoring_label_key,
            monitoring_label_value,
            sync_interval: Duration::from_secs(sync_interval_secs),
        })
    }

    pub fn product(&self, product: Product) -> ProductConfig {
        let namespace = format!("{}{}", self.namespace_prefix, product.as_str());
        let operator_namespace = format!("{}-operator", namespace);
        ProductConfig::new(namespace, operator_namespace)
    }

    /// Labels every managed rule carries so the alert engine picks it up
    pub fn rule_labels(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (labels::INTEGREATLY.to_string(), labels::INTEGREATLY_VALUE.to_string()),
            (
                self.monitoring_label_key.clone(),
                self.monitoring_label_value.clone(),
            ),
        ])
    }
}
