// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{AlertKeeperError, Result};
use std::fmt;

/// Name and namespace of a stored rule resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleIdentity {
    name: String,
    namespace: String,
}

impl RuleIdentity {
    /// Both parts must be non-empty; character set validation is left to the API server
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let namespace = namespace.into();

        if name.is_empty() {
            return Err(AlertKeeperError::InvalidIdentity(format!(
                "empty name in namespace '{}'",
                namespace
            )));
        }
        if namespace.is_empty() {
            return Err(AlertKeeperError::InvalidIdentity(format!(
                "empty namespace for '{}'",
                name
            )));
        }

        Ok(Self { name, namespace })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl fmt::Display for RuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
