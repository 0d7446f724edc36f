// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Create-or-update of a single PrometheusRule with outcome classification.

use crate::constants::MAX_WRITE_ATTEMPTS;
use crate::error::StoreError;
use crate::store::RuleStore;
use crate::types::{OperationResult, PrometheusRule, PrometheusRuleSpec, RuleIdentity};
use kube::ResourceExt;
use tracing::{debug, instrument};

/// Fetch the rule identified by `id`, or start from an empty shell, apply `mutate`
/// and persist the result if anything changed.
///
/// `mutate` runs once per attempt and must only touch the object it is handed.
/// Write conflicts restart the whole read-mutate-write cycle, up to
/// [`MAX_WRITE_ATTEMPTS`] times.
#[instrument(skip(store, mutate), fields(rule = %id))]
pub async fn create_or_update<S, F>(
    store: &S,
    id: &RuleIdentity,
    mut mutate: F,
) -> Result<OperationResult, StoreError>
where
    S: RuleStore + ?Sized,
    F: FnMut(&mut PrometheusRule) + Send,
{
    let mut attempt = 1;
    loop {
        match try_create_or_update(store, id, &mut mutate).await {
            Err(StoreError::Conflict(reason)) if attempt < MAX_WRITE_ATTEMPTS => {
                debug!(
                    "Write conflict on attempt {}/{}: {}, retrying",
                    attempt, MAX_WRITE_ATTEMPTS, reason
                );
                attempt += 1;
            }
            result => return result,
        }
    }
}

async fn try_create_or_update<S, F>(
    store: &S,
    id: &RuleIdentity,
    mutate: &mut F,
) -> Result<OperationResult, StoreError>
where
    S: RuleStore + ?Sized,
    F: FnMut(&mut PrometheusRule) + Send,
{
    let Some(existing) = store.get(id).await? else {
        let mut rule = PrometheusRule::new(id.name(), PrometheusRuleSpec::default());
        rule.metadata.namespace = Some(id.namespace().to_string());
        mutate(&mut rule);
        ensure_identity(id, &rule)?;

        store.create(&rule).await?;
        return Ok(OperationResult::Created);
    };

    let mut desired = existing.clone();
    mutate(&mut desired);
    ensure_identity(id, &desired)?;

    if desired == existing {
        return Ok(OperationResult::Unchanged);
    }

    store.update(&desired).await?;
    Ok(OperationResult::Updated)
}

fn ensure_identity(id: &RuleIdentity, rule: &PrometheusRule) -> Result<(), StoreError> {
    let name = rule.name_any();
    let namespace = rule.namespace().unwrap_or_default();
    if name != id.name() || namespace != id.namespace() {
        return Err(StoreError::InvalidMutation(format!(
            "expected {}, mutator produced {}/{}",
            id, namespace, name
        )));
    }
    Ok(())
}
