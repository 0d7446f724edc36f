// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Alert tables of the managed products.

pub mod rhsso;
pub mod rules;
pub mod threescale;

use crate::config::Config;
use crate::reconcilers::AlertReconciler;

/// Alert reconcilers for every managed product
pub fn alert_reconcilers(config: &Config) -> Vec<AlertReconciler> {
    vec![
        rhsso::alert_reconciler(config),
        threescale::alert_reconciler(config),
    ]
}
