// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Reconcilers that converge PrometheusRule resources to their desired state.

pub mod alerts;
pub mod drift;
pub mod upsert;

pub use alerts::{reconcile_alert_rule, AlertConfiguration, AlertReconciler};
pub use drift::{DesiredState, DriftReconciler};
pub use upsert::create_or_update;
