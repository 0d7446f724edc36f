// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resource and result types shared by the store and the reconcilers.

pub mod identity;
pub mod phase;
pub mod prometheus_rule;

pub use identity::RuleIdentity;
pub use phase::{OperationResult, StatusPhase};
pub use prometheus_rule::{PrometheusRule, PrometheusRuleSpec, Rule, RuleGroup};
