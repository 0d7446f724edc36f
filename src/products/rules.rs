// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Builders for the recurring alert shapes used by the product tables.

use crate::constants::sop;
use crate::types::Rule;

/// How an endpoint alert phrases its message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointMessage {
    /// "No ... endpoints in namespace X. Expected at least 1."
    ExpectedAtLeastOne,
    /// "No endpoints available for the ... service in the X namespace"
    NoneAvailable,
}

/// A `kube_endpoint_address_available` alert for one service endpoint
#[derive(Debug, Clone, Copy)]
pub struct EndpointAlert {
    pub alert: &'static str,
    pub endpoint: &'static str,
    /// Restrict the expression to the target namespace
    pub scoped: bool,
    pub message: EndpointMessage,
}

impl EndpointAlert {
    pub const fn new(alert: &'static str, endpoint: &'static str) -> Self {
        Self {
            alert,
            endpoint,
            scoped: true,
            message: EndpointMessage::ExpectedAtLeastOne,
        }
    }

    pub const fn unscoped(self) -> Self {
        Self {
            scoped: false,
            ..self
        }
    }

    pub const fn message(self, message: EndpointMessage) -> Self {
        Self { message, ..self }
    }

    pub fn to_rule(&self, namespace: &str) -> Rule {
        Rule::alert(self.alert, endpoint_expr(self.endpoint, self.scoped.then_some(namespace)))
            .for_duration("5m")
            .annotation("sop_url", sop::ENDPOINT_AVAILABLE_ALERT)
            .annotation("message", endpoint_message(self.message, namespace))
    }
}

pub fn endpoint_expr(endpoint: &str, namespace: Option<&str>) -> String {
    let selector = match namespace {
        Some(ns) => format!("endpoint='{}', namespace='{}'", endpoint, ns),
        None => format!("endpoint='{}'", endpoint),
    };
    format!(
        "kube_endpoint_address_available{{{}}} * on (namespace) group_left kube_namespace_labels{{label_monitoring_key='middleware'}} < 1",
        selector
    )
}

fn endpoint_message(message: EndpointMessage, namespace: &str) -> String {
    match message {
        EndpointMessage::ExpectedAtLeastOne => format!(
            "No {{{{  $labels.endpoint  }}}} endpoints in namespace {}. Expected at least 1.",
            namespace
        ),
        EndpointMessage::NoneAvailable => format!(
            "No endpoints available for the {{{{  $labels.endpoint  }}}} service in the {} namespace",
            namespace
        ),
    }
}

/// Short and long evaluation windows of a multi-window burn-rate alert
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurnWindow {
    pub short: &'static str,
    pub long: &'static str,
    pub factor: f64,
    pub for_duration: &'static str,
}

/// Error ratio of HAProxy backend responses for routes matching `route_regex`
fn error_ratio(route_regex: &str, namespace: &str, window: &str) -> String {
    format!(
        "sum(sum(rate(haproxy_backend_http_responses_total{{route=~\"{route}\", exported_namespace='{ns}', code=\"5xx\"}}[{w}])) \
         / sum(rate(haproxy_backend_http_responses_total{{route=~\"{route}\", exported_namespace='{ns}'}}[{w}])))",
        route = route_regex,
        ns = namespace,
        w = window
    )
}

/// Both windows must exceed `factor` times the error budget for the alert to fire
pub fn error_budget_burn_expr(
    route_regex: &str,
    namespace: &str,
    window: &BurnWindow,
    slo_target: f64,
) -> String {
    let threshold = format!("({:.2} * (1-{:.5}))", window.factor, slo_target);
    format!(
        "{short} > {threshold} and {long} > {threshold}",
        short = error_ratio(route_regex, namespace, window.short),
        long = error_ratio(route_regex, namespace, window.long),
        threshold = threshold
    )
}
