// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! 3scale endpoint availability alerts

use super::rules::{EndpointAlert, EndpointMessage};
use crate::config::{Config, Product};
use crate::reconcilers::{AlertConfiguration, AlertReconciler};
use crate::types::Rule;

pub const ENDPOINT_ALERTS_NAME: &str = "ksm-endpoint-alerts";

const ENDPOINT_ALERTS: [EndpointAlert; 10] = [
    EndpointAlert::new("RHMIThreeScaleApicastProductionServiceEndpointDown", "apicast-production").unscoped(),
    EndpointAlert::new("RHMIThreeScaleApicastStagingServiceEndpointDown", "apicast-staging").unscoped(),
    EndpointAlert::new("RHMIThreeScaleBackendListenerServiceEndpointDown", "backend-listener").unscoped(),
    EndpointAlert::new("RHMIThreeScaleSystemDeveloperServiceEndpointDown", "system-developer").unscoped(),
    EndpointAlert::new("RHMIThreeScaleSystemMasterServiceEndpointDown", "system-master").unscoped(),
    EndpointAlert::new("RHMIThreeScaleSystemMemcacheServiceEndpointDown", "system-memcache").unscoped(),
    EndpointAlert::new("RHMIThreeScaleSystemProviderServiceEndpointDown", "system-provider")
        .unscoped()
        .message(EndpointMessage::NoneAvailable),
    EndpointAlert::new("RHMIThreeScaleSystemSphinxServiceEndpointDown", "system-sphinx")
        .unscoped()
        .message(EndpointMessage::NoneAvailable),
    EndpointAlert::new("RHMIThreeScaleZyncServiceEndpointDown", "zync")
        .unscoped()
        .message(EndpointMessage::NoneAvailable),
    EndpointAlert::new("RHMIThreeScaleZyncDatabaseServiceEndpointDown", "zync-database")
        .unscoped()
        .message(EndpointMessage::NoneAvailable),
];

const OPERATOR_ENDPOINT_ALERTS: [EndpointAlert; 2] = [
    EndpointAlert::new("RHMIThreeScaleOperatorRhmiRegistryCsServiceEndpointDown", "rhmi-registry-cs"),
    EndpointAlert::new("RHMIThreeScaleOperatorServiceEndpointDown", "threescale-operator").unscoped(),
];

fn critical_rules(alerts: &[EndpointAlert], namespace: &str) -> Vec<Rule> {
    alerts
        .iter()
        .map(|a| a.to_rule(namespace).label("severity", "critical"))
        .collect()
}

pub fn alert_reconciler(config: &Config) -> AlertReconciler {
    let product = config.product(Product::ThreeScale);

    AlertReconciler {
        product_name: Product::ThreeScale.as_str().to_string(),
        alerts: vec![
            AlertConfiguration {
                alert_name: ENDPOINT_ALERTS_NAME.to_string(),
                namespace: product.namespace().to_string(),
                group_name: "3scale-endpoint.rules".to_string(),
                rules: critical_rules(&ENDPOINT_ALERTS, product.namespace()),
            },
            AlertConfiguration {
                alert_name: ENDPOINT_ALERTS_NAME.to_string(),
                namespace: product.operator_namespace().to_string(),
                group_name: "3scale-operator-endpoint.rules".to_string(),
                rules: critical_rules(&OPERATOR_ENDPOINT_ALERTS, product.operator_namespace()),
            },
        ],
    }
}
