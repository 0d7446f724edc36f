// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! RHSSO (Keycloak) endpoint and SLO availability alerts

use super::rules::{error_budget_burn_expr, BurnWindow, EndpointAlert};
use crate::config::{Config, Product};
use crate::constants::sop;
use crate::reconcilers::{AlertConfiguration, AlertReconciler};
use crate::types::Rule;

pub const ENDPOINT_ALERTS_NAME: &str = "ksm-endpoint-alerts";
pub const SLO_AVAILABILITY_ALERTS_NAME: &str = "rhsso-slo-availability-alerts";

const ENDPOINT_ALERTS: [EndpointAlert; 2] = [
    EndpointAlert::new("RHMIRhssoKeycloakServiceEndpointDown", "keycloak"),
    EndpointAlert::new("RHMIRhssoKeycloakDiscoveryServiceEndpointDown", "keycloak-discovery"),
];

const OPERATOR_ENDPOINT_ALERTS: [EndpointAlert; 2] = [
    EndpointAlert::new(
        "RHMIRhssoKeycloakOperatorRhmiRegistryCsServiceEndpointDown",
        "rhmi-registry-cs",
    ),
    EndpointAlert::new(
        "RHMIRhssoKeycloakOperatorMetricsServiceEndpointDown",
        "keycloak-operator-metrics",
    ),
];

const SLO_TARGET: f64 = 0.99;
const KEYCLOAK_ROUTE_REGEX: &str = "^keycloak.*";

const BURN_WINDOWS: [BurnWindow; 4] = [
    BurnWindow { short: "5m", long: "1h", factor: 14.40, for_duration: "2m" },
    BurnWindow { short: "30m", long: "6h", factor: 6.00, for_duration: "15m" },
    BurnWindow { short: "2h", long: "1d", factor: 3.00, for_duration: "1h" },
    BurnWindow { short: "6h", long: "3d", factor: 6.00, for_duration: "3h" },
];

fn warning_rules(alerts: &[EndpointAlert], namespace: &str, installation_name: &str) -> Vec<Rule> {
    alerts
        .iter()
        .map(|a| {
            a.to_rule(namespace)
                .label("severity", "warning")
                .label("product", installation_name)
        })
        .collect()
}

pub fn alert_reconciler(config: &Config) -> AlertReconciler {
    let product = config.product(Product::Rhsso);
    let installation_name = config.installation_type.installation_name();

    AlertReconciler {
        product_name: Product::Rhsso.as_str().to_string(),
        alerts: vec![
            AlertConfiguration {
                alert_name: ENDPOINT_ALERTS_NAME.to_string(),
                namespace: product.namespace().to_string(),
                group_name: "rhsso-endpoint.rules".to_string(),
                rules: warning_rules(&ENDPOINT_ALERTS, product.namespace(), installation_name),
            },
            AlertConfiguration {
                alert_name: ENDPOINT_ALERTS_NAME.to_string(),
                namespace: product.operator_namespace().to_string(),
                group_name: "rhsso-operator-endpoint.rules".to_string(),
                rules: warning_rules(
                    &OPERATOR_ENDPOINT_ALERTS,
                    product.operator_namespace(),
                    installation_name,
                ),
            },
            AlertConfiguration {
                alert_name: SLO_AVAILABILITY_ALERTS_NAME.to_string(),
                namespace: product.operator_namespace().to_string(),
                group_name: "rhsso-slo-availability.rules".to_string(),
                rules: BURN_WINDOWS
                    .iter()
                    .map(|w| availability_burn_rule(w, product.namespace(), installation_name))
                    .collect(),
            },
        ],
    }
}

/// SLO error-budget burn alert over the Keycloak routes of `namespace`
fn availability_burn_rule(window: &BurnWindow, namespace: &str, installation_name: &str) -> Rule {
    Rule::alert(
        format!(
            "{}RhssoAvailability{}to{}ErrorBudgetBurn",
            installation_name.to_uppercase(),
            window.short,
            window.long
        ),
        error_budget_burn_expr(KEYCLOAK_ROUTE_REGEX, namespace, window, SLO_TARGET),
    )
    .for_duration(window.for_duration)
    .annotation("sop_url", sop::SLO_RHSSO_AVAILABILITY_ALERT)
    .annotation(
        "message",
        format!(
            "High {} and {} error budget burn for RHSSO",
            window.short, window.long
        ),
    )
    .label("severity", "warning")
    .label("route", "keycloak")
    .label("service", "keycloak")
    .label("product", installation_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InstallationType;

    fn alert_names(config: &AlertConfiguration) -> Vec<&str> {
        config
            .rules
            .iter()
            .filter_map(|r| r.alert.as_deref())
            .collect()
    }

    #[test]
    fn test_rhsso_alert_identities() {
        let reconciler = alert_reconciler(&Config::default());

        assert_eq!(reconciler.product_name, "rhsso");
        let identities: Vec<String> = reconciler
            .alerts
            .iter()
            .map(|a| a.identity().unwrap().to_string())
            .collect();
        assert_eq!(
            identities,
            vec![
                "redhat-rhmi-rhsso/ksm-endpoint-alerts",
                "redhat-rhmi-rhsso-operator/ksm-endpoint-alerts",
                "redhat-rhmi-rhsso-operator/rhsso-slo-availability-alerts",
            ]
        );
    }

    #[test]
    fn test_rhsso_endpoint_alerts() {
        let reconciler = alert_reconciler(&Config::default());
        let endpoints = &reconciler.alerts[0];

        assert_eq!(endpoints.group_name, "rhsso-endpoint.rules");
        assert_eq!(
            alert_names(endpoints),
            vec![
                "RHMIRhssoKeycloakServiceEndpointDown",
                "RHMIRhssoKeycloakDiscoveryServiceEndpointDown"
            ]
        );
        let rule = &endpoints.rules[1];
        assert!(rule
            .expr
            .contains("endpoint='keycloak-discovery', namespace='redhat-rhmi-rhsso'"));
        assert_eq!(rule.labels.get("severity").map(String::as_str), Some("warning"));
        assert_eq!(rule.labels.get("product").map(String::as_str), Some("rhmi"));
    }

    #[test]
    fn test_rhsso_operator_alerts_use_operator_namespace() {
        let reconciler = alert_reconciler(&Config::default());
        let operator = &reconciler.alerts[1];

        assert!(operator
            .rules
            .iter()
            .all(|r| r.expr.contains("namespace='redhat-rhmi-rhsso-operator'")));
    }

    #[test]
    fn test_rhsso_slo_alerts() {
        let config = Config {
            installation_type: InstallationType::ManagedApi,
            ..Config::default()
        };
        let reconciler = alert_reconciler(&config);
        let slo = &reconciler.alerts[2];

        assert_eq!(
            alert_names(slo),
            vec![
                "RHOAMRhssoAvailability5mto1hErrorBudgetBurn",
                "RHOAMRhssoAvailability30mto6hErrorBudgetBurn",
                "RHOAMRhssoAvailability2hto1dErrorBudgetBurn",
                "RHOAMRhssoAvailability6hto3dErrorBudgetBurn",
            ]
        );
        let durations: Vec<&str> = slo
            .rules
            .iter()
            .filter_map(|r| r.for_duration.as_deref())
            .collect();
        assert_eq!(durations, vec!["2m", "15m", "1h", "3h"]);

        let first = &slo.rules[0];
        assert!(first.expr.contains("exported_namespace='redhat-rhmi-rhsso'"));
        assert!(first.expr.contains("(14.40 * (1-0.99000))"));
        assert_eq!(first.labels.get("product").map(String::as_str), Some("rhoam"));
        assert_eq!(first.labels.get("route").map(String::as_str), Some("keycloak"));
        assert_eq!(
            first.annotations.get("message").map(String::as_str),
            Some("High 5m and 1h error budget burn for RHSSO")
        );
    }
}
