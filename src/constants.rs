// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Labels stamped on every managed PrometheusRule
pub mod labels {
    /// Marks a rule as owned by the installation
    pub const INTEGREATLY: &str = "integreatly";
    pub const INTEGREATLY_VALUE: &str = "yes";
    /// Default label selector the alert engine discovers rules with
    pub const DEFAULT_MONITORING_KEY: &str = "monitoring-key";
    pub const DEFAULT_MONITORING_VALUE: &str = "middleware";
}

/// Standard operating procedure links attached to alerts as `sop_url`
pub mod sop {
    pub const ENDPOINT_AVAILABLE_ALERT: &str =
        "https://github.com/RHCloudServices/integreatly-help/blob/master/sops/alerts/service_endpoint_down.asciidoc";
    pub const SLO_RHSSO_AVAILABILITY_ALERT: &str =
        "https://github.com/RHCloudServices/integreatly-help/blob/master/sops/alerts/rhsso_slo_availability.asciidoc";
}

/// The operator name used as field manager on writes
pub const OPERATOR_NAME: &str = "alertkeeper";

/// Attempts of the read-mutate-write cycle before a write conflict is terminal
pub const MAX_WRITE_ATTEMPTS: usize = 5;

/// Defaults for environment driven configuration
pub mod defaults {
    pub const NAMESPACE_PREFIX: &str = "redhat-rhmi-";
    pub const INSTALLATION_TYPE: &str = "managed";
    pub const SYNC_INTERVAL_SECS: u64 = 300;
}

/// CRD polling configuration
pub mod crd {
    pub const GROUP: &str = "monitoring.coreos.com";
    pub const VERSION: &str = "v1";
    pub const KIND: &str = "PrometheusRule";
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}
