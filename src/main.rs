// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use alertkeeper::config::Config;
use alertkeeper::kubernetes::wait_for_prometheus_rule_crd;
use alertkeeper::products::alert_reconcilers;
use alertkeeper::reconcilers::{AlertReconciler, DriftReconciler};
use alertkeeper::store::{KubeRuleStore, RuleStore};
use alertkeeper::sync::SyncManager;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let reconcilers = alert_reconcilers(&config);

    if std::env::args().nth(1).as_deref() == Some("render") {
        return render(&config, &reconcilers);
    }

    info!("Starting alertkeeper operator");
    info!(
        "Configuration loaded: namespace_prefix={}, installation_type={}",
        config.namespace_prefix, config.installation_type
    );

    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    info!("Waiting for PrometheusRule CRD to become available...");
    wait_for_prometheus_rule_crd(&client).await?;

    let store: Arc<dyn RuleStore> = Arc::new(KubeRuleStore::new(client.clone()));
    let drift_reconciler = DriftReconciler::new(client, store.clone(), &config, &reconcilers)?;
    let sync_manager = SyncManager::new(store, &config, reconcilers);

    info!("Starting reconcilers...");

    tokio::select! {
        result = async { tokio::try_join!(sync_manager.run(), drift_reconciler.run()) } => {
            result?;
            warn!("All reconcilers stopped unexpectedly");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, stopping");
        }
    }

    Ok(())
}

/// Print the desired PrometheusRules as a YAML stream without contacting a cluster
fn render(config: &Config, reconcilers: &[AlertReconciler]) -> Result<()> {
    let labels = config.rule_labels();
    for reconciler in reconcilers {
        for rule in reconciler.desired_rules(&labels)? {
            println!("---");
            print!("{}", serde_yaml::to_string(&rule)?);
        }
    }
    Ok(())
}
