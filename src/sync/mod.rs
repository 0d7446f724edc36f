// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Periodic alert rule synchronization.

pub mod manager;

pub use manager::{ProductPhase, SyncManager};
