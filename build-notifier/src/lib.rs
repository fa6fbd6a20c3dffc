// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Publishes finished-build analysis and test results to StatsD.
//!
//! Once the host orchestrator declares a build finished, the notifier reads
//! the warning counts and test totals its companion analyzers produced and
//! forwards them as gauges. Delivery is best-effort: every failure ends up
//! in the build's text log and none of it can fail the build itself.

pub mod config;
pub mod log;
pub mod notifier;
pub mod registry;
pub mod result;
