// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The emission pass. Runs once per finished build, on the host's thread:
//! build a client from the global settings, then publish each enabled
//! category that is actually available. Nothing in here can fail the
//! build; every skip and error becomes a line in the build log instead.

use crate::config::{GlobalConfig, NotifierConfig};
use crate::log::BuildLog;
use crate::registry::PluginRegistry;
use crate::result::BuildResultView;
use datadog_statsd_client::{new_client, MetricError, MetricsClient};
use std::time::SystemTime;
use tracing::debug;

/// One gauge as handed to the transport. The global prefix is not part of
/// the name; the client applies it on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSample {
    pub name: String,
    pub value: u64,
}

/// What a pass actually sent. The host ignores this; tests consume it.
#[derive(Debug, Default, Clone)]
pub struct EmissionReport {
    pub samples: Vec<MetricSample>,
}

impl EmissionReport {
    fn record(&mut self, name: String, value: u64) {
        self.samples.push(MetricSample { name, value });
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

pub struct StatsdNotifier {
    config: NotifierConfig,
}

impl StatsdNotifier {
    pub fn new(config: NotifierConfig) -> Self {
        StatsdNotifier { config }
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Publish everything enabled for this step. Always returns normally,
    /// whatever the state of the daemon, the companion plugins, or the
    /// build.
    pub fn perform(
        &self,
        global: &GlobalConfig,
        build: &BuildResultView,
        registry: &impl PluginRegistry,
        log: &BuildLog,
    ) -> EmissionReport {
        self.perform_at(global, build, registry, log, SystemTime::now())
    }

    fn perform_at(
        &self,
        global: &GlobalConfig,
        build: &BuildResultView,
        registry: &impl PluginRegistry,
        log: &BuildLog,
        now: SystemTime,
    ) -> EmissionReport {
        let mut report = EmissionReport::default();

        let handler_log = log.clone();
        let client = match new_client(&global.endpoint(), move |err: MetricError| {
            handler_log.line(format!("Error: {:?}", err.kind()));
            handler_log.line(err.to_string());
        }) {
            Ok(client) => client,
            Err(err) => {
                log.line("Error when creating StatsD client");
                log.line(err.to_string());
                return report;
            }
        };

        if self.config.send_checkstyle {
            self.handle_checkstyle(build, registry, &client, log, &mut report);
        }

        if self.config.send_pmd {
            self.handle_pmd(build, registry, &client, log, &mut report);
        }

        if self.config.send_junit {
            self.handle_junit(build, registry, &client, log, &mut report, now);
        }

        debug!("emission pass sent {} gauge(s)", report.samples.len());
        report
    }

    fn handle_checkstyle(
        &self,
        build: &BuildResultView,
        registry: &impl PluginRegistry,
        client: &MetricsClient,
        log: &BuildLog,
        report: &mut EmissionReport,
    ) {
        if !registry.is_checkstyle_installed() {
            log.line("Checkstyle metric can't be handled. Checkstyle plugin is not installed");
            return;
        }

        match build.checkstyle {
            Some(result) => {
                let name = format!("{}.{}", self.config.prefix(), self.config.checkstyle_prefix());
                client.gauge(&name, result.warnings);
                report.record(name, result.warnings);
            }
            None => log.line("Can not find checkstyle metrics to be sent to StatsD"),
        }
    }

    fn handle_pmd(
        &self,
        build: &BuildResultView,
        registry: &impl PluginRegistry,
        client: &MetricsClient,
        log: &BuildLog,
        report: &mut EmissionReport,
    ) {
        if !registry.is_pmd_installed() {
            log.line("PMD metric can't be handled. PMD plugin is not installed");
            return;
        }

        match build.pmd {
            Some(result) => {
                let name = format!("{}.{}", self.config.prefix(), self.config.pmd_prefix());
                client.gauge(&name, result.warnings);
                report.record(name, result.warnings);
            }
            None => log.line("Can not find pmd metrics to be sent to StatsD"),
        }
    }

    fn handle_junit(
        &self,
        build: &BuildResultView,
        registry: &impl PluginRegistry,
        client: &MetricsClient,
        log: &BuildLog,
        report: &mut EmissionReport,
        now: SystemTime,
    ) {
        if !registry.is_junit_installed() {
            log.line("Junit metric can't be handled. Junit plugin is not installed");
            return;
        }

        let summary = match build.junit {
            Some(summary) => summary,
            None => {
                log.line("Can not find Junit metrics to be sent to StatsD");
                return;
            }
        };

        // Elapsed wall clock up to this step, not the build's own recorded
        // duration.
        let duration = now
            .duration_since(build.started_at)
            .unwrap_or_default()
            .as_secs();

        let base = format!("{}.{}", self.config.prefix(), self.config.junit_prefix());
        let mut send = |suffix: &str, value: u64| {
            let name = format!("{base}.{suffix}");
            client.gauge(&name, value);
            report.record(name, value);
        };

        send("TotalTests", summary.total);
        send("FailedTests", summary.failed);
        send("SkippedTests", summary.skipped);
        send("BuildDuration", duration);
    }
}
