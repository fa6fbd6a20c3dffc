// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use datadog_build_notifier::config::{GlobalConfig, NotifierConfig};
use datadog_build_notifier::log::BuildLog;
use datadog_build_notifier::notifier::StatsdNotifier;
use datadog_build_notifier::registry::{InstalledPlugins, CHECKSTYLE, JUNIT, PMD};
use datadog_build_notifier::result::{AnalysisResult, BuildResultView, TestSummary};
use std::net::UdpSocket;
use std::time::{Duration, SystemTime};

fn read(socket: &UdpSocket) -> String {
    let mut buf = [0; 100];
    let len = socket.recv(&mut buf).expect("No data");
    String::from_utf8_lossy(&buf[..len]).to_string()
}

#[test]
#[cfg_attr(miri, ignore)]
fn full_pass_reaches_the_daemon_in_order() {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("failed to bind host socket");
    let _ = socket.set_read_timeout(Some(Duration::from_millis(500)));
    let addr = socket.local_addr().unwrap();

    let global = GlobalConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        prefix: "ci".to_string(),
    };
    let notifier = StatsdNotifier::new(NotifierConfig::new(
        "jenkins",
        true,
        true,
        true,
        "checkstyle.warnings",
        "pmd.warnings",
        "junit",
    ));
    let registry = InstalledPlugins::new([CHECKSTYLE, PMD, JUNIT]);
    let (log, captured) = BuildLog::capture();

    let mut build = BuildResultView::new(SystemTime::now() - Duration::from_secs(5));
    build.checkstyle = Some(AnalysisResult { warnings: 3 });
    build.pmd = Some(AnalysisResult { warnings: 7 });
    build.junit = Some(TestSummary {
        total: 10,
        failed: 2,
        skipped: 1,
    });

    let report = notifier.perform(&global, &build, &registry, &log);
    assert_eq!(6, report.samples.len());
    assert!(captured.lines().is_empty());

    // The global prefix arrives applied by the transport, ahead of the
    // step prefix.
    assert_eq!("ci.jenkins.checkstyle.warnings:3|g", read(&socket));
    assert_eq!("ci.jenkins.pmd.warnings:7|g", read(&socket));
    assert_eq!("ci.jenkins.junit.TotalTests:10|g", read(&socket));
    assert_eq!("ci.jenkins.junit.FailedTests:2|g", read(&socket));
    assert_eq!("ci.jenkins.junit.SkippedTests:1|g", read(&socket));
    assert_eq!("ci.jenkins.junit.BuildDuration:5|g", read(&socket));
}

#[test]
#[cfg_attr(miri, ignore)]
fn skipped_categories_send_no_datagrams() {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("failed to bind host socket");
    let _ = socket.set_read_timeout(Some(Duration::from_millis(200)));
    let addr = socket.local_addr().unwrap();

    let global = GlobalConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        prefix: String::new(),
    };
    // Checkstyle disabled, PMD result absent, JUnit plugin missing: one
    // datagram total would already be a bug.
    let notifier = StatsdNotifier::new(NotifierConfig::new(
        "jenkins", false, true, true, "cs", "pmd", "junit",
    ));
    let registry = InstalledPlugins::new([CHECKSTYLE, PMD]);
    let (log, captured) = BuildLog::capture();

    let mut build = BuildResultView::new(SystemTime::now());
    build.checkstyle = Some(AnalysisResult { warnings: 3 });

    let report = notifier.perform(&global, &build, &registry, &log);

    assert!(report.is_empty());
    assert!(captured.contains("Can not find pmd metrics to be sent to StatsD"));
    assert!(captured.contains("Junit metric can't be handled. Junit plugin is not installed"));
    assert!(socket.recv(&mut [0; 100]).is_err());
}
