// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Read-only view of one finished build, as handed over by the host. Each
//! section is present only if the corresponding analyzer ran.

use std::time::SystemTime;

/// Warning count reported by one of the static-analysis scanners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisResult {
    pub warnings: u64,
}

/// Totals reported by the test runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestSummary {
    pub total: u64,
    pub failed: u64,
    pub skipped: u64,
}

#[derive(Debug, Clone)]
pub struct BuildResultView {
    /// When the build started. Build duration is measured against this at
    /// emission time, not taken from the build's own recorded duration.
    pub started_at: SystemTime,
    pub checkstyle: Option<AnalysisResult>,
    pub pmd: Option<AnalysisResult>,
    pub junit: Option<TestSummary>,
}

impl BuildResultView {
    /// A view with no analyzer results yet.
    pub fn new(started_at: SystemTime) -> Self {
        BuildResultView {
            started_at,
            checkstyle: None,
            pmd: None,
            junit: None,
        }
    }
}
