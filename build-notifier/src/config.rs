// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Persisted configuration, in two scopes: one process-wide daemon endpoint
//! edited through the administrative form, and one per-step metric selection
//! set when the step is added to a job.

use datadog_statsd_client::StatsdEndpoint;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 8125;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to read or write the settings file: {0}")]
    Io(#[from] io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The StatsD daemon address and the prefix applied ahead of every metric
/// name, shared by all jobs in the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub host: String,
    pub port: u16,
    pub prefix: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        GlobalConfig {
            host: String::new(),
            port: DEFAULT_PORT,
            prefix: String::new(),
        }
    }
}

impl GlobalConfig {
    pub fn endpoint(&self) -> StatsdEndpoint {
        StatsdEndpoint {
            host: self.host.clone(),
            port: self.port,
            prefix: self.prefix.clone(),
        }
    }
}

/// Owns the persisted [`GlobalConfig`]: read once at startup, written back
/// on every successful mutation. Builds only ever see the loaded value.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: GlobalConfig,
}

impl ConfigStore {
    /// Loads the settings file at `path`. A file that does not exist yet
    /// yields the defaults; a file that exists but does not parse is an
    /// error the administrator has to resolve.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => GlobalConfig::default(),
            Err(err) => return Err(err.into()),
        };
        Ok(ConfigStore { path, config })
    }

    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The single administrative mutation entry point. The change is
    /// persisted before this returns.
    pub fn update(&mut self, apply: impl FnOnce(&mut GlobalConfig)) -> Result<(), ConfigError> {
        apply(&mut self.config);
        let bytes = serde_json::to_vec_pretty(&self.config)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

// Form-level checks for the administrative settings. Every field accepts
// any value as entered; a bad endpoint surfaces in the build log at
// emission time instead of at configuration time.
pub fn check_host(_host: &str) -> Result<(), ConfigError> {
    Ok(())
}

pub fn check_port(_port: &str) -> Result<(), ConfigError> {
    Ok(())
}

pub fn check_prefix(_prefix: &str) -> Result<(), ConfigError> {
    Ok(())
}

/// Per-step metric selection. The name fields are fixed when the step is
/// created; only the three send flags can be toggled afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifierConfig {
    prefix: String,
    checkstyle_prefix: String,
    pmd_prefix: String,
    junit_prefix: String,
    pub send_checkstyle: bool,
    pub send_pmd: bool,
    pub send_junit: bool,
}

impl NotifierConfig {
    pub fn new(
        prefix: impl Into<String>,
        send_checkstyle: bool,
        send_pmd: bool,
        send_junit: bool,
        checkstyle_prefix: impl Into<String>,
        pmd_prefix: impl Into<String>,
        junit_prefix: impl Into<String>,
    ) -> Self {
        NotifierConfig {
            prefix: prefix.into(),
            checkstyle_prefix: checkstyle_prefix.into(),
            pmd_prefix: pmd_prefix.into(),
            junit_prefix: junit_prefix.into(),
            send_checkstyle,
            send_pmd,
            send_junit,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn checkstyle_prefix(&self) -> &str {
        &self.checkstyle_prefix
    }

    pub fn pmd_prefix(&self) -> &str {
        &self.pmd_prefix
    }

    pub fn junit_prefix(&self) -> &str {
        &self.junit_prefix
    }
}
