// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Clarity", "claritybudget"));

pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_AI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_AI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Each profile owns its own database file.
    pub profile: String,
    pub data_dir: Option<PathBuf>,
    pub ai: AiConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Config {
            profile: get("CLARITY_PROFILE").unwrap_or_else(|| DEFAULT_PROFILE.to_string()),
            data_dir: get("CLARITY_DATA_DIR").map(PathBuf::from),
            ai: AiConfig {
                api_key: get("CLARITY_AI_API_KEY").or_else(|| get("GEMINI_API_KEY")),
                model: get("CLARITY_AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
                base_url: get("CLARITY_AI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_AI_BASE_URL.to_string()),
            },
        }
    }

    pub fn with_profile(mut self, profile: Option<&str>) -> Self {
        if let Some(p) = profile.map(str::trim).filter(|p| !p.is_empty()) {
            self.profile = p.to_string();
        }
        self
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        let dir = match &self.data_dir {
            Some(d) => d.clone(),
            None => ProjectDirs::from(APP.0, APP.1, APP.2)
                .context("Could not determine platform-specific data dir")?
                .data_dir()
                .to_path_buf(),
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data dir {}", dir.display()))?;
        Ok(dir)
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        validate_profile(&self.profile)?;
        Ok(self.data_dir()?.join(format!("{}.sqlite", self.profile)))
    }
}

fn validate_profile(profile: &str) -> Result<()> {
    let ok = !profile.is_empty()
        && profile
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !ok {
        bail!(
            "Invalid profile '{}': use letters, digits, '-' or '_'",
            profile
        );
    }
    Ok(())
}
