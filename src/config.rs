// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Planner configuration file support.
//!
//! ```toml
//! [padding]
//! before = 10
//! after = 15
//!
//! [padding.prayers.fajr]
//! before = 5
//! after = 30
//!
//! [slots]
//! overnight = false
//! ```
//!
//! Every key is optional.  Padding values are stored as configured; the
//! effective floors are applied when slots are derived.

use crate::clock_time::MINUTES_PER_DAY;
use crate::error::{PlanError, PlanResult};
use crate::padding::{PaddingConfig, PrayerPadding};
use crate::slots::SlotRules;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up by [`PlannerConfig::from_default_location`].
pub const CONFIG_FILE_NAME: &str = "prayerplan.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub padding: PaddingConfig,
    #[serde(default)]
    pub slots: SlotRules,
}

impl PlannerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> PlanResult<Self> {
        let config: PlannerConfig = toml::from_str(content)
            .map_err(|e| PlanError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load planner configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> PlanResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        log::debug!("Loaded planner config from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Load [`CONFIG_FILE_NAME`] from the current or parent directory.
    pub fn from_default_location() -> PlanResult<Self> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(PlanError::Config(format!(
            "No {} found in standard locations",
            CONFIG_FILE_NAME
        )))
    }

    pub fn to_toml_string(&self) -> PlanResult<String> {
        toml::to_string(self).map_err(|e| PlanError::Config(format!("Failed to write config: {}", e)))
    }

    /// Reject paddings longer than a day in either direction.
    pub fn validate(&self) -> PlanResult<()> {
        let global = self.padding.global_padding();
        check_padding("padding", &global)?;
        for (prayer, padding) in &self.padding.prayers {
            check_padding(&format!("padding.prayers.{}", prayer.key()), padding)?;
        }
        Ok(())
    }
}

fn check_padding(section: &str, padding: &PrayerPadding) -> PlanResult<()> {
    for (side, value) in [("before", padding.before), ("after", padding.after)] {
        if let Some(v) = value {
            if v.abs() > MINUTES_PER_DAY {
                return Err(PlanError::Config(format!(
                    "{}.{} = {} exceeds one day",
                    section, side, v
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prayer::Prayer;

    #[test]
    fn full_document() {
        let cfg = PlannerConfig::from_toml_str(
            r#"
            [padding]
            before = 10
            after = 15

            [padding.prayers.fajr]
            before = 5
            after = 30

            [slots]
            overnight = true
            "#,
        )
        .unwrap();

        assert_eq!(cfg.padding.real_before(), 10);
        assert_eq!(cfg.padding.effective_after(), 20);
        assert_eq!(cfg.padding.for_prayer(Prayer::Fajr), PrayerPadding::new(5, 30));
        assert!(cfg.slots.overnight);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = PlannerConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, PlannerConfig::default());
        assert_eq!(cfg.padding.effective_before(), 0);
        assert!(!cfg.slots.overnight);
    }

    #[test]
    fn unknown_prayer_is_rejected() {
        let err = PlannerConfig::from_toml_str("[padding.prayers.witr]\nbefore = 5\n").unwrap_err();
        assert!(matches!(err, PlanError::Config(_)));
    }

    #[test]
    fn oversized_padding_is_rejected() {
        let err = PlannerConfig::from_toml_str("[padding]\nafter = 2000\n").unwrap_err();
        assert!(err.to_string().contains("padding.after"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PlannerConfig::from_file("/nonexistent/prayerplan.toml").unwrap_err();
        assert!(matches!(err, PlanError::Io(_)));
    }

    #[test]
    fn toml_round_trip() {
        let cfg = PlannerConfig {
            padding: PaddingConfig::global(5, 25).with_prayer(Prayer::Icha, PrayerPadding::new(0, 40)),
            slots: SlotRules { overnight: true },
        };
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(PlannerConfig::from_toml_str(&text).unwrap(), cfg);
    }
}
