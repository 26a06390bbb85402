// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `WatcherRule` (spec §3, §4.5).

use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scanner::ScannerId;

#[derive(Debug, Error)]
#[error("invalid watcher rule pattern '{pattern}': {source}")]
pub struct RulePatternError {
    pattern: String,
    #[source]
    source: regex::Error,
}

/// A rule mapping a workspace-relative path pattern to the scanners it
/// triggers. Multiple rules may match the same path; each produces its own
/// (possibly merged) batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherRule {
    #[serde(with = "regex_as_str")]
    pub pattern: Regex,
    pub scanners: BTreeSet<ScannerId>,
    pub debounce_ms: Option<u64>,
}

impl WatcherRule {
    pub fn new(
        pattern: &str,
        scanners: impl IntoIterator<Item = ScannerId>,
        debounce_ms: Option<u64>,
    ) -> Result<Self, RulePatternError> {
        let re = Regex::new(pattern)
            .map_err(|source| RulePatternError { pattern: pattern.to_string(), source })?;
        Ok(Self { pattern: re, scanners: scanners.into_iter().collect(), debounce_ms })
    }

    pub fn matches(&self, workspace_relative_path: &str) -> bool {
        self.pattern.is_match(workspace_relative_path)
    }

    /// The batch key for this rule: the sorted concatenation of its target
    /// scanners (spec §4.5). Two rules targeting `{A,B}` and `{A}` produce
    /// different keys even though both name `A` — this is intentional
    /// per spec §9's open question and must not be "improved" silently.
    pub fn batch_key(&self) -> String {
        self.scanners.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(",")
    }
}

mod regex_as_str {
    use regex::Regex;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(re: &Regex, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(re.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Regex, D::Error> {
        let raw = String::deserialize(d)?;
        Regex::new(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "watcher_rule_tests.rs"]
mod tests;
