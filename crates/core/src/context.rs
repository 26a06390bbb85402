// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ScanContext` (spec §3): the immutable view a scanner receives.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `files` present means "scope this invocation to these files"; absent
/// means "full scan".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanContext {
    pub workspace_root: PathBuf,
    pub files: Option<Vec<PathBuf>>,
    pub project: Option<String>,
    pub options: HashMap<String, Value>,
    pub dry_run: bool,
    pub verbose: bool,
}

impl ScanContext {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            files: None,
            project: None,
            options: HashMap::new(),
            dry_run: false,
            verbose: false,
        }
    }

    pub fn with_files(mut self, files: Vec<PathBuf>) -> Self {
        self.files = Some(files);
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Two file-sets are equal if they contain the same paths as a
    /// multiset-equivalent set comparison (spec §4.3 dedup rule);
    /// both-absent is equal; one-absent-vs-present is not.
    pub fn file_set_eq(&self, other: &ScanContext) -> bool {
        match (&self.files, &other.files) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                let mut a = a.clone();
                let mut b = b.clone();
                a.sort();
                b.sort();
                a == b
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
