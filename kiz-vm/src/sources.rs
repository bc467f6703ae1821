// kiz-vm - Source text cache
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Cache of the source text of every file the VM has executed, used for
//! traceback rendering. The REPL appends each input to one virtual file
//! so positions stay meaningful across inputs.

use std::collections::HashMap;

/// Path → source text.
#[derive(Debug, Clone, Default)]
pub struct SourceCache {
    files: HashMap<String, String>,
}

impl SourceCache {
    pub fn new() -> Self {
        SourceCache::default()
    }

    /// Register (or replace) a file's text.
    pub fn insert(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }

    /// Append a chunk to a file, creating it if absent. Returns the line
    /// number the appended chunk starts at (1-based).
    pub fn append(&mut self, path: &str, chunk: &str) -> usize {
        match self.files.get_mut(path) {
            Some(existing) => {
                let start = existing.lines().count() + 1;
                existing.push('\n');
                existing.push_str(chunk);
                start
            }
            None => {
                self.files.insert(path.to_string(), chunk.to_string());
                1
            }
        }
    }

    /// The 1-based line of a file, if cached.
    pub fn line(&self, path: &str, lineno: usize) -> Option<&str> {
        if lineno == 0 {
            return None;
        }
        self.files.get(path)?.lines().nth(lineno - 1)
    }
}
