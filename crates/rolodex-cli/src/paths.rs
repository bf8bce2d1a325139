// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware config file resolution.

use std::path::PathBuf;

/// Default location of the bridge config file.
///
/// On desktop this follows XDG. On mobile the host app passes an explicit
/// path instead.
pub fn config_path() -> PathBuf {
    config_dir_from(std::env::var("XDG_CONFIG_HOME").ok(), std::env::var("HOME").ok())
        .join("rolodex")
        .join("config.json")
}

fn config_dir_from(xdg: Option<String>, home: Option<String>) -> PathBuf {
    // Try XDG config dir, then fallback to home
    if let Some(xdg) = xdg.filter(|dir| !dir.is_empty()) {
        return PathBuf::from(xdg);
    }
    if let Some(home) = home {
        return PathBuf::from(home).join(".config");
    }
    // Last resort
    PathBuf::from(".")
}
