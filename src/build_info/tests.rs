// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::BuildInfo;

fn info() -> BuildInfo {
    BuildInfo::new(
        "guithium",
        "1.4.0",
        Some("abc123".to_string()),
        [
            ("minecraft".to_string(), "1.21.4".to_string()),
            ("fabricloader".to_string(), "0.16.10".to_string()),
            ("version".to_string(), "shadowed".to_string()),
        ],
    )
}

#[test]
fn test_version_token_always_bound() {
    let info = info();
    assert_eq!(info.tokens().get("version").map(String::as_str), Some("1.4.0"));
    assert_eq!(info.version(), "1.4.0");
    assert_eq!(info.commit(), Some("abc123"));
}

#[test]
fn test_tokens_for_module() {
    let info = info();
    let paper = info.tokens_for(&["version".to_string(), "minecraft".to_string()]);
    assert_eq!(paper.len(), 2);
    assert!(!paper.contains_key("fabricloader"));

    let unknown = info.tokens_for(&["forge".to_string()]);
    assert!(unknown.is_empty());
}
