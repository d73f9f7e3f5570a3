// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status marks and error text shared by the commands.

use opref_core::OprefError;

/// `✓` in green on a terminal, `[OK]` otherwise.
pub fn ok_mark(use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        "✓".green().to_string()
    } else {
        "[OK]".to_string()
    }
}

/// `✗` in red on a terminal, `[FAIL]` otherwise.
pub fn fail_mark(use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        "✗".red().to_string()
    } else {
        "[FAIL]".to_string()
    }
}

/// Error text for the user. A missing vault lists the vaults that exist.
pub fn describe_error(err: &OprefError) -> String {
    match err {
        OprefError::VaultNotFound { available, .. } if available.is_empty() => {
            format!("{err}. No vaults are visible to this token")
        }
        OprefError::VaultNotFound { available, .. } => {
            format!("{err}. Available: {}", available.join(", "))
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_marks() {
        assert_eq!(ok_mark(false), "[OK]");
        assert_eq!(fail_mark(false), "[FAIL]");
    }

    #[test]
    fn vault_not_found_lists_available() {
        let err = OprefError::VaultNotFound {
            title: "Nope".into(),
            available: vec!["Agent Secrets".into(), "Personal".into()],
        };
        assert_eq!(
            describe_error(&err),
            "vault \"Nope\" not found. Available: Agent Secrets, Personal"
        );
    }

    #[test]
    fn other_errors_use_display() {
        let err = OprefError::Config("bad".into());
        assert_eq!(describe_error(&err), "configuration error: bad");
    }
}
