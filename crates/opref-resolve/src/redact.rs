// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Display policy for secret values.

/// Placeholder shown for values too short to partially reveal.
pub const SHORT_VALUE: &str = "[short value]";

/// Values up to this many characters are fully hidden.
const SHORT_LIMIT: usize = 12;
const HEAD: usize = 6;
const TAIL: usize = 4;

/// Mask a secret value for display: `sk-ant...[26 chars]...wxyz`.
///
/// Values longer than 12 characters keep their first 6 and last 4 characters
/// with the count of hidden characters in between. Anything shorter becomes
/// `[short value]`. Lengths are counted in characters, not bytes.
pub fn redact(value: &str) -> String {
    let len = value.chars().count();
    if len <= SHORT_LIMIT {
        return SHORT_VALUE.to_string();
    }
    let head: String = value.chars().take(HEAD).collect();
    let tail: String = value.chars().skip(len - TAIL).collect();
    format!("{head}...[{} chars]...{tail}", len - HEAD - TAIL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_value_keeps_head_and_tail() {
        assert_eq!(
            redact("sk-ant-REDACTED"),
            "sk-ant...[19 chars]...mnop"
        );
    }

    #[test]
    fn twelve_chars_is_short() {
        assert_eq!(redact("123456789012"), SHORT_VALUE);
    }

    #[test]
    fn thirteen_chars_is_revealed_partially() {
        assert_eq!(redact("1234567890123"), "123456...[3 chars]...0123");
    }

    #[test]
    fn empty_is_short() {
        assert_eq!(redact(""), SHORT_VALUE);
    }

    #[test]
    fn multibyte_characters_do_not_panic() {
        let out = redact("пароль-секретный-ключ");
        assert!(out.starts_with("пароль"));
        assert!(out.ends_with("ключ"));
    }
}
