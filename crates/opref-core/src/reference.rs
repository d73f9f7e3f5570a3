// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `op://<vault>/<item>/<field>` reference grammar.
//!
//! Vault and item are single path segments. The field is the remainder of
//! the string and may itself contain `/`. A string that does not have this
//! shape is not a reference and is left alone by every caller.

use std::fmt;

/// Prefix every reference string starts with.
pub const REFERENCE_PREFIX: &str = "op://";

/// A parsed pointer to a secret field in the external store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    vault: String,
    item: String,
    field: String,
}

impl Reference {
    /// Build a reference from its parts. Returns `None` if any part is empty.
    pub fn new(
        vault: impl Into<String>,
        item: impl Into<String>,
        field: impl Into<String>,
    ) -> Option<Self> {
        let (vault, item, field) = (vault.into(), item.into(), field.into());
        if vault.is_empty() || item.is_empty() || field.is_empty() {
            return None;
        }
        Some(Self { vault, item, field })
    }

    /// Parse a reference string. Returns `None` for anything that is not one.
    pub fn parse(s: &str) -> Option<Self> {
        let rest = s.strip_prefix(REFERENCE_PREFIX)?;
        if rest.contains(['\n', '\r']) {
            return None;
        }

        let mut parts = rest.splitn(3, '/');
        let vault = parts.next()?;
        let item = parts.next()?;
        let field = parts.next()?;
        Self::new(vault, item, field)
    }

    /// Returns true if `s` parses as a reference.
    pub fn is_reference(s: &str) -> bool {
        Self::parse(s).is_some()
    }

    pub fn vault(&self) -> &str {
        &self.vault
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{REFERENCE_PREFIX}{}/{}/{}",
            self.vault, self.item, self.field
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_three_segments() {
        let r = Reference::parse("op://v/i/f").unwrap();
        assert_eq!(r.vault(), "v");
        assert_eq!(r.item(), "i");
        assert_eq!(r.field(), "f");
    }

    #[test]
    fn segments_may_contain_spaces() {
        let r = Reference::parse("op://Agent Secrets/OpenAI API/api key").unwrap();
        assert_eq!(r.vault(), "Agent Secrets");
        assert_eq!(r.item(), "OpenAI API");
        assert_eq!(r.field(), "api key");
    }

    #[test]
    fn field_takes_the_remaining_text() {
        let r = Reference::parse("op://v/i/section/field").unwrap();
        assert_eq!(r.vault(), "v");
        assert_eq!(r.item(), "i");
        assert_eq!(r.field(), "section/field");
    }

    #[test]
    fn empty_segment_is_never_absorbed_into_the_vault() {
        assert!(Reference::parse("op://a//b/c").is_none());
        let r = Reference::parse("op://a/b//c").unwrap();
        assert_eq!(r.item(), "b");
        assert_eq!(r.field(), "/c");
    }

    #[test]
    fn rejects_non_references() {
        for s in [
            "op://v/i",
            "v/i/f",
            "",
            "op://",
            "op:///i/f",
            "op://v//f",
            "op://a//b/c",
            "op://v/i/",
            "OP://v/i/f",
            "https://v/i/f",
            " op://v/i/f",
            "op://v/i/f\n",
        ] {
            assert!(Reference::parse(s).is_none(), "{s:?} should not parse");
        }
    }

    #[test]
    fn display_renders_reference_string() {
        let r = Reference::new("Vault", "Item", "field").unwrap();
        assert_eq!(r.to_string(), "op://Vault/Item/field");
    }

    #[test]
    fn new_rejects_empty_parts() {
        assert!(Reference::new("", "i", "f").is_none());
        assert!(Reference::new("v", "", "f").is_none());
        assert!(Reference::new("v", "i", "").is_none());
    }

    proptest! {
        #[test]
        fn parse_never_panics(s in "\\PC*") {
            let _ = Reference::parse(&s);
        }

        #[test]
        fn display_parse_roundtrip(
            vault in "[^/\\n\\r]{1,12}",
            item in "[^/\\n\\r]{1,12}",
            field in "[^\\n\\r]{1,12}",
        ) {
            let r = Reference::new(vault, item, field).unwrap();
            prop_assert_eq!(Reference::parse(&r.to_string()), Some(r));
        }
    }
}
