//! AL object declarations captured from source text.
//!
//! This is a literal text scan, not a parser: a declaration inside a comment or
//! string literal is captured the same as real code.

use crate::types::ObjectKind;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentifierDescriptor {
    pub kind: ObjectKind,
    pub id: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
}

impl fmt::Display for IdentifierDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} \"{}\"", self.kind, self.id, self.name)?;
        if let Some(base) = &self.extends {
            write!(f, " extends \"{base}\"")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

static PATTERNS: OnceLock<Vec<(ObjectKind, Regex)>> = OnceLock::new();

fn patterns() -> &'static [(ObjectKind, Regex)] {
    PATTERNS.get_or_init(|| {
        ObjectKind::all()
            .iter()
            .map(|&kind| {
                let mut pattern = format!(r#"{}\s+(\d+)\s+"([^"]+)""#, kind.keyword());
                if kind.is_extension() {
                    pattern.push_str(r#"\s+extends\s+"([^"]+)""#);
                }
                let re = RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .build()
                    .unwrap();
                (kind, re)
            })
            .collect()
    })
}

/// First declaration of each object kind in `source`, in kind order.
pub fn extract_identifiers(source: &str) -> Vec<IdentifierDescriptor> {
    patterns()
        .iter()
        .filter_map(|(kind, re)| {
            let caps = re.captures(source)?;
            let id = match caps[1].parse::<u32>() {
                Ok(id) => id,
                Err(_) => {
                    tracing::debug!(kind = %kind, raw = &caps[1], "object id out of range");
                    return None;
                }
            };
            Some(IdentifierDescriptor {
                kind: *kind,
                id,
                name: caps[2].to_string(),
                extends: caps.get(3).map(|m| m.as_str().to_string()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_declaration() {
        let src = r#"table 50100 "Customer Rating"
{
    fields { field(1; "No."; Code[20]) { } }
}"#;
        let ids = extract_identifiers(src);
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].kind, ObjectKind::Table);
        assert_eq!(ids[0].id, 50100);
        assert_eq!(ids[0].to_string(), r#"Table 50100 "Customer Rating""#);
    }

    #[test]
    fn extension_declaration_keeps_base_name() {
        let src = r#"tableextension 50110 "Cust. Ext" extends "Customer" { }"#;
        let ids = extract_identifiers(src);
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].kind, ObjectKind::TableExtension);
        assert_eq!(ids[0].extends.as_deref(), Some("Customer"));
        assert_eq!(
            ids[0].to_string(),
            r#"TableExtension 50110 "Cust. Ext" extends "Customer""#
        );
    }

    #[test]
    fn first_occurrence_per_kind_in_kind_order() {
        let src = r#"
codeunit 50200 "Rating Mgt."
page 50101 "Rating Card"
page 50102 "Rating List"
PAGEEXTENSION 50120 "Cust Card Ext" EXTENDS "Customer Card"
enum 50130 "Rating Level"
"#;
        let rendered: Vec<String> = extract_identifiers(src)
            .iter()
            .map(|d| d.to_string())
            .collect();
        assert_eq!(
            rendered,
            vec![
                r#"Page 50101 "Rating Card""#,
                r#"Codeunit 50200 "Rating Mgt.""#,
                r#"Enum 50130 "Rating Level""#,
                r#"PageExtension 50120 "Cust Card Ext" extends "Customer Card""#,
            ]
        );
    }

    #[test]
    fn extension_without_extends_clause_is_ignored() {
        assert!(extract_identifiers(r#"tableextension 50110 "Broken" { }"#).is_empty());
    }

    #[test]
    fn unquoted_names_and_plain_text_are_ignored() {
        assert!(extract_identifiers("table 50100 Customer").is_empty());
        assert!(extract_identifiers("").is_empty());
    }

    #[test]
    fn oversized_id_is_skipped() {
        assert!(extract_identifiers(r#"table 99999999999 "Too Big""#).is_empty());
    }
}
