use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Priority tier of a skill rule. Unrecognised strings deserialize to
/// `Unspecified` instead of failing the whole rule file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
    #[default]
    Unspecified,
}

impl Priority {
    pub fn all() -> &'static [Priority] {
        &[
            Priority::Critical,
            Priority::High,
            Priority::Medium,
            Priority::Low,
            Priority::Unspecified,
        ]
    }

    /// Sort rank: lower sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
            Priority::Unspecified => 99,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::Unspecified => "unspecified",
        }
    }

    /// Parse a known tier name. Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Priority> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Some(Priority::Critical),
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            "unspecified" => Some(Priority::Unspecified),
            _ => None,
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        Priority::parse(&s).unwrap_or_default()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ObjectKind
// ---------------------------------------------------------------------------

/// AL object declarations recognised by the identifier extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Table,
    Page,
    Codeunit,
    Enum,
    TableExtension,
    PageExtension,
}

impl ObjectKind {
    /// Extraction order.
    pub fn all() -> &'static [ObjectKind] {
        &[
            ObjectKind::Table,
            ObjectKind::Page,
            ObjectKind::Codeunit,
            ObjectKind::Enum,
            ObjectKind::TableExtension,
            ObjectKind::PageExtension,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Table => "Table",
            ObjectKind::Page => "Page",
            ObjectKind::Codeunit => "Codeunit",
            ObjectKind::Enum => "Enum",
            ObjectKind::TableExtension => "TableExtension",
            ObjectKind::PageExtension => "PageExtension",
        }
    }

    /// Declaration keyword as written in source.
    pub fn keyword(self) -> &'static str {
        match self {
            ObjectKind::Table => "table",
            ObjectKind::Page => "page",
            ObjectKind::Codeunit => "codeunit",
            ObjectKind::Enum => "enum",
            ObjectKind::TableExtension => "tableextension",
            ObjectKind::PageExtension => "pageextension",
        }
    }

    pub fn is_extension(self) -> bool {
        matches!(self, ObjectKind::TableExtension | ObjectKind::PageExtension)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
