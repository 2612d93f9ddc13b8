//! Issue types representing individual review findings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level of an issue, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Must be fixed before the code ships.
    Critical,
    /// Serious problem, likely a bug or vulnerability.
    High,
    /// Should be addressed but not blocking.
    Medium,
    /// Minor issue or nitpick.
    Low,
    /// Informational observation.
    Info,
}

/// Custom deserializer for Severity that accepts common LLM variations.
///
/// Models sometimes return values like "Blocker", "Major", "Moderate",
/// "warning" instead of the expected closed set. This normalizes them;
/// anything unrecognized falls back to `Info` rather than failing.
impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Severity::from_loose(&s))
    }
}

impl Severity {
    /// Normalize a free-form severity string into the closed set.
    pub fn from_loose(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "critical" | "blocker" | "fatal" => Severity::Critical,
            "high" | "severe" | "major" | "error" => Severity::High,
            "medium" | "moderate" | "warning" | "warn" => Severity::Medium,
            "low" | "minor" | "trivial" => Severity::Low,
            _ => Severity::Info,
        }
    }

    /// Emoji marker used in reports.
    pub fn emoji(&self) -> &'static str {
        match self {
            Severity::Critical => "🔴",
            Severity::High => "🟠",
            Severity::Medium => "🟡",
            Severity::Low => "🔵",
            Severity::Info => "⚪",
        }
    }

    /// Emoji plus capitalized label, e.g. `🔴 Critical`.
    pub fn label(&self) -> String {
        let name = self.to_string();
        let mut chars = name.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => name,
        };
        format!("{} {}", self.emoji(), capitalized)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::High => write!(f, "high"),
            Severity::Medium => write!(f, "medium"),
            Severity::Low => write!(f, "low"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "high" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" => Ok(Severity::Low),
            "info" => Ok(Severity::Info),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// Review dimension an issue belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Security,
    Bug,
    Performance,
    Style,
    Maintainability,
    BestPractice,
    /// Fallback for categories outside the closed set.
    General,
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Category::from_loose(&s))
    }
}

impl Category {
    /// Normalize a free-form category string into the closed set.
    pub fn from_loose(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "security" | "vulnerability" => Category::Security,
            "bug" | "correctness" | "logic" => Category::Bug,
            "performance" | "perf" | "efficiency" => Category::Performance,
            "style" | "formatting" => Category::Style,
            "maintainability" | "readability" => Category::Maintainability,
            "best-practice" | "best practice" | "best_practice" | "bestpractice" => {
                Category::BestPractice
            }
            _ => Category::General,
        }
    }

    /// Capitalized display name, e.g. `Best-practice`.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Security => "Security",
            Category::Bug => "Bug",
            Category::Performance => "Performance",
            Category::Style => "Style",
            Category::Maintainability => "Maintainability",
            Category::BestPractice => "Best-practice",
            Category::General => "General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Security => write!(f, "security"),
            Category::Bug => write!(f, "bug"),
            Category::Performance => write!(f, "performance"),
            Category::Style => write!(f, "style"),
            Category::Maintainability => write!(f, "maintainability"),
            Category::BestPractice => write!(f, "best-practice"),
            Category::General => write!(f, "general"),
        }
    }
}

/// A single issue reported by the reviewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Source line the issue refers to (1-based). 0 means unknown;
    /// line numbers from the model are best-effort.
    pub line: u32,
    /// The severity of the issue.
    pub severity: Severity,
    /// The review dimension the issue belongs to.
    pub category: Category,
    /// Short title summarizing the issue.
    pub title: String,
    /// What's wrong and why it matters.
    pub description: String,
    /// Suggested fix. May be empty.
    pub suggestion: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering_most_severe_first() {
        assert!(Severity::Critical < Severity::High);
        assert!(Severity::High < Severity::Medium);
        assert!(Severity::Medium < Severity::Low);
        assert!(Severity::Low < Severity::Info);
    }

    #[test]
    fn severity_display() {
        assert_eq!(Severity::Critical.to_string(), "critical");
        assert_eq!(Severity::Info.to_string(), "info");
    }

    #[test]
    fn severity_from_str() {
        assert_eq!("critical".parse::<Severity>(), Ok(Severity::Critical));
        assert_eq!("HIGH".parse::<Severity>(), Ok(Severity::High));
        assert!("warning-ish".parse::<Severity>().is_err());
    }

    #[test]
    fn severity_loose_synonyms() {
        assert_eq!(Severity::from_loose("Blocker"), Severity::Critical);
        assert_eq!(Severity::from_loose("major"), Severity::High);
        assert_eq!(Severity::from_loose("warn"), Severity::Medium);
        assert_eq!(Severity::from_loose("trivial"), Severity::Low);
        assert_eq!(Severity::from_loose("something else"), Severity::Info);
    }

    #[test]
    fn severity_label_has_emoji() {
        assert_eq!(Severity::Critical.label(), "🔴 Critical");
        assert_eq!(Severity::Info.label(), "⚪ Info");
    }

    #[test]
    fn category_loose_fallback() {
        assert_eq!(Category::from_loose("security"), Category::Security);
        assert_eq!(Category::from_loose("Best Practice"), Category::BestPractice);
        assert_eq!(Category::from_loose("typo-hunting"), Category::General);
    }

    #[test]
    fn category_display_name_capitalized() {
        assert_eq!(Category::BestPractice.display_name(), "Best-practice");
        assert_eq!(Category::Bug.display_name(), "Bug");
    }

    #[test]
    fn severity_deserialize_tolerant() {
        let s: Severity = serde_json::from_str("\"Severe\"").unwrap();
        assert_eq!(s, Severity::High);
        let s: Severity = serde_json::from_str("\"no idea\"").unwrap();
        assert_eq!(s, Severity::Info);
    }

    #[test]
    fn category_serde_roundtrip() {
        let json = serde_json::to_string(&Category::BestPractice).unwrap();
        assert_eq!(json, "\"best-practice\"");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Category::BestPractice);
    }
}
