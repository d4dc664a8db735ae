//! Core types for detection results.

use serde::{Deserialize, Serialize};

use crate::vcs::DiffScope;

/// Which part of the code base is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeSelector {
    /// Every declaration.
    #[default]
    Full,
    /// Declarations on lines added in the working tree relative to `HEAD`.
    New,
    /// Declarations on lines added in the index relative to `HEAD`.
    Staged,
}

impl ScopeSelector {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeSelector::Full => "full",
            ScopeSelector::New => "new",
            ScopeSelector::Staged => "staged",
        }
    }

    /// The diff this selector restricts to, if any.
    pub fn diff_scope(&self) -> Option<DiffScope> {
        match self {
            ScopeSelector::Full => None,
            ScopeSelector::New => Some(DiffScope::WorkingTree),
            ScopeSelector::Staged => Some(DiffScope::Index),
        }
    }

    /// Suffix attached to violations found under this selector.
    pub fn annotation(&self) -> Option<ScopeAnnotation> {
        match self {
            ScopeSelector::Full => None,
            ScopeSelector::New => Some(ScopeAnnotation::NewFunction),
            ScopeSelector::Staged => Some(ScopeAnnotation::StagedChange),
        }
    }
}

impl std::fmt::Display for ScopeSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ScopeSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(ScopeSelector::Full),
            "new" => Ok(ScopeSelector::New),
            "staged" => Ok(ScopeSelector::Staged),
            _ => Err(format!("unknown mode: {}", s)),
        }
    }
}

/// Category of a checkable declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    /// `function name() {}`
    NamedFunction,
    /// A function or arrow expression bound to a variable.
    NamedArrow,
    /// A named declaration whose name follows the `useXxx` convention.
    Hook,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::NamedFunction => "named_function",
            DeclarationKind::NamedArrow => "named_arrow",
            DeclarationKind::Hook => "hook",
        }
    }
}

/// A node that requires documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    /// `None` only for `export default function () {}`.
    pub name: Option<String>,
    /// 1-based line of the declaration.
    pub line: usize,
}

/// Why a declaration was in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeAnnotation {
    NewFunction,
    StagedChange,
}

impl ScopeAnnotation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeAnnotation::NewFunction => "new function",
            ScopeAnnotation::StagedChange => "staged change",
        }
    }
}

impl std::fmt::Display for ScopeAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A declaration that lacks a doc comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub name: Option<String>,
    pub line: usize,
    pub annotation: Option<ScopeAnnotation>,
}

impl Violation {
    /// Name to show to the user.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("function")
    }

    pub fn message(&self) -> String {
        let mut message = format!(
            "Function \"{}\" must have a JSDoc comment",
            self.display_name()
        );
        if let Some(annotation) = self.annotation {
            message.push_str(&format!(" ({})", annotation));
        }
        message
    }
}

/// A violation located in a file, as handed to report sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub file: String,
    pub line: usize,
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<ScopeAnnotation>,
}

impl Finding {
    pub fn new(file: &str, violation: &Violation) -> Self {
        Self {
            file: file.to_string(),
            line: violation.line,
            name: violation.display_name().to_string(),
            message: violation.message(),
            annotation: violation.annotation,
        }
    }
}

/// Results of running detection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionResult {
    pub mode: ScopeSelector,
    pub findings: Vec<Finding>,
    /// Number of files that were analyzed.
    pub scanned: usize,
}

impl DetectionResult {
    pub fn new(mode: ScopeSelector) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Distinct files with at least one finding.
    pub fn files_with_findings(&self) -> usize {
        self.findings
            .iter()
            .map(|f| f.file.as_str())
            .collect::<std::collections::BTreeSet<_>>()
            .len()
    }

    /// Order findings by file, then line.
    pub fn sort(&mut self) {
        self.findings
            .sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_parse_and_display() {
        assert_eq!("NEW".parse::<ScopeSelector>().unwrap(), ScopeSelector::New);
        assert_eq!(ScopeSelector::Staged.to_string(), "staged");
        assert!("all".parse::<ScopeSelector>().is_err());
        assert_eq!(ScopeSelector::default(), ScopeSelector::Full);
    }

    #[test]
    fn test_selector_serde() {
        let mode: ScopeSelector = serde_json::from_str("\"staged\"").unwrap();
        assert_eq!(mode, ScopeSelector::Staged);
        assert_eq!(serde_json::to_string(&ScopeSelector::New).unwrap(), "\"new\"");
    }

    #[test]
    fn test_violation_message() {
        let plain = Violation {
            name: Some("foo".to_string()),
            line: 3,
            annotation: None,
        };
        assert_eq!(plain.message(), "Function \"foo\" must have a JSDoc comment");

        let staged = Violation {
            annotation: Some(ScopeAnnotation::StagedChange),
            ..plain.clone()
        };
        assert_eq!(
            staged.message(),
            "Function \"foo\" must have a JSDoc comment (staged change)"
        );

        let anonymous = Violation {
            name: None,
            line: 1,
            annotation: Some(ScopeAnnotation::NewFunction),
        };
        assert_eq!(
            anonymous.message(),
            "Function \"function\" must have a JSDoc comment (new function)"
        );
    }

    #[test]
    fn test_result_sort_and_count() {
        let v = |line| Violation {
            name: Some("f".to_string()),
            line,
            annotation: None,
        };
        let mut result = DetectionResult::new(ScopeSelector::Full);
        result.findings.push(Finding::new("src/b.ts", &v(2)));
        result.findings.push(Finding::new("src/a.ts", &v(9)));
        result.findings.push(Finding::new("src/a.ts", &v(1)));
        result.sort();

        assert_eq!(result.findings[0].file, "src/a.ts");
        assert_eq!(result.findings[0].line, 1);
        assert_eq!(result.files_with_findings(), 2);
        assert!(!result.is_clean());
    }
}
