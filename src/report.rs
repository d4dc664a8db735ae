//! Output formatting for doccheck results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output grouped by file, with a doc-comment template hint
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::detect::{DetectionResult, Finding, ScopeSelector};

/// Doc-comment skeleton printed after a failing pretty report.
pub const DOC_TEMPLATE: &str = "/**
 * Description of the function
 * @param {type} paramName - Description of the parameter
 * @returns {type} Description of the return value
 */";

// =============================================================================
// JSON Format
// =============================================================================

/// JSON report structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub mode: ScopeSelector,
    pub passed: bool,
    pub files_scanned: usize,
    pub violation_count: usize,
    pub violations: Vec<Finding>,
}

pub fn build_json_report(path: &str, result: &DetectionResult) -> JsonReport {
    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        mode: result.mode,
        passed: result.is_clean(),
        files_scanned: result.scanned,
        violation_count: result.findings.len(),
        violations: result.findings.clone(),
    }
}

/// Write results in JSON format to stdout.
pub fn write_json(path: &str, result: &DetectionResult) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&build_json_report(path, result))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Human description of a selector.
pub fn mode_description(mode: ScopeSelector) -> &'static str {
    match mode {
        ScopeSelector::Full => "all functions",
        ScopeSelector::New => "new functions (compared with HEAD)",
        ScopeSelector::Staged => "staged changes",
    }
}

/// Write results in pretty (human-readable) format to stdout.
pub fn write_pretty(path: &str, result: &DetectionResult) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render_pretty(&mut out, path, result)?;
    Ok(())
}

/// Render the pretty report into `out`.
pub fn render_pretty<W: Write>(out: &mut W, path: &str, result: &DetectionResult) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "  {} v{}",
        "doccheck".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(out)?;
    writeln!(out, "  {}{}", "Scanning: ".dimmed(), path)?;
    writeln!(out, "  {}{}", "Mode:     ".dimmed(), mode_description(result.mode))?;
    writeln!(out, "  {}{}", "Files:    ".dimmed(), result.scanned)?;
    writeln!(out)?;

    write_findings(out, &result.findings)?;
    write_summary(out, result)
}

fn write_findings<W: Write>(out: &mut W, findings: &[Finding]) -> std::io::Result<()> {
    let mut current: Option<&str> = None;

    for f in findings {
        if current != Some(f.file.as_str()) {
            if current.is_some() {
                writeln!(out)?;
            }
            writeln!(out, "  {} {}", "✗".red(), f.file.blue())?;
            current = Some(f.file.as_str());
        }
        writeln!(
            out,
            "    {} {}",
            format!("{:>5}", format!("{}:", f.line)).dimmed(),
            f.message
        )?;
    }

    if !findings.is_empty() {
        writeln!(out)?;
    }
    Ok(())
}

fn write_summary<W: Write>(out: &mut W, result: &DetectionResult) -> std::io::Result<()> {
    if result.is_clean() {
        writeln!(
            out,
            "  {}",
            "✓ All checked functions have JSDoc comments".green()
        )?;
        return Ok(());
    }

    let count = result.findings.len();
    let plural = if count != 1 { "s" } else { "" };
    writeln!(
        out,
        "  {}",
        format!(
            "✗ {} function{} without a JSDoc comment in {} file{}",
            count,
            plural,
            result.files_with_findings(),
            if result.files_with_findings() != 1 { "s" } else { "" }
        )
        .red()
    )?;
    writeln!(out)?;
    writeln!(out, "  {}", "Add a JSDoc comment to every function:".bold())?;
    for line in DOC_TEMPLATE.lines() {
        writeln!(out, "    {}", line.dimmed())?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{ScopeAnnotation, Violation};

    fn result(mode: ScopeSelector, lines: &[usize]) -> DetectionResult {
        let mut result = DetectionResult::new(mode);
        result.scanned = 2;
        for &line in lines {
            result.findings.push(Finding::new(
                "src/a.ts",
                &Violation {
                    name: Some("foo".to_string()),
                    line,
                    annotation: mode.annotation(),
                },
            ));
        }
        result
    }

    fn render(result: &DetectionResult) -> String {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        render_pretty(&mut buf, "src", result).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_pretty_clean() {
        let text = render(&result(ScopeSelector::Full, &[]));
        assert!(text.contains("All checked functions have JSDoc comments"));
        assert!(!text.contains("@param"));
    }

    #[test]
    fn test_pretty_with_findings() {
        let text = render(&result(ScopeSelector::New, &[3, 12]));
        assert!(text.contains("src/a.ts"));
        assert!(text.contains("3: Function \"foo\" must have a JSDoc comment (new function)"));
        assert!(text.contains("2 functions without a JSDoc comment in 1 file"));
        assert!(text.contains("@returns {type}"));
    }

    #[test]
    fn test_json_report() {
        let report = build_json_report("src", &result(ScopeSelector::Staged, &[7]));
        assert!(!report.passed);
        assert_eq!(report.violation_count, 1);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "staged");
        assert_eq!(json["violations"][0]["line"], 7);
        assert_eq!(json["violations"][0]["annotation"], "staged_change");
        assert_eq!(
            json["violations"][0]["message"],
            format!("Function \"foo\" must have a JSDoc comment ({})", ScopeAnnotation::StagedChange)
        );
    }
}
