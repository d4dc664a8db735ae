//! Markdown rendering and README section replacement.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use super::DocEntry;

/// Render the documentation section, starting with its `## heading` line.
pub fn render_section(heading: &str, entries: &[DocEntry]) -> String {
    let mut md = format!("## {}\n\n", heading);

    if entries.is_empty() {
        md.push_str("No functions with JSDoc documentation found.\n");
        return md;
    }

    for entry in entries {
        md.push_str(&format!("### {}\n\n", entry.name));

        if !entry.description.is_empty() {
            md.push_str(&format!("{}\n\n", entry.description));
        }

        if !entry.params.is_empty() {
            md.push_str("**Parameters:**\n\n");
            for param in &entry.params {
                md.push_str(&format!("- `{}`", param.name));
                if !param.ty.is_empty() {
                    md.push_str(&format!(" ({})", param.ty));
                }
                if !param.description.is_empty() {
                    md.push_str(&format!(": {}", param.description));
                }
                md.push('\n');
            }
            md.push('\n');
        }

        if let Some(returns) = &entry.returns {
            md.push_str("**Returns:**");
            if !returns.ty.is_empty() {
                md.push_str(&format!(" {}", returns.ty));
            }
            if !returns.description.is_empty() {
                let sep = if returns.ty.is_empty() { " " } else { " - " };
                md.push_str(&format!("{}{}", sep, returns.description));
            }
            md.push_str("\n\n");
        }

        if !entry.examples.is_empty() {
            md.push_str("**Examples:**\n\n");
            for example in &entry.examples {
                md.push_str(&format!("```typescript\n{}\n```\n\n", example));
            }
        }

        md.push_str(&format!("*File: {}*\n\n---\n\n", entry.file));
    }

    md.truncate(md.trim_end().len());
    md.push('\n');
    md
}

/// Replace the `## heading` section of `readme` with `section`, or append it.
///
/// The old section runs up to the next level-2 heading outside a code fence,
/// or to the end of the document.
pub fn replace_section(readme: &str, heading: &str, section: &str) -> String {
    let marker = format!("## {}", heading);
    let lines: Vec<&str> = readme.split_inclusive('\n').collect();

    let mut start = None;
    let mut end = lines.len();
    let mut in_fence = false;
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim_end();
        if trimmed.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        match start {
            None if trimmed == marker => start = Some(i),
            Some(_) if trimmed.starts_with("## ") => {
                end = i;
                break;
            }
            _ => {}
        }
    }

    let section = section.trim_end();
    let Some(start) = start else {
        let head = readme.trim_end();
        if head.is_empty() {
            return format!("{}\n", section);
        }
        return format!("{}\n\n{}\n", head, section);
    };

    let before: String = lines[..start].concat();
    let after: String = lines[end..].concat();

    let mut out = before;
    out.push_str(section);
    out.push('\n');
    if !after.is_empty() {
        out.push('\n');
        out.push_str(&after);
    }
    out
}

#[derive(Deserialize)]
struct PackageJson {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Title and description for a new README, from `package.json`.
pub fn readme_stub(package_json: &Path) -> Option<String> {
    let content = fs::read_to_string(package_json).ok()?;
    let package: PackageJson = match serde_json::from_str(&content) {
        Ok(p) => p,
        Err(e) => {
            debug!(path = %package_json.display(), error = %e, "invalid package.json");
            return None;
        }
    };

    let mut stub = format!("# {}\n", package.name?);
    if let Some(description) = package.description.filter(|d| !d.is_empty()) {
        stub.push_str(&format!("\n{}\n", description));
    }
    Some(stub)
}

/// Rewrite the documentation section of the README at `readme_path`.
///
/// A missing README is created, seeded from `package.json` next to it.
pub fn update_readme(readme_path: &Path, heading: &str, entries: &[DocEntry]) -> anyhow::Result<()> {
    let existing = if readme_path.is_file() {
        fs::read_to_string(readme_path)?
    } else {
        let dir = readme_path.parent().unwrap_or_else(|| Path::new("."));
        readme_stub(&dir.join("package.json")).unwrap_or_default()
    };

    let section = render_section(heading, entries);
    let updated = replace_section(&existing, heading, &section);
    fs::write(readme_path, updated)?;
    info!(path = %readme_path.display(), entries = entries.len(), "readme updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::{ParamDoc, ReturnDoc};

    fn entry() -> DocEntry {
        DocEntry {
            name: "add".to_string(),
            description: "Adds two numbers.".to_string(),
            params: vec![ParamDoc {
                name: "a".to_string(),
                ty: "number".to_string(),
                description: "First operand".to_string(),
            }],
            returns: Some(ReturnDoc {
                ty: "number".to_string(),
                description: "The sum".to_string(),
            }),
            examples: vec!["add(1, 2);".to_string()],
            file: "src/math.ts".to_string(),
        }
    }

    #[test]
    fn test_render_section() {
        let md = render_section("API Documentation", &[entry()]);
        assert!(md.starts_with("## API Documentation\n\n### add\n\nAdds two numbers.\n\n"));
        assert!(md.contains("- `a` (number): First operand\n"));
        assert!(md.contains("**Returns:** number - The sum\n"));
        assert!(md.contains("```typescript\nadd(1, 2);\n```"));
        assert!(md.ends_with("*File: src/math.ts*\n\n---\n"));
    }

    #[test]
    fn test_render_empty() {
        let md = render_section("API", &[]);
        assert_eq!(md, "## API\n\nNo functions with JSDoc documentation found.\n");
    }

    #[test]
    fn test_replace_existing_section() {
        let readme = "# pkg\n\nIntro.\n\n## API Documentation\n\nold stuff\n\n```md\n## not a heading\n```\n\n## License\n\nMIT\n";
        let out = replace_section(readme, "API Documentation", "## API Documentation\n\nnew\n");
        assert_eq!(
            out,
            "# pkg\n\nIntro.\n\n## API Documentation\n\nnew\n\n## License\n\nMIT\n"
        );
    }

    #[test]
    fn test_append_when_missing() {
        let out = replace_section("# pkg\n\nIntro.\n", "API", "## API\n\nx\n");
        assert_eq!(out, "# pkg\n\nIntro.\n\n## API\n\nx\n");
        assert_eq!(replace_section("", "API", "## API\n"), "## API\n");
    }

    #[test]
    fn test_section_at_end() {
        let readme = "# pkg\n\n## API\n\nold\n";
        assert_eq!(replace_section(readme, "API", "## API\n\nnew"), "# pkg\n\n## API\n\nnew\n");
    }

    #[test]
    fn test_update_readme_from_package_json() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("package.json"),
            r#"{"name":"my-lib","description":"Does things"}"#,
        )
        .unwrap();
        let readme = temp.path().join("README.md");

        update_readme(&readme, "API Documentation", &[entry()]).unwrap();
        let content = std::fs::read_to_string(&readme).unwrap();
        assert!(content.starts_with("# my-lib\n\nDoes things\n\n## API Documentation\n"));

        // running again replaces rather than duplicates
        update_readme(&readme, "API Documentation", &[]).unwrap();
        let content = std::fs::read_to_string(&readme).unwrap();
        assert_eq!(content.matches("## API Documentation").count(), 1);
        assert!(content.contains("No functions with JSDoc documentation found."));
        assert!(!content.contains("### add"));
    }
}
