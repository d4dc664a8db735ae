//! Doc-comment extraction.
//!
//! Splits the `/** ... */` comment of every checkable declaration into a
//! description and `@param`, `@returns` and `@example` tags. Tag contents are
//! taken as written; nothing is validated against the code.

use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::{self, Comment};
use crate::detect::classify;

lazy_static! {
    static ref PARAM: Regex =
        Regex::new(r"^(?:\{(?P<ty>[^}]*)\}\s*)?(?P<name>\[[^\]]*\]|\S+)\s*(?:-\s*)?(?P<desc>.*)$")
            .unwrap();
    static ref RETURNS: Regex = Regex::new(r"^(?:\{(?P<ty>[^}]*)\}\s*)?(?:-\s*)?(?P<desc>.*)$").unwrap();
}

/// A documented `@param`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub description: String,
}

/// A documented `@returns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnDoc {
    #[serde(rename = "type")]
    pub ty: String,
    pub description: String,
}

/// Documentation of one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocEntry {
    pub name: String,
    pub description: String,
    pub params: Vec<ParamDoc>,
    pub returns: Option<ReturnDoc>,
    pub examples: Vec<String>,
    pub file: String,
}

/// Documented declarations of one file, in source order.
pub fn extract_entries(path: &Path, label: &str, source: &[u8]) -> anyhow::Result<Vec<DocEntry>> {
    let facts = analysis::analyze_source(path, source)?;

    let entries = facts
        .functions
        .iter()
        .filter_map(|node| {
            let declaration = classify(node)?;
            let doc = node
                .leading_comments
                .iter()
                .rev()
                .find(|c| c.is_doc_block())?;
            let name = declaration.name.unwrap_or_else(|| "default".to_string());
            Some(parse_doc_comment(&name, label, doc))
        })
        .collect();

    Ok(entries)
}

/// Extract entries from every file; unreadable files are skipped.
pub fn extract_all(files: &[PathBuf], base: &Path) -> Vec<DocEntry> {
    let mut entries = Vec::new();
    for file in files {
        let label = file
            .strip_prefix(base)
            .unwrap_or(file)
            .to_string_lossy()
            .replace('\\', "/");
        let result = std::fs::read(file)
            .map_err(anyhow::Error::from)
            .and_then(|source| extract_entries(file, &label, &source));
        match result {
            Ok(found) => entries.extend(found),
            Err(e) => warn!(file = %file.display(), error = %e, "skipping file"),
        }
    }
    entries
}

/// Tag currently collecting continuation lines.
enum Section {
    Description,
    Param,
    Returns,
    Example,
    Other,
}

/// Split a doc comment into its parts.
pub fn parse_doc_comment(name: &str, file: &str, comment: &Comment) -> DocEntry {
    let mut free_text: Vec<String> = Vec::new();
    let mut description_tag: Vec<String> = Vec::new();
    let mut params: Vec<String> = Vec::new();
    let mut returns: Option<String> = None;
    let mut examples: Vec<Vec<String>> = Vec::new();
    let mut section = Section::Description;
    let mut in_free_text = true;

    for raw in comment.value.lines() {
        let line = clean_line(raw);
        let trimmed = line.trim();

        if let Some(tagged) = trimmed.strip_prefix('@') {
            in_free_text = false;
            let (tag, rest) = tagged.split_once(char::is_whitespace).unwrap_or((tagged, ""));
            let rest = rest.trim().to_string();
            section = match tag {
                "param" | "arg" | "argument" => {
                    params.push(rest);
                    Section::Param
                }
                "returns" | "return" => {
                    returns = Some(rest);
                    Section::Returns
                }
                "example" => {
                    examples.push(if rest.is_empty() { vec![] } else { vec![rest] });
                    Section::Example
                }
                "description" | "desc" => {
                    description_tag.push(rest);
                    Section::Description
                }
                _ => Section::Other,
            };
            continue;
        }

        match section {
            Section::Description if in_free_text => {
                if trimmed.is_empty() {
                    // a blank line ends the summary paragraph
                    if !free_text.is_empty() {
                        in_free_text = false;
                        section = Section::Other;
                    }
                } else {
                    free_text.push(trimmed.to_string());
                }
            }
            Section::Description => {
                if !trimmed.is_empty() {
                    description_tag.push(trimmed.to_string());
                }
            }
            Section::Param => append(params.last_mut(), trimmed),
            Section::Returns => append(returns.as_mut(), trimmed),
            Section::Example => {
                if let Some(example) = examples.last_mut() {
                    example.push(line.trim_end().to_string());
                }
            }
            Section::Other => {}
        }
    }

    let description = if description_tag.is_empty() {
        free_text.join(" ")
    } else {
        description_tag.join(" ").trim().to_string()
    };

    DocEntry {
        name: name.to_string(),
        description,
        params: params.iter().filter_map(|p| parse_param(p)).collect(),
        returns: returns.as_deref().map(parse_returns),
        examples: examples
            .into_iter()
            .map(|lines| dedent(&lines))
            .filter(|e| !e.is_empty())
            .collect(),
        file: file.to_string(),
    }
}

/// Strip the ` * ` gutter of a comment line, keeping indentation after it.
fn clean_line(raw: &str) -> &str {
    let trimmed = raw.trim_start();
    match trimmed.strip_prefix('*') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => trimmed,
    }
}

fn append(target: Option<&mut String>, text: &str) {
    if let Some(target) = target {
        if !text.is_empty() {
            if !target.is_empty() {
                target.push(' ');
            }
            target.push_str(text);
        }
    }
}

fn parse_param(text: &str) -> Option<ParamDoc> {
    let caps = PARAM.captures(text)?;
    let name = caps.name("name")?.as_str();
    let name = name
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split('=')
        .next()
        .unwrap_or(name)
        .trim();
    Some(ParamDoc {
        name: name.to_string(),
        ty: caps.name("ty").map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
        description: caps.name("desc").map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
    })
}

fn parse_returns(text: &str) -> ReturnDoc {
    match RETURNS.captures(text) {
        Some(caps) => ReturnDoc {
            ty: caps.name("ty").map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
            description: caps.name("desc").map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
        },
        None => ReturnDoc {
            ty: String::new(),
            description: text.trim().to_string(),
        },
    }
}

/// Join example lines, removing their common indentation and blank edges.
///
/// Indentation is counted in characters, so any Unicode whitespace works.
fn dedent(lines: &[String]) -> String {
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| strip_indent(l, indent))
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}

/// Drop up to `indent` leading whitespace characters.
fn strip_indent(line: &str, indent: usize) -> &str {
    let mut stripped = line;
    for _ in 0..indent {
        let mut chars = stripped.chars();
        match chars.next() {
            Some(c) if c.is_whitespace() => stripped = chars.as_str(),
            _ => break,
        }
    }
    stripped
}
