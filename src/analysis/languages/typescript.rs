//! TypeScript language analyzer using tree-sitter.

use std::path::Path;

use tree_sitter::{Language, Parser};

use super::ecmascript;
use crate::analysis::{FileFacts, LanguageAnalyzer, ParsedFile};

pub struct TypeScriptAnalyzer {
    language: Language,
    language_id: &'static str,
    extensions: &'static [&'static str],
}

impl TypeScriptAnalyzer {
    /// Analyzer for `.ts`, `.mts` and `.cts` files.
    pub fn new() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            language_id: "typescript",
            extensions: &["ts", "mts", "cts"],
        }
    }

    /// Analyzer for `.tsx` files (TypeScript grammar with JSX).
    pub fn tsx() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TSX.into(),
            language_id: "tsx",
            extensions: &["tsx"],
        }
    }

    fn create_parser(&self) -> anyhow::Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }
}

impl Default for TypeScriptAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAnalyzer for TypeScriptAnalyzer {
    fn language_id(&self) -> &'static str {
        self.language_id
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        let mut parser = self.create_parser()?;
        let tree = parser.parse(source, None).ok_or_else(|| {
            anyhow::anyhow!("failed to parse TypeScript source: {}", path.display())
        })?;

        Ok(ParsedFile {
            tree,
            source: source.to_vec(),
            path: path.to_string_lossy().to_string(),
        })
    }

    fn extract_facts(&self, parsed: &ParsedFile) -> anyhow::Result<FileFacts> {
        Ok(FileFacts {
            path: parsed.path.clone(),
            language: self.language_id().to_string(),
            functions: ecmascript::extract_functions(&self.language, parsed)?,
            has_parse_errors: parsed.tree.root_node().has_error(),
        })
    }
}
