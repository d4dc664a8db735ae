//! AST-backed source analysis.
//!
//! Turns a JavaScript/TypeScript file into `FileFacts`: every function-like
//! node as a closed `FunctionNode` value (declaration, arrow or function
//! expression, with its binding context, the line of its outer construct and
//! the comments that immediately precede it).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌────────────────┐
//! │ Source Files    │────▶│ Analyzers    │────▶│ FileFacts      │
//! └─────────────────┘     │ (TS, TSX, JS)│     │ (FunctionNodes)│
//!                         └──────────────┘     └────────────────┘
//!                                                      │
//!                                                      ▼
//!                                              ┌────────────────┐
//!                                              │ detect::*      │
//!                                              └────────────────┘
//! ```
//!
//! Without the `tree-sitter` feature, `fallback` provides a regex scanner
//! that produces the same facts with lower recall.

mod facts;
pub mod fallback;
#[cfg(feature = "tree-sitter")]
mod languages;
#[cfg(feature = "tree-sitter")]
mod traits;

use std::path::Path;

pub use facts::{
    BindingContext, Comment, CommentKind, FileFacts, FunctionNode, FunctionSyntax, Span,
};
#[cfg(feature = "tree-sitter")]
pub use languages::{get_analyzer, register_analyzers, JavaScriptAnalyzer, TypeScriptAnalyzer};
#[cfg(feature = "tree-sitter")]
pub use traits::{LanguageAnalyzer, ParsedFile};

/// File extensions (without dot) the checker understands.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Whether `path` has a supported extension and is not a declaration file.
pub fn is_supported(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if name.ends_with(".d.ts") || name.ends_with(".d.mts") || name.ends_with(".d.cts") {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Analyze in-memory source for the language implied by `path`.
pub fn analyze_source(path: &Path, source: &[u8]) -> anyhow::Result<FileFacts> {
    #[cfg(feature = "tree-sitter")]
    {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if let Some(analyzer) = get_analyzer(ext) {
            let parsed = analyzer.parse(path, source)?;
            return analyzer.extract_facts(&parsed);
        }
    }

    fallback::scan(path, source)
}

/// Read and analyze a file.
pub fn analyze_file(path: &Path) -> anyhow::Result<FileFacts> {
    let source = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("reading {}: {}", path.display(), e))?;
    analyze_source(path, &source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("src/a.ts")));
        assert!(is_supported(Path::new("src/App.jsx")));
        assert!(!is_supported(Path::new("src/types.d.ts")));
        assert!(!is_supported(Path::new("README.md")));
        assert!(!is_supported(Path::new("Makefile")));
    }

    #[test]
    fn test_analyze_source_finds_functions() {
        let facts =
            analyze_source(Path::new("a.ts"), b"export function foo(x) { return x; }\n").unwrap();
        assert_eq!(facts.functions.len(), 1);
        assert_eq!(facts.functions[0].line, 1);
    }
}
