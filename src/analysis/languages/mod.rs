//! Language-specific analyzer implementations.

mod ecmascript;
mod javascript;
mod typescript;

pub use javascript::JavaScriptAnalyzer;
pub use typescript::TypeScriptAnalyzer;

use super::LanguageAnalyzer;
use once_cell::sync::OnceCell;

/// Static storage for JavaScript analyzer.
static JAVASCRIPT_ANALYZER: OnceCell<JavaScriptAnalyzer> = OnceCell::new();

/// Static storage for TypeScript analyzer.
static TYPESCRIPT_ANALYZER: OnceCell<TypeScriptAnalyzer> = OnceCell::new();

/// Static storage for TSX analyzer.
static TSX_ANALYZER: OnceCell<TypeScriptAnalyzer> = OnceCell::new();

/// Build all language analyzers up front.
///
/// Optional: `get_analyzer` initializes on first use. Idempotent.
pub fn register_analyzers() {
    JAVASCRIPT_ANALYZER.get_or_init(JavaScriptAnalyzer::new);
    TYPESCRIPT_ANALYZER.get_or_init(TypeScriptAnalyzer::new);
    TSX_ANALYZER.get_or_init(TypeScriptAnalyzer::tsx);
}

/// Get an analyzer for the given file extension.
///
/// Returns None if no analyzer handles the extension.
pub fn get_analyzer(ext: &str) -> Option<&'static dyn LanguageAnalyzer> {
    let analyzer: &'static dyn LanguageAnalyzer = match ext {
        "js" | "jsx" | "mjs" | "cjs" => JAVASCRIPT_ANALYZER.get_or_init(JavaScriptAnalyzer::new),
        "ts" | "mts" | "cts" => TYPESCRIPT_ANALYZER.get_or_init(TypeScriptAnalyzer::new),
        "tsx" => TSX_ANALYZER.get_or_init(TypeScriptAnalyzer::tsx),
        _ => return None,
    };
    Some(analyzer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_analyzer() {
        assert_eq!(get_analyzer("ts").unwrap().language_id(), "typescript");
        assert_eq!(get_analyzer("tsx").unwrap().language_id(), "tsx");
        assert_eq!(get_analyzer("mjs").unwrap().language_id(), "javascript");
        assert!(get_analyzer("ts").unwrap().handles_extension("mts"));
        assert!(get_analyzer("go").is_none());
    }
}
