//! Static selection and extraction rules
//!
//! Every skip list, extension set, priority name list and keyword prefix
//! lives here so the selection and extraction behaviour can be audited in
//! one place.

/// Directories that are never walked into or listed
pub const SKIP_DIRECTORIES: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    "venv",
    ".venv",
    "dist",
    "build",
    "target",
    "bin",
    "obj",
];

/// File names that are never listed or included
pub const SKIP_FILES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "poetry.lock",
    "Pipfile.lock",
    ".gitignore",
    ".dockerignore",
    "LICENSE",
    "CHANGELOG.md",
];

/// Recognized source, markup and config extensions (without the dot)
pub const CODE_EXTENSIONS: &[&str] = &[
    "py", "js", "jsx", "ts", "tsx", "java", "cpp", "c", "h", "cs", "go", "rs", "rb", "php", "swift",
    "kt", "scala", "md", "txt", "json", "yml", "yaml", "toml", "xml",
];

/// Documentation extensions
pub const DOC_EXTENSIONS: &[&str] = &["md", "txt"];

/// Configuration extensions
pub const CONFIG_EXTENSIONS: &[&str] = &["json", "yml", "yaml", "toml", "xml"];

/// Project manifest names (compared against the lowercased file name)
pub const MANIFEST_NAMES: &[&str] = &[
    "setup.py",
    "pyproject.toml",
    "package.json",
    "cargo.toml",
    "pom.xml",
    "build.gradle",
];

/// Entry point names (compared against the lowercased file name)
pub const ENTRY_POINT_NAMES: &[&str] = &[
    "main.py",
    "index.js",
    "index.ts",
    "app.py",
    "__init__.py",
    "main.go",
    "main.rs",
];

/// Path fragments marking primary source trees
pub const SOURCE_PATH_MARKERS: &[&str] = &["src", "app"];

/// Path fragments marking test trees
pub const TEST_PATH_MARKERS: &[&str] = &["test", "spec"];

/// Files smaller than this (bytes) are never summarized
pub const STRUCTURE_THRESHOLD: usize = 3000;

/// Extractions shorter than this (bytes) are considered useless
pub const MIN_EXTRACTED_CONTENT: usize = 100;

/// Lines kept from the start of an unrecognized file
pub const TRUNCATE_LINES_HEAD: usize = 25;

/// Lines kept from the end of an unrecognized file
pub const TRUNCATE_LINES_TAIL: usize = 25;

/// Default maximum number of included files
pub const DEFAULT_MAX_FILES: usize = 50;

/// Default total content budget in bytes
pub const DEFAULT_MAX_TOTAL_BYTES: u64 = 500_000;

/// Default per-file size cap in bytes
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10_000;

/// Depth of the survey shown in the content header
pub const HEADER_SURVEY_DEPTH: usize = 2;

/// Number of directories listed in the content header
pub const HEADER_DIRECTORY_LIMIT: usize = 20;

/// Default depth for a standalone survey
pub const DEFAULT_SURVEY_DEPTH: usize = 3;

/// Whether an entry name is excluded from every walk
pub fn is_excluded_name(name: &str) -> bool {
    SKIP_DIRECTORIES.contains(&name) || SKIP_FILES.contains(&name)
}

/// Whether an extension is one we read at all
pub fn is_code_extension(extension: &str) -> bool {
    CODE_EXTENSIONS.contains(&extension)
}

/// Whether a file is embedded as-is instead of being summarized
pub fn is_verbatim(extension: &str, file_name: &str) -> bool {
    DOC_EXTENSIONS.contains(&extension)
        || CONFIG_EXTENSIONS.contains(&extension)
        || file_name.to_lowercase().contains("readme")
}

/// Language family used by the structural extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageFamily {
    Python,
    JavaScript,
    Systems,
    Other,
}

impl LanguageFamily {
    /// Classify an extension (without the dot)
    pub fn from_extension(extension: &str) -> Self {
        match extension {
            "py" => LanguageFamily::Python,
            "js" | "jsx" | "ts" | "tsx" => LanguageFamily::JavaScript,
            "java" | "cs" | "go" | "rs" => LanguageFamily::Systems,
            _ => LanguageFamily::Other,
        }
    }

    /// Line prefixes that mark structural lines; empty for `Other`
    pub fn prefixes(&self) -> &'static [&'static str] {
        match self {
            LanguageFamily::Python => &["import ", "from ", "class ", "def ", "@"],
            LanguageFamily::JavaScript => &[
                "import ",
                "export ",
                "class ",
                "function ",
                "const ",
                "let ",
                "var ",
                "interface ",
                "type ",
            ],
            LanguageFamily::Systems => &[
                "import ",
                "package ",
                "class ",
                "interface ",
                "struct ",
                "enum ",
                "func ",
                "pub fn",
                "impl ",
            ],
            LanguageFamily::Other => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excluded_names() {
        assert!(is_excluded_name(".git"));
        assert!(is_excluded_name("node_modules"));
        assert!(is_excluded_name("yarn.lock"));
        assert!(is_excluded_name("LICENSE"));
        assert!(!is_excluded_name("src"));
        assert!(!is_excluded_name("license"));
    }

    #[test]
    fn test_code_extensions_are_case_sensitive() {
        assert!(is_code_extension("py"));
        assert!(is_code_extension("yaml"));
        assert!(!is_code_extension("PY"));
        assert!(!is_code_extension("png"));
        assert!(!is_code_extension(""));
    }

    #[test]
    fn test_is_verbatim() {
        assert!(is_verbatim("md", "guide.md"));
        assert!(is_verbatim("toml", "Cargo.toml"));
        assert!(is_verbatim("rs", "readme_example.rs"));
        assert!(!is_verbatim("rs", "lib.rs"));
    }

    #[test]
    fn test_language_family() {
        assert_eq!(LanguageFamily::from_extension("py"), LanguageFamily::Python);
        assert_eq!(
            LanguageFamily::from_extension("tsx"),
            LanguageFamily::JavaScript
        );
        assert_eq!(LanguageFamily::from_extension("go"), LanguageFamily::Systems);
        assert_eq!(LanguageFamily::from_extension("rb"), LanguageFamily::Other);
        assert!(LanguageFamily::Other.prefixes().is_empty());
        assert!(LanguageFamily::Systems.prefixes().contains(&"pub fn"));
    }
}
