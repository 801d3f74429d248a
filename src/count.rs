//! Source line counting rules.
//!
//! A line counts when it is non-empty after trimming. Files of the
//! brace-sensitive language additionally skip lines that hold nothing but
//! a single `{` or `}`.

use std::path::Path;

/// Extension (lower-case, with leading dot) to language label.
const EXTENSIONS: &[(&str, &str)] = &[
    (".cs", "C#"),
    (".py", "Python"),
    (".xaml", "XAML"),
    (".yml", "YAML"),
    (".yaml", "YAML"),
    (".html", "HTML"),
    (".htm", "HTML"),
    (".ts", "TypeScript"),
    (".tsx", "TypeScript"),
    (".js", "JavaScript"),
    (".jsx", "JavaScript"),
    (".css", "CSS"),
    (".scss", "SCSS"),
    (".sass", "SASS"),
    (".sln", "Solution"),
];

const BRACE_SENSITIVE: &str = ".cs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub label: &'static str,
    pub brace_sensitive: bool,
}

/// Closed mapping from file extension to language label.
#[derive(Debug, Clone)]
pub struct LanguageTable {
    entries: &'static [(&'static str, &'static str)],
    brace_sensitive: &'static str,
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self {
            entries: EXTENSIONS,
            brace_sensitive: BRACE_SENSITIVE,
        }
    }
}

impl LanguageTable {
    /// Look up the language of `path` by its final extension, ignoring case.
    /// Dotfiles such as `.yml` on their own have no extension.
    pub fn classify(&self, path: &str) -> Option<Language> {
        let ext = Path::new(path).extension()?.to_str()?.to_lowercase();
        self.entries
            .iter()
            .find(|(e, _)| e.strip_prefix('.') == Some(ext.as_str()))
            .map(|(e, label)| Language {
                label: *label,
                brace_sensitive: *e == self.brace_sensitive,
            })
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Count substantive lines of `text`.
///
/// Splitting on every break character individually treats `\r\n` as two
/// breaks; the empty piece between them is dropped like any blank line.
pub fn count_lines(text: &str, brace_sensitive: bool) -> u64 {
    text.split(is_line_break)
        .map(|line| line.trim_matches(|c: char| c.is_whitespace() || c == '\x1f'))
        .filter(|line| !line.is_empty())
        .filter(|line| !(brace_sensitive && matches!(*line, "{" | "}")))
        .count() as u64
}
