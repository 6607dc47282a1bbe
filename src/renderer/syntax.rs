use std::sync::OnceLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};

static SYNTAX_CACHE: OnceLock<SyntaxCache> = OnceLock::new();

const THEME: &str = "base16-ocean.dark";

/// Syntax definitions and themes are expensive to load; load them once.
pub struct SyntaxCache {
    pub syntax_set: SyntaxSet,
    pub theme_set: ThemeSet,
}

impl SyntaxCache {
    pub fn global() -> &'static SyntaxCache {
        SYNTAX_CACHE.get_or_init(Self::new)
    }

    fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    pub fn get_syntax(&self, language: &str) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_token(language)
            .or_else(|| self.syntax_set.find_syntax_by_extension(language))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    pub fn get_theme(&self) -> &Theme {
        &self.theme_set.themes[THEME]
    }

    /// Highlights `code` line by line, each line prefixed with `indent`.
    /// Lines the highlighter chokes on are emitted as-is. The caller resets
    /// the terminal colour afterwards.
    pub fn highlight(&self, code: &str, language: &str, indent: &str) -> String {
        let mut highlighter = HighlightLines::new(self.get_syntax(language), self.get_theme());
        let mut output = String::with_capacity(code.len() * 2);

        for line in LinesWithEndings::from(code) {
            output.push_str(indent);
            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false)),
                Err(_) => output.push_str(line),
            }
        }
        output
    }
}
