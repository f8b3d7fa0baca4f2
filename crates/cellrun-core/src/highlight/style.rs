//! Built-in highlighting styles.

use std::fmt::Write;

use crate::error::{Error, Result};

use super::lexer::TokenKind;

/// Styling for one token kind.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub color: &'static str,
    pub bold: bool,
    pub italic: bool,
}

const fn plain(color: &'static str) -> Rule {
    Rule {
        color,
        bold: false,
        italic: false,
    }
}

const fn bold(color: &'static str) -> Rule {
    Rule {
        color,
        bold: true,
        italic: false,
    }
}

const fn italic(color: &'static str) -> Rule {
    Rule {
        color,
        bold: false,
        italic: true,
    }
}

/// A named color scheme. Backgrounds are never set.
#[derive(Debug)]
pub struct Style {
    pub name: &'static str,
    /// Foreground for unclassified text.
    pub text: &'static str,
    pub rules: &'static [(TokenKind, Rule)],
}

const STYLES: &[Style] = &[
    Style {
        name: "default",
        text: "#000000",
        rules: &[
            (TokenKind::Comment, italic("#3D7B7B")),
            (TokenKind::Preproc, plain("#9C6500")),
            (TokenKind::String, plain("#BA2121")),
            (TokenKind::Char, plain("#BA2121")),
            (TokenKind::Number, plain("#666666")),
            (TokenKind::Keyword, bold("#008000")),
            (TokenKind::Type, plain("#B00040")),
            (TokenKind::Builtin, plain("#008000")),
            (TokenKind::Operator, plain("#666666")),
        ],
    },
    Style {
        name: "monokai",
        text: "#F8F8F2",
        rules: &[
            (TokenKind::Comment, plain("#959077")),
            (TokenKind::Preproc, plain("#959077")),
            (TokenKind::String, plain("#E6DB74")),
            (TokenKind::Char, plain("#E6DB74")),
            (TokenKind::Number, plain("#AE81FF")),
            (TokenKind::Keyword, plain("#66D9EF")),
            (TokenKind::Type, plain("#66D9EF")),
            (TokenKind::Builtin, plain("#A6E22E")),
            (TokenKind::Name, plain("#F8F8F2")),
            (TokenKind::Operator, plain("#F92672")),
            (TokenKind::Punct, plain("#F8F8F2")),
        ],
    },
    Style {
        name: "solarized-dark",
        text: "#93A1A1",
        rules: &[
            (TokenKind::Comment, italic("#586E75")),
            (TokenKind::Preproc, plain("#D33682")),
            (TokenKind::String, plain("#2AA198")),
            (TokenKind::Char, plain("#2AA198")),
            (TokenKind::Number, plain("#2AA198")),
            (TokenKind::Keyword, plain("#859900")),
            (TokenKind::Type, plain("#B58900")),
            (TokenKind::Builtin, plain("#268BD2")),
            (TokenKind::Operator, plain("#93A1A1")),
        ],
    },
];

impl Style {
    /// Look up a built-in style by name.
    pub fn by_name(name: &str) -> Result<&'static Style> {
        STYLES
            .iter()
            .find(|style| style.name == name)
            .ok_or_else(|| Error::UnknownStyle(name.to_string()))
    }

    /// Names of all built-in styles.
    pub fn names() -> impl Iterator<Item = &'static str> {
        STYLES.iter().map(|style| style.name)
    }

    /// CSS rules scoped to `.highlight`.
    pub fn css(&self) -> String {
        let mut css = String::new();
        css.push_str("pre { line-height: 125%; }\n");
        let _ = writeln!(css, "body .highlight {{ color: {} }}", self.text);

        for (kind, rule) in self.rules {
            let Some(class) = kind.css_class() else {
                continue;
            };
            let _ = write!(css, "body .highlight .{class} {{ color: {}", rule.color);
            if rule.bold {
                css.push_str("; font-weight: bold");
            }
            if rule.italic {
                css.push_str("; font-style: italic");
            }
            css.push_str(" }\n");
        }

        css
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(Style::by_name("monokai").unwrap().name, "monokai");
        assert!(matches!(Style::by_name("neon"), Err(Error::UnknownStyle(_))));
        assert_eq!(Style::names().count(), 3);
    }

    #[test]
    fn test_css_has_no_background() {
        for name in Style::names() {
            let css = Style::by_name(name).unwrap().css();
            assert!(!css.contains("background"), "{name} sets a background");
        }
    }

    #[test]
    fn test_css_rules() {
        let css = Style::by_name("default").unwrap().css();
        assert!(css.contains("body .highlight .k { color: #008000; font-weight: bold }"));
        assert!(css.contains("body .highlight .c { color: #3D7B7B; font-style: italic }"));
    }
}
