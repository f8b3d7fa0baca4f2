//! Syntax-highlighted HTML rendering of cell source.

mod lexer;
mod style;

pub use lexer::{TokenKind, tokenize};
pub use style::{Rule, Style};

use crate::error::Result;

/// Render `source` as a standalone HTML document in the named style.
///
/// The document embeds its CSS and sets no background, so it sits on
/// whatever surface displays it.
pub fn render_html(source: &str, style_name: &str) -> Result<String> {
    let style = Style::by_name(style_name)?;

    let mut body = String::with_capacity(source.len() * 2);
    for (kind, text) in tokenize(source) {
        match kind.css_class() {
            Some(class) => {
                body.push_str("<span class=\"");
                body.push_str(class);
                body.push_str("\">");
                escape_into(text, &mut body);
                body.push_str("</span>");
            }
            None => escape_into(text, &mut body),
        }
    }

    Ok(format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <style type=\"text/css\">\n{css}</style>\n\
         </head>\n\
         <body>\n\
         <div class=\"highlight\"><pre>{body}</pre></div>\n\
         </body>\n\
         </html>\n",
        css = style.css(),
    ))
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_render_escapes_and_classes() {
        let html = render_html("#include <vector>\nint main() { return a < b; }\n", "default")
            .unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<span class=\"cp\">#include &lt;vector&gt;</span>"));
        assert!(html.contains("<span class=\"kt\">int</span>"));
        assert!(html.contains("<span class=\"o\">&lt;</span>"));
        assert!(!html.contains("<vector>"));
    }

    #[test]
    fn test_render_unknown_style() {
        assert!(matches!(
            render_html("int x;", "no-such-style"),
            Err(Error::UnknownStyle(_))
        ));
    }

    #[test]
    fn test_render_embeds_style() {
        let html = render_html("__global__ void k() {}", "monokai").unwrap();
        assert!(html.contains("#A6E22E"));
        assert!(html.contains("<span class=\"nb\">__global__</span>"));
    }
}
