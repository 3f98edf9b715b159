//! Post-processing of raw engine output.

use std::sync::OnceLock;

use regex::Regex;

static XMLNS_PATTERN: OnceLock<Regex> = OnceLock::new();

fn xmlns_pattern() -> &'static Regex {
    XMLNS_PATTERN
        .get_or_init(|| Regex::new(r#" xmlns(:xlink)?="[^"]+""#).expect("Invalid xmlns pattern"))
}

/// Makes an engine SVG ready for inlining into HTML.
///
/// The accessibility attributes become a `mathjax` class, namespace
/// declarations are dropped, and the escaped source is added as the
/// graphic's `<title>`.
pub fn finish_svg(raw: &str, tex: &str) -> String {
    let marked = raw.replacen(r#"role="img" focusable="false""#, r#"class="mathjax""#, 1);
    let stripped = xmlns_pattern().replace_all(&marked, "");
    let title = format!(
        "<title>{}</title><defs>",
        html_escape::encode_quoted_attribute(tex.trim())
    );
    stripped.replacen("<defs>", &title, 1)
}

/// Adds the delimited source to a CommonHTML fragment as a hidden node.
///
/// The node goes inside the outermost `mjx-container`, or after the
/// fragment when there is none.
pub fn finish_html(raw: &str, tex: &str, inline: bool) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let (open, close) = if inline { ("\\(", "\\)") } else { ("\\[", "\\]") };
    let node = format!(
        r#"<mjx-input-tex aria-hidden="true">{}{}{}</mjx-input-tex>"#,
        open,
        html_escape::encode_text(tex),
        close
    );

    match raw.rfind("</mjx-container>") {
        Some(end) => {
            let mut out = String::with_capacity(raw.len() + node.len());
            out.push_str(&raw[..end]);
            out.push_str(&node);
            out.push_str(&raw[end..]);
            out
        }
        None => format!("{raw}{node}"),
    }
}
