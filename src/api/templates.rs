//! Embedded HTML page templates
//!
//! Templates use `%NAME%` placeholders. Substitution is a single pass, so a
//! substituted value can never introduce another placeholder.

use rust_embed::Embed;

use crate::errors::{Result, ShortifyError};

#[derive(Embed)]
#[folder = "templates/"]
struct PageTemplates;

pub const SHORTENER_PAGE: &str = "shortener.html";
pub const RELAY_PAGE: &str = "relay.html";

/// Load an embedded template and fill in its placeholders.
///
/// Values are inserted as-is; callers escape user input with [`escape_html`].
pub fn render_template(name: &str, vars: &[(&str, &str)]) -> Result<String> {
    let file = PageTemplates::get(name)
        .ok_or_else(|| ShortifyError::template(format!("Template not found: {}", name)))?;
    let source = std::str::from_utf8(&file.data)
        .map_err(|e| ShortifyError::template(format!("Template {} is not UTF-8: {}", name, e)))?;

    Ok(substitute(source, vars))
}

fn substitute(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let replacement = after.find('%').and_then(|end| {
            let name = &after[..end];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, end))
        });

        match replacement {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                // 不是已知占位符，原样保留
                out.push('%');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
