//! LaTeX escaping and the fixed document wrapper

/// Text embedded when no extracted text is available
pub const PLACEHOLDER_TEXT: &str =
    "Text extraction is not available for this document. Please check the uploaded file.";

const DOCUMENT_PREAMBLE: &str = "\\documentclass{article}\n\
\\usepackage[utf8]{inputenc}\n\
\\usepackage[T1]{fontenc}\n\
\\begin{document}\n";

const DOCUMENT_END: &str = "\n\\end{document}\n";

/// Escape text so it can be embedded verbatim in a LaTeX body.
///
/// Form feeds (page breaks emitted by `pdftotext`) become `\newpage`.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);

    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '%' => out.push_str("\\%"),
            '$' => out.push_str("\\$"),
            '#' => out.push_str("\\#"),
            '_' => out.push_str("\\_"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '&' => out.push_str("\\&"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '\u{000C}' => out.push_str("\n\\newpage\n"),
            _ => out.push(c),
        }
    }

    out
}

/// Wrap an already-escaped body in the fixed article template.
pub fn render_document(escaped_body: &str) -> String {
    let mut doc =
        String::with_capacity(DOCUMENT_PREAMBLE.len() + escaped_body.len() + DOCUMENT_END.len());
    doc.push_str(DOCUMENT_PREAMBLE);
    doc.push_str(escaped_body);
    doc.push_str(DOCUMENT_END);
    doc
}
