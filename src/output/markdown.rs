// Markdown renderer
//
// Turns an inspected module into a single Markdown page. Lines that must
// stay separate end in two spaces, which Markdown renders as a hard break.

use crate::config::RenderConfig;
use crate::parser::{ClassInfo, FunctionInfo, MetadataKey, ModuleInfo};

const NO_FUNCTION_DOC: &str = "No documentation for this function";
const NO_CLASS_DOC: &str = "No documentation for this class";
const NO_METHOD_DOC: &str = "No documentation for this method";

/// Metadata lines shown below the author, in this order
const METADATA_LINES: [(&str, MetadataKey); 3] = [
    ("Version", MetadataKey::Version),
    ("Copyright", MetadataKey::Copyright),
    ("License", MetadataKey::License),
];

/// Renders [`ModuleInfo`] pages
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    options: RenderConfig,
}

impl MarkdownRenderer {
    pub fn new(options: RenderConfig) -> Self {
        Self { options }
    }

    /// Render a module page. Never fails; empty sections are left out.
    pub fn render(&self, module: &ModuleInfo) -> String {
        let mut md = String::new();

        md.push_str(&format!("# {}  \n", module.name));
        md.push_str(&fmt_doc(&module.doc));
        md.push_str("  \n");

        render_metadata(&mut md, module);

        if !module.vars.is_empty() {
            md.push_str("\n## Variables\n");
            for var in &module.vars {
                md.push_str(&format!(" - `{}`: {}\n", var.name, var.value));
            }
        }

        if !module.functions.is_empty() {
            md.push_str("\n\n## Functions\n");
            for func in module.functions.iter().filter(|f| !f.is_private()) {
                render_function(&mut md, func);
            }
        }

        if !module.classes.is_empty() {
            md.push_str("\n\n## Classes\n");
            for class in &module.classes {
                self.render_class(&mut md, class);
            }
        }

        md
    }

    fn render_class(&self, md: &mut String, class: &ClassInfo) {
        md.push_str(&format!("\n\n### class `{}()`\n", class.name));
        let doc = fmt_doc(&class.doc);
        if doc.is_empty() {
            md.push_str(NO_CLASS_DOC);
        } else {
            md.push_str(&doc);
        }
        md.push_str("  ");

        md.push_str("\n\n### Methods:\n");
        for method in class.visible_methods() {
            md.push_str(&format!("\n\n#### def `{}`\n", method.signature()));
            let doc = fmt_doc(&method.doc);
            if doc.is_empty() && self.options.method_placeholder {
                md.push_str(NO_METHOD_DOC);
            } else {
                md.push_str(&doc);
            }
            md.push_str("  ");
        }
    }
}

/// Render a module page with default options
pub fn render(module: &ModuleInfo) -> String {
    MarkdownRenderer::default().render(module)
}

fn render_metadata(md: &mut String, module: &ModuleInfo) {
    let mut author = String::new();
    if let Some(name) = module.metadata(MetadataKey::Author) {
        author.push_str(name);
        author.push(' ');
    }
    if let Some(email) = module.metadata(MetadataKey::Email) {
        author.push_str(&format!("<{}>", email));
    }
    if !author.is_empty() {
        md.push_str(&format!("\n __Author__: {}  \n", author));
    }

    for (label, key) in METADATA_LINES {
        if let Some(value) = module.metadata(key) {
            md.push_str(&format!(" __{}__: {}  \n", label, value));
        }
    }
}

fn render_function(md: &mut String, func: &FunctionInfo) {
    md.push_str(&format!("\n\n### `{}`\n", func.signature()));
    let doc = fmt_doc(&func.doc);
    if doc.is_empty() {
        md.push_str(NO_FUNCTION_DOC);
        md.push_str("  ");
    } else {
        md.push_str(&doc);
    }
}

/// Format a docstring: every line trimmed and ended with a hard break,
/// trailing whitespace of the whole block removed.
pub fn fmt_doc(doc: &str) -> String {
    let mut out = String::new();
    for line in split_lines(doc.trim_start()) {
        out.push_str(line.trim());
        out.push_str("  \n");
    }
    out.truncate(out.trim_end().len());
    out
}

/// Split on every line boundary Python's `str.splitlines` recognizes
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let is_break = matches!(
            c,
            '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}'
                | '\u{85}' | '\u{2028}' | '\u{2029}'
        );
        if !is_break {
            continue;
        }
        lines.push(&text[start..i]);
        let mut end = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                end = j + 1;
            }
        }
        start = end;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }

    lines
}
