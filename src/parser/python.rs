// Python module loader using tree-sitter
//
// Loading a module means reading and parsing it; nothing in the file is
// executed. Syntax errors surface as load errors, like a failed import.

use crate::config::InspectConfig;
use crate::error::{Error, Result};
use crate::parser::ast::ModuleInfo;
use crate::parser::inspect::Inspector;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};

/// Loader for Python source files
pub struct PythonParser {
    parser: Parser,
    options: InspectConfig,
}

impl PythonParser {
    /// Create a new Python parser
    pub fn new() -> Result<Self> {
        Self::with_options(InspectConfig::default())
    }

    /// Create a parser with explicit inspection settings
    pub fn with_options(options: InspectConfig) -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_python::language();
        parser.set_language(&language).map_err(|e| {
            Error::parser(format!("Failed to set Python language: {}", e))
        })?;
        Ok(Self { parser, options })
    }

    /// Load a Python file and inspect it
    pub fn load(&mut self, path: &Path) -> Result<ModuleInfo> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::load(path, e.to_string()))?;

        let name = module_name(path);
        tracing::debug!(path = %path.display(), module = %name, "loading module");
        self.parse_source(&source, path.to_path_buf(), &name)
    }

    /// Parse Python source code and inspect the resulting module
    pub fn parse_source(&mut self, source: &str, path: PathBuf, name: &str) -> Result<ModuleInfo> {
        let source = source.replace("\r\n", "\n");
        let tree = self
            .parser
            .parse(&source, None)
            .ok_or_else(|| Error::load(&path, "parser produced no syntax tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            let at = first_error(&root).unwrap_or(root);
            let pos = at.start_position();
            return Err(Error::load(
                &path,
                format!("invalid syntax at line {}, column {}", pos.row + 1, pos.column + 1),
            ));
        }

        let inspector = Inspector::new(source.as_bytes(), &self.options);
        let module = inspector.inspect_module(name, path, &root);
        tracing::debug!(
            module = %module.name,
            vars = module.vars.len(),
            functions = module.functions.len(),
            classes = module.classes.len(),
            "inspected module"
        );
        Ok(module)
    }
}

/// Derive the module name from a file path.
///
/// The base file name is cut at its first dot, so `pkg.util.py` becomes
/// `pkg`.
pub fn module_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    match file_name.split('.').next() {
        Some(head) if !head.is_empty() => head.to_string(),
        _ => path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or(file_name),
    }
}

/// Find the first error or missing node, depth first
fn first_error<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(*node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() || child.is_missing() {
            if let Some(found) = first_error(&child) {
                return Some(found);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(source: &str) -> Result<ModuleInfo> {
        let mut parser = PythonParser::new().unwrap();
        parser.parse_source(source, PathBuf::from("test.py"), "test")
    }

    #[test]
    fn test_parser_new() {
        assert!(PythonParser::new().is_ok());
    }

    #[test]
    fn test_empty_file() {
        let module = parse("").unwrap();
        assert_eq!(module.name, "test");
        assert!(module.vars.is_empty() && module.functions.is_empty() && module.classes.is_empty());
        assert!(module.doc.is_empty());
    }

    #[test]
    fn test_syntax_error_is_load_error() {
        let err = parse("def broken(:\n    pass\n").unwrap_err();
        match err {
            Error::Load { path, message } => {
                assert_eq!(path, PathBuf::from("test.py"));
                assert!(message.contains("invalid syntax"), "got {}", message);
            }
            other => panic!("expected load error, got {:?}", other),
        }
    }

    #[test]
    fn test_crlf_source() {
        let module = parse("\"\"\"Doc.\r\nMore.\"\"\"\r\nX = 1\r\n").unwrap();
        assert_eq!(module.doc, "Doc.\nMore.");
        assert_eq!(module.vars.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let mut parser = PythonParser::new().unwrap();
        let err = parser.load(Path::new("/nonexistent/missing.py")).unwrap_err();
        assert!(matches!(err, Error::Load { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::Builder::new()
            .prefix("tools")
            .suffix(".py")
            .tempfile()
            .unwrap();
        writeln!(file, "\"\"\"Tools.\"\"\"\n\ndef run(): pass").unwrap();

        let mut parser = PythonParser::new().unwrap();
        let module = parser.load(file.path()).unwrap();
        assert_eq!(module.name, module_name(file.path()));
        assert_eq!(module.doc, "Tools.");
        assert_eq!(module.functions[0].name, "run");
        assert_eq!(module.path, file.path());
    }

    #[test]
    fn test_module_name() {
        assert_eq!(module_name(Path::new("test.py")), "test");
        assert_eq!(module_name(Path::new("src/pkg/tools.py")), "tools");
        assert_eq!(module_name(Path::new("a.b.py")), "a");
        assert_eq!(module_name(Path::new("script")), "script");
    }
}
