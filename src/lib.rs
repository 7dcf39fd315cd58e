//! doc2md - Generate Markdown documentation from Python modules
//!
//! Parses Python source files with tree-sitter, rebuilds each module's
//! namespace without running any of its code, and renders one Markdown
//! page per module.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod parser;

// Re-export main types
pub use config::Config;
pub use error::{Error, Result};
pub use output::{render, MarkdownRenderer};
pub use parser::{ClassInfo, FunctionInfo, MetadataKey, ModuleInfo, PythonParser, Value, VariableInfo};
