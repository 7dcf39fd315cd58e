// Parser module for loading Python files and inspecting their members

pub mod ast;
mod inspect;
mod literal;
mod python;

pub use ast::*;
pub use inspect::Inspector;
pub use literal::{clean_doc, decode_string};
pub use python::{module_name, PythonParser};
