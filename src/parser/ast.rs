// Inspection results for a single Python module
//
// Built bottom-up by the inspector and never mutated afterwards. A fresh
// `ModuleInfo` is produced for every inspected file.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Everything documented about one module
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleInfo {
    /// Module name derived from the file name
    pub name: String,
    /// Source file the module was loaded from
    pub path: PathBuf,
    /// Recognized metadata attributes that were present
    pub author: BTreeMap<MetadataKey, String>,
    /// Cleaned module docstring, empty when absent
    pub doc: String,
    /// Public module-level variables, sorted by name
    pub vars: Vec<VariableInfo>,
    /// Functions defined in this module, sorted by name
    pub functions: Vec<FunctionInfo>,
    /// Classes defined in this module, sorted by name
    pub classes: Vec<ClassInfo>,
}

impl ModuleInfo {
    pub fn new(name: &str, path: PathBuf) -> Self {
        Self {
            name: name.to_string(),
            path,
            author: BTreeMap::new(),
            doc: String::new(),
            vars: Vec::new(),
            functions: Vec::new(),
            classes: Vec::new(),
        }
    }

    /// Look up a captured metadata attribute
    pub fn metadata(&self, key: MetadataKey) -> Option<&str> {
        self.author.get(&key).map(String::as_str)
    }
}

/// Module metadata attributes recognized by the inspector
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataKey {
    Author,
    Copyright,
    License,
    Version,
    Maintainer,
    Email,
}

impl MetadataKey {
    pub const ALL: [MetadataKey; 6] = [
        MetadataKey::Author,
        MetadataKey::Copyright,
        MetadataKey::License,
        MetadataKey::Version,
        MetadataKey::Maintainer,
        MetadataKey::Email,
    ];

    /// Bare attribute name, e.g. `version`
    pub fn name(self) -> &'static str {
        match self {
            MetadataKey::Author => "author",
            MetadataKey::Copyright => "copyright",
            MetadataKey::License => "license",
            MetadataKey::Version => "version",
            MetadataKey::Maintainer => "maintainer",
            MetadataKey::Email => "email",
        }
    }

    /// Module attribute holding the value, e.g. `__version__`
    pub fn dunder(self) -> String {
        format!("__{}__", self.name())
    }
}

/// A module-level variable
#[derive(Debug, Clone, PartialEq)]
pub struct VariableInfo {
    pub name: String,
    pub value: Value,
}

impl VariableInfo {
    pub fn new(name: &str, value: Value) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

/// A value bound in source, displayed the way `str()` would show it
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string literal, already decoded
    Str(String),
    /// Any other expression, kept as written
    Expr(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) | Value::Expr(s) => f.write_str(s),
        }
    }
}

/// A function or method
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionInfo {
    pub name: String,
    /// Parameter display strings: `name`, `name=default`, `*args`, `**kwargs`
    pub args: Vec<String>,
    /// Cleaned docstring, empty when absent
    pub doc: String,
}

impl FunctionInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            args: Vec::new(),
            doc: String::new(),
        }
    }

    /// Check if this is a private function (starts with _)
    pub fn is_private(&self) -> bool {
        self.name.starts_with('_')
    }

    /// Check if this is the constructor
    pub fn is_constructor(&self) -> bool {
        self.name == "__init__"
    }

    /// Display signature, e.g. `greet(name, greeting=Hello)`
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.args.join(", "))
    }
}

/// A class and its methods
#[derive(Debug, Clone, PartialEq)]
pub struct ClassInfo {
    pub name: String,
    /// Class docstring; only filled when class docs are enabled
    pub doc: String,
    /// Methods sorted by name, private ones included
    pub methods: Vec<FunctionInfo>,
}

impl ClassInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            doc: String::new(),
            methods: Vec::new(),
        }
    }

    /// Methods that show up in rendered output
    pub fn visible_methods(&self) -> impl Iterator<Item = &FunctionInfo> {
        self.methods
            .iter()
            .filter(|m| m.is_constructor() || !m.is_private())
    }
}
