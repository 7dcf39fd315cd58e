// Module, class and function inspection over a parsed syntax tree
//
// The module namespace is rebuilt by replaying the statements that run at
// import time, in source order, so later bindings replace earlier ones.
// Names bound by imports (or resolved to something from outside the module)
// are tracked but never documented.

use crate::config::InspectConfig;
use crate::parser::ast::*;
use crate::parser::literal::{clean_doc, decode_string};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use tree_sitter::Node;

/// What a module-level name is bound to
#[derive(Debug, Clone, Copy)]
enum Binding<'t> {
    /// Value expression of an assignment, or the augmented assignment that
    /// last changed it
    Variable(Node<'t>),
    /// A `function_definition`
    Function(Node<'t>),
    /// A `lambda` expression
    Lambda(Node<'t>),
    /// A `class_definition`
    Class(Node<'t>),
    /// Imported or otherwise owned by another module
    Foreign,
}

/// What a name in a class body is bound to
#[derive(Debug, Clone, Copy)]
enum Member<'t> {
    Method(Node<'t>),
    Lambda(Node<'t>),
    /// Static methods, properties, nested classes, plain attributes
    Other,
}

/// Sorted by name, which is the order members are reported in
type Namespace<'t> = BTreeMap<String, Binding<'t>>;

/// Decorators that turn a `def` in a class body into something other than
/// a method.
const NON_METHOD_DECORATORS: &[&str] = &[
    "staticmethod",
    "property",
    "cached_property",
    "functools.cached_property",
    "abc.abstractproperty",
    "abstractproperty",
];

/// Names provided by Python's `builtins` module (public ones only)
const BUILTIN_NAMES: &[&str] = &[
    "ArithmeticError", "AssertionError", "AttributeError", "BaseException",
    "BaseExceptionGroup", "BlockingIOError", "BrokenPipeError", "BufferError",
    "BytesWarning", "ChildProcessError", "ConnectionAbortedError", "ConnectionError",
    "ConnectionRefusedError", "ConnectionResetError", "DeprecationWarning", "EOFError",
    "Ellipsis", "EncodingWarning", "EnvironmentError", "Exception", "ExceptionGroup",
    "False", "FileExistsError", "FileNotFoundError", "FloatingPointError", "FutureWarning",
    "GeneratorExit", "IOError", "ImportError", "ImportWarning", "IndentationError",
    "IndexError", "InterruptedError", "IsADirectoryError", "KeyError", "KeyboardInterrupt",
    "LookupError", "MemoryError", "ModuleNotFoundError", "NameError", "None",
    "NotADirectoryError", "NotImplemented", "NotImplementedError", "OSError",
    "OverflowError", "PendingDeprecationWarning", "PermissionError", "ProcessLookupError",
    "RecursionError", "ReferenceError", "ResourceWarning", "RuntimeError", "RuntimeWarning",
    "StopAsyncIteration", "StopIteration", "SyntaxError", "SyntaxWarning", "SystemError",
    "SystemExit", "TabError", "TimeoutError", "True", "TypeError", "UnboundLocalError",
    "UnicodeDecodeError", "UnicodeEncodeError", "UnicodeError", "UnicodeTranslateError",
    "UnicodeWarning", "UserWarning", "ValueError", "Warning", "ZeroDivisionError",
    "abs", "aiter", "all", "anext", "any", "ascii", "bin", "bool", "breakpoint",
    "bytearray", "bytes", "callable", "chr", "classmethod", "compile", "complex",
    "copyright", "credits", "delattr", "dict", "dir", "divmod", "enumerate", "eval",
    "exec", "exit", "filter", "float", "format", "frozenset", "getattr", "globals",
    "hasattr", "hash", "help", "hex", "id", "input", "int", "isinstance", "issubclass",
    "iter", "len", "license", "list", "locals", "map", "max", "memoryview", "min",
    "next", "object", "oct", "open", "ord", "pow", "print", "property", "quit", "range",
    "repr", "reversed", "round", "set", "setattr", "slice", "sorted", "staticmethod",
    "str", "sum", "super", "tuple", "type", "vars", "zip",
];

fn is_builtin(name: &str) -> bool {
    BUILTIN_NAMES.contains(&name)
}

/// Named children of a node, comments excluded
fn named_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect()
}

/// Walks one parsed module and builds its [`ModuleInfo`]
pub struct Inspector<'a> {
    source: &'a [u8],
    options: &'a InspectConfig,
}

impl<'a> Inspector<'a> {
    pub fn new(source: &'a [u8], options: &'a InspectConfig) -> Self {
        Self { source, options }
    }

    /// Inspect a module from the root of its syntax tree
    pub fn inspect_module(&self, name: &str, path: PathBuf, root: &Node<'_>) -> ModuleInfo {
        let mut module = ModuleInfo::new(name, path);
        module.doc = self.docstring(root).unwrap_or_default();

        let mut namespace = Namespace::new();
        self.replay_block(root, &mut namespace);

        for key in MetadataKey::ALL {
            if let Some(Binding::Variable(value)) = namespace.get(&key.dunder()) {
                module.author.insert(key, self.value(value).to_string());
            }
        }

        for (member, binding) in &namespace {
            match *binding {
                Binding::Variable(value) => {
                    if !member.starts_with('_') && !is_builtin(member) {
                        module.vars.push(VariableInfo::new(member, self.value(&value)));
                    }
                }
                Binding::Function(def) => {
                    module.functions.push(self.inspect_callable(member, &def, false));
                }
                Binding::Lambda(lambda) => {
                    module.functions.push(self.inspect_lambda(member, &lambda, false));
                }
                Binding::Class(def) => {
                    module.classes.push(self.inspect_class(member, &def, &namespace));
                }
                Binding::Foreign => {
                    tracing::debug!(name = %member, "skipping name owned by another module");
                }
            }
        }

        module
    }

    /// Inspect a `def`, dropping the receiver parameter for methods
    pub fn inspect_callable(&self, name: &str, def: &Node<'_>, method: bool) -> FunctionInfo {
        let mut info = FunctionInfo::new(name);
        if let Some(params) = def.child_by_field_name("parameters") {
            info.args = self.parameters(&params, method);
        }
        if let Some(body) = def.child_by_field_name("body") {
            info.doc = self.docstring(&body).unwrap_or_default();
        }
        info
    }

    /// Inspect a lambda bound to a name; lambdas carry no docstring
    pub fn inspect_lambda(&self, name: &str, lambda: &Node<'_>, method: bool) -> FunctionInfo {
        let mut info = FunctionInfo::new(name);
        if let Some(params) = lambda.child_by_field_name("parameters") {
            info.args = self.parameters(&params, method);
        }
        info
    }

    /// Inspect a class and the methods it exposes, inherited ones included
    fn inspect_class<'t>(&self, name: &str, def: &Node<'t>, namespace: &Namespace<'t>) -> ClassInfo {
        let mut info = ClassInfo::new(name);

        if self.options.class_docs {
            if let Some(body) = def.child_by_field_name("body") {
                info.doc = self.docstring(&body).unwrap_or_default();
            }
        }

        let mut visited = HashSet::new();
        for (member, kind) in self.class_members(def, namespace, &mut visited) {
            match kind {
                Member::Method(node) => info.methods.push(self.inspect_callable(&member, &node, true)),
                Member::Lambda(node) => info.methods.push(self.inspect_lambda(&member, &node, true)),
                Member::Other => {}
            }
        }

        info
    }

    /// Members of a class: its own body first, then bases defined in this
    /// module, depth first and left to right.
    fn class_members<'t>(
        &self,
        def: &Node<'t>,
        namespace: &Namespace<'t>,
        visited: &mut HashSet<usize>,
    ) -> BTreeMap<String, Member<'t>> {
        let mut members = BTreeMap::new();
        if !visited.insert(def.id()) {
            return members;
        }

        if let Some(body) = def.child_by_field_name("body") {
            for statement in named_children(&body) {
                self.bind_member(&statement, &mut members);
            }
        }

        if let Some(bases) = def.child_by_field_name("superclasses") {
            for base in named_children(&bases) {
                if base.kind() != "identifier" {
                    continue;
                }
                if let Some(Binding::Class(base_def)) = namespace.get(&self.text(&base)) {
                    for (name, member) in self.class_members(base_def, namespace, visited) {
                        members.entry(name).or_insert(member);
                    }
                }
            }
        }

        members
    }

    fn bind_member<'t>(&self, statement: &Node<'t>, members: &mut BTreeMap<String, Member<'t>>) {
        match statement.kind() {
            "function_definition" => {
                if let Some(name) = self.field_text(statement, "name") {
                    members.insert(name, Member::Method(*statement));
                }
            }
            "decorated_definition" => {
                let Some(def) = statement.child_by_field_name("definition") else {
                    return;
                };
                let Some(name) = self.field_text(&def, "name") else {
                    return;
                };
                let member = if def.kind() == "function_definition"
                    && !self.decorators(statement).iter().any(|d| is_non_method_decorator(d))
                {
                    Member::Method(def)
                } else {
                    Member::Other
                };
                members.insert(name, member);
            }
            "class_definition" => {
                if let Some(name) = self.field_text(statement, "name") {
                    members.insert(name, Member::Other);
                }
            }
            "expression_statement" => {
                for expr in named_children(statement) {
                    let Some((targets, value)) = assignment_parts(&expr) else {
                        continue;
                    };
                    for target in targets.iter().filter(|t| t.kind() == "identifier") {
                        let member = if value.kind() == "lambda" {
                            Member::Lambda(value)
                        } else {
                            Member::Other
                        };
                        members.insert(self.text(target), member);
                    }
                }
            }
            _ => {}
        }
    }

    /// Decorator names without `@` and call arguments
    fn decorators(&self, decorated: &Node<'_>) -> Vec<String> {
        named_children(decorated)
            .iter()
            .filter(|c| c.kind() == "decorator")
            .map(|c| {
                let text = self.text(c);
                let name = text.trim_start_matches('@');
                let name = name.split('(').next().unwrap_or(name);
                name.trim().to_string()
            })
            .collect()
    }

    fn replay_block<'t>(&self, block: &Node<'t>, namespace: &mut Namespace<'t>) {
        for statement in named_children(block) {
            self.replay_statement(&statement, namespace);
        }
    }

    fn replay_statement<'t>(&self, statement: &Node<'t>, namespace: &mut Namespace<'t>) {
        match statement.kind() {
            "function_definition" => {
                if let Some(name) = self.field_text(statement, "name") {
                    namespace.insert(name, Binding::Function(*statement));
                }
            }
            "class_definition" => {
                if let Some(name) = self.field_text(statement, "name") {
                    namespace.insert(name, Binding::Class(*statement));
                }
            }
            "decorated_definition" => {
                if let Some(def) = statement.child_by_field_name("definition") {
                    self.replay_statement(&def, namespace);
                }
            }
            "expression_statement" => {
                for expr in named_children(statement) {
                    if expr.kind() == "augmented_assignment" {
                        self.rebind_augmented(&expr, namespace);
                    } else if let Some((targets, value)) = assignment_parts(&expr) {
                        for target in &targets {
                            self.bind_target(target, value, namespace);
                        }
                    }
                }
            }
            "import_statement" | "import_from_statement" | "future_import_statement" => {
                self.bind_imports(statement, namespace);
            }
            "delete_statement" => {
                for target in named_children(statement) {
                    self.unbind(&target, namespace);
                }
            }
            "if_statement" => self.replay_if(statement, namespace),
            "for_statement" | "while_statement" => self.replay_loop(statement, namespace),
            "try_statement" => self.replay_try(statement, namespace),
            "with_statement" => {
                if let Some(body) = statement.child_by_field_name("body") {
                    self.replay_block(&body, namespace);
                }
            }
            _ => {}
        }
    }

    fn bind_target<'t>(&self, target: &Node<'t>, value: Node<'t>, namespace: &mut Namespace<'t>) {
        match target.kind() {
            "identifier" => {
                let binding = self.binding_for(&value, namespace);
                namespace.insert(self.text(target), binding);
            }
            "pattern_list" | "tuple_pattern" | "list_pattern" => {
                let targets = named_children(target);
                let values = match value.kind() {
                    "expression_list" | "tuple" | "list" => named_children(&value),
                    _ => Vec::new(),
                };
                let splat = targets.iter().any(|t| t.kind() == "list_splat_pattern")
                    || values.iter().any(|v| v.kind() == "list_splat");

                if !splat && targets.len() == values.len() {
                    for (t, v) in targets.iter().zip(values) {
                        self.bind_target(t, v, namespace);
                    }
                } else {
                    tracing::debug!(
                        line = target.start_position().row + 1,
                        "unpacking without matching literal values"
                    );
                    self.bind_unknown(target, namespace);
                }
            }
            _ => {}
        }
    }

    /// Rebind every name in a target to a value we cannot see statically
    fn bind_unknown<'t>(&self, target: &Node<'t>, namespace: &mut Namespace<'t>) {
        match target.kind() {
            "identifier" => {
                namespace.insert(self.text(target), Binding::Foreign);
            }
            _ => {
                for inner in named_children(target) {
                    self.bind_unknown(&inner, namespace);
                }
            }
        }
    }

    fn binding_for<'t>(&self, value: &Node<'t>, namespace: &Namespace<'t>) -> Binding<'t> {
        match value.kind() {
            "lambda" => Binding::Lambda(*value),
            // Aliasing another name shares its binding
            "identifier" => namespace
                .get(&self.text(value))
                .copied()
                .unwrap_or(Binding::Foreign),
            // Attributes of, and objects made by, another module belong to it
            "attribute" | "call" | "subscript" => {
                let root = expression_root(value);
                match root.kind() {
                    "identifier" => match namespace.get(&self.text(&root)) {
                        Some(Binding::Foreign) | None => Binding::Foreign,
                        Some(_) => Binding::Variable(*value),
                    },
                    _ => Binding::Variable(*value),
                }
            }
            _ => Binding::Variable(*value),
        }
    }

    /// `x += 1` keeps a module variable but its literal value is gone
    fn rebind_augmented<'t>(&self, node: &Node<'t>, namespace: &mut Namespace<'t>) {
        let Some(target) = node.child_by_field_name("left") else {
            return;
        };
        if target.kind() != "identifier" {
            return;
        }
        let name = self.text(&target);
        let binding = match namespace.get(&name) {
            Some(Binding::Variable(_)) => Binding::Variable(*node),
            _ => Binding::Foreign,
        };
        namespace.insert(name, binding);
    }

    fn bind_imports<'t>(&self, statement: &Node<'t>, namespace: &mut Namespace<'t>) {
        let mut cursor = statement.walk();
        let names: Vec<Node<'t>> = statement
            .children_by_field_name("name", &mut cursor)
            .collect();

        for name in names {
            let bound = match name.kind() {
                "aliased_import" => self.field_text(&name, "alias"),
                // `import a.b` binds `a`
                "dotted_name" if statement.kind() == "import_statement" => {
                    name.named_child(0).map(|first| self.text(&first))
                }
                "dotted_name" | "identifier" => Some(self.text(&name)),
                _ => None,
            };
            if let Some(bound) = bound {
                namespace.insert(bound, Binding::Foreign);
            }
        }
    }

    fn unbind(&self, target: &Node<'_>, namespace: &mut Namespace<'_>) {
        match target.kind() {
            "identifier" => {
                namespace.remove(&self.text(target));
            }
            "expression_list" | "tuple" | "list" | "parenthesized_expression" => {
                for inner in named_children(target) {
                    self.unbind(&inner, namespace);
                }
            }
            _ => {}
        }
    }

    fn replay_if<'t>(&self, statement: &Node<'t>, namespace: &mut Namespace<'t>) {
        let main_guard = statement
            .child_by_field_name("condition")
            .is_some_and(|c| self.is_main_guard(&c));

        if main_guard {
            tracing::debug!("skipping __main__ block");
        } else if let Some(body) = statement.child_by_field_name("consequence") {
            self.replay_block(&body, namespace);
        }

        let mut cursor = statement.walk();
        let alternatives: Vec<Node<'t>> = statement
            .children_by_field_name("alternative", &mut cursor)
            .collect();
        for alternative in alternatives {
            let body = match alternative.kind() {
                "elif_clause" => alternative.child_by_field_name("consequence"),
                "else_clause" => alternative.child_by_field_name("body"),
                _ => None,
            };
            if let Some(body) = body {
                self.replay_block(&body, namespace);
            }
        }
    }

    /// A loop target keeps the last item it was bound to. That item is only
    /// known for a literal sequence iterated without `break`.
    fn replay_loop<'t>(&self, statement: &Node<'t>, namespace: &mut Namespace<'t>) {
        if let Some(target) = statement.child_by_field_name("left") {
            let last = statement
                .child_by_field_name("right")
                .filter(|seq| matches!(seq.kind(), "tuple" | "list"))
                .and_then(|seq| named_children(&seq).pop())
                .filter(|item| item.kind() != "list_splat");
            let exits_early = statement
                .child_by_field_name("body")
                .is_some_and(|body| contains_break(&body));

            match last {
                Some(item) if !exits_early => self.bind_target(&target, item, namespace),
                _ => self.bind_unknown(&target, namespace),
            }
        }
        if let Some(body) = statement.child_by_field_name("body") {
            self.replay_block(&body, namespace);
        }
        if let Some(body) = statement
            .child_by_field_name("alternative")
            .and_then(|clause| clause.child_by_field_name("body"))
        {
            self.replay_block(&body, namespace);
        }
    }

    fn replay_try<'t>(&self, statement: &Node<'t>, namespace: &mut Namespace<'t>) {
        if let Some(body) = statement.child_by_field_name("body") {
            self.replay_block(&body, namespace);
        }
        for clause in named_children(statement) {
            let body = match clause.kind() {
                "except_clause" | "except_group_clause" | "finally_clause" => {
                    named_children(&clause).into_iter().find(|c| c.kind() == "block")
                }
                "else_clause" => clause.child_by_field_name("body"),
                _ => None,
            };
            if let Some(body) = body {
                self.replay_block(&body, namespace);
            }
        }
    }

    /// `__name__ == "__main__"`, with the operands in either order
    fn is_main_guard(&self, condition: &Node<'_>) -> bool {
        let condition = unparenthesize(condition);
        if condition.kind() != "comparison_operator" {
            return false;
        }
        let mut cursor = condition.walk();
        let is_equality = condition.children(&mut cursor).any(|c| c.kind() == "==");
        let operands: Vec<Node<'_>> = named_children(&condition).iter().map(unparenthesize).collect();
        if !is_equality || operands.len() != 2 {
            return false;
        }

        let is_name = |n: &Node<'_>| n.kind() == "identifier" && self.text(n) == "__name__";
        let is_main = |n: &Node<'_>| self.string_value(n).as_deref() == Some("__main__");
        (is_name(&operands[0]) && is_main(&operands[1]))
            || (is_main(&operands[0]) && is_name(&operands[1]))
    }

    /// Parameter display strings
    fn parameters(&self, params: &Node<'_>, drop_receiver: bool) -> Vec<String> {
        let mut args = Vec::new();
        let mut receiver_pending = drop_receiver;

        for param in named_children(params) {
            let display = match param.kind() {
                "identifier" | "list_splat_pattern" | "dictionary_splat_pattern" | "tuple_pattern" => {
                    Some(self.text(&param))
                }
                "typed_parameter" => named_children(&param).first().map(|name| self.text(name)),
                "default_parameter" | "typed_default_parameter" => {
                    let name = self.field_text(&param, "name");
                    let default = param.child_by_field_name("value").map(|v| self.value(&v));
                    match (name, default) {
                        (Some(name), Some(default)) => Some(format!("{}={}", name, default)),
                        (name, None) => name,
                        (None, Some(_)) => None,
                    }
                }
                // `*` and `/` separators
                _ => None,
            };

            let Some(display) = display else {
                continue;
            };
            if receiver_pending {
                receiver_pending = false;
                if !display.starts_with('*') {
                    continue;
                }
            }
            args.push(display);
        }

        args
    }

    /// Leading string literal of a module or block, cleaned
    fn docstring(&self, block: &Node<'_>) -> Option<String> {
        let first = named_children(block).into_iter().next()?;
        if first.kind() != "expression_statement" {
            return None;
        }
        let exprs = named_children(&first);
        if exprs.len() != 1 {
            return None;
        }
        self.string_value(&exprs[0]).map(|doc| clean_doc(&doc))
    }

    /// Decoded text of a string literal or implicit concatenation
    fn string_value(&self, node: &Node<'_>) -> Option<String> {
        match node.kind() {
            "string" => decode_string(&self.text(node)),
            "concatenated_string" => named_children(node)
                .iter()
                .map(|part| decode_string(&self.text(part)))
                .collect(),
            _ => None,
        }
    }

    /// Display value of an expression, as `str()` would show it
    fn value(&self, node: &Node<'_>) -> Value {
        match self.string_value(node) {
            Some(s) => Value::Str(s),
            None => Value::Expr(single_line(&self.text(node))),
        }
    }

    fn field_text(&self, node: &Node<'_>, field: &str) -> Option<String> {
        node.child_by_field_name(field).map(|n| self.text(&n))
    }

    fn text(&self, node: &Node<'_>) -> String {
        node.utf8_text(self.source).unwrap_or_default().to_string()
    }
}

/// Innermost object of an attribute chain or call, e.g. `logging` in
/// `logging.getLogger(__name__).getChild("x")`
fn expression_root<'t>(node: &Node<'t>) -> Node<'t> {
    let mut root = *node;
    loop {
        let next = match root.kind() {
            "attribute" => root.child_by_field_name("object"),
            "call" => root.child_by_field_name("function"),
            "subscript" => root.child_by_field_name("value"),
            "parenthesized_expression" => named_children(&root).into_iter().next(),
            _ => None,
        };
        match next {
            Some(inner) => root = inner,
            None => return root,
        }
    }
}

/// Whether a loop body can leave its own loop through `break`
fn contains_break(node: &Node<'_>) -> bool {
    named_children(node).iter().any(|child| match child.kind() {
        "break_statement" => true,
        "for_statement" | "while_statement" | "function_definition" | "class_definition" => {
            // A nested loop's `else` still belongs to the outer loop
            child
                .child_by_field_name("alternative")
                .is_some_and(|clause| contains_break(&clause))
        }
        _ => contains_break(child),
    })
}

/// Strip redundant parentheses around an expression
fn unparenthesize<'t>(node: &Node<'t>) -> Node<'t> {
    let mut node = *node;
    while node.kind() == "parenthesized_expression" {
        match named_children(&node).into_iter().next() {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// Source text of an expression on a single line
fn single_line(text: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        let line = line.trim();
        let line = line.strip_suffix('\\').map(str::trim_end).unwrap_or(line);
        if line.is_empty() {
            continue;
        }
        let opens = out.ends_with(|c: char| matches!(c, '(' | '[' | '{'));
        let closes = line.starts_with(|c: char| matches!(c, ')' | ']' | '}'));
        if !out.is_empty() && !opens && !closes {
            out.push(' ');
        }
        out.push_str(line);
    }
    out
}

fn is_non_method_decorator(decorator: &str) -> bool {
    NON_METHOD_DECORATORS.contains(&decorator)
        || decorator.ends_with(".setter")
        || decorator.ends_with(".getter")
        || decorator.ends_with(".deleter")
}

/// Targets and final value of a (possibly chained) assignment.
///
/// `a = b = 1` yields `[a, b]` and `1`. Annotations without a value yield
/// `None`, since they bind nothing.
fn assignment_parts<'t>(node: &Node<'t>) -> Option<(Vec<Node<'t>>, Node<'t>)> {
    if node.kind() != "assignment" {
        return None;
    }
    let mut targets = Vec::new();
    let mut current = *node;
    loop {
        if let Some(left) = current.child_by_field_name("left") {
            targets.push(left);
        }
        match current.child_by_field_name("right") {
            Some(right) if right.kind() == "assignment" => current = right,
            Some(right) => return Some((targets, right)),
            None => return None,
        }
    }
}
