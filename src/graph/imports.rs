// src/graph/imports.rs
use tree_sitter::{Language, Node, Parser, Query, QueryCursor};

const IMPORTS_QUERY: &str = r"
    (import_statement) @import
    (import_from_statement) @import
";

/// What an import statement names, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportTarget {
    /// `import a.b.c` (one per comma-separated name).
    Module(String),
    /// `from <level dots><module> import <names>`; `names` is empty for `*`.
    From {
        level: usize,
        module: String,
        names: Vec<String>,
    },
}

impl ImportTarget {
    /// Source-like spelling, used in diagnostics.
    #[must_use]
    pub fn reference(&self) -> String {
        match self {
            Self::Module(path) => path.clone(),
            Self::From { level, module, .. } => format!("{}{module}", ".".repeat(*level)),
        }
    }
}

/// One import statement found in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImport {
    pub target: ImportTarget,
    /// 1-based.
    pub line: usize,
    /// Number of enclosing `def` bodies.
    pub nesting_depth: usize,
}

impl RawImport {
    #[must_use]
    pub fn is_top_level(&self) -> bool {
        self.nesting_depth == 0
    }
}

/// Why a file yielded no imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub line: Option<usize>,
    pub message: String,
}

/// Extracts the import statements of a Python source file.
///
/// # Errors
/// Returns a [`ParseFailure`] if the source contains syntax errors; the
/// caller skips the file.
pub fn extract(source: &str) -> Result<Vec<RawImport>, ParseFailure> {
    let grammar = tree_sitter_python::language();

    let mut parser = Parser::new();
    parser.set_language(grammar).map_err(|e| ParseFailure {
        line: None,
        message: format!("grammar rejected: {e}"),
    })?;

    let Some(tree) = parser.parse(source, None) else {
        return Err(ParseFailure {
            line: None,
            message: "parser produced no tree".to_string(),
        });
    };

    let root = tree.root_node();
    if root.has_error() {
        return Err(ParseFailure {
            line: first_error_line(root),
            message: "syntax error".to_string(),
        });
    }

    let query = compile_query(grammar)?;
    Ok(run_query(source, root, &query))
}

fn compile_query(lang: Language) -> Result<Query, ParseFailure> {
    Query::new(lang, IMPORTS_QUERY).map_err(|e| ParseFailure {
        line: None,
        message: format!("invalid import query: {e}"),
    })
}

fn run_query(source: &str, root: Node<'_>, query: &Query) -> Vec<RawImport> {
    let bytes = source.as_bytes();
    let mut cursor = QueryCursor::new();
    let mut imports = Vec::new();

    for m in cursor.matches(query, root, bytes) {
        for capture in m.captures {
            let node = capture.node;
            let line = node.start_position().row + 1;
            let nesting_depth = nesting_depth(node);

            let targets = match node.kind() {
                "import_statement" => decode_import(node, bytes),
                "import_from_statement" => decode_from(node, bytes).into_iter().collect(),
                _ => Vec::new(),
            };

            imports.extend(targets.into_iter().map(|target| RawImport {
                target,
                line,
                nesting_depth,
            }));
        }
    }

    imports.sort_by_key(|i| i.line);
    imports
}

/// Counts enclosing function definitions. Class bodies and module-level
/// `if`/`try`/`with` blocks run at import time, so they don't count.
fn nesting_depth(node: Node<'_>) -> usize {
    let mut depth = 0;
    let mut current = node.parent();
    while let Some(n) = current {
        if n.kind() == "function_definition" {
            depth += 1;
        }
        current = n.parent();
    }
    depth
}

fn decode_import(node: Node<'_>, bytes: &[u8]) -> Vec<ImportTarget> {
    let mut cursor = node.walk();
    let targets: Vec<ImportTarget> = node
        .children_by_field_name("name", &mut cursor)
        .filter_map(|name| imported_name(name, bytes))
        .map(ImportTarget::Module)
        .collect();
    targets
}

fn decode_from(node: Node<'_>, bytes: &[u8]) -> Option<ImportTarget> {
    let module_node = node.child_by_field_name("module_name")?;
    let (level, module) = match module_node.kind() {
        "relative_import" => decode_relative(module_node, bytes),
        _ => (0, dotted_text(module_node, bytes)?),
    };

    let mut cursor = node.walk();
    let names = node
        .children_by_field_name("name", &mut cursor)
        .filter_map(|name| imported_name(name, bytes))
        .collect();

    Some(ImportTarget::From {
        level,
        module,
        names,
    })
}

fn decode_relative(node: Node<'_>, bytes: &[u8]) -> (usize, String) {
    let mut level = 0;
    let mut module = String::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_prefix" => {
                level = child
                    .utf8_text(bytes)
                    .map_or(0, |t| t.chars().filter(|c| *c == '.').count());
            }
            "dotted_name" => {
                module = dotted_text(child, bytes).unwrap_or_default();
            }
            _ => {}
        }
    }
    (level, module)
}

/// `a.b` or the `a.b` of `a.b as c`.
fn imported_name(node: Node<'_>, bytes: &[u8]) -> Option<String> {
    match node.kind() {
        "dotted_name" => dotted_text(node, bytes),
        "aliased_import" => dotted_text(node.child_by_field_name("name")?, bytes),
        _ => None,
    }
}

fn dotted_text(node: Node<'_>, bytes: &[u8]) -> Option<String> {
    let text = node.utf8_text(bytes).ok()?;
    let cleaned: Vec<&str> = text.split('.').map(str::trim).collect();
    if cleaned.iter().any(|part| part.is_empty()) {
        return None;
    }
    Some(cleaned.join("."))
}

fn first_error_line(root: Node<'_>) -> Option<usize> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node.start_position().row + 1);
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node
            .children(&mut cursor)
            .filter(|c| c.has_error() || c.is_error() || c.is_missing())
            .collect();
        stack.extend(children.into_iter().rev());
    }
    None
}
