// src/discovery.rs
//! Source scanning: which `.py` files take part in the run, and under which
//! module id.

use crate::config::Config;
use crate::error::{Diagnostic, OuroError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories that never hold project sources.
pub const PRUNE_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "__pycache__",
    ".venv",
    "venv",
    ".tox",
    ".nox",
    ".eggs",
    ".mypy_cache",
    ".pytest_cache",
    ".ruff_cache",
    "node_modules",
    "site-packages",
    "build",
    "dist",
];

pub const PACKAGE_MARKER: &str = "__init__.py";

/// Id given to an `__init__.py` sitting directly in the project root.
pub const ROOT_INIT_ID: &str = "__init__";

/// A scanned file and the module id it is known by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Dotted path relative to the project root.
    pub module_id: String,
    /// Dotted path of the file's import root (nearest non-package ancestor,
    /// never above the project root). Empty when that is the root itself.
    pub import_prefix: String,
    pub is_package: bool,
}

/// Everything discovery produced.
#[derive(Debug, Default)]
pub struct Scan {
    /// Ordered by module id.
    pub files: Vec<SourceFile>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs the file discovery pipeline for `config.path` and keeps only the
/// file list.
///
/// # Errors
/// See [`scan`].
pub fn discover(config: &Config) -> Result<Vec<SourceFile>> {
    Ok(scan(config)?.files)
}

/// Runs the file discovery pipeline for `config.path`.
///
/// When two files claim the same id (`a.py` next to `a/__init__.py`) the
/// package wins, as it does for the interpreter; otherwise the first path in
/// walk order wins. The loser is reported as a [`Diagnostic::DuplicateModule`].
///
/// # Errors
/// Returns error if the root is missing or not a directory, or an ignore
/// pattern is not a valid glob.
pub fn scan(config: &Config) -> Result<Scan> {
    let root = validate_root(&config.path)?;
    let ignore = build_ignore_set(&config.ignore)?;

    let paths = walk_filesystem(&root, &ignore);
    let mut packages = PackageCache::default();
    let mut by_id: BTreeMap<String, SourceFile> = BTreeMap::new();
    let mut diagnostics = Vec::new();

    for path in paths {
        let Some(file) = source_file(&root, path, &mut packages) else {
            continue;
        };
        let shadowed = match by_id.entry(file.module_id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(file);
                continue;
            }
            Entry::Occupied(mut slot) => {
                if file.is_package && !slot.get().is_package {
                    slot.insert(file)
                } else {
                    file
                }
            }
        };
        let kept = by_id
            .get(&shadowed.module_id)
            .map(|f| f.path.clone())
            .unwrap_or_default();
        tracing::warn!(
            module = %shadowed.module_id,
            kept = %kept.display(),
            shadowed = %shadowed.path.display(),
            "two files map to the same module id"
        );
        diagnostics.push(Diagnostic::DuplicateModule {
            module: shadowed.module_id,
            kept,
            shadowed: shadowed.path,
        });
    }

    tracing::debug!(files = by_id.len(), root = %root.display(), "discovery finished");
    Ok(Scan {
        files: by_id.into_values().collect(),
        diagnostics,
    })
}

fn validate_root(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(OuroError::RootNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(OuroError::RootNotDirectory(path.to_path_buf()));
    }
    fs::canonicalize(path).map_err(|source| OuroError::Io {
        source,
        path: path.to_path_buf(),
    })
}

/// Each pattern matches itself, anywhere in the tree, and everything below it.
fn build_ignore_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for raw in patterns {
        let pattern = raw.trim_start_matches("./").trim_end_matches('/');
        if pattern.is_empty() {
            continue;
        }
        for variant in [
            pattern.to_string(),
            format!("**/{pattern}"),
            format!("{pattern}/**"),
            format!("**/{pattern}/**"),
        ] {
            let glob = Glob::new(&variant).map_err(|source| OuroError::IgnorePattern {
                pattern: raw.clone(),
                source,
            })?;
            builder.add(glob);
        }
    }
    builder.build().map_err(|source| OuroError::IgnorePattern {
        pattern: patterns.join(", "),
        source,
    })
}

fn walk_filesystem(root: &Path, ignore: &GlobSet) -> Vec<PathBuf> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            if e.file_type().is_dir() && should_prune(&name) {
                return false;
            }
            !is_ignored(root, e.path(), ignore)
        });

    let mut paths = Vec::new();
    let mut errors = 0usize;
    for item in walker {
        match item {
            Ok(entry) => {
                if entry.file_type().is_file() && is_python_source(entry.path()) {
                    paths.push(entry.into_path());
                }
            }
            Err(e) => {
                errors += 1;
                tracing::debug!(error = %e, "walk error");
            }
        }
    }
    if errors > 0 {
        tracing::warn!("encountered {errors} errors during file walk");
    }
    paths
}

#[must_use]
pub fn should_prune(name: &str) -> bool {
    PRUNE_DIRS.contains(&name) || name.ends_with(".egg-info")
}

fn is_python_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "py")
}

fn is_ignored(root: &Path, path: &Path, ignore: &GlobSet) -> bool {
    if ignore.is_empty() {
        return false;
    }
    let rel = path.strip_prefix(root).unwrap_or(path);
    ignore.is_match(normalize_path(rel))
}

/// Normalizes a path to use forward slashes (cross-platform pattern matching).
fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[derive(Default)]
struct PackageCache {
    known: HashMap<PathBuf, bool>,
}

impl PackageCache {
    fn is_package(&mut self, dir: &Path) -> bool {
        if let Some(&hit) = self.known.get(dir) {
            return hit;
        }
        let hit = dir.join(PACKAGE_MARKER).is_file();
        self.known.insert(dir.to_path_buf(), hit);
        hit
    }
}

fn source_file(root: &Path, path: PathBuf, packages: &mut PackageCache) -> Option<SourceFile> {
    let is_package = path.file_name().is_some_and(|n| n == PACKAGE_MARKER);
    let rel = path.strip_prefix(root).ok()?;
    let mut parts = dotted_parts(rel);

    let last = parts.pop()?;
    let stem = last.strip_suffix(".py")?;
    if stem != "__init__" {
        parts.push(stem.to_string());
    }

    let parent = path.parent()?;
    if parts.is_empty() {
        // The root itself is a package; its `__init__.py` is not importable
        // by a dotted path below the root.
        return Some(SourceFile {
            import_prefix: String::new(),
            module_id: ROOT_INIT_ID.to_string(),
            is_package: false,
            path,
        });
    }

    let import_root = import_root(root, parent, packages);
    let import_prefix = import_root
        .strip_prefix(root)
        .map(|p| dotted_parts(p).join("."))
        .unwrap_or_default();

    Some(SourceFile {
        module_id: parts.join("."),
        import_prefix,
        is_package,
        path,
    })
}

fn dotted_parts(rel: &Path) -> Vec<String> {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect()
}

/// Nearest ancestor of `dir` (inclusive) without `__init__.py`, stopping at
/// `root`. This is the directory the interpreter would need on `sys.path`
/// to import the file by its package-qualified name.
fn import_root<'a>(root: &Path, dir: &'a Path, packages: &mut PackageCache) -> &'a Path {
    let mut current = dir;
    while current != root && packages.is_package(current) {
        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }
    current
}
