// src/graph/builder.rs
//! Graph construction: per-file extraction (parallel), then a
//! single-threaded merge into one [`DependencyGraph`].

use rayon::prelude::*;
use std::fs;

use super::imports::{self, ParseFailure, RawImport};
use super::resolver::{self, ModuleIndex, Resolution};
use super::types::{DependencyGraph, ImportEdge, Module};
use crate::discovery::{SourceFile, ROOT_INIT_ID};
use crate::error::Diagnostic;

/// Extraction result for one file.
#[derive(Debug, Clone)]
pub struct FileImports {
    pub module: Module,
    pub import_prefix: String,
    pub outcome: Result<Vec<RawImport>, ParseFailure>,
}

/// Counters reported after a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub files: usize,
    pub skipped_files: usize,
    pub imports: usize,
    pub external: usize,
    pub unresolved: usize,
}

/// The merged graph plus whatever went wrong on the way.
#[derive(Debug, Default)]
pub struct BuildOutput {
    pub graph: DependencyGraph,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: BuildStats,
}

/// Reads, extracts and merges all files.
#[must_use]
pub fn build(files: &[SourceFile]) -> BuildOutput {
    merge(extract_all(files))
}

/// Reads and parses every file. One independent unit of work per file; the
/// output keeps input order.
#[must_use]
pub fn extract_all(files: &[SourceFile]) -> Vec<FileImports> {
    files
        .par_iter()
        .map(|file| {
            let module = Module {
                id: file.module_id.clone(),
                path: file.path.clone(),
                is_package: file.is_package,
            };
            let outcome = fs::read_to_string(&file.path)
                .map_err(|e| ParseFailure {
                    line: None,
                    message: format!("unreadable: {e}"),
                })
                .and_then(|source| imports::extract(&source));
            FileImports {
                module,
                import_prefix: file.import_prefix.clone(),
                outcome,
            }
        })
        .collect()
}

/// Builds the graph from already-extracted files. Runs on one thread; this is
/// the only place the graph is written.
#[must_use]
pub fn merge(extracted: Vec<FileImports>) -> BuildOutput {
    let mut out = BuildOutput::default();
    out.stats.files = extracted.len();

    for file in &extracted {
        out.graph.add_module(file.module.clone());
    }
    let index = ModuleIndex::new(
        extracted
            .iter()
            .map(|f| (f.module.id.as_str(), f.import_prefix.as_str())),
    )
    .with_root_package(root_package(&extracted));

    for file in extracted {
        match file.outcome {
            Ok(raw) => add_file_edges(&mut out, &index, &file.module, &raw),
            Err(failure) => {
                tracing::warn!(
                    path = %file.module.path.display(),
                    line = ?failure.line,
                    "skipping file: {}",
                    failure.message
                );
                out.stats.skipped_files += 1;
                out.diagnostics.push(Diagnostic::FileParse {
                    path: file.module.path,
                    line: failure.line,
                    message: failure.message,
                });
            }
        }
    }

    tracing::info!(
        modules = out.graph.module_count(),
        edges = out.graph.edge_count(),
        skipped = out.stats.skipped_files,
        unresolved = out.stats.unresolved,
        "dependency graph built"
    );
    out
}

/// Directory name of the project root, if the root holds an `__init__.py`.
fn root_package(extracted: &[FileImports]) -> Option<String> {
    extracted
        .iter()
        .find(|f| f.module.id == ROOT_INIT_ID)
        .and_then(|f| f.module.path.parent())
        .and_then(|dir| dir.file_name())
        .map(|name| name.to_string_lossy().into_owned())
}

fn add_file_edges(out: &mut BuildOutput, index: &ModuleIndex, module: &Module, raw: &[RawImport]) {
    for import in raw {
        out.stats.imports += 1;
        for resolution in resolver::resolve(index, module, &import.target) {
            match resolution {
                Resolution::Internal(to) => {
                    out.graph.add_edge(ImportEdge {
                        from: module.id.clone(),
                        to,
                        line: import.line,
                        is_top_level: import.is_top_level(),
                    });
                }
                Resolution::External => out.stats.external += 1,
                Resolution::Unresolved => {
                    let reference = import.target.reference();
                    tracing::debug!(
                        module = %module.id,
                        line = import.line,
                        "unresolved import `{reference}`"
                    );
                    out.stats.unresolved += 1;
                    out.diagnostics.push(Diagnostic::UnresolvedImport {
                        module: module.id.clone(),
                        reference,
                        line: import.line,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::imports::ImportTarget;
    use crate::graph::types::EdgeScope;
    use std::path::PathBuf;

    fn parsed(id: &str, imports: Vec<RawImport>) -> FileImports {
        FileImports {
            module: Module {
                id: id.to_string(),
                path: PathBuf::from(format!("{id}.py")),
                is_package: false,
            },
            import_prefix: String::new(),
            outcome: Ok(imports),
        }
    }

    fn import(target: &str, line: usize, depth: usize) -> RawImport {
        RawImport {
            target: ImportTarget::Module(target.to_string()),
            line,
            nesting_depth: depth,
        }
    }

    #[test]
    fn test_merge_resolves_and_drops_external() {
        let out = merge(vec![
            parsed("a", vec![import("b", 1, 0), import("os", 2, 0)]),
            parsed("b", vec![import("a", 3, 1)]),
        ]);
        assert_eq!(out.graph.module_count(), 2);
        assert_eq!(
            out.graph.edges(),
            &[
                ImportEdge {
                    from: "a".into(),
                    to: "b".into(),
                    line: 1,
                    is_top_level: true
                },
                ImportEdge {
                    from: "b".into(),
                    to: "a".into(),
                    line: 3,
                    is_top_level: false
                },
            ]
        );
        assert_eq!(out.stats.external, 1);
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_parse_failure_is_recorded_not_fatal() {
        let broken = FileImports {
            module: Module {
                id: "broken".into(),
                path: PathBuf::from("broken.py"),
                is_package: false,
            },
            import_prefix: String::new(),
            outcome: Err(ParseFailure {
                line: Some(4),
                message: "syntax error".into(),
            }),
        };
        let out = merge(vec![parsed("a", vec![import("broken", 1, 0)]), broken]);
        assert_eq!(out.stats.skipped_files, 1);
        assert_eq!(out.graph.edge_count(), 1, "edges into a skipped file survive");
        assert!(out.diagnostics[0].is_parse_failure());
    }

    #[test]
    fn test_unresolved_relative_is_diagnosed() {
        let rel = RawImport {
            target: ImportTarget::From {
                level: 3,
                module: "x".into(),
                names: vec!["y".into()],
            },
            line: 7,
            nesting_depth: 0,
        };
        let out = merge(vec![parsed("a", vec![rel])]);
        assert_eq!(out.stats.unresolved, 1);
        assert_eq!(
            out.diagnostics,
            vec![Diagnostic::UnresolvedImport {
                module: "a".into(),
                reference: "...x".into(),
                line: 7,
            }]
        );
    }

    #[test]
    fn test_extract_all_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.py");
        let bad = dir.path().join("bad.py");
        fs::write(&good, "import bad\n").unwrap();
        fs::write(&bad, "def (:\n").unwrap();
        let files = vec![
            SourceFile {
                path: bad,
                module_id: "bad".into(),
                import_prefix: String::new(),
                is_package: false,
            },
            SourceFile {
                path: good,
                module_id: "good".into(),
                import_prefix: String::new(),
                is_package: false,
            },
            SourceFile {
                path: dir.path().join("gone.py"),
                module_id: "gone".into(),
                import_prefix: String::new(),
                is_package: false,
            },
        ];
        let extracted = extract_all(&files);
        assert_eq!(extracted.len(), 3);
        assert!(extracted[0].outcome.is_err());
        assert_eq!(extracted[1].outcome.as_ref().map(Vec::len), Ok(1));
        assert!(extracted[2].outcome.is_err());

        let out = merge(extracted);
        assert_eq!(out.stats.skipped_files, 2);
        assert_eq!(out.graph.edge_count(), 1);
    }

    #[test]
    fn test_undecodable_file_is_skipped_and_cycles_survive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "import b\n").unwrap();
        fs::write(dir.path().join("b.py"), "import a\n").unwrap();
        fs::write(dir.path().join("latin.py"), [0xff, 0xfe, b'\n']).unwrap();
        let files = crate::discovery::discover(&crate::Config::new(dir.path())).unwrap();
        assert_eq!(files.len(), 3);

        let out = build(&files);
        assert_eq!(out.stats.skipped_files, 1);
        match &out.diagnostics[..] {
            [Diagnostic::FileParse { path, line, .. }] => {
                assert!(path.ends_with("latin.py"));
                assert_eq!(*line, None);
            }
            other => panic!("unexpected diagnostics: {other:?}"),
        }

        let detection = crate::graph::cycles::detect(&out.graph, EdgeScope::All, 100);
        assert_eq!(detection.cycles, vec![vec!["a".to_string(), "b".to_string()]]);
    }

    #[test]
    fn test_root_package_alias_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("mylib");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("__init__.py"), "from mylib import util\n").unwrap();
        fs::write(root.join("util.py"), "from . import VERSION\n").unwrap();
        let files = crate::discovery::discover(&crate::Config::new(&root)).unwrap();

        let out = build(&files);
        let edges: Vec<(&str, &str)> = out
            .graph
            .edges()
            .iter()
            .map(|e| (e.from.as_str(), e.to.as_str()))
            .collect();
        assert_eq!(edges, vec![(ROOT_INIT_ID, "util"), ("util", ROOT_INIT_ID)]);
        assert!(out.diagnostics.is_empty());
    }
}
