// src/graph/resolver.rs
//! Maps raw import references onto scanned module ids.

use std::collections::{BTreeMap, BTreeSet};

use super::imports::ImportTarget;
use super::types::Module;
use crate::discovery::ROOT_INIT_ID;

/// Outcome of resolving one import reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A scanned project module.
    Internal(String),
    /// Standard library or third-party; not our business.
    External,
    /// Looked like a project import but matched nothing.
    Unresolved,
}

/// Lookup structure over the scanned module ids.
///
/// Ids are root-relative. Absolute imports are written relative to some
/// import prefix (`src` for a `src/` layout, a script's own directory), so an
/// absolute reference is first qualified against the prefixes in search
/// order and only then matched against ids.
#[derive(Debug, Default)]
pub struct ModuleIndex {
    ids: BTreeSet<String>,
    /// Every dotted prefix of every id: modules, packages, plain directories.
    known: BTreeSet<String>,
    prefixes: BTreeMap<String, String>,
    search: BTreeSet<String>,
    root_package: Option<String>,
}

/// An absolute reference rewritten into root-relative form.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Qualified {
    path: String,
    /// Fewest segments a match may have; 0 admits the root `__init__`.
    lowest: usize,
}

impl Qualified {
    fn under(prefix: &str, dotted: &str) -> Self {
        Self {
            path: join(prefix, dotted),
            lowest: segments(prefix) + 1,
        }
    }
}

impl ModuleIndex {
    /// Builds the index from `(module id, import prefix)` pairs.
    pub fn new<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut index = Self::default();
        for (id, prefix) in entries {
            if id != ROOT_INIT_ID {
                let mut acc = String::new();
                for part in id.split('.') {
                    if !acc.is_empty() {
                        acc.push('.');
                    }
                    acc.push_str(part);
                    index.known.insert(acc.clone());
                }
            }
            index.search.insert(prefix.to_string());
            index.prefixes.insert(id.to_string(), prefix.to_string());
            index.ids.insert(id.to_string());
        }
        index
    }

    /// Name the project root is importable under when it is itself a package.
    #[must_use]
    pub fn with_root_package(mut self, name: Option<String>) -> Self {
        self.root_package = name.filter(|n| !n.is_empty() && self.root_is_package());
        self
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn root_is_package(&self) -> bool {
        self.ids.contains(ROOT_INIT_ID)
    }

    /// Rewrites `dotted` as seen from `importer` into root-relative form, or
    /// `None` if no scanned location defines its first segment.
    ///
    /// Search order: the importer's own prefix, the root, the root package
    /// name, then every other prefix.
    fn qualify(&self, importer: &str, dotted: &str) -> Option<Qualified> {
        let head = first_segment(dotted);
        let own = self.prefixes.get(importer).map_or("", String::as_str);
        let local = [own, ""];
        if let Some(prefix) = local
            .iter()
            .find(|p| self.known.contains(&join(p, head)))
        {
            return Some(Qualified::under(prefix, dotted));
        }
        if let Some(rest) = self.strip_root_package(dotted) {
            return Some(Qualified {
                path: rest.to_string(),
                lowest: 0,
            });
        }
        self.search
            .iter()
            .filter(|p| !local.contains(&p.as_str()))
            .find(|p| self.known.contains(&join(p, head)))
            .map(|p| Qualified::under(p, dotted))
    }

    fn strip_root_package<'d>(&self, dotted: &'d str) -> Option<&'d str> {
        let name = self.root_package.as_deref()?;
        let rest = dotted.strip_prefix(name)?;
        if rest.is_empty() {
            Some(rest)
        } else {
            rest.strip_prefix('.')
        }
    }

    /// `a.b.c` resolves to the longest scanned prefix (`a.b.c`, `a.b`, `a`)
    /// that keeps at least `lowest` segments.
    fn lookup(&self, path: &str, lowest: usize) -> Option<String> {
        let parts: Vec<&str> = if path.is_empty() {
            Vec::new()
        } else {
            path.split('.').collect()
        };
        (lowest..=parts.len()).rev().find_map(|n| {
            let candidate = if n == 0 {
                ROOT_INIT_ID.to_string()
            } else {
                parts[..n].join(".")
            };
            self.ids.contains(&candidate).then_some(candidate)
        })
    }
}

fn first_segment(dotted: &str) -> &str {
    dotted.split('.').next().unwrap_or(dotted)
}

fn segments(dotted: &str) -> usize {
    if dotted.is_empty() {
        0
    } else {
        dotted.split('.').count()
    }
}

/// Resolves one import statement of `importer`.
///
/// `from m import a, b` can land on several modules (`m.a`, `m.b`, or `m`
/// itself for names that aren't submodules), so this returns every distinct
/// outcome, in statement order.
#[must_use]
pub fn resolve(index: &ModuleIndex, importer: &Module, target: &ImportTarget) -> Vec<Resolution> {
    match target {
        ImportTarget::Module(path) => vec![match index.qualify(&importer.id, path) {
            Some(q) => index
                .lookup(&q.path, q.lowest)
                .map_or(Resolution::Unresolved, Resolution::Internal),
            None => Resolution::External,
        }],
        ImportTarget::From {
            level: 0,
            module,
            names,
        } => match index.qualify(&importer.id, module) {
            Some(base) => resolve_from(index, importer, &base, names),
            None => vec![Resolution::External],
        },
        ImportTarget::From {
            level,
            module,
            names,
        } => match relative_base(importer, *level, module, index.root_is_package()) {
            Some(path) => resolve_from(index, importer, &Qualified { path, lowest: 0 }, names),
            None => vec![Resolution::Unresolved],
        },
    }
}

/// Package a relative import points at: level 1 is the importer's own
/// package, each extra dot climbs one more. The project root only counts as
/// a package when it has an `__init__.py`.
fn relative_base(
    importer: &Module,
    level: usize,
    module: &str,
    root_is_package: bool,
) -> Option<String> {
    let mut parts: Vec<&str> = importer
        .package()
        .split('.')
        .filter(|p| !p.is_empty())
        .collect();
    for _ in 1..level {
        parts.pop()?;
    }
    if parts.is_empty() && !root_is_package {
        return None;
    }
    if !module.is_empty() {
        parts.extend(module.split('.'));
    }
    Some(parts.join("."))
}

fn resolve_from(
    index: &ModuleIndex,
    importer: &Module,
    base: &Qualified,
    names: &[String],
) -> Vec<Resolution> {
    let mut out: BTreeMap<usize, Resolution> = BTreeMap::new();
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut needs_base = names.is_empty();

    for (i, name) in names.iter().enumerate() {
        let candidate = join(&base.path, name);
        if index.contains(&candidate) {
            if seen.insert(candidate.clone()) {
                out.insert(i, Resolution::Internal(candidate));
            }
        } else {
            needs_base = true;
        }
    }

    if needs_base {
        // Names that are attributes of `base` depend on `base` itself. A
        // module pulling attributes out of itself is not an import edge.
        let resolution = match index.lookup(&base.path, base.lowest) {
            Some(id) if id == importer.id => None,
            Some(id) if seen.insert(id.clone()) => Some(Resolution::Internal(id)),
            Some(_) => None,
            None => Some(Resolution::Unresolved),
        };
        if let Some(resolution) = resolution {
            out.insert(usize::MAX, resolution);
        }
    }

    out.into_values().collect()
}

fn join(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{base}.{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn index() -> ModuleIndex {
        ModuleIndex::new([
            ("app", ""),
            ("pkg", ""),
            ("pkg.core", ""),
            ("pkg.sub", ""),
            ("pkg.sub.leaf", ""),
            ("pkg.util", ""),
        ])
    }

    fn module(id: &str, is_package: bool) -> Module {
        Module {
            id: id.to_string(),
            path: PathBuf::new(),
            is_package,
        }
    }

    fn from(level: usize, module: &str, names: &[&str]) -> ImportTarget {
        ImportTarget::From {
            level,
            module: module.to_string(),
            names: names.iter().map(ToString::to_string).collect(),
        }
    }

    fn internal(id: &str) -> Resolution {
        Resolution::Internal(id.to_string())
    }

    #[test]
    fn test_absolute_module_imports() {
        let idx = index();
        let me = module("app", false);
        assert_eq!(
            resolve(&idx, &me, &ImportTarget::Module("pkg.core".into())),
            vec![internal("pkg.core")]
        );
        assert_eq!(
            resolve(&idx, &me, &ImportTarget::Module("os.path".into())),
            vec![Resolution::External]
        );
        assert_eq!(
            resolve(&idx, &me, &ImportTarget::Module("pkg.core.Thing".into())),
            vec![internal("pkg.core")]
        );
    }

    #[test]
    fn test_unknown_root_member_falls_back_to_package() {
        let idx = index();
        let me = module("app", false);
        assert_eq!(
            resolve(&idx, &me, &ImportTarget::Module("pkg.missing".into())),
            vec![internal("pkg")]
        );
    }

    #[test]
    fn test_from_import_prefers_submodules() {
        let idx = index();
        let me = module("app", false);
        assert_eq!(
            resolve(&idx, &me, &from(0, "pkg", &["core", "util"])),
            vec![internal("pkg.core"), internal("pkg.util")]
        );
        assert_eq!(
            resolve(&idx, &me, &from(0, "pkg", &["core", "helper"])),
            vec![internal("pkg.core"), internal("pkg")]
        );
        assert_eq!(
            resolve(&idx, &me, &from(0, "pkg.core", &["Thing"])),
            vec![internal("pkg.core")]
        );
        assert_eq!(
            resolve(&idx, &me, &from(0, "typing", &["Any"])),
            vec![Resolution::External]
        );
    }

    #[test]
    fn test_wildcard_targets_base() {
        let idx = index();
        let me = module("app", false);
        assert_eq!(
            resolve(&idx, &me, &from(0, "pkg.util", &[])),
            vec![internal("pkg.util")]
        );
    }

    #[test]
    fn test_relative_from_plain_module() {
        let idx = index();
        let leaf = module("pkg.sub.leaf", false);
        assert_eq!(
            resolve(&idx, &leaf, &from(1, "", &["leaf"])),
            vec![internal("pkg.sub.leaf")],
            "naming yourself as a submodule is an explicit self-import"
        );
        assert_eq!(
            resolve(&idx, &leaf, &from(1, "leaf", &["helper"])),
            Vec::<Resolution>::new(),
            "pulling attributes out of yourself adds no edge"
        );
        assert_eq!(
            resolve(&idx, &leaf, &from(2, "core", &["Thing"])),
            vec![internal("pkg.core")]
        );
        assert_eq!(
            resolve(&idx, &leaf, &from(2, "", &["util"])),
            vec![internal("pkg.util")]
        );
    }

    #[test]
    fn test_relative_from_package_init() {
        let idx = index();
        let sub = module("pkg.sub", true);
        assert_eq!(
            resolve(&idx, &sub, &from(1, "leaf", &["f"])),
            vec![internal("pkg.sub.leaf")]
        );
        assert_eq!(
            resolve(&idx, &sub, &from(2, "", &["core"])),
            vec![internal("pkg.core")]
        );
    }

    #[test]
    fn test_relative_beyond_top_is_unresolved() {
        let idx = index();
        let leaf = module("pkg.sub.leaf", false);
        assert_eq!(
            resolve(&idx, &leaf, &from(4, "x", &["y"])),
            vec![Resolution::Unresolved]
        );
    }

    #[test]
    fn test_relative_to_missing_module_falls_back() {
        let idx = index();
        let core = module("pkg.core", false);
        assert_eq!(
            resolve(&idx, &core, &from(1, "nope", &["x"])),
            vec![internal("pkg")]
        );
        let app = module("app", false);
        assert_eq!(
            resolve(&idx, &app, &from(1, "nope", &["x"])),
            vec![Resolution::Unresolved]
        );
    }

    #[test]
    fn test_explicit_self_import_kept() {
        let idx = index();
        let me = module("pkg.core", false);
        assert_eq!(
            resolve(&idx, &me, &ImportTarget::Module("pkg.core".into())),
            vec![internal("pkg.core")]
        );
    }

    #[test]
    fn test_top_level_relative_needs_root_package() {
        let idx = index();
        let app = module("app", false);
        assert_eq!(
            resolve(&idx, &app, &from(1, "", &["pkg"])),
            vec![Resolution::Unresolved]
        );

        let rooted = ModuleIndex::new([(ROOT_INIT_ID, ""), ("app", ""), ("util", "")])
            .with_root_package(Some("mylib".into()));
        assert_eq!(
            resolve(&rooted, &app, &from(1, "", &["util"])),
            vec![internal("util")]
        );
        assert_eq!(
            resolve(&rooted, &app, &from(2, "", &["util"])),
            vec![Resolution::Unresolved]
        );
    }

    #[test]
    fn test_root_package_name_is_an_alias() {
        let idx = ModuleIndex::new([(ROOT_INIT_ID, ""), ("app", ""), ("util", "")])
            .with_root_package(Some("mylib".into()));
        let app = module("app", false);
        assert_eq!(
            resolve(&idx, &app, &ImportTarget::Module("mylib.util".into())),
            vec![internal("util")]
        );
        assert_eq!(
            resolve(&idx, &app, &ImportTarget::Module("mylib".into())),
            vec![internal(ROOT_INIT_ID)]
        );
        assert_eq!(
            resolve(&idx, &app, &from(0, "mylib", &["util", "VERSION"])),
            vec![internal("util"), internal(ROOT_INIT_ID)]
        );
    }

    #[test]
    fn test_src_layout_imports_are_qualified() {
        let idx = ModuleIndex::new([
            ("src.shop", "src"),
            ("src.shop.cart", "src"),
            ("src.shop.pricing", "src"),
            ("tests.test_cart", "tests"),
        ]);
        let cart = module("src.shop.cart", false);
        assert_eq!(
            resolve(&idx, &cart, &from(0, "shop.pricing", &["total"])),
            vec![internal("src.shop.pricing")]
        );
        assert_eq!(
            resolve(&idx, &cart, &ImportTarget::Module("shop.missing".into())),
            vec![internal("src.shop")]
        );
        let test = module("tests.test_cart", false);
        assert_eq!(
            resolve(&idx, &test, &ImportTarget::Module("shop.cart".into())),
            vec![internal("src.shop.cart")]
        );
        assert_eq!(
            resolve(&idx, &test, &ImportTarget::Module("requests".into())),
            vec![Resolution::External]
        );
    }

    #[test]
    fn test_script_directory_sees_its_siblings_first() {
        let idx = ModuleIndex::new([
            ("alpha.util", "alpha"),
            ("zeta.util", "zeta"),
            ("zeta.zmod", "zeta"),
        ]);
        let zmod = module("zeta.zmod", false);
        assert_eq!(
            resolve(&idx, &zmod, &ImportTarget::Module("util".into())),
            vec![internal("zeta.util")]
        );
        let alpha = module("alpha.util", false);
        assert_eq!(
            resolve(&idx, &alpha, &ImportTarget::Module("zmod".into())),
            vec![internal("zeta.zmod")]
        );
    }

    #[test]
    fn test_namespace_directory_imports() {
        let idx = ModuleIndex::new([("ns.a", "ns"), ("ns.b", "ns")]);
        let a = module("ns.a", false);
        assert_eq!(
            resolve(&idx, &a, &ImportTarget::Module("ns.b".into())),
            vec![internal("ns.b")]
        );
        assert_eq!(
            resolve(&idx, &a, &from(1, "", &["b"])),
            vec![internal("ns.b")]
        );
    }
}
