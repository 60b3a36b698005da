use crate::language::LanguageProfile;
use crate::parse::common::{line_at, ImportKind, RawImport};
use crate::parse::paths::{self, PathIndex};
use crate::parse::ImportParser;
use regex::Regex;
use std::sync::LazyLock;

/// Extensions probed, in order, when an import omits one.
pub const EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];

/// Root-alias prefixes (`@/components/Button` → `components/Button`).
const ALIAS_PREFIXES: &[&str] = &["@/", "~/"];

const PACKAGES_DIR: &str = "packages";
const APPS_DIR: &str = "apps";

// `import x from './a'`, `import { a, b } from './a'`, `import './a'`.
// A statement starts a line or follows `;` or `}` on the same line.
static STATIC_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)(?:^|[;}])[ \t]*import\s+(?:type\s+)?(?:([\w$*{}\s,]+?)\s+from\s+)?['"]([^'"\n]+)['"]"#)
        .expect("valid static import pattern")
});

// `export { a } from './a'`, `export * from './a'`, `export * as ns from './a'`
static REEXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)(?:^|[;}])[ \t]*export\s+(?:type\s+)?(?:\*(?:\s+as\s+[\w$]+)?|\{[^}]*\})\s+from\s+['"]([^'"\n]+)['"]"#,
    )
    .expect("valid re-export pattern")
});

static DYNAMIC_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bimport\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#).expect("valid dynamic import pattern")
});

static REQUIRE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\brequire\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#).expect("valid require pattern")
});

/// How a specifier points into the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Relative,
    Alias(&'static str),
    Workspace,
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// True when the file sits inside a `packages/` or `apps/` workspace member.
fn in_workspace(file_path: &str) -> bool {
    let mut segments = file_path.split('/');
    segments.next_back();
    segments.any(|s| s == PACKAGES_DIR || s == APPS_DIR)
}

fn origin_of(specifier: &str, file_path: &str) -> Option<Origin> {
    if is_relative(specifier) {
        return Some(Origin::Relative);
    }
    if let Some(prefix) = ALIAS_PREFIXES.iter().find(|p| specifier.starts_with(*p)) {
        return Some(Origin::Alias(prefix));
    }
    let bare = !specifier.is_empty()
        && !specifier.starts_with('@')
        && !specifier.starts_with('/')
        && !specifier.contains(':');
    if bare && in_workspace(file_path) {
        return Some(Origin::Workspace);
    }
    None
}

/// Every concrete file a base path could denote, in probe order.
fn candidates_for(base: &str) -> Vec<String> {
    let mut out = vec![base.to_string()];
    for ext in EXTENSIONS {
        out.push(format!("{base}.{ext}"));
    }
    for ext in EXTENSIONS {
        out.push(format!("{base}/index.{ext}"));
    }
    // ESM TypeScript imports name the emitted `.js` file.
    for js_ext in [".js", ".jsx", ".mjs", ".cjs"] {
        if let Some(stem) = base.strip_suffix(js_ext) {
            out.push(format!("{stem}.ts"));
            out.push(format!("{stem}.tsx"));
        }
    }
    out
}

/// Blank out `//` and `/* */` comments, keeping newlines and byte offsets.
///
/// String and template literals are skipped so `'http://x'` survives.
fn mask_comments(source: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        Line,
        Block,
        Str(u8),
    }

    let bytes = source.as_bytes();
    let mut out = bytes.to_vec();
    let mut state = State::Code;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        match state {
            State::Code => match (b, next) {
                (b'/', Some(b'/')) => {
                    state = State::Line;
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    i += 1;
                }
                (b'/', Some(b'*')) => {
                    state = State::Block;
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    i += 1;
                }
                (b'\'' | b'"' | b'`', _) => state = State::Str(b),
                _ => {}
            },
            State::Line => {
                if b == b'\n' {
                    state = State::Code;
                } else {
                    out[i] = b' ';
                }
            }
            State::Block => {
                if b == b'*' && next == Some(b'/') {
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    state = State::Code;
                    i += 1;
                } else if b != b'\n' {
                    out[i] = b' ';
                }
            }
            State::Str(quote) => {
                if b == b'\\' {
                    i += 1;
                } else if b == quote || (b == b'\n' && quote != b'`') {
                    state = State::Code;
                }
            }
        }
        i += 1;
    }
    // Only whole characters inside comments were replaced, so this holds.
    String::from_utf8(out).unwrap_or_else(|_| source.to_string())
}

/// Parser for JavaScript, TypeScript and their JSX dialects.
pub struct EcmaScriptParser {
    profile: LanguageProfile,
}

impl EcmaScriptParser {
    pub fn new(profile: LanguageProfile) -> Self {
        Self { profile }
    }

    fn push_matches(
        regex: &Regex,
        group: usize,
        kind: ImportKind,
        masked: &str,
        source: &str,
        file_path: &str,
        found: &mut Vec<(usize, RawImport)>,
    ) {
        for caps in regex.captures_iter(masked) {
            let (Some(whole), Some(spec)) = (caps.get(0), caps.get(group)) else {
                continue;
            };
            let specifier = spec.as_str().trim();
            if origin_of(specifier, file_path).is_none() {
                continue;
            }
            found.push((
                whole.start(),
                RawImport {
                    specifier: specifier.to_string(),
                    line: line_at(source, whole.start()),
                    kind: kind.clone(),
                },
            ));
        }
    }
}

impl ImportParser for EcmaScriptParser {
    fn language(&self) -> &str {
        &self.profile.id
    }

    fn parse_imports(&self, source: &str, file_path: &str) -> Vec<RawImport> {
        let mut found: Vec<(usize, RawImport)> = Vec::new();
        let masked = mask_comments(source);

        for caps in STATIC_IMPORT.captures_iter(&masked) {
            let (Some(whole), Some(spec)) = (caps.get(0), caps.get(2)) else {
                continue;
            };
            let specifier = spec.as_str().trim();
            if origin_of(specifier, file_path).is_none() {
                continue;
            }
            let kind = if caps.get(1).is_some() {
                ImportKind::Static
            } else {
                ImportKind::SideEffect
            };
            found.push((
                whole.start(),
                RawImport {
                    specifier: specifier.to_string(),
                    line: line_at(source, whole.start()),
                    kind,
                },
            ));
        }

        for (regex, kind) in [
            (&*REEXPORT, ImportKind::ReExport),
            (&*DYNAMIC_IMPORT, ImportKind::Dynamic),
            (&*REQUIRE, ImportKind::Require),
        ] {
            Self::push_matches(regex, 1, kind, &masked, source, file_path, &mut found);
        }

        found.sort_by_key(|(offset, _)| *offset);
        found.into_iter().map(|(_, raw)| raw).collect()
    }

    fn resolve_import_path(&self, raw: &RawImport, file_path: &str) -> Option<String> {
        match origin_of(&raw.specifier, file_path)? {
            Origin::Relative => paths::join(paths::parent_dir(file_path), &raw.specifier),
            Origin::Alias(prefix) => {
                let rest = raw.specifier.strip_prefix(prefix).unwrap_or(&raw.specifier);
                Some(paths::normalize(rest))
            }
            Origin::Workspace => Some(format!("{PACKAGES_DIR}/{}", paths::normalize(&raw.specifier))),
        }
    }

    fn classify(&self, file_path: &str) -> String {
        self.profile.classify(file_path)
    }

    fn match_import(&self, raw: &RawImport, resolved: &str, known: &PathIndex) -> Option<String> {
        let mut bases = vec![resolved.to_string()];
        match origin_of(&raw.specifier, "") {
            Some(Origin::Alias(_)) => bases.push(format!("src/{resolved}")),
            Some(Origin::Relative) => {}
            // Workspace origin depends on the importing file, which the
            // `packages/` prefix on the guess already encodes.
            None | Some(Origin::Workspace) => {
                if let Some(rest) = resolved.strip_prefix(&format!("{PACKAGES_DIR}/")) {
                    bases.push(rest.to_string());
                    bases.push(format!("{APPS_DIR}/{rest}"));
                    let (package, sub) = rest.split_once('/').unwrap_or((rest, ""));
                    if sub.is_empty() {
                        bases.push(format!("{PACKAGES_DIR}/{package}/src"));
                    } else {
                        bases.push(format!("{PACKAGES_DIR}/{package}/src/{sub}"));
                    }
                }
            }
        }

        bases
            .iter()
            .find_map(|base| known.first_of(candidates_for(base)))
    }
}
