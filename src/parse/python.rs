use crate::language::LanguageProfile;
use crate::parse::common::{ImportKind, RawImport};
use crate::parse::paths::{self, PathIndex};
use crate::parse::ImportParser;
use regex::Regex;
use std::sync::LazyLock;

static IMPORT_STMT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*import\s+(.+)$").expect("valid import pattern"));

static FROM_STMT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*from\s+(\.*)([A-Za-z_][\w.]*)?\s+import\s+(.+)$").expect("valid from-import pattern")
});

static MODULE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_]\w*(?:\.[A-Za-z_]\w*)*$").expect("valid module name pattern"));

/// Top-level modules shipped with CPython.
const STDLIB_MODULES: &[&str] = &[
    "__future__", "abc", "argparse", "array", "ast", "asyncio", "atexit", "base64", "bisect",
    "builtins", "bz2", "calendar", "cmath", "codecs", "collections", "concurrent", "configparser",
    "contextlib", "contextvars", "copy", "csv", "ctypes", "dataclasses", "datetime", "decimal",
    "difflib", "dis", "email", "enum", "errno", "faulthandler", "fcntl", "filecmp", "fnmatch",
    "fractions", "ftplib", "functools", "gc", "getpass", "gettext", "glob", "gzip", "hashlib",
    "heapq", "hmac", "html", "http", "imaplib", "importlib", "inspect", "io", "ipaddress",
    "itertools", "json", "keyword", "linecache", "locale", "logging", "lzma", "mailbox", "marshal",
    "math", "mimetypes", "mmap", "multiprocessing", "numbers", "operator", "os", "pathlib",
    "pdb", "pickle", "pkgutil", "platform", "plistlib", "pprint", "profile", "queue", "random",
    "re", "reprlib", "resource", "sched", "secrets", "select", "selectors", "shelve", "shlex",
    "shutil", "signal", "site", "smtplib", "socket", "socketserver", "sqlite3", "ssl", "stat",
    "statistics", "string", "struct", "subprocess", "sys", "sysconfig", "tarfile", "tempfile",
    "textwrap", "threading", "time", "timeit", "tkinter", "token", "tokenize", "tomllib",
    "traceback", "types", "typing", "unicodedata", "unittest", "urllib", "uuid", "venv",
    "warnings", "weakref", "xml", "xmlrpc", "zipfile", "zlib", "zoneinfo",
];

/// Popular third-party distributions that are never project-internal.
const THIRD_PARTY_MODULES: &[&str] = &[
    "aiohttp", "alembic", "anthropic", "attr", "attrs", "boto3", "botocore", "bs4", "celery",
    "click", "cv2", "django", "dotenv", "fastapi", "flask", "google", "grpc", "httpx", "jinja2",
    "jwt", "langchain", "lxml", "marshmallow", "matplotlib", "numpy", "openai", "pandas", "PIL",
    "psycopg2", "pydantic", "pytest", "redis", "requests", "rest_framework", "rich", "scipy",
    "seaborn", "setuptools", "six", "sklearn", "sqlalchemy", "starlette", "tensorflow", "torch",
    "tqdm", "transformers", "typer", "typing_extensions", "uvicorn", "werkzeug", "yaml",
];

const INIT_FILE: &str = "__init__.py";

fn is_excluded_module(top_level: &str) -> bool {
    STDLIB_MODULES.contains(&top_level) || THIRD_PARTY_MODULES.contains(&top_level)
}

/// `a.b` → `a/b`
fn module_to_path(module: &str) -> String {
    module.replace('.', "/")
}

/// Drop a trailing `# comment`.
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

/// Names bound by a `from ... import <names>` clause.
fn imported_names(clause: &str) -> Vec<String> {
    clause
        .split(',')
        .map(|part| part.trim().trim_matches(|c| c == '(' || c == ')' || c == '\\').trim())
        .filter_map(|part| part.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Parser for Python `import` and `from ... import` statements.
pub struct PythonParser {
    profile: LanguageProfile,
}

impl PythonParser {
    pub fn new(profile: LanguageProfile) -> Self {
        Self { profile }
    }

    /// Logical lines with the 1-based line they start on.
    ///
    /// Joins backslash continuations and parenthesised import lists, and skips
    /// text inside triple-quoted strings.
    fn logical_lines(source: &str) -> Vec<(usize, String)> {
        let mut out = Vec::new();
        let mut in_docstring = false;
        let mut pending: Option<(usize, String)> = None;

        for (idx, raw_line) in source.lines().enumerate() {
            let quotes = raw_line.matches("\"\"\"").count() + raw_line.matches("'''").count();
            if in_docstring {
                if quotes % 2 == 1 {
                    in_docstring = false;
                }
                continue;
            }
            if quotes % 2 == 1 {
                in_docstring = true;
                continue;
            }

            let line = strip_comment(raw_line);
            let (start, mut text) = match pending.take() {
                Some((start, mut text)) => {
                    text.push(' ');
                    text.push_str(line.trim());
                    (start, text)
                }
                None => (idx + 1, line.to_string()),
            };

            let head = text.trim_start();
            let is_import = head.starts_with("from ") || head.starts_with("import ");
            let open_paren = is_import && text.contains('(') && !text.contains(')');
            if text.trim_end().ends_with('\\') || open_paren {
                let trimmed = text.trim_end().trim_end_matches('\\').to_string();
                pending = Some((start, trimmed));
                continue;
            }
            out.push((start, text));
        }
        if let Some(rest) = pending {
            out.push(rest);
        }
        out
    }

    fn parse_import_clause(clause: &str, line: usize, imports: &mut Vec<RawImport>) {
        for part in clause.split(',') {
            let Some(module) = part.split_whitespace().next() else {
                continue;
            };
            if !MODULE_NAME.is_match(module) {
                continue;
            }
            let top = module.split('.').next().unwrap_or(module);
            if is_excluded_module(top) {
                continue;
            }
            imports.push(RawImport {
                specifier: module.to_string(),
                line,
                kind: ImportKind::Direct,
            });
        }
    }

    fn parse_from_clause(
        dots: &str,
        module: Option<&str>,
        names: &str,
        line: usize,
        imports: &mut Vec<RawImport>,
    ) {
        let level = dots.len();
        if level == 0 {
            let Some(module) = module else {
                return;
            };
            let top = module.split('.').next().unwrap_or(module);
            if is_excluded_module(top) {
                return;
            }
            imports.push(RawImport {
                specifier: module.to_string(),
                line,
                kind: ImportKind::FromImport {
                    module: module.to_string(),
                },
            });
            return;
        }

        let specifier = format!("{dots}{}", module.unwrap_or_default());
        if let Some(module) = module {
            imports.push(RawImport {
                specifier,
                line,
                kind: ImportKind::RelativeImport {
                    level,
                    module: Some(module.to_string()),
                    name: None,
                },
            });
            return;
        }

        // `from . import a, b`: each name may be a sibling module.
        let names: Vec<String> = imported_names(names)
            .into_iter()
            .filter(|n| n != "*" && MODULE_NAME.is_match(n))
            .collect();
        if names.is_empty() {
            imports.push(RawImport {
                specifier,
                line,
                kind: ImportKind::RelativeImport {
                    level,
                    module: None,
                    name: None,
                },
            });
            return;
        }
        for name in names {
            imports.push(RawImport {
                specifier: specifier.clone(),
                line,
                kind: ImportKind::RelativeImport {
                    level,
                    module: None,
                    name: Some(name),
                },
            });
        }
    }
}

impl ImportParser for PythonParser {
    fn language(&self) -> &str {
        &self.profile.id
    }

    fn parse_imports(&self, source: &str, _file_path: &str) -> Vec<RawImport> {
        let mut imports = Vec::new();
        for (line, text) in Self::logical_lines(source) {
            // A single physical line may hold several `;`-separated statements.
            for statement in text.split(';') {
                if let Some(caps) = FROM_STMT.captures(statement) {
                    let dots = caps.get(1).map_or("", |m| m.as_str());
                    let module = caps.get(2).map(|m| m.as_str());
                    let names = caps.get(3).map_or("", |m| m.as_str());
                    Self::parse_from_clause(dots, module, names, line, &mut imports);
                } else if let Some(caps) = IMPORT_STMT.captures(statement) {
                    let clause = caps.get(1).map_or("", |m| m.as_str());
                    Self::parse_import_clause(clause, line, &mut imports);
                }
            }
        }
        imports
    }

    fn resolve_import_path(&self, raw: &RawImport, file_path: &str) -> Option<String> {
        match &raw.kind {
            ImportKind::Direct => Some(format!("{}.py", module_to_path(&raw.specifier))),
            ImportKind::FromImport { module } => Some(format!("{}.py", module_to_path(module))),
            ImportKind::RelativeImport {
                level,
                module,
                name,
            } => {
                let base = paths::ascend(paths::parent_dir(file_path), level.saturating_sub(1))?;
                let leaf = match (module, name) {
                    (Some(module), _) => format!("{}.py", module_to_path(module)),
                    (None, Some(name)) => format!("{name}.py"),
                    (None, None) => INIT_FILE.to_string(),
                };
                paths::join(&base, &leaf)
            }
            _ => None,
        }
    }

    fn classify(&self, file_path: &str) -> String {
        self.profile.classify(file_path)
    }

    fn match_import(&self, raw: &RawImport, resolved: &str, known: &PathIndex) -> Option<String> {
        let mut candidates = vec![resolved.to_string()];
        if let Some(stem) = resolved.strip_suffix(".py") {
            if !resolved.ends_with(INIT_FILE) {
                candidates.push(format!("{stem}/{INIT_FILE}"));
            }
        }

        match &raw.kind {
            // `from . import name` may bind a name defined by the package itself.
            ImportKind::RelativeImport {
                module: None,
                name: Some(_),
                ..
            } => {
                let dir = paths::parent_dir(resolved);
                candidates.push(paths::join(dir, INIT_FILE).unwrap_or_else(|| INIT_FILE.to_string()));
            }
            ImportKind::Direct | ImportKind::FromImport { .. } => {
                let src_layout: Vec<String> = candidates.iter().map(|c| format!("src/{c}")).collect();
                candidates.extend(src_layout);
            }
            _ => {}
        }

        known.first_of(&candidates)
    }
}
