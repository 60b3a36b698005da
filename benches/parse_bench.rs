use criterion::{black_box, criterion_group, criterion_main, Criterion};
use repograph::language::LanguageRegistry;
use repograph::parse::ParserRegistry;

fn typescript_source_snippet() -> &'static str {
    "import React from 'react';\nimport { useState } from \"react\";\nimport { Button } from './components/Button';\nimport type { User } from '../types/user';\nimport '@/styles/global.css';\nexport * from './hooks';\nconst lazy = import('./pages/Settings');\nconst legacy = require('../lib/legacy');\n\nexport function App() {\n  return null;\n}\n"
}

fn python_source_snippet() -> &'static str {
    "import os\nimport sys\nfrom collections import OrderedDict\nfrom .utils import helper\nfrom ..config import settings\nfrom . import (\n    models,\n    views,\n)\n\n\ndef main():\n    \"\"\"import nothing here\"\"\"\n    pass\n"
}

fn bench_typescript_parse(c: &mut Criterion) {
    let languages = LanguageRegistry::builtin();
    let parsers = ParserRegistry::builtin(&languages);
    let parser = parsers.get_parser("javascript");
    let source = typescript_source_snippet();
    c.bench_function("typescript_regex_parse", |b| {
        b.iter(|| black_box(parser.parse_imports(black_box(source), "src/App.tsx")).len())
    });
}

fn bench_python_parse(c: &mut Criterion) {
    let languages = LanguageRegistry::builtin();
    let parsers = ParserRegistry::builtin(&languages);
    let parser = parsers.get_parser("python");
    let source = python_source_snippet();
    c.bench_function("python_regex_parse", |b| {
        b.iter(|| black_box(parser.parse_imports(black_box(source), "pkg/app/main.py")).len())
    });
}

fn bench_typescript_resolve(c: &mut Criterion) {
    let languages = LanguageRegistry::builtin();
    let parsers = ParserRegistry::builtin(&languages);
    let parser = parsers.get_parser("javascript");
    let imports = parser.parse_imports(typescript_source_snippet(), "src/App.tsx");
    c.bench_function("typescript_resolve", |b| {
        b.iter(|| {
            imports
                .iter()
                .filter_map(|raw| parser.resolve_import_path(raw, black_box("src/App.tsx")))
                .count()
        })
    });
}

criterion_group!(
    benches,
    bench_typescript_parse,
    bench_python_parse,
    bench_typescript_resolve
);
criterion_main!(benches);
