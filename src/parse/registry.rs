use crate::language::registry::DEFAULT_LANGUAGE;
use crate::language::LanguageRegistry;
use crate::parse::ecmascript::EcmaScriptParser;
use crate::parse::python::PythonParser;
use crate::parse::ImportParser;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps language identifiers to their import parsers.
///
/// Lookup is total: unknown languages get the ECMAScript parser. Callers
/// that need to surface the fallback check `has_parser` first.
pub struct ParserRegistry {
    parsers: HashMap<String, Arc<dyn ImportParser>>,
    fallback: Arc<dyn ImportParser>,
}

impl ParserRegistry {
    /// Parsers for every built-in language that ships one.
    pub fn builtin(languages: &LanguageRegistry) -> Self {
        let js_profile = languages
            .lookup(DEFAULT_LANGUAGE)
            .unwrap_or_else(|| languages.default_profile())
            .clone();
        let fallback: Arc<dyn ImportParser> = Arc::new(EcmaScriptParser::new(js_profile));

        let mut registry = Self {
            parsers: HashMap::new(),
            fallback: Arc::clone(&fallback),
        };
        registry.register_parser(DEFAULT_LANGUAGE, fallback);
        if let Some(profile) = languages.lookup("python") {
            registry.register_parser("python", Arc::new(PythonParser::new(profile.clone())));
        }
        registry
    }

    /// Parser for a language, falling back to ECMAScript.
    pub fn get_parser(&self, language: &str) -> Arc<dyn ImportParser> {
        match self.parsers.get(&language.to_lowercase()) {
            Some(parser) => Arc::clone(parser),
            None => {
                tracing::warn!(
                    "no import parser for '{language}', falling back to {}",
                    self.fallback.language()
                );
                Arc::clone(&self.fallback)
            }
        }
    }

    pub fn has_parser(&self, language: &str) -> bool {
        self.parsers.contains_key(&language.to_lowercase())
    }

    /// Add or replace a parser. Last write wins.
    pub fn register_parser(&mut self, language: &str, parser: Arc<dyn ImportParser>) {
        self.parsers.insert(language.to_lowercase(), parser);
    }

    /// Identifiers with a registered parser, sorted.
    pub fn languages(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.parsers.keys().cloned().collect();
        ids.sort();
        ids
    }
}
