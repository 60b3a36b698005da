use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum RepographError {
    #[error("Invalid input: {reason}")]
    #[diagnostic(code(repograph::invalid_input))]
    InvalidInput { reason: String },

    #[error("Repository not found: {path}")]
    #[diagnostic(
        code(repograph::repo_not_found),
        help("pass a path to an existing directory")
    )]
    RepoNotFound { path: PathBuf },

    #[error("Language '{id}' collides with an existing identifier or alias")]
    #[diagnostic(code(repograph::duplicate_language))]
    DuplicateLanguage { id: String },

    #[error("Could not fetch {path}: {message}")]
    #[diagnostic(code(repograph::fetch))]
    Fetch { path: String, message: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(repograph::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(repograph::io))]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(repograph::json))]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(code(repograph::glob))]
    Glob(#[from] globset::Error),
}

pub type Result<T> = std::result::Result<T, RepographError>;
