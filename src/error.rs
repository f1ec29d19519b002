use thiserror::Error;

/// Faults raised by the harness itself.
///
/// Data-shape problems in responses are never errors; they become
/// failed verdicts. These variants cover programmer and environment
/// faults: bad configuration, unreachable services, unreadable files.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("invalid URL `{0}`")]
    InvalidUrl(String),

    #[error("unsupported HTTP method `{0}`")]
    UnknownMethod(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("suite file `{path}`: {message}")]
    Suite { path: String, message: String },

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("report rendering failed: {0}")]
    Template(#[from] minijinja::Error),
}
