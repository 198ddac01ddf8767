use thiserror::Error;

#[derive(Debug, Error)]
pub enum MikazukiError {
    #[error("filter evaluation failed: {0}")]
    Filter(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
