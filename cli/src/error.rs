use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum Error {
    #[error("cannot read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot unwrap PEM input: {0}")]
    Pem(#[from] pem::error::Error),

    #[error("cannot parse DER input: {0}")]
    Der(#[from] der::error::Error),

    #[error("{0}")]
    X509(#[from] x509::error::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
