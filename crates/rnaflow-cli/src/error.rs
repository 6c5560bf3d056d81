use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] rnaflow_core::errors::ConfigError),

    #[error(transparent)]
    Store(#[from] rnaflow_core::errors::StoreError),

    #[error(transparent)]
    Pipeline(#[from] rnaflow_client::error::PipelineError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
