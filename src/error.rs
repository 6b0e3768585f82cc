pub type Result<T> = std::result::Result<T, WarehouseError>;

#[derive(Debug, thiserror::Error)]
pub enum WarehouseError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid action: {0}")]
    InvalidAction(String),
    #[error("failed to decode value table: {0}")]
    Deserialization(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}
