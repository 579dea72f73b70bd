use serde::Serialize;

/// Kind of resource a lookup failed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    MenuItem,
    Order,
    Customer,
    ShelfItem,
}

#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("{message}")]
    NotFound {
        resource: ResourceType,
        message: String,
    },
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn not_found(resource: ResourceType, message: impl Into<String>) -> Self {
        ServiceError::NotFound {
            resource,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::InvalidArgument(message.into())
    }
}
