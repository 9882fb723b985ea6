//! Crate-wide error type.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("precedence edge ({fr}, {to}) references a category outside 0..{count}")]
    EdgeOutOfRange { fr: usize, to: usize, count: usize },
    #[error("precedence edges form a cycle: {cycle:?}")]
    PrecedenceCycle { cycle: Vec<usize> },
    #[error("entity index failed: {0}")]
    EntityIndex(String),
    #[error("routing engine failed: {0}")]
    RoutingEngine(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn entity_index(message: impl Into<String>) -> Self {
        Self::EntityIndex(message.into())
    }

    pub fn routing_engine(message: impl Into<String>) -> Self {
        Self::RoutingEngine(message.into())
    }
}
