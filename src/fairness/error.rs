use thiserror::Error;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum FairnessError {
    #[error("IsFairExchange: {0} side must not be empty")]
    InvalidInput(&'static str),
}
