use thiserror::Error;

/// Failure of a call into one of the [`super`] collaborator traits.
///
/// Always surfaces to the pipeline as [`crate::model::TradeResult::TryAgain`],
/// never a hard failure of the engine itself.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ExternalError {
    #[error("transport failure calling the trading service: {0}")]
    Transport(String),

    #[error("trading service returned no data for the request")]
    Empty,
}
