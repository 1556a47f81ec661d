use thiserror::Error;

/// Errors raised by [`super::InventoryModel`] operations.
///
/// A caller passing an empty collection where the contract requires a
/// non-empty one. Fatal to the caller; never retried.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum InventoryError {
    #[error("InventoryModel: {0} must not be empty")]
    InvalidInput(&'static str),
}
