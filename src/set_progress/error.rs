use thiserror::Error;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum SetProgressError {
    #[error(
        "IsTradeNeutralOrBetter: inventory does not contain enough of class_id {class_id} \
         to give (missing {missing})"
    )]
    InvalidInput { class_id: u64, missing: u32 },
}
