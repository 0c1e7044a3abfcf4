use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsolidationError {
    /// Fewer than two combinable copies of any part.
    #[error("no repairable items found")]
    NoCandidates,
    /// A confirmation arrived with nothing awaiting it.
    #[error("no consolidation is awaiting confirmation")]
    NoPendingDecision,
}
