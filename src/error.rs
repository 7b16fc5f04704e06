//! Error type shared by every stage of web generation.

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WebError>;

/// Failures surfaced by the generation engine.
///
/// All of these are local precondition failures: generation is deterministic,
/// so retrying with the same seed and inputs reproduces the same error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WebError {
    #[error("Degenerate plane: {reason}")]
    DegeneratePlane { reason: &'static str },

    #[error("Insufficient anchors: {found} found, at least 3 required")]
    InsufficientAnchors { found: usize },

    #[error("Insufficient topology in {stage} stage: {found} found, at least 2 required")]
    InsufficientTopology { stage: &'static str, found: usize },

    #[error("UV projection has zero extent")]
    ZeroExtentProjection,
}
