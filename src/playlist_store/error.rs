#[derive(Debug, thiserror::Error)]
pub enum PlaylistError {
    #[error("No valid Spotify session, please login again")]
    NotAuthenticated,
    #[error("No playlist has been loaded")]
    NoPlaylistLoaded,
    #[error("Batch size must be at least 1")]
    InvalidBatchSize,
    #[error("Failed to {step}: {report}")]
    Remote {
        step: &'static str,
        report: color_eyre::Report,
    },
    #[error("Save stopped at batch {batch} of {batches}: {report}")]
    SaveInterrupted {
        batch: usize,
        batches: usize,
        report: color_eyre::Report,
    },
}

impl PlaylistError {
    pub(super) fn remote(step: &'static str) -> impl FnOnce(color_eyre::Report) -> Self {
        move |report| PlaylistError::Remote { step, report }
    }
}
