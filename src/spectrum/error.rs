use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpectrumError {
    /// A configuration field is outside the range the pipeline can work with.
    #[error("Invalid spectrum configuration: {0}")]
    InvalidConfiguration(String),

    /// The frame cannot be analysed, e.g. the window weights sum to zero.
    /// Backends turn this into a zero-filled frame instead of surfacing it.
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Sample buffer holds {available} samples but the analysis window needs {needed}")]
    BufferTooShort { needed: usize, available: usize },

    #[error("process() called before prepare()")]
    NotPrepared,

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
