//! Error types for STEP graph parsing and label injection.

use thiserror::Error;

/// Errors that can occur while parsing a STEP entity graph or injecting
/// face labels.
///
/// Every variant is fatal to the pipeline: each one signals a structural
/// mismatch (wrong file, stale export, unsupported record shape) rather
/// than a transient condition, so nothing is retried and no partial output
/// is ever produced.
#[derive(Error, Debug)]
pub enum StepError {
    /// The file contains no shell record, so there is no face order to
    /// correlate against.
    #[error("no shell record found in file")]
    ShellNotFound,

    /// The shell face sequence and the label sequence disagree in length.
    #[error("face count mismatch: shell records reference {shell_faces} faces, got {labels} labels")]
    FaceCountMismatch {
        /// Faces referenced by the shell record(s).
        shell_faces: usize,
        /// Labels supplied by the classifier.
        labels: usize,
    },

    /// A face id referenced by a shell record has no entity record.
    #[error("missing entity record: #{0}")]
    MissingEntity(u64),

    /// An entity record does not match the expected face-record shape at
    /// the point of substitution.
    #[error("record #{id}: {message}")]
    RecordShape {
        /// Entity id of the offending record.
        id: u64,
        /// What deviated from the expected shape.
        message: String,
    },
}

impl StepError {
    /// Create a record-shape error.
    pub fn record_shape(id: u64, message: impl Into<String>) -> Self {
        Self::RecordShape {
            id,
            message: message.into(),
        }
    }
}
