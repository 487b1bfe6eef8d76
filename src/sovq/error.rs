use thiserror::Error;

#[derive(Error, Debug)]
pub enum SovqError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Report not found: {0}")]
    ReportNotFound(String),

    #[error("Upload not tracked: {0}")]
    UploadNotFound(String),

    #[error("Stored file not found: {0}")]
    BlobNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

/// Coarse classification used by callers that only care how a failure
/// should be surfaced (rejected request, not-found result, or aborted operation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Storage,
}

impl SovqError {
    pub fn validation(msg: impl Into<String>) -> Self {
        SovqError::Validation(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SovqError::Validation(_) => ErrorKind::Validation,
            SovqError::ReportNotFound(_)
            | SovqError::UploadNotFound(_)
            | SovqError::BlobNotFound(_) => ErrorKind::NotFound,
            SovqError::Io(_) | SovqError::Serialization(_) | SovqError::Store(_) => {
                ErrorKind::Storage
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SovqError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_errors() {
        assert_eq!(
            SovqError::validation("bad").kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            SovqError::ReportNotFound("r".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            SovqError::BlobNotFound("b".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(SovqError::Store("x".into()).kind(), ErrorKind::Storage);

        let bad_json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(SovqError::from(bad_json).kind(), ErrorKind::Storage);
    }
}
