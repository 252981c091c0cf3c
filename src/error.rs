/// Broad failure category, used for exit codes and for callers that need to
/// tell a malformed input apart from a missing upstream artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input text did not have the expected shape.
    Parse,
    /// A CLI argument or call parameter was out of range.
    InvalidArgument,
    /// An upstream file (raw export, clean series, model) is absent.
    MissingArtifact,
    /// Reading or writing an artifact failed for another reason.
    Io,
    /// Cleaning left nothing to model.
    EmptySeries,
    /// Model fitting or forecasting failed.
    Model,
}

impl ErrorKind {
    fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Parse | ErrorKind::InvalidArgument | ErrorKind::MissingArtifact | ErrorKind::Io => 2,
            ErrorKind::EmptySeries => 3,
            ErrorKind::Model => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            exit_code: kind.exit_code(),
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn missing_artifact(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingArtifact, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn empty_series(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptySeries, message)
    }

    pub fn model(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Model, message)
    }

    /// Map a file-open failure to `MissingArtifact` when the file is absent.
    pub fn from_open(err: &std::io::Error, what: &str, path: &std::path::Path) -> Self {
        let message = format!("Failed to open {what} '{}': {err}", path.display());
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::missing_artifact(message)
        } else {
            Self::io(message)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_kind() {
        assert_eq!(AppError::parse("x").exit_code(), 2);
        assert_eq!(AppError::empty_series("x").exit_code(), 3);
        assert_eq!(AppError::model("x").exit_code(), 4);
    }

    #[test]
    fn not_found_maps_to_missing_artifact() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let app = AppError::from_open(&err, "model", std::path::Path::new("m.json"));
        assert_eq!(app.kind(), ErrorKind::MissingArtifact);
        assert!(app.to_string().contains("m.json"));
    }
}
