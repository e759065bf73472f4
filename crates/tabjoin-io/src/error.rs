use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported format for '{path}': {detail}")]
    UnsupportedFormat { path: String, detail: String },

    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{path}': {reason}")]
    Parse { path: String, reason: String },

    #[error("failed to write '{path}': {reason}")]
    Write { path: String, reason: String },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn parse(path: &str, reason: impl ToString) -> Self {
        Error::Parse {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: &str, reason: impl ToString) -> Self {
        Error::Write {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}
