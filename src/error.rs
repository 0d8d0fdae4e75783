use image::ImageError;

use crate::io::{dataset::DatasetError, map::MapError};

/// Session slot that a command needs but was not loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    Map,
    Dataset,
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Session::Map => write!(f, "map"),
            Session::Dataset => write!(f, "dataset"),
        }
    }
}

/// Coarse classification of failures as reported to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SessionMissing,
    LoadFailure,
    RangeFailure,
    ParameterFailure,
    IoFailure,
}

/// Main error type for the library.
#[derive(Debug)]
pub enum Error {
    /// A command needs a map or dataset that is not loaded.
    SessionMissing(Session),
    Dataset(DatasetError),
    Map(MapError),
    /// Used when the user pass a malformed or out-of-domain argument.
    InvalidParameter(String),
    Io(std::io::Error),
    Image(ImageError),
}

impl Error {
    /// Create a error with the kind `InvalidParameter`.
    /// # Arguments
    /// * `msg` - The error message.
    pub fn invalid_parameter<T: ToString>(msg: T) -> Self {
        Error::InvalidParameter(msg.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SessionMissing(_) => ErrorKind::SessionMissing,
            Error::Dataset(err) => match err {
                DatasetError::IndexOutOfRange { .. } | DatasetError::TimeOutOfRange { .. } => {
                    ErrorKind::RangeFailure
                }
                DatasetError::InvalidParameter(_) => ErrorKind::ParameterFailure,
                DatasetError::Io(_) | DatasetError::Parser(_) | DatasetError::Image(_) => {
                    ErrorKind::LoadFailure
                }
            },
            Error::Map(_) => ErrorKind::LoadFailure,
            Error::InvalidParameter(_) => ErrorKind::ParameterFailure,
            Error::Io(_) | Error::Image(_) => ErrorKind::IoFailure,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::SessionMissing(session) => write!(f, "No {session} loaded"),
            Error::Dataset(err) => write!(f, "Dataset error: {err}"),
            Error::Map(err) => write!(f, "Map error: {err}"),
            Error::InvalidParameter(err) => write!(f, "Parameter error: {err}"),
            Error::Io(err) => write!(f, "IO error: {err}"),
            Error::Image(err) => write!(f, "Image error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::SessionMissing(_) => None,
            Error::Dataset(err) => Some(err),
            Error::Map(err) => Some(err),
            Error::InvalidParameter(_) => None,
            Error::Io(err) => Some(err),
            Error::Image(err) => Some(err),
        }
    }
}

impl From<DatasetError> for Error {
    fn from(err: DatasetError) -> Self {
        Error::Dataset(err)
    }
}

impl From<MapError> for Error {
    fn from(err: MapError) -> Self {
        Error::Map(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<ImageError> for Error {
    fn from(err: ImageError) -> Self {
        Error::Image(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let range = Error::from(DatasetError::TimeOutOfRange {
            seconds: 400.0,
            duration: 300.0,
        });
        assert_eq!(range.kind(), ErrorKind::RangeFailure);

        let zoom = Error::from(DatasetError::InvalidParameter("zoom".to_string()));
        assert_eq!(zoom.kind(), ErrorKind::ParameterFailure);

        let load = Error::from(MapError::Parser("eof".to_string()));
        assert_eq!(load.kind(), ErrorKind::LoadFailure);

        assert_eq!(
            Error::SessionMissing(Session::Map).to_string(),
            "No map loaded"
        );
    }
}
