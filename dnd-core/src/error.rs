//! Common error types.

use std::{error, fmt};

/// A general error that may occur while talking to the native drag-and-drop facilities.
#[derive(Debug)]
pub enum RequestError {
    /// The request is not supported, e.g. the window is not backed by a handle this backend can
    /// register a drop target on.
    NotSupported(NotSupportedError),
    /// The OS rejected the request.
    Os(OsError),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::NotSupported(err) => err.fmt(f),
            RequestError::Os(err) => err.fmt(f),
        }
    }
}

impl error::Error for RequestError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            RequestError::NotSupported(err) => Some(err),
            RequestError::Os(err) => Some(err),
        }
    }
}

impl From<NotSupportedError> for RequestError {
    fn from(value: NotSupportedError) -> Self {
        Self::NotSupported(value)
    }
}

impl From<OsError> for RequestError {
    fn from(value: OsError) -> Self {
        Self::Os(value)
    }
}

/// The error type for when the requested operation is not supported by the backend.
#[derive(Clone)]
pub struct NotSupportedError {
    reason: &'static str,
}

impl NotSupportedError {
    /// Create a new [`NotSupportedError`].
    #[inline]
    pub const fn new(reason: &'static str) -> NotSupportedError {
        NotSupportedError { reason }
    }
}

impl fmt::Debug for NotSupportedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotSupportedError").field("reason", &self.reason).finish()
    }
}

impl fmt::Display for NotSupportedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.reason)
    }
}

impl error::Error for NotSupportedError {}

/// The error type for when the OS cannot perform the requested operation.
#[derive(Debug)]
pub struct OsError {
    line: u32,
    file: &'static str,
    error: Box<dyn error::Error + Send + Sync + 'static>,
}

impl OsError {
    pub fn new(
        line: u32,
        file: &'static str,
        error: impl Into<Box<dyn error::Error + Send + Sync + 'static>>,
    ) -> Self {
        Self { line, file, error: error.into() }
    }
}

impl fmt::Display for OsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("os error at {}:{}: {}", self.file, self.line, self.error))
    }
}

impl error::Error for OsError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(self.error.as_ref())
    }
}

/// Build an [`OsError`] tagged with the current source location.
#[macro_export]
macro_rules! os_error {
    ($error:expr) => {{ $crate::error::OsError::new(line!(), file!(), $error) }};
}

/// The error produced when a dragged payload cannot be turned into an image.
#[derive(Debug)]
pub enum DecodeError {
    /// No codec is available for the payload's format.
    Unsupported,
    /// The payload is structurally invalid.
    Malformed(&'static str),
    /// The codec rejected the payload.
    Codec(Box<dyn error::Error + Send + Sync + 'static>),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Unsupported => f.pad("no decoder is available for this image format"),
            DecodeError::Malformed(what) => write!(f, "malformed image payload: {what}"),
            DecodeError::Codec(err) => write!(f, "image codec error: {err}"),
        }
    }
}

impl error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            DecodeError::Codec(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

#[cfg(feature = "image")]
impl From<::image::ImageError> for DecodeError {
    fn from(value: ::image::ImageError) -> Self {
        Self::Codec(Box::new(value))
    }
}
