// SPDX-License-Identifier: Apache-2.0

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum ErrorKind {
    InvalidArgument,
    /// An address or header field value does not match its fixed byte width.
    InvalidFieldWidth,
    IoError,
    Bug,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PingError {
    kind: ErrorKind,
    msg: String,
}

impl PingError {
    pub fn new(kind: ErrorKind, msg: String) -> Self {
        Self { kind, msg }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn msg(&self) -> &str {
        self.msg.as_str()
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::fmt::Display for PingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.msg)
    }
}

impl std::error::Error for PingError {}

pub(crate) trait ErrorContext<T> {
    fn context(self, msg: &str) -> Result<T, PingError>;
}

impl<T> ErrorContext<T> for Result<T, PingError> {
    fn context(self, msg: &str) -> Result<T, PingError> {
        self.map_err(|e| PingError::new(e.kind, format!("{msg}: {}", e.msg)))
    }
}

impl From<std::io::Error> for PingError {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorKind::IoError, format!("IO error: {e}"))
    }
}

impl From<nix::errno::Errno> for PingError {
    fn from(e: nix::errno::Errno) -> Self {
        Self::new(ErrorKind::IoError, format!("System call failed: {e}"))
    }
}
