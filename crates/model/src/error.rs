use std::fmt::{self, Display, Formatter};

/// The kind of error that occurred while asking the assistant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The assistant was reached but responded with a non-success status.
    Server,
    /// The assistant could not be reached (DNS, connection, timeout).
    Connectivity,
    /// The assistant responded successfully but the payload was unusable.
    MalformedResponse,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Server => write!(f, "server error"),
            ErrorKind::Connectivity => write!(f, "connectivity error"),
            ErrorKind::MalformedResponse => write!(f, "malformed response"),
        }
    }
}
