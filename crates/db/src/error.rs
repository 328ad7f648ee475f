use core::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    /// The record violates the schema constraints.
    BadInput,
    /// No record matched the query.
    NotFound,
    /// Another record already claims the same origin.
    AlreadyExists,
    /// Unrecoverable error.
    Fatal,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BadInput => "record violates the schema",
            Self::NotFound => "record not found",
            Self::AlreadyExists => "record already exists",
            Self::Fatal => "unrecoverable database error",
        })
    }
}

pub type Result<T> = core::result::Result<T, Error>;
