use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

pub type StdErrorBoxed = Box<dyn std::error::Error + Send + Sync + 'static>;

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn out_of_range(name: impl Into<String>, index: u64, bound: u64) -> Error {
        ErrorKind::OutOfRange {
            name: name.into(),
            index,
            bound,
        }
        .into()
    }

    pub fn field_not_found(field: impl Into<String>) -> Error {
        ErrorKind::FieldNotFound {
            field: field.into(),
        }
        .into()
    }

    pub fn schema(element: impl Into<String>, message: impl Into<String>) -> Error {
        ErrorKind::SchemaError {
            element: element.into(),
            message: message.into(),
        }
        .into()
    }

    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Error {
        ErrorKind::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
        .into()
    }

    pub fn not_positioned() -> Error {
        ErrorKind::NotPositioned.into()
    }

    pub fn unsupported(message: impl Into<String>) -> Error {
        ErrorKind::Unsupported {
            message: message.into(),
        }
        .into()
    }

    pub fn invalid_format(name: impl Into<String>) -> Error {
        ErrorKind::InvalidFormat {
            element: name.into(),
            message: Default::default(),
        }
        .into()
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        ErrorKind::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
        .into()
    }

    pub fn connection<E>(address: impl Into<String>, source: E) -> Error
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ErrorKind::Connection {
            address: address.into(),
            source: Box::new(source),
        }
        .into()
    }

    /// Returns `true` if this error reports an index past its bound.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self.kind(), ErrorKind::OutOfRange { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("{name} {index} is out of range (bound {bound})")]
    OutOfRange { name: String, index: u64, bound: u64 },

    #[error("field {field} not found")]
    FieldNotFound { field: String },

    #[error("schema error for '{element}': {message}")]
    SchemaError { element: String, message: String },

    #[error("type mismatch: requested {expected}, stored {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("accessor is not positioned on a row")]
    NotPositioned,

    #[error("unsupported: {message}")]
    Unsupported { message: String },

    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid storage format for '{element}': {message}")]
    InvalidFormat { element: String, message: String },

    #[error("failed to connect to '{address}': {source}")]
    Connection {
        address: String,
        source: StdErrorBoxed,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(e: std::str::Utf8Error) -> Self {
        ErrorKind::InvalidFormat {
            element: "string".to_string(),
            message: e.to_string(),
        }
        .into()
    }
}
