//! Boilerplate error definitions.

use crate::abi::MappingError;
use crate::types::ParseBytesError;
use thiserror::Error;

/// A type alias for std's Result with [`ParseError`] as the default error.
pub type Result<T, E = ParseError> = std::result::Result<T, E>;

/// Error that can occur while parsing signatures, type strings or JSON ABI.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("{0}")]
    Message(String),

    /// An identifier that is neither elementary nor registered in the type
    /// environment.
    #[error("unknown type `{0}`")]
    UnknownType(String),

    /// Errors from the human readable lexer, with position context.
    #[error(transparent)]
    LexerError(#[from] crate::abi::human_readable::lexer::LexerError),

    /// Malformed JSON ABI input.
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
}

macro_rules! _format_err {
    ($($tt:tt)*) => {
        $crate::abi::ParseError::Message(format!($($tt)*))
    };
}
pub(crate) use _format_err as format_err;

macro_rules! _bail {
    ($($tt:tt)*) => { return Err($crate::abi::error::format_err!($($tt)*)) };
}
pub(crate) use _bail as bail;

/// ABI codec related errors.
#[derive(Error, Debug)]
pub enum AbiError {
    /// An integer does not fit its declared bit width, bytes are too long for
    /// `bytesN`, an address is not 20 bytes, or a read length/offset does not
    /// fit the machine word.
    #[error("value out of range: {0}")]
    OutOfRange(String),

    /// A fixed-size value or tuple has the wrong number of elements.
    #[error("length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        expected: usize,
        got: usize,
    },

    /// The decoder ran past the end of the word buffer.
    #[error("unexpected end of input")]
    TruncatedInput,

    /// A dynamic offset is not a multiple of 32.
    #[error("offset {0} is not word aligned")]
    Misalignment(usize),

    /// A dynamic offset points beyond the word buffer.
    #[error("offset {0} out of range")]
    OffsetOutOfRange(usize),

    /// A computed offset overflowed.
    #[error("offset overflow")]
    OffsetOverflow,

    /// Calldata or error data does not start with the expected selector, or a
    /// log's `topics[0]` does not match the event.
    #[error("missing or wrong selector")]
    SelectorMismatch,

    /// The number of log topics is inconsistent with the event's indexed
    /// input count.
    #[error("expected {expected} topics, got {got}")]
    TopicArityMismatch {
        expected: usize,
        got: usize,
    },

    /// Decoded string payload is not valid UTF-8.
    #[error(transparent)]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// The mapper could not convert between a host value and a core value.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// Signature or type parsing failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Malformed hex input.
    #[error(transparent)]
    ParseBytes(#[from] ParseBytesError),
}

impl AbiError {
    pub(crate) fn out_of_range(msg: impl Into<String>) -> Self {
        AbiError::OutOfRange(msg.into())
    }
}
