use thiserror::Error;

use crate::factory::DescriptorKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("record is not compatible with the database schema: expected {expected:?}, found {found:?}")]
    SchemaIncompatible { expected: Vec<DescriptorKind>, found: Vec<DescriptorKind> },

    #[error("descriptor lists have different length: {left} != {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("descriptors at position {position} are not comparable")]
    NotComparable { position: usize },

    #[error("no comparator set for descriptor")]
    MissingComparator,

    #[error("unsupported descriptor kind: {0}")]
    UnsupportedDescriptorKind(String),

    #[error("media has no pixels")]
    EmptyMedia,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),
}
