//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(binrw::Error),

    /// Transparent wrapper for [`serde_json::Error`]
    #[error(transparent)]
    JSONError(#[from] serde_json::Error),

    /// file is not a valid string table
    #[error("file is not a valid string table")]
    #[diagnostic(code(ra2_csf::format))]
    Format(#[from] FormatError),

    /// string table can not be written
    #[error("string table can not be written")]
    #[diagnostic(code(ra2_csf::value))]
    Value(#[from] ValueError),
}

/// Structural problems found while decoding a CSF file
#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum FormatError {
    /// magic {found:?} is not " FSC"
    #[error("magic {found:?} is not \" FSC\"")]
    BadMagic { found: [u8; 4] },

    /// version {0} is not supported
    #[error("version {0} is not supported")]
    UnsupportedVersion(u32),

    /// input ended while reading {context}
    #[error("input ended while reading {context}: expected {expected} bytes, found {found}")]
    TruncatedInput {
        context: &'static str,
        expected: u64,
        found: u64,
    },

    /// label tag {found:?} is not " LBL"
    #[error("label tag {found:?} is not \" LBL\"")]
    InvalidLabelId { found: [u8; 4] },

    /// string tag {found:?} is neither " RTS" nor "WRTS"
    #[error("string tag {found:?} is neither \" RTS\" nor \"WRTS\"")]
    InvalidStringId { found: [u8; 4] },
}

/// Table contents that can not be represented on disk
#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum ValueError {
    /// label {label} or its extra value is not 7-bit ASCII
    #[error("label {label:?} or its extra value is not 7-bit ASCII")]
    NonAsciiLabelOrExtra { label: String },

    /// a length in {label} does not fit in 32 bits
    #[error("a length in {label:?} does not fit in 32 bits")]
    LengthOverflow { label: String },
}

impl From<binrw::Error> for Error {
    fn from(value: binrw::Error) -> Self {
        match value {
            binrw::Error::Io(e) => Error::from(e),
            other => Error::BinRWError(other),
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
