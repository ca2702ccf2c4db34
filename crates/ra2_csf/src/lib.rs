//! # CSF Format Documentation
//!
//! This crate provides utilities to read and write the **CSF** string table format used by
//! *Command & Conquer: Red Alert 2* and *Yuri's Revenge*. A CSF file maps labels such as
//! `GUI:OK` to a localized string and, optionally, a second ASCII value. CSF files are
//! typically identified with the `.csf` extension.
//!
//! ## File Structure
//!
//! A CSF file consists of a header followed by a list of label records. Every label record
//! is followed by its string records.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: `" FSC"`                                          |
//! | 0x0004         | Version                | 4 bytes: Always 3                                          |
//! | 0x0008         | Label Count            | 4 bytes: The number of label records                       |
//! | 0x000C         | String Count           | 4 bytes: The number of string records                      |
//! | 0x0010         | Reserved               | 4 bytes: Unused                                            |
//! | 0x0014         | Language               | 4 bytes: Language code of the strings                      |
//!
//! ### Label Record
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | ID                     | 4 bytes: `" LBL"`                                       |
//! | 0x0004         | Strings                | 4 bytes: Number of string records for this label        |
//! | 0x0008         | Length                 | 4 bytes: Number of bytes in the name                    |
//! | 0x000C         | Name                   | (Length) bytes: ASCII label name                        |
//!
//! ### String Record
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | ID                     | 4 bytes: `" RTS"`, or `"WRTS"` when an extra follows    |
//! | 0x0004         | Characters             | 4 bytes: Number of UTF-16 code units                    |
//! | 0x0008         | Data                   | (Characters * 2) bytes: transformed UTF-16              |
//!
//! A `"WRTS"` record is followed by a 4 byte length and that many bytes of ASCII extra value.
//!
//! String data is stored bitwise complemented, see [`transform`] for the details.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.csf`
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod error;
pub mod read;
#[cfg(feature = "serde")]
pub mod serde;
pub mod transform;
pub mod types;
pub mod write;

pub use read::{decode, CsfReader};
pub use types::{StringEntry, StringTable};
pub use write::{encode, CsfWriter};
