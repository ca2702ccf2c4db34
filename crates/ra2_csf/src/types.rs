//! Base types for the structure of a CSF file and the table it decodes to.

use binrw::{BinRead, BinWrite};
use derive_more::derive::{Constructor, Deref, DerefMut, IntoIterator};
use indexmap::IndexMap;
use widestring::U16String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Magic identifying a CSF file, `"CSF "` stored reversed
pub const CSF_MAGIC: [u8; 4] = *b" FSC";

/// The only supported format version
pub const CSF_VERSION: u32 = 3;

/// Language code written when no other is requested
pub const DEFAULT_LANGUAGE: u32 = 9;

/// Tag starting every label record
pub const LABEL_TAG: [u8; 4] = *b" LBL";

/// Tag of a string record without an extra value
pub const STRING_TAG: [u8; 4] = *b" RTS";

/// Tag of a string record followed by an extra value
pub const STRING_WITH_EXTRA_TAG: [u8; 4] = *b"WRTS";

pub(crate) const HEADER_SIZE: usize = 0x18;
pub(crate) const LABEL_HEADER_SIZE: usize = 0x0C;
pub(crate) const STRING_HEADER_SIZE: usize = 0x08;
pub(crate) const EXTRA_LENGTH_SIZE: usize = 0x04;

/// CSF file header
///
/// Every numeric field is a little endian `u32`.
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct CsfHeader {
    /// Should always be [`CSF_MAGIC`]
    pub magic: [u8; 4],

    /// Should always be [`CSF_VERSION`]
    pub version: u32,

    /// The number of label records in the file
    pub labels: u32,

    /// The number of string records in the file
    pub strings: u32,

    /// Unused, written as zero
    pub reserved: u32,

    /// Identifier of the language of the strings
    pub language: u32,
}

impl Default for CsfHeader {
    fn default() -> Self {
        Self {
            magic: CSF_MAGIC,
            version: CSF_VERSION,
            labels: Default::default(),
            strings: Default::default(),
            reserved: Default::default(),
            language: DEFAULT_LANGUAGE,
        }
    }
}

/// Header of a label record, followed by `name_length` bytes of name
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct LabelHeader {
    pub tag: [u8; 4],
    pub strings: u32,
    pub name_length: u32,
}

/// Header of a string record, followed by `length * 2` bytes of transformed UTF-16
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct StringHeader {
    pub tag: [u8; 4],
    pub length: u32,
}

impl StringHeader {
    /// Whether an extra value block follows the string data
    pub fn has_extra(&self) -> bool {
        self.tag == STRING_WITH_EXTRA_TAG
    }
}

/// A single localized string
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StringEntry {
    /// The text, as UTF-16 code units
    #[cfg_attr(feature = "serde", serde(rename = "Value", with = "crate::serde::wide"))]
    pub value: U16String,

    /// Optional ASCII value stored alongside the text
    #[cfg_attr(
        feature = "serde",
        serde(rename = "Extra", default, skip_serializing_if = "Option::is_none")
    )]
    pub extra: Option<String>,
}

impl StringEntry {
    /// Create an entry without an extra value
    pub fn new(value: impl AsRef<str>) -> Self {
        Self {
            value: U16String::from_str(value.as_ref()),
            extra: None,
        }
    }

    /// Create an entry carrying an extra value
    pub fn with_extra(value: impl AsRef<str>, extra: impl Into<String>) -> Self {
        Self {
            value: U16String::from_str(value.as_ref()),
            extra: Some(extra.into()),
        }
    }

    /// The text, with unpaired surrogates replaced
    pub fn value_lossy(&self) -> String {
        self.value.to_string_lossy()
    }
}

impl From<&str> for StringEntry {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Label to string mapping, kept in insertion order
///
/// Inserting an existing label replaces its entry in place.
#[derive(Constructor, Clone, Debug, Default, PartialEq, Eq, Deref, DerefMut, IntoIterator)]
#[into_iterator(owned, ref)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct StringTable(IndexMap<String, StringEntry>);

impl StringTable {
    /// Look up an entry by its label
    pub fn by_label(&self, label: impl AsRef<str>) -> Option<&StringEntry> {
        self.0.get(label.as_ref())
    }
}

impl<K: Into<String>, V: Into<StringEntry>> FromIterator<(K, V)> for StringTable {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
