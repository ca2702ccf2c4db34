//! JSON interchange for string tables
//!
//! A table is written as an object keyed by label, each entry holding a
//! `Value` and an optional `Extra`:
//!
//! ```json
//! {
//!   "GUI:OK": { "Value": "OK" },
//!   "GUI:Cancel": { "Value": "Cancel", "Extra": "note" }
//! }
//! ```

use std::io::{Read, Write};

use tracing::instrument;

use crate::error::Result;
use crate::types::StringTable;

/// (De)serialize a [`widestring::U16String`] as a plain string
pub(crate) mod wide {
    use std::fmt;

    use serde::{de::Visitor, Deserializer, Serializer};
    use widestring::U16String;

    pub fn serialize<S>(value: &U16String, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string_lossy())
    }

    struct WideVisitor;

    impl<'de> Visitor<'de> for WideVisitor {
        type Value = U16String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(U16String::from_str(v))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<U16String, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(WideVisitor)
    }
}

impl StringTable {
    /// Parse a table from its JSON form
    #[instrument(skip_all, err)]
    pub fn from_json_reader(reader: impl Read) -> Result<StringTable> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the table as pretty printed JSON
    #[instrument(skip_all, err, fields(entries = self.len()))]
    pub fn to_json_writer(&self, writer: impl Write) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
