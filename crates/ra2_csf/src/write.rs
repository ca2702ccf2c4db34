//! Types for writing CSF string tables
//!

use binrw::BinWrite;
use bon::Builder;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{Cursor, Write};
use tracing::instrument;

use crate::error::{Result, ValueError};
use crate::transform;
use crate::types::{
    CsfHeader, LabelHeader, StringEntry, StringHeader, StringTable, DEFAULT_LANGUAGE, LABEL_TAG,
    STRING_TAG, STRING_WITH_EXTRA_TAG,
};

/// Options for how the CSF file should be written
#[derive(Debug, Clone, Copy, Builder)]
pub struct CsfWriterOptions {
    /// Language code stored in the header
    #[builder(default = DEFAULT_LANGUAGE)]
    pub language: u32,
}

impl Default for CsfWriterOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// CSF file generator
///
/// ```
/// # fn doit() -> ra2_csf::error::Result<()>
/// # {
/// use ra2_csf::{CsfWriter, StringEntry, StringTable};
/// use ra2_csf::write::CsfWriterOptions;
///
/// let table: StringTable = [("GUI:OK", StringEntry::new("OK"))].into_iter().collect();
///
/// let mut csf = CsfWriter::new(Vec::new(), CsfWriterOptions::builder().language(0).build());
/// csf.write_table(&table)?;
///
/// let bytes = csf.finish();
/// assert_eq!(&bytes[..4], b" FSC");
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct CsfWriter<W: Write> {
    inner: W,
    options: CsfWriterOptions,
}

impl<W: Write> CsfWriter<W> {
    /// Create a writer around `inner`
    pub fn new(inner: W, options: CsfWriterOptions) -> CsfWriter<W> {
        CsfWriter { inner, options }
    }

    /// Serialize a whole table, one label and one string per entry.
    ///
    /// The table is checked before anything is written, so on error `inner`
    /// has not been touched.
    #[instrument(skip_all, err, fields(entries = table.len()))]
    pub fn write_table(&mut self, table: &StringTable) -> Result<()> {
        let entries = u32::try_from(table.len()).map_err(|_| ValueError::LengthOverflow {
            label: String::from("<table>"),
        })?;
        for (label, entry) in table {
            validate(label, entry)?;
        }

        let mut buffer = Cursor::new(Vec::new());
        CsfHeader {
            labels: entries,
            strings: entries,
            language: self.options.language,
            ..Default::default()
        }
        .write(&mut buffer)?;

        for (label, entry) in table {
            write_entry(&mut buffer, label, entry)?;
        }

        self.inner.write_all(buffer.get_ref())?;
        Ok(())
    }

    /// Return the inner writer
    pub fn finish(self) -> W {
        self.inner
    }
}

/// Encode a table into an in-memory CSF file
pub fn encode(table: &StringTable) -> Result<Vec<u8>> {
    let mut writer = CsfWriter::new(Vec::new(), CsfWriterOptions::default());
    writer.write_table(table)?;
    Ok(writer.finish())
}

fn validate(label: &str, entry: &StringEntry) -> Result<()> {
    let extra = entry.extra.as_deref().unwrap_or_default();
    if !label.is_ascii() || !extra.is_ascii() {
        return Err(ValueError::NonAsciiLabelOrExtra {
            label: label.to_owned(),
        }
        .into());
    }

    let fits = |length: usize| u32::try_from(length).is_ok();
    if !fits(label.len()) || !fits(entry.value.len()) || !fits(extra.len()) {
        return Err(ValueError::LengthOverflow {
            label: label.to_owned(),
        }
        .into());
    }

    Ok(())
}

fn write_entry(buffer: &mut Cursor<Vec<u8>>, label: &str, entry: &StringEntry) -> Result<()> {
    LabelHeader {
        tag: LABEL_TAG,
        strings: 1,
        name_length: label.len() as u32,
    }
    .write(buffer)?;
    buffer.write_all(label.as_bytes())?;

    StringHeader {
        tag: match entry.extra {
            Some(_) => STRING_WITH_EXTRA_TAG,
            None => STRING_TAG,
        },
        length: entry.value.len() as u32,
    }
    .write(buffer)?;
    buffer.write_all(&transform::encode_str(&entry.value))?;

    if let Some(extra) = &entry.extra {
        buffer.write_u32::<LittleEndian>(extra.len() as u32)?;
        buffer.write_all(extra.as_bytes())?;
    }

    Ok(())
}
