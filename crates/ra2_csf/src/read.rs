//! Types for reading CSF string tables
//!

use binrw::BinRead;
use bon::Builder;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read, Seek, SeekFrom};
use tracing::{debug, instrument, warn};

use crate::error::{FormatError, Result};
use crate::transform;
use crate::types::{
    CsfHeader, LabelHeader, StringEntry, StringHeader, StringTable, CSF_MAGIC, CSF_VERSION,
    EXTRA_LENGTH_SIZE, HEADER_SIZE, LABEL_HEADER_SIZE, LABEL_TAG, STRING_HEADER_SIZE,
    STRING_TAG, STRING_WITH_EXTRA_TAG,
};

/// Where the bytes of an extra value are read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtraOffset {
    /// Directly after the extra length field
    #[default]
    Sequential,

    /// `extra length` bytes after the start of the length field, as the
    /// original string table tool reads it. Only differs from
    /// [`ExtraOffset::Sequential`] when the extra length is not 4.
    Legacy,
}

/// Options for how a CSF file should be read
#[derive(Debug, Clone, Copy, Default, Builder)]
pub struct ReadOptions {
    /// Where extra values are located
    #[builder(default)]
    pub extra_offset: ExtraOffset,
}

/// CSF file reader
///
/// ```no_run
/// use std::io::prelude::*;
///
/// fn list_entries(reader: impl Read + Seek) -> ra2_csf::error::Result<()> {
///     let csf = ra2_csf::CsfReader::new(reader)?;
///
///     for (label, entry) in csf.table() {
///         println!("{}: {}", label, entry.value.display());
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CsfReader {
    header: CsfHeader,
    table: StringTable,
}

impl CsfReader {
    /// Read a CSF file and parse its entries.
    pub fn new<R: Read + Seek>(reader: R) -> Result<CsfReader> {
        Self::with_options(reader, ReadOptions::default())
    }

    /// Read a CSF file with non-default options.
    #[instrument(skip(reader), err)]
    pub fn with_options<R: Read + Seek>(mut reader: R, options: ReadOptions) -> Result<CsfReader> {
        let header: CsfHeader = read_record(&mut reader, HEADER_SIZE, "file header")?;
        if header.magic != CSF_MAGIC {
            return Err(FormatError::BadMagic {
                found: header.magic,
            }
            .into());
        }
        if header.version != CSF_VERSION {
            return Err(FormatError::UnsupportedVersion(header.version).into());
        }

        debug!(
            labels = header.labels,
            strings = header.strings,
            language = header.language,
            "read header"
        );

        let mut table = StringTable::default();
        let mut strings_read = 0u64;
        for _ in 0..header.labels {
            let label: LabelHeader = read_record(&mut reader, LABEL_HEADER_SIZE, "label header")?;
            if label.tag != LABEL_TAG {
                return Err(FormatError::InvalidLabelId { found: label.tag }.into());
            }

            let name = read_bytes(&mut reader, label.name_length as u64, "label name")?;
            let name = ascii_lossy(&name);

            for _ in 0..label.strings {
                let entry = read_string(&mut reader, options.extra_offset)?;
                strings_read += 1;

                if table.insert(name.clone(), entry).is_some() {
                    debug!(label = %name, "replacing previous entry");
                }
            }
        }

        if strings_read != header.strings as u64 {
            warn!(
                declared = header.strings,
                found = strings_read,
                "string count does not match the header"
            );
        }

        Ok(CsfReader { header, table })
    }

    /// Header of the parsed file
    pub fn header(&self) -> &CsfHeader {
        &self.header
    }

    /// Language code stored in the header
    pub fn language(&self) -> u32 {
        self.header.language
    }

    /// Number of entries contained in this CSF.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether this CSF contains no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a reference to the entries in this file
    pub fn table(&self) -> &StringTable {
        &self.table
    }

    /// Try to get an entry from this file by its label
    pub fn by_label(&self, label: impl AsRef<str>) -> Option<&StringEntry> {
        self.table.by_label(label)
    }

    /// Take the entries out of the reader
    pub fn into_table(self) -> StringTable {
        self.table
    }
}

/// Decode an in-memory CSF file
pub fn decode(data: &[u8]) -> Result<StringTable> {
    Ok(CsfReader::new(Cursor::new(data))?.into_table())
}

fn read_string<R: Read + Seek>(reader: &mut R, extra_offset: ExtraOffset) -> Result<StringEntry> {
    let header: StringHeader = read_record(reader, STRING_HEADER_SIZE, "string header")?;
    if header.tag != STRING_TAG && header.tag != STRING_WITH_EXTRA_TAG {
        return Err(FormatError::InvalidStringId { found: header.tag }.into());
    }

    let data = read_bytes(reader, header.length as u64 * 2, "string data")?;
    let value = transform::decode_bytes(&data);

    let extra = if header.has_extra() {
        let bytes = read_extra(reader, extra_offset)?;
        Some(ascii_lossy(&bytes))
    } else {
        None
    };

    Ok(StringEntry { value, extra })
}

fn read_extra<R: Read + Seek>(reader: &mut R, extra_offset: ExtraOffset) -> Result<Vec<u8>> {
    let length_at = reader.stream_position()?;
    let length = read_bytes(reader, EXTRA_LENGTH_SIZE as u64, "extra length")?;
    let length = Cursor::new(length).read_u32::<LittleEndian>()? as u64;

    match extra_offset {
        ExtraOffset::Sequential => read_bytes(reader, length, "extra value"),
        ExtraOffset::Legacy => {
            reader.seek(SeekFrom::Start(length_at + length))?;
            let bytes = read_bytes(reader, length, "extra value")?;
            reader.seek(SeekFrom::Start(
                length_at + EXTRA_LENGTH_SIZE as u64 + length,
            ))?;
            Ok(bytes)
        }
    }
}

fn read_record<T, R>(reader: &mut R, size: usize, context: &'static str) -> Result<T>
where
    R: Read,
    T: for<'a> BinRead<Args<'a> = ()>,
{
    let bytes = read_bytes(reader, size as u64, context)?;
    Ok(T::read_le(&mut Cursor::new(bytes))?)
}

/// Decode ASCII text, clearing the high bit of every byte
fn ascii_lossy(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b & 0x7F)).collect()
}

/// Read exactly `length` bytes without trusting `length` for the allocation
fn read_bytes<R: Read>(reader: &mut R, length: u64, context: &'static str) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    reader.by_ref().take(length).read_to_end(&mut buffer)?;

    if (buffer.len() as u64) < length {
        return Err(FormatError::TruncatedInput {
            context,
            expected: length,
            found: buffer.len() as u64,
        }
        .into());
    }

    Ok(buffer)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use tracing_test::traced_test;

    use crate::error::{Error, FormatError, Result};
    use crate::read::{decode, CsfReader, ExtraOffset, ReadOptions};
    use crate::types::StringEntry;

    #[rustfmt::skip]
    const SINGLE_ENTRY: [u8; 48] = [
        // Header
        0x20, 0x46, 0x53, 0x43,
        0x03, 0x00, 0x00, 0x00,
        0x01, 0x00, 0x00, 0x00,
        0x01, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
        0x09, 0x00, 0x00, 0x00,
        // Label
        0x20, 0x4C, 0x42, 0x4C,
        0x01, 0x00, 0x00, 0x00,
        0x02, 0x00, 0x00, 0x00,
        0x4F, 0x4B,
        // String
        0x20, 0x52, 0x54, 0x53,
        0x01, 0x00, 0x00, 0x00,
        0xB7, 0xFF,
    ];

    fn format_error(result: Result<impl std::fmt::Debug>) -> FormatError {
        match result {
            Err(Error::Format(e)) => e,
            other => panic!("expected a format error, got {other:?}"),
        }
    }

    #[traced_test]
    #[test]
    fn read_single_entry() -> Result<()> {
        let csf = CsfReader::new(Cursor::new(SINGLE_ENTRY))?;

        assert_eq!(csf.len(), 1);
        assert_eq!(csf.language(), 9);
        assert_eq!(csf.by_label("OK"), Some(&StringEntry::new("H")));

        Ok(())
    }

    #[test]
    fn read_invalid_magic() {
        let mut input = SINGLE_ENTRY;
        input[0] = 0x43;

        assert_eq!(
            format_error(decode(&input)),
            FormatError::BadMagic { found: *b"CFSC" }
        );
    }

    #[test]
    fn read_unsupported_version() {
        for version in [0u8, 2, 4, 0xFF] {
            let mut input = SINGLE_ENTRY;
            input[4] = version;

            assert_eq!(
                format_error(decode(&input)),
                FormatError::UnsupportedVersion(version as u32)
            );
        }
    }

    #[test]
    fn read_invalid_label_tag() {
        let mut input = SINGLE_ENTRY;
        input[24] = b'X';

        assert_eq!(
            format_error(decode(&input)),
            FormatError::InvalidLabelId { found: *b"XLBL" }
        );
    }

    #[test]
    fn read_invalid_string_tag() {
        let mut input = SINGLE_ENTRY;
        input[38] = b'X';

        assert_eq!(
            format_error(decode(&input)),
            FormatError::InvalidStringId { found: *b"XRTS" }
        );
    }

    #[test]
    fn read_truncated_at_every_length() {
        for length in 0..SINGLE_ENTRY.len() {
            let error = format_error(decode(&SINGLE_ENTRY[..length]));
            assert!(
                matches!(error, FormatError::TruncatedInput { .. }),
                "length {length}: {error:?}"
            );
        }
    }

    #[test]
    fn read_huge_declared_length_is_truncated() {
        let mut input = SINGLE_ENTRY;
        input[42..46].copy_from_slice(&[0xFF, 0xFF, 0xFF, 0x7F]);

        assert_eq!(
            format_error(decode(&input)),
            FormatError::TruncatedInput {
                context: "string data",
                expected: 0x7FFF_FFFF * 2,
                found: 2,
            }
        );
    }

    #[test]
    fn read_empty_table() -> Result<()> {
        let mut input = SINGLE_ENTRY[..24].to_vec();
        input[8] = 0;
        input[12] = 0;

        let table = decode(&input)?;
        assert!(table.is_empty());
        Ok(())
    }

    #[rustfmt::skip]
    fn with_extra(extra: &[u8]) -> Vec<u8> {
        let mut data = vec![
            // Header
            0x20, 0x46, 0x53, 0x43,
            0x03, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x09, 0x00, 0x00, 0x00,
            // Label
            0x20, 0x4C, 0x42, 0x4C,
            0x01, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x41,
            // String
            0x57, 0x52, 0x54, 0x53,
            0x00, 0x00, 0x00, 0x00,
        ];
        data.extend_from_slice(&(extra.len() as u32).to_le_bytes());
        data.extend_from_slice(extra);
        data
    }

    #[test]
    fn read_high_bit_label_and_extra_as_ascii() -> Result<()> {
        let mut input = with_extra(&[b'n', 0xEF, b't', 0xE5]);
        input[36] = 0xC1;

        let table = decode(&input)?;
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["A"]);
        assert_eq!(table.by_label("A"), Some(&StringEntry::with_extra("", "note")));

        let rewritten = crate::write::encode(&table)?;
        input[36] = b'A';
        let len = input.len();
        input[len - 3] = b'o';
        input[len - 1] = b'e';
        assert_eq!(rewritten, input);

        Ok(())
    }

    #[test]
    fn read_extra_sequential() -> Result<()> {
        let table = decode(&with_extra(b"sound"))?;
        assert_eq!(table.by_label("A"), Some(&StringEntry::with_extra("", "sound")));
        Ok(())
    }

    #[test]
    fn read_extra_legacy_matches_when_length_is_four() -> Result<()> {
        let options = ReadOptions::builder()
            .extra_offset(ExtraOffset::Legacy)
            .build();
        let csf = CsfReader::with_options(Cursor::new(with_extra(b"note")), options)?;
        assert_eq!(csf.by_label("A"), Some(&StringEntry::with_extra("", "note")));
        Ok(())
    }

    #[test]
    fn read_extra_legacy_offset() -> Result<()> {
        // The legacy read starts `length` bytes after the start of the length
        // field: two bytes into the value for a length of 6, running two bytes
        // past the record.
        let mut input = with_extra(b"abcdef");
        input.extend_from_slice(b"XY");

        let options = ReadOptions::builder()
            .extra_offset(ExtraOffset::Legacy)
            .build();
        let csf = CsfReader::with_options(Cursor::new(input), options)?;
        assert_eq!(csf.by_label("A"), Some(&StringEntry::with_extra("", "cdefXY")));
        Ok(())
    }

    #[test]
    fn read_extra_legacy_past_end_is_truncated() {
        let options = ReadOptions::builder()
            .extra_offset(ExtraOffset::Legacy)
            .build();
        let error = format_error(CsfReader::with_options(
            Cursor::new(with_extra(b"sound")),
            options,
        ));
        assert!(matches!(error, FormatError::TruncatedInput { context: "extra value", .. }));
    }

    #[traced_test]
    #[test]
    fn read_label_collision_keeps_last() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            // Header
            0x20, 0x46, 0x53, 0x43,
            0x03, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x09, 0x00, 0x00, 0x00,
            // Label "A" -> "1"
            0x20, 0x4C, 0x42, 0x4C,
            0x01, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x41,
            0x20, 0x52, 0x54, 0x53,
            0x01, 0x00, 0x00, 0x00,
            0xCE, 0xFF,
            // Label "A" -> "2"
            0x20, 0x4C, 0x42, 0x4C,
            0x01, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x41,
            0x20, 0x52, 0x54, 0x53,
            0x01, 0x00, 0x00, 0x00,
            0xCD, 0xFF,
        ];

        let table = decode(&input)?;
        assert_eq!(table.len(), 1);
        assert_eq!(table.by_label("A"), Some(&StringEntry::new("2")));
        assert!(logs_contain("replacing previous entry"));

        Ok(())
    }

    #[traced_test]
    #[test]
    fn read_multiple_strings_in_label_keeps_last() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            // Header
            0x20, 0x46, 0x53, 0x43,
            0x03, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x09, 0x00, 0x00, 0x00,
            // Label "A" with two strings
            0x20, 0x4C, 0x42, 0x4C,
            0x02, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x41,
            0x20, 0x52, 0x54, 0x53,
            0x01, 0x00, 0x00, 0x00,
            0xCE, 0xFF,
            0x20, 0x52, 0x54, 0x53,
            0x01, 0x00, 0x00, 0x00,
            0xCD, 0xFF,
        ];

        let table = decode(&input)?;
        assert_eq!(table.by_label("A"), Some(&StringEntry::new("2")));
        assert!(logs_contain("string count does not match the header"));

        Ok(())
    }
}
