//! Sequential bincode archive
//!
//! The persisted file is a concatenation of independently encoded fields.
//! [`ArchiveReader`] decodes them one at a time so a caller can stop at the
//! first field that fails and keep what was read before it.

use bincode::config::{self, Config};
use bincode::{Decode, Encode};
use biosconf_api::{Error, Result};

/// Largest allocation a decoded length prefix may request
pub const DECODE_LIMIT: usize = 16 * 1024 * 1024;

/// Magic leading every tagged archive
pub const MAGIC: [u8; 4] = *b"BCFG";

/// Schema version written by this build
pub const CURRENT_VERSION: u32 = 2;

fn decode_config() -> impl Config {
    config::standard().with_limit::<DECODE_LIMIT>()
}

/// Leading tag of a version 2 archive; version 1 archives carry none
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct VersionTag {
    pub magic: [u8; 4],
    pub version: u32,
}

impl VersionTag {
    pub fn current() -> Self {
        Self {
            magic: MAGIC,
            version: CURRENT_VERSION,
        }
    }

    /// Reject foreign magic and versions this build cannot read
    pub fn check(&self) -> Result<()> {
        if self.magic != MAGIC {
            return Err(Error::Persistence("missing archive magic".to_string()));
        }
        if self.version != CURRENT_VERSION {
            return Err(Error::Persistence(format!("unsupported archive version {}", self.version)));
        }
        Ok(())
    }
}

/// Appends encoded fields to a byte buffer
#[derive(Debug, Default)]
pub struct ArchiveWriter {
    bytes: Vec<u8>,
}

impl ArchiveWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value`, refusing it if [`ArchiveReader`] could not read it back
    pub fn write<T: Encode + Decode<()>>(&mut self, value: &T) -> Result<()> {
        let field = bincode::encode_to_vec(value, config::standard())?;
        if let Err(err) = bincode::decode_from_slice::<T, _>(&field, decode_config()) {
            log::error!("Refusing to write a {} byte field: {}", field.len(), err);
            return Err(Error::Persistence(format!("field not readable under the decode limit: {}", err)));
        }
        self.bytes.extend_from_slice(&field);
        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Decodes fields from a byte slice in order
#[derive(Debug)]
pub struct ArchiveReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ArchiveReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Decode the next field, advancing past it on success only
    pub fn read<T: Decode<()>>(&mut self) -> Result<T> {
        let rest = self.bytes.get(self.offset..).unwrap_or_default();
        let (value, consumed) = bincode::decode_from_slice(rest, decode_config())?;
        self.offset += consumed;
        Ok(value)
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_fields() {
        let mut writer = ArchiveWriter::new();
        writer.write(&VersionTag::current()).unwrap();
        writer.write(&vec!["a".to_string(), "b".to_string()]).unwrap();
        writer.write(&true).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = ArchiveReader::new(&bytes);
        let tag: VersionTag = reader.read().unwrap();
        assert!(tag.check().is_ok());
        let order: Vec<String> = reader.read().unwrap();
        assert_eq!(order, vec!["a".to_string(), "b".to_string()]);
        assert!(reader.read::<bool>().unwrap());
        assert_eq!(reader.remaining(), 0);
        assert!(reader.read::<bool>().is_err());
    }

    #[test]
    fn test_version_tag_check() {
        let foreign = VersionTag {
            magic: *b"NOPE",
            version: CURRENT_VERSION,
        };
        assert!(foreign.check().is_err());

        let future = VersionTag {
            magic: MAGIC,
            version: CURRENT_VERSION + 1,
        };
        assert!(future.check().is_err());
    }

    #[test]
    fn test_write_rejects_field_over_decode_limit() {
        let mut writer = ArchiveWriter::new();
        writer.write(&true).unwrap();

        let err = writer.write(&"x".repeat(DECODE_LIMIT + 1)).unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));

        // the rejected field leaves nothing behind
        let bytes = writer.into_bytes();
        let mut reader = ArchiveReader::new(&bytes);
        assert!(reader.read::<bool>().unwrap());
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_write_accepts_field_at_decode_limit() {
        let mut writer = ArchiveWriter::new();
        writer.write(&"x".repeat(DECODE_LIMIT - 16)).unwrap();
        let bytes = writer.into_bytes();
        assert_eq!(ArchiveReader::new(&bytes).read::<String>().unwrap().len(), DECODE_LIMIT - 16);
    }

    #[test]
    fn test_oversized_length_prefix_rejected() {
        let mut writer = ArchiveWriter::new();
        // a length prefix claiming far more elements than the limit allows
        writer.write(&(u64::MAX / 2)).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = ArchiveReader::new(&bytes);
        assert!(reader.read::<Vec<String>>().is_err());
    }
}
