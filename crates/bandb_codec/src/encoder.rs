//! Ban record encoder.

use crate::entry::Entry;
use crate::error::{CodecError, CodecResult};
use crate::{HEADER_SIZE, MAX_STRING_LEN, MAX_VAR_ENTRIES};
use bytes::BufMut;

/// Encode one entry to its on-disk bytes.
///
/// `entry.position` is not encoded.
///
/// # Errors
///
/// Returns an error if a string or the var block is too large for its
/// length prefix.
pub fn encode_entry(entry: &Entry) -> CodecResult<Vec<u8>> {
    let mut encoder = EntryEncoder::with_capacity(encoded_len(entry));
    encoder.encode(entry)?;
    Ok(encoder.into_bytes())
}

/// Size in bytes of `entry` once encoded.
#[must_use]
pub fn encoded_len(entry: &Entry) -> usize {
    let strings = [&entry.rdns, &entry.name, &entry.reason]
        .iter()
        .map(|s| 4 + s.len())
        .sum::<usize>();
    let vars = entry
        .var_data
        .iter()
        .map(|(k, v)| 8 + k.len() + v.len())
        .sum::<usize>();
    HEADER_SIZE + strings + 4 + vars
}

/// Accumulates encoded records in a single buffer.
///
/// Several entries can be encoded back to back, which is how a whole
/// ban file body is produced for export.
#[derive(Debug, Default)]
pub struct EntryEncoder {
    buffer: Vec<u8>,
}

impl EntryEncoder {
    /// Create a new encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new encoder with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Encode an entry, appending its bytes to the buffer.
    ///
    /// On error the buffer is left as it was before the call.
    pub fn encode(&mut self, entry: &Entry) -> CodecResult<()> {
        let mark = self.buffer.len();
        let result = self.encode_fields(entry);
        if result.is_err() {
            self.buffer.truncate(mark);
        }
        result
    }

    /// Consume this encoder and return the encoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Get a reference to the encoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    fn encode_fields(&mut self, entry: &Entry) -> CodecResult<()> {
        self.buffer.put_u8(u8::from(entry.active));
        self.buffer.put_i64_le(entry.timestamp);
        self.buffer.put_i64_le(entry.length);
        self.buffer.put_u64_le(entry.steamid);
        self.buffer.put_u32_le(entry.ip);

        self.encode_str("rdns", &entry.rdns)?;
        self.encode_str("name", &entry.name)?;
        self.encode_str("reason", &entry.reason)?;

        let count = entry.var_data.len();
        if count as u64 > MAX_VAR_ENTRIES {
            return Err(CodecError::encoding_failed(format!(
                "var data has {count} pairs, maximum is {MAX_VAR_ENTRIES}"
            )));
        }
        self.buffer.put_u32_le(count as u32);
        for (key, value) in entry.var_data.iter() {
            self.encode_str("var_data key", key)?;
            self.encode_str("var_data value", value)?;
        }

        Ok(())
    }

    fn encode_str(&mut self, field: &str, text: &str) -> CodecResult<()> {
        if text.len() as u64 > MAX_STRING_LEN {
            return Err(CodecError::encoding_failed(format!(
                "`{field}` is {} bytes, maximum is {MAX_STRING_LEN}",
                text.len()
            )));
        }
        // Bounded by MAX_STRING_LEN above.
        self.buffer.put_u32_le(text.len() as u32);
        self.buffer.put_slice(text.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::VarData;

    #[test]
    fn encodes_known_layout() {
        let mut var_data = VarData::new();
        var_data.set("by", "op");
        let entry = Entry {
            active: true,
            timestamp: 0x0102,
            length: 0,
            steamid: 123,
            ip: 0x7F00_0001,
            rdns: String::new(),
            name: "Foo".into(),
            reason: "x".into(),
            var_data,
            ..Entry::default()
        };

        let bytes = encode_entry(&entry).unwrap();

        let mut expected = vec![0x01];
        expected.extend_from_slice(&[0x02, 0x01, 0, 0, 0, 0, 0, 0]);
        expected.extend_from_slice(&[0; 8]);
        expected.extend_from_slice(&[123, 0, 0, 0, 0, 0, 0, 0]);
        expected.extend_from_slice(&[0x01, 0x00, 0x00, 0x7F]);
        expected.extend_from_slice(&[0, 0, 0, 0]);
        expected.extend_from_slice(&[3, 0, 0, 0, b'F', b'o', b'o']);
        expected.extend_from_slice(&[1, 0, 0, 0, b'x']);
        expected.extend_from_slice(&[1, 0, 0, 0]);
        expected.extend_from_slice(&[2, 0, 0, 0, b'b', b'y', 2, 0, 0, 0, b'o', b'p']);

        assert_eq!(bytes, expected);
        assert_eq!(bytes.len(), encoded_len(&entry));
    }

    #[test]
    fn inactive_flag_is_zero_byte() {
        let entry = Entry::default();
        let bytes = encode_entry(&entry).unwrap();
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes.len(), HEADER_SIZE + 16);
    }

    #[test]
    fn position_is_not_encoded() {
        let a = Entry::default();
        let b = Entry {
            position: crate::FilePosition::new(999),
            ..Entry::default()
        };
        assert_eq!(encode_entry(&a).unwrap(), encode_entry(&b).unwrap());
    }

    #[test]
    fn failed_encode_leaves_buffer_untouched() {
        let mut encoder = EntryEncoder::new();
        encoder.encode(&Entry::default()).unwrap();
        let before = encoder.as_bytes().to_vec();

        let oversized = Entry {
            reason: "r".repeat(MAX_STRING_LEN as usize + 1),
            ..Entry::default()
        };
        let result = encoder.encode(&oversized);

        assert!(matches!(result, Err(CodecError::EncodingFailed { .. })));
        assert_eq!(encoder.as_bytes(), before.as_slice());
    }
}
