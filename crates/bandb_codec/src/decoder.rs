//! Ban record decoder.

use crate::entry::{Entry, FilePosition, VarData};
use crate::error::{CodecError, CodecResult};
use crate::{MAX_STRING_LEN, MAX_VAR_ENTRIES};
use bytes::Buf;

/// Decode one entry from the start of `input`.
///
/// Returns the entry, stamped with `position`, and the number of bytes
/// it occupied.
///
/// # Errors
///
/// Returns an error if the input is truncated or malformed.
pub fn decode_entry(input: &[u8], position: FilePosition) -> CodecResult<(Entry, usize)> {
    let mut decoder = EntryDecoder::new(input, position.as_u64());
    let entry = decoder.decode()?;
    Ok((entry, decoder.consumed()))
}

/// Sequential decoder over a run of back-to-back records.
///
/// `base_offset` is the file offset of the first input byte, so every
/// decoded entry carries its true position in the file.
pub struct EntryDecoder<'a> {
    rest: &'a [u8],
    base_offset: u64,
    consumed: usize,
}

impl<'a> EntryDecoder<'a> {
    /// Create a decoder for `data`, which starts at `base_offset` in the file.
    #[must_use]
    pub fn new(data: &'a [u8], base_offset: u64) -> Self {
        Self {
            rest: data,
            base_offset,
            consumed: 0,
        }
    }

    /// File position of the next record.
    #[must_use]
    pub fn position(&self) -> FilePosition {
        FilePosition::new(self.base_offset + self.consumed as u64)
    }

    /// Check if all bytes have been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.rest.has_remaining()
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Decode the next entry.
    ///
    /// A failed decode leaves the decoder positioned at the start of the
    /// record it could not read.
    pub fn decode(&mut self) -> CodecResult<Entry> {
        let (rest, consumed) = (self.rest, self.consumed);
        let result = self.decode_fields();
        if result.is_err() {
            self.rest = rest;
            self.consumed = consumed;
        }
        result
    }

    fn decode_fields(&mut self) -> CodecResult<Entry> {
        let position = self.position();

        let active = self.read_u8("active")? != 0;
        let timestamp = self.read_i64("timestamp")?;
        let length = self.read_i64("length")?;
        let steamid = self.read_u64("steamid")?;
        let ip = self.read_u32("ip")?;
        let rdns = self.read_str("rdns")?;
        let name = self.read_str("name")?;
        let reason = self.read_str("reason")?;

        let count = u64::from(self.read_u32("var_data count")?);
        if count > MAX_VAR_ENTRIES {
            return Err(CodecError::SizeLimitExceeded {
                field: "var_data count",
                claimed: count,
                max_allowed: MAX_VAR_ENTRIES,
            });
        }
        let mut var_data = VarData::new();
        for _ in 0..count {
            let key = self.read_str("var_data key")?;
            let value = self.read_str("var_data value")?;
            // keys are unique within a record
            if var_data.contains_key(&key) {
                return Err(CodecError::DuplicateVarKey { key });
            }
            var_data.set(key, value);
        }

        Ok(Entry {
            position,
            active,
            timestamp,
            length,
            steamid,
            ip,
            rdns,
            name,
            reason,
            var_data,
        })
    }

    #[inline]
    fn require(&self, field: &'static str, len: usize) -> CodecResult<()> {
        let available = self.rest.remaining();
        if available < len {
            return Err(CodecError::UnexpectedEof {
                field,
                needed: len - available,
            });
        }
        Ok(())
    }

    fn read_u8(&mut self, field: &'static str) -> CodecResult<u8> {
        self.require(field, 1)?;
        self.consumed += 1;
        Ok(self.rest.get_u8())
    }

    fn read_u32(&mut self, field: &'static str) -> CodecResult<u32> {
        self.require(field, 4)?;
        self.consumed += 4;
        Ok(self.rest.get_u32_le())
    }

    fn read_u64(&mut self, field: &'static str) -> CodecResult<u64> {
        self.require(field, 8)?;
        self.consumed += 8;
        Ok(self.rest.get_u64_le())
    }

    fn read_i64(&mut self, field: &'static str) -> CodecResult<i64> {
        self.require(field, 8)?;
        self.consumed += 8;
        Ok(self.rest.get_i64_le())
    }

    fn read_str(&mut self, field: &'static str) -> CodecResult<String> {
        let len = u64::from(self.read_u32(field)?);
        if len > MAX_STRING_LEN {
            return Err(CodecError::SizeLimitExceeded {
                field,
                claimed: len,
                max_allowed: MAX_STRING_LEN,
            });
        }
        let len = len as usize;
        self.require(field, len)?;
        let text = std::str::from_utf8(&self.rest[..len])
            .map_err(|_| CodecError::InvalidUtf8 { field })?
            .to_owned();
        self.rest.advance(len);
        self.consumed += len;
        Ok(text)
    }
}
