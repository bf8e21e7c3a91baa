//! Scan record decoding: raw bytes to per-channel integers.
//!
//! Each channel's storage word is read at its layout offset in the declared
//! byte order, shifted right, masked to `bits_used` and, for signed channels,
//! sign-extended from `bits_used` to 64 bits.

use std::collections::BTreeMap;

use crate::channel::ChannelDescriptor;
use crate::error::{Error, Result};
use crate::invariant_ppt::{assert_invariant, RECORD_COVERS_LAYOUT};
use crate::layout::ScanLayout;

/// Decoded values of one scan record keyed by channel id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedSample {
    values: BTreeMap<String, i64>,
}

impl DecodedSample {
    pub fn get(&self, id: &str) -> Option<i64> {
        self.values.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl ScanLayout {
    /// Decode one record. Bytes past `record_size` are ignored.
    pub fn decode(&self, record: &[u8]) -> Result<DecodedSample> {
        if record.len() < self.record_size {
            return Err(Error::TruncatedRecord {
                expected: self.record_size,
                actual: record.len(),
            });
        }
        let mut values = BTreeMap::new();
        for channel in &self.channels {
            let start = channel.byte_offset;
            let end = start + channel.descriptor.storage_bytes as usize;
            assert_invariant(
                RECORD_COVERS_LAYOUT,
                end <= record.len(),
                "channel storage lies within the record",
                Some(&channel.descriptor.id),
            );
            let value = decode_channel(&channel.descriptor, &record[start..end]);
            values.insert(channel.descriptor.id.clone(), value);
        }
        Ok(DecodedSample { values })
    }

    /// Split a buffer read into whole records and decode each in order.
    ///
    /// A trailing partial record is reported as `TruncatedRecord`.
    pub fn decode_all(&self, buf: &[u8]) -> Result<Vec<DecodedSample>> {
        if self.record_size == 0 {
            return Ok(Vec::new());
        }
        let chunks = buf.chunks(self.record_size);
        let mut samples = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            samples.push(self.decode(chunk)?);
        }
        Ok(samples)
    }
}

/// Decode a single storage word.
///
/// `bytes` should hold exactly `storage_bytes` bytes. Only the first eight
/// are read; `bits_used` is capped at 64, a zero `bits_used` decodes to 0 and
/// a shift of 64 or more clears the word.
pub fn decode_channel(descriptor: &ChannelDescriptor, bytes: &[u8]) -> i64 {
    let bytes = &bytes[..bytes.len().min(8)];
    let raw = bytes.iter().enumerate().fold(0u64, |acc, (i, &b)| {
        let pos = if descriptor.big_endian {
            bytes.len() - 1 - i
        } else {
            i
        };
        acc | (u64::from(b) << (8 * pos))
    });

    let bits = descriptor.bits_used.min(64);
    if bits == 0 {
        return 0;
    }
    let mut value = raw.checked_shr(descriptor.shift).unwrap_or(0);
    if bits < 64 {
        value &= (1u64 << bits) - 1;
    }
    if descriptor.signed {
        let unused = 64 - bits;
        ((value << unused) as i64) >> unused
    } else {
        value as i64
    }
}
