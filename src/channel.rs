//! Channel descriptors: the binary layout of one scan element.
//!
//! The kernel advertises each enabled channel's encoding through a
//! `scan_elements/<channel>_type` attribute whose contents follow the grammar
//!
//! ```text
//! <endian>e:<sign><bits_used>/<padding>>><shift>
//! ```
//!
//! e.g. `le:s16/32>>0` is a little-endian, signed, 16-bit value stored in a
//! 32-bit word with no shift.

#![forbid(unsafe_code)]

use crate::error::{Error, Result};
use crate::invariant_ppt::{assert_invariant, DESCRIPTOR_FITS_STORAGE};

/// Parsed encoding of a single scan channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDescriptor {
    /// Channel key, e.g. `in_accel_x`.
    pub id: String,
    /// Byte order of the storage word.
    pub big_endian: bool,
    /// Whether `bits_used` carries a two's complement value.
    pub signed: bool,
    /// Significant bits after shifting (1..=64).
    pub bits_used: u32,
    /// Width of the storage word in bytes (1, 2, 4 or 8).
    pub storage_bytes: u32,
    /// Right shift applied before masking.
    pub shift: u32,
}

impl ChannelDescriptor {
    /// Parse descriptor text for the channel `id`.
    ///
    /// The whole string must match; trailing input is rejected.
    pub fn parse(id: impl Into<String>, text: &str) -> Result<Self> {
        let malformed = || Error::MalformedDescriptor {
            descriptor: text.to_string(),
        };

        let (endian, rest) = text.split_once("e:").ok_or_else(malformed)?;
        let big_endian = match endian {
            "l" => false,
            "b" => true,
            _ => return Err(malformed()),
        };

        let mut chars = rest.chars();
        let signed = match chars.next() {
            Some('s') => true,
            Some('u') => false,
            _ => return Err(malformed()),
        };
        let rest = chars.as_str();

        let (bits, rest) = rest.split_once('/').ok_or_else(malformed)?;
        let (padding, shift) = rest.split_once(">>").ok_or_else(malformed)?;
        let bits_used = parse_decimal(bits).ok_or_else(malformed)?;
        let padding = parse_decimal(padding).ok_or_else(malformed)?;
        let shift = parse_decimal(shift).ok_or_else(malformed)?;

        if bits_used == 0 || bits_used > 64 {
            return Err(malformed());
        }
        if padding % 8 != 0 || !matches!(padding / 8, 1 | 2 | 4 | 8) {
            return Err(Error::InvalidPadding { padding });
        }
        let storage_bytes = padding / 8;
        if bits_used > padding {
            return Err(Error::BitsExceedStorage {
                bits_used,
                storage_bits: padding,
            });
        }
        if shift >= padding {
            return Err(malformed());
        }

        let descriptor = Self {
            id: id.into(),
            big_endian,
            signed,
            bits_used,
            storage_bytes,
            shift,
        };
        assert_invariant(
            DESCRIPTOR_FITS_STORAGE,
            descriptor.bits_used <= descriptor.storage_bits(),
            "bits_used fits the storage word",
            Some("ChannelDescriptor::parse"),
        );
        Ok(descriptor)
    }

    /// Storage width in bits.
    pub fn storage_bits(&self) -> u32 {
        self.storage_bytes * 8
    }
}

/// Strict decimal: ASCII digits only, no sign, no whitespace.
fn parse_decimal(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
