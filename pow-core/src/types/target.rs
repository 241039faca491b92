//! Compact target encoding
//!
//! Block headers carry their proof-of-work target in a packed 32-bit form
//! ("nBits"). The high byte is the length of the magnitude in bytes and the
//! low three bytes are its most significant bytes. Bit 23 doubles as a sign
//! bit, so a mantissa whose top bit would be set is stored one byte further
//! right instead.
//!
//! The encoding is lossy: magnitudes wider than three bytes keep only their
//! three leading bytes. Retarget results are defined in terms of this
//! truncation, so it must never be "corrected".

use primitive_types::U256;

/// Sign bit inside the compact mantissa
pub const COMPACT_SIGN_BIT: u32 = 0x0080_0000;

/// Mantissa bits excluding the sign bit
const COMPACT_MANTISSA_MASK: u32 = 0x007f_ffff;

/// A compact target expanded to 256 bits, with its malformation flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedTarget {
    /// Expanded magnitude (bits shifted past 256 are lost)
    pub target: U256,
    /// The sign bit was set on a non-zero mantissa
    pub negative: bool,
    /// The exponent places mantissa bits beyond 256 bits
    pub overflow: bool,
}

impl DecodedTarget {
    /// Whether this encoding can stand as a proof-of-work target at all
    pub fn is_usable(&self) -> bool {
        !self.negative && !self.overflow && !self.target.is_zero()
    }
}

/// Expand a compact target
pub fn decode_compact(compact: u32) -> DecodedTarget {
    let size = (compact >> 24) as usize;
    let mut word = compact & COMPACT_MANTISSA_MASK;

    // Flags are computed on the mantissa that survives the shift
    let target = if size <= 3 {
        word >>= 8 * (3 - size);
        U256::from(word)
    } else {
        let shift = 8 * (size - 3);
        if shift >= 256 {
            U256::zero()
        } else {
            U256::from(word) << shift
        }
    };

    let negative = word != 0 && (compact & COMPACT_SIGN_BIT) != 0;
    let overflow = word != 0
        && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32));

    DecodedTarget {
        target,
        negative,
        overflow,
    }
}

/// Pack a magnitude into compact form
pub fn encode_compact(target: &U256) -> u32 {
    encode_compact_signed(target, false)
}

/// Pack a magnitude into compact form, setting the sign bit when `negative`
/// and the mantissa is non-zero
pub fn encode_compact_signed(target: &U256, negative: bool) -> u32 {
    let mut size = (target.bits() + 7) / 8;
    let mut compact = if size <= 3 {
        (target.low_u64() << (8 * (3 - size))) as u32
    } else {
        (*target >> (8 * (size - 3))).low_u32()
    };

    if compact & COMPACT_SIGN_BIT != 0 {
        compact >>= 8;
        size += 1;
    }

    compact |= (size as u32) << 24;
    if negative && (compact & COMPACT_MANTISSA_MASK) != 0 {
        compact |= COMPACT_SIGN_BIT;
    }
    compact
}

/// Interpret a 32-byte header hash (internal little-endian byte order) as a
/// 256-bit integer
pub fn hash_to_u256(hash: &[u8; 32]) -> U256 {
    U256::from_little_endian(hash)
}
