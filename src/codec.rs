//! # DAC wire format
//!
//! Both Pmod modules take a 16-bit frame per sample, most significant
//! byte first. The frame is treated as an opaque 16-bit field; on the
//! 12-bit Pmod DA2 the upper nibble reaches the converter's control
//! bits, so callers wanting model-specific command bits pack them into
//! the value before encoding.

/// Encodes a sample into the two-byte frame the converter shifts in.
///
/// Total for all of `u16`; values wider than 16 bits must be truncated
/// by the caller, matching the wire width.
#[inline]
pub const fn encode(value: u16) -> [u8; 2] {
    [(value >> 8) as u8, (value & 0xFF) as u8]
}

/// Inverse of [`encode`].
#[inline]
pub const fn decode(frame: [u8; 2]) -> u16 {
    ((frame[0] as u16) << 8) | frame[1] as u16
}
