//! Bit-field helpers for 32-bit instruction and data words.

/// Extracts bits `hi..=lo` of `word`, right-aligned.
#[inline]
pub const fn field(word: u32, hi: u32, lo: u32) -> u32 {
    let width = hi - lo + 1;
    if width >= 32 {
        word >> lo
    } else {
        (word >> lo) & ((1 << width) - 1)
    }
}

/// Sign-extends the low `width` bits of `value` to 32 bits.
#[inline]
pub const fn sign_extend(value: u32, width: u32) -> u32 {
    if width == 0 || width >= 32 {
        return value;
    }
    let shift = 32 - width;
    (((value << shift) as i32) >> shift) as u32
}
