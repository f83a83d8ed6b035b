//! Simple8b packs several small unsigned integers into one 64-bit word.
//!
//! The top 4 bits of every word are a selector naming how many values the
//! word holds and how wide each one is. Values are stored low-bit first:
//! value `i` of a word occupies bits `[i * width, (i + 1) * width)`.
//!
//! Selectors 0 and 1 have a width of 0. The encoder never chooses them, but
//! the decoder accepts them and yields `n` zeros so that any well-formed
//! selector can be read.

use crate::buffer::{ByteSlice, ByteWriter};
use crate::error::{Error, Result};

/// maximum value that can be encoded.
pub const MAX_VALUE: u64 = (1 << 60) - 1;

const SELECTOR_SHIFT: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packing {
    /// values per word
    pub n: usize,
    /// bits per value
    pub bit: u32,
}

pub static SELECTOR: [Packing; 16] = [
    Packing { n: 240, bit: 0 },
    Packing { n: 120, bit: 0 },
    Packing { n: 60, bit: 1 },
    Packing { n: 30, bit: 2 },
    Packing { n: 20, bit: 3 },
    Packing { n: 15, bit: 4 },
    Packing { n: 12, bit: 5 },
    Packing { n: 10, bit: 6 },
    Packing { n: 8, bit: 7 },
    Packing { n: 7, bit: 8 },
    Packing { n: 6, bit: 10 },
    Packing { n: 5, bit: 12 },
    Packing { n: 4, bit: 15 },
    Packing { n: 3, bit: 20 },
    Packing { n: 2, bit: 30 },
    Packing { n: 1, bit: 60 },
];

#[inline]
fn selector_of(v: u64) -> usize {
    (v >> SELECTOR_SHIFT) as usize
}

fn can_pack(src: &[u64], n: usize, bits: u32) -> bool {
    if src.len() < n {
        return false;
    }

    // Selector 0,1 carry no payload bits and are never used to encode
    if bits == 0 {
        return false;
    }

    let max = (1u64 << bits) - 1;
    src[..n].iter().all(|v| *v <= max)
}

fn pack(selector: usize, src: &[u64]) -> u64 {
    let Packing { n, bit } = SELECTOR[selector];
    let mut out = (selector as u64) << SELECTOR_SHIFT;
    for (i, v) in src[..n].iter().enumerate() {
        out |= v << (i as u32 * bit);
    }
    out
}

fn unpack(v: u64, dst: &mut Vec<u64>) -> usize {
    let Packing { n, bit } = SELECTOR[selector_of(v)];
    if bit == 0 {
        dst.resize(dst.len() + n, 0);
        return n;
    }

    let mask = (1u64 << bit) - 1;
    dst.reserve(n);
    for i in 0..n {
        dst.push((v >> (i as u32 * bit)) & mask);
    }
    n
}

/// Encode packs as many values from the head of `src` into a single uint64
/// as the densest admissible selector allows.  It returns the packed uint64
/// and how many values from src were packed.
pub fn encode(src: &[u64]) -> Result<(u64, usize)> {
    if src.is_empty() {
        return Ok((0, 0));
    }

    for (selector, packing) in SELECTOR.iter().enumerate() {
        if can_pack(src, packing.n, packing.bit) {
            return Ok((pack(selector, src), packing.n));
        }
    }

    Err(Error::malformed(format!(
        "value out of bounds: {} exceeds simple8b maximum {}",
        src[0], MAX_VALUE
    )))
}

/// Encode all of `src` into `dst`, returning the number of words written.
pub fn encode_all(src: &[u64], dst: &mut ByteWriter) -> Result<usize> {
    let mut i = 0;
    let mut words = 0;
    while i < src.len() {
        let (v, n) = encode(&src[i..])?;
        dst.write(v);
        i += n;
        words += 1;
    }
    Ok(words)
}

/// Decode appends the values packed in `v` to `dst` and returns how many
/// were appended.
pub fn decode(dst: &mut Vec<u64>, v: u64) -> usize {
    unpack(v, dst)
}

/// Decode every word left in `src`. The word stream must be a whole number
/// of words.
pub fn decode_all(src: &mut ByteSlice) -> Result<Vec<u64>> {
    if src.bytes_left() % 8 != 0 {
        return Err(Error::corrupt(format!(
            "simple8b: invalid slice len remaining: {}",
            src.bytes_left() % 8
        )));
    }

    let mut dst = Vec::with_capacity(src.bytes_left() / 8);
    while !src.is_empty() {
        let v = src.read::<u64>()?;
        decode(&mut dst, v);
    }
    Ok(dst)
}

/// count_values returns how many values the packed words in `b` hold,
/// without unpacking them.
pub fn count_values(b: &[u8]) -> Result<usize> {
    if b.len() % 8 != 0 {
        return Err(Error::corrupt(format!(
            "simple8b: invalid slice len remaining: {}",
            b.len() % 8
        )));
    }

    let mut src = ByteSlice::new(b);
    let mut count = 0usize;
    while !src.is_empty() {
        let v = src.read::<u64>()?;
        count += SELECTOR[selector_of(v)].n;
    }
    Ok(count)
}
