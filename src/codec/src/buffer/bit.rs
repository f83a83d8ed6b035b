//! Bit-granularity buffers.
//!
//! Bits are packed least-significant first into 64-bit words. A value that does
//! not fit in the free bits of the current word spills its high bits into the
//! low bits of the next word, so there is never padding between values. The
//! only padding is at the end of the last word, and the buffer does not record
//! how much of it there is: readers must know how many values to pull.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

const WORD_BITS: u32 = 64;

/// Bit
///
/// A single bit, either `Zero` or `One`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bit {
    Zero,
    One,
}

impl From<bool> for Bit {
    fn from(b: bool) -> Self {
        if b {
            Bit::One
        } else {
            Bit::Zero
        }
    }
}

/// Read
///
/// Read is a trait that encapsulates the functionality required to read from a stream of bits.
pub trait Read {
    /// Read a single bit from the underlying stream.
    fn read_bit(&mut self) -> Result<Bit>;

    /// Read `num` bits (at most 64) from the underlying stream.
    fn read_bits(&mut self, num: u32) -> Result<u64>;

    /// True once the cursor has consumed the last whole word.
    fn is_at_end(&self) -> bool;
}

/// Write
///
/// Write is a trait that encapsulates the functionality required to write a stream of bits.
pub trait Write {
    /// Write a single bit to the underlying stream.
    fn write_bit(&mut self, bit: Bit);

    /// Write the bottom `num` bits (at most 64) of `bits` to the underlying stream.
    fn write_bits(&mut self, bits: u64, num: u32);

    /// Write the bottom `N` bits of the constant `V`. Same stream as
    /// `write_bits(V, N)`, used for control bits.
    fn write_fixed<const V: u64, const N: u32>(&mut self) {
        if N == 1 {
            self.write_bit(Bit::from(V & 1 == 1));
        } else {
            self.write_bits(V, N);
        }
    }
}

#[inline]
fn mask(num: u32) -> u64 {
    if num >= WORD_BITS {
        u64::MAX
    } else {
        (1u64 << num) - 1
    }
}

/// BitWriter
///
/// BitWriter appends bits to a growing sequence of words.
#[derive(Debug, Clone)]
pub struct BitWriter {
    words: Vec<u64>,
    // bits used in the last word, 64 when it is full
    pos: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        BitWriter {
            words: Vec::new(),
            pos: WORD_BITS,
        }
    }

    fn grow(&mut self) {
        self.words.push(0);
        self.pos = 0;
    }

    pub fn words(&self) -> &[u64] {
        self.words.as_slice()
    }

    /// Total number of bits written, excluding padding.
    pub fn bit_len(&self) -> usize {
        match self.words.len() {
            0 => 0,
            n => (n - 1) * WORD_BITS as usize + self.pos as usize,
        }
    }

    /// Size of the buffer once serialized, always a whole number of words.
    pub fn byte_len(&self) -> usize {
        self.words.len() * 8
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut b = vec![0u8; self.byte_len()];
        LittleEndian::write_u64_into(&self.words, &mut b);
        b
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for BitWriter {
    fn write_bit(&mut self, bit: Bit) {
        if self.pos == WORD_BITS {
            self.grow();
        }

        if bit == Bit::One {
            let i = self.words.len() - 1;
            self.words[i] |= 1u64 << self.pos;
        }
        self.pos += 1;
    }

    fn write_bits(&mut self, bits: u64, num: u32) {
        let num = num.min(WORD_BITS);
        if num == 0 {
            return;
        }
        let bits = bits & mask(num);

        if self.pos == WORD_BITS {
            self.grow();
        }

        let i = self.words.len() - 1;
        self.words[i] |= bits << self.pos;

        let free = WORD_BITS - self.pos;
        if num > free {
            // free is in 1..64 here, the high bits go to the next word
            self.words.push(bits >> free);
            self.pos = num - free;
        } else {
            self.pos += num;
        }
    }
}

/// WordSource is where a bit cursor fetches whole words from.
pub trait WordSource {
    fn word_len(&self) -> usize;

    fn word(&self, index: usize) -> Option<u64>;

    /// Byte length of the underlying range, used in error reports.
    fn byte_len(&self) -> usize {
        self.word_len() * 8
    }
}

impl<'a> WordSource for &'a [u64] {
    fn word_len(&self) -> usize {
        self.len()
    }

    fn word(&self, index: usize) -> Option<u64> {
        self.get(index).copied()
    }
}

/// LeWords views a byte range as little-endian words. Trailing bytes that do
/// not make up a whole word are not addressable.
#[derive(Debug, Clone, Copy)]
pub struct LeWords<'a>(&'a [u8]);

impl<'a> LeWords<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        LeWords(bytes)
    }
}

impl<'a> WordSource for LeWords<'a> {
    fn word_len(&self) -> usize {
        self.0.len() / 8
    }

    fn word(&self, index: usize) -> Option<u64> {
        if index >= self.word_len() {
            return None;
        }
        let start = index * 8;
        Some(LittleEndian::read_u64(&self.0[start..start + 8]))
    }

    fn byte_len(&self) -> usize {
        self.0.len()
    }
}

/// BitCursor
///
/// Read-only cursor over a word source. Bounds are checked each time the
/// cursor needs a word it has not loaded yet, so a read fails exactly when
/// it would cross the end of the range.
#[derive(Debug, Clone)]
pub struct BitCursor<S> {
    src: S,
    index: usize,
    pos: u32,
}

/// BitReader reads back the words of a `BitWriter`.
pub type BitReader<'a> = BitCursor<&'a [u64]>;

/// BitSlice reads a bit stream stored as little-endian words in a byte range.
pub type BitSlice<'a> = BitCursor<LeWords<'a>>;

impl<'a> BitReader<'a> {
    pub fn new(words: &'a [u64]) -> Self {
        BitCursor::from_source(words)
    }
}

impl<'a> BitSlice<'a> {
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        BitCursor::from_source(LeWords::new(bytes))
    }
}

impl<S: WordSource> BitCursor<S> {
    pub fn from_source(src: S) -> Self {
        BitCursor {
            src,
            index: 0,
            pos: 0,
        }
    }

    fn load(&self, index: usize) -> Result<u64> {
        self.src.word(index).ok_or(Error::OutOfBounds {
            offset: index * 8,
            len: self.src.byte_len(),
            need: 8,
        })
    }

    /// Number of bits consumed so far.
    pub fn position(&self) -> usize {
        self.index * WORD_BITS as usize + self.pos as usize
    }
}

impl<S: WordSource> Read for BitCursor<S> {
    fn read_bit(&mut self) -> Result<Bit> {
        if self.pos == WORD_BITS {
            self.index += 1;
            self.pos = 0;
        }

        let word = self.load(self.index)?;
        let bit = (word >> self.pos) & 1;
        self.pos += 1;

        Ok(Bit::from(bit == 1))
    }

    fn read_bits(&mut self, num: u32) -> Result<u64> {
        let num = num.min(WORD_BITS);
        if num == 0 {
            return Ok(0);
        }

        if self.pos == WORD_BITS {
            self.index += 1;
            self.pos = 0;
        }

        let word = self.load(self.index)?;
        let avail = WORD_BITS - self.pos;

        if num <= avail {
            let v = (word >> self.pos) & mask(num);
            self.pos += num;
            return Ok(v);
        }

        // straddles into the next word
        let low = word >> self.pos;
        let rest = num - avail;
        let next = self.load(self.index + 1)?;
        self.index += 1;
        self.pos = rest;

        Ok(low | ((next & mask(rest)) << avail))
    }

    fn is_at_end(&self) -> bool {
        let len = self.src.word_len();
        self.index >= len || (self.index + 1 == len && self.pos == WORD_BITS)
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use crate::buffer::bit::{Bit, BitReader, BitSlice, BitWriter, Read, Write};
    use crate::error::ErrorKind;

    #[test]
    fn test_write_bits_lsb_first() {
        let mut w = BitWriter::new();
        w.write_bit(Bit::One);
        w.write_bits(0b10, 2);
        w.write_fixed::<0b11, 2>();

        assert_eq!(w.words(), &[0b11101]);
        assert_eq!(w.bit_len(), 5);
        assert_eq!(w.byte_len(), 8);
    }

    #[test]
    fn test_write_straddles_word_boundary() {
        let mut w = BitWriter::new();
        w.write_bits(0, 60);
        w.write_bits(0xFF, 8);

        assert_eq!(w.words().len(), 2);
        assert_eq!(w.words()[0], 0xF << 60);
        assert_eq!(w.words()[1], 0xF);
        assert_eq!(w.bit_len(), 68);

        let mut r = BitReader::new(w.words());
        assert_eq!(r.read_bits(60).unwrap(), 0);
        assert_eq!(r.read_bits(8).unwrap(), 0xFF);
    }

    #[test]
    fn test_write_masks_high_bits() {
        let mut w = BitWriter::new();
        // 64 does not fit in 6 bits, it must land as 0
        w.write_bits(64, 6);
        w.write_bit(Bit::One);

        let mut r = BitReader::new(w.words());
        assert_eq!(r.read_bits(6).unwrap(), 0);
        assert_eq!(r.read_bit().unwrap(), Bit::One);
    }

    #[test]
    fn test_full_words() {
        let mut w = BitWriter::new();
        w.write_bits(u64::MAX, 64);
        w.write_bits(0x0123_4567_89AB_CDEF, 64);
        w.write_bits(1, 1);
        w.write_bits(u64::MAX, 64);

        let mut r = BitReader::new(w.words());
        assert_eq!(r.read_bits(64).unwrap(), u64::MAX);
        assert_eq!(r.read_bits(64).unwrap(), 0x0123_4567_89AB_CDEF);
        assert_eq!(r.read_bits(1).unwrap(), 1);
        assert_eq!(r.read_bits(64).unwrap(), u64::MAX);
    }

    #[test]
    fn test_varying_widths_round_trip() {
        let mut w = BitWriter::new();
        let mut expected = Vec::new();
        for width in 1..=64u32 {
            let v = 0xDEAD_BEEF_CAFE_F00Du64.rotate_left(width) & super::mask(width);
            w.write_bits(v, width);
            expected.push((v, width));
        }

        let mut r = BitReader::new(w.words());
        for (i, (v, width)) in expected.into_iter().enumerate() {
            let got = r.read_bits(width).unwrap();
            assert_eq!(got, v, "value {} of width {}: got {:x}, exp {:x}", i, width, got, v);
        }
    }

    #[test]
    fn test_reader_out_of_bounds() {
        let mut w = BitWriter::new();
        w.write_bits(7, 3);

        let mut r = BitReader::new(w.words());
        assert_eq!(r.read_bits(64).unwrap(), 7, "padding is readable inside the word");
        assert!(r.is_at_end());

        let err = r.read_bit().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    }

    #[test]
    fn test_reader_straddle_past_end() {
        let words = [u64::MAX];
        let mut r = BitReader::new(&words);
        r.read_bits(60).unwrap();
        assert!(!r.is_at_end());

        let err = r.read_bits(8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    }

    #[test]
    fn test_empty_source_is_at_end() {
        let r = BitSlice::from_bytes(&[]);
        assert!(r.is_at_end());

        let r = BitSlice::from_bytes(&[0u8; 7]);
        assert!(r.is_at_end(), "a partial word is not addressable");
    }

    #[test]
    fn test_bit_slice_matches_writer() {
        let mut w = BitWriter::new();
        w.write_bits(0x3FF, 10);
        w.write_fixed::<0b01, 2>();
        w.write_bits(0xABCDEF, 60);
        let bytes = w.to_bytes();

        let mut s = BitSlice::from_bytes(&bytes);
        assert_eq!(s.read_bits(10).unwrap(), 0x3FF);
        assert_eq!(s.read_bit().unwrap(), Bit::One);
        assert_eq!(s.read_bit().unwrap(), Bit::Zero);
        assert_eq!(s.read_bits(60).unwrap(), 0xABCDEF);
        assert_eq!(s.position(), 72);
    }

    quickcheck! {
        fn prop_bit_round_trip(values: Vec<(u64, u8)>) -> bool {
            let items: Vec<(u64, u32)> = values
                .into_iter()
                .map(|(v, w)| {
                    let width = (w % 64) as u32 + 1;
                    (v & super::mask(width), width)
                })
                .collect();

            let mut w = BitWriter::new();
            for (v, width) in &items {
                w.write_bits(*v, *width);
            }

            let bytes = w.to_bytes();
            let mut r = BitSlice::from_bytes(&bytes);
            items.iter().all(|(v, width)| r.read_bits(*width).ok() == Some(*v))
        }
    }
}
