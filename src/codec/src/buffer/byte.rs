use byteorder::{ByteOrder, LittleEndian};
use bytes::BufMut;

use crate::buffer::bit::BitWriter;

/// Scalar is a fixed-width value that is stored little-endian on the wire.
pub trait Scalar: Sized + Copy {
    const SIZE: usize;

    fn put(self, dst: &mut Vec<u8>);

    /// `src` is exactly `SIZE` bytes long.
    fn get(src: &[u8]) -> Self;
}

impl Scalar for u8 {
    const SIZE: usize = 1;

    fn put(self, dst: &mut Vec<u8>) {
        dst.put_u8(self);
    }

    fn get(src: &[u8]) -> Self {
        src[0]
    }
}

impl Scalar for u16 {
    const SIZE: usize = 2;

    fn put(self, dst: &mut Vec<u8>) {
        dst.put_u16_le(self);
    }

    fn get(src: &[u8]) -> Self {
        LittleEndian::read_u16(src)
    }
}

impl Scalar for u32 {
    const SIZE: usize = 4;

    fn put(self, dst: &mut Vec<u8>) {
        dst.put_u32_le(self);
    }

    fn get(src: &[u8]) -> Self {
        LittleEndian::read_u32(src)
    }
}

impl Scalar for u64 {
    const SIZE: usize = 8;

    fn put(self, dst: &mut Vec<u8>) {
        dst.put_u64_le(self);
    }

    fn get(src: &[u8]) -> Self {
        LittleEndian::read_u64(src)
    }
}

impl Scalar for f64 {
    const SIZE: usize = 8;

    fn put(self, dst: &mut Vec<u8>) {
        dst.put_f64_le(self);
    }

    fn get(src: &[u8]) -> Self {
        LittleEndian::read_f64(src)
    }
}

/// ByteWriter is an append-only byte buffer. Nothing written can be changed
/// afterwards, it can only be handed off with `into_inner`.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Write appends `v` in little-endian order.
    pub fn write<T: Scalar>(&mut self, v: T) {
        v.put(&mut self.buf);
    }

    pub fn write_bytes(&mut self, b: &[u8]) {
        self.buf.extend_from_slice(b);
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    pub fn write_buffer(&mut self, other: &ByteWriter) {
        self.write_bytes(other.as_slice());
    }

    /// Appends every word of the bit buffer, including padding in the last word.
    pub fn write_bits(&mut self, bits: &BitWriter) {
        self.buf.reserve(bits.byte_len());
        for w in bits.words() {
            self.buf.put_u64_le(*w);
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        self.buf.as_slice()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use crate::buffer::bit::{BitWriter, Write};
    use crate::buffer::byte::ByteWriter;

    #[test]
    fn test_byte_writer_scalars() {
        let mut w = ByteWriter::new();
        w.write(0xABu8);
        w.write(0x0102u16);
        w.write(0x0A0B0C0Du32);
        w.write(1u64);
        w.write(1.5f64);

        let b = w.as_slice();
        assert_eq!(b.len(), 1 + 2 + 4 + 8 + 8);
        assert_eq!(b[0], 0xAB);
        assert_eq!(&b[1..3], &[0x02, 0x01]);
        assert_eq!(&b[3..7], &[0x0D, 0x0C, 0x0B, 0x0A]);
        assert_eq!(&b[7..15], &[1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&b[15..23], &1.5f64.to_le_bytes());
    }

    #[test]
    fn test_byte_writer_raw() {
        let mut inner = ByteWriter::new();
        inner.write_str("cpu");

        let mut w = ByteWriter::with_capacity(16);
        w.write(3u32);
        w.write_buffer(&inner);
        assert_eq!(w.as_slice(), &[3, 0, 0, 0, b'c', b'p', b'u']);

        let mut bits = BitWriter::new();
        bits.write_bits(0b101, 3);
        w.write_bits(&bits);
        assert_eq!(w.len(), 7 + 8, "bit buffers are appended whole words");
        assert_eq!(w.as_slice()[7], 0b101);
        assert!(!w.is_empty());
        assert_eq!(w.into_inner().len(), 15);
    }
}
