//! boolean encoding uses 1 bit per value.  The payload starts with a u32
//! count of the booleans packed, followed by 1 byte for every 8 values.
//! Within a byte the first value is the most significant bit; the last
//! byte is padded with zeros.

use crate::buffer::{ByteSlice, ByteWriter};
use crate::codec::{Decoder, Encoder};
use crate::error::{Error, Result};

/// BooleanEncoder encodes a series of booleans to an in-memory buffer.
#[derive(Debug, Default)]
pub struct BooleanEncoder {
    /// The encoded bytes
    bytes: Vec<u8>,

    /// The current byte being encoded
    b: u8,

    /// The number of bools packed into b
    i: usize,

    /// The total number of bools written
    n: usize,
}

impl BooleanEncoder {
    pub fn new(sz: usize) -> Self {
        Self {
            bytes: Vec::with_capacity((sz + 7) / 8),
            b: 0,
            i: 0,
            n: 0,
        }
    }

    fn flush_byte(&mut self) {
        if self.i == 0 {
            return;
        }

        // Pad remaining byte w/ 0s
        self.b <<= 8 - self.i;
        self.bytes.push(self.b);
        self.b = 0;
        self.i = 0;
    }
}

impl Encoder<bool> for BooleanEncoder {
    fn write(&mut self, v: bool) {
        // If we have filled the current byte, flush it
        if self.i >= 8 {
            self.flush_byte();
        }

        // Use 1 bit for each boolean value, shift the current byte
        // by 1 and set the least significant bit accordingly
        self.b <<= 1;
        if v {
            self.b |= 1;
        }

        self.i += 1;
        self.n += 1;
    }

    // only `bytes` may pad the partial byte
    fn flush(&mut self) {}

    fn bytes(&mut self) -> Result<Vec<u8>> {
        self.flush_byte();

        let n = u32::try_from(self.n).map_err(|_| {
            Error::malformed(format!("{} booleans exceed the u32 count field", self.n))
        })?;

        let mut w = ByteWriter::with_capacity(4 + self.bytes.len());
        w.write(n);
        w.write_bytes(&self.bytes);
        Ok(w.into_inner())
    }
}

/// BooleanDecoder decodes a series of booleans from a payload that must
/// hold exactly the requested count and nothing after it.
#[derive(Debug)]
pub struct BooleanDecoder<'a> {
    src: ByteSlice<'a>,
}

impl<'a> BooleanDecoder<'a> {
    pub fn new(src: ByteSlice<'a>) -> Self {
        Self { src }
    }
}

impl<'a> Decoder<bool> for BooleanDecoder<'a> {
    fn decode(mut self, count: usize) -> Result<Vec<bool>> {
        let n = self.src.read::<u32>()? as usize;
        if n != count {
            return Err(Error::corrupt(format!(
                "boolean payload holds {} values, expected {}",
                n, count
            )));
        }

        let packed = self.src.read_bytes((n + 7) / 8)?;
        if !self.src.is_empty() {
            return Err(Error::corrupt(format!(
                "{} trailing bytes after boolean payload",
                self.src.bytes_left()
            )));
        }

        let values = (0..n)
            .map(|i| {
                let mask = 1u8 << (7 - (i & 0x7));
                packed[i >> 3] & mask == mask
            })
            .collect();

        Ok(values)
    }
}
