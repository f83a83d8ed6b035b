//! Integer encoding for timestamp-like columns.
//!
//! The first value is stored as is, the second as the zig zag encoded delta
//! from the first, and every following value as the zig zag encoded
//! delta-of-delta: `(v[i] - v[i-1]) - (v[i-1] - v[i-2])`.  Regularly spaced
//! timestamps therefore turn into runs of zeros.  The transformed stream is
//! packed with simple8b, so every transformed value, the first timestamp
//! included, has to fit in 60 bits.
//!
//! Arithmetic wraps on 64 bits in both directions, which keeps decoding an
//! exact inverse for any input the packer accepts.

use crate::buffer::{ByteSlice, ByteWriter};
use crate::codec::simple8b;
use crate::codec::zigzag::{zig_zag_decode, zig_zag_encode};
use crate::codec::{Decoder, Encoder};
use crate::error::{Error, Result};

/// delta_of_delta transforms `values` into the stream fed to the packer and
/// rejects any element the packer cannot hold.
pub fn delta_of_delta(values: &[u64]) -> Result<Vec<u64>> {
    let mut dst = Vec::with_capacity(values.len());

    for (i, v) in values.iter().enumerate() {
        let enc = match i {
            0 => *v,
            1 => zig_zag_encode(v.wrapping_sub(values[0]) as i64),
            _ => {
                let delta = v.wrapping_sub(values[i - 1]) as i64;
                let prev = values[i - 1].wrapping_sub(values[i - 2]) as i64;
                zig_zag_encode(delta.wrapping_sub(prev))
            }
        };

        if enc > simple8b::MAX_VALUE {
            return Err(Error::malformed(format!(
                "integer at position {} encodes to {}, above the packable maximum {}",
                i,
                enc,
                simple8b::MAX_VALUE
            )));
        }
        dst.push(enc);
    }

    Ok(dst)
}

/// IntegerEncoder encodes uint64 timestamps into byte slices.
#[derive(Debug, Default)]
pub struct IntegerEncoder {
    values: Vec<u64>,
}

impl IntegerEncoder {
    pub fn new(sz: usize) -> Self {
        Self {
            values: Vec::with_capacity(sz),
        }
    }

    /// Reset sets the encoder back to its initial state.
    pub fn reset(&mut self) {
        self.values.clear();
    }

    /// Encodes the buffered values into `dst`, returning the bytes appended.
    pub fn encode_into(&self, dst: &mut ByteWriter) -> Result<usize> {
        let start = dst.len();
        let deltas = delta_of_delta(&self.values)?;
        simple8b::encode_all(&deltas, dst)?;
        Ok(dst.len() - start)
    }
}

impl Encoder<u64> for IntegerEncoder {
    fn write(&mut self, v: u64) {
        self.values.push(v);
    }

    fn flush(&mut self) {}

    fn bytes(&mut self) -> Result<Vec<u8>> {
        let mut w = ByteWriter::with_capacity(self.values.len() + 8);
        self.encode_into(&mut w)?;
        Ok(w.into_inner())
    }
}

/// IntegerDecoder decodes a packed delta-of-delta stream.
#[derive(Debug)]
pub struct IntegerDecoder<'a> {
    src: ByteSlice<'a>,
}

impl<'a> IntegerDecoder<'a> {
    pub fn new(src: ByteSlice<'a>) -> Self {
        Self { src }
    }
}

impl<'a> Decoder<u64> for IntegerDecoder<'a> {
    fn decode(mut self, count: usize) -> Result<Vec<u64>> {
        if count == 0 {
            return Ok(vec![]);
        }

        let packed = simple8b::decode_all(&mut self.src)?;
        if packed.len() < count {
            return Err(Error::corrupt(format!(
                "integer stream holds {} values, expected {}",
                packed.len(),
                count
            )));
        }

        let mut values = Vec::with_capacity(count);
        let mut last = packed[0];
        values.push(last);
        if count == 1 {
            return Ok(values);
        }

        let mut delta = zig_zag_decode(packed[1]);
        last = last.wrapping_add(delta as u64);
        values.push(last);

        for v in &packed[2..count] {
            delta = delta.wrapping_add(zig_zag_decode(*v));
            last = last.wrapping_add(delta as u64);
            values.push(last);
        }

        Ok(values)
    }
}
