//! Float compression as presented in: http://www.vldb.org/pvldb/vol8/p1816-teller.pdf.
//!
//! The first value is written as its raw 64-bit pattern.  Each following
//! value is XORed with its predecessor and written as:
//!
//! * `0` when the XOR is zero,
//! * `1 0` followed by the meaningful bits when they fit inside the current
//!   leading/trailing zero window,
//! * `1 1` followed by a 5-bit leading zero count, a 6-bit meaningful bit
//!   count (64 stored as 0) and the meaningful bits, which opens a new window.
//!
//! Control bits are written in stream order, so `1 0` is the two-bit value
//! `0b01` in the LSB-first bit buffer.  There is no end marker and no NaN
//! sentinel; every bit pattern, NaNs included, round-trips.

use crate::buffer::bit::{Bit, BitSlice, BitWriter, Read, Write};
use crate::codec::{Decoder, Encoder};
use crate::error::{Error, Result};

const LEADING_BITS: u32 = 5;
const SIGNIFICANT_BITS: u32 = 6;
/// Largest leading zero count the 5-bit field can hold.
const MAX_LEADING: u32 = (1 << LEADING_BITS) - 1;

/// Window is the meaningful bit region shared by consecutive XOR values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    leading: u32,
    trailing: u32,
}

impl Window {
    fn significant(&self) -> u32 {
        64 - self.leading - self.trailing
    }
}

/// FloatEncoder encodes multiple float64s into a byte slice.
#[derive(Debug)]
pub struct FloatEncoder {
    val: u64,
    window: Option<Window>,
    bw: BitWriter,
    first: bool,
}

impl FloatEncoder {
    pub fn new() -> Self {
        Self {
            val: 0,
            window: None,
            bw: BitWriter::new(),
            first: true,
        }
    }

    /// The bit buffer written so far.
    pub fn bits(&self) -> &BitWriter {
        &self.bw
    }

    pub fn into_bits(self) -> BitWriter {
        self.bw
    }

    fn write_delta(&mut self, v_delta: u64) {
        let leading = v_delta.leading_zeros();
        let trailing = v_delta.trailing_zeros();

        match self.window {
            Some(w) if w.leading <= leading && w.trailing <= trailing => {
                self.bw.write_fixed::<0b01, 2>();
                self.bw.write_bits(v_delta >> w.trailing, w.significant());
            }
            _ => {
                let w = Window {
                    // Clamp number of leading zeros to avoid overflow when encoding
                    leading: leading.min(MAX_LEADING),
                    trailing,
                };
                let sigbits = w.significant();

                self.bw.write_fixed::<0b11, 2>();
                self.bw.write_bits(w.leading as u64, LEADING_BITS);
                // sigbits is never 0 because the delta is non-zero, so 64 is
                // written as 0 and restored when reading.
                self.bw.write_bits(sigbits as u64, SIGNIFICANT_BITS);
                self.bw.write_bits(v_delta >> w.trailing, sigbits);

                self.window = Some(w);
            }
        }
    }
}

impl Default for FloatEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder<f64> for FloatEncoder {
    fn write(&mut self, v: f64) {
        let bits = v.to_bits();

        if self.first {
            self.first = false;
            self.val = bits;
            self.bw.write_bits(bits, 64);
            return;
        }

        let v_delta = bits ^ self.val;
        if v_delta == 0 {
            self.bw.write_fixed::<0, 1>();
        } else {
            self.write_delta(v_delta);
        }

        self.val = bits;
    }

    fn flush(&mut self) {}

    fn bytes(&mut self) -> Result<Vec<u8>> {
        Ok(self.bw.to_bytes())
    }
}

/// FloatDecoder decodes a Gorilla bit stream into float64 values.
#[derive(Debug)]
pub struct FloatDecoder<'a> {
    br: BitSlice<'a>,
}

impl<'a> FloatDecoder<'a> {
    pub fn new(br: BitSlice<'a>) -> Self {
        Self { br }
    }

    fn read_window(&mut self) -> Result<Window> {
        let leading = self.br.read_bits(LEADING_BITS)? as u32;
        let mut sigbits = self.br.read_bits(SIGNIFICANT_BITS)? as u32;
        if sigbits == 0 {
            sigbits = 64;
        }

        let trailing = 64u32.checked_sub(leading + sigbits).ok_or_else(|| {
            Error::corrupt(format!(
                "float window overflows: {} leading + {} significant bits",
                leading, sigbits
            ))
        })?;

        Ok(Window { leading, trailing })
    }
}

impl<'a> Decoder<f64> for FloatDecoder<'a> {
    fn decode(mut self, count: usize) -> Result<Vec<f64>> {
        if count == 0 {
            return Ok(vec![]);
        }

        let mut out = Vec::with_capacity(count);
        let mut val = self.br.read_bits(64)?;
        out.push(f64::from_bits(val));

        let mut window: Option<Window> = None;
        while out.len() < count && !self.br.is_at_end() {
            if self.br.read_bit()? == Bit::One {
                let w = if self.br.read_bit()? == Bit::One {
                    let w = self.read_window()?;
                    window = Some(w);
                    w
                } else {
                    window.ok_or_else(|| {
                        Error::corrupt("float window reused before one was opened")
                    })?
                };

                let bits = self.br.read_bits(w.significant())?;
                val ^= bits << w.trailing;
            }

            out.push(f64::from_bits(val));
        }

        if out.len() < count {
            return Err(Error::corrupt(format!(
                "float stream ended after {} of {} values",
                out.len(),
                count
            )));
        }

        Ok(out)
    }
}
