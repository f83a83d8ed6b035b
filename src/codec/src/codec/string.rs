//! String encoding uses snappy compression to compress each string.  Each string is
//! appended to byte slice prefixed with a little-endian u32 byte length followed by
//! the string bytes.  The concatenation is compressed with the snappy raw format and
//! has no header of its own: the block tag in front of it names the encoding.

use crate::buffer::{ByteSlice, ByteWriter};
use crate::codec::{Decoder, Encoder};
use crate::error::{Error, Result};

/// StringEncoder encodes multiple strings into a byte slice.
#[derive(Debug, Default)]
pub struct StringEncoder {
    // The uncompressed records
    bytes: ByteWriter,
    err: Option<usize>,
}

impl StringEncoder {
    /// new returns a new StringEncoder with an initial buffer ready to hold sz bytes.
    pub fn new(sz: usize) -> Self {
        Self {
            bytes: ByteWriter::with_capacity(sz),
            err: None,
        }
    }

    pub fn write_str(&mut self, s: &str) {
        let len = match u32::try_from(s.len()) {
            Ok(len) => len,
            Err(_) => {
                self.err.get_or_insert(s.len());
                return;
            }
        };

        // Append the length of the string
        self.bytes.write(len);
        // Append the string bytes
        self.bytes.write_str(s);
    }
}

impl<'s> Encoder<&'s str> for StringEncoder {
    fn write(&mut self, v: &'s str) {
        self.write_str(v);
    }

    fn flush(&mut self) {}

    fn bytes(&mut self) -> Result<Vec<u8>> {
        if let Some(len) = self.err {
            return Err(Error::malformed(format!(
                "string of {} bytes exceeds the u32 length field",
                len
            )));
        }

        let mut encoder = snap::raw::Encoder::new();
        let compressed = encoder.compress_vec(self.bytes.as_slice())?;
        Ok(compressed)
    }
}

/// StringDecoder decodes a snappy compressed record stream into strings.
#[derive(Debug)]
pub struct StringDecoder<'a> {
    src: &'a [u8],
}

impl<'a> StringDecoder<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        Self { src }
    }
}

impl<'a> Decoder<String> for StringDecoder<'a> {
    fn decode(self, count: usize) -> Result<Vec<String>> {
        let mut decoder = snap::raw::Decoder::new();
        let decoded = decoder.decompress_vec(self.src)?;

        let mut values = Vec::with_capacity(count);
        let mut records = ByteSlice::new(&decoded);
        while !records.is_empty() {
            // Read the length of the string
            let length = records.read::<u32>().map_err(|_| {
                Error::corrupt("StringDecoder: invalid encoded string length")
            })?;
            let s = records.read_string(length as usize).map_err(|e| match e {
                Error::OutOfBounds { .. } => {
                    Error::corrupt("StringDecoder: not enough data to represent encoded string")
                }
                e => e,
            })?;
            values.push(s);
        }

        if values.len() != count {
            return Err(Error::corrupt(format!(
                "string payload holds {} values, expected {}",
                values.len(),
                count
            )));
        }

        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use crate::buffer::ByteWriter;
    use crate::codec::string::{StringDecoder, StringEncoder};
    use crate::codec::{Decoder, Encoder};
    use crate::error::ErrorKind;

    fn decode(b: &[u8], count: usize) -> Vec<String> {
        StringDecoder::new(b).decode(count).unwrap()
    }

    #[test]
    fn test_string_encoder_no_values() {
        let mut enc = StringEncoder::new(1024);
        let b = enc.bytes().unwrap();

        assert!(decode(&b, 0).is_empty());
    }

    #[test]
    fn test_string_encoder_single() {
        let mut enc = StringEncoder::new(1024);
        let v1 = "v1";
        enc.write(v1);

        let b = enc.bytes().unwrap();
        assert_eq!(decode(&b, 1), vec![v1.to_string()]);
    }

    #[test]
    fn test_string_encoder_multi_compressed() {
        let mut enc = StringEncoder::new(1024);

        let mut values = Vec::with_capacity(10);
        for i in 0..10 {
            values.push(format!("value {}", i));
            enc.write(values[i].as_str());
        }

        let b = enc.bytes().unwrap();
        let raw: usize = values.iter().map(|v| 4 + v.len()).sum();
        assert!(
            b.len() < raw,
            "expected compression: got {} bytes, raw {}",
            b.len(),
            raw
        );

        assert_eq!(decode(&b, values.len()), values);
    }

    #[test]
    fn test_string_encoder_empty_and_unicode() {
        let values = vec![
            String::new(),
            "héllo wörld".to_string(),
            "日本語".to_string(),
            String::new(),
        ];
        let mut enc = StringEncoder::new(0);
        for v in &values {
            enc.write(v.as_str());
        }

        let b = enc.bytes().unwrap();
        assert_eq!(decode(&b, values.len()), values);
    }

    #[test]
    fn test_string_decoder_not_snappy() {
        let err = StringDecoder::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF])
            .decode(1)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptPayload);
    }

    #[test]
    fn test_string_decoder_truncated_record() {
        let mut raw = ByteWriter::new();
        raw.write(10u32);
        raw.write_str("short");
        let b = snap::raw::Encoder::new().compress_vec(raw.as_slice()).unwrap();

        let err = StringDecoder::new(&b).decode(1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptPayload);
    }

    #[test]
    fn test_string_decoder_invalid_utf8() {
        let mut raw = ByteWriter::new();
        raw.write(2u32);
        raw.write_bytes(&[0xC3, 0x28]);
        let b = snap::raw::Encoder::new().compress_vec(raw.as_slice()).unwrap();

        let err = StringDecoder::new(&b).decode(1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptPayload);
    }

    #[test]
    fn test_string_decoder_count_mismatch() {
        let mut enc = StringEncoder::new(16);
        enc.write("a");
        enc.write("b");
        let b = enc.bytes().unwrap();

        let err = StringDecoder::new(&b).decode(3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptPayload);
    }
}
