use tracing::{debug, trace};

use crate::block::{EncoderType, ENCODED_BLOCK_HEADER_SIZE};
use crate::buffer::ByteWriter;
use crate::codec::boolean::BooleanEncoder;
use crate::codec::float::FloatEncoder;
use crate::codec::integer::IntegerEncoder;
use crate::codec::string::StringEncoder;
use crate::codec::Encoder;
use crate::config::{Compression, EncodeOptions};
use crate::error::{Error, Result};
use crate::value::{Series, Values};

/// Encodes a series into a single block.
pub fn encode_block(series: &Series, opts: &EncodeOptions) -> Result<Vec<u8>> {
    let count = u32::try_from(series.len()).map_err(|_| {
        Error::malformed(format!("{} items exceed the u32 item count", series.len()))
    })?;

    if let Values::Integer(_) = series.values() {
        return Err(Error::UnsupportedVariant("integer value column"));
    }

    // Encoded timestamp values
    let tb = encode_using(
        IntegerEncoder::new(series.len()),
        series.timestamps().iter().copied(),
    )?;
    let ts_len = u32::try_from(tb.len()).map_err(|_| {
        Error::malformed(format!("timestamp block of {} bytes is too large", tb.len()))
    })?;

    // Encoded column values
    let (typ, vb) = match series.values() {
        Values::Float(values) => (
            EncoderType::Float,
            encode_using(FloatEncoder::new(), values.iter().copied())?,
        ),
        Values::Bool(values) => (
            EncoderType::Boolean,
            encode_using(BooleanEncoder::new(values.len()), values.iter().copied())?,
        ),
        Values::Str(values) => (
            EncoderType::String,
            encode_using(
                StringEncoder::new(values.len() * 8),
                values.iter().map(String::as_str),
            )?,
        ),
        Values::Integer(_) => return Err(Error::UnsupportedVariant("integer value column")),
    };

    let block = pack_block(count, ts_len, &tb, typ, &vb);
    debug!(
        items = count,
        timestamp_bytes = tb.len(),
        value_bytes = vb.len(),
        value_type = %typ,
        "encoded block"
    );

    match opts.compression {
        Compression::None => Ok(block),
        Compression::Snappy => wrap_snappy(block),
    }
}

fn encode_using<T>(mut enc: impl Encoder<T>, values: impl Iterator<Item = T>) -> Result<Vec<u8>> {
    for v in values {
        enc.write(v);
    }
    enc.flush();
    enc.bytes()
}

fn pack_block(count: u32, ts_len: u32, tb: &[u8], typ: EncoderType, vb: &[u8]) -> Vec<u8> {
    let mut w = ByteWriter::with_capacity(ENCODED_BLOCK_HEADER_SIZE + tb.len() + 1 + vb.len());
    w.write(EncoderType::Integer as u8);
    w.write(count);
    w.write(ts_len);
    w.write_bytes(tb);
    w.write(typ as u8);
    w.write_bytes(vb);
    w.into_inner()
}

/// Replaces `block` with its snappy compression when that is strictly
/// smaller, tag included.
fn wrap_snappy(block: Vec<u8>) -> Result<Vec<u8>> {
    let compressed = snap::raw::Encoder::new().compress_vec(&block)?;
    if compressed.len() + 1 >= block.len() {
        trace!(
            raw = block.len(),
            compressed = compressed.len() + 1,
            "snappy wrap not smaller, keeping raw block"
        );
        return Ok(block);
    }

    let mut w = ByteWriter::with_capacity(compressed.len() + 1);
    w.write(EncoderType::Snappy as u8);
    w.write_bytes(&compressed);
    debug!(
        raw = block.len(),
        compressed = w.len(),
        "wrapped block in snappy"
    );
    Ok(w.into_inner())
}
