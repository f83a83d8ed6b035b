use tracing::debug;

use crate::block::{unpack_block, unwrap_block, EncoderType, Header};
use crate::codec::boolean::BooleanDecoder;
use crate::codec::float::FloatDecoder;
use crate::codec::integer::IntegerDecoder;
use crate::codec::string::StringDecoder;
use crate::codec::Decoder;
use crate::error::{Error, Result};
use crate::value::{Series, Values};

/// Decodes a block produced by `encode_block`, with or without the outer
/// snappy wrap.
pub fn decode_block(block: &[u8]) -> Result<Series> {
    let inner = unwrap_block(block)?;
    let Header {
        count,
        timestamps,
        typ,
        mut values,
    } = unpack_block(&inner)?;

    let ts = IntegerDecoder::new(timestamps).decode(count)?;

    let values = match typ {
        EncoderType::Float => {
            let br = values.bit_slice(values.bytes_left())?;
            Values::Float(FloatDecoder::new(br).decode(count)?)
        }
        EncoderType::Boolean => Values::Bool(BooleanDecoder::new(values).decode(count)?),
        EncoderType::String => Values::Str(StringDecoder::new(values.rest()).decode(count)?),
        EncoderType::Integer => {
            return Err(Error::UnsupportedVariant("integer value column"));
        }
        EncoderType::Snappy => {
            return Err(Error::corrupt("snappy tag in value position"));
        }
    };

    debug!(
        items = count,
        value_type = %typ,
        block_bytes = block.len(),
        unwrapped_bytes = inner.len(),
        "decoded block"
    );

    Series::new(ts, values)
}
