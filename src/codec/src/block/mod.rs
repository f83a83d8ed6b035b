//! Block framing. An encoded block is laid out as:
//!
//! ```text
//! u8   INTEGER tag
//! u32  item count
//! u32  timestamp block length
//! ...  simple8b packed delta-of-delta timestamps
//! u8   value tag (FLOAT, BOOLEAN or STRING)
//! ...  value payload, running to the end of the block
//! ```
//!
//! The whole block may instead be a SNAPPY tag followed by the snappy raw
//! compression of the layout above.  All integers are little-endian.

pub mod decoder;
pub mod encoder;

use std::borrow::Cow;
use std::fmt;

use crate::buffer::ByteSlice;
use crate::codec::simple8b;
use crate::error::{Error, Result};

/// ENCODED_BLOCK_HEADER_SIZE is the tag, item count and timestamp length in
/// front of the timestamp block.
pub const ENCODED_BLOCK_HEADER_SIZE: usize = 1 + 4 + 4;

/// EncoderType is the single byte tag naming how the bytes after it are
/// encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EncoderType {
    Integer = 0,
    Float = 1,
    Boolean = 2,
    String = 3,
    Snappy = 10,
}

impl TryFrom<u8> for EncoderType {
    type Error = Error;

    fn try_from(v: u8) -> Result<Self> {
        match v {
            0 => Ok(EncoderType::Integer),
            1 => Ok(EncoderType::Float),
            2 => Ok(EncoderType::Boolean),
            3 => Ok(EncoderType::String),
            10 => Ok(EncoderType::Snappy),
            _ => Err(Error::corrupt(format!("unknown block type: {}", v))),
        }
    }
}

impl fmt::Display for EncoderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EncoderType::Integer => "integer",
            EncoderType::Float => "float",
            EncoderType::Boolean => "boolean",
            EncoderType::String => "string",
            EncoderType::Snappy => "snappy",
        };
        f.write_str(s)
    }
}

/// Strips the outer snappy wrap if the block carries one.
pub(crate) fn unwrap_block(block: &[u8]) -> Result<Cow<'_, [u8]>> {
    let typ = match block.first() {
        Some(typ) => EncoderType::try_from(*typ)?,
        None => return Err(Error::malformed("decode of empty block")),
    };

    if typ != EncoderType::Snappy {
        return Ok(Cow::Borrowed(block));
    }

    let inner = snap::raw::Decoder::new().decompress_vec(&block[1..])?;
    if inner.first() == Some(&(EncoderType::Snappy as u8)) {
        return Err(Error::corrupt("nested snappy block"));
    }
    Ok(Cow::Owned(inner))
}

/// The parsed framing of an unwrapped block.
#[derive(Debug)]
pub(crate) struct Header<'a> {
    pub count: usize,
    pub timestamps: ByteSlice<'a>,
    pub typ: EncoderType,
    pub values: ByteSlice<'a>,
}

pub(crate) fn unpack_block(block: &[u8]) -> Result<Header<'_>> {
    let mut src = ByteSlice::new(block);

    let typ = EncoderType::try_from(src.read::<u8>()?)?;
    if typ != EncoderType::Integer {
        return Err(Error::corrupt(format!(
            "invalid block type: exp {}, got {}",
            EncoderType::Integer,
            typ
        )));
    }

    let count = src.read::<u32>()? as usize;
    let ts_len = src.read::<u32>()? as usize;
    let timestamps = src.slice(ts_len)?;
    let typ = EncoderType::try_from(src.read::<u8>()?)?;

    Ok(Header {
        count,
        timestamps,
        typ,
        values: src,
    })
}

/// BlockInfo summarises a block without decoding its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub item_count: usize,
    pub timestamp_len: usize,
    /// How many timestamps the packed words address, at least `item_count`
    /// for a well formed block.
    pub packed_timestamps: usize,
    pub value_type: EncoderType,
    pub value_len: usize,
    /// Whether the block is wrapped in snappy.
    pub compressed: bool,
    pub encoded_len: usize,
    pub decoded_len: usize,
}

/// Reads the header of `block`, unwrapping the outer snappy layer if present.
pub fn inspect(block: &[u8]) -> Result<BlockInfo> {
    let inner = unwrap_block(block)?;
    let mut header = unpack_block(&inner)?;

    Ok(BlockInfo {
        item_count: header.count,
        timestamp_len: header.timestamps.len(),
        packed_timestamps: simple8b::count_values(header.timestamps.rest())?,
        value_type: header.typ,
        value_len: header.values.bytes_left(),
        compressed: matches!(inner, Cow::Owned(_)),
        encoded_len: block.len(),
        decoded_len: inner.len(),
    })
}
