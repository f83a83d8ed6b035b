//! Lossless compression of a timestamp column and a parallel value column
//! into one self-describing block.
//!
//! Timestamps are delta-of-delta encoded and packed with simple8b, floats use
//! Gorilla XOR compression, booleans are bit packed and strings are snappy
//! compressed.  See [`block`] for the byte layout.
//!
//! ```
//! use gorilla_codec::{decode, encode, EncodeOptions, Series};
//!
//! let series = Series::new(
//!     vec![1000, 1005, 1010, 1016, 1020],
//!     vec![1.5, 1.5, 1.5, 2.0, 2.0],
//! )?;
//! let block = encode(&series, &EncodeOptions::default())?;
//! assert_eq!(decode(&block)?, series);
//! # Ok::<(), gorilla_codec::Error>(())
//! ```

pub mod block;
pub mod buffer;
pub mod codec;
pub mod config;
pub mod error;
pub mod value;

pub use block::{inspect, BlockInfo, EncoderType};
pub use config::{Compression, EncodeOptions};
pub use error::{Error, ErrorKind, Result};
pub use value::{Datum, Series, Values};

/// Encodes `series` into a block.
pub fn encode(series: &Series, opts: &EncodeOptions) -> Result<Vec<u8>> {
    block::encoder::encode_block(series, opts)
}

/// Decodes a block back into its timestamps and values.
pub fn decode(block: &[u8]) -> Result<Series> {
    block::decoder::decode_block(block)
}
