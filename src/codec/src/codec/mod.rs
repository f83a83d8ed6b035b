pub mod boolean;
pub mod float;
pub mod integer;
pub mod simple8b;
pub mod string;
pub mod zigzag;

use crate::error::Result;

/// Encoder is a streaming column encoder: values are written one at a time
/// and `bytes` produces the column payload.
pub trait Encoder<T> {
    fn write(&mut self, v: T);
    fn flush(&mut self);
    fn bytes(&mut self) -> Result<Vec<u8>>;
}

/// Decoder reads exactly `count` values back from a payload. The payloads
/// carry no element count of their own that could be trusted over the
/// caller's, so reading stops at `count`; a payload that ends first is an
/// error.
pub trait Decoder<T> {
    fn decode(self, count: usize) -> Result<Vec<T>>;
}
