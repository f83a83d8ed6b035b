//! Owned write buffers and borrowed read cursors that the codecs are built on.

pub mod bit;
pub mod byte;
pub mod slice;

pub use bit::{Bit, BitReader, BitSlice, BitWriter};
pub use byte::{ByteWriter, Scalar};
pub use slice::ByteSlice;
