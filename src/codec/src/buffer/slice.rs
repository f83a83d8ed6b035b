use crate::buffer::bit::BitSlice;
use crate::buffer::byte::Scalar;
use crate::error::{Error, Result};

/// ByteSlice is a read cursor over borrowed bytes. Every read is bounds
/// checked; sub-slices borrow the same bytes.
#[derive(Debug, Clone, Copy)]
pub struct ByteSlice<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteSlice<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(n)
            .filter(|end| *end <= self.data.len())
            .ok_or(Error::OutOfBounds {
                offset: self.offset,
                len: self.data.len(),
                need: n,
            })?;

        let b = &self.data[self.offset..end];
        self.offset = end;
        Ok(b)
    }

    pub fn read<T: Scalar>(&mut self) -> Result<T> {
        self.take(T::SIZE).map(T::get)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    pub fn read_string(&mut self, n: usize) -> Result<String> {
        let b = self.take(n)?;
        std::str::from_utf8(b)
            .map(|s| s.to_owned())
            .map_err(|e| Error::corrupt(format!("invalid utf-8 string: {}", e)))
    }

    /// Carves the next `n` bytes out as a new cursor.
    pub fn slice(&mut self, n: usize) -> Result<ByteSlice<'a>> {
        self.take(n).map(ByteSlice::new)
    }

    /// Carves the next `n` bytes out as a bit cursor.
    pub fn bit_slice(&mut self, n: usize) -> Result<BitSlice<'a>> {
        self.take(n).map(BitSlice::from_bytes)
    }

    /// Consumes everything left.
    pub fn rest(&mut self) -> &'a [u8] {
        let b = &self.data[self.offset..];
        self.offset = self.data.len();
        b
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn bytes_left(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.bytes_left() == 0
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::buffer::bit::{BitWriter, Read, Write};
    use crate::buffer::byte::ByteWriter;
    use crate::buffer::slice::ByteSlice;
    use crate::error::{Error, ErrorKind};

    #[test]
    fn test_read_scalars() {
        let mut w = ByteWriter::new();
        w.write(7u8);
        w.write(1000u32);
        w.write(u64::MAX - 1);
        w.write(-2.25f64);
        let b = w.into_inner();

        let mut s = ByteSlice::new(&b);
        assert_eq!(s.read::<u8>().unwrap(), 7);
        assert_eq!(s.read::<u32>().unwrap(), 1000);
        assert_eq!(s.read::<u64>().unwrap(), u64::MAX - 1);
        assert_eq!(s.read::<f64>().unwrap(), -2.25);
        assert!(s.is_empty());
    }

    #[test]
    fn test_read_past_end() {
        let b = [1u8, 2, 3];
        let mut s = ByteSlice::new(&b);
        assert_eq!(s.read::<u8>().unwrap(), 1);

        match s.read::<u32>() {
            Err(Error::OutOfBounds { offset, len, need }) => {
                assert_eq!((offset, len, need), (1, 3, 4));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        // a failed read does not move the cursor
        assert_eq!(s.offset(), 1);
        assert_eq!(s.bytes_left(), 2);
    }

    #[test]
    fn test_sub_slices() {
        let mut w = ByteWriter::new();
        w.write(2u32);
        w.write_str("hi");
        let mut bits = BitWriter::new();
        bits.write_bits(0b1011, 4);
        w.write_bits(&bits);
        let b = w.into_inner();

        let mut s = ByteSlice::new(&b);
        let n = s.read::<u32>().unwrap() as usize;
        let mut inner = s.slice(n).unwrap();
        assert_eq!(inner.len(), 2);
        assert_eq!(inner.read_string(2).unwrap(), "hi");

        let mut bs = s.bit_slice(8).unwrap();
        assert_eq!(bs.read_bits(4).unwrap(), 0b1011);
        assert!(s.is_empty());

        let err = s.slice(1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    }

    #[test]
    fn test_read_string_invalid_utf8() {
        let b = [0xFFu8, 0xFE];
        let mut s = ByteSlice::new(&b);
        let err = s.read_string(2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptPayload);
    }

    #[test]
    fn test_rest() {
        let b = [9u8, 8, 7];
        let mut s = ByteSlice::new(&b);
        s.read_bytes(1).unwrap();
        assert_eq!(s.rest(), &[8, 7]);
        assert!(s.is_empty());
        assert_eq!(s.rest(), &[] as &[u8]);
    }
}
