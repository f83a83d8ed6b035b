/// zig_zag_encode converts a int64 to a uint64 by zig zagging negative and positive values
/// across even and odd numbers.  Eg. [0,-1,1,-2] becomes [0, 1, 2, 3].
#[inline]
pub fn zig_zag_encode(x: i64) -> u64 {
    ((x << 1) ^ (x >> 63)) as u64
}

/// zig_zag_decode converts a previously zigzag encoded uint64 back to a int64.
#[inline]
pub fn zig_zag_decode(v: u64) -> i64 {
    ((v >> 1) ^ (v & 1).wrapping_neg()) as i64
}

pub fn zig_zag_encode_all(src: &[i64]) -> Vec<u64> {
    src.iter().map(|x| zig_zag_encode(*x)).collect()
}

pub fn zig_zag_decode_all(src: &[u64]) -> Vec<i64> {
    src.iter().map(|v| zig_zag_decode(*v)).collect()
}
