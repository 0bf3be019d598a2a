//! Conversion between determinant words and occupied-orbital lists.
//!
//! Every function here is pure: no I/O, no shared state.

use num::PrimInt;

use crate::{
    Error,
    Result,
    WORD_BITS,
};

/// Number of 64-bit words needed to hold `mo_num` orbitals of one spin
/// component.
pub fn compute_word_count(mo_num: u32) -> Result<usize> {
    if mo_num < 1 {
        return Err(Error::InvalidArgument(
            "mo_num must be positive".to_string(),
        ));
    }
    Ok(((mo_num - 1) / WORD_BITS + 1) as usize)
}

/// Largest orbital index representable with `int64_num` words.
fn max_orbital(int64_num: usize) -> u64 {
    int64_num as u64 * u64::from(WORD_BITS)
}

// Orbital indices are u32, so the representable range must fit.
fn check_word_count(int64_num: usize) -> Result<()> {
    if int64_num == 0 {
        return Err(Error::InvalidArgument(
            "int64_num must be positive".to_string(),
        ));
    }
    if max_orbital(int64_num) > u64::from(u32::MAX) {
        return Err(Error::InvalidArgument(format!(
            "int64_num too large: {int64_num}"
        )));
    }
    Ok(())
}

fn check_len(
    expected: usize,
    actual: usize,
) -> Result<()> {
    if expected != actual {
        log::trace!("word array length {actual}, expected {expected}");
        return Err(Error::InvalidLength {
            expected,
            actual,
        });
    }
    Ok(())
}

/// Iterator over the 1-based indices of set bits in a word slice, in
/// increasing order.
#[derive(Debug, Clone)]
pub struct OrbitalIter<'a> {
    words: &'a [u64],
    pos:   usize,
    rest:  u64,
}

impl<'a> OrbitalIter<'a> {
    pub fn new(words: &'a [u64]) -> Self {
        Self {
            words,
            pos: 0,
            rest: words.first().copied().unwrap_or(0),
        }
    }
}

impl<'a> Iterator for OrbitalIter<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        while self.rest == 0 {
            self.pos += 1;
            self.rest = *self.words.get(self.pos)?;
        }
        let bit = self.rest.trailing_zeros();
        // clear lowest set bit
        self.rest &= self.rest - 1;
        Some(self.pos as u32 * WORD_BITS + bit + 1)
    }
}

/// Decode one spin component into its occupied orbitals.
///
/// Every set bit is reported; bits above `mo_num` are not rejected here.
///
/// # Errors
///
/// `InvalidArgument` if `int64_num` is zero, `InvalidLength` if
/// `words.len() != int64_num`.
pub fn decode_one(
    int64_num: usize,
    words: &[u64],
) -> Result<Vec<u32>> {
    check_word_count(int64_num)?;
    check_len(int64_num, words.len())?;
    Ok(OrbitalIter::new(words).collect())
}

/// Decode a full determinant into `(up, down)` orbital lists.
///
/// # Errors
///
/// `InvalidLength` if `words.len() != 2 * int64_num`.
pub fn decode_pair(
    int64_num: usize,
    words: &[u64],
) -> Result<(Vec<u32>, Vec<u32>)> {
    check_word_count(int64_num)?;
    check_len(2 * int64_num, words.len())?;
    let (up, down) = words.split_at(int64_num);
    Ok((decode_one(int64_num, up)?, decode_one(int64_num, down)?))
}

/// Encode occupied orbitals of one spin component into `int64_num` words.
///
/// Input order is irrelevant.
///
/// # Errors
///
/// `OutOfRange` for index `0` or above `64 * int64_num`, `DuplicateIndex`
/// if an index repeats.
pub fn encode_one(
    int64_num: usize,
    orbitals: &[u32],
) -> Result<Vec<u64>> {
    check_word_count(int64_num)?;
    let max = max_orbital(int64_num);
    let mut words = vec![0u64; int64_num];
    for &index in orbitals {
        if index == 0 || u64::from(index) > max {
            return Err(Error::OutOfRange {
                index,
                max,
            });
        }
        let w = ((index - 1) / WORD_BITS) as usize;
        let mask = 1u64 << ((index - 1) % WORD_BITS);
        if words[w] & mask != 0 {
            return Err(Error::DuplicateIndex {
                index,
            });
        }
        words[w] |= mask;
    }
    Ok(words)
}

/// Encode `(up, down)` orbital lists into a full determinant.
pub fn encode_pair(
    int64_num: usize,
    up: &[u32],
    down: &[u32],
) -> Result<Vec<u64>> {
    let mut words = encode_one(int64_num, up)?;
    words.extend(encode_one(int64_num, down)?);
    Ok(words)
}

/// Number of set bits, i.e. the number of electrons in the component.
pub fn count_occupied<T>(words: &[T]) -> u32
where
    T: PrimInt,
{
    words.iter().map(|w| w.count_ones()).sum()
}

/// Reinterpret words read as signed 64-bit integers. No bit changes.
pub fn from_signed(words: &[i64]) -> Vec<u64> {
    words.iter().map(|&w| w as u64).collect()
}

/// Reinterpret words as signed 64-bit integers for writing.
pub fn to_signed(words: &[u64]) -> Vec<i64> {
    words.iter().map(|&w| w as i64).collect()
}
