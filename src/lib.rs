//! Bit-packed determinants and occupied-orbital lists.
//!
//! A determinant for one spin component is a sequence of `int64_num`
//! 64-bit words. Bit `b` of word `w` (least-significant bit first) marks
//! orbital `64 * w + b + 1` as occupied. A full determinant stores the
//! up-spin words followed by the down-spin words.

pub mod codec;
pub mod det;
pub mod store;


pub use codec::{
    compute_word_count,
    count_occupied,
    decode_one,
    decode_pair,
    encode_one,
    encode_pair,
    from_signed,
    to_signed,
    OrbitalIter,
};
pub use det::{
    DetLayout,
    Determinant,
};
pub use store::{
    par_read_states,
    read_orbital_chunk,
    MemStore,
    Store,
};

/// Width of a determinant word in bits.
pub const WORD_BITS: u32 = 64;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid length: expected {expected} words, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("orbital index out of range: index={index}, max={max}")]
    OutOfRange { index: u32, max: u64 },
    #[error("duplicate orbital index: {index}")]
    DuplicateIndex { index: u32 },
    #[error("padding bits set in word {word}: {bits:#x}")]
    PaddingBits { word: usize, bits: u64 },
    #[error("determinant layouts differ: mo_num {left} vs {right}")]
    LayoutMismatch { left: u32, right: u32 },
    #[error("unknown state: {state} (num_states={num_states})")]
    UnknownState { state: usize, num_states: usize },
    #[error("chunk out of bounds: offset={offset}, count={count}, size={size}")]
    ChunkOutOfBounds {
        offset: usize,
        count:  usize,
        size:   usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Hash, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Spin {
    #[default]
    Up,
    Down,
}

impl Spin {
    pub fn is_up(&self) -> bool {
        *self == Self::Up
    }

    pub fn flip(self) -> Self {
        use Spin::*;
        match self {
            Up => Down,
            Down => Up,
        }
    }

    /// Index of the first word of this spin component inside a full
    /// determinant.
    pub fn offset(
        self,
        int64_num: usize,
    ) -> usize {
        usize::from(self) * int64_num
    }

    pub fn both() -> [Spin; 2] {
        [Spin::Up, Spin::Down]
    }
}

impl From<Spin> for usize {
    fn from(value: Spin) -> Self {
        match value {
            Spin::Up => 0,
            Spin::Down => 1,
        }
    }
}

impl From<usize> for Spin {
    fn from(value: usize) -> Self {
        if value == 0 {
            Spin::Up
        } else {
            Spin::Down
        }
    }
}
