use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    codec::{
        self,
        OrbitalIter,
    },
    Error,
    Result,
    Spin,
    WORD_BITS,
};

/// Word geometry of a determinant: the orbital count and the number of
/// words per spin component derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "LayoutRepr")]
pub struct DetLayout {
    mo_num:    u32,
    int64_num: usize,
}

#[derive(Deserialize)]
struct LayoutRepr {
    mo_num:    u32,
    #[serde(default)]
    int64_num: Option<usize>,
}

impl TryFrom<LayoutRepr> for DetLayout {
    type Error = Error;

    fn try_from(value: LayoutRepr) -> Result<Self> {
        let layout = DetLayout::new(value.mo_num)?;
        match value.int64_num {
            Some(n) if n != layout.int64_num => {
                Err(Error::InvalidArgument(format!(
                    "int64_num {n} inconsistent with mo_num {}",
                    value.mo_num
                )))
            }
            _ => Ok(layout),
        }
    }
}

impl DetLayout {
    pub fn new(mo_num: u32) -> Result<Self> {
        Ok(Self {
            mo_num,
            int64_num: codec::compute_word_count(mo_num)?,
        })
    }

    pub fn mo_num(&self) -> u32 {
        self.mo_num
    }

    pub fn int64_num(&self) -> usize {
        self.int64_num
    }

    /// Length of a full (two-component) determinant in words.
    pub fn det_len(&self) -> usize {
        2 * self.int64_num
    }

    /// Mask of the bits of the last word that correspond to real orbitals.
    pub fn padding_mask(&self) -> u64 {
        match self.mo_num % WORD_BITS {
            0 => u64::MAX,
            r => (1u64 << r) - 1,
        }
    }

    /// Check one spin component for bits set above `mo_num`.
    pub fn check_padding(
        &self,
        words: &[u64],
    ) -> Result<()> {
        if words.len() != self.int64_num {
            return Err(Error::InvalidLength {
                expected: self.int64_num,
                actual:   words.len(),
            });
        }
        let last = self.int64_num - 1;
        let bits = words[last] & !self.padding_mask();
        if bits != 0 {
            log::debug!(
                "padding bits {bits:#x} set in word {last} (mo_num={})",
                self.mo_num
            );
            return Err(Error::PaddingBits {
                word: last,
                bits,
            });
        }
        Ok(())
    }
}

/// A validated full determinant: up-spin words followed by down-spin
/// words.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DetRepr")]
pub struct Determinant {
    layout: DetLayout,
    words:  Vec<u64>,
}

#[derive(Deserialize)]
struct DetRepr {
    layout: DetLayout,
    words:  Vec<u64>,
}

impl TryFrom<DetRepr> for Determinant {
    type Error = Error;

    fn try_from(value: DetRepr) -> Result<Self> {
        Determinant::from_words(value.layout, value.words)
    }
}

impl Determinant {
    /// # Errors
    ///
    /// `InvalidLength` if `words` is not `2 * int64_num` long,
    /// `PaddingBits` if either component has bits above `mo_num`.
    pub fn from_words(
        layout: DetLayout,
        words: Vec<u64>,
    ) -> Result<Self> {
        if words.len() != layout.det_len() {
            return Err(Error::InvalidLength {
                expected: layout.det_len(),
                actual:   words.len(),
            });
        }
        let (up, down) = words.split_at(layout.int64_num());
        layout.check_padding(up)?;
        layout.check_padding(down)?;
        Ok(Self {
            layout,
            words,
        })
    }

    pub fn from_orbitals(
        layout: DetLayout,
        up: &[u32],
        down: &[u32],
    ) -> Result<Self> {
        let max = layout.mo_num();
        if let Some(&index) = up.iter().chain(down).find(|&&o| o > max) {
            return Err(Error::OutOfRange {
                index,
                max: u64::from(max),
            });
        }
        let words = codec::encode_pair(layout.int64_num(), up, down)?;
        Ok(Self {
            layout,
            words,
        })
    }

    pub fn layout(&self) -> DetLayout {
        self.layout
    }

    pub fn words(&self) -> &[u64] {
        &self.words
    }

    pub fn into_words(self) -> Vec<u64> {
        self.words
    }

    pub fn spin_words(
        &self,
        spin: Spin,
    ) -> &[u64] {
        let n = self.layout.int64_num();
        let start = spin.offset(n);
        &self.words[start..start + n]
    }

    pub fn orbitals(
        &self,
        spin: Spin,
    ) -> Vec<u32> {
        OrbitalIter::new(self.spin_words(spin)).collect()
    }

    /// `(up, down)` orbital lists.
    pub fn orbital_lists(&self) -> (Vec<u32>, Vec<u32>) {
        (self.orbitals(Spin::Up), self.orbitals(Spin::Down))
    }

    pub fn num_electrons(
        &self,
        spin: Spin,
    ) -> u32 {
        codec::count_occupied(self.spin_words(spin))
    }

    /// Excitation degree between two determinants: half the number of
    /// differing occupations, summed over both spin components.
    pub fn excitation_degree(
        &self,
        other: &Self,
    ) -> Result<u32> {
        if self.layout != other.layout {
            return Err(Error::LayoutMismatch {
                left:  self.layout.mo_num(),
                right: other.layout.mo_num(),
            });
        }
        let degree = Spin::both()
            .into_iter()
            .map(|spin| {
                let diff: Vec<u64> = self
                    .spin_words(spin)
                    .iter()
                    .zip(other.spin_words(spin))
                    .map(|(a, b)| a ^ b)
                    .collect();
                codec::count_occupied(&diff) / 2
            })
            .sum();
        Ok(degree)
    }
}
