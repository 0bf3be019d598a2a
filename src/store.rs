//! Keyed wavefunction storage and chunked, state-scoped reads.
//!
//! [`Store`] is the interface a file backend would implement. [`MemStore`]
//! keeps everything in memory.

use rayon::prelude::*;

use crate::{
    codec,
    DetLayout,
    Error,
    Result,
};

pub trait Store {
    fn layout(&self) -> DetLayout;

    fn num_states(&self) -> usize;

    /// State that scopes coefficient reads and writes.
    fn state(&self) -> usize;

    fn set_state(
        &mut self,
        state: usize,
    ) -> Result<()>;

    /// Number of stored determinants.
    fn determinant_num(&self) -> usize;

    /// Read `count` determinants starting at determinant `offset`, as a
    /// flat array of `count * 2 * int64_num` words.
    fn read_determinants(
        &self,
        offset: usize,
        count: usize,
    ) -> Result<Vec<u64>>;

    /// Read `count` coefficients of the current state starting at `offset`.
    fn read_coefficients(
        &self,
        offset: usize,
        count: usize,
    ) -> Result<Vec<f64>>;
}

fn check_chunk(
    offset: usize,
    count: usize,
    size: usize,
) -> Result<()> {
    match offset.checked_add(count) {
        Some(end) if end <= size => Ok(()),
        _ => Err(Error::ChunkOutOfBounds {
            offset,
            count,
            size,
        }),
    }
}

#[derive(Debug, Clone)]
pub struct MemStore {
    layout:       DetLayout,
    state:        usize,
    dets:         Vec<u64>,
    coefficients: Vec<Vec<f64>>,
}

impl MemStore {
    pub fn new(
        mo_num: u32,
        num_states: usize,
    ) -> Result<Self> {
        if num_states == 0 {
            return Err(Error::InvalidArgument(
                "num_states must be positive".to_string(),
            ));
        }
        Ok(Self {
            layout:       DetLayout::new(mo_num)?,
            state:        0,
            dets:         Vec::new(),
            coefficients: vec![Vec::new(); num_states],
        })
    }

    /// Write a chunk of determinants starting at determinant `offset`.
    ///
    /// The chunk may overwrite existing determinants or extend the list,
    /// but may not leave a gap.
    pub fn write_determinants(
        &mut self,
        offset: usize,
        words: &[u64],
    ) -> Result<()> {
        let det_len = self.layout.det_len();
        if words.len() % det_len != 0 {
            return Err(Error::InvalidLength {
                expected: (words.len() / det_len + 1) * det_len,
                actual:   words.len(),
            });
        }
        let stored = self.determinant_num();
        if offset > stored {
            return Err(Error::ChunkOutOfBounds {
                offset,
                count: words.len() / det_len,
                size: stored,
            });
        }
        for half in words.chunks(self.layout.int64_num()) {
            self.layout.check_padding(half)?;
        }

        let start = offset * det_len;
        let end = (start + words.len()).min(self.dets.len());
        self.dets.splice(start..end, words.iter().copied());
        log::debug!(
            "wrote {} determinants at offset {offset}",
            words.len() / det_len
        );
        Ok(())
    }

    /// Write a chunk of coefficients for the current state.
    pub fn write_coefficients(
        &mut self,
        offset: usize,
        values: &[f64],
    ) -> Result<()> {
        let coeffs = &mut self.coefficients[self.state];
        if offset > coeffs.len() {
            return Err(Error::ChunkOutOfBounds {
                offset,
                count: values.len(),
                size: coeffs.len(),
            });
        }
        let end = (offset + values.len()).min(coeffs.len());
        coeffs.splice(offset..end, values.iter().copied());
        log::debug!(
            "wrote {} coefficients at offset {offset} (state {})",
            values.len(),
            self.state
        );
        Ok(())
    }
}

impl Store for MemStore {
    fn layout(&self) -> DetLayout {
        self.layout
    }

    fn num_states(&self) -> usize {
        self.coefficients.len()
    }

    fn state(&self) -> usize {
        self.state
    }

    fn set_state(
        &mut self,
        state: usize,
    ) -> Result<()> {
        if state >= self.num_states() {
            log::warn!(
                "rejected state {state}, store has {}",
                self.num_states()
            );
            return Err(Error::UnknownState {
                state,
                num_states: self.num_states(),
            });
        }
        self.state = state;
        Ok(())
    }

    fn determinant_num(&self) -> usize {
        self.dets.len() / self.layout.det_len()
    }

    fn read_determinants(
        &self,
        offset: usize,
        count: usize,
    ) -> Result<Vec<u64>> {
        check_chunk(offset, count, self.determinant_num())?;
        let det_len = self.layout.det_len();
        log::debug!("reading {count} determinants at offset {offset}");
        Ok(self.dets[offset * det_len..(offset + count) * det_len].to_vec())
    }

    fn read_coefficients(
        &self,
        offset: usize,
        count: usize,
    ) -> Result<Vec<f64>> {
        let coeffs = &self.coefficients[self.state];
        check_chunk(offset, count, coeffs.len())?;
        log::debug!(
            "reading {count} coefficients at offset {offset} (state {})",
            self.state
        );
        Ok(coeffs[offset..offset + count].to_vec())
    }
}

/// Read a chunk of determinants and decode each into `(up, down)` orbital
/// lists.
pub fn read_orbital_chunk<S>(
    store: &S,
    offset: usize,
    count: usize,
) -> Result<Vec<(Vec<u32>, Vec<u32>)>>
where
    S: Store,
{
    let layout = store.layout();
    let words = store.read_determinants(offset, count)?;
    words
        .chunks(layout.det_len())
        .map(|det| codec::decode_pair(layout.int64_num(), det))
        .collect()
}

/// Read the same coefficient region for several states in parallel.
///
/// Each worker selects its state on a private copy of the store. Results
/// are in the order of `states`; the first error aborts the whole read.
pub fn par_read_states<S>(
    store: &S,
    states: &[usize],
    offset: usize,
    count: usize,
) -> Result<Vec<Vec<f64>>>
where
    S: Store + Clone + Send + Sync,
{
    states
        .par_iter()
        .map(|&state| {
            let mut local = store.clone();
            local.set_state(state)?;
            local.read_coefficients(offset, count)
        })
        .collect()
}
