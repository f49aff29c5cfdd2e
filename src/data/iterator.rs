use rand::{rngs::StdRng, RngCore, SeedableRng};

use crate::data::dataset::Dataset;
use crate::error::{ConfigError, IterationError};

/// Fixed-size mini-batch traversal of an owned, in-memory dataset.
///
/// `has_next` only reports full batches: a trailing remainder smaller than
/// the batch size is skipped by normal iteration and must be fetched with
/// [`MiniBatchIterator::next_sized`].
#[derive(Debug, Clone)]
pub struct MiniBatchIterator {
    dataset: Dataset,
    batch_size: usize,
    cursor: usize,
    /// Master generator; each reset draws a fresh seed from it.
    shuffler: Option<StdRng>,
}

impl MiniBatchIterator {
    /// Sequential iterator; `reset` only rewinds.
    ///
    /// A batch size larger than the dataset is clamped to the dataset size.
    pub fn new(dataset: Dataset, batch_size: usize) -> Result<Self, ConfigError> {
        if dataset.is_empty() {
            return Err(ConfigError::EmptyDataset);
        }
        if batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        let batch_size = batch_size.min(dataset.len());
        Ok(Self { dataset, batch_size, cursor: 0, shuffler: None })
    }

    /// Like [`MiniBatchIterator::new`], but every `reset` reorders the dataset
    /// with a permutation derived from `seed` and the number of resets so far.
    pub fn shuffling(dataset: Dataset, batch_size: usize, seed: u64) -> Result<Self, ConfigError> {
        let mut it = Self::new(dataset, batch_size)?;
        it.shuffler = Some(StdRng::seed_from_u64(seed));
        Ok(it)
    }

    pub fn has_next(&self) -> bool {
        self.cursor + self.batch_size <= self.dataset.len()
    }

    /// Returns the next full batch and advances the cursor by `batch_size`.
    pub fn next_batch(&mut self) -> Result<Dataset, IterationError> {
        if !self.has_next() {
            return Err(IterationError::Exhausted {
                cursor: self.cursor,
                batch_size: self.batch_size,
                len: self.dataset.len(),
            });
        }
        Ok(self.take(self.batch_size))
    }

    /// Returns exactly `n` examples from the cursor, e.g. the final partial batch.
    pub fn next_sized(&mut self, n: usize) -> Result<Dataset, IterationError> {
        if n == 0 {
            return Err(IterationError::ZeroSized);
        }
        let remaining = self.remaining();
        if n > remaining {
            return Err(IterationError::OutOfRange { requested: n, remaining });
        }
        Ok(self.take(n))
    }

    fn take(&mut self, n: usize) -> Dataset {
        // A one-example dataset is handed back whole instead of sliced.
        let batch = if n == 1 && self.cursor == 0 && self.dataset.len() == 1 {
            self.dataset.clone()
        } else {
            self.dataset.get_range(self.cursor, self.cursor + n)
        };
        self.cursor += n;
        batch
    }

    /// Rewinds to the first example, reshuffling first if this is a shuffling iterator.
    pub fn reset(&mut self) {
        self.cursor = 0;
        if let Some(master) = self.shuffler.as_mut() {
            let mut rng = StdRng::seed_from_u64(master.next_u64());
            self.dataset.shuffle_with(&mut rng);
        }
    }

    /// Examples per batch, after clamping to the dataset size.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.dataset.len() - self.cursor
    }

    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    pub fn is_shuffling(&self) -> bool {
        self.shuffler.is_some()
    }

    /// The dataset in its current order.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}
