use rand::{seq::SliceRandom, Rng, rngs::StdRng, SeedableRng};

use crate::error::DataError;

/// A single supervised sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub features: Vec<f64>,
    /// One-hot for classification, one or more targets for regression.
    pub label: Vec<f64>,
}

impl Example {
    pub fn new(features: Vec<f64>, label: Vec<f64>) -> Example {
        Example { features, label }
    }

    /// Index of the largest label entry.
    pub fn class_index(&self) -> usize {
        argmax(&self.label)
    }
}

/// Ordered, fully materialized collection of examples.
///
/// Contents never change after construction; only the order may (see
/// [`Dataset::shuffle_with`]).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    examples: Vec<Example>,
}

impl Dataset {
    pub fn new(examples: Vec<Example>) -> Dataset {
        Dataset { examples }
    }

    /// Builds a dataset from parallel input/label rows, checking that every
    /// row has the same width as the first.
    pub fn from_rows(inputs: Vec<Vec<f64>>, labels: Vec<Vec<f64>>) -> Result<Dataset, DataError> {
        if inputs.len() != labels.len() {
            return Err(DataError::LengthMismatch { inputs: inputs.len(), labels: labels.len() });
        }
        let n_feats = inputs.first().map_or(0, Vec::len);
        let n_labels = labels.first().map_or(0, Vec::len);

        let mut examples = Vec::with_capacity(inputs.len());
        for (row, (x, y)) in inputs.into_iter().zip(labels).enumerate() {
            if x.len() != n_feats {
                return Err(DataError::RaggedRow { row: row + 1, what: "feature", expected: n_feats, got: x.len() });
            }
            if y.len() != n_labels {
                return Err(DataError::RaggedRow { row: row + 1, what: "label", expected: n_labels, got: y.len() });
            }
            examples.push(Example::new(x, y));
        }
        Ok(Dataset { examples })
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Panics if `index` is out of bounds.
    pub fn get(&self, index: usize) -> &Example {
        &self.examples[index]
    }

    /// Copies examples `start..end` into a new dataset. Panics on a bad range.
    pub fn get_range(&self, start: usize, end: usize) -> Dataset {
        Dataset { examples: self.examples[start..end].to_vec() }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Example> {
        self.examples.iter()
    }

    pub fn feature_width(&self) -> usize {
        self.examples.first().map_or(0, |e| e.features.len())
    }

    pub fn label_width(&self) -> usize {
        self.examples.first().map_or(0, |e| e.label.len())
    }

    /// Labels wider than one column are treated as one-hot classes.
    pub fn is_classification(&self) -> bool {
        self.label_width() > 1
    }

    /// Number of distinct classes present (argmax of each label).
    pub fn distinct_classes(&self) -> usize {
        let mut seen = vec![false; self.label_width()];
        for e in &self.examples {
            if let Some(slot) = seen.get_mut(e.class_index()) {
                *slot = true;
            }
        }
        seen.into_iter().filter(|&s| s).count()
    }

    /// Reorders examples in place; contents are untouched.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.examples.shuffle(rng);
    }

    /// Moves the last `holdout` examples into a second dataset.
    /// Returns `(kept, held_out)`; panics if `holdout > len`.
    pub fn split_holdout(mut self, holdout: usize) -> (Dataset, Dataset) {
        let at = self.examples.len() - holdout;
        let held = self.examples.split_off(at);
        (self, Dataset { examples: held })
    }

    /// Two 2-D Gaussian-ish blobs centred at (0.3, 0.3) and (0.7, 0.7),
    /// alternating classes, one-hot labels of width 2.
    pub fn blobs(n: usize, spread: f64, seed: u64) -> Dataset {
        let mut rng = StdRng::seed_from_u64(seed);
        let centers = [(0.3f64, 0.3f64), (0.7f64, 0.7f64)];
        let examples = (0..n)
            .map(|i| {
                let class = i % 2;
                let (cx, cy) = centers[class];
                let x = cx + spread * (rng.gen::<f64>() * 2.0 - 1.0);
                let y = cy + spread * (rng.gen::<f64>() * 2.0 - 1.0);
                let mut one_hot = vec![0.0, 0.0];
                one_hot[class] = 1.0;
                Example::new(vec![x, y], one_hot)
            })
            .collect();
        Dataset { examples }
    }
}

impl FromIterator<Example> for Dataset {
    fn from_iter<I: IntoIterator<Item = Example>>(iter: I) -> Self {
        Dataset { examples: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Example;
    type IntoIter = std::slice::Iter<'a, Example>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.iter()
    }
}

/// Index of the maximum element in a slice (0 for an empty slice).
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Dataset {
        (0..n).map(|i| Example::new(vec![i as f64], vec![i as f64 * 10.0])).collect()
    }

    #[test]
    fn from_rows_rejects_mismatched_lengths() {
        let err = Dataset::from_rows(vec![vec![1.0]], vec![]).unwrap_err();
        assert!(matches!(err, DataError::LengthMismatch { inputs: 1, labels: 0 }));
    }

    #[test]
    fn from_rows_rejects_ragged_features() {
        let err = Dataset::from_rows(
            vec![vec![1.0, 2.0], vec![3.0]],
            vec![vec![0.0], vec![1.0]],
        ).unwrap_err();
        assert!(matches!(err, DataError::RaggedRow { row: 2, what: "feature", .. }));
    }

    #[test]
    fn get_range_copies_slice() {
        let ds = numbered(5);
        let sub = ds.get_range(1, 3);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.get(0).features, vec![1.0]);
        assert_eq!(sub.get(1).label, vec![20.0]);
    }

    #[test]
    fn shuffle_keeps_contents() {
        let ds = numbered(30);
        let mut shuffled = ds.clone();
        shuffled.shuffle_with(&mut StdRng::seed_from_u64(4));
        assert_ne!(shuffled, ds);

        let mut values: Vec<f64> = shuffled.iter().map(|e| e.features[0]).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(values, (0..30).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn split_holdout_is_disjoint() {
        let (train, val) = numbered(10).split_holdout(3);
        assert_eq!((train.len(), val.len()), (7, 3));
        assert_eq!(val.get(0).features, vec![7.0]);
    }

    #[test]
    fn blobs_are_balanced_one_hot() {
        let ds = Dataset::blobs(10, 0.1, 1);
        assert!(ds.is_classification());
        assert_eq!(ds.distinct_classes(), 2);
        assert_eq!(ds.iter().filter(|e| e.class_index() == 1).count(), 5);
    }
}
