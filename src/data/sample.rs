use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use super::model::Dataset;

/// Number of rows kept for the session.
pub const DEFAULT_SAMPLE_SIZE: usize = 3001;
/// Seed for the sampling RNG.
pub const DEFAULT_SEED: u64 = 55011;

/// Draw `size` rows without replacement using a generator seeded with `seed`.
///
/// The same dataset, size and seed always produce the same sample, in the
/// order the rows were drawn. A dataset of exactly `size` rows comes back as a
/// seeded permutation; one with fewer rows is returned whole, in file order.
pub fn sample_rows(dataset: &Dataset, size: usize, seed: u64) -> Dataset {
    if dataset.len() < size {
        log::warn!(
            "Dataset has {} rows, fewer than the sample size {size}; using all rows",
            dataset.len()
        );
        return dataset.clone();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let picked = index::sample(&mut rng, dataset.len(), size);
    let rows = picked
        .iter()
        .filter_map(|i| dataset.row(i).cloned())
        .collect();

    log::debug!("Sampled {size} of {} rows (seed {seed})", dataset.len());
    Dataset::from_rows(rows)
}
