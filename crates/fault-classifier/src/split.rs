//! Seeded Train/Test Split

use crate::ClassifierError;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use tracing::debug;

/// Row indices of each side of a split, ascending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Hold out `ceil(test_size * n)` samples for testing.
///
/// With `stratify`, every class contributes to the test side in proportion
/// to its size (largest remainders break the rounding). The same labels,
/// size and seed always give the same split.
pub fn train_test_split(
    labels: &[usize],
    test_size: f64,
    seed: u64,
    stratify: bool,
) -> Result<Split, ClassifierError> {
    let n = labels.len();
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(ClassifierError::InvalidOptions(format!(
            "test_size must be in (0, 1), got {test_size}"
        )));
    }
    if n < 2 {
        return Err(ClassifierError::InvalidOptions(format!(
            "need at least 2 samples to split, got {n}"
        )));
    }

    let n_test = ((test_size * n as f64).ceil() as usize).clamp(1, n - 1);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut test = if stratify {
        stratified_test(labels, n_test, &mut rng)
    } else {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut rng);
        indices.truncate(n_test);
        indices
    };
    test.sort_unstable();

    let mut is_test = vec![false; n];
    for &i in &test {
        is_test[i] = true;
    }
    let train = (0..n).filter(|&i| !is_test[i]).collect();

    debug!("Split {} samples: {} train / {} test", n, n - n_test, n_test);
    Ok(Split { train, test })
}

fn stratified_test(labels: &[usize], n_test: usize, rng: &mut ChaCha8Rng) -> Vec<usize> {
    let n = labels.len();
    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(i);
    }

    // Floor of each proportional share, then hand out the rest by remainder
    let mut quotas: Vec<(usize, usize, f64)> = by_class
        .iter()
        .map(|(&label, members)| {
            let exact = members.len() as f64 * n_test as f64 / n as f64;
            (label, exact.floor() as usize, exact - exact.floor())
        })
        .collect();
    let assigned: usize = quotas.iter().map(|q| q.1).sum();
    let mut order: Vec<usize> = (0..quotas.len()).collect();
    order.sort_by(|&a, &b| quotas[b].2.total_cmp(&quotas[a].2).then(a.cmp(&b)));
    for &k in order.iter().take(n_test.saturating_sub(assigned)) {
        quotas[k].1 += 1;
    }

    let mut test = Vec::with_capacity(n_test);
    for (label, quota, _) in quotas {
        if let Some(members) = by_class.get_mut(&label) {
            members.shuffle(rng);
            test.extend(members.iter().take(quota));
        }
    }
    test
}
