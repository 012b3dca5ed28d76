use rand::prelude::*;
use colored::Colorize;
use serde::{Serialize, Deserialize};

use std::iter::Iterator;

use crate::common::SubgraphId;
use crate::sample::Container;

const WIDTH: usize = 9;


/// A training/test partition of a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fold {
    /// Subgraphs a fold tree is learned from.
    pub train: Container,
    /// Subgraphs a fold tree is applied to.
    pub test: Container,
}


/// A struct that generates
/// pairs of training/test containers for cross validation.
///
/// With `k >= 2` folds, fold `i` tests the `i`'th of `k`
/// contiguous slices of the (optionally shuffled) subgraph ids
/// and trains on the rest.
/// With a single fold, the first `n - n * train_ratio` ids are tested.
/// # Example
/// ```no_run
/// use rptree::prelude::*;
/// use rptree::research::CrossValidation;
///
/// let container = Container::new("all", 0..100u64);
/// let cv = CrossValidation::new(&container)
///     .n_folds(5)
///     .verbose(true)
///     .seed(777)
///     .shuffle();
/// for fold in cv {
///     println!("{} / {}", fold.train.len(), fold.test.len());
/// }
/// ```
pub struct CrossValidation<'a> {
    train_size: usize,
    current_fold: usize,
    n_folds: usize,
    seed: u64,
    container: &'a Container,
    ix: Vec<SubgraphId>,
    verbose: bool,
}


impl<'a> CrossValidation<'a> {
    /// Construct a new instance of `CrossValidation.`
    #[inline]
    pub fn new(container: &'a Container) -> Self {
        let n_subgraphs = container.len();
        let train_size = (n_subgraphs as f64 * 0.8) as usize;
        let ix = container.iter().collect::<Vec<_>>();
        Self {
            current_fold: 0,
            n_folds: 5,
            seed: 1234,
            verbose: false,
            train_size,
            container,
            ix,
        }
    }


    /// Set the ratio of training subgraphs of a single fold.
    /// Default value is `0.8`.
    #[inline]
    pub fn train_ratio(mut self, ratio: f64) -> Self {
        assert!(
            0f64 < ratio && ratio < 1f64,
            "Training ratio should be in `(0, 1)`."
        );
        let n_subgraphs = self.container.len() as f64;
        self.train_size = (ratio * n_subgraphs) as usize;
        self
    }


    /// Set the number of folds.
    /// Default value is `5.`
    #[inline]
    pub fn n_folds(mut self, n_folds: usize) -> Self {
        self.n_folds = n_folds;
        self
    }


    /// Set the seed of the randomness for shuffling.
    /// Default vaule is `1234.`
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }


    /// Set the verbose parameter.
    /// If `true`, `CrossValidation` prints some information
    /// when generating a train/test pair.
    /// Default vaule is `false.`
    #[inline]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }


    /// Shuffle the subgraph ids.
    /// By default, `CrossValidation` does not shuffle them.
    #[inline]
    pub fn shuffle(mut self) -> Self {
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.ix.shuffle(&mut rng);
        self
    }


    /// Returns the test range of the `i`th fold.
    #[inline]
    fn test_range(&self, i: usize) -> (usize, usize) {
        let n = self.ix.len();
        if self.n_folds <= 1 {
            (0, n - self.train_size)
        } else {
            (i * n / self.n_folds, (i + 1) * n / self.n_folds)
        }
    }


    /// Returns the training/test containers for the `i`th fold.
    #[inline]
    fn fold_at(&self, i: usize) -> Fold {
        let (start, end) = self.test_range(i);
        let test = &self.ix[start..end];
        let train = self.ix[..start].iter()
            .chain(self.ix[end..].iter())
            .copied();

        let name = self.container.name();
        Fold {
            train: Container::new(format!("{name}-train-{i}"), train),
            test: Container::new(format!("{name}-test-{i}"), test.iter().copied()),
        }
    }
}


impl<'a> Iterator for CrossValidation<'a> {
    type Item = Fold;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_fold >= self.n_folds { return None; }

        let output = self.fold_at(self.current_fold);
        self.current_fold += 1;

        if self.verbose {
            let train_size = output.train.len();
            let test_size = output.test.len();
            println!(
                "{}    {}    {}",
                format!("  [{: >3}'th fold]", self.current_fold).bold().red(),
                format!("[TRAIN {:>WIDTH$}]", train_size).bold().green(),
                format!("[TEST {:>WIDTH$}]", test_size).bold().yellow(),
            );
        }

        Some(output)
    }
}
