use rptree::prelude::*;
use rptree::research::{CrossValidation, Fold};

use std::collections::HashSet;


fn ids(container: &Container) -> HashSet<SubgraphId> {
    container.iter().collect()
}


/// Tests for fold generation.
#[cfg(test)]
pub mod cross_validation_tests {
    use super::*;

    #[test]
    fn folds_partition_the_container() {
        let container = Container::new("all", 0..10u64);
        let folds = CrossValidation::new(&container)
            .n_folds(3)
            .collect::<Vec<Fold>>();

        assert_eq!(folds.len(), 3);
        let sizes = folds.iter().map(|f| f.test.len()).collect::<Vec<_>>();
        assert_eq!(sizes, vec![3, 3, 4]);

        let mut tested = HashSet::new();
        for fold in &folds {
            let train = ids(&fold.train);
            let test = ids(&fold.test);
            assert!(train.is_disjoint(&test));
            assert_eq!(train.len() + test.len(), 10);
            tested.extend(test);
        }
        assert_eq!(tested, ids(&container));
        assert_eq!(folds[0].test.name(), "all-test-0");
    }


    #[test]
    fn single_fold_holds_out_a_fifth() {
        let container = Container::new("all", 0..10u64);
        let folds = CrossValidation::new(&container)
            .n_folds(1)
            .collect::<Vec<_>>();

        assert_eq!(folds.len(), 1);
        assert_eq!(folds[0].test.len(), 2);
        assert_eq!(folds[0].train.len(), 8);
        assert!(folds[0].test.contains(SubgraphId(0)));
    }


    #[test]
    fn shuffle_is_reproducible() {
        let container = Container::new("all", 0..50u64);
        let first = CrossValidation::new(&container)
            .seed(7)
            .shuffle()
            .collect::<Vec<_>>();
        let second = CrossValidation::new(&container)
            .seed(7)
            .shuffle()
            .collect::<Vec<_>>();
        assert_eq!(first, second);

        let plain = CrossValidation::new(&container).collect::<Vec<_>>();
        assert_ne!(first, plain);
    }
}
