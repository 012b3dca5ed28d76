use rptree::prelude::*;
use rptree::DiscreteDistribution;
use rptree::research::Fold;
use rptree::rpt::{apply_tree, PruneContext, ScoreContext};
use rptree::rpt::pruning::{minimal_subtree, pruning_sequence};

use std::sync::Arc;


fn leaf(counts: &[(&str, f64)]) -> RptNode {
    let dist = DiscreteDistribution::from_counts(counts.iter().copied());
    RptNode::leaf(ProbDistribution::Discrete(dist))
}


fn branch(name: &str, counts: &[(&str, f64)], yes: RptNode, no: RptNode) -> RptNode {
    let dist = DiscreteDistribution::from_counts(counts.iter().copied());
    let split = FeatureSetting::new(name, "count", 1);
    RptNode::branch(split, ProbDistribution::Discrete(dist), yes, no)
}


/// A tree whose left subtree adds nothing on the training data
/// and whose right subtree does.
fn layered_tree() -> RptNode {
    let a = branch(
        "A", &[("+", 5.0), ("-", 1.0)],
        leaf(&[("+", 4.0)]),
        leaf(&[("+", 1.0), ("-", 1.0)]),
    );
    let b = branch(
        "B", &[("+", 1.0), ("-", 5.0)],
        leaf(&[("+", 1.0)]),
        leaf(&[("-", 5.0)]),
    );
    branch("root", &[("+", 6.0), ("-", 6.0)], a, b)
}


/// Twelve subgraphs, `+` for ids below 6.
/// `S1` is nearly perfect, `S2` is noise.
fn twelve() -> (AttributeLabels, MatchTableCatalog) {
    let labels = AttributeLabels::discrete(
        "label", (0..12u64).map(|i| (i, if i < 6 { "+" } else { "-" }))
    );
    let mut catalog = MatchTableCatalog::new();
    catalog.insert_matches(
        FeatureSetting::new("S1", "count", 1),
        (0..12u64).map(|i| (i, i < 5)),
    );
    catalog.insert_matches(
        FeatureSetting::new("S2", "count", 1),
        (0..12u64).map(|i| (i, i % 2 == 0)),
    );
    (labels, catalog)
}


fn deterministic_builder() -> TreeBuilder {
    TreeBuilder::new(
        Arc::new(ChiSquareScore::new()),
        Arc::new(DefaultSplittingModule::new().deterministic(true)),
        Arc::new(DefaultStoppingModule::new().min_instances(0.0).unwrap()),
        Arc::new(DefaultSignificanceModule::new(0.5).unwrap()),
    )
}


/// Tests for cost-complexity pruning and tree selection.
#[cfg(test)]
pub mod pruning_tests {
    use super::*;

    #[test]
    fn useless_split_collapses() {
        let tree = branch(
            "A", &[("+", 3.0), ("-", 1.0)],
            leaf(&[("+", 2.0), ("-", 1.0)]),
            leaf(&[("+", 1.0)]),
        );
        let t1 = minimal_subtree(&tree);
        assert!(t1.is_leaf());
        assert_eq!(t1.distribution(), tree.distribution());
    }


    #[test]
    fn minimal_subtree_is_idempotent() {
        let tree = layered_tree();
        let t1 = minimal_subtree(&tree);
        assert_eq!(t1.leaf_count(), 3);
        assert_eq!(minimal_subtree(&t1), t1);
    }


    #[test]
    fn sequence_is_monotone() {
        let tree = layered_tree();
        let original = tree.clone();
        let sequence = pruning_sequence(&tree).unwrap();

        let leaves = sequence.iter().map(|t| t.leaf_count()).collect::<Vec<_>>();
        assert_eq!(leaves, vec![3, 2, 1]);

        let alphas = sequence.iter().map(|t| t.alpha()).collect::<Vec<_>>();
        assert_eq!(alphas[0], 0.0);
        assert!((alphas[1] - 1.0 / 12.0).abs() < 1e-12);
        assert!((alphas[2] - 1.0 / 3.0).abs() < 1e-12);

        for pair in sequence.windows(2) {
            assert!(pair[0].leaf_count() > pair[1].leaf_count());
            assert!(pair[0].alpha() <= pair[1].alpha());
        }
        assert_eq!(tree, original);
    }


    #[test]
    fn weakest_links_collapse_together() {
        let a = branch(
            "A", &[("+", 5.0), ("-", 1.0)],
            leaf(&[("+", 5.0)]),
            leaf(&[("-", 1.0)]),
        );
        let b = branch(
            "B", &[("+", 1.0), ("-", 5.0)],
            leaf(&[("+", 1.0)]),
            leaf(&[("-", 5.0)]),
        );
        let tree = branch("root", &[("+", 6.0), ("-", 6.0)], a, b);

        let sequence = pruning_sequence(&tree).unwrap();
        let leaves = sequence.iter().map(|t| t.leaf_count()).collect::<Vec<_>>();
        assert_eq!(leaves, vec![4, 2, 1]);
    }


    #[test]
    fn continuous_trees_are_not_pruned() {
        let dist = ProbDistribution::empty(true);
        let tree = RptNode::branch(
            FeatureSetting::new("A", "count", 1),
            dist.clone(),
            RptNode::leaf(dist.clone()),
            RptNode::leaf(dist),
        );
        assert!(matches!(
            pruning_sequence(&tree),
            Err(RptError::UnsupportedLabel { continuous: true, .. })
        ));
    }


    #[test]
    fn test_sample_prefers_the_accurate_tree() {
        let labels = AttributeLabels::discrete(
            "label",
            [(1, "+"), (2, "-"), (3, "-"), (4, "+"), (5, "-"), (6, "-")],
        );
        let setting = FeatureSetting::new("S", "count", 1);
        let mut catalog = MatchTableCatalog::new();
        catalog.insert_matches(
            setting.clone(),
            [(1, true), (2, false), (3, false), (4, true), (5, false), (6, false)],
        );

        let tree = RptNode::branch(
            setting,
            ProbDistribution::Discrete(
                DiscreteDistribution::from_counts([("+", 1.0), ("-", 2.0)])
            ),
            leaf(&[("+", 1.0)]),
            leaf(&[("-", 2.0)]),
        );
        let sequence = pruning_sequence(&tree).unwrap();
        assert_eq!(sequence.len(), 2);

        let train = Container::new("train", [1u64, 2, 3]);
        let builder = deterministic_builder();
        let ctx = PruneContext::new(
            &train, &labels, &catalog, &builder, 7, Interrupt::new()
        );

        let test = TestSampleSelection::new(Container::new("test", [4u64, 5, 6]));
        let scores = test.score_sequence(&sequence, &ctx).unwrap();
        assert_eq!(scores[0], 0.0);
        assert!((scores[1] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(test.select(&sequence, &ctx).unwrap(), tree);

        // Nothing scored: every tree gets the sentinel, the smallest wins.
        let empty = TestSampleSelection::new(Container::new("none", Vec::<u64>::new()));
        let selected = empty.select(&sequence, &ctx).unwrap();
        assert!(selected.is_leaf());
    }


    #[test]
    fn single_fold_matches_direct_evaluation() {
        let (labels, catalog) = twelve();
        let all = labels.container("all");
        let builder = deterministic_builder();

        let mut sc = ScoreContext::new(1, Interrupt::new());
        let cache = TableCache::new(all.clone(), &catalog);
        let main = builder.learn(&labels.label_table(&all).unwrap(), &cache, &mut sc)
            .unwrap();
        let sequence = pruning_sequence(&main).unwrap();
        assert!(sequence.len() >= 2);

        let train = Container::new("train", [0u64, 1, 2, 3, 6, 7, 8, 9]);
        let test = Container::new("test", [4u64, 5, 10, 11]);
        let fold = Fold { train: train.clone(), test: test.clone() };

        let ctx = PruneContext::new(
            &all, &labels, &catalog, &builder, 99, Interrupt::new()
        );
        let cv = CrossValidationSelection::with_folds(vec![fold]).unwrap();
        let scores = cv.score_sequence(&sequence, &ctx).unwrap();
        assert_eq!(scores.len(), sequence.len());

        let train_cache = TableCache::new(train.clone(), &catalog);
        let fold_tree = builder.learn(
            &labels.label_table(&train).unwrap(), &train_cache, &mut sc
        ).unwrap();
        let fold_sequence = pruning_sequence(&fold_tree).unwrap();

        let test_cache = TableCache::new(test.clone(), &catalog);
        let test_labels = labels.label_table(&test).unwrap();
        for (i, tree) in sequence.iter().enumerate() {
            let expected = if tree.root().is_leaf() {
                let total = tree.root().distribution().total();
                tree.root().tree_error(total)
            } else {
                let next = sequence.get(i + 1).map(|t| t.alpha()).unwrap_or(tree.alpha());
                let target = (tree.alpha() * next).sqrt();
                let chosen = fold_sequence.iter()
                    .find(|t| t.alpha() >= target)
                    .or(fold_sequence.last())
                    .unwrap();
                let mut predictions = apply_tree(
                    chosen.root(), &test_cache, &Interrupt::new()
                ).unwrap();
                predictions.set_true_labels(&test_labels);
                predictions.zero_one_loss().unwrap()
            };
            assert!((scores[i] - expected).abs() < 1e-12, "tree {i}");
        }
    }


    #[test]
    fn cross_validation_selects_a_member() {
        let (labels, catalog) = twelve();
        let all = labels.container("all");

        let mut rpt = RptBuilder::new()
            .p_value(0.5)
            .min_instances(0.0)
            .deterministic(true)
            .pruning(PruningKind::CrossValidation { n_folds: 3, shuffle: true })
            .seed(11)
            .build()
            .unwrap();
        rpt.learn(&all, &labels, &catalog).unwrap();

        let mut unpruned = RptBuilder::new()
            .p_value(0.5)
            .min_instances(0.0)
            .deterministic(true)
            .build()
            .unwrap();
        unpruned.learn(&all, &labels, &catalog).unwrap();

        let sequence = pruning_sequence(unpruned.root().unwrap()).unwrap();
        let selected = rpt.root().unwrap();
        assert!(sequence.iter().any(|t| t.root() == selected));
    }
}
