use polars::prelude::*;
use rptree::prelude::*;


/// Three subgraphs labeled `+, -, -`.
/// `mode([B.gender])>=m` separates them perfectly,
/// `mode([A.age])>=40` does not.
fn fixture() -> (AttributeLabels, MatchTableCatalog) {
    let ids = Series::new("subg_id", &[1_u64, 2, 3]);
    let label = Series::new("label", &["+", "-", "-"]);
    let gender = Series::new("gender", &[true, false, false]);
    let age = Series::new("age", &[true, true, false]);
    let df = DataFrame::new(vec![ids, label, gender, age]).unwrap();

    let labels = AttributeLabels::from_dataframe(&df, "subg_id", "label")
        .unwrap();

    let mut catalog = MatchTableCatalog::new();
    catalog.insert_dataframe_column(
        FeatureSetting::new("B.gender", "mode", "m"), &df, "subg_id", "gender"
    ).unwrap();
    catalog.insert_dataframe_column(
        FeatureSetting::new("A.age", "mode", 40), &df, "subg_id", "age"
    ).unwrap();

    (labels, catalog)
}


/// Tests for `Rpt`.
#[cfg(test)]
pub mod rpt_tests {
    use super::*;

    #[test]
    fn learns_the_significant_split() {
        let (labels, catalog) = fixture();
        let container = labels.container("train");

        let mut rpt = RptBuilder::new()
            .p_value(0.06)
            .deterministic(true)
            .build()
            .unwrap();
        rpt.learn(&container, &labels, &catalog).unwrap();
        println!("{rpt:#}");

        assert_eq!(rpt.class_label().unwrap(), "label");
        assert_eq!(rpt.leaf_count().unwrap(), 2);
        assert_eq!(rpt.depth().unwrap(), 1);

        let splits = rpt.learned_splits().unwrap();
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].signature(), "mode([B.gender])>=m");

        let root = rpt.root().unwrap();
        assert!(!root.is_leaf());
        assert!(root.yes_branch().unwrap().is_leaf());
        assert!(root.no_branch().unwrap().is_leaf());
    }


    #[test]
    fn rejects_the_split_at_a_strict_cutoff() {
        let (labels, catalog) = fixture();
        let container = labels.container("train");

        let mut rpt = RptBuilder::new()
            .p_value(0.01)
            .build()
            .unwrap();
        rpt.learn(&container, &labels, &catalog).unwrap();

        let root = rpt.root().unwrap();
        assert!(root.is_leaf());
        assert!(root.split().is_none());
        assert!(rpt.learned_splits().unwrap().is_empty());
    }


    #[test]
    fn applies_to_the_training_container() {
        let (labels, catalog) = fixture();
        let container = labels.container("train");

        let mut rpt = RptBuilder::new()
            .p_value(0.06)
            .build()
            .unwrap();
        rpt.learn(&container, &labels, &catalog).unwrap();

        let mut predictions = rpt.apply(&container, &catalog).unwrap();
        assert_eq!(predictions.len(), 3);
        predictions.set_true_labels(&labels.label_table(&container).unwrap());

        assert_eq!(predictions.inferred_class(SubgraphId(1)).unwrap(), Some("+"));
        assert_eq!(predictions.inferred_class(SubgraphId(2)).unwrap(), Some("-"));
        assert_eq!(predictions.zero_one_loss().unwrap(), 0.0);
    }


    #[test]
    fn apply_with_cache_reuses_tables() {
        let (labels, catalog) = fixture();
        let container = labels.container("train");

        let mut rpt = RptBuilder::new()
            .p_value(0.06)
            .build()
            .unwrap();
        rpt.learn(&container, &labels, &catalog).unwrap();

        let cache = TableCache::new(container.clone(), &catalog);
        let first = rpt.apply_with_cache(&cache).unwrap();
        assert_eq!(cache.len(), 1);
        let second = rpt.apply_with_cache(&cache).unwrap();
        assert_eq!(first, second);
    }


    #[test]
    fn every_branch_has_two_children() {
        fn check(node: &RptNode) {
            match (node.split(), node.yes_branch(), node.no_branch()) {
                (None, None, None) => assert!(node.is_leaf()),
                (Some(_), Some(yes), Some(no)) => {
                    assert!(!node.is_leaf());
                    check(yes);
                    check(no);
                },
                _ => panic!("malformed node"),
            }
        }

        let labels = AttributeLabels::discrete(
            "label",
            (0..40u64).map(|i| (i, if i % 4 == 0 { "+" } else { "-" })),
        );
        let mut catalog = MatchTableCatalog::new();
        for k in 2..6u64 {
            catalog.insert_matches(
                FeatureSetting::new("X.value", "count", k),
                (0..40u64).filter(|i| i % 7 != k).map(|i| (i, i % k == 0)),
            );
        }

        let container = labels.container("train");
        let mut rpt = RptBuilder::new()
            .p_value(0.5)
            .min_instances(0.0)
            .build()
            .unwrap();
        rpt.learn(&container, &labels, &catalog).unwrap();
        check(rpt.root().unwrap());
    }


    #[test]
    fn untrained_model_fails() {
        let (_, catalog) = fixture();
        let rpt = RptBuilder::new().build().unwrap();
        let container = Container::new("empty", [1u64]);

        assert!(matches!(rpt.root(), Err(RptError::Untrained { .. })));
        assert!(matches!(rpt.class_label(), Err(RptError::Untrained { .. })));
        assert!(matches!(rpt.to_json(), Err(RptError::Untrained { .. })));
        assert!(matches!(
            rpt.apply(&container, &catalog),
            Err(RptError::Untrained { .. })
        ));
    }


    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(matches!(
            RptBuilder::new().p_value(0.0).build(),
            Err(RptError::InvalidCutoff { .. })
        ));
        assert!(matches!(
            RptBuilder::new().min_instances(-1.0).build(),
            Err(RptError::InvalidMinInstances { .. })
        ));
        assert!(matches!(
            RptBuilder::new()
                .pruning(PruningKind::CrossValidation { n_folds: 0, shuffle: false })
                .build(),
            Err(RptError::InvalidFoldCount { .. })
        ));
    }


    #[test]
    fn cancelled_learning_fails_fast() {
        let (labels, catalog) = fixture();
        let container = labels.container("train");

        let interrupt = Interrupt::new();
        interrupt.cancel();
        let mut rpt = RptBuilder::new()
            .interrupt(interrupt)
            .build()
            .unwrap();

        let result = rpt.learn(&container, &labels, &catalog);
        assert!(matches!(result, Err(RptError::Cancelled)));
        assert!(!rpt.is_trained());
    }


    #[test]
    fn config_from_json() {
        let json = r#"{
            "scoring": "chi_square",
            "p_value": 0.06,
            "deterministic": true,
            "pruning": { "cross_validation": { "n_folds": 3, "shuffle": false } }
        }"#;
        let config: RptConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.scoring, ScoringKind::ChiSquare);
        assert_eq!(config.min_instances, 2.0);

        let rpt = RptBuilder::from_config(config).build().unwrap();
        assert!(!rpt.is_trained());
    }


    #[test]
    fn dot_output_names_the_split() {
        let (labels, catalog) = fixture();
        let container = labels.container("train");

        let mut rpt = RptBuilder::new()
            .p_value(0.06)
            .build()
            .unwrap();
        rpt.learn(&container, &labels, &catalog).unwrap();

        let dot = rpt.to_dot().unwrap();
        assert!(dot.starts_with("graph RelationalProbabilityTree {"));
        assert!(dot.contains("mode([B.gender])>=m ?"));
        assert!(dot.contains("node_0 -- node_1"));
    }
}
