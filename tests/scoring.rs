use rptree::prelude::*;
use rptree::rpt::{Score, ScoreContext};
use rptree::common::stat_util::round_to;


fn ctx() -> ScoreContext {
    ScoreContext::new(1234, Interrupt::new())
}


/// Labels `1, 2, 2 | 3, 4, 4` split by the match column.
fn regression_fixture() -> (LabelTable, WeightedInstanceSet, MatchTable) {
    let rows = [(1.0, true), (2.0, true), (2.0, true), (3.0, false), (4.0, false), (4.0, false)];
    let mut labels = LabelTable::new(true);
    let mut matches = MatchTable::new();
    for (i, &(y, m)) in rows.iter().enumerate() {
        let id = SubgraphId(i as u64);
        labels.push(id, y);
        matches.insert(id, m);
    }
    let weights = WeightedInstanceSet::uniform(labels.subgraph_ids());
    (labels, weights, matches)
}


/// Subgraphs labeled `+, -, -`, separated perfectly by the match column.
fn classification_fixture() -> (LabelTable, WeightedInstanceSet, MatchTable) {
    let mut labels = LabelTable::new(false);
    labels.push(SubgraphId(1), "+");
    labels.push(SubgraphId(2), "-");
    labels.push(SubgraphId(3), "-");
    let matches = [(1, true), (2, false), (3, false)]
        .into_iter()
        .map(|(id, m)| (SubgraphId(id), m))
        .collect::<MatchTable>();
    let weights = WeightedInstanceSet::uniform(labels.subgraph_ids());
    (labels, weights, matches)
}


/// Tests for the scoring modules.
#[cfg(test)]
pub mod scoring_tests {
    use super::*;

    #[test]
    fn rmse_statistics() {
        let (labels, weights, matches) = regression_fixture();
        let score = RmseScore::new()
            .compute(&labels, &weights, &matches, &mut ctx())
            .unwrap();

        let Score::Rmse { rmse, rmse_no_split, d, d_hat } = score else {
            panic!("expected an RMSE score, got {score}");
        };
        assert_eq!(round_to(rmse_no_split, 5), 1.10554);
        assert_eq!(round_to(rmse, 6), 0.471405);
        assert_eq!(round_to(d, 1), 0.5);
        assert_eq!(round_to(d_hat, 4), round_to(0.57735, 4));
        assert!(score.is_significant(0.05));
    }


    #[test]
    fn quinlan_info_gain() {
        let (labels, weights, matches) = classification_fixture();
        let score = QuinlanInfoScore::new()
            .compute(&labels, &weights, &matches, &mut ctx())
            .unwrap();
        assert!((score.value() - 0.6365).abs() < 1e-4);
        assert!(score.is_significant(0.0001));
    }


    #[test]
    fn gini_gain_of_a_perfect_split() {
        let (labels, weights, matches) = classification_fixture();
        let score = GiniScore::new()
            .compute(&labels, &weights, &matches, &mut ctx())
            .unwrap();
        // 1 - (1/3)^2 - (2/3)^2
        assert!((score.value() - 4.0 / 9.0).abs() < 1e-12);
    }


    #[test]
    fn chi_square_of_a_perfect_split() {
        let (labels, weights, matches) = classification_fixture();
        let score = ChiSquareScore::new()
            .compute(&labels, &weights, &matches, &mut ctx())
            .unwrap();

        let Score::ChiSquare { g, p } = score else {
            panic!("expected a chi-square score, got {score}");
        };
        assert!((g - 3.8191).abs() < 1e-4);
        assert!(p > 0.05 && p < 0.052);
        assert!(score.is_significant(0.06));
        assert!(!score.is_significant(0.01));
    }


    #[test]
    fn chi_square_table_of_the_textbook_example() {
        let score = ChiSquareScore::score_table(&[
            vec![10.0, 30.0],
            vec![20.0, 40.0],
        ]);
        assert_eq!(round_to(score.value(), 1), 0.8);
    }


    #[test]
    fn scores_of_different_kinds_do_not_compare() {
        let chi = Score::ChiSquare { g: 1.0, p: 0.5 };
        let gini = Score::Gini { gain: 0.1 };
        assert!(matches!(
            chi.is_better_than(&gini),
            Err(RptError::ScoreMismatch { expected: "chi-square", found: "gini" })
        ));
    }


    #[test]
    fn chi_square_ties_prefer_higher_g() {
        let a = Score::ChiSquare { g: 5.0, p: 0.0 };
        let b = Score::ChiSquare { g: 3.0, p: 0.0 };
        assert!(a.is_better_than(&b).unwrap());
        assert!(!b.is_better_than(&a).unwrap());
        assert!(!a.is_better_than(&a).unwrap());
    }


    #[test]
    fn label_kind_is_checked() {
        let (labels, weights, matches) = regression_fixture();
        assert!(matches!(
            ChiSquareScore::new().compute(&labels, &weights, &matches, &mut ctx()),
            Err(RptError::UnsupportedLabel { continuous: true, .. })
        ));

        let (labels, weights, matches) = classification_fixture();
        assert!(matches!(
            RmseScore::new().compute(&labels, &weights, &matches, &mut ctx()),
            Err(RptError::UnsupportedLabel { continuous: false, .. })
        ));
    }


    #[test]
    fn randomization_is_reproducible() {
        let (labels, weights, matches) = classification_fixture();
        let scoring = RandomizationPValueScore::new(ChiSquareScore::new())
            .n_samples(40)
            .unwrap();

        let first = scoring.compute(&labels, &weights, &matches, &mut ctx())
            .unwrap();
        let second = scoring.compute(&labels, &weights, &matches, &mut ctx())
            .unwrap();
        assert_eq!(first, second);

        let p = first.value();
        assert!((0.0..=1.0).contains(&p));
        assert!(RandomizationPValueScore::new(GiniScore::new()).n_samples(0).is_err());
    }
}
