use rand::prelude::*;
use rptree::prelude::*;
use rptree::{ContinuousDistribution, DiscreteDistribution};
use rptree::predictions::EMPTY_LOSS;
use rptree::rpt::apply_tree;


fn discrete(counts: &[(&str, f64)]) -> ProbDistribution {
    let dist = DiscreteDistribution::from_counts(counts.iter().copied());
    ProbDistribution::Discrete(dist)
}


fn continuous(values: &[f64]) -> ProbDistribution {
    let mut dist = ContinuousDistribution::new();
    for &x in values {
        dist.add(x, 1.0);
    }
    ProbDistribution::Continuous(dist)
}


/// Tests for `Predictions` and `apply_tree`.
#[cfg(test)]
pub mod predictions_tests {
    use super::*;

    #[test]
    fn nothing_scored_gives_the_sentinel() {
        let predictions = Predictions::new();
        assert_eq!(predictions.zero_one_loss().unwrap(), EMPTY_LOSS);

        // Predicted but unlabeled.
        let mut predictions = Predictions::new();
        predictions.set_prediction(SubgraphId(1), discrete(&[("+", 1.0)]))
            .unwrap();
        assert_eq!(predictions.zero_one_loss().unwrap(), -99.0);
    }


    #[test]
    fn zero_one_loss_counts_wrong_modes() {
        let mut predictions = Predictions::new();
        predictions.set_prediction(SubgraphId(1), discrete(&[("+", 3.0), ("-", 1.0)]))
            .unwrap();
        predictions.set_prediction(SubgraphId(2), discrete(&[("+", 1.0), ("-", 2.0)]))
            .unwrap();
        predictions.set_true_label(SubgraphId(1), "+");
        predictions.set_true_label(SubgraphId(2), "+");

        assert_eq!(predictions.zero_one_loss().unwrap(), 0.5);
        assert_eq!(predictions.inferred_class(SubgraphId(2)).unwrap(), Some("-"));

        let cll = predictions.conditional_log_likelihood().unwrap();
        let expected = 0.75f64.ln() + (1.0f64 / 3.0).ln();
        assert!((cll - expected).abs() < 1e-12);
    }


    #[test]
    fn missing_values_merge_both_leaves() {
        let setting = FeatureSetting::new("S", "count", 1);
        let tree = RptNode::branch(
            setting.clone(),
            discrete(&[("+", 105.0), ("-", 55.0)]),
            RptNode::leaf(discrete(&[("+", 90.0), ("-", 10.0)])),
            RptNode::leaf(discrete(&[("+", 15.0), ("-", 45.0)])),
        );

        let mut catalog = MatchTableCatalog::new();
        catalog.insert_matches(setting, [(1, true), (2, false)]);
        let container = Container::new("test", [1u64, 2, 3]);
        let cache = TableCache::new(container, &catalog);

        let predictions = apply_tree(&tree, &cache, &Interrupt::new()).unwrap();
        assert_eq!(predictions.len(), 3);

        let merged = predictions.get(SubgraphId(3))
            .and_then(|d| d.as_discrete())
            .unwrap();
        assert!((merged.count("+") - 52.5).abs() < 1e-12);
        assert!((merged.count("-") - 27.5).abs() < 1e-12);
        assert!((merged.probability("+") - 0.65625).abs() < 1e-12);

        let known = predictions.get(SubgraphId(1))
            .and_then(|d| d.as_discrete())
            .unwrap();
        assert_eq!(known.count("+"), 90.0);
    }


    #[test]
    fn mixed_kinds_do_not_merge() {
        let mut predictions = Predictions::new();
        predictions.set_prediction(SubgraphId(1), discrete(&[("+", 1.0)]))
            .unwrap();
        assert!(matches!(
            predictions.set_prediction(SubgraphId(1), continuous(&[1.0])),
            Err(RptError::DistributionMismatch)
        ));
    }


    #[test]
    fn rmse_of_predicted_means() {
        let mut predictions = Predictions::new();
        assert_eq!(predictions.rmse().unwrap(), 0.0);

        predictions.set_prediction(SubgraphId(1), continuous(&[1.0, 3.0]))
            .unwrap();
        predictions.set_prediction(SubgraphId(2), continuous(&[4.0]))
            .unwrap();
        predictions.set_true_label(SubgraphId(1), 3.0);
        predictions.set_true_label(SubgraphId(2), 4.0);

        let rmse = predictions.rmse().unwrap();
        assert!((rmse - 0.5f64.sqrt()).abs() < 1e-12);
        assert!(predictions.zero_one_loss().is_err());
    }


    #[test]
    fn roc_and_auc() {
        let rows = [
            (1, ("+", 0.9), "+"),
            (2, ("+", 0.8), "-"),
            (3, ("+", 0.3), "+"),
            (4, ("+", 0.1), "-"),
        ];
        let mut predictions = Predictions::new();
        for (id, (class, p), truth) in rows {
            let dist = discrete(&[(class, p), ("-", 1.0 - p)]);
            predictions.set_prediction(SubgraphId(id), dist).unwrap();
            predictions.set_true_label(SubgraphId(id), truth);
        }

        let points = predictions.roc_points("+");
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], (0.0, 0.0));
        assert_eq!(points[1], (0.0, 0.5));
        assert_eq!(points[2], (0.5, 0.5));
        assert_eq!(points[4], (1.0, 1.0));
        assert!((predictions.auc("+") - 0.75).abs() < 1e-12);

        assert!(Predictions::new().roc_points("+").is_empty());
    }


    #[test]
    fn smoothing_never_gives_zero() {
        let empty = DiscreteDistribution::new();
        assert_eq!(empty.smoothed_probability("+"), 0.01);
        assert_eq!(empty.log_probability("+"), 0.01f64.ln());
        assert!(empty.log_probability("+").is_finite());

        let dist = DiscreteDistribution::from_counts([("+", 3.0), ("-", 1.0)]);
        assert_eq!(dist.smoothed_probability("+"), 0.75);
        assert_eq!(dist.smoothed_probability("?"), 0.0025);
        assert_eq!(dist.log_probability("-"), 0.25f64.ln());

        assert!((dist.laplace_probability("+") - 4.0 / 6.0).abs() < 1e-12);
        assert!((dist.laplace_probability("?") - 1.0 / 6.0).abs() < 1e-12);
    }


    #[test]
    fn removed_values_leave_the_distribution() {
        let mut dist = DiscreteDistribution::from_counts([("+", 3.0), ("-", 1.0)]);

        dist.remove_value("+", 1.0);
        assert_eq!(dist.count("+"), 2.0);
        assert_eq!(dist.total(), 3.0);

        dist.remove_value("-", 1.0);
        assert_eq!(dist.len(), 1);
        assert_eq!(dist.count("-"), 0.0);
        assert_eq!(dist.total(), 2.0);

        dist.remove_value("?", 1.0);
        assert_eq!(dist.total(), 2.0);
    }


    #[test]
    fn normalize_all_rescales_discrete_predictions() {
        let mut predictions = Predictions::new();
        predictions.set_prediction(SubgraphId(1), discrete(&[("+", 3.0), ("-", 1.0)]))
            .unwrap();
        predictions.set_prediction(SubgraphId(2), continuous(&[1.0, 3.0]))
            .unwrap();
        predictions.normalize_all();

        let dist = predictions.get(SubgraphId(1))
            .and_then(|d| d.as_discrete())
            .unwrap();
        assert_eq!(dist.count("+"), 0.75);
        assert_eq!(dist.count("-"), 0.25);
        assert_eq!(dist.total(), 1.0);

        assert_eq!(predictions.get(SubgraphId(2)).unwrap().total(), 2.0);
    }


    #[test]
    fn sampled_classes_follow_the_predictions() {
        let mut predictions = Predictions::new();
        predictions.set_prediction(SubgraphId(1), discrete(&[("+", 1.0)]))
            .unwrap();
        predictions.set_prediction(SubgraphId(2), discrete(&[("-", 2.0)]))
            .unwrap();

        let mut rng = StdRng::seed_from_u64(1234);
        let classes = predictions.sampled_classes(&mut rng).unwrap();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[&SubgraphId(1)], "+");
        assert_eq!(classes[&SubgraphId(2)], "-");

        predictions.remove_prediction(SubgraphId(1));
        let classes = predictions.sampled_classes(&mut rng).unwrap();
        assert_eq!(classes.keys().copied().collect::<Vec<_>>(), vec![SubgraphId(2)]);

        predictions.set_prediction(SubgraphId(3), continuous(&[1.0]))
            .unwrap();
        assert!(matches!(
            predictions.sampled_classes(&mut rng),
            Err(RptError::UnsupportedLabel { .. })
        ));
    }


    #[test]
    fn gaussian_densities() {
        let std_normal = 1.0 / (2.0 * std::f64::consts::PI).sqrt();

        let ProbDistribution::Continuous(spread) = continuous(&[1.0, 3.0]) else {
            unreachable!()
        };
        assert!((spread.density(2.0) - std_normal).abs() < 1e-12);
        assert!(spread.density(100.0) < 1e-100);
        assert_eq!(spread.smoothed_density(100.0), 0.005);
        assert!((spread.smoothed_density(2.0) - std_normal).abs() < 1e-12);

        // No deviation falls back to `1 / sqrt(total)`.
        let ProbDistribution::Continuous(flat) = continuous(&[5.0; 4]) else {
            unreachable!()
        };
        assert!((flat.density(5.0) - 2.0 * std_normal).abs() < 1e-12);
    }
}
