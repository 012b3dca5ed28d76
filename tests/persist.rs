use rptree::prelude::*;
use rptree::DiscreteDistribution;


/// The learned model of `+, -, -` separated by one setting.
fn learned() -> (Rpt, AttributeLabels, MatchTableCatalog) {
    let labels = AttributeLabels::discrete(
        "label", [(1, "+"), (2, "-"), (3, "-")]
    );
    let mut catalog = MatchTableCatalog::new();
    catalog.insert_matches(
        FeatureSetting::new("B.gender", "mode", "m"),
        [(1, true), (2, false), (3, false)],
    );

    let container = labels.container("train");
    let mut rpt = RptBuilder::new()
        .p_value(0.06)
        .build()
        .unwrap();
    rpt.learn(&container, &labels, &catalog).unwrap();
    (rpt, labels, catalog)
}


/// Tests for saving and loading models.
#[cfg(test)]
pub mod persist_tests {
    use super::*;

    #[test]
    fn save_and_load_keep_the_tree() {
        let (rpt, labels, catalog) = learned();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        rpt.save(&path).unwrap();
        let loaded = Rpt::load(&path).unwrap();

        assert_eq!(loaded.root().unwrap(), rpt.root().unwrap());
        assert_eq!(loaded.class_label().unwrap(), "label");
        assert_eq!(loaded.config(), rpt.config());
        assert_eq!(
            loaded.learned_splits().unwrap()[0].signature(),
            "mode([B.gender])>=m"
        );

        let container = labels.container("test");
        assert_eq!(
            loaded.apply(&container, &catalog).unwrap(),
            rpt.apply(&container, &catalog).unwrap(),
        );

        // Missing values split weight into fractional counts.
        let fractional = dir.path().join("fractional.json");
        for k in 1..200u32 {
            let w = k as f64 / 21.0;
            let yes = DiscreteDistribution::from_counts([("+", w), ("-", w * w / 7.0)]);
            let no = DiscreteDistribution::from_counts([("+", 1.0 - w / 10.0), ("-", w / 3.0)]);
            let root = RptNode::branch(
                FeatureSetting::new("B.gender", "mode", "m"),
                ProbDistribution::Discrete(yes.merge(&no)),
                RptNode::leaf(ProbDistribution::Discrete(yes)),
                RptNode::leaf(ProbDistribution::Discrete(no)),
            );

            let rpt = Rpt::from_root(root.clone(), "label").unwrap();
            rpt.save(&fractional).unwrap();
            let loaded = Rpt::load(&fractional).unwrap();
            assert_eq!(loaded.root().unwrap(), &root, "w = {w}");
        }
    }


    #[test]
    fn other_format_versions_are_refused() {
        let (rpt, _, _) = learned();
        let json = rpt.to_json().unwrap()
            .replacen("\"format_version\": 1", "\"format_version\": 2", 1);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.json");
        std::fs::write(&path, json).unwrap();

        assert!(matches!(
            Rpt::load(&path),
            Err(RptError::IncompatibleModelVersion { expected: 1, found: 2, .. })
        ));
    }


    #[test]
    fn unreadable_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(matches!(Rpt::load(&missing), Err(RptError::ReadModel { .. })));

        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, "{ not json").unwrap();
        assert!(matches!(Rpt::load(&garbage), Err(RptError::DeserializeModel { .. })));
    }
}
