use std::collections::BTreeMap;

use govscore::scoring::{aggregate, compute_score, contribution, label_for_score, RatingLabel};
use govscore::ScoringError;

fn scores(pairs: &[(&str, u8)]) -> BTreeMap<String, u8> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn weights(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn rubric_weights() -> BTreeMap<String, f64> {
    weights(&[
        ("board", 0.25),
        ("ownership", 0.15),
        ("pay", 0.20),
        ("audit", 0.15),
        ("attendance", 0.15),
        ("disclosure", 0.10),
    ])
}

#[test]
fn test_all_max_scores_give_exactly_one_hundred() {
    let w = rubric_weights();
    let s: BTreeMap<String, u8> = w.keys().map(|k| (k.clone(), 5)).collect();
    assert_eq!(aggregate(&s, &w).unwrap(), 100.0);
}

#[test]
fn test_all_zero_scores_give_zero() {
    let w = rubric_weights();
    let s: BTreeMap<String, u8> = w.keys().map(|k| (k.clone(), 0)).collect();
    assert_eq!(aggregate(&s, &w).unwrap(), 0.0);
}

#[test]
fn test_all_minimum_rubric_scores_give_twenty() {
    let w = rubric_weights();
    let s: BTreeMap<String, u8> = w.keys().map(|k| (k.clone(), 1)).collect();
    let value = aggregate(&s, &w).unwrap();
    assert!((value - 20.0).abs() < 1e-9, "got {value}");
}

#[test]
fn test_weighted_mix() {
    let s = scores(&[("board", 4), ("comp", 2)]);
    let w = weights(&[("board", 0.75), ("comp", 0.25)]);
    // 0.8 * 0.75 + 0.4 * 0.25 = 0.7
    let value = aggregate(&s, &w).unwrap();
    assert!((value - 70.0).abs() < 1e-9, "got {value}");
}

#[test]
fn test_aggregate_is_monotonic() {
    let w = rubric_weights();
    let keys: Vec<String> = w.keys().cloned().collect();
    let base: BTreeMap<String, u8> = keys
        .iter()
        .enumerate()
        .map(|(i, k)| (k.clone(), (i % 5) as u8 + 1))
        .collect();
    let base_value = aggregate(&base, &w).unwrap();

    for key in &keys {
        for bumped in base[key]..=5 {
            let mut s = base.clone();
            s.insert(key.clone(), bumped);
            let value = aggregate(&s, &w).unwrap();
            assert!(value >= base_value, "raising {key} to {bumped} lowered the score");
        }
    }
}

#[test]
fn test_aggregate_stays_in_range() {
    let w = rubric_weights();
    for level in 0..=5u8 {
        let s: BTreeMap<String, u8> = w.keys().map(|k| (k.clone(), level)).collect();
        let value = aggregate(&s, &w).unwrap();
        assert!((0.0..=100.0).contains(&value));
    }
}

#[test]
fn test_schema_mismatch() {
    let s = scores(&[("board", 4)]);
    let w = weights(&[("board", 0.5), ("comp", 0.5)]);
    let err = aggregate(&s, &w).unwrap_err();
    assert_eq!(
        err,
        ScoringError::SchemaMismatch {
            unweighted: vec![],
            unscored: vec!["comp".to_string()],
        }
    );
    assert!(err.to_string().contains("comp"));
}

#[test]
fn test_schema_mismatch_reports_both_sides() {
    let s = scores(&[("board", 4), ("extra", 3)]);
    let w = weights(&[("board", 0.5), ("comp", 0.5)]);
    match aggregate(&s, &w).unwrap_err() {
        ScoringError::SchemaMismatch {
            unweighted,
            unscored,
        } => {
            assert_eq!(unweighted, vec!["extra".to_string()]);
            assert_eq!(unscored, vec!["comp".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_weights_summing_below_one() {
    let s = scores(&[("board", 4), ("comp", 3)]);
    let w = weights(&[("board", 0.5), ("comp", 0.45)]);
    assert!(matches!(
        aggregate(&s, &w),
        Err(ScoringError::InvalidWeights { .. })
    ));
}

#[test]
fn test_weights_within_tolerance_are_accepted() {
    let s = scores(&[("board", 5), ("comp", 5)]);
    let w = weights(&[("board", 0.5), ("comp", 0.5000005)]);
    assert!(aggregate(&s, &w).is_ok());
}

#[test]
fn test_negative_weight_is_rejected() {
    let s = scores(&[("board", 5), ("comp", 5)]);
    let w = weights(&[("board", 1.5), ("comp", -0.5)]);
    assert!(matches!(
        aggregate(&s, &w),
        Err(ScoringError::InvalidInput { .. })
    ));
}

#[test]
fn test_sub_score_above_five_is_rejected() {
    let s = scores(&[("board", 6)]);
    let w = weights(&[("board", 1.0)]);
    assert!(matches!(
        aggregate(&s, &w),
        Err(ScoringError::InvalidInput { .. })
    ));
}

#[test]
fn test_contribution() {
    assert!((contribution(5, 0.10) - 10.0).abs() < 1e-9);
    assert!((contribution(3, 0.25) - 15.0).abs() < 1e-9);
}

#[test]
fn test_label_boundaries_take_the_higher_band() {
    assert_eq!(label_for_score(100.0), RatingLabel::Exemplary);
    assert_eq!(label_for_score(90.0), RatingLabel::Exemplary);
    assert_eq!(label_for_score(89.999), RatingLabel::Strong);
    assert_eq!(label_for_score(80.0), RatingLabel::Strong);
    assert_eq!(label_for_score(70.0), RatingLabel::Good);
    assert_eq!(label_for_score(60.0), RatingLabel::Satisfactory);
    assert_eq!(label_for_score(50.0), RatingLabel::NeedsImprovement);
    assert_eq!(label_for_score(49.999), RatingLabel::SignificantConcerns);
    assert_eq!(label_for_score(0.0), RatingLabel::SignificantConcerns);
}

#[test]
fn test_labels_cover_range_in_order() {
    let mut previous = RatingLabel::SignificantConcerns;
    for tenth in 0..=1000 {
        let score = f64::from(tenth) / 10.0;
        let label = label_for_score(score);
        assert!(label >= previous, "label dropped at {score}");
        assert!(score >= label.lower_bound());
        previous = label;
    }
    assert_eq!(previous, RatingLabel::Exemplary);
}

#[test]
fn test_every_label_has_its_lower_bound() {
    for label in RatingLabel::ALL {
        assert_eq!(label_for_score(label.lower_bound()), label);
    }
}

#[test]
fn test_label_display() {
    assert_eq!(RatingLabel::Strong.to_string(), "Strong Governance");
    assert_eq!(RatingLabel::NeedsImprovement.to_string(), "Needs Improvement");
}

#[test]
fn test_compute_score_pairs_value_and_label() {
    let s = scores(&[("board", 4), ("comp", 5)]);
    let w = weights(&[("board", 0.5), ("comp", 0.5)]);
    let result = compute_score(&s, &w).unwrap();
    assert!((result.value - 90.0).abs() < 1e-9);
    assert_eq!(result.label, label_for_score(result.value));
}
