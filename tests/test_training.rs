//! Integration test: startup training pipeline end-to-end

mod common;

use stunting_predictor::inference::DECISION_THRESHOLD;
use stunting_predictor::training::{ModelKind, TrainEngine, TrainingConfig};

#[test]
fn test_pipeline_trains_all_candidates() {
    let dataset = common::dataset();
    let pipeline = TrainEngine::new(TrainingConfig::default())
        .fit(&dataset)
        .unwrap();

    let kinds: Vec<ModelKind> = pipeline.scores.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, ModelKind::PRIORITY.to_vec());

    assert_eq!(pipeline.split.n_train + pipeline.split.n_test, 200);
    assert_eq!(pipeline.split.n_test, 40);
    for score in &pipeline.scores {
        assert!((0.0..=1.0).contains(&score.metrics.accuracy));
        assert_eq!(score.metrics.n_samples, 40);
    }

    // Both sides of the split carry both classes in comparable proportions
    let split = &pipeline.split;
    let positives: i64 = pipeline
        .encoded_frame
        .column("Stunting")
        .unwrap()
        .as_materialized_series()
        .i64()
        .unwrap()
        .into_iter()
        .flatten()
        .sum();
    let recombined =
        split.train_positive_rate * split.n_train as f64 + split.test_positive_rate * split.n_test as f64;
    assert!((recombined - positives as f64).abs() < 1e-9);
    assert!(split.test_positive_rate > 0.0 && split.test_positive_rate < 1.0);
    assert!(
        (split.train_positive_rate - split.test_positive_rate).abs() < 0.25,
        "train = {}, test = {}",
        split.train_positive_rate,
        split.test_positive_rate
    );
}

#[test]
fn test_selected_model_is_at_least_as_accurate_as_the_rest() {
    let pipeline = TrainEngine::default().fit(&common::dataset()).unwrap();

    let selected = pipeline.score(pipeline.selected()).unwrap();
    for score in &pipeline.scores {
        assert!(selected.metrics.accuracy >= score.metrics.accuracy);
        if score.metrics.accuracy == selected.metrics.accuracy {
            assert!(pipeline.selected().priority() <= score.kind.priority());
        }
    }
    // Stunted rows are well separated in the fixture
    assert!(selected.metrics.accuracy >= 0.75, "accuracy = {}", selected.metrics.accuracy);
}

#[test]
fn test_same_data_and_seed_reproduce_the_fit() {
    let dataset = common::dataset();
    let engine = TrainEngine::new(TrainingConfig::default());
    let first = engine.fit(&dataset).unwrap();
    let second = engine.fit(&dataset).unwrap();

    assert_eq!(first.split.test_indices, second.split.test_indices);
    assert_eq!(first.scaler, second.scaler);
    assert_eq!(first.selected(), second.selected());
    for (a, b) in first.scores.iter().zip(second.scores.iter()) {
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.metrics.accuracy, b.metrics.accuracy);
    }

    let input = common::reference_input();
    assert_eq!(
        first.predictor.predict(&input).unwrap().probability_stunting,
        second.predictor.predict(&input).unwrap().probability_stunting
    );
}

#[test]
fn test_different_seed_changes_the_split() {
    let dataset = common::dataset();
    let a = TrainEngine::new(TrainingConfig::default().with_random_seed(1))
        .fit(&dataset)
        .unwrap();
    let b = TrainEngine::new(TrainingConfig::default().with_random_seed(2))
        .fit(&dataset)
        .unwrap();
    assert_ne!(a.split.test_indices, b.split.test_indices);
}

#[test]
fn test_reference_child_prediction() {
    let pipeline = TrainEngine::default().fit(&common::dataset()).unwrap();
    let prediction = pipeline
        .predictor
        .predict(&common::reference_input())
        .unwrap();

    assert!((0.0..=1.0).contains(&prediction.probability_stunting));
    assert!(
        (prediction.probability_stunting + prediction.probability_not_stunting - 1.0).abs() < 1e-12
    );
    assert_eq!(
        prediction.is_stunting,
        prediction.probability_stunting > DECISION_THRESHOLD
    );
    assert_eq!(prediction.model, pipeline.selected());
}

#[test]
fn test_encoded_frame_uses_integer_codes() {
    let pipeline = TrainEngine::default().fit(&common::dataset()).unwrap();
    let frame = &pipeline.encoded_frame;

    for name in ["Sex", "ASI Eksklusif", "Stunting"] {
        let series = frame.column(name).unwrap().as_materialized_series();
        let codes = series.i64().unwrap();
        assert!(codes.into_iter().flatten().all(|c| c == 0 || c == 1));
    }
}
