// Training behaviour of the single-unit classifier on small separable problems.

use approx::assert_relative_eq;
use logistic::activation::sigmoid;
use logistic::config::{BiasMode, TrainingConfig};
use logistic::model::{LogisticClassifier, ModelState};
use logistic::Error;
use ndarray::{array, Array1, Array2};

fn separable() -> (Array2<f64>, Array1<f64>) {
    let features = array![[-1.0, -0.8, 0.8, 1.0], [-0.5, -1.0, 1.0, 0.5]];
    let labels = array![0.0, 0.0, 1.0, 1.0];
    (features, labels)
}

// Pixel-like features in [0, 1]; class 1 is the bright corner.
fn unit_range() -> (Array2<f64>, Array1<f64>) {
    let features = array![[0.1, 0.2, 0.8, 0.9], [0.2, 0.1, 0.9, 0.8]];
    let labels = array![0.0, 0.0, 1.0, 1.0];
    (features, labels)
}

fn config(epochs: usize, learning_rate: f64, seed: u64) -> TrainingConfig {
    TrainingConfig {
        epochs,
        learning_rate,
        seed: Some(seed),
        ..TrainingConfig::default()
    }
}

#[test]
fn four_sample_problem_exceeds_ninety_percent_proxy_accuracy() {
    let (features, labels) = separable();
    let mut model = LogisticClassifier::new(config(1000, 0.1, 42));

    let report = model.train(features.view(), labels.view()).unwrap();

    assert_eq!(report.epochs, 1000);
    assert!(report.accuracy > 90.0, "accuracy {}", report.accuracy);
    assert_eq!(model.state(), ModelState::Trained);
}

#[test]
fn unit_range_problem_exceeds_ninety_percent_with_direct_bias() {
    let (features, labels) = unit_range();

    for seed in 0..5 {
        let mut model = LogisticClassifier::new(TrainingConfig {
            bias_mode: BiasMode::Direct,
            ..config(1000, 0.1, seed)
        });

        let report = model.train(features.view(), labels.view()).unwrap();

        assert!(report.accuracy > 90.0, "seed {seed}: accuracy {}", report.accuracy);
    }
}

#[test]
fn scaled_bias_falls_short_on_unit_range_features() {
    // The two-term bias moves the intercept at a tenth of the rate, so after
    // 1000 epochs the proxy plateaus near 80 on uncentred data.
    let (features, labels) = unit_range();

    for seed in 0..5 {
        let mut model = LogisticClassifier::new(config(1000, 0.1, seed));

        let report = model.train(features.view(), labels.view()).unwrap();

        assert!(
            report.accuracy > 75.0 && report.accuracy < 85.0,
            "seed {seed}: accuracy {}",
            report.accuracy
        );
    }
}

#[test]
fn cost_never_increases_between_epochs() {
    for (features, labels) in [separable(), unit_range()] {
        for bias_mode in [BiasMode::Scaled, BiasMode::Direct] {
            for seed in 0..5 {
                let mut model = LogisticClassifier::new(TrainingConfig {
                    bias_mode,
                    ..config(1, 0.1, seed)
                });
                model.initialize(2, 4).unwrap();

                let mut previous = f64::INFINITY;
                for _ in 0..300 {
                    let (_, cost) = model.forward(features.view(), labels.view()).unwrap();
                    assert!(cost >= 0.0);
                    assert!(cost <= previous + 1e-12, "cost rose from {previous} to {cost}");
                    previous = cost;
                    model.backward(features.view(), labels.view()).unwrap();
                }
            }
        }
    }
}

#[test]
fn single_step_does_not_increase_cost() {
    let features = array![[0.1, 0.4, 0.35, 0.8], [0.9, 0.2, 0.6, 0.3], [0.5, 0.5, 0.1, 0.7]];
    let labels = array![1.0, 0.0, 1.0, 0.0];
    let mut model = LogisticClassifier::new(config(1, 0.01, 9));
    model.initialize(3, 4).unwrap();

    let (_, before) = model.forward(features.view(), labels.view()).unwrap();
    model.backward(features.view(), labels.view()).unwrap();
    let (_, after) = model.forward(features.view(), labels.view()).unwrap();

    assert!(after <= before, "{after} > {before}");
}

#[test]
fn history_samples_cost_and_mean_activation() {
    let (features, labels) = separable();
    let mut model = LogisticClassifier::new(config(301, 0.1, 5));

    model.train(features.view(), labels.view()).unwrap();

    let entries = model.history().entries();
    assert_eq!(
        entries.iter().map(|entry| entry.epoch).collect::<Vec<_>>(),
        vec![0, 100, 200, 300]
    );
    for entry in entries {
        assert!(entry.cost.is_finite());
        assert!(entry.mean_activation > 0.0 && entry.mean_activation < 1.0);
    }
    assert!(entries[3].cost < entries[0].cost);
}

#[test]
fn predict_threshold_boundaries() {
    let (features, labels) = separable();
    let mut model = LogisticClassifier::new(config(200, 0.1, 1));
    model.train(features.view(), labels.view()).unwrap();

    let probabilities = model.probabilities(features.view()).unwrap();
    let at_zero = model.predict(features.view(), 0.0).unwrap();
    for (label, probability) in at_zero.iter().zip(probabilities.iter()) {
        assert_eq!(*label, u8::from(*probability > 0.0));
    }

    let at_one = model.predict(features.view(), 1.0).unwrap();
    assert!(at_one.iter().all(|&label| label == 0));
}

#[test]
fn trained_model_separates_classes_at_half() {
    let (features, labels) = separable();
    let mut model = LogisticClassifier::new(config(1000, 0.1, 3));
    model.train(features.view(), labels.view()).unwrap();

    let predicted = model.predict(features.view(), 0.5).unwrap();

    assert_eq!(predicted, array![0u8, 0, 1, 1]);
}

#[test]
fn probabilities_use_effective_bias() {
    let (features, labels) = separable();
    let mut model = LogisticClassifier::new(config(50, 0.1, 8));
    model.train(features.view(), labels.view()).unwrap();
    let parameters = model.parameters().unwrap().clone();

    let expected = sigmoid(&(parameters.weights.dot(&features) + parameters.effective_bias()));
    let actual = model.probabilities(features.view()).unwrap();

    for (a, e) in actual.iter().zip(expected.iter()) {
        assert_relative_eq!(*a, *e, epsilon = 1e-12);
    }
    assert_relative_eq!(
        parameters.effective_bias(),
        0.1 * parameters.bias_scale,
        epsilon = 1e-15
    );
}

#[test]
fn direct_bias_mode_also_learns() {
    let (features, labels) = separable();
    let mut model = LogisticClassifier::new(TrainingConfig {
        bias_mode: BiasMode::Direct,
        ..config(1000, 0.1, 42)
    });

    let report = model.train(features.view(), labels.view()).unwrap();

    assert!(report.accuracy > 90.0);
}

#[test]
fn predicting_with_wrong_feature_count_fails() {
    let (features, labels) = separable();
    let mut model = LogisticClassifier::new(config(10, 0.1, 2));
    model.train(features.view(), labels.view()).unwrap();

    let wide = Array2::<f64>::zeros((3, 4));

    assert!(matches!(
        model.predict(wide.view(), 0.5),
        Err(Error::ShapeMismatch { .. })
    ));
}

#[test]
fn training_with_mismatched_labels_fails() {
    let (features, _) = separable();
    let labels = array![0.0, 1.0];
    let mut model = LogisticClassifier::new(config(10, 0.1, 2));

    assert!(matches!(
        model.train(features.view(), labels.view()),
        Err(Error::ShapeMismatch { .. })
    ));
    assert_eq!(model.state(), ModelState::Uninitialized);
}
