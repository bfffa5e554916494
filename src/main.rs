use std::env;

use anyhow::Context;
use logistic::{
    config::{load_config, Config},
    dataset::{load_split, to_classes},
    evaluate::{confusion_matrix, evaluate},
    model::LogisticClassifier,
    plot::{plot_confusion_matrix, plot_history},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match env::args().nth(1) {
        Some(path) => load_config(&path).with_context(|| format!("loading config {path}"))?,
        None => Config::default(),
    };

    let train = load_split(&config.train_set)
        .with_context(|| format!("loading {}", config.train_set.display()))?;
    let test = load_split(&config.test_set)
        .with_context(|| format!("loading {}", config.test_set.display()))?;

    let threshold = config.training.threshold;
    let mut model = LogisticClassifier::new(config.training.clone());

    let report = model.train(train.features.view(), train.labels.view())?;
    println!("Training accuracy: {:.3} %", report.accuracy);

    let predicted = model.predict(test.features.view(), threshold)?;
    let truth = to_classes(test.labels.view())?;

    let matrix = confusion_matrix(truth.view(), predicted.view())?;
    info!(counts = ?matrix.counts, classes = ?config.classes, "confusion matrix");

    if let Some(dir) = &config.plot_dir {
        plot_history(model.history(), dir)?;
        plot_confusion_matrix(&matrix, &config.classes, dir.join("confusion_matrix.png"))?;
    }

    let metrics = evaluate(truth.view(), predicted.view())?;
    println!("Testing accuracy: {:.3} %", metrics.accuracy * 100.0);
    println!("Precision: {:.3} %", metrics.precision * 100.0);
    println!("Recall: {:.3} %", metrics.recall * 100.0);
    println!("F1_score: {:.3} %", metrics.f1 * 100.0);

    Ok(())
}
