//! Integration tests for the Eseg pipeline on a synthetic dataset
//!
//! Loads a CSV written to disk, fits, cross-validates and renders the
//! parity plot end to end.

use anyhow::Result;
use eseg_model::{
    get_training_data, leave_one_out, run_parity, DatasetLoader, EsegError, EsegPipeline,
    Estimator, Predictor, TrainingData,
};
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "Host,Dopant,diff_CEb/cn,gordy_eneg_host,diff_EA,r_dopant,IP_dopant,Eseg";

/// Synthetic descriptors with a smooth quadratic response; not the
/// published measurements.
fn create_synthetic_dataset() -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "{HEADER}")?;

    let hosts = [("Rh", 0.0244), ("Cu", 0.0190), ("Ag", 0.0180)];
    for i in 0..24 {
        let t = i as f64;
        let (host, eneg) = hosts[i % hosts.len()];
        let ce = -0.6 + 0.05 * t;
        let ea = 0.8 * (0.4 * t).sin();
        let r = 1.3 + 0.02 * t;
        let ip = 7.0 + 0.5 * (0.3 * t).cos();
        let eseg = 0.9 * ce - 0.2 * ea + 0.15 * ce * ea + 3.0 * (eneg - 0.02) - 0.1 * (ip - 7.0);
        writeln!(
            file,
            "{host},D{i},{ce:.6},{eneg},{ea:.6},{r:.4},{ip:.6},{eseg:.6}"
        )?;
    }

    file.flush()?;
    Ok(file)
}

#[test]
fn test_end_to_end_parity_run() -> Result<()> {
    let file = create_synthetic_dataset()?;
    let table = DatasetLoader::new(file.path()).load()?;

    let run = run_parity(&table)?;

    assert_eq!(run.predictions.len(), 24);
    assert_eq!(run.loocv.folds(), 24);
    assert!(run.loocv.mean_absolute_error.is_finite());
    assert!(run.loocv.mean_absolute_error < 0.1);

    let hosts: Vec<&str> = run.figure.groups.iter().map(|g| g.host.as_str()).collect();
    assert_eq!(hosts, vec!["Ag", "Cu", "Rh"]);
    assert_eq!(run.figure.point_count(), 24);
    assert_eq!(
        run.figure.legend_title[1],
        format!("LOOCV-MAE= {:.3} eV", run.loocv.mean_absolute_error)
    );

    let dir = tempfile::tempdir()?;
    let svg_path = dir.path().join("parity.svg");
    run.figure.save_svg(&svg_path)?;
    let svg = std::fs::read_to_string(&svg_path)?;
    assert!(svg.contains("Rh Host"));
    assert!(svg.contains("2nd order poly KRR"));

    Ok(())
}

#[test]
fn test_shape_matches_row_count() -> Result<()> {
    let file = create_synthetic_dataset()?;
    let table = DatasetLoader::new(file.path()).load()?;

    let (x, y) = get_training_data(Some(&table))?;
    assert_eq!(x.len(), table.len());
    assert_eq!(y.len(), table.len());
    assert!(x.iter().all(|row| row.len() == 5));

    Ok(())
}

#[test]
fn test_loocv_mean_matches_errors() -> Result<()> {
    let file = create_synthetic_dataset()?;
    let table = DatasetLoader::new(file.path()).load()?;
    let data = TrainingData::from_table(&table)?;

    let report = leave_one_out(&EsegPipeline::new(), &data)?;
    let mean = report.absolute_errors.iter().sum::<f64>() / report.folds() as f64;
    assert!((report.mean_absolute_error - mean).abs() < 1e-15);

    // First fold refit by hand
    let model = EsegPipeline::new().fit(&data.without_row(0))?;
    let y_hat = model.predict_one(&data.features[0])?;
    assert_eq!(report.held_out_predictions[0], y_hat);
    assert_eq!(report.absolute_errors[0], (data.targets[0] - y_hat).abs());

    Ok(())
}

#[test]
fn test_full_fit_is_independent_of_loocv() -> Result<()> {
    let file = create_synthetic_dataset()?;
    let table = DatasetLoader::new(file.path()).load()?;
    let data = TrainingData::from_table(&table)?;

    let model = EsegPipeline::new().fit(&data)?;
    let before = model.predict(&data.features)?;
    leave_one_out(&EsegPipeline::new(), &data)?;
    let after = model.predict(&data.features)?;

    assert_eq!(before, after);
    Ok(())
}

#[test]
fn test_prediction_rejects_wrong_width() -> Result<()> {
    let file = create_synthetic_dataset()?;
    let table = DatasetLoader::new(file.path()).load()?;
    let model = EsegPipeline::new().fit(&TrainingData::from_table(&table)?)?;

    let rows = vec![
        vec![-0.28, 0.0244, 0.575, 1.69, 8.33686],
        vec![-0.28, 0.0244, 0.575, 1.69],
    ];
    assert!(matches!(
        model.predict(&rows),
        Err(EsegError::Shape { row: 1, expected: 5, got: 4 })
    ));
    assert!(matches!(
        model.predict_one(&[0.0; 6]),
        Err(EsegError::Shape { got: 6, .. })
    ));

    Ok(())
}
