//! Regression guards against the published dataset
//!
//! These need `data/dataset.csv` from the paper's data release; run with
//! `cargo test -- --ignored` once it is in place.

use anyhow::Result;
use eseg_model::{
    get_eseg_model, get_training_data, load_dataset, reproduce_parity_plot, Predictor,
    FEATURE_COLUMNS,
};

#[test]
#[ignore = "requires the published dataset in data/dataset.csv"]
fn test_load_twice_is_identical() -> Result<()> {
    let first = load_dataset()?;
    let second = load_dataset()?;
    assert_eq!(first, second);
    for column in FEATURE_COLUMNS {
        assert!(first.column(column).is_some(), "missing {column}");
    }
    Ok(())
}

#[test]
#[ignore = "requires the published dataset in data/dataset.csv"]
fn test_training_data_shape() -> Result<()> {
    let table = load_dataset()?;
    let (x, y) = get_training_data(None)?;
    assert_eq!(x.len(), table.len());
    assert_eq!(y.len(), table.len());
    Ok(())
}

#[test]
#[ignore = "requires the published dataset in data/dataset.csv"]
fn test_loocv_mae_matches_paper() -> Result<()> {
    let (figure, loocv) = reproduce_parity_plot()?;
    assert_eq!(loocv.folds(), figure.point_count());
    assert!(
        (loocv.mean_absolute_error - 0.220).abs() <= 0.005,
        "LOOCV-MAE = {:.4} eV",
        loocv.mean_absolute_error
    );
    Ok(())
}

#[test]
#[ignore = "requires the published dataset in data/dataset.csv"]
fn test_pd_in_rh_110() -> Result<()> {
    let model = get_eseg_model()?;
    let predicted = model.predict_one(&[-0.28, 0.0244, 0.575, 1.69, 8.33686])?;
    assert!(
        (predicted - -0.239).abs() < 0.05,
        "predicted Eseg = {predicted:.3} eV"
    );
    Ok(())
}
