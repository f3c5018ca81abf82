//! Predict Eseg for a single dopant/host/facet with the fitted model
//!
//! The model predicts a whole batch at once when given several rows.

use eseg_model::{get_eseg_model, Predictor};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let model = get_eseg_model()?;

    // Pd doped into Rh FCC (110) surface

    // (CE_host - CE_dopant) / CN_dopant
    let diff_ce_cn = -0.28;
    // Gordy electronegativity of the host
    let gordy_eneg_host = 0.0244;
    // EA_host - EA_dopant
    let diff_ea = 0.575;
    // atomic radius of the dopant
    let r_dopant = 1.69;
    // ionization potential of the dopant
    let ip_dopant = 8.33686;

    // DFT Eseg (eV)
    let eseg: f64 = -0.239;

    let x = [[diff_ce_cn, gordy_eneg_host, diff_ea, r_dopant, ip_dopant]];
    let predicted_eseg = model.predict(&x)?[0];

    let rule = "-".repeat(55);
    println!("{rule}");
    println!("{:^55}", "Example case: Pd doped into Rh FCC (110) surface");
    println!("{rule}");
    println!("   Actual Eseg: {eseg} eV");
    println!("Predicted Eseg: {predicted_eseg:.3} eV");
    println!("Absolute Error: {:+.3} eV", (eseg - predicted_eseg).abs());
    println!("{rule}");

    Ok(())
}
