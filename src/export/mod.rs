//! Tabular export of simulation results.
//!
//! The CSV layout carries a commented summary block followed by the full
//! curve at 6 decimals:
//!
//! ```text
//! # Module: Jinko - JKM410M-72H-V
//! # Model: Single-Diode Model (SDM)
//! # Vmpp: 41.5422 V | Impp: 9.7061 A
//! # Pmax: 403.2129 W | FF: 0.7547
//!
//! Voltage (V),Current (A),Power (W)
//! 0.000000,10.600000,0.000000
//! ...
//! ```

use std::io::Write;

use crate::error::Result;
use crate::module::ModuleParameters;
use crate::solver::{CurveSample, SimulationResult};

/// CSV column header.
pub const CSV_HEADER: &str = "Voltage (V),Current (A),Power (W)";

/// Write the curve and its summary as CSV.
pub fn write_csv<W: Write>(
    writer: &mut W,
    result: &SimulationResult,
    params: &ModuleParameters,
) -> Result<()> {
    writeln!(writer, "# Module: {} - {}", params.manufacturer, params.reference)?;
    writeln!(writer, "# Model: {}", result.model_name)?;
    writeln!(
        writer,
        "# Vmpp: {:.4} V | Impp: {:.4} A",
        result.vmpp, result.impp
    )?;
    writeln!(
        writer,
        "# Pmax: {:.4} W | FF: {:.4}",
        result.pmax_calc, result.fill_factor
    )?;
    writeln!(writer)?;
    writeln!(writer, "{}", CSV_HEADER)?;

    for sample in result.samples() {
        writeln!(
            writer,
            "{:.6},{:.6},{:.6}",
            sample.voltage, sample.current, sample.power
        )?;
    }

    writer.flush()?;
    Ok(())
}

/// Render the CSV export into a string.
pub fn to_csv_string(result: &SimulationResult, params: &ModuleParameters) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, result, params)?;
    // Only formatted numbers and caller-provided UTF-8 text are written
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Curve samples rounded to 4 decimals, as plotted on charts.
pub fn chart_points(result: &SimulationResult) -> Vec<CurveSample> {
    result
        .samples()
        .map(|s| CurveSample {
            voltage: round_to(s.voltage, 4),
            current: round_to(s.current, 4),
            power: round_to(s.power, 4),
        })
        .collect()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Print a human-readable summary of the figures of merit.
pub fn write_summary<W: Write>(
    writer: &mut W,
    result: &SimulationResult,
    params: &ModuleParameters,
) -> Result<()> {
    writeln!(writer, "Module:        {} {}", params.manufacturer, params.reference)?;
    writeln!(writer, "Model:         {}", result.model_name)?;
    writeln!(writer, "Vmpp:          {:.2} V", result.vmpp)?;
    writeln!(writer, "Impp:          {:.2} A", result.impp)?;
    writeln!(writer, "Pmax:          {:.1} W", result.pmax_calc)?;
    writeln!(writer, "Fill factor:   {:.3}", result.fill_factor)?;
    writeln!(writer, "Efficiency:    {:.2} %", result.efficiency)?;
    match result.error_percent {
        Some(error) => writeln!(writer, "Error vs Pmax: {:.2} %", error)?,
        None => writeln!(writer, "Error vs Pmax: n/a")?,
    }
    writeln!(writer, "Iph:           {:.4} A", result.iph)?;
    writeln!(writer, "I0:            {:.4e} A", result.i0)?;
    writeln!(writer, "Jsc:           {:.2} mA/cm2", result.jsc)?;
    writeln!(writer, "Total area:    {:.4} m2", result.total_area)?;
    Ok(())
}
