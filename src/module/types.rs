//! Core types for module description.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PvError, Result};
use crate::physics::T_STC_C;

/// Equivalent-circuit model used to solve the I-V curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiodeModel {
    /// Single-diode model, Newton-Raphson
    Sdm,
    /// Double-diode model (A1 = 1, A2 = 2), Newton-Raphson
    Ddm,
    /// Triple-diode model (A1 = 1, A2 = 1.2, A3 = 2.5), Newton-Raphson
    Tdm,
    /// Explicit single-diode solution through the Lambert W function
    Lambert,
}

impl DiodeModel {
    /// All models, in order of the selection menu.
    pub const ALL: [DiodeModel; 4] = [
        DiodeModel::Sdm,
        DiodeModel::Ddm,
        DiodeModel::Tdm,
        DiodeModel::Lambert,
    ];

    /// Short tag used in module files and on the command line.
    pub fn tag(&self) -> &'static str {
        match self {
            DiodeModel::Sdm => "sdm",
            DiodeModel::Ddm => "ddm",
            DiodeModel::Tdm => "tdm",
            DiodeModel::Lambert => "lambert",
        }
    }

    /// Human-readable model name for reports and chart legends.
    pub fn display_name(&self) -> &'static str {
        match self {
            DiodeModel::Sdm => "Single-Diode Model (SDM)",
            DiodeModel::Ddm => "Double-Diode Model (DDM)",
            DiodeModel::Tdm => "Triple-Diode Model (TDM)",
            DiodeModel::Lambert => "Lambert W - Barry analytical expansion",
        }
    }
}

impl FromStr for DiodeModel {
    type Err = PvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sdm" => Ok(DiodeModel::Sdm),
            "ddm" => Ok(DiodeModel::Ddm),
            "tdm" => Ok(DiodeModel::Tdm),
            "lambert" => Ok(DiodeModel::Lambert),
            _ => Err(PvError::unknown_model(s)),
        }
    }
}

impl fmt::Display for DiodeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Datasheet ratings, operating conditions and circuit parameters of a
/// photovoltaic module.
///
/// A value is built once per simulation run. Editing a field produces a
/// new instance through the `with_*` methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleParameters {
    /// Manufacturer name (free text)
    pub manufacturer: String,
    /// Module reference, must be non-empty
    pub reference: String,
    /// Short-circuit current at STC (A)
    pub isc: f64,
    /// Open-circuit voltage at STC (V)
    pub voc: f64,
    /// Rated MPP voltage (V), 0 when unknown
    pub vm: f64,
    /// Rated MPP current (A), 0 when unknown
    pub im: f64,
    /// Operating irradiance (W/m²)
    pub gop: f64,
    /// Operating cell temperature (°C)
    pub top: f64,
    /// Isc temperature coefficient (%/°C)
    pub alpha_i: f64,
    /// Voc temperature coefficient (V/°C)
    pub beta_v: f64,
    /// Area of a single cell (m²)
    pub cell_area: f64,
    /// Cells in series
    pub ns: u32,
    /// Cells in parallel
    pub np: u32,
    /// Diode ideality factor
    pub n: f64,
    /// Series resistance (Ω)
    pub rs: f64,
    /// Shunt resistance (Ω)
    pub rsh: f64,
    /// Manufacturer-rated maximum power (W), 0 means derive from `vm·im`
    pub pmax: f64,
    /// Equivalent-circuit model to solve
    pub model: DiodeModel,
}

impl ModuleParameters {
    /// Reference power for the datasheet deviation: `pmax` when rated,
    /// otherwise `vm·im`.
    pub fn reference_power(&self) -> f64 {
        if self.pmax > 0.0 {
            self.pmax
        } else {
            self.vm * self.im
        }
    }

    /// Open-circuit voltage corrected to the operating temperature (V).
    pub fn operating_voc(&self) -> f64 {
        self.voc + self.beta_v * (self.top - T_STC_C)
    }

    /// Total active area `cell_area·Ns·Np` (m²).
    pub fn total_area(&self) -> f64 {
        self.cell_area * self.ns as f64 * self.np as f64
    }

    /// Return a copy using another diode model.
    pub fn with_model(mut self, model: DiodeModel) -> Self {
        self.model = model;
        self
    }

    /// Return a copy at other operating conditions.
    pub fn with_operating_conditions(mut self, gop: f64, top: f64) -> Self {
        self.gop = gop;
        self.top = top;
        self
    }

    /// Return a copy with other parasitic resistances.
    pub fn with_resistances(mut self, rs: f64, rsh: f64) -> Self {
        self.rs = rs;
        self.rsh = rsh;
        self
    }

    /// Return a copy with one field replaced, addressed by name.
    ///
    /// Numeric text that fails to parse resolves to 0, matching the
    /// module-file loader; the validator rejects the result where 0 is
    /// not acceptable. Unknown keys and unknown model tags are errors.
    pub fn with_field(mut self, key: &str, value: &str) -> Result<Self> {
        let num = || super::preset::lenient_f64(value);
        match key.trim().to_lowercase().as_str() {
            "manufacturer" | "marca" => self.manufacturer = value.to_string(),
            "reference" | "referencia" => self.reference = value.to_string(),
            "isc" => self.isc = num(),
            "voc" => self.voc = num(),
            "vm" => self.vm = num(),
            "im" => self.im = num(),
            "gop" => self.gop = num(),
            "top" => self.top = num(),
            "alpha_i" | "alphai" => self.alpha_i = num(),
            "beta_v" | "betav" => self.beta_v = num(),
            "cell_area" | "acelda" => self.cell_area = num(),
            "ns" => self.ns = super::preset::lenient_count(value),
            "np" => self.np = super::preset::lenient_count(value),
            "n" => self.n = num(),
            "rs" => self.rs = num(),
            "rsh" => self.rsh = num(),
            "pmax" => self.pmax = num(),
            "model" | "modelo" => self.model = value.parse()?,
            other => {
                return Err(PvError::invalid_parameter(other, "unknown module field"));
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_tags_round_trip() {
        for model in DiodeModel::ALL {
            assert_eq!(model.tag().parse::<DiodeModel>().unwrap(), model);
        }
        assert_eq!(" TDM ".parse::<DiodeModel>().unwrap(), DiodeModel::Tdm);
    }

    #[test]
    fn test_unknown_model_fails_fast() {
        let err = "quad".parse::<DiodeModel>().unwrap_err();
        assert!(matches!(err, PvError::UnknownModel { .. }));
        assert!("".parse::<DiodeModel>().is_err());
    }

    #[test]
    fn test_with_field() {
        let params = crate::module::find_preset("JKM410M-72H-V").unwrap();
        let edited = params
            .clone()
            .with_field("top", "45")
            .unwrap()
            .with_field("model", "ddm")
            .unwrap()
            .with_field("ns", "abc")
            .unwrap();
        assert_eq!(edited.top, 45.0);
        assert_eq!(edited.model, DiodeModel::Ddm);
        assert_eq!(edited.ns, 0);
        // the original value is untouched
        assert_eq!(params.top, 25.0);

        assert!(params.clone().with_field("color", "blue").is_err());
        assert!(params.with_field("model", "xyz").is_err());
    }

    #[test]
    fn test_reference_power_falls_back_to_rated_mpp() {
        let mut params = crate::module::find_preset("JKM410M-72H-V").unwrap();
        assert_eq!(params.reference_power(), 410.0);
        params.pmax = 0.0;
        params.vm = 40.0;
        params.im = 10.0;
        assert_eq!(params.reference_power(), 400.0);
    }
}
