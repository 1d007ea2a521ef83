//! String-encoded module definitions and the built-in preset catalogue.
//!
//! Module files store every numeric field as text, e.g.
//!
//! ```json
//! {
//!   "Marca": "Jinko", "Referencia": "JKM410M-72H-V",
//!   "Isc": "10.6", "Voc": "50.4", "Gop": "1000", "Top": "25",
//!   "Alpha_i": "0.048", "Acelda": "0.0126", "Ns": "144", "Np": "1",
//!   "n": "0.9273", "Rs": "0.004", "Rsh": "500", "Pmax": "410"
//! }
//! ```
//!
//! Conversion to [`ModuleParameters`] is lenient: a missing or
//! non-numeric field resolves to 0 and is left for the validator to
//! reject, instead of failing the load.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::types::{DiodeModel, ModuleParameters};
use crate::error::{PvError, Result};

/// A module definition as stored in module files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresetModule {
    #[serde(rename = "Marca", default)]
    pub manufacturer: String,
    #[serde(rename = "Referencia", default)]
    pub reference: String,
    #[serde(rename = "Isc", default)]
    pub isc: String,
    #[serde(rename = "Voc", default)]
    pub voc: String,
    #[serde(rename = "Vm", default, skip_serializing_if = "Option::is_none")]
    pub vm: Option<String>,
    #[serde(rename = "Im", default, skip_serializing_if = "Option::is_none")]
    pub im: Option<String>,
    #[serde(rename = "Gop", default)]
    pub gop: String,
    #[serde(rename = "Top", default)]
    pub top: String,
    #[serde(rename = "Alpha_i", default)]
    pub alpha_i: String,
    #[serde(rename = "Beta_v", default, skip_serializing_if = "Option::is_none")]
    pub beta_v: Option<String>,
    #[serde(rename = "Acelda", default)]
    pub cell_area: String,
    #[serde(rename = "Ns", default)]
    pub ns: String,
    #[serde(rename = "Np", default)]
    pub np: String,
    #[serde(rename = "n", default)]
    pub n: String,
    #[serde(rename = "Rs", default)]
    pub rs: String,
    #[serde(rename = "Rsh", default)]
    pub rsh: String,
    #[serde(rename = "Pmax", default)]
    pub pmax: String,
    #[serde(rename = "Modelo", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl PresetModule {
    /// Parse the text fields into simulation parameters.
    ///
    /// Without a `Modelo` entry the Lambert W model is selected. A present
    /// but unrecognised tag is an error.
    pub fn to_parameters(&self) -> Result<ModuleParameters> {
        let opt = |field: &Option<String>| field.as_deref().map(lenient_f64).unwrap_or(0.0);
        let model = match self.model.as_deref() {
            Some(tag) => tag.parse()?,
            None => DiodeModel::Lambert,
        };

        Ok(ModuleParameters {
            manufacturer: self.manufacturer.clone(),
            reference: self.reference.clone(),
            isc: lenient_f64(&self.isc),
            voc: lenient_f64(&self.voc),
            vm: opt(&self.vm),
            im: opt(&self.im),
            gop: lenient_f64(&self.gop),
            top: lenient_f64(&self.top),
            alpha_i: lenient_f64(&self.alpha_i),
            beta_v: opt(&self.beta_v),
            cell_area: lenient_f64(&self.cell_area),
            ns: lenient_count(&self.ns),
            np: lenient_count(&self.np),
            n: lenient_f64(&self.n),
            rs: lenient_f64(&self.rs),
            rsh: lenient_f64(&self.rsh),
            pmax: lenient_f64(&self.pmax),
            model,
        })
    }

    /// Encode simulation parameters as a module file record.
    pub fn from_parameters(params: &ModuleParameters) -> Self {
        Self {
            manufacturer: params.manufacturer.clone(),
            reference: params.reference.clone(),
            isc: params.isc.to_string(),
            voc: params.voc.to_string(),
            vm: Some(params.vm.to_string()),
            im: Some(params.im.to_string()),
            gop: params.gop.to_string(),
            top: params.top.to_string(),
            alpha_i: params.alpha_i.to_string(),
            beta_v: Some(params.beta_v.to_string()),
            cell_area: params.cell_area.to_string(),
            ns: params.ns.to_string(),
            np: params.np.to_string(),
            n: params.n.to_string(),
            rs: params.rs.to_string(),
            rsh: params.rsh.to_string(),
            pmax: params.pmax.to_string(),
            model: Some(params.model.tag().to_string()),
        }
    }
}

/// Parse a float, resolving anything unparseable or non-finite to 0.
pub fn lenient_f64(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse a cell count. Fractions are truncated; negative or unparseable
/// text resolves to 0.
pub fn lenient_count(text: &str) -> u32 {
    let text = text.trim();
    if let Ok(count) = text.parse::<u32>() {
        return count;
    }
    let value = lenient_f64(text).trunc();
    if value <= 0.0 {
        0
    } else {
        value.min(u32::MAX as f64) as u32
    }
}

/// Parse a JSON document holding one module object or an array of them.
pub fn parse_module_json(json: &str) -> Result<Vec<PresetModule>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let modules = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };
    Ok(modules)
}

/// Load module definitions from a JSON file.
pub fn load_module_file(path: &Path) -> Result<Vec<PresetModule>> {
    let content = std::fs::read_to_string(path).map_err(|e| PvError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_module_json(&content)
}

/// Serialize module definitions to pretty-printed JSON.
pub fn to_module_json(modules: &[PresetModule]) -> Result<String> {
    Ok(serde_json::to_string_pretty(modules)?)
}

#[allow(clippy::too_many_arguments)]
fn preset(
    manufacturer: &str,
    reference: &str,
    isc: &str,
    voc: &str,
    vm: &str,
    im: &str,
    alpha_i: &str,
    beta_v: &str,
    cell_area: &str,
    ns: &str,
    n: &str,
    rs: &str,
    rsh: &str,
    pmax: &str,
) -> PresetModule {
    PresetModule {
        manufacturer: manufacturer.to_string(),
        reference: reference.to_string(),
        isc: isc.to_string(),
        voc: voc.to_string(),
        vm: Some(vm.to_string()),
        im: Some(im.to_string()),
        gop: "1000".to_string(),
        top: "25".to_string(),
        alpha_i: alpha_i.to_string(),
        beta_v: Some(beta_v.to_string()),
        cell_area: cell_area.to_string(),
        ns: ns.to_string(),
        np: "1".to_string(),
        n: n.to_string(),
        rs: rs.to_string(),
        rsh: rsh.to_string(),
        pmax: pmax.to_string(),
        model: None,
    }
}

/// Built-in module catalogue, at STC.
pub fn presets() -> Vec<PresetModule> {
    vec![
        preset(
            "Jinko", "JKM410M-72H-V", "10.6", "50.4", "42.3", "9.69", "0.048", "-0.141",
            "0.0126", "144", "0.9273", "0.004", "500", "410",
        ),
        preset(
            "Jinko", "JKM470M-7RL3-V", "11.45", "53.95", "44.78", "10.5", "0.048", "-0.151",
            "0.0126", "144", "0.92", "0.0035", "550", "470",
        ),
        preset(
            "BIG SUN", "BigRef-IV-02", "5.75", "22.39", "18.0", "4.72", "0.05", "-0.08",
            "0.0243", "36", "1.2", "0.01", "200", "85",
        ),
        preset(
            "Trina", "TYN-85S5", "5.02", "22.1", "17.7", "4.8", "0.05", "-0.08", "0.0243",
            "36", "1.15", "0.015", "180", "85",
        ),
    ]
}

/// Look up a built-in preset by reference (case-insensitive).
pub fn find_preset(reference: &str) -> Result<ModuleParameters> {
    presets()
        .iter()
        .find(|p| p.reference.eq_ignore_ascii_case(reference.trim()))
        .ok_or_else(|| PvError::PresetNotFound {
            reference: reference.to_string(),
        })?
        .to_parameters()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_numbers() {
        assert_eq!(lenient_f64(" 10.6 "), 10.6);
        assert_eq!(lenient_f64("abc"), 0.0);
        assert_eq!(lenient_f64(""), 0.0);
        assert_eq!(lenient_f64("NaN"), 0.0);
        assert_eq!(lenient_count("144"), 144);
        assert_eq!(lenient_count("36.7"), 36);
        assert_eq!(lenient_count("-4"), 0);
        assert_eq!(lenient_count("many"), 0);
    }

    #[test]
    fn test_default_preset() {
        let params = find_preset("jkm410m-72h-v").unwrap();
        assert_eq!(params.manufacturer, "Jinko");
        assert_eq!(params.isc, 10.6);
        assert_eq!(params.ns, 144);
        assert_eq!(params.np, 1);
        assert_eq!(params.model, DiodeModel::Lambert);
    }

    #[test]
    fn test_unknown_preset() {
        assert!(matches!(
            find_preset("NOPE-1"),
            Err(PvError::PresetNotFound { .. })
        ));
    }

    #[test]
    fn test_parse_single_object_with_missing_fields() {
        let json = r#"{"Marca": "Acme", "Referencia": "A-1", "Isc": "8.1", "Voc": "x"}"#;
        let modules = parse_module_json(json).unwrap();
        assert_eq!(modules.len(), 1);
        let params = modules[0].to_parameters().unwrap();
        assert_eq!(params.isc, 8.1);
        assert_eq!(params.voc, 0.0);
        assert_eq!(params.ns, 0);
        assert_eq!(params.vm, 0.0);
    }

    #[test]
    fn test_parse_array_and_model_tag() {
        let json = r#"[{"Referencia": "A"}, {"Referencia": "B", "Modelo": "tdm"}]"#;
        let modules = parse_module_json(json).unwrap();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[1].to_parameters().unwrap().model, DiodeModel::Tdm);

        let bad = r#"{"Referencia": "C", "Modelo": "five-diode"}"#;
        let modules = parse_module_json(bad).unwrap();
        assert!(matches!(
            modules[0].to_parameters(),
            Err(PvError::UnknownModel { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_module_json("{not json"),
            Err(PvError::ModuleFormat { .. })
        ));
    }

    #[test]
    fn test_json_preserves_parameters() {
        let params = find_preset("TYN-85S5").unwrap().with_model(DiodeModel::Ddm);
        let json = to_module_json(&[PresetModule::from_parameters(&params)]).unwrap();
        let back = parse_module_json(&json).unwrap()[0].to_parameters().unwrap();
        assert_eq!(back, params);
    }
}
