//! PvSim - Photovoltaic Module Simulator
//!
//! Simulates the I-V and P-V curves of a photovoltaic module and writes
//! them as CSV.
//!
//! # Usage
//!
//! ```bash
//! pvsim --preset JKM410M-72H-V --model tdm --set top=45 > curve.csv
//! pvsim --module modules.json --reference TYN-85S5 --summary-only
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pvsim_core::{
    error::{PvError, Result},
    export::{write_csv, write_summary},
    module::{find_preset, load_module_file, presets, ModuleParameters},
    DiodeModel, Simulator,
};

/// Photovoltaic module I-V curve simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Built-in preset to simulate (see --list-presets)
    #[arg(short, long, value_name = "REFERENCE", conflicts_with = "module")]
    preset: Option<String>,

    /// JSON module file (one module or an array)
    #[arg(short, long, value_name = "FILE")]
    module: Option<PathBuf>,

    /// Module reference to pick from a multi-module file
    #[arg(short, long, requires = "module")]
    reference: Option<String>,

    /// Diode model: sdm, ddm, tdm or lambert
    #[arg(long, value_name = "MODEL")]
    model: Option<String>,

    /// Override a module field, e.g. --set top=45 --set gop=800
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// List the built-in presets and exit
    #[arg(long)]
    list_presets: bool,

    /// Print only the summary, no CSV
    #[arg(long)]
    summary_only: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    if args.list_presets {
        for preset in presets() {
            println!("{:<16} {}", preset.reference, preset.manufacturer);
        }
        return Ok(());
    }

    let mut params = load_parameters(args)?;

    if let Some(model) = &args.model {
        params = params.with_model(model.parse::<DiodeModel>()?);
    }

    for entry in &args.overrides {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| PvError::invalid_parameter(entry.as_str(), "expected KEY=VALUE"))?;
        params = params.with_field(key, value)?;
    }

    let result = Simulator::new().run(&params)?;

    write_summary(&mut io::stderr(), &result, &params)?;
    if !args.summary_only {
        write_csv(&mut io::stdout().lock(), &result, &params)?;
    }

    Ok(())
}

fn load_parameters(args: &Args) -> Result<ModuleParameters> {
    let Some(path) = &args.module else {
        let reference = args.preset.as_deref().unwrap_or("JKM410M-72H-V");
        return find_preset(reference);
    };

    let modules = load_module_file(path)?;
    let selected = match &args.reference {
        Some(reference) => modules
            .iter()
            .find(|m| m.reference.eq_ignore_ascii_case(reference))
            .ok_or_else(|| PvError::PresetNotFound {
                reference: reference.clone(),
            })?,
        None => modules.first().ok_or_else(|| PvError::ModuleFormat {
            message: format!("'{}' holds no module definitions", path.display()),
        })?,
    };
    selected.to_parameters()
}
