//! Command-line driver: parses a grammar file, derives and interprets it, and writes the
//! result through one of the two concrete [`lsystem_core::Generator`] back-ends.

mod generators;
mod grammar;

use std::{
    fs::{self, File},
    io::BufWriter,
    path::PathBuf,
    process::ExitCode,
    time::{SystemTime, UNIX_EPOCH},
};

use clap::{Parser, ValueEnum};
use lsystem_core::{ActionTable, Engine, EngineDefaults, Generator, Interner, Model, ModuleList, Rng, StderrSink};
use thiserror::Error;

use crate::generators::{generic::GenericGenerator, radiance::RadianceGenerator};

/// A parametric L-system rewriting and turtle-graphics interpreter.
#[derive(Parser, Debug)]
#[command(name = "lsystem", version, about, disable_help_flag = true)]
struct Args {
    /// Print help.
    #[arg(short = 'H', long = "help", short_alias = '?', action = clap::ArgAction::Help)]
    help: Option<bool>,

    /// Input L-system grammar file.
    input: PathBuf,

    /// Generations to produce. Defaults to the grammar's `maxgen` global, else 0.
    #[arg(short = 'm', long = "maxgen")]
    maxgen: Option<u32>,

    /// Default turn angle, in degrees.
    #[arg(short = 'd', long = "delta")]
    delta: Option<f64>,

    /// Default line length.
    #[arg(long = "distance")]
    distance: Option<f64>,

    /// Default line width.
    #[arg(short = 'w', long = "width")]
    width: Option<f64>,

    /// PRNG seed. Defaults to the current time.
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Output file.
    #[arg(short = 'o')]
    output: PathBuf,

    /// Bounds output file.
    #[arg(short = 'b', default_value = "bounds.txt")]
    bounds: PathBuf,

    /// Generator back-end.
    #[arg(long = "format", value_enum, default_value_t = Format::Generic)]
    format: Format,

    /// Dump each generation's module list to stdout.
    #[arg(long)]
    display: bool,

    /// Print module counts per generation to stderr.
    #[arg(long)]
    stats: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Generic,
    Radiance,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("could not read input file {path}: {source}")]
    ReadInput { path: PathBuf, source: std::io::Error },
    #[error("could not parse grammar: {0}")]
    Parse(#[from] grammar::ParseError),
    #[error("could not open output file {path}: {source}")]
    OpenOutput { path: PathBuf, source: std::io::Error },
    #[error("could not open bounds file {path}: {source}")]
    OpenBounds { path: PathBuf, source: std::io::Error },
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("lsystem: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let source = fs::read_to_string(&args.input).map_err(|source| CliError::ReadInput {
        path: args.input.clone(),
        source,
    })?;

    let mut interner = Interner::new();
    let model = grammar::parse_model(&source, &mut interner)?;
    let actions = ActionTable::with_defaults(&mut interner);

    let seed = args.seed.unwrap_or_else(default_seed);
    let mut engine = Engine::new(interner, Rng::from_seed(seed));

    let maxgen_name = engine.interner.intern("maxgen");
    let generations = args.maxgen.unwrap_or_else(|| {
        model
            .global_float(maxgen_name, 0.0)
            .round()
            .max(0.0) as u32
    });

    let defaults = EngineDefaults {
        width_scale: args.width.unwrap_or(1.0),
        default_turn_degrees: args.delta.unwrap_or(90.0),
        distance: args.distance.unwrap_or(1.0),
        ..EngineDefaults::default()
    };

    let out = File::create(&args.output).map_err(|source| CliError::OpenOutput {
        path: args.output.clone(),
        source,
    })?;
    let bounds_out = File::create(&args.bounds).map_err(|source| CliError::OpenBounds {
        path: args.bounds.clone(),
        source,
    })?;
    let out = BufWriter::new(out);
    let bounds_out = BufWriter::new(bounds_out);

    let mut sink = StderrSink;
    let derived = derive_with_progress(&mut engine, &model, generations, args.display, args.stats, &mut sink);

    match args.format {
        Format::Generic => {
            let mut generator = GenericGenerator::new(out, bounds_out, &engine.interner);
            interpret(&actions, &defaults, &derived, &mut generator, &mut sink);
        }
        Format::Radiance => {
            let mut generator = RadianceGenerator::new(out, bounds_out, &engine.interner);
            interpret(&actions, &defaults, &derived, &mut generator, &mut sink);
        }
    }

    Ok(())
}

/// Derives one generation at a time so `--display`/`--stats` can observe every intermediate
/// module list.
fn derive_with_progress(
    engine: &mut Engine,
    model: &Model,
    generations: u32,
    display: bool,
    stats: bool,
    sink: &mut dyn lsystem_core::DiagnosticSink,
) -> ModuleList {
    let mut current = model.axiom.clone();
    report_generation(0, &current, &engine.interner, display, stats);
    for gen in 1..=generations {
        current = lsystem_core::rewrite(&current, &model.productions, &model.globals, &mut engine.rng, sink);
        report_generation(gen, &current, &engine.interner, display, stats);
    }
    current
}

fn report_generation(gen: u32, modules: &ModuleList, interner: &Interner, display: bool, stats: bool) {
    if stats {
        eprintln!("generation {gen}: {} modules", modules.len());
    }
    if display {
        let rendered: Vec<String> = modules.iter().map(|m| render_module(m, interner)).collect();
        println!("{}", rendered.join(""));
    }
}

fn render_module(module: &lsystem_core::Module, interner: &Interner) -> String {
    let name = interner.resolve(module.name);
    if module.params.is_empty() {
        return name.to_string();
    }
    let args: Vec<String> = (0..module.params.len())
        .map(|i| module.arg(i).map_or_else(|| "?".to_string(), |v| v.to_string()))
        .collect();
    format!("{name}({})", args.join(","))
}

fn interpret<G: Generator>(
    actions: &ActionTable,
    defaults: &EngineDefaults,
    derived: &ModuleList,
    generator: &mut G,
    sink: &mut dyn lsystem_core::DiagnosticSink,
) {
    let config = lsystem_core::TurtleConfig {
        width_scale: defaults.width_scale,
        gravity: defaults.gravity,
    };
    let mut interpreter = lsystem_core::Interpreter::new(actions.clone(), config);
    generator.prelude();
    interpreter.interpret(
        derived.as_slice(),
        defaults.width_scale,
        defaults.default_turn_degrees,
        defaults.distance,
        defaults.max_stack_depth,
        generator,
        sink,
    );
    generator.postscript();
}

fn default_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
