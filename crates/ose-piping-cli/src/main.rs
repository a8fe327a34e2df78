use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use ose_piping_base::{parse_angle, parse_length};
use ose_piping_fittings::{
    AnyFitting, Bushing, DEFAULT_SHAPEOPS_TOLERANCE, DimensionTable, FittingFromTable,
    FittingKind, FittingReport, NutShape, OutputType, psize,
};
use ose_piping_io::{DEFAULT_TESSELLATION_TOLERANCE, export_solid};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "ose-piping")]
#[command(about = "Parametric pipe fittings from dimension tables")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a fitting and write it as STEP or OBJ.
    Generate(GenerateArgs),
    /// List the part numbers of a dimension table.
    List(ListArgs),
    /// Print dimensions, construction points, ports and parts as JSON.
    Inspect(FittingArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    Pipe,
    Elbow,
    SweepElbow,
    Tee,
    Cross,
    Coupling,
    Bushing,
    Corner,
}

impl From<Kind> for FittingKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Pipe => FittingKind::Pipe,
            Kind::Elbow => FittingKind::Elbow,
            Kind::SweepElbow => FittingKind::SweepElbow,
            Kind::Tee => FittingKind::Tee,
            Kind::Cross => FittingKind::Cross,
            Kind::Coupling => FittingKind::Coupling,
            Kind::Bushing => FittingKind::Bushing,
            Kind::Corner => FittingKind::Corner,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Nut {
    Octagonal,
    Hexagonal,
}

#[derive(Args)]
struct FittingArgs {
    kind: Kind,
    /// CSV dimension table; requires --part.
    #[arg(long, requires = "part")]
    table: Option<PathBuf>,
    /// Part number in the table.
    #[arg(long, requires = "table")]
    part: Option<String>,
    /// Pipe length, e.g. `600` or `2 m`.
    #[arg(long)]
    length: Option<String>,
    /// Override a dimension, e.g. `--set POD=25.4`.
    #[arg(long = "set", value_name = "NAME=VALUE")]
    overrides: Vec<String>,
    /// Nut shape of a bushing.
    #[arg(long, value_enum)]
    nut: Option<Nut>,
}

#[derive(Args)]
struct GenerateArgs {
    #[command(flatten)]
    fitting: FittingArgs,
    /// Output file; the extension picks STEP (`.step`, `.stp`) or OBJ (`.obj`).
    #[arg(long)]
    out: PathBuf,
    /// Tolerance of the boolean operations.
    #[arg(long, default_value_t = DEFAULT_SHAPEOPS_TOLERANCE)]
    tolerance: f64,
    /// Chord tolerance of OBJ meshes.
    #[arg(long, default_value_t = DEFAULT_TESSELLATION_TOLERANCE)]
    mesh_tolerance: f64,
}

#[derive(Args)]
struct ListArgs {
    #[arg(long)]
    kind: Kind,
    #[arg(long)]
    table: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => generate(args),
        Command::List(args) => list(args),
        Command::Inspect(args) => inspect(args),
    }
}

fn generate(args: GenerateArgs) -> Result<()> {
    let (fitting, part_number) = resolve(&args.fitting)?;
    let mut element = fitting
        .element(OutputType::Solid, args.tolerance)
        .with_context(|| format!("failed to build {}", fitting.kind()))?;
    if let Some(part_number) = part_number {
        element = element.with_part_number(part_number);
    }
    let solid = element
        .geometry()
        .solid()
        .context("fitting did not evaluate to a solid")?;

    let format = export_solid(solid, &args.out, args.mesh_tolerance)
        .with_context(|| format!("export of {} failed", element.name))?;
    info!(
        kind = %element.kind,
        guid = %element.guid,
        part = element.part_number.as_deref().unwrap_or("-"),
        path = %args.out.display(),
        %format,
        "export complete"
    );
    Ok(())
}

fn list(args: ListArgs) -> Result<()> {
    let kind = FittingKind::from(args.kind);
    let table = load_table(kind, &args.table)?;
    if !table.has_valid_data() {
        warn!(
            missing = ?table.missing_columns(),
            "table cannot describe {kind} parts"
        );
    }
    let builder = FittingFromTable::new(table);
    for key in builder.table().part_keys() {
        let size = builder
            .table()
            .find_part(key)
            .map(|row| psize(&row))
            .unwrap_or_default();
        let status = match builder.fitting(kind, key).and_then(|fitting| fitting.validate()) {
            Ok(()) => "ok".to_string(),
            Err(err) => err.to_string(),
        };
        println!("{key}\t{size}\t{status}");
    }
    Ok(())
}

fn inspect(args: FittingArgs) -> Result<()> {
    let (fitting, part_number) = resolve(&args)?;
    let report = FittingReport {
        part_number,
        ..fitting
            .report()
            .with_context(|| format!("failed to build {}", fitting.kind()))?
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Dimensions from the table row or the built-in defaults, with overrides applied.
fn resolve(args: &FittingArgs) -> Result<(AnyFitting, Option<String>)> {
    let kind = FittingKind::from(args.kind);
    let (mut fitting, part_number) = match (&args.table, &args.part) {
        (Some(path), Some(part)) => {
            let builder = FittingFromTable::new(load_table(kind, path)?);
            let fitting = builder
                .fitting(kind, part)
                .with_context(|| format!("cannot read part {part} from {}", path.display()))?;
            (fitting, Some(part.clone()))
        }
        _ => (AnyFitting::default_for(kind), None),
    };

    if let Some(length) = &args.length {
        if kind != FittingKind::Pipe {
            bail!("--length only applies to pipes");
        }
        let length = parse_length(length).with_context(|| format!("invalid length '{length}'"))?;
        fitting = fitting.with_length(length);
    }

    let overrides = args
        .overrides
        .iter()
        .map(|text| parse_override(text))
        .collect::<Result<Vec<_>>>()?;
    if !overrides.is_empty() {
        fitting = with_overrides(fitting, &overrides)?;
    }

    if let Some(nut) = args.nut {
        let AnyFitting::Bushing(bushing) = fitting else {
            bail!("--nut only applies to bushings");
        };
        let shape = match nut {
            Nut::Octagonal => NutShape::Octagonal,
            Nut::Hexagonal => NutShape::Hexagonal,
        };
        fitting = AnyFitting::Bushing(Bushing::with_nut(bushing, shape));
    }
    Ok((fitting, part_number))
}

fn load_table(kind: FittingKind, path: &Path) -> Result<DimensionTable> {
    let mut table = DimensionTable::new(AnyFitting::columns(kind));
    table
        .load_path(path)
        .with_context(|| format!("failed to load table {}", path.display()))?;
    Ok(table)
}

/// Dimensions given in degrees rather than millimetres.
const ANGLE_DIMENSIONS: &[&str] = &["BendAngle"];

fn parse_override(text: &str) -> Result<(String, f64)> {
    let (name, value) = text
        .split_once('=')
        .with_context(|| format!("expected NAME=VALUE, got '{text}'"))?;
    let name = name.trim();
    let value = if ANGLE_DIMENSIONS.contains(&name) {
        parse_angle(value)
    } else {
        parse_length(value)
    }
    .with_context(|| format!("invalid value for {name}"))?;
    Ok((name.to_string(), value))
}

fn with_overrides(fitting: AnyFitting, overrides: &[(String, f64)]) -> Result<AnyFitting> {
    Ok(match fitting {
        AnyFitting::Pipe(f) => AnyFitting::Pipe(merge(f, overrides)?),
        AnyFitting::Elbow(f) => AnyFitting::Elbow(merge(f, overrides)?),
        AnyFitting::SweepElbow(f) => AnyFitting::SweepElbow(merge(f, overrides)?),
        AnyFitting::Tee(f) => AnyFitting::Tee(merge(f, overrides)?),
        AnyFitting::Cross(f) => AnyFitting::Cross(merge(f, overrides)?),
        AnyFitting::Coupling(f) => AnyFitting::Coupling(merge(f, overrides)?),
        AnyFitting::Bushing(f) => {
            let nut = f.nut;
            AnyFitting::Bushing(merge(f, overrides)?.with_nut(nut))
        }
        AnyFitting::Corner(f) => AnyFitting::Corner(merge(f, overrides)?),
    })
}

/// Replaces named fields of a dimension record through its serde form.
fn merge<T: Serialize + DeserializeOwned>(record: T, overrides: &[(String, f64)]) -> Result<T> {
    let mut value = serde_json::to_value(&record)?;
    let fields = value
        .as_object_mut()
        .context("dimension record is not a map")?;
    for (name, number) in overrides {
        if !fields.contains_key(name) {
            let known: Vec<&str> = fields.keys().map(String::as_str).collect();
            bail!("unknown dimension {name}; expected one of {}", known.join(", "));
        }
        fields.insert(name.clone(), serde_json::Value::from(*number));
    }
    Ok(serde_json::from_value(value)?)
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
