use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use riskcast_estimate::{
    estimate, estimate_with_uncertainty, explain, Breakdown, Domain, ScenarioInput, Uncertainty,
};
use riskcast_models::{
    CycloneFeatures, CycloneModel, FloodingFeatures, FloodingModel, RainfallModel,
};
use riskcast_records::{
    parse_hourly, ApiResponse, CyclonePrediction, DisplayRow, Endpoints, FloodingPrediction,
    RainfallPrediction, RecordFilter, RecordsError, Resource, Session, SessionContext,
};
use riskcast_scenario::{has_errors, load_scenario, render_snippet, Severity};
use riskcast_score::{classify_value, format_score, format_value, RiskScore};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::cli::{
    AssessCommand, AssessCycloneArgs, AssessFloodingArgs, ClassifyArgs, Command, EstimateArgs,
    FilterArgs, RainfallArgs, RecordKind, RecordsArgs, RequestArgs,
};
use crate::config::{Config, ConfigError};

pub const TOKEN_ENV: &str = "RISKCAST_TOKEN";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Records(#[from] RecordsError),
    #[error("cannot write output: {0}")]
    Write(#[from] io::Error),
}

impl CliError {
    /// 1 for bad input, 2 for I/O and configuration problems.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Invalid(_) | CliError::Json { .. } => 1,
            CliError::Records(RecordsError::Io { .. }) => 2,
            CliError::Records(_) => 1,
            CliError::Config(_) | CliError::Read { .. } | CliError::Write(_) => 2,
        }
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json(path: &Path) -> Result<Value, CliError> {
    serde_json::from_str(&read(path)?).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn print_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Invalid(format!("cannot serialize output: {e}")))?;
    writeln!(out, "{text}")?;
    Ok(())
}

/// Execute one subcommand. Results go to `out`, diagnostics to `err`.
pub fn run(
    command: &Command,
    config: &Config,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::Classify(args) => run_classify(args, out),
        Command::Estimate(args) => run_estimate(args, config, out, err),
        Command::Assess(AssessCommand::Flooding(args)) => run_assess_flooding(args, config, out),
        Command::Assess(AssessCommand::Cyclone(args)) => run_assess_cyclone(args, config, out),
        Command::Rainfall(args) => run_rainfall(args, config, out, err),
        Command::Records(args) => run_records(args, out),
        Command::Request(args) => run_request(args, config, out),
    }
}

pub fn run_classify(args: &ClassifyArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let raw = Value::String(args.score.clone());
    let c = classify_value(&raw);
    let score = format_value(&raw);
    if args.json {
        print_json(
            out,
            &json!({
                "score": score,
                "category": c.category.as_str(),
                "color": c.color.token(),
                "hex": c.color.hex(),
            }),
        )
    } else {
        writeln!(out, "{score} {} {}", c.category, c.color)?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct EstimateReport {
    domain: Domain,
    score: String,
    category: String,
    color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    simulated: Option<SimulatedReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    breakdown: Option<Breakdown>,
}

#[derive(Debug, Serialize)]
struct SimulatedReport {
    score: String,
    category: String,
    spread: f64,
    seed: Option<u64>,
}

/// Scenario text from the file (if any) followed by the inline assignments.
fn scenario_source(args: &EstimateArgs) -> Result<String, CliError> {
    let mut src = match &args.scenario {
        Some(path) => read(path)?,
        None => String::new(),
    };
    if !src.is_empty() && !src.ends_with('\n') {
        src.push('\n');
    }
    for a in &args.assignments {
        src.push_str(a);
        src.push('\n');
    }
    Ok(src)
}

fn build_scenario(args: &EstimateArgs, err: &mut dyn Write) -> Result<ScenarioInput, CliError> {
    let src = scenario_source(args)?;
    let mut diags = Vec::new();
    let input = load_scenario(&src, &mut diags);
    log::debug!("scenario: {} line(s), {} diagnostic(s)", src.lines().count(), diags.len());
    for d in &diags {
        write!(err, "{}", render_snippet(d, &src))?;
    }
    if has_errors(&diags) {
        let n = diags.iter().filter(|d| d.severity == Severity::Error).count();
        return Err(CliError::Invalid(format!("scenario has {n} error(s)")));
    }
    Ok(input.normalized())
}

fn write_breakdown(out: &mut dyn Write, b: &Breakdown) -> io::Result<()> {
    for t in &b.terms {
        let name = t.factor.name();
        match t.value {
            Some(v) if t.inverted => writeln!(
                out,
                "  {name:<28} (10 - {v:.2}) x {:.2} = {:.2}",
                t.weight, t.contribution
            )?,
            Some(v) => writeln!(out, "  {name:<28} {v:.2} x {:.2} = {:.2}", t.weight, t.contribution)?,
            None => writeln!(out, "  {name:<28} missing = 0.00")?,
        }
    }
    writeln!(out, "  {:<28} {:.2} -> {}", "sum", b.raw_sum, b.score)
}

pub fn run_estimate(
    args: &EstimateArgs,
    config: &Config,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let input = build_scenario(args, err)?;
    let score = estimate(&input, args.domain);

    let spread = args.spread.unwrap_or(config.uncertainty.spread);
    let simulated = if args.simulate_uncertainty {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Some(estimate_with_uncertainty(
            &input,
            args.domain,
            Uncertainty::new(spread),
            &mut rng,
        ))
    } else {
        None
    };
    let breakdown = args.explain.then(|| explain(&input, args.domain));

    if args.json {
        let report = EstimateReport {
            domain: args.domain,
            score: score.to_string(),
            category: score.category().to_string(),
            color: score.category().color().token(),
            simulated: simulated.map(|s: RiskScore| SimulatedReport {
                score: s.to_string(),
                category: s.category().to_string(),
                spread,
                seed: args.seed,
            }),
            breakdown,
        };
        return print_json(out, &report);
    }

    let c = score.classify();
    writeln!(out, "{} risk {score} {} ({})", args.domain, c.category, c.color)?;
    if let Some(s) = simulated {
        let sc = s.classify();
        writeln!(out, "simulated {s} {} ({}) spread ±{spread}", sc.category, sc.color)?;
    }
    if let Some(b) = &breakdown {
        write_breakdown(out, b)?;
    }
    Ok(())
}

fn flooding_features(args: &AssessFloodingArgs, config: &Config) -> FloodingFeatures {
    let loc = &config.location;
    FloodingFeatures {
        rainfall_mm: args.rainfall_mm,
        infrastructure_strength: args.infrastructure.unwrap_or(loc.infrastructure_strength),
        soil_moisture_retention: args.soil.unwrap_or(loc.soil_moisture_retention),
        vegetation_density: args.vegetation.unwrap_or(loc.vegetation_density),
        population_density: args.density.unwrap_or(loc.population_density),
        drainage_capacity: args.drainage.unwrap_or(config.flooding.drainage_capacity),
        base_area_km2: args.base_area.unwrap_or(config.flooding.base_area_km2),
        ..FloodingFeatures::default()
    }
}

pub fn run_assess_flooding(
    args: &AssessFloodingArgs,
    config: &Config,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let model_path = args.model.as_deref().or(config.models.flooding.as_deref());
    let model = FloodingModel::load(model_path);
    let f = model.predict(&flooding_features(args, config));

    if args.json {
        return print_json(out, &f);
    }
    writeln!(
        out,
        "flooding risk {} {} ({})",
        format_score(f.risk_score),
        f.risk_category,
        f.risk_color
    )?;
    writeln!(out, "  flood probability     {:.2}", f.flood_probability)?;
    writeln!(out, "  mudslide probability  {:.2}", f.mudslide_probability)?;
    writeln!(out, "  water level           {:.2} m", f.water_level_meters)?;
    writeln!(out, "  affected area         {:.2} km²", f.affected_area_km2)?;
    writeln!(out, "  affected population   {}", f.affected_population)?;
    writeln!(out, "  confidence            {:.2}", f.confidence_score)?;
    Ok(())
}

fn cyclone_features(args: &AssessCycloneArgs, config: &Config) -> CycloneFeatures {
    let d = CycloneFeatures::default();
    CycloneFeatures {
        wind_speed_kmh: args.wind_kmh.unwrap_or(d.wind_speed_kmh),
        pressure_hpa: args.pressure.unwrap_or(d.pressure_hpa),
        latitude: args.lat.unwrap_or(d.latitude),
        longitude: args.lon.unwrap_or(d.longitude),
        heading_deg: args.heading.unwrap_or(config.cyclone.heading_deg),
        speed_kmh: args.speed.unwrap_or(config.cyclone.speed_kmh),
        distance_km: args.distance.unwrap_or(config.cyclone.distance_km),
        infrastructure_strength: args
            .infrastructure
            .unwrap_or(config.location.infrastructure_strength),
        population_size: args.population.unwrap_or(config.location.population_size),
        affected_location_ids: Vec::new(),
    }
}

pub fn run_assess_cyclone(
    args: &AssessCycloneArgs,
    config: &Config,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let model_path = args.model.as_deref().or(config.models.cyclone.as_deref());
    let model = CycloneModel::load(model_path);
    let features = cyclone_features(args, config);
    let f = match args.jitter_seed {
        Some(seed) => model.predict_jittered(&features, &mut StdRng::seed_from_u64(seed)),
        None => model.predict(&features),
    };

    if args.json {
        return print_json(out, &f);
    }
    writeln!(
        out,
        "cyclone risk {} {} ({})",
        format_score(f.risk_score),
        f.risk_category,
        f.risk_color
    )?;
    writeln!(out, "  category    {}", f.category)?;
    writeln!(out, "  max wind    {:.2} km/h", f.max_wind_speed_kmh)?;
    writeln!(out, "  pressure    {:.2} hPa", f.central_pressure_hpa)?;
    writeln!(out, "  confidence  {:.2}", f.confidence_score)?;
    writeln!(out, "  track:")?;
    for p in &f.path_coordinates {
        writeln!(
            out,
            "    {:>5}  {:>9.4} {:>9.4}",
            p.timestamp.as_ref().map(ToString::to_string).unwrap_or_else(|| "-".into()),
            p.latitude,
            p.longitude
        )?;
    }
    Ok(())
}

pub fn run_rainfall(
    args: &RainfallArgs,
    config: &Config,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let payload = read_json(&args.file)?;
    if let Some(e) = payload.get("error") {
        writeln!(err, "warning: payload reports an error: {e}")?;
    }
    let observations = parse_hourly(&payload);
    if observations.is_empty() {
        log::warn!("{}: no hourly observations", args.file.display());
    }

    let model_path = args.model.as_deref().or(config.models.rainfall.as_deref());
    let model = RainfallModel::load(model_path);
    let forecasts = model.forecast_hourly(&observations, args.limit);

    if args.json {
        let rows: Vec<Value> = forecasts
            .iter()
            .map(|(ts, f)| {
                json!({
                    "timestamp": ts,
                    "predicted_rainfall_mm": f.predicted_rainfall_mm,
                    "intensity": f.intensity,
                    "confidence_score": f.confidence_score,
                })
            })
            .collect();
        return print_json(out, &rows);
    }
    for (ts, f) in &forecasts {
        writeln!(
            out,
            "{ts:<17} {:>7.2} mm  {:<8} {:.2}",
            f.predicted_rainfall_mm,
            f.intensity.as_str(),
            f.confidence_score
        )?;
    }
    Ok(())
}

fn record_filter(args: &FilterArgs) -> RecordFilter {
    RecordFilter {
        location_id: args.location.clone(),
        start_date: args.from.clone(),
        end_date: args.to.clone(),
        is_historical: args.historical,
    }
}

pub fn run_records(args: &RecordsArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let payload = read_json(&args.file)?;
    let filter = record_filter(&args.filter);

    match args.kind {
        RecordKind::Rainfall => {
            let rows: Vec<RainfallPrediction> = ApiResponse::<RainfallPrediction>::from_value(payload)?
                .into_records()?
                .into_iter()
                .filter(|r| filter.matches(r))
                .collect();
            if args.json {
                return print_json(out, &rows);
            }
            for r in &rows {
                writeln!(
                    out,
                    "{:<10}  {:<24}  {:>7.2} mm  {:<8} {:.2}",
                    r.prediction_date, r.location, r.predicted_rainfall_mm, r.intensity, r.confidence_score
                )?;
            }
        }
        RecordKind::Flooding => {
            let records: Vec<FloodingPrediction> =
                ApiResponse::from_value(payload)?.into_records()?;
            let rows: Vec<DisplayRow> = records
                .iter()
                .filter(|r| filter.matches(*r))
                .map(DisplayRow::from_record)
                .collect();
            write_rows(out, &rows, args.json)?;
        }
        RecordKind::Cyclone => {
            let records: Vec<CyclonePrediction> =
                ApiResponse::from_value(payload)?.into_records()?;
            let rows: Vec<DisplayRow> = records
                .iter()
                .filter(|r| filter.matches(*r))
                .map(DisplayRow::from_record)
                .collect();
            write_rows(out, &rows, args.json)?;
        }
    }
    Ok(())
}

fn write_rows(out: &mut dyn Write, rows: &[DisplayRow], as_json: bool) -> Result<(), CliError> {
    if as_json {
        return print_json(out, &rows);
    }
    for row in rows {
        writeln!(out, "{row}")?;
    }
    Ok(())
}

pub fn run_request(args: &RequestArgs, config: &Config, out: &mut dyn Write) -> Result<(), CliError> {
    let token = args
        .token
        .clone()
        .or_else(|| std::env::var(TOKEN_ENV).ok())
        .filter(|t| !t.is_empty());

    let mut ctx = SessionContext::new();
    if let Some(token) = token {
        ctx.sign_in(Session::new(token));
    }
    let resource = match args.kind {
        RecordKind::Rainfall => Resource::RainfallPredictions,
        RecordKind::Flooding => Resource::FloodingPredictions,
        RecordKind::Cyclone => Resource::CyclonePredictions,
    };
    let api = Endpoints::new(&config.api.base_url)?;
    let req = api
        .list(&ctx, resource, &record_filter(&args.filter))
        .map_err(|e| CliError::Invalid(format!("{e} (pass --token or set {TOKEN_ENV})")))?;

    writeln!(out, "{} {}", req.method.as_str(), req.url())?;
    for (name, _) in &req.headers {
        writeln!(out, "{name}: <redacted>")?;
    }
    Ok(())
}
