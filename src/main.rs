//! solterra entry point: CLI wiring and config-driven command dispatch.

mod cli;

use std::io::{self, IsTerminal};
use std::process;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::filter::EnvFilter;

use solterra::config::AppConfig;
use solterra::estimator::{EstimateResponse, Estimator, EstimatorInput, RoofType};
use solterra::io::export::{export_csv, export_savings_csv, write_csv};
use solterra::records::{
    EnergyProductionRecord, MemorySink, ProfileSource, RecordSink, SavingsCalculation,
    SystemRegistry,
};
use solterra::runner::Runner;
use solterra::telemetry::{GeneratorOptions, MockTelemetryGenerator, SampleOrder, SystemProfile};
use solterra::SolterraResult;

use cli::{CliOptions, Command, EstimateArgs, GenerateArgs, StatusArgs};

/// System id written on rows generated from `--capacity` rather than a registered system.
const ADHOC_SYSTEM_ID: &str = "adhoc";

/// Installs the global subscriber. Logs go to stderr so CSV and JSON on
/// stdout stay clean; `RUST_LOG` overrides the `info` default.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .compact()
        .init();
}

/// `--config` takes priority, then `--preset`, then the defaults.
fn load_config(opts: &CliOptions) -> Result<AppConfig, String> {
    let config = if let Some(ref path) = opts.config {
        let cfg = AppConfig::from_toml_file(path).map_err(|e| e.to_string())?;
        tracing::info!(path = %path.display(), systems = cfg.systems.len(), "configuration loaded");
        cfg
    } else if let Some(ref name) = opts.preset {
        let cfg = AppConfig::from_preset(name).map_err(|e| e.to_string())?;
        tracing::info!(preset = %name, "preset loaded");
        cfg
    } else {
        AppConfig::default()
    };

    let errors = config.validate();
    if !errors.is_empty() {
        let lines: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(lines.join("\n"));
    }
    Ok(config)
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn run_estimate(args: &EstimateArgs, config: &AppConfig) -> SolterraResult<()> {
    let input = EstimatorInput {
        roof_area_sq_ft: args.roof_area,
        monthly_bill: args.monthly_bill,
        sunlight_hours_per_day: args.sunlight_hours,
        roof_type: RoofType::parse(&args.roof_type, config.estimator.roof_type_policy)?,
        electricity_rate_per_kwh: args.rate,
    };
    let output = Estimator::new(config.estimator.constants()).estimate(&input)?;
    tracing::debug!(roof_type = %input.roof_type, system_size_kw = output.system_size_kw, "estimate computed");

    if args.json {
        let response = EstimateResponse::from(&output);
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", output.rounded());
    }

    if let (Some(user), Some(path)) = (args.user.as_deref(), args.out.as_ref()) {
        let mut store = MemorySink::default();
        store.store_savings(SavingsCalculation::new(user, &output))?;
        export_savings_csv(&store.savings, path)?;
        eprintln!("Savings written to {}", path.display());
    }
    Ok(())
}

fn run_generate(args: &GenerateArgs, config: &AppConfig) -> SolterraResult<()> {
    let registry = SystemRegistry::new(config.systems.iter().cloned());
    let (system_id, profile) = match args.system.as_deref() {
        Some(id) => (id, registry.require_system(id)?.profile()),
        None => (
            ADHOC_SYSTEM_ID,
            SystemProfile {
                capacity_kw: args.capacity,
                battery_capacity_kwh: args.battery,
            },
        ),
    };

    let mut options: GeneratorOptions = config.generator.options();
    if args.chronological {
        options.order = SampleOrder::Chronological;
    }
    let days = args.days.unwrap_or(config.generator.default_days);
    let start = args.start.unwrap_or_else(Utc::now);
    let mut rng = make_rng(args.seed.or(config.generator.seed));

    let samples = MockTelemetryGenerator::new(options).generate(&profile, days, start, &mut rng)?;
    let rows: Vec<EnergyProductionRecord> = samples
        .iter()
        .map(|s| EnergyProductionRecord::from_sample(system_id, s))
        .collect();
    tracing::info!(system_id, days, count = rows.len(), "telemetry generated");

    match args.out {
        Some(ref path) => {
            export_csv(&rows, path)?;
            eprintln!("Telemetry written to {}", path.display());
        }
        None => write_csv(&rows, io::stdout().lock())?,
    }
    Ok(())
}

/// Seeds the default window of mock rows in memory, then reports on them.
fn run_status(args: &StatusArgs, config: &AppConfig) -> SolterraResult<()> {
    let runner = Runner::from_config(config);
    let registry = SystemRegistry::new(config.systems.iter().cloned());
    let mut store = MemorySink::default();
    let mut rng = make_rng(args.seed.or(config.generator.seed));
    let now = Utc::now();

    runner.seed_mock_data(&registry, &mut store, &args.system, None, now, &mut rng)?;
    let status = runner.system_status(&registry, &store, &args.system, now, &mut rng)?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

#[cfg(feature = "api")]
fn run_serve(args: &cli::ServeArgs, config: &AppConfig) -> SolterraResult<()> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    let bind = args.bind.as_deref().unwrap_or(&config.server.bind);
    let addr: SocketAddr = bind
        .parse()
        .map_err(|_| solterra::SolterraError::invalid("bind", format!("\"{bind}\" is not a socket address")))?;
    let state = Arc::new(solterra::api::AppState::from_config(config));
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(solterra::api::serve(state, addr))
}

fn main() {
    let opts = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };
    if matches!(opts.command, Command::Help) {
        cli::print_usage();
        return;
    }

    init_tracing();

    let config = match load_config(&opts) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let result = match &opts.command {
        Command::Estimate(args) => run_estimate(args, &config),
        Command::Generate(args) => run_generate(args, &config),
        Command::Status(args) => run_status(args, &config),
        #[cfg(feature = "api")]
        Command::Serve(args) => run_serve(args, &config),
        Command::Help => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solterra::SolterraError;

    #[test]
    fn adhoc_rows_use_fixed_id() {
        let config = AppConfig::default();
        let args = GenerateArgs {
            capacity: Some(5.0),
            days: Some(1),
            seed: Some(7),
            ..GenerateArgs::default()
        };
        let dir = std::env::temp_dir().join("solterra_main_adhoc.csv");
        let args = GenerateArgs {
            out: Some(dir.clone()),
            ..args
        };
        run_generate(&args, &config).unwrap();
        let text = std::fs::read_to_string(&dir).unwrap();
        assert_eq!(text.lines().count(), 25);
        assert!(text.lines().skip(1).all(|l| l.starts_with("adhoc,")));
        std::fs::remove_file(&dir).ok();
    }

    #[test]
    fn estimate_exports_savings_for_user() {
        let path = std::env::temp_dir().join("solterra_main_savings.csv");
        let args = EstimateArgs {
            roof_area: 500.0,
            monthly_bill: 2500.0,
            sunlight_hours: 5.0,
            roof_type: "flat".to_string(),
            rate: 2.5,
            json: true,
            user: Some("u-7".to_string()),
            out: Some(path.clone()),
        };
        run_estimate(&args, &AppConfig::default()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("user_id,system_size_kw"));
        assert!(lines[1].starts_with("u-7,0.75,1368.75,3421.88"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unknown_system_fails_generate() {
        let args = GenerateArgs {
            system: Some("missing".to_string()),
            ..GenerateArgs::default()
        };
        let err = run_generate(&args, &AppConfig::default()).unwrap_err();
        assert!(matches!(err, SolterraError::NotFound(_)));
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let opts = CliOptions {
            config: None,
            preset: Some("nonexistent".to_string()),
            command: Command::Help,
        };
        let err = load_config(&opts).unwrap_err();
        assert!(err.contains("unknown preset"));
    }
}
