//! Command-line argument parsing for the `solterra` binary.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};

/// Parsed command line.
#[derive(Debug)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    pub command: Command,
}

#[derive(Debug)]
pub enum Command {
    Estimate(EstimateArgs),
    Generate(GenerateArgs),
    Status(StatusArgs),
    #[cfg(feature = "api")]
    Serve(ServeArgs),
    Help,
}

#[derive(Debug)]
pub struct EstimateArgs {
    pub roof_area: f64,
    pub monthly_bill: f64,
    pub sunlight_hours: f64,
    pub roof_type: String,
    pub rate: f64,
    pub json: bool,
    /// Saves the calculation for this user; required with `out`.
    pub user: Option<String>,
    pub out: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct GenerateArgs {
    pub system: Option<String>,
    pub capacity: Option<f64>,
    pub battery: Option<f64>,
    pub days: Option<u32>,
    pub seed: Option<u64>,
    pub start: Option<DateTime<Utc>>,
    pub chronological: bool,
    pub out: Option<PathBuf>,
}

#[derive(Debug)]
pub struct StatusArgs {
    pub system: String,
    pub seed: Option<u64>,
}

#[cfg(feature = "api")]
#[derive(Debug)]
pub struct ServeArgs {
    pub bind: Option<String>,
}

/// Flags that never take a value.
const SWITCHES: &[&str] = &["--json", "--chronological"];

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut command: Option<String> = None;
    let mut config = None;
    let mut preset = None;
    let mut flags: Vec<(String, String)> = Vec::new();

    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--help" | "-h" | "help" => {
                return Ok(CliOptions {
                    config,
                    preset,
                    command: Command::Help,
                });
            }
            "--config" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            flag if SWITCHES.contains(&flag) => flags.push((flag.to_string(), String::new())),
            flag if flag.starts_with("--") => {
                i += 1;
                let value = args.next_or_err(i, &format!("missing value for {flag}"))?;
                if flags.iter().any(|(f, _)| f == flag) {
                    return Err(format!("{flag} provided more than once"));
                }
                flags.push((flag.to_string(), value.to_string()));
            }
            name => {
                if command.replace(name.to_string()).is_some() {
                    return Err(format!("unexpected argument: {name}"));
                }
            }
        }
        i += 1;
    }

    if config.is_some() && preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    let flags = Flags(flags);
    let command = match command.as_deref() {
        Some("estimate") => {
            flags.only(&[
                "--roof-area",
                "--monthly-bill",
                "--sunlight-hours",
                "--roof-type",
                "--rate",
                "--json",
                "--user",
                "--out",
            ])?;
            let args = EstimateArgs {
                roof_area: flags.required("--roof-area")?,
                monthly_bill: flags.required("--monthly-bill")?,
                sunlight_hours: flags.required("--sunlight-hours")?,
                roof_type: flags.required("--roof-type")?,
                rate: flags.required("--rate")?,
                json: flags.has("--json"),
                user: flags.optional("--user")?,
                out: flags.optional("--out")?,
            };
            if args.out.is_some() && args.user.is_none() {
                return Err("`--out` on estimate requires `--user`".to_string());
            }
            Command::Estimate(args)
        }
        Some("generate") => {
            flags.only(&[
                "--system",
                "--capacity",
                "--battery",
                "--days",
                "--seed",
                "--start",
                "--chronological",
                "--out",
            ])?;
            let args = GenerateArgs {
                system: flags.optional("--system")?,
                capacity: flags.optional("--capacity")?,
                battery: flags.optional("--battery")?,
                days: flags.optional("--days")?,
                seed: flags.optional("--seed")?,
                start: flags.optional("--start")?,
                chronological: flags.has("--chronological"),
                out: flags.optional("--out")?,
            };
            if args.system.is_some() && (args.capacity.is_some() || args.battery.is_some()) {
                return Err(
                    "`--system` cannot be combined with `--capacity` or `--battery`".to_string(),
                );
            }
            Command::Generate(args)
        }
        Some("status") => {
            flags.only(&["--system", "--seed"])?;
            Command::Status(StatusArgs {
                system: flags.required("--system")?,
                seed: flags.optional("--seed")?,
            })
        }
        #[cfg(feature = "api")]
        Some("serve") => {
            flags.only(&["--bind"])?;
            Command::Serve(ServeArgs {
                bind: flags.optional("--bind")?,
            })
        }
        Some(other) => return Err(format!("unknown command: {other}")),
        None => return Err("missing command (expected estimate, generate, status, or serve)".to_string()),
    };

    Ok(CliOptions {
        config,
        preset,
        command,
    })
}

/// Command flags collected in order of appearance.
struct Flags(Vec<(String, String)>);

impl Flags {
    fn get(&self, flag: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| f == flag)
            .map(|(_, v)| v.as_str())
    }

    fn has(&self, flag: &str) -> bool {
        self.get(flag).is_some()
    }

    fn only(&self, allowed: &[&str]) -> Result<(), String> {
        match self.0.iter().find(|(f, _)| !allowed.contains(&f.as_str())) {
            Some((flag, _)) => Err(format!("unknown argument for this command: {flag}")),
            None => Ok(()),
        }
    }

    fn optional<T: FromStr>(&self, flag: &str) -> Result<Option<T>, String> {
        self.get(flag)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|_| format!("invalid value for {flag}: \"{raw}\""))
            })
            .transpose()
    }

    fn required<T: FromStr>(&self, flag: &str) -> Result<T, String> {
        self.optional(flag)?
            .ok_or_else(|| format!("missing required argument {flag}"))
    }
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("solterra — solar savings estimator and mock telemetry generator");
    eprintln!();
    eprintln!("Usage: solterra [--config <path> | --preset <name>] <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  estimate  --roof-area <sq ft> --monthly-bill <amount> --sunlight-hours <h>");
    eprintln!("            --roof-type <flat|sloped_south|sloped_other> --rate <per kWh> [--json]");
    eprintln!("            [--user <id> --out <csv>]");
    eprintln!("  generate  [--system <id> | --capacity <kW> [--battery <kWh>]] [--days <n>]");
    eprintln!("            [--seed <u64>] [--start <RFC3339>] [--chronological] [--out <csv>]");
    eprintln!("  status    --system <id> [--seed <u64>]");
    #[cfg(feature = "api")]
    {
        eprintln!("  serve     [--bind <addr>]");
    }
    eprintln!();
    eprintln!("Presets: default, demo. Without --config or --preset the defaults are used.");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_estimate() {
        let opts = parse_args_from(args(&[
            "estimate",
            "--roof-area",
            "500",
            "--monthly-bill",
            "2500",
            "--sunlight-hours",
            "5",
            "--roof-type",
            "flat",
            "--rate",
            "2.5",
            "--json",
        ]))
        .expect("parse should succeed");
        let Command::Estimate(est) = opts.command else {
            panic!("expected estimate command");
        };
        assert_eq!(est.roof_area, 500.0);
        assert_eq!(est.roof_type, "flat");
        assert!(est.json);
    }

    #[test]
    fn estimate_out_needs_a_user() {
        let base = [
            "estimate",
            "--roof-area",
            "500",
            "--monthly-bill",
            "2500",
            "--sunlight-hours",
            "5",
            "--roof-type",
            "flat",
            "--rate",
            "2.5",
            "--out",
            "savings.csv",
        ];
        let err = parse_args_from(args(&base)).unwrap_err();
        assert!(err.contains("requires `--user`"));

        let mut with_user = base.to_vec();
        with_user.extend(["--user", "u-1"]);
        let opts = parse_args_from(args(&with_user)).expect("parse should succeed");
        let Command::Estimate(est) = opts.command else {
            panic!("expected estimate command");
        };
        assert_eq!(est.user.as_deref(), Some("u-1"));
        assert!(est.out.is_some());
    }

    #[test]
    fn estimate_requires_every_input() {
        let err = parse_args_from(args(&["estimate", "--roof-area", "500"])).unwrap_err();
        assert!(err.contains("missing required argument"));
    }

    #[test]
    fn parses_generate_with_global_config() {
        let opts = parse_args_from(args(&[
            "--config",
            "solterra.toml",
            "generate",
            "--capacity",
            "8",
            "--battery",
            "13.5",
            "--days",
            "2",
            "--start",
            "2024-06-01T12:00:00Z",
            "--chronological",
        ]))
        .expect("parse should succeed");
        assert_eq!(
            opts.config.as_deref().and_then(|p| p.to_str()),
            Some("solterra.toml")
        );
        let Command::Generate(gen_args) = opts.command else {
            panic!("expected generate command");
        };
        assert_eq!(gen_args.capacity, Some(8.0));
        assert_eq!(gen_args.battery, Some(13.5));
        assert_eq!(gen_args.days, Some(2));
        assert!(gen_args.start.is_some());
        assert!(gen_args.chronological);
    }

    #[test]
    fn rejects_system_with_capacity() {
        let err = parse_args_from(args(&["generate", "--system", "demo", "--capacity", "5"]))
            .unwrap_err();
        assert!(err.contains("cannot be combined"));
    }

    #[test]
    fn rejects_flags_from_other_commands() {
        let err = parse_args_from(args(&["status", "--system", "demo", "--days", "3"])).unwrap_err();
        assert!(err.contains("--days"));
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = parse_args_from(args(&["generate", "--days", "-1"])).unwrap_err();
        assert!(err.contains("invalid value for --days"));
    }

    #[test]
    fn config_and_preset_are_exclusive() {
        let err = parse_args_from(args(&["--config", "a.toml", "--preset", "demo", "status", "--system", "x"]))
            .unwrap_err();
        assert!(err.contains("mutually exclusive"));
    }

    #[test]
    fn help_short_circuits() {
        let opts = parse_args_from(args(&["generate", "--help"])).expect("help parses");
        assert!(matches!(opts.command, Command::Help));
    }

    #[test]
    fn missing_command_is_an_error() {
        assert!(parse_args_from(args(&["--preset", "demo"])).is_err());
    }
}
