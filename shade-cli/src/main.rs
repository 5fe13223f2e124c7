//! Shade CLI - Command line interface
//!
//! Resolves units and resources the way an embedding host would, using the
//! project file (`shade.json`) plus command-line overrides.

use clap::{Parser, Subcommand};
use serde::Serialize;
use shade_config::{LogLevel, ProjectConfig};
use shade_core::{ImageHost, ImageWriter, Unit, UnitLoader};
use shade_log::Logger;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

mod config;
mod error;
mod logging;
mod platform;

use crate::config::{prepend_paths, read_project_config, shade_logger_level, LogConfig};
use crate::error::CliError;
use crate::logging::{init_with_file, LogFormat, TracingSink};
use crate::platform::print_error_chain;

#[derive(Parser, Debug)]
#[command(
    name = "shade",
    about = "Shade - local-first unit loader",
    version = "0.1.0"
)]
struct Cli {
    /// Project file (default: ./shade.json if present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Loader search directory, searched before the project file's entries
    #[arg(long = "path", global = true, value_name = "DIR")]
    paths: Vec<String>,

    /// Host search directory, searched before the project file's entries
    #[arg(long = "host-path", global = true, value_name = "DIR")]
    host_paths: Vec<String>,

    /// Log level: silent, error, warn, info, debug, trace
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "compact")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve units and print where each came from
    Load {
        #[arg(required = true)]
        names: Vec<String>,
        /// Link each unit after resolving it
        #[arg(long)]
        link: bool,
        /// Print one JSON object per unit
        #[arg(long)]
        json: bool,
    },
    /// Locate resources on the search path
    Resource {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Write a unit image
    Pack {
        /// Unit name recorded in the image
        #[arg(long)]
        name: String,
        /// Declared dependency (repeatable)
        #[arg(long = "dep")]
        deps: Vec<String>,
        /// Mark the unit as an interface unit
        #[arg(long)]
        interface: bool,
        /// Payload file
        payload: PathBuf,
        /// Output image path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        print_error_chain(&e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut project = read_project_config(cli.config.as_deref())?;
    apply_overrides(&mut project, &cli)?;

    let log_config = LogConfig::from_logging(&project.logging);
    init_with_file(
        &log_config,
        cli.log_format,
        project.logging.file.as_deref().map(std::path::Path::new),
    )?;
    let logger = Logger::new(shade_logger_level(&project.logging)).with_sink(TracingSink);

    match cli.command {
        Command::Load { names, link, json } => handle_load(&project, logger, &names, link, json),
        Command::Resource { names } => handle_resource(&project, logger, &names),
        Command::Pack {
            name,
            deps,
            interface,
            payload,
            output,
        } => handle_pack(name, deps, interface, payload, output),
    }
}

/// Merge command-line flags into the project configuration
fn apply_overrides(project: &mut ProjectConfig, cli: &Cli) -> Result<(), CliError> {
    prepend_paths(&mut project.loader.search_path, &cli.paths);
    prepend_paths(&mut project.host.search_path, &cli.host_paths);
    if let Some(level) = &cli.log_level {
        project.logging.level =
            LogLevel::parse(level).ok_or_else(|| CliError::UnknownLogLevel(level.clone()))?;
    }
    Ok(())
}

/// One line of `shade load` output
#[derive(Debug, Serialize)]
struct UnitReport<'a> {
    name: &'a str,
    origin: &'static str,
    interface: bool,
    dependencies: &'a [String],
    payload_len: usize,
}

impl<'a> UnitReport<'a> {
    fn new(unit: &'a Unit) -> Self {
        Self {
            name: unit.name(),
            origin: unit.origin().as_str(),
            interface: unit.is_interface(),
            dependencies: unit.dependencies(),
            payload_len: unit.payload().len(),
        }
    }

    fn to_line(&self) -> String {
        let kind = if self.interface { "interface" } else { "unit" };
        format!(
            "{}\t{}\t{}\t{} bytes",
            self.name, self.origin, kind, self.payload_len
        )
    }
}

fn handle_load(
    project: &ProjectConfig,
    logger: Arc<Logger>,
    names: &[String],
    link: bool,
    json: bool,
) -> Result<(), CliError> {
    let loader = UnitLoader::<ImageHost>::from_project(project, logger)?;
    for name in names {
        let unit = loader.load_unit(name, link)?;
        let report = UnitReport::new(&unit);
        if json {
            println!("{}", serde_json::to_string(&report).map_err(CliError::Json)?);
        } else {
            println!("{}", report.to_line());
        }
    }
    tracing::info!(
        target: "shade::cli",
        "Resolved {} unit(s), {} materialized locally",
        names.len(),
        loader.cache_size()
    );
    Ok(())
}

fn handle_resource(project: &ProjectConfig, logger: Arc<Logger>, names: &[String]) -> Result<(), CliError> {
    let loader = UnitLoader::<ImageHost>::from_project(project, logger)?;
    for name in names {
        match loader.resolve_resource(name) {
            Some(location) => match location.to_uri() {
                Some(uri) => println!("{name}\t{uri}"),
                None => println!("{name}\t{}", location.path().display()),
            },
            None => println!("{name}\tabsent"),
        }
    }
    Ok(())
}

fn handle_pack(
    name: String,
    deps: Vec<String>,
    interface: bool,
    payload: PathBuf,
    output: PathBuf,
) -> Result<(), CliError> {
    let bytes = std::fs::read(&payload).map_err(|source| CliError::Read {
        path: payload.clone(),
        source,
    })?;

    let mut writer = ImageWriter::new(name).interface(interface).payload(bytes);
    for dep in deps {
        writer = writer.dependency(dep);
    }
    let image = writer.finish()?;

    std::fs::write(&output, &image).map_err(|source| CliError::Write {
        path: output.clone(),
        source,
    })?;
    tracing::info!(target: "shade::cli", "Wrote {} ({} bytes)", output.display(), image.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shade_core::{LoadError, Origin, UnitImage};

    #[test]
    fn test_parse_load_command() {
        let cli = Cli::try_parse_from([
            "shade", "--path", "lib", "--path", "vendor", "load", "pkg.X", "pkg.Y", "--link",
        ])
        .unwrap();
        assert_eq!(cli.paths, vec!["lib", "vendor"]);
        assert_eq!(cli.log_format, LogFormat::Compact);
        match cli.command {
            Command::Load { names, link, json } => {
                assert_eq!(names, vec!["pkg.X", "pkg.Y"]);
                assert!(link);
                assert!(!json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_load_requires_names() {
        assert!(Cli::try_parse_from(["shade", "load"]).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let cli = Cli::try_parse_from([
            "shade", "--path", "first", "--host-path", "sys", "--log-level", "debug", "resource", "a.txt",
        ])
        .unwrap();
        let mut project = ProjectConfig::default();
        project.loader.search_path = vec!["lib".to_string()];

        apply_overrides(&mut project, &cli).unwrap();
        assert_eq!(project.loader.search_path, vec!["first", "lib"]);
        assert_eq!(project.host.search_path, vec!["sys"]);
        assert_eq!(project.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_unknown_log_level() {
        let cli = Cli::try_parse_from(["shade", "--log-level", "loud", "resource", "a"]).unwrap();
        let mut project = ProjectConfig::default();
        assert!(matches!(
            apply_overrides(&mut project, &cli),
            Err(CliError::UnknownLogLevel(_))
        ));
    }

    #[test]
    fn test_pack_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let payload = dir.path().join("body.bin");
        std::fs::write(&payload, b"body").unwrap();
        let output = dir.path().join("pkg").join("X.unit");
        std::fs::create_dir_all(output.parent().unwrap()).unwrap();

        handle_pack(
            "pkg.X".to_string(),
            vec!["sys.Core".to_string()],
            false,
            payload,
            output.clone(),
        )
        .unwrap();
        let image = UnitImage::parse(&std::fs::read(&output).unwrap()).unwrap();
        assert_eq!(image.dependencies, vec!["sys.Core"]);

        let mut project = ProjectConfig::default();
        project.loader.search_path = vec![dir.path().to_string_lossy().to_string()];
        let loader = UnitLoader::<ImageHost>::from_project(&project, Logger::noop()).unwrap();
        let unit = loader.resolve_unit("pkg.X").unwrap();
        assert_eq!(unit.origin(), Origin::Defined);
        assert_eq!(unit.payload(), b"body");

        let report = UnitReport::new(&unit);
        assert_eq!(report.to_line(), "pkg.X\tdefined\tunit\t4 bytes");
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["dependencies"][0], "sys.Core");
        assert_eq!(json["payload_len"], 4);
    }

    #[test]
    fn test_load_without_search_path_fails() {
        let project = ProjectConfig::default();
        let err: CliError = UnitLoader::<ImageHost>::from_project(&project, Logger::noop())
            .unwrap_err()
            .into();
        assert!(matches!(err, CliError::Load(LoadError::InvalidConfiguration(_))));
    }
}
