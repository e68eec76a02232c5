use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use particlefield::headless::{self, SimulationOptions};
use particlefield::io::load_config;
use particlefield::site::{self, PageOptions};

mod server;

/// Interactive 2D particle field backgrounds
#[derive(Parser)]
#[command(name = "particlefield")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the configuration after merging overrides over the defaults
    Resolve {
        /// Override file (.json, .yaml, .yml); defaults only when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: Format,
    },
    /// Run the simulation without a browser and print a JSON summary
    Simulate {
        /// Override file (.json, .yaml, .yml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "800")]
        width: f64,

        #[arg(long, default_value = "600")]
        height: f64,

        /// Number of frames to run
        #[arg(long, default_value = "60")]
        frames: u32,

        /// Random seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Pointer position held for the whole run, as X,Y
        #[arg(long, value_parser = parse_point)]
        pointer: Option<(f64, f64)>,

        /// Click delivered before the first frame, as X,Y (repeatable)
        #[arg(long, value_parser = parse_point)]
        click: Vec<(f64, f64)>,
    },
    /// Render a demo page that mounts the field
    Build {
        /// Override file (.json, .yaml, .yml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Page title
        #[arg(long, default_value = "particlefield")]
        title: String,
    },
    /// Build, then serve the page and rebuild when the config changes
    Serve {
        /// Override file (.json, .yaml, .yml)
        #[arg(short, long)]
        config: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Port to run the server on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Page title
        #[arg(long, default_value = "particlefield")]
        title: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

fn parse_point(text: &str) -> Result<(f64, f64), String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{text}'"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x '{x}': {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y '{y}': {e}"))?;
    Ok((x, y))
}

fn page_options(title: String) -> PageOptions {
    PageOptions {
        title,
        ..PageOptions::default()
    }
}

fn resolve(config: Option<&Path>, format: Format) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let text = match format {
        Format::Json => serde_json::to_string_pretty(&config)?,
        Format::Yaml => serde_yaml::to_string(&config)?,
    };
    println!("{}", text.trim_end());
    Ok(())
}

fn simulate(config: Option<&Path>, options: &SimulationOptions) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let summary = headless::simulate(config, options);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn build(config: Option<&Path>, output: &Path, page: &PageOptions) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let index = site::build(&config, output, page)?;
    println!("Built {}", index.display());
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Resolve { config, format } => resolve(config.as_deref(), format)?,
        Commands::Simulate {
            config,
            width,
            height,
            frames,
            seed,
            pointer,
            click,
        } => {
            let options = SimulationOptions {
                width,
                height,
                frames,
                seed,
                pointer,
                clicks: click,
                ..SimulationOptions::default()
            };
            simulate(config.as_deref(), &options)?;
        }
        Commands::Build {
            config,
            output,
            title,
        } => build(config.as_deref(), &output, &page_options(title))?,
        Commands::Serve {
            config,
            output,
            port,
            title,
        } => server::serve(&config, &output, port, page_options(title)).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_requires_a_subcommand() {
        assert!(Cli::try_parse_from(["particlefield"]).is_err());
    }

    #[test]
    fn cli_parses_resolve_with_defaults() {
        let cli = Cli::try_parse_from(["particlefield", "resolve"]).unwrap();
        match cli.command {
            Commands::Resolve { config, format } => {
                assert!(config.is_none());
                assert_eq!(format, Format::Json);
            }
            _ => panic!("Expected Resolve command"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn cli_parses_simulate_subcommand() {
        let cli = Cli::try_parse_from([
            "particlefield",
            "simulate",
            "--config",
            "field.yaml",
            "--frames",
            "5",
            "--pointer",
            "10,20",
            "--click",
            "1,2",
            "--click",
            "3, 4",
            "-v",
        ])
        .unwrap();
        match cli.command {
            Commands::Simulate {
                config,
                width,
                frames,
                pointer,
                click,
                ..
            } => {
                assert_eq!(config, Some(PathBuf::from("field.yaml")));
                assert_eq!(width, 800.0);
                assert_eq!(frames, 5);
                assert_eq!(pointer, Some((10.0, 20.0)));
                assert_eq!(click, vec![(1.0, 2.0), (3.0, 4.0)]);
            }
            _ => panic!("Expected Simulate command"),
        }
        assert!(cli.verbose);
    }

    #[test]
    fn cli_parses_serve_subcommand() {
        let cli = Cli::try_parse_from([
            "particlefield",
            "serve",
            "--config",
            "field.json",
            "--port",
            "8080",
        ])
        .unwrap();
        match cli.command {
            Commands::Serve {
                config,
                output,
                port,
                ..
            } => {
                assert_eq!(config, PathBuf::from("field.json"));
                assert_eq!(output, PathBuf::from("output"));
                assert_eq!(port, 8080);
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn cli_parses_yaml_format() {
        let cli = Cli::try_parse_from(["particlefield", "resolve", "--format", "yaml"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Resolve {
                format: Format::Yaml,
                ..
            }
        ));
    }

    #[test]
    fn point_parser_rejects_malformed_input() {
        assert_eq!(parse_point("1.5,2"), Ok((1.5, 2.0)));
        assert!(parse_point("12").is_err());
        assert!(parse_point("a,2").is_err());
    }
}
