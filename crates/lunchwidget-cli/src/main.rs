mod pipeline;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lunchwidget_core::{AppConfig, ConfigError};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lunchwidget")]
#[command(about = "Builds the lunch widget from restaurant listings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where restaurant rows come from. At most one may be given; each
/// command has its own default.
#[derive(Debug, Default, Args)]
#[group(multiple = false)]
struct SourceArgs {
    /// Read the lunch export found in this directory
    #[arg(long)]
    input_dir: Option<PathBuf>,
    /// Scrape the online restaurant directory at this URL
    #[arg(long)]
    directory_url: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Enrich restaurants and render them through the widget template
    Widget {
        #[command(flatten)]
        source: SourceArgs,
        /// Template with a `{% for item in items %}` loop
        #[arg(long)]
        template: Option<PathBuf>,
        /// Where to write the rendered widget
        #[arg(long)]
        output: Option<PathBuf>,
        /// Maximum restaurants to process (0 = all)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Enrich restaurants and inject them into the app's data assignment
    Inject {
        #[command(flatten)]
        source: SourceArgs,
        /// HTML document holding the `let <variable> = [...];` assignment
        #[arg(long)]
        host_document: Option<PathBuf>,
        /// Name of the data variable to replace
        #[arg(long)]
        variable: Option<String>,
    },
}

/// `RUST_LOG` first, then the configured level, then `info`.
fn build_env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Logs a configuration error; the run stops without a failing exit code.
fn usable_config(loaded: Result<AppConfig, ConfigError>) -> Option<AppConfig> {
    match loaded {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            None
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let loaded = lunchwidget_core::load_app_config();

    let log_level = loaded.as_ref().map_or("info", |config| config.log_level.as_str());
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(log_level))
        .init();

    let Some(config) = usable_config(loaded) else {
        return;
    };

    match cli.command {
        Commands::Widget {
            source,
            template,
            output,
            limit,
        } => {
            let run = pipeline::WidgetRun {
                source: pipeline::resolve_source(&source, &config, false),
                template: template.unwrap_or_else(|| config.template_path.clone()),
                output: output.unwrap_or_else(|| config.output_path.clone()),
                limit: limit.unwrap_or(config.record_limit),
            };
            pipeline::run_widget(&config, &run).await;
        }
        Commands::Inject {
            source,
            host_document,
            variable,
        } => {
            let run = pipeline::InjectRun {
                source: pipeline::resolve_source(&source, &config, true),
                host_document: host_document.unwrap_or_else(|| config.host_document_path.clone()),
                variable: variable.unwrap_or_else(|| config.data_variable.clone()),
            };
            pipeline::run_inject(&config, &run).await;
        }
    }
}
