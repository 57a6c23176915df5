//! CLI entry point for the grade exhibit tool.
//!
//! Provides subcommands for rendering a module's grade distribution exhibit,
//! inspecting the decoded assignment catalog, and printing or appending
//! per-assignment summary statistics.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use grade_exhibit::{
    catalog::parse_catalog,
    config::{Settings, resolve_module},
    output::{append_records, print_json},
    render::render_exhibit,
    stats::module_summary,
    table::RawGradebook,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "grade_exhibit")]
#[command(about = "Render grade distribution exhibits from a gradebook CSV export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a module's grade distribution exhibit as a PNG
    Exhibit {
        /// Path to the gradebook CSV export
        #[arg(long)]
        csv_path: Option<PathBuf>,

        /// Path to write the exhibit PNG to
        #[arg(long)]
        img_path: Option<PathBuf>,

        /// Module for which to create the exhibit
        #[arg(short, long)]
        module: Option<u32>,

        /// Colormap for panel colors (winter, cool, viridis)
        #[arg(long)]
        cmap: Option<String>,

        /// Course description used in the exhibit supertitle
        #[arg(long)]
        course_desc: Option<String>,
    },
    /// Decode and log the assignment catalog across all modules
    Catalog {
        /// Path to the gradebook CSV export
        #[arg(value_name = "CSV_PATH")]
        csv_path: PathBuf,
    },
    /// Print one module's distribution statistics as JSON
    Summary {
        /// Path to the gradebook CSV export
        #[arg(value_name = "CSV_PATH")]
        csv_path: PathBuf,

        /// Module for which to compute statistics
        #[arg(short, long)]
        module: Option<u32>,

        /// CSV file to append one stats row per assignment to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/grade_exhibit.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("grade_exhibit.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Exhibit {
            csv_path,
            img_path,
            module,
            cmap,
            course_desc,
        } => {
            let settings = Settings::resolve(csv_path, img_path, module, cmap, course_desc)?;
            info!(
                csv_path = %settings.csv_path.display(),
                img_path = %settings.img_path.display(),
                module = settings.module,
                cmap = %settings.cmap,
                "Rendering exhibit"
            );

            let book = RawGradebook::from_path(&settings.csv_path)?;
            let summary = module_summary(&book, settings.module)?;
            let written = render_exhibit(
                &summary,
                &settings.course_desc,
                &settings.cmap,
                &settings.img_path,
            )?;
            println!("Exhibit written to {}", written.display());
        }
        Commands::Catalog { csv_path } => {
            let book = RawGradebook::from_path(&csv_path)?;
            let catalog = parse_catalog(&book).context("failed to decode gradebook header")?;

            info!(entries = catalog.len(), "Catalog decoded");
            for entry in &catalog {
                info!(
                    module = entry.module,
                    assignment = entry.assignment,
                    desc = %entry.desc,
                    possible = entry.possible,
                    "Assignment"
                );
            }
        }
        Commands::Summary {
            csv_path,
            module,
            output,
        } => {
            let module = resolve_module(module)?;
            let book = RawGradebook::from_path(&csv_path)?;
            let summary = module_summary(&book, module)?;

            print_json(&summary)?;
            if let Some(output) = output {
                let output = output.to_string_lossy();
                append_records(&output, &summary)
                    .with_context(|| format!("failed to append stats to `{output}`"))?;
            }
        }
    }

    Ok(())
}
