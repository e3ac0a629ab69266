//! Forest Dash - Forest land-use conversion dashboard
//!
//! Loads the land-use conversion table, slices one row, and shows the
//! category shares as a donut chart: in a browser page, a desktop window,
//! or as SVG/PNG files.

mod charts;
mod config;
mod data;
mod gui;
mod server;

use anyhow::{Context, Result};
use charts::{ChartVariant, DonutFigure, StaticChartRenderer};
use clap::{Parser, Subcommand, ValueEnum};
use config::AppConfig;
use data::{DataLoader, LandUseProcessor, LandUseShares};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file (defaults to ./forest_dash.toml if present)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Land-use CSV to chart, overriding the configured path
    #[arg(short, long, value_name = "CSV", global = true)]
    data: Option<PathBuf>,

    /// Table row to chart, overriding the configured row
    #[arg(short, long, global = true)]
    row: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard page
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
        /// Variant shown when the page has no ?variant=
        #[arg(long)]
        variant: Option<String>,
    },
    /// Write chart files
    Render {
        /// Variant name, or "all"
        #[arg(short, long, default_value = "all")]
        variant: String,
        #[arg(short, long, value_name = "DIR", default_value = "output")]
        out_dir: PathBuf,
        #[arg(short, long, value_enum, default_value_t = Format::Svg)]
        format: Format,
        /// Open the written files with the system viewer
        #[arg(long)]
        open: bool,
    },
    /// Open the desktop viewer
    View {
        #[arg(long)]
        variant: Option<String>,
    },
    /// Print the chart figure as JSON
    Inspect {
        #[arg(long)]
        variant: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Svg,
    Png,
}

impl Format {
    fn extension(&self) -> &'static str {
        match self {
            Format::Svg => "svg",
            Format::Png => "png",
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut app_config = AppConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.data {
        app_config.data.path = path;
    }
    if let Some(row) = cli.row {
        app_config.data.row = row;
    }

    match cli.command {
        Commands::Serve {
            host,
            port,
            variant,
        } => {
            if let Some(host) = host {
                app_config.server.host = host;
            }
            if let Some(port) = port {
                app_config.server.port = port;
            }
            if let Some(variant) = variant {
                app_config.chart.variant = variant;
            }

            let shares = load_shares(&app_config.data.path, app_config.data.row)?;
            tokio::runtime::Runtime::new()
                .context("Failed to start async runtime")?
                .block_on(server::start_server(&app_config, shares))?;
        }
        Commands::Render {
            variant,
            out_dir,
            format,
            open,
        } => {
            let shares = load_shares(&app_config.data.path, app_config.data.row)?;
            let variants = parse_variants(&variant)?;
            let written = render_files(
                &shares,
                &variants,
                &out_dir,
                format,
                (app_config.chart.width, app_config.chart.height),
            )?;

            for path in &written {
                println!("{}", path.display());
                if open {
                    if let Err(e) = open::that(path) {
                        tracing::warn!("could not open {}: {}", path.display(), e);
                    }
                }
            }
        }
        Commands::View { variant } => {
            let variant = match variant {
                Some(name) => ChartVariant::from_name(&name)?,
                None => app_config.chart.variant()?,
            };
            gui::run(gui::InitialState {
                csv_path: app_config.data.path.clone(),
                row: app_config.data.row,
                variant,
                export_size: (app_config.chart.width, app_config.chart.height),
            })
            .map_err(|e| anyhow::anyhow!("viewer failed: {}", e))?;
        }
        Commands::Inspect { variant } => {
            let variant = match variant {
                Some(name) => ChartVariant::from_name(&name)?,
                None => app_config.chart.variant()?,
            };
            let shares = load_shares(&app_config.data.path, app_config.data.row)?;
            println!("{}", DonutFigure::build(&shares, variant).to_json()?);
        }
    }

    Ok(())
}

/// Read the table and slice the configured row.
fn load_shares(path: &Path, row: usize) -> Result<LandUseShares> {
    let mut loader = DataLoader::new();
    let df = loader.load_csv(path)?;
    let shares = LandUseProcessor::prepare_chart_data(df, row)
        .with_context(|| format!("Cannot chart row {} of {}", row, path.display()))?;

    tracing::info!(
        categories = shares.len(),
        total_ha = shares.total(),
        "chart data prepared"
    );
    Ok(shares)
}

fn parse_variants(name: &str) -> Result<Vec<ChartVariant>> {
    if name.eq_ignore_ascii_case("all") {
        Ok(ChartVariant::ALL.to_vec())
    } else {
        Ok(vec![ChartVariant::from_name(name)?])
    }
}

/// Render each variant in parallel into `out_dir`, returning the written paths.
fn render_files(
    shares: &LandUseShares,
    variants: &[ChartVariant],
    out_dir: &Path,
    format: Format,
    (width, height): (u32, u32),
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    variants
        .par_iter()
        .map(|variant| {
            let figure = DonutFigure::build(shares, *variant);
            let path = out_dir.join(format!(
                "forest_land_use_{}.{}",
                variant.name(),
                format.extension()
            ));
            StaticChartRenderer::save(&figure, &path, width, height)
                .with_context(|| format!("Failed to render {} chart", variant.name()))?;
            Ok::<_, anyhow::Error>(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "Region,Period,Total converted (ha),Production grassland,Built-up area,Wetland,Cropland,Grassland with woody biomass\n\
                          Ireland,1990-2016,1000,450,150,200,50,150\n";

    #[test]
    fn loads_sample_and_slices_categories() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let shares = load_shares(file.path(), 0).unwrap();
        assert_eq!(
            shares.labels,
            vec![
                "Production grassland",
                "Built-up area",
                "Wetland",
                "Cropland",
                "Grassland with woody biomass"
            ]
        );
        assert_eq!(shares.total(), 1000.0);
    }

    #[test]
    fn bad_row_reports_context() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let err = load_shares(file.path(), 4).unwrap_err();
        assert!(err.to_string().contains("Cannot chart row 4"));
    }

    #[test]
    fn parses_all_or_single_variant() {
        assert_eq!(parse_variants("all").unwrap().len(), 4);
        assert_eq!(parse_variants("Earth").unwrap(), vec![ChartVariant::Earth]);
        assert!(parse_variants("neon").is_err());
    }

    #[test]
    fn renders_every_variant_to_svg() {
        let shares = LandUseShares {
            labels: vec!["Wetland".to_string(), "Cropland".to_string()],
            values: vec![3.0, 1.0],
        };
        let dir = tempfile::tempdir().unwrap();

        let written = render_files(
            &shares,
            &ChartVariant::ALL,
            dir.path(),
            Format::Svg,
            (900, 700),
        )
        .unwrap();

        assert_eq!(written.len(), 4);
        assert!(written.iter().all(|p| p.is_file()));
        assert!(dir.path().join("forest_land_use_pastel.svg").is_file());
    }
}
