use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, ValueEnum};

use crate::config::load_config;
use crate::layout::{Orientation, compute_layout};
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::record::NodeRecord;
use crate::render::{render_svg_sized, write_output_svg};

#[derive(Parser, Debug)]
#[command(name = "oclr", version, about = "Org-chart layout engine and renderer")]
pub struct Args {
    /// Input records file (JSON array of {id, parentId, kind}) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG/JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Growth direction: top, bottom, left, right, left-top, right-top
    #[arg(long = "orientation")]
    pub orientation: Option<String>,

    /// Right-to-left text placement inside nodes
    #[arg(long = "rtl")]
    pub rtl: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(token) = args.orientation.as_deref() {
        let Some(orientation) = Orientation::from_token(token) else {
            return Err(anyhow::anyhow!("unknown orientation `{token}`"));
        };
        config.chart.orientation = orientation;
    }
    if args.rtl {
        config.chart.rtl = true;
    }

    let records = read_records(args.input.as_deref())?;
    let layout = compute_layout(&records, &config.chart)?;
    for warning in &layout.warnings {
        eprintln!("warning: {warning}");
    }

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg_sized(
                &layout,
                &config.resolved_theme(),
                &config.chart,
                &config.render,
            );
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Json => match args.output.as_deref() {
            Some(path) => write_layout_dump(path, &layout, &config.chart)?,
            None => {
                let dump = LayoutDump::from_layout(&layout, &config.chart);
                serde_json::to_writer_pretty(io::stdout().lock(), &dump)?;
                println!();
            }
        },
        OutputFormat::Png => {
            #[cfg(feature = "png")]
            {
                let svg = render_svg_sized(
                    &layout,
                    &config.resolved_theme(),
                    &config.chart,
                    &config.render,
                );
                let output = ensure_output(&args.output, "png")?;
                crate::render::write_output_png(&svg, &output, &config.render)?;
            }
            #[cfg(not(feature = "png"))]
            return Err(anyhow::anyhow!("built without the `png` feature"));
        }
    }

    Ok(())
}

fn read_records(path: Option<&Path>) -> Result<Vec<NodeRecord>> {
    let contents = match path {
        Some(path) if path == Path::new("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let records: Vec<NodeRecord> = serde_json::from_str(&contents)?;
    Ok(records)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
