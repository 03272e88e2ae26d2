use bulletbar::render::raster::{RasterError, RasterOptions};
use bulletbar::render::{BulletChart, ChartError, SvgSurface, layout_bullet_chart};
use bulletbar::{Aggregation, ChartConfig, records_from_json, summarize};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Usage(&'static str),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Input(#[from] bulletbar::Error),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Aggregate,
    Layout,
    Render,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    width: f64,
    height: f64,
    config: Option<String>,
    chart_id: Option<String>,
    out: Option<String>,
}

#[derive(Serialize)]
struct LayoutOut<'a> {
    aggregation: &'a Aggregation,
    layout: &'a bulletbar::render::BulletChartLayout,
}

fn usage() -> &'static str {
    "bulletbar-cli\n\
\n\
USAGE:\n\
  bulletbar-cli [aggregate] [--pretty] [<path>|-]\n\
  bulletbar-cli layout [--pretty] [--width <w>] [--height <h>] [--config <json>|<path>] [<path>|-]\n\
  bulletbar-cli render [--format svg|png] [--scale <n>] [--background <css-color>] [--width <w>] [--height <h>] [--config <json>|<path>] [--id <chart-id>] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - Input is a JSON array of {\"bed_type\", \"status\", \"counts\"} records.\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - --config takes inline JSON overrides (e.g. '{\"bullet\":{\"barHeight\":14}}') or a file path.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG output defaults to writing next to the input file (or ./out.png for stdin).\n\
  - Set RUST_LOG=debug for aggregation/layout traces on stderr.\n\
"
}

fn usage_error() -> CliError {
    CliError::Usage(usage())
}

fn flag_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a str, CliError> {
    it.next().map(String::as_str).ok_or_else(usage_error)
}

fn parse_number<T: FromStr>(text: &str) -> Result<T, CliError> {
    text.trim().parse().map_err(|_| usage_error())
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        width: 400.0,
        height: 200.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--help" | "-h" => return Err(usage_error()),
            "aggregate" => args.command = Command::Aggregate,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--format" => {
                args.render_format = flag_value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| usage_error())?;
            }
            "--scale" => {
                let scale: f32 = parse_number(flag_value(&mut it)?)?;
                if !(scale.is_finite() && scale > 0.0) {
                    return Err(usage_error());
                }
                args.render_scale = scale;
            }
            "--background" => {
                let bg = flag_value(&mut it)?.trim();
                args.background = (!bg.is_empty()).then(|| bg.to_string());
            }
            "--width" => args.width = parse_number(flag_value(&mut it)?)?,
            "--height" => args.height = parse_number(flag_value(&mut it)?)?,
            "--config" => args.config = Some(flag_value(&mut it)?.to_string()),
            "--id" => args.chart_id = Some(flag_value(&mut it)?.to_string()),
            "--out" => args.out = Some(flag_value(&mut it)?.to_string()),
            flag if flag.starts_with('-') && flag != "-" => return Err(usage_error()),
            path if args.input.is_none() => args.input = Some(path.to_string()),
            _ => return Err(usage_error()),
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    let text = match input {
        Some(path) if path != "-" => std::fs::read_to_string(path)?,
        _ => std::io::read_to_string(std::io::stdin())?,
    };
    Ok(text)
}

fn load_config(raw: Option<&str>) -> Result<ChartConfig, CliError> {
    let Some(raw) = raw else {
        return Ok(ChartConfig::default());
    };
    let text = if raw.trim_start().starts_with('{') {
        raw.to_string()
    } else {
        std::fs::read_to_string(raw)?
    };
    Ok(ChartConfig::from_overrides_json(&text)?)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(stdout, value)?;
    } else {
        serde_json::to_writer(stdout, value)?;
    }
    Ok(())
}

/// PNG target when `--out` is absent: beside the input file, or `./out.png` for stdin.
fn png_out_path(input: Option<&str>) -> PathBuf {
    match input {
        Some(path) if path != "-" => Path::new(path).with_extension("png"),
        _ => PathBuf::from("out.png"),
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let records = records_from_json(&text)?;
    let config = load_config(args.config.as_deref())?;
    let mut chart = BulletChart::with_config(&config)?;
    if let Some(id) = args.chart_id.as_deref() {
        chart = chart.with_chart_id(id);
    }
    tracing::debug!(records = records.len(), "loaded bullet chart input");

    match args.command {
        Command::Aggregate => {
            let aggregation = summarize(&records)?;
            write_json(&aggregation, args.pretty)?;
            Ok(())
        }
        Command::Layout => {
            let aggregation = summarize(&records)?;
            let layout = layout_bullet_chart(
                aggregation.category.as_deref(),
                &aggregation.segments,
                args.width,
                args.height,
                &chart.layout,
            )
            .map_err(ChartError::from)?;
            write_json(
                &LayoutOut {
                    aggregation: &aggregation,
                    layout: &layout,
                },
                args.pretty,
            )?;
            Ok(())
        }
        Command::Render => match args.render_format {
            RenderFormat::Svg => {
                let mut surface = SvgSurface::new(chart.svg.clone());
                chart.update(&records, args.width, args.height, &mut surface)?;
                let svg = surface.to_svg_string();
                match args.out.as_deref() {
                    Some(path) => std::fs::write(path, svg)?,
                    None => print!("{svg}"),
                }
                Ok(())
            }
            RenderFormat::Png => {
                let raster = RasterOptions {
                    scale: args.render_scale,
                    background: args.background.clone(),
                };
                let bytes = chart.render_png_sync(&records, args.width, args.height, &raster)?;
                let out = args
                    .out
                    .as_deref()
                    .map_or_else(|| png_out_path(args.input.as_deref()), PathBuf::from);
                std::fs::write(out, bytes)?;
                Ok(())
            }
        },
    }
}

fn main() {
    init_logging();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
