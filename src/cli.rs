use crate::config::load_config;
use crate::ir::HostInputs;
use crate::layout::Viewport;
use crate::layout_dump::write_layout_dump;
use crate::parser::{parse_input, parse_quality, parse_strings};
use crate::render::{render_html, render_standalone_svg, write_output_png, write_output_text};
use crate::session::ChartSession;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "fanchart", version, about = "Ancestor fan chart renderer")]
pub struct Args {
    /// Input file (JSON tree or host script) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for text formats if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Quality label table (JSON array), overrides QUALITY from the input
    #[arg(short = 'q', long = "quality")]
    pub quality: Option<PathBuf>,

    /// Translation table (JSON object), overrides STRINGS from the input
    #[arg(short = 's', long = "strings")]
    pub strings: Option<PathBuf>,

    /// Wrapper width
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f32,

    /// Viewport height
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,

    /// Highlight the lineage of this Ahnentafel number
    #[arg(long = "highlight")]
    pub highlight: Option<u64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Html,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    config.render.width = args.width;
    config.render.height = args.height;

    let input = read_input(args.input.as_deref())?;
    let mut inputs = parse_input(&input)?;
    apply_overrides(&mut inputs, args.quality.as_deref(), args.strings.as_deref())?;

    let viewport = Viewport::new(args.width, args.height);
    let Some(mut session) = ChartSession::draw(&inputs, viewport, &config)? else {
        return Err(anyhow::anyhow!("No DATA found in input"));
    };

    if let Some(anum) = args.highlight {
        if session.on_click(anum).is_none() {
            log::warn!("ancestor {anum} is not in the chart, rendering without highlight");
        }
    }

    match args.output_format {
        OutputFormat::Svg => {
            write_output_text(&render_standalone_svg(&session), args.output.as_deref())?;
        }
        OutputFormat::Html => {
            write_output_text(&render_html(&session), args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_output_png(&render_standalone_svg(&session), &output, &config.render)?;
        }
        OutputFormat::Json => {
            write_layout_dump(args.output.as_deref(), &session)?;
        }
    }
    Ok(())
}

fn apply_overrides(
    inputs: &mut HostInputs,
    quality: Option<&Path>,
    strings: Option<&Path>,
) -> Result<()> {
    if let Some(path) = quality {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading quality table {}", path.display()))?;
        inputs.quality = Some(parse_quality(&contents)?);
    }
    if let Some(path) = strings {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading strings table {}", path.display()))?;
        inputs.strings = Some(parse_strings(&contents)?);
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "fanchart",
            "-i",
            "tree.json",
            "-e",
            "html",
            "-w",
            "900",
            "--highlight",
            "6",
        ])
        .unwrap();
        assert_eq!(args.input.as_deref(), Some(Path::new("tree.json")));
        assert_eq!(args.output_format, OutputFormat::Html);
        assert_eq!(args.width, 900.0);
        assert_eq!(args.height, 800.0);
        assert_eq!(args.highlight, Some(6));
    }

    #[test]
    fn png_needs_an_output_path() {
        assert!(ensure_output(&None, "png").is_err());
        let path = PathBuf::from("chart.png");
        assert_eq!(ensure_output(&Some(path.clone()), "png").unwrap(), path);
    }

    #[test]
    fn override_files_replace_host_tables() {
        let dir = std::env::temp_dir().join(format!("fanchart-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let quality = dir.join("quality.json");
        let strings = dir.join("strings.json");
        std::fs::write(&quality, r#"["Unrated", "Poor"]"#).unwrap();
        std::fs::write(&strings, r#"{"Father": "Vater"}"#).unwrap();

        let mut inputs = HostInputs::default();
        apply_overrides(&mut inputs, Some(&quality), Some(&strings)).unwrap();
        assert_eq!(inputs.quality.as_deref().map(|q| q.len()), Some(2));
        assert_eq!(inputs.translations().get("Father"), "Vater");

        std::fs::remove_dir_all(&dir).ok();
    }
}
