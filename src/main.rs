use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};

use dashgraph::{csv_writer, parser, render, AnalyticsPayload, OutputFormat, OutputOptions, View};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "dashgraph")]
#[command(about = "Derive chart-ready series from an analytics payload read on stdin", long_about = None)]
struct Args {
    /// View to render: brand, packtype, ppg, cross or correlation
    #[arg(default_value = "brand")]
    view: String,

    /// Active filters (e.g., 'brand: "Acme Cola", year: 2023')
    #[arg(short, long)]
    filter: Option<String>,

    /// Output format (overrides the options file)
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// JSON file with output options and selectable filter values
    #[arg(long)]
    options: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let mut options = match &args.options {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read options file '{}'", path))?;
            OutputOptions::from_json(&text).context("Failed to parse options file")?
        }
        None => OutputOptions::default(),
    };
    if let Some(format) = args.format {
        options.format = format.into();
    }
    options.pretty |= args.pretty;

    let view: View = args.view.parse()?;
    let selection = parser::parse_filter_selection(args.filter.as_deref().unwrap_or(""))?;
    if let Some(choices) = &options.choices {
        selection.validate(choices)?;
    }

    // Read payload from stdin
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read payload from stdin")?;
    let payload = AnalyticsPayload::parse(&input).context("Failed to parse analytics payload")?;

    let output = render(&payload, &selection, view)
        .with_context(|| format!("Failed to render view '{}'", view))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match options.format {
        OutputFormat::Json => {
            let json = if options.pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }
            .context("Failed to serialize view")?;
            writeln!(handle, "{}", json).context("Failed to write to stdout")?;
        }
        OutputFormat::Csv => csv_writer::write_view(&output, &mut handle)?,
    }
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
