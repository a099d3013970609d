//! Process command - read barcode and expiration date from one OCR document.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use fridge_core::ocr::DetectionReader;
use fridge_core::{Detection, ExtractionResult, FridgeConfig, LabelReader};

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input OCR document (JSON), or "-" for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Treat the input as plain text, one OCR line per row
    #[arg(long)]
    plain: bool,

    /// Fail unless both barcode and expiration date are found
    #[arg(long)]
    require_both: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let content = read_input(&args.input)?;
    info!("Processing {}", args.input.display());

    let detections = if args.plain {
        plain_detections(&content)
    } else {
        DetectionReader::new()
            .with_min_confidence(config.input.min_confidence)
            .read(&content)?
    };
    debug!("Loaded {} detections", detections.len());

    let result = LabelReader::from_config(&config.extraction).read(&detections);
    let output = format_result(&result, args.format, &config)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    if args.require_both && !result.is_complete() {
        let reasons: Vec<&str> = result.missing().iter().map(|f| f.missing_message()).collect();
        anyhow::bail!("{}", reasons.join("; "));
    }

    Ok(())
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    Ok(fs::read_to_string(input)?)
}

/// Every row of a plain-text document is one line detection.
pub fn plain_detections(content: &str) -> Vec<Detection> {
    content.lines().map(Detection::line).collect()
}

pub fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    config: &FridgeConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if config.output.pretty => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Json => Ok(serde_json::to_string(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["barcode", "expiration_date", "status"])?;
    wtr.write_record([
        result.barcode.as_deref().unwrap_or_default(),
        result.expiration_date.as_deref().unwrap_or_default(),
        status_label(result).as_str(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    match &result.barcode {
        Some(barcode) => output.push_str(&format!("Barcode:         {}\n", barcode)),
        None => output.push_str("Barcode:         -\n"),
    }
    match &result.expiration_date {
        Some(date) => output.push_str(&format!("Expiration date: {}\n", date)),
        None => output.push_str("Expiration date: -\n"),
    }

    for field in result.missing() {
        output.push_str(&format!("  ! {}\n", field.missing_message()));
    }

    output
}

pub fn status_label(result: &ExtractionResult) -> String {
    serde_json::to_value(result.status())
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_detections() {
        let detections = plain_detections("0123\n4567 8905\nEXP 08/15/2025\n");
        assert_eq!(detections.len(), 3);
        assert!(detections.iter().all(Detection::is_line));
    }

    #[test]
    fn test_format_csv() {
        let result = ExtractionResult::new(Some("0123".into()), None);
        let csv = format_csv(&result).unwrap();
        assert_eq!(csv, "barcode,expiration_date,status\n0123,,missing_expiration\n");
    }

    #[test]
    fn test_format_text_lists_missing() {
        let text = format_text(&ExtractionResult::default());
        assert!(text.contains("Barcode:         -"));
        assert!(text.contains("no expiration date found"));
    }
}
