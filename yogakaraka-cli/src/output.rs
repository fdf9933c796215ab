use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::path::Path;
use yogakaraka_core::{ChartInput, RunFingerprint, Stats, YogaResult};

/// What the output file carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Results,
    Report,
    Full,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "results" => Ok(OutputFormat::Results),
            "report" => Ok(OutputFormat::Report),
            "full" => Ok(OutputFormat::Full),
            other => Err(anyhow!("unknown output format '{other}' (expected results, report or full)")),
        }
    }
}

#[derive(Serialize)]
struct FullOutput<'a> {
    captured_at: String,
    fingerprint: &'a RunFingerprint,
    fingerprint_hash: String,
    results: &'a [YogaResult],
    report: &'a Stats,
}

/// Read a chart from JSON, or YAML when the extension is .yaml/.yml
pub fn load_chart(path: &str) -> Result<ChartInput> {
    let content = std::fs::read_to_string(path).with_context(|| format!("failed to read chart {path}"))?;
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    let input = match extension.as_deref() {
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&content).with_context(|| format!("failed to parse chart {path}"))?
        }
        _ => serde_json::from_str(&content).with_context(|| format!("failed to parse chart {path}"))?,
    };
    Ok(input)
}

pub fn render(
    format: OutputFormat,
    results: &[YogaResult],
    report: &Stats,
    fingerprint: &RunFingerprint,
) -> Result<String> {
    let json = match format {
        OutputFormat::Results => serde_json::to_string_pretty(results)?,
        OutputFormat::Report => serde_json::to_string_pretty(report)?,
        OutputFormat::Full => serde_json::to_string_pretty(&FullOutput {
            captured_at: chrono::Utc::now().to_rfc3339(),
            fingerprint,
            fingerprint_hash: fingerprint.to_hash(),
            results,
            report,
        })?,
    };
    Ok(json)
}

/// Write to `path`, or stdout when no path is given
pub fn save_output(rendered: &str, path: Option<&str>) -> Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, rendered).with_context(|| format!("failed to write {p}"))?;
            println!("💾 Results saved to: {p}");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("full".parse::<OutputFormat>().unwrap(), OutputFormat::Full);
        assert_eq!("results".parse::<OutputFormat>().unwrap(), OutputFormat::Results);
        assert!("graph".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_missing_chart_file() {
        let err = load_chart("/nonexistent/chart.json").unwrap_err();
        assert!(err.to_string().contains("failed to read chart"));
    }
}
