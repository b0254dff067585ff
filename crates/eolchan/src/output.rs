use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Terminator census for one input, as produced by `inspect`.
#[derive(Serialize)]
pub struct EolReport {
    pub path: String,
    pub bytes: usize,
    pub crlf: usize,
    pub lone_lf: usize,
    pub lone_cr: usize,
    pub convention: &'static str,
}

pub fn print_report(report: &EolReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PATH", "BYTES", "CRLF", "LF", "CR", "CONVENTION"])
                .add_row(vec![
                    report.path.clone(),
                    report.bytes.to_string(),
                    report.crlf.to_string(),
                    report.lone_lf.to_string(),
                    report.lone_cr.to_string(),
                    report.convention.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{}: {} bytes, crlf={} lf={} cr={} ({})",
                report.path,
                report.bytes,
                report.crlf,
                report.lone_lf,
                report.lone_cr,
                report.convention
            );
        }
    }
}

pub fn print_raw(data: &[u8]) {
    use std::io::Write;
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}
