use std::fs;
use std::io::Read;
use std::path::Path;

use crate::cmd::InspectArgs;
use crate::exit::{io_error, CliResult, SUCCESS};
use crate::output::{print_report, EolReport, OutputFormat};

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let (path, data) = if args.input == Path::new("-") {
        let mut raw = Vec::new();
        std::io::stdin()
            .read_to_end(&mut raw)
            .map_err(|err| io_error("reading stdin", err))?;
        ("<stdin>".to_string(), raw)
    } else {
        let raw = fs::read(&args.input)
            .map_err(|err| io_error(&format!("reading {}", args.input.display()), err))?;
        (args.input.display().to_string(), raw)
    };

    let report = census(&path, &data);
    print_report(&report, format);
    Ok(SUCCESS)
}

fn census(path: &str, data: &[u8]) -> EolReport {
    let mut crlf = 0usize;
    let mut lone_lf = 0usize;
    let mut lone_cr = 0usize;

    let mut i = 0;
    while i < data.len() {
        match data[i] {
            b'\r' if data.get(i + 1) == Some(&b'\n') => {
                crlf += 1;
                i += 2;
                continue;
            }
            b'\r' => lone_cr += 1,
            b'\n' => lone_lf += 1,
            _ => {}
        }
        i += 1;
    }

    EolReport {
        path: path.to_string(),
        bytes: data.len(),
        crlf,
        lone_lf,
        lone_cr,
        convention: convention(crlf, lone_lf, lone_cr),
    }
}

fn convention(crlf: usize, lone_lf: usize, lone_cr: usize) -> &'static str {
    if crlf == 0 && lone_lf == 0 && lone_cr == 0 {
        return "none";
    }
    let max = crlf.max(lone_lf).max(lone_cr);
    let dominant = if max == crlf {
        "crlf"
    } else if max == lone_lf {
        "lf"
    } else {
        "cr"
    };
    let kinds = [crlf, lone_lf, lone_cr].iter().filter(|&&n| n > 0).count();
    if kinds > 1 {
        "mixed"
    } else {
        dominant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_each_terminator_kind_once() {
        let report = census("t", b"a\r\nb\nc\rd");
        assert_eq!(report.crlf, 1);
        assert_eq!(report.lone_lf, 1);
        assert_eq!(report.lone_cr, 1);
        assert_eq!(report.convention, "mixed");
    }

    #[test]
    fn crlf_is_not_double_counted_as_lone_bytes() {
        let report = census("t", b"line1\r\nline2\r\n");
        assert_eq!(report.crlf, 2);
        assert_eq!(report.lone_lf, 0);
        assert_eq!(report.lone_cr, 0);
        assert_eq!(report.convention, "crlf");
    }

    #[test]
    fn terminator_free_input_reports_none() {
        let report = census("t", b"no newline here");
        assert_eq!(report.convention, "none");
    }

    #[test]
    fn pure_lf_input_reports_lf() {
        let report = census("t", b"a\nb\nc\n");
        assert_eq!(report.convention, "lf");
    }
}
