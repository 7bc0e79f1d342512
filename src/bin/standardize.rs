//! Command line milk standardization
//! Usage: cargo run --bin standardize -- <raw_fat> <skim_fat> <target_fat> <raw_volume>
//!        [--user NAME --company NAME [--report PATH] [--diagram PATH]]

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use milkstd::config;
use milkstd::standardization::{compute, StandardizationDisplay, StandardizationInput};
use milkstd::tools::calculator::{self, FieldValues, NumberInput};
use milkstd::tools::reports::ReportError;

/// Invalid input or missing preparer
const EXIT_VALIDATION: u8 = 1;
/// Report or diagram file could not be written; usage errors exit with 2 from clap
const EXIT_REPORT: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "standardize")]
#[command(about = "Pearson Square milk standardization: how much skim milk to add")]
#[command(allow_negative_numbers = true)]
struct Args {
    /// Raw milk fat %
    raw_fat: String,

    /// Skim milk fat %
    skim_fat: String,

    /// Target fat %
    target_fat: String,

    /// Raw milk volume in liters
    raw_volume: String,

    /// Name of the person preparing the report
    #[arg(long, requires = "company")]
    user: Option<String>,

    /// Company name for the report
    #[arg(long, requires = "user")]
    company: Option<String>,

    /// Write the PDF report here instead of the report directory
    #[arg(long, requires = "user")]
    report: Option<String>,

    /// Also save the Pearson Square diagram as PNG
    #[arg(long, requires = "user")]
    diagram: Option<String>,
}

/// Print the result block only
fn print_result(args: &Args) -> u8 {
    let outcome = StandardizationInput::parse(&args.raw_fat, &args.skim_fat, &args.target_fat, &args.raw_volume)
        .and_then(|input| compute(&input).map(|result| StandardizationDisplay::new(&input, &result)));

    match outcome {
        Ok(display) => {
            print!("{}", display.to_text());
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_VALIDATION
        }
    }
}

fn write_report(args: &Args, user: &str, company: &str, report_dir: &Path) -> u8 {
    let fields = FieldValues {
        raw_fat_pct: NumberInput::Text(args.raw_fat.clone()),
        skim_fat_pct: NumberInput::Text(args.skim_fat.clone()),
        target_fat_pct: NumberInput::Text(args.target_fat.clone()),
        raw_volume_l: NumberInput::Text(args.raw_volume.clone()),
    };

    match calculator::generate_report(
        user,
        company,
        &fields,
        args.report.as_deref(),
        args.diagram.as_deref(),
        report_dir,
    ) {
        Ok(resp) => {
            print!("{}", resp.results.to_text());
            println!("Calculated on {}", resp.calculated_on);
            println!("Report: {}", resp.file_path);
            println!("{}", resp.message);
            0
        }
        Err(ReportError::Validation(e)) => {
            eprintln!("Error: {}", e);
            EXIT_VALIDATION
        }
        Err(e) => {
            eprintln!("Report failed: {}", e);
            EXIT_REPORT
        }
    }
}

fn run(args: &Args, report_dir: &Path) -> u8 {
    match (args.user.as_deref(), args.company.as_deref()) {
        (Some(user), Some(company)) => write_report(args, user, company, report_dir),
        _ => print_result(args),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = config::init_logging() {
        eprintln!("Logging disabled: {}", e);
    }

    ExitCode::from(run(&args, &config::report_directory()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("standardize").chain(list.iter().copied()))
    }

    fn temp_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("milkstd-cli-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_positional_only() {
        let a = args(&["4.0", "0.2", "3.0", "1000"]).unwrap();
        assert_eq!(a.raw_fat, "4.0");
        assert_eq!(a.raw_volume, "1000");
        assert!(a.user.is_none());
    }

    #[test]
    fn test_with_report_options() {
        let a = args(&["--user", "Ana", "4.0", "0.2", "--company", "Valle", "3.0", "1000", "--report", "out.pdf"]).unwrap();
        assert_eq!(a.user.as_deref(), Some("Ana"));
        assert_eq!(a.company.as_deref(), Some("Valle"));
        assert_eq!(a.report.as_deref(), Some("out.pdf"));
        assert_eq!(a.target_fat, "3.0");
    }

    #[test]
    fn test_usage_errors_exit_2() {
        for bad in [
            &["4.0", "0.2", "3.0"][..],
            &["4.0", "0.2", "3.0", "1000", "--user"],
            &["4.0", "0.2", "3.0", "1000", "--user", "Ana"],
            &["4.0", "0.2", "3.0", "1000", "--company", "Valle"],
            &["4.0", "0.2", "3.0", "1000", "--report", "x.pdf"],
            &["4.0", "0.2", "3.0", "1000", "--verbose"],
        ] {
            let err = args(bad).unwrap_err();
            assert_eq!(err.exit_code(), 2, "expected usage error for {:?}", bad);
        }
    }

    #[test]
    fn test_valid_input_exits_0() {
        let a = args(&["4.0", "0.2", "3.0", "1000"]).unwrap();
        assert_eq!(run(&a, &temp_dir("unused")), 0);
    }

    #[test]
    fn test_validation_errors_exit_1() {
        for bad in [
            &["4.0", "0.2", "4.5", "1000"][..],
            &["4.0", "0.2", "3.0", "-5"],
            &["four", "0.2", "3.0", "1000"],
        ] {
            let a = args(bad).unwrap();
            assert_eq!(run(&a, &temp_dir("unused")), EXIT_VALIDATION, "{:?}", bad);
        }
    }

    #[test]
    fn test_report_validation_exits_1_without_writing() {
        let dir = temp_dir("invalid");
        let a = args(&["4.0", "0.2", "3.0", "0", "--user", "Ana", "--company", "Valle"]).unwrap();
        assert_eq!(run(&a, &dir), EXIT_VALIDATION);

        let blank = args(&["4.0", "0.2", "3.0", "1000", "--user", " ", "--company", "Valle"]).unwrap();
        assert_eq!(run(&blank, &dir), EXIT_VALIDATION);
        assert!(!dir.exists());
    }

    #[test]
    fn test_report_written_exits_0() {
        let dir = temp_dir("report");
        let a = args(&["4.0", "0.2", "3.0", "1000", "--user", "Ana", "--company", "Valle"]).unwrap();
        assert_eq!(run(&a, &dir), 0);
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unwritable_report_exits_3() {
        // The report path is an existing directory
        let dir = temp_dir("unwritable");
        std::fs::create_dir_all(&dir).unwrap();
        let target = dir.display().to_string();

        let a = args(&["4.0", "0.2", "3.0", "1000", "--user", "Ana", "--company", "Valle", "--report", &target]).unwrap();
        assert_eq!(run(&a, &dir), EXIT_REPORT);

        std::fs::remove_dir_all(&dir).ok();
    }
}
