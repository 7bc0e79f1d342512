//! milkstd Status Tool
//!
//! Provides runtime status information about the milkstd service.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Calculator usage instructions for AI assistants
pub const STANDARDIZATION_INSTRUCTIONS: &str = r#"
# Milk Standardization Instructions

This guide explains how to use the milkstd tools to standardize milk fat with
the Pearson Square method.

## What the calculation does

Raw milk is richer in fat than the target. Skim milk is leaner. Blending the two
brings the mix to the target fat %. The Pearson Square gives the proportions:

- Raw parts  = target fat % - skim fat %
- Skim parts = raw fat % - target fat %
- Skim milk to add = raw volume × (skim parts / raw parts)
- Total standardized milk = raw volume + skim milk to add

**Example:** 1000 L of 4.0% raw milk, 0.2% skim, 3.0% target
- Raw parts = 2.8, skim parts = 1.0 → mixing ratio 2.8:1.0
- Skim milk required = 1000 × 1.0 / 2.8 = 357.14 L
- Total = 1357.14 L

## Rules the inputs must follow

1. Target fat % must be **less than** raw milk fat %
2. Target fat % must be **greater than** skim milk fat %
3. Raw milk volume must be **greater than 0** (liters)
4. All four fields must be numbers (JSON numbers or numeric text like "4.0")

Only the first broken rule is reported. Fix it and call again.

## Tools

| Tool | Use |
|------|-----|
| `default_standardization_inputs` | Reset values (4.0 / 0.2 / 3.0 / 1000) |
| `calculate_standardization` | Compute skim volume, total volume and mixing ratio |
| `generate_standardization_report` | Same calculation plus a printable PDF report |
| `milkstd_status` | Build, report directory and process info |

## Reports

- `user_name` and `company_name` are **required** for reports
- `output_path` is optional; by default reports go to the report directory as
  `milk_standardization_YYYYMMDD_HHMMSS.pdf` (`_2`, `_3`, ... if that name is taken)
- `diagram_path` optionally saves the Pearson Square diagram as a PNG

## Display rounding

- Fat percentages and ratio parts: 1 decimal place
- Skim and total volumes: 2 decimal places
- Raw volume: whole liters

Full-precision values are returned in `result` alongside the rounded `display`.
"#;

/// Runtime status of the milkstd service
#[derive(Debug, Clone, Serialize)]
pub struct MilkStdStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Report directory information
    pub report_directory: String,
    pub reports_on_disk: usize,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    report_directory: PathBuf,
}

/// Count PDF files directly inside `dir`; a missing directory holds none
fn count_reports(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| {
                    e.path()
                        .extension()
                        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                        .unwrap_or(false)
                })
                .count()
        })
        .unwrap_or(0)
}

impl StatusTracker {
    pub fn new(report_directory: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            report_directory,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> MilkStdStatus {
        let build_info = BuildInfo::current();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        MilkStdStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            report_directory: self.report_directory.display().to_string(),
            reports_on_disk: count_reports(&self.report_directory),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
