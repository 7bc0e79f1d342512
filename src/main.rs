//! Milk Standardization Manager (milkstd)
//!
//! An MCP server for milk fat standardization calculations and reports.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};

use milkstd::mcp::MilkStdService;
use milkstd::{build_info, config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging goes to stderr to not interfere with MCP stdio
    config::init_logging()?;

    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let report_dir = config::report_directory();
    eprintln!("Report directory: {}", report_dir.display());

    std::fs::create_dir_all(&report_dir)?;

    let service = MilkStdService::new(report_dir);

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;

    server.waiting().await?;

    Ok(())
}
