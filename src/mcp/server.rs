//! milkstd MCP Server Implementation
//!
//! Implements the MCP server with the milk standardization tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::tools::calculator::{self, CalculationResponse, FieldValues};
use crate::tools::reports::{GenerateReportResponse, ReportError};
use crate::tools::status::StatusTracker;

/// milkstd MCP Service
#[derive(Clone)]
pub struct MilkStdService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    report_directory: PathBuf,
    tool_router: ToolRouter<MilkStdService>,
}

impl MilkStdService {
    pub fn new(report_directory: PathBuf) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(report_directory.clone()))),
            report_directory,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateStandardizationReportParams {
    /// Name of the person preparing the report (required)
    pub user_name: String,
    /// Company name (required)
    pub company_name: String,
    #[serde(flatten)]
    pub fields: FieldValues,
    /// Full path for the PDF (optional, defaults to the report directory)
    pub output_path: Option<String>,
    /// Also save the Pearson Square diagram as PNG at this path (optional)
    pub diagram_path: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReportRejectedResponse {
    success: bool,
    error_kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
    message: String,
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Validation failures are a normal tool result the client can act on;
/// file and PDF failures are server errors.
fn report_outcome(result: Result<GenerateReportResponse, ReportError>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(resp) => to_json(&resp),
        Err(ReportError::Validation(e)) => {
            tracing::warn!("Report rejected: {}", e);
            to_json(&ReportRejectedResponse {
                success: false,
                error_kind: e.kind(),
                field: e.field(),
                message: e.to_string(),
            })
        }
        Err(e) => {
            tracing::error!("Report generation failed: {}", e);
            Err(McpError::internal_error(e.to_string(), None))
        }
    }
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl MilkStdService {
    // --- Status ---

    #[tool(description = "Get the current status of the milkstd service including build info, report directory, and process information")]
    async fn milkstd_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status())
    }

    #[tool(description = "Get instructions for milk standardization: input rules, the Pearson Square formula, and how to produce reports. Call this when unsure how to use the calculator tools.")]
    fn standardization_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::STANDARDIZATION_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(STANDARDIZATION_INSTRUCTIONS)]))
    }

    // --- Calculator ---

    #[tool(description = "Get the default calculator inputs (4.0% raw, 0.2% skim, 3.0% target, 1000 L)")]
    fn default_standardization_inputs(&self) -> Result<CallToolResult, McpError> {
        to_json(&calculator::default_inputs())
    }

    #[tool(description = "Compute how much skim milk to add to raw milk to reach a target fat % (Pearson Square). Returns full-precision values and rounded display strings, or success=false with the first validation error.")]
    fn calculate_standardization(&self, Parameters(fields): Parameters<FieldValues>) -> Result<CallToolResult, McpError> {
        let response: CalculationResponse = calculator::calculate_standardization(&fields);
        to_json(&response)
    }

    #[tool(description = "Compute a milk standardization and write a printable PDF report (Pearson Square method). Requires user_name and company_name.")]
    fn generate_standardization_report(&self, Parameters(p): Parameters<GenerateStandardizationReportParams>) -> Result<CallToolResult, McpError> {
        report_outcome(calculator::generate_report(
            &p.user_name,
            &p.company_name,
            &p.fields,
            p.output_path.as_deref(),
            p.diagram_path.as_deref(),
            &self.report_directory,
        ))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for MilkStdService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "milkstd".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Milk Standardization Manager".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Milk Standardization Manager - Pearson Square milk fat standardization. \
                 Call standardization_instructions first if unsure. \
                 Calculator: default_standardization_inputs, calculate_standardization. \
                 Reports: generate_standardization_report (requires user_name and company_name). \
                 Status: milkstd_status."
                    .into(),
            ),
        }
    }
}
