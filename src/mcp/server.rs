use anyhow::Result;
use async_trait::async_trait;
use clap::ValueEnum;
use rust_mcp_sdk::mcp_server::{ServerHandler, ServerRuntime, server_runtime};
use rust_mcp_sdk::schema::schema_utils::CallToolError;
use rust_mcp_sdk::schema::{
    CallToolRequest, CallToolResult, Implementation, InitializeResult, LATEST_PROTOCOL_VERSION,
    ListToolsRequest, ListToolsResult, RpcError, ServerCapabilities, ServerCapabilitiesTools,
    TextContent, Tool,
};
use rust_mcp_sdk::{McpServer, StdioTransport, TransportOptions};
use serde_json::{Map, Value, json};
use std::sync::Arc;

use crate::model::ExtractionRequest;
use crate::processor::Reader;
use crate::types::{Cli, OutputFormat, RequestMethod};

const TOOL_NAME: &str = "read_url";

/// Run the MCP (Model Context Protocol) server
pub async fn run_mcp_server(cli: Cli, reader: Reader) -> Result<()> {
    let server_details = InitializeResult {
        server_info: Implementation {
            name: "webreader".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            title: Some("Web Page Reader".to_string()),
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools { list_changed: None }),
            ..Default::default()
        },
        meta: None,
        instructions: Some(
            "Extract a web page through the Reader API and save it locally.".to_string(),
        ),
        protocol_version: LATEST_PROTOCOL_VERSION.to_string(),
    };

    let transport = StdioTransport::new(TransportOptions::default())
        .map_err(|e| anyhow::anyhow!("Failed to create stdio transport: {}", e))?;

    let handler = ReaderServerHandler {
        default_api_key: cli.api_key.clone(),
        reader: Arc::new(reader),
    };

    let server: Arc<ServerRuntime> =
        server_runtime::create_server(server_details, transport, handler);
    server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

/// Handler exposing the reader as a single MCP tool
struct ReaderServerHandler {
    default_api_key: Option<String>,
    reader: Arc<Reader>,
}

#[async_trait]
impl ServerHandler for ReaderServerHandler {
    async fn handle_list_tools_request(
        &self,
        _request: ListToolsRequest,
        _runtime: Arc<dyn McpServer>,
    ) -> std::result::Result<ListToolsResult, RpcError> {
        Ok(ListToolsResult {
            tools: vec![Tool {
                name: TOOL_NAME.to_string(),
                description: Some("Extract the content of a web page through the Reader API, save it under the output directory and return the saved path followed by the content. Failures are returned as a diagnostic message.".to_string()),
                input_schema: create_tool_input_schema(),
                annotations: None,
                meta: None,
                output_schema: None,
                title: Some("Read Web Page".to_string()),
            }],
            meta: None,
            next_cursor: None,
        })
    }

    async fn handle_call_tool_request(
        &self,
        request: CallToolRequest,
        _runtime: Arc<dyn McpServer>,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        if request.tool_name() != TOOL_NAME {
            return Err(CallToolError::unknown_tool(format!(
                "Unknown tool: {}",
                request.tool_name()
            )));
        }

        let args = request.params.arguments.as_ref().ok_or_else(|| {
            CallToolError::new(
                RpcError::invalid_params().with_message("Missing arguments".to_string()),
            )
        })?;

        let extraction = extract_tool_request(args, self.default_api_key.as_deref())
            .map_err(|message| CallToolError::new(RpcError::invalid_params().with_message(message)))?;

        let result = self.reader.read(&extraction).await;

        Ok(CallToolResult::text_content(vec![TextContent::from(
            result.to_string(),
        )]))
    }
}

fn bool_arg(args: &Map<String, Value>, key: &str, default: bool) -> bool {
    args.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
}

/// Selectors may arrive as an array of strings or as one comma-separated string.
fn selector_arg(args: &Map<String, Value>, key: &str) -> Vec<String> {
    match args.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(|s| s.to_string()))
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Build an extraction request from tool arguments
fn extract_tool_request(
    args: &Map<String, Value>,
    default_api_key: Option<&str>,
) -> std::result::Result<ExtractionRequest, String> {
    let url = args
        .get("url")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "url parameter must be a string".to_string())?;

    let api_key = args
        .get("api_key")
        .and_then(|v| v.as_str())
        .or(default_api_key)
        .ok_or_else(|| {
            "api_key is required (pass it or start the server with --api-key)".to_string()
        })?;

    let method = match args.get("method").and_then(|v| v.as_str()) {
        Some(name) => RequestMethod::from_str(name.trim(), true)
            .map_err(|_| format!("Unsupported method '{}', expected GET or POST", name))?,
        None => RequestMethod::default(),
    };

    let format = match args.get("format").and_then(|v| v.as_str()) {
        Some(name) => OutputFormat::from_str(name.trim(), true)
            .map_err(|_| format!("Unsupported format '{}'", name))?,
        None => OutputFormat::default(),
    };

    ExtractionRequest::builder(url, api_key)
        .method(method)
        .format(format)
        .include_images(bool_arg(args, "include_images", true))
        .include_videos(bool_arg(args, "include_videos", false))
        .include_position(bool_arg(args, "include_position", false))
        .link_summary(bool_arg(args, "link_summary", false))
        .only_css_selectors(selector_arg(args, "only_css_selectors"))
        .wait_css_selectors(selector_arg(args, "wait_css_selectors"))
        .exclude_css_selectors(selector_arg(args, "exclude_css_selectors"))
        .build()
        .map_err(|e| e.to_string())
}

fn property(kind: &str, description: &str) -> Map<String, Value> {
    let mut prop = Map::new();
    prop.insert("type".to_string(), json!(kind));
    prop.insert("description".to_string(), json!(description));
    prop
}

fn string_array_property(description: &str) -> Map<String, Value> {
    let mut prop = property("array", description);
    prop.insert("items".to_string(), json!({ "type": "string" }));
    prop
}

/// Create input schema for the read_url tool
fn create_tool_input_schema() -> rust_mcp_sdk::schema::ToolInputSchema {
    use std::collections::HashMap;

    let mut properties = HashMap::new();
    properties.insert(
        "url".to_string(),
        property("string", "Web page to extract (e.g., 'https://example.com/article')."),
    );
    properties.insert(
        "api_key".to_string(),
        property("string", "Reader API key. Defaults to the key the server was started with."),
    );

    let mut method = property("string", "Request method used to call the Reader API. Defaults to GET.");
    method.insert("enum".to_string(), json!(["GET", "POST"]));
    properties.insert("method".to_string(), method);

    let mut format = property("string", "Output format. Defaults to markdown.");
    format.insert("enum".to_string(), json!(["markdown", "md", "text", "txt", "json"]));
    properties.insert("format".to_string(), format);

    properties.insert(
        "include_images".to_string(),
        property("boolean", "Include images in the extracted content. Defaults to true."),
    );
    properties.insert(
        "include_videos".to_string(),
        property("boolean", "Include videos in the extracted content. Defaults to false."),
    );
    properties.insert(
        "include_position".to_string(),
        property("boolean", "Include element position information. Defaults to false."),
    );
    properties.insert(
        "link_summary".to_string(),
        property("boolean", "Append a summary of the links found on the page. Defaults to false."),
    );
    properties.insert(
        "only_css_selectors".to_string(),
        string_array_property("Only keep content matching these CSS selectors (e.g., [\"article\", \".content\"])."),
    );
    properties.insert(
        "wait_css_selectors".to_string(),
        string_array_property("Wait for these CSS selectors before extracting."),
    );
    properties.insert(
        "exclude_css_selectors".to_string(),
        string_array_property("Drop content matching these CSS selectors."),
    );

    const REQUIRED_FIELDS: &[&str] = &["url"];
    rust_mcp_sdk::schema::ToolInputSchema::new(
        REQUIRED_FIELDS.iter().map(|s| s.to_string()).collect(),
        Some(properties),
    )
}
