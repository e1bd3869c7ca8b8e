use anyhow::{Result, anyhow};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

use webreader::http::{build_api_request, format_raw_request};
use webreader::mcp::run_mcp_server;
use webreader::output::format_result;
use webreader::telemetry::init_tracing;
use webreader::{
    Cli, ExtractionRequest, ExtractionResult, Reader, ReaderConfig, ReaderError, TracingTelemetry,
};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = ReaderConfig::from_cli(&cli);
    let reader = Reader::from_config(config, Arc::new(TracingTelemetry))?;

    // If --mcp flag is set, run in MCP server mode
    if cli.mcp {
        tracing::info!("Starting MCP server on stdio");
        run_mcp_server(cli, reader).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let url = cli
        .url
        .as_deref()
        .ok_or_else(|| anyhow!("A URL is required unless --mcp is set"))?;
    let api_key = cli
        .api_key
        .as_deref()
        .ok_or_else(|| anyhow!("An API key is required (--api-key or READER_API_KEY)"))?;

    let request = ExtractionRequest::builder(url, api_key)
        .method(cli.method)
        .format(cli.format)
        .include_images(cli.include_images)
        .include_videos(cli.include_videos)
        .include_position(cli.include_position)
        .link_summary(cli.link_summary)
        .only_css_selectors(&cli.only_css_selectors)
        .wait_css_selectors(&cli.wait_css_selectors)
        .exclude_css_selectors(&cli.exclude_css_selectors)
        .build();

    let result = match request {
        Ok(request) => {
            if cli.include_req {
                match build_api_request(&reader.config().api_base, &request) {
                    Ok(api_request) => eprintln!(
                        "[Raw Request]\n{}\n",
                        format_raw_request(&api_request, cli.http2, Some(&cli.headers))
                    ),
                    Err(err) => tracing::warn!("Cannot print request: {}", err),
                }
            }
            reader.read(&request).await
        }
        Err(err) => {
            tracing::error!("Invalid request: {}", err);
            ExtractionResult::from(ReaderError::from(err))
        }
    };
    println!("{}", format_result(&result, !cli.no_color));

    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
