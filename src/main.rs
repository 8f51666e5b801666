//! Diet Log
//!
//! An MCP server for daily food, exercise and weight tracking.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use dietlog::build_info;
use dietlog::mcp::DietLogService;
use dietlog::store::DataFiles;
use dietlog::tools::Session;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("dietlog=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let files = DataFiles::from_env();

    // Print startup banner to stderr
    build_info::print_startup_banner(files.dir());
    eprintln!("Starting MCP server on stdio...");

    // Load foods, then exercises, then the log
    let session = Session::open(files)?;
    eprintln!(
        "Loaded {} foods, {} exercises, {} food entries",
        session.foods().len(),
        session.exercises().len(),
        session.log().food_entries().len()
    );

    // Create the Diet Log service
    let service = DietLogService::new(session);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
