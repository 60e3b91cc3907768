use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use std::process::ExitCode;
use supabase_mcp_tables::client::McpSession;
use supabase_mcp_tables::config::Config;
use supabase_mcp_tables::errors::ClientError;
use supabase_mcp_tables::tables;
use tracing::{Level, warn};
use tracing_subscriber::EnvFilter;

/// Clap styling
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Arguments to the table lister
#[derive(Debug, clap::Parser)]
#[command(
    styles = STYLES,
    about = "List the tables of a Supabase project through the Supabase MCP server",
)]
struct Args {
    /// The Supabase service endpoint
    #[clap(env = "SUPABASE_URL", long)]
    supabase_url: Option<String>,

    /// The Supabase personal access token, forwarded to the MCP server
    #[clap(env = "SUPABASE_ACCESS_TOKEN", long, hide_env_values = true)]
    supabase_access_token: Option<String>,

    /// The project whose tables are listed
    #[clap(env = "PROJECT_ID", long)]
    project_id: Option<String>,

    /// The log level for diagnostics on stderr
    #[arg(long = "log", short = 'l', default_value_t = Level::INFO)]
    log_level: Level,
}

impl Args {
    fn config(self) -> Result<Config, ClientError> {
        Config::new(self.supabase_url, self.supabase_access_token, self.project_id)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Diagnostics go to stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(args.log_level.into()))
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Failures are part of the report and land on stdout too.
            println!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(args: Args) -> Result<(), ClientError> {
    let config = args.config()?;

    println!("Starting Supabase MCP client via SDK...");
    println!("Target Project ID: {}", config.project_id);
    println!();

    let session = McpSession::connect(&config).await?;

    println!("Calling list_tables tool...");
    println!();

    let outcome = session.list_tables(&config.project_id).await;
    session.shutdown().await;
    let result = outcome?;

    if result.is_error == Some(true) {
        warn!("Server flagged the tool result as an error");
    }

    print!("{}", tables::render_call_result(&result));
    Ok(())
}
