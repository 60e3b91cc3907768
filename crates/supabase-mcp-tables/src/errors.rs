use rmcp::ServiceError;
use url::ParseError;

/// An error in the table-listing client.
///
/// Variants fall into three classes: configuration (detected before any
/// connection attempt), connection (launching the server process or the
/// session handshake), and protocol (the remote call itself). Parse problems
/// in tool output are not errors; they are recovered while rendering.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Missing environment variable: {0}")]
    EnvironmentVariable(String),

    #[error("Invalid Supabase URL: {0}")]
    UrlParse(#[from] ParseError),

    #[error("Could not launch the tool server process: {0}")]
    ServerLaunch(#[from] std::io::Error),

    #[error("Could not initialize the MCP session: {0}")]
    McpInitialize(Box<dyn std::error::Error + Send + Sync>),

    #[error("Tool call failed: {0}")]
    ToolCall(#[from] ServiceError),
}

impl ClientError {
    /// Process exit status when the error reaches the top level.
    /// Configuration errors exit 1; connection and protocol errors exit 2.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::EnvironmentVariable(_) | Self::UrlParse(_) => 1,
            Self::ServerLaunch(_) | Self::McpInitialize(_) | Self::ToolCall(_) => 2,
        }
    }
}
