//! MCP session against the Supabase tool server, spawned as a child process.

use rmcp::{
    RoleClient, ServiceExt,
    model::{CallToolRequestParam, CallToolResult, ClientCapabilities, ClientInfo, Implementation},
    service::RunningService,
    transport::{ConfigureCommandExt, TokioChildProcess},
};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::ClientError;

/// Command used to launch the Supabase MCP server.
pub const SERVER_COMMAND: &str = "npx";

/// npm package implementing the Supabase MCP server.
pub const SERVER_PACKAGE: &str = "@supabase/mcp-server-supabase@latest";

/// Name of the remote table-listing tool.
pub const LIST_TABLES_TOOL: &str = "list_tables";

/// A live MCP session. Owns the communication channel and the server
/// process; both are released by [`McpSession::shutdown`] or on drop.
pub struct McpSession {
    service: RunningService<RoleClient, ClientInfo>,
}

impl McpSession {
    /// Launch the server process and perform the session handshake. The
    /// child gets the parent environment with the Supabase endpoint and
    /// access token applied last.
    pub async fn connect(config: &Config) -> Result<Self, ClientError> {
        let env = config.server_environment(std::env::vars());
        info!("Launching {SERVER_COMMAND} {SERVER_PACKAGE}");

        let transport = TokioChildProcess::new(Command::new(SERVER_COMMAND).configure(|cmd| {
            cmd.arg(SERVER_PACKAGE);
            cmd.env_clear();
            cmd.envs(&env);
        }))?;

        let service = client_info()
            .serve(transport)
            .await
            .map_err(|e| ClientError::McpInitialize(e.into()))?;

        info!("MCP session established");
        debug!("{:#?}", service.peer_info());

        Ok(Self { service })
    }

    /// Invoke `list_tables` for the given project. Attempted exactly once;
    /// a failure is reported, never retried.
    pub async fn list_tables(&self, project_id: &str) -> Result<CallToolResult, ClientError> {
        debug!("Calling {LIST_TABLES_TOOL} for project {project_id}");
        Ok(self
            .service
            .call_tool(CallToolRequestParam {
                name: LIST_TABLES_TOOL.into(),
                arguments: serde_json::json!({ "project_id": project_id })
                    .as_object()
                    .cloned(),
            })
            .await?)
    }

    /// Close the session and, with it, the channel and the server process.
    /// A teardown failure is logged and otherwise ignored.
    pub async fn shutdown(self) {
        if let Err(e) = self.service.cancel().await {
            warn!("MCP session did not shut down cleanly: {e}");
        }
    }
}

fn client_info() -> ClientInfo {
    ClientInfo {
        protocol_version: Default::default(),
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: "supabase-mcp-tables".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_contract_is_npx_with_a_single_package_argument() {
        assert_eq!(SERVER_COMMAND, "npx");
        assert_eq!(SERVER_PACKAGE, "@supabase/mcp-server-supabase@latest");
        assert!(!SERVER_PACKAGE.contains(' '));
    }

    #[test]
    fn tool_arguments_carry_the_project_id() {
        let arguments = serde_json::json!({ "project_id": "abcdefghijklmnop" })
            .as_object()
            .cloned();
        let arguments = arguments.unwrap();
        assert_eq!(arguments.len(), 1);
        assert_eq!(
            arguments.get("project_id").and_then(|v| v.as_str()),
            Some("abcdefghijklmnop")
        );
    }

    #[test]
    fn client_info_reports_this_crate() {
        let info = client_info();
        assert_eq!(info.client_info.name, "supabase-mcp-tables");
        assert_eq!(info.client_info.version, env!("CARGO_PKG_VERSION"));
    }
}
