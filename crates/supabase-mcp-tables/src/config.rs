//! Connection configuration for the Supabase MCP server process.

use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::errors::ClientError;

/// Environment variable naming the Supabase service endpoint.
pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";

/// Environment variable holding the personal access token.
pub const ENV_SUPABASE_ACCESS_TOKEN: &str = "SUPABASE_ACCESS_TOKEN";

/// Environment variable naming the target project.
pub const ENV_PROJECT_ID: &str = "PROJECT_ID";

/// Validated connection configuration. Built once at startup, used to launch
/// the server process, and dropped at exit.
#[derive(Debug)]
pub struct Config {
    /// The Supabase service endpoint, forwarded to the server process
    /// exactly as supplied.
    pub supabase_url: String,

    /// The access token forwarded to the server process. Redacted in
    /// `Debug` output.
    pub access_token: SecretString,

    /// The project whose tables are listed.
    pub project_id: String,
}

impl Config {
    /// Validate the three required values. Empty strings count as missing so
    /// an exported-but-blank variable never reaches the server process. The
    /// endpoint must parse as a URL; the original string is what gets
    /// forwarded, so validation never changes the value.
    pub fn new(
        supabase_url: Option<String>,
        access_token: Option<String>,
        project_id: Option<String>,
    ) -> Result<Self, ClientError> {
        let supabase_url = require(supabase_url, ENV_SUPABASE_URL)?;
        Url::parse(&supabase_url)?;
        let access_token = require(access_token, ENV_SUPABASE_ACCESS_TOKEN)?;
        let project_id = require(project_id, ENV_PROJECT_ID)?;

        Ok(Self {
            supabase_url,
            access_token: SecretString::from(access_token),
            project_id,
        })
    }

    /// Environment for the server process: a copy of the parent environment
    /// with the endpoint and access token inserted last, so the overrides
    /// win over any inherited values of the same name.
    pub fn server_environment(
        &self,
        parent: impl IntoIterator<Item = (String, String)>,
    ) -> HashMap<String, String> {
        let mut env: HashMap<String, String> = parent.into_iter().collect();
        env.insert(ENV_SUPABASE_URL.to_string(), self.supabase_url.clone());
        env.insert(
            ENV_SUPABASE_ACCESS_TOKEN.to_string(),
            self.access_token.expose_secret().to_string(),
        );
        env
    }
}

fn require(value: Option<String>, name: &str) -> Result<String, ClientError> {
    value
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ClientError::EnvironmentVariable(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn config() -> Config {
        Config::new(
            Some("https://example.supabase.co".to_string()),
            Some("sbp_0102030405".to_string()),
            Some("abcdefghijklmnop".to_string()),
        )
        .unwrap()
    }

    #[rstest]
    #[case::url_unset(None, Some("t"), Some("p"), ENV_SUPABASE_URL)]
    #[case::url_empty(Some(""), Some("t"), Some("p"), ENV_SUPABASE_URL)]
    #[case::token_unset(Some("https://example.supabase.co"), None, Some("p"), ENV_SUPABASE_ACCESS_TOKEN)]
    #[case::token_empty(Some("https://example.supabase.co"), Some(""), Some("p"), ENV_SUPABASE_ACCESS_TOKEN)]
    #[case::project_unset(Some("https://example.supabase.co"), Some("t"), None, ENV_PROJECT_ID)]
    #[case::project_empty(Some("https://example.supabase.co"), Some("t"), Some(""), ENV_PROJECT_ID)]
    fn missing_values_name_their_variable(
        #[case] url: Option<&str>,
        #[case] token: Option<&str>,
        #[case] project: Option<&str>,
        #[case] expected: &str,
    ) {
        let err = Config::new(
            url.map(String::from),
            token.map(String::from),
            project.map(String::from),
        )
        .unwrap_err();
        match err {
            ClientError::EnvironmentVariable(name) => assert_eq!(name, expected),
            other => panic!("expected EnvironmentVariable, got {other:?}"),
        }
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let err = Config::new(
            Some("not a url".to_string()),
            Some("t".to_string()),
            Some("p".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::UrlParse(_)));
    }

    #[test]
    fn endpoint_is_kept_verbatim() {
        // `Url` re-serialization would append a trailing slash here.
        let config = config();
        assert_eq!(config.supabase_url, "https://example.supabase.co");
    }

    #[test]
    fn server_environment_is_a_superset_of_the_parent() {
        let parent = vec![
            ("PATH".to_string(), "/usr/bin".to_string()),
            ("HOME".to_string(), "/home/dev".to_string()),
        ];
        let env = config().server_environment(parent);

        assert_eq!(env.get("PATH").map(String::as_str), Some("/usr/bin"));
        assert_eq!(env.get("HOME").map(String::as_str), Some("/home/dev"));
        assert_eq!(
            env.get(ENV_SUPABASE_URL).map(String::as_str),
            Some("https://example.supabase.co")
        );
        assert_eq!(
            env.get(ENV_SUPABASE_ACCESS_TOKEN).map(String::as_str),
            Some("sbp_0102030405")
        );
    }

    #[test]
    fn overrides_win_over_inherited_values() {
        let parent = vec![(
            ENV_SUPABASE_URL.to_string(),
            "https://stale.supabase.co".to_string(),
        )];
        let env = config().server_environment(parent);
        assert_eq!(
            env.get(ENV_SUPABASE_URL).map(String::as_str),
            Some("https://example.supabase.co")
        );
    }

    #[test]
    fn debug_output_redacts_the_access_token() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("sbp_0102030405"));
    }
}
