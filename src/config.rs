use anyhow::Context;
use serde::Deserialize;
use std::{env, fs, path::Path};

pub const DEFAULT_DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3";
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4";

/// Connection settings for the Drive and Sheets APIs.
///
/// The access token is used as-is; obtaining and refreshing it is left to
/// whatever launches the server.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServiceConfig {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_drive_base_url")]
    pub drive_base_url: String,
    #[serde(default = "default_sheets_base_url")]
    pub sheets_base_url: String,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_drive_base_url() -> String {
    DEFAULT_DRIVE_BASE_URL.to_string()
}

fn default_sheets_base_url() -> String {
    DEFAULT_SHEETS_BASE_URL.to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            drive_base_url: default_drive_base_url(),
            sheets_base_url: default_sheets_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl ServiceConfig {
    /// Load from a JSON file when a path is given, from the environment otherwise.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::from_env(),
        }
    }

    /// Read a JSON config file. `${VAR}` references in string values are
    /// replaced with the environment variable's value.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg: ServiceConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg.expand(|name| env::var(name).ok()))
    }

    /// Read `GOOGLE_ACCESS_TOKEN`, `GDRIVE_BASE_URL`, `SHEETS_BASE_URL` and
    /// `GOOGLE_REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut cfg = Self::default();

        cfg.access_token = lookup("GOOGLE_ACCESS_TOKEN").filter(|t| !t.is_empty());
        if let Some(url) = lookup("GDRIVE_BASE_URL") {
            cfg.drive_base_url = url;
        }
        if let Some(url) = lookup("SHEETS_BASE_URL") {
            cfg.sheets_base_url = url;
        }
        if let Some(raw) = lookup("GOOGLE_REQUEST_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("GOOGLE_REQUEST_TIMEOUT_SECS must be an integer, got `{}`", raw))?;
            cfg.request_timeout_secs = Some(secs);
        }

        Ok(cfg)
    }

    fn expand(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(token) = self.access_token.as_mut() {
            *token = expand_env_vars(token, &lookup);
        }
        self.drive_base_url = expand_env_vars(&self.drive_base_url, &lookup);
        self.sheets_base_url = expand_env_vars(&self.sheets_base_url, &lookup);
        self.access_token = self.access_token.filter(|t| !t.is_empty());
        self
    }
}

/// Replace `${NAME}` with `lookup(NAME)`. Unknown names are left untouched.
fn expand_env_vars(input: &str, lookup: &impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next(); // consume '{'
            let mut name = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                name.push(c);
            }
            match lookup(&name) {
                Some(val) => out.push_str(&val),
                None => {
                    out.push_str("${");
                    out.push_str(&name);
                    out.push('}');
                }
            }
        } else {
            out.push(ch);
        }
    }

    out
}
