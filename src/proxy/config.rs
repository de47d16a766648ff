use serde::{Deserialize, Serialize};
use std::fmt;

const DEFAULT_BASE_URL: &str = "https://your-domain.atlassian.net";
const DEFAULT_PROJECT_KEY: &str = "CRM";
const DEFAULT_BCF_FIELD: &str = "customfield_10000";
const DEFAULT_LOGIN_URL: &str =
    "https://via.bund.de/bmdv/bim-portal/edu/bim/infrastruktur/api/v1/public/auth/login";

/// Jira account the bridge acts as.
///
/// Loaded once at startup and shared read-only. `Debug` never prints the
/// email or the token.
#[derive(Clone, Serialize, Deserialize)]
pub struct JiraCredentials {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub api_token: String,
    #[serde(default = "default_project_key")]
    pub project_key: String,
}

impl Default for JiraCredentials {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            email: String::new(),
            api_token: String::new(),
            project_key: default_project_key(),
        }
    }
}

impl fmt::Debug for JiraCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraCredentials")
            .field("base_url", &self.base_url)
            .field("email", &redacted(&self.email))
            .field("api_token", &redacted(&self.api_token))
            .field("project_key", &self.project_key)
            .finish()
    }
}

fn redacted(value: &str) -> &'static str {
    if value.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl JiraCredentials {
    /// Both email and token must be present before any Jira call is made.
    pub fn is_configured(&self) -> bool {
        !self.email.is_empty() && !self.api_token.is_empty()
    }

    /// Browsable URL of an issue
    pub fn issue_url(&self, issue_key: &str) -> String {
        format!("{}/browse/{}", self.base_url, issue_key)
    }

    /// REST endpoint under `/rest/api/{version}/`
    pub fn rest_url(&self, version: &str, path: &str) -> String {
        format!("{}/rest/api/{}/{}", self.base_url, version, path)
    }
}

/// 桥接服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub jira: JiraCredentials,

    /// Custom field that receives the BCF reference.
    /// Instance specific; check the target Jira's field schema.
    #[serde(default = "default_bcf_field")]
    pub bcf_field: String,

    /// Portal endpoint that `/api/login` forwards to
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// 上游请求超时时间(秒)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 是否允许局域网访问
    /// - false: 仅本机访问 127.0.0.1
    /// - true: 允许局域网访问 0.0.0.0（默认，浏览器客户端通常不在本机）
    #[serde(default = "default_allow_lan")]
    pub allow_lan_access: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            jira: JiraCredentials::default(),
            bcf_field: default_bcf_field(),
            login_url: default_login_url(),
            request_timeout: default_request_timeout(),
            port: default_port(),
            allow_lan_access: default_allow_lan(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_project_key() -> String {
    DEFAULT_PROJECT_KEY.to_string()
}

fn default_bcf_field() -> String {
    DEFAULT_BCF_FIELD.to_string()
}

fn default_login_url() -> String {
    DEFAULT_LOGIN_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_port() -> u16 {
    5001
}

fn default_allow_lan() -> bool {
    true
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl BridgeConfig {
    /// 获取实际的监听地址
    pub fn get_bind_address(&self) -> &str {
        if self.allow_lan_access {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        }
    }

    /// Apply overrides from an environment-style lookup.
    ///
    /// Unset variables leave the current value alone. Malformed numbers are
    /// reported instead of silently falling back.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("JIRA_BASE_URL") {
            self.jira.base_url = value;
        }
        if let Some(value) = lookup("JIRA_EMAIL") {
            self.jira.email = value;
        }
        if let Some(value) = lookup("JIRA_API_TOKEN") {
            self.jira.api_token = value;
        }
        if let Some(value) = lookup("JIRA_PROJECT_KEY") {
            self.jira.project_key = value;
        }
        if let Some(value) = lookup("JIRA_BCF_FIELD") {
            self.bcf_field = value;
        }
        if let Some(value) = lookup("PORTAL_LOGIN_URL") {
            self.login_url = value;
        }
        if let Some(value) = lookup("JIRA_BRIDGE_TIMEOUT") {
            self.request_timeout = value
                .trim()
                .parse()
                .map_err(|e| format!("Invalid JIRA_BRIDGE_TIMEOUT {:?}: {}", value, e))?;
        }
        if let Some(value) = lookup("JIRA_BRIDGE_PORT") {
            self.port = value
                .trim()
                .parse()
                .map_err(|e| format!("Invalid JIRA_BRIDGE_PORT {:?}: {}", value, e))?;
        }
        if let Some(value) = lookup("JIRA_BRIDGE_ALLOW_LAN") {
            self.allow_lan_access = is_truthy(&value);
        }

        self.normalize();
        Ok(())
    }

    fn normalize(&mut self) {
        let trimmed = self.jira.base_url.trim().trim_end_matches('/').to_string();
        self.jira.base_url = trimmed;
        if self.request_timeout == 0 {
            self.request_timeout = default_request_timeout();
        }
    }
}
