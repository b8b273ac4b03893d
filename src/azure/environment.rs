use anyhow::{bail, Result};

/// Endpoints for one Azure cloud
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureEnvironment {
    pub name: String,
    pub active_directory_endpoint: String,
    pub resource_manager_endpoint: String,
}

pub const PUBLIC_CLOUD: &str = "AzurePublicCloud";

const CLOUDS: &[(&str, &str, &str, &str)] = &[
    (
        PUBLIC_CLOUD,
        "public",
        "https://login.microsoftonline.com/",
        "https://management.azure.com/",
    ),
    (
        "AzureUSGovernmentCloud",
        "usgovernment",
        "https://login.microsoftonline.us/",
        "https://management.usgovcloudapi.net/",
    ),
    (
        "AzureChinaCloud",
        "china",
        "https://login.chinacloudapi.cn/",
        "https://management.chinacloudapi.cn/",
    ),
    (
        "AzureGermanCloud",
        "german",
        "https://login.microsoftonline.de/",
        "https://management.microsoftazure.de/",
    ),
];

impl AzureEnvironment {
    pub fn public() -> Self {
        Self::from_entry(&CLOUDS[0])
    }

    fn from_entry((full, _, ad, rm): &(&str, &str, &str, &str)) -> Self {
        Self {
            name: full.to_string(),
            active_directory_endpoint: ad.to_string(),
            resource_manager_endpoint: rm.to_string(),
        }
    }

    /// Look up a cloud by name or short alias, ignoring case
    pub fn from_name(name: &str) -> Result<Self> {
        let wanted = name.trim();
        if let Some(entry) = CLOUDS.iter().find(|(full, alias, ..)| {
            wanted.eq_ignore_ascii_case(full) || wanted.eq_ignore_ascii_case(alias)
        }) {
            return Ok(Self::from_entry(entry));
        }

        let known: Vec<&str> = CLOUDS.iter().map(|(full, ..)| *full).collect();
        bail!(
            "Unknown Azure environment '{}'. Available: {}",
            name,
            known.join(", ")
        )
    }

    /// Override either endpoint, e.g. for Azure Stack or a local mock
    pub fn with_endpoints(
        mut self,
        active_directory_endpoint: Option<String>,
        resource_manager_endpoint: Option<String>,
    ) -> Self {
        if let Some(ad) = active_directory_endpoint {
            self.active_directory_endpoint = ensure_trailing_slash(ad);
        }
        if let Some(rm) = resource_manager_endpoint {
            self.resource_manager_endpoint = ensure_trailing_slash(rm);
        }
        self
    }

    /// OAuth2 token endpoint for a tenant
    pub fn token_url(&self, tenant_id: &str) -> String {
        format!(
            "{}{}/oauth2/token",
            self.active_directory_endpoint,
            urlencoding::encode(tenant_id)
        )
    }
}

impl Default for AzureEnvironment {
    fn default() -> Self {
        Self::public()
    }
}

fn ensure_trailing_slash(url: String) -> String {
    if url.ends_with('/') {
        url
    } else {
        format!("{}/", url)
    }
}
