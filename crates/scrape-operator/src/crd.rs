//! Custom Resource Definitions for the scrape operator
//!
//! This module defines the `ScrapeConfig` CRD: one resource describes one
//! scrape job, made of any number of service discovery mechanisms plus the
//! authentication and TLS material needed to reach the discovered targets.
//!
//! Credentials never appear in the resource itself. They are referenced
//! through [`SecretKeySelector`]s and resolved by the secret cache before
//! compilation.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind prefix used for job names and secret cache keys of `ScrapeConfig` resources
pub const SCRAPE_CONFIG_KIND_PREFIX: &str = "scrapeConfig";

/// ScrapeConfig custom resource definition
///
/// Each resource compiles into exactly one scrape job named
/// `scrapeConfig/<namespace>/<name>`.
#[derive(CustomResource, Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "monitoring.scrape-operator.dev",
    version = "v1beta1",
    kind = "ScrapeConfig",
    plural = "scrapeconfigs",
    shortname = "scfg",
    namespaced,
    printcolumn = r#"{"name":"Interval", "type":"string", "jsonPath":".spec.scrapeInterval"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeConfigSpec {
    /// Scrape interval override, clamped against the operator-wide bounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_interval: Option<String>,

    /// Per-scrape timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_timeout: Option<String>,

    /// HTTP path to scrape metrics from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Keep labels from the scraped data on conflict
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub honor_labels: Option<bool>,

    /// Keep timestamps from the scraped data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub honor_timestamps: Option<bool>,

    /// Optional HTTP URL parameters
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, Vec<String>>,

    /// URL scheme (http or https)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    /// Follow HTTP 3xx redirects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_redirects: Option<bool>,

    /// Proxy used for scraping the targets
    #[serde(default, rename = "proxyURL", skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,

    /// Per-scrape limit on the number of samples
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_limit: Option<u64>,

    /// Per-scrape limit on the number of unique series
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_limit: Option<u64>,

    /// Label that receives the resource namespace on every scraped series
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforced_namespace_label: Option<String>,

    /// Relabeling rules applied to discovered targets
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relabel_configs: Vec<RelabelConfig>,

    /// Relabeling rules applied to scraped samples
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metric_relabel_configs: Vec<RelabelConfig>,

    /// Basic authentication for scraping the targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<BasicAuth>,

    /// Authorization header for scraping the targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<Authorization>,

    /// OAuth2 client credentials for scraping the targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth2: Option<OAuth2>,

    /// TLS settings for scraping the targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_config: Option<TlsConfig>,

    /// Static target lists
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub static_configs: Vec<StaticConfig>,

    /// File based service discovery
    #[serde(default, rename = "fileSDConfigs", skip_serializing_if = "Vec::is_empty")]
    pub file_sd_configs: Vec<FileSdConfig>,

    /// HTTP based service discovery
    #[serde(default, rename = "httpSDConfigs", skip_serializing_if = "Vec::is_empty")]
    pub http_sd_configs: Vec<HttpSdConfig>,

    /// Kubernetes API service discovery
    #[serde(default, rename = "kubernetesSDConfigs", skip_serializing_if = "Vec::is_empty")]
    pub kubernetes_sd_configs: Vec<KubernetesSdConfig>,

    /// Consul service discovery
    #[serde(default, rename = "consulSDConfigs", skip_serializing_if = "Vec::is_empty")]
    pub consul_sd_configs: Vec<ConsulSdConfig>,

    /// DNS service discovery
    #[serde(default, rename = "dnsSDConfigs", skip_serializing_if = "Vec::is_empty")]
    pub dns_sd_configs: Vec<DnsSdConfig>,

    /// AWS EC2 service discovery
    #[serde(default, rename = "ec2SDConfigs", skip_serializing_if = "Vec::is_empty")]
    pub ec2_sd_configs: Vec<Ec2SdConfig>,

    /// Azure service discovery
    #[serde(default, rename = "azureSDConfigs", skip_serializing_if = "Vec::is_empty")]
    pub azure_sd_configs: Vec<AzureSdConfig>,

    /// Google Compute Engine service discovery
    #[serde(default, rename = "gceSDConfigs", skip_serializing_if = "Vec::is_empty")]
    pub gce_sd_configs: Vec<GceSdConfig>,

    /// OpenStack service discovery
    #[serde(default, rename = "openstackSDConfigs", skip_serializing_if = "Vec::is_empty")]
    pub openstack_sd_configs: Vec<OpenStackSdConfig>,

    /// DigitalOcean service discovery
    #[serde(default, rename = "digitalOceanSDConfigs", skip_serializing_if = "Vec::is_empty")]
    pub digitalocean_sd_configs: Vec<DigitalOceanSdConfig>,
}

// ============================================================================
// Secret references
// ============================================================================

/// Reference to one key of a Kubernetes Secret in the resource namespace
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecretKeySelector {
    /// Name of the Secret
    #[serde(default)]
    pub name: String,

    /// Key within the Secret
    pub key: String,

    /// Whether the Secret or its key may be missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

/// Reference to one key of a Kubernetes ConfigMap in the resource namespace
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMapKeySelector {
    /// Name of the ConfigMap
    #[serde(default)]
    pub name: String,

    /// Key within the ConfigMap
    pub key: String,

    /// Whether the ConfigMap or its key may be missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

/// A value sourced from either a Secret or a ConfigMap
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecretOrConfigMap {
    /// Secret holding the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<SecretKeySelector>,

    /// ConfigMap holding the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map: Option<ConfigMapKeySelector>,
}

impl SecretOrConfigMap {
    /// Returns `(object name, key)` of whichever reference is set, Secret first
    pub fn object_key(&self) -> Option<(&str, &str)> {
        if let Some(secret) = &self.secret {
            return Some((secret.name.as_str(), secret.key.as_str()));
        }
        self.config_map
            .as_ref()
            .map(|cm| (cm.name.as_str(), cm.key.as_str()))
    }
}

// ============================================================================
// Authentication and TLS
// ============================================================================

/// Basic authentication credentials
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BasicAuth {
    /// Secret key holding the username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<SecretKeySelector>,

    /// Secret key holding the password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<SecretKeySelector>,

    /// Path to a password file readable by the agent; replaces `password`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_file: Option<String>,
}

/// Authorization header settings
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    /// Header type, e.g. `Bearer`
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    /// Secret key holding the credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<SecretKeySelector>,

    /// Path to a credentials file readable by the agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<String>,
}

/// OAuth2 client credentials flow
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2 {
    /// Client id, from a Secret or a ConfigMap
    #[serde(default)]
    pub client_id: SecretOrConfigMap,

    /// Secret key holding the client secret
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<SecretKeySelector>,

    /// Path to a client secret file readable by the agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret_file: Option<String>,

    /// Requested scopes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,

    /// Extra parameters appended to the token URL
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub endpoint_params: BTreeMap<String, String>,

    /// URL to fetch the token from
    #[serde(rename = "tokenURL")]
    pub token_url: String,
}

/// TLS client settings
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TlsConfig {
    /// CA certificate reference
    #[serde(default)]
    pub ca: SecretOrConfigMap,

    /// Path to a CA file on the agent; wins over `ca`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_file: Option<String>,

    /// Client certificate reference
    #[serde(default)]
    pub cert: SecretOrConfigMap,

    /// Path to a client certificate on the agent; wins over `cert`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<String>,

    /// Secret key holding the client key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_secret: Option<SecretKeySelector>,

    /// Path to a client key on the agent; wins over `keySecret`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file: Option<String>,

    /// Server name used for certificate verification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,

    /// Disable target certificate validation
    #[serde(default)]
    pub insecure_skip_verify: bool,
}

// ============================================================================
// Relabeling
// ============================================================================

/// A relabeling rule, passed through to the agent as written
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RelabelConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_labels: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modulus: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Series selector the rule applies to
    #[serde(default, rename = "if", skip_serializing_if = "Option::is_none")]
    pub if_: Option<String>,

    /// Series selector used by `keep_if_equal`-style actions
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

// ============================================================================
// Service discovery mechanisms
// ============================================================================

/// Static list of targets sharing a label set
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StaticConfig {
    /// Target addresses
    #[serde(default)]
    pub targets: Vec<String>,

    /// Labels attached to every target
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

/// Targets read from files on the agent
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileSdConfig {
    /// File paths or globs
    #[serde(default)]
    pub files: Vec<String>,
}

/// Targets fetched from an HTTP endpoint
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpSdConfig {
    /// Endpoint returning the target list
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<BasicAuth>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<Authorization>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_config: Option<TlsConfig>,

    #[serde(default, rename = "proxyURL", skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

/// Kubernetes API discovery
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesSdConfig {
    /// API server address; in-cluster config when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_server: Option<String>,

    /// Object role to discover: node, service, pod, endpoints, endpointslice or ingress
    pub role: String,

    /// Namespaces to discover in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespaces: Option<NamespaceDiscovery>,

    /// Extra metadata attached to discovered targets
    #[serde(default)]
    pub attach_metadata: AttachMetadata,

    /// Label and field selectors per role
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selectors: Vec<K8sSelectorConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<BasicAuth>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<Authorization>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth2: Option<OAuth2>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_config: Option<TlsConfig>,

    #[serde(default, rename = "proxyURL", skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_redirects: Option<bool>,
}

/// Namespace filter for Kubernetes discovery
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceDiscovery {
    /// Include the namespace the agent runs in
    #[serde(default)]
    pub own_namespace: bool,

    /// Explicit namespace names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
}

/// Metadata attachment options for Kubernetes discovery
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttachMetadata {
    /// Attach node metadata to pod targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<bool>,
}

/// Selector narrowing one Kubernetes discovery role
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct K8sSelectorConfig {
    pub role: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub field: String,
}

/// Consul catalog discovery
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsulSdConfig {
    /// Consul server address
    pub server: String,

    /// Secret key holding the Consul ACL token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_ref: Option<SecretKeySelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datacenter: Option<String>,

    /// Consul Enterprise namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Consul Enterprise admin partition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    /// Services to discover; all services when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<String>,

    /// Only discover services carrying all of these tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_separator: Option<String>,

    /// Only discover nodes carrying this metadata
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_meta: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_stale: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<BasicAuth>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<Authorization>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth2: Option<OAuth2>,

    #[serde(default, rename = "proxyURL", skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_redirects: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_config: Option<TlsConfig>,
}

/// DNS record discovery
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DnsSdConfig {
    /// DNS names to query
    pub names: Vec<String>,

    /// Record type: SRV, A, AAAA or MX
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    /// Port for non-SRV records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
}

/// AWS EC2 instance discovery
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ec2SdConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Secret key holding the AWS access key id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<SecretKeySelector>,

    /// Secret key holding the AWS secret access key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<SecretKeySelector>,

    #[serde(default, rename = "roleARN", skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,

    /// Instance filters, see the DescribeInstances API
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Ec2Filter>,
}

/// One EC2 DescribeInstances filter
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ec2Filter {
    pub name: String,

    #[serde(default)]
    pub values: Vec<String>,
}

/// Azure virtual machine discovery
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AzureSdConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    /// OAuth or ManagedIdentity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_method: Option<String>,

    #[serde(rename = "subscriptionID")]
    pub subscription_id: String,

    #[serde(default, rename = "tenantID", skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,

    #[serde(default, rename = "clientID", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Secret key holding the client secret
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<SecretKeySelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
}

/// Google Compute Engine instance discovery
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GceSdConfig {
    pub project: String,

    pub zone: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_separator: Option<String>,
}

/// OpenStack Nova discovery
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpenStackSdConfig {
    /// hypervisor or instance
    pub role: String,

    /// Region; the agent schema requires the key even when empty
    #[serde(default)]
    pub region: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, rename = "userid", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Secret key holding the password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<SecretKeySelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,

    #[serde(default, rename = "domainID", skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,

    #[serde(default, rename = "projectID", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_credential_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_credential_id: Option<String>,

    /// Secret key holding the application credential secret
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_credential_secret: Option<SecretKeySelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_tenants: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,

    /// public, admin or internal endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_config: Option<TlsConfig>,
}

/// DigitalOcean droplet discovery
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DigitalOceanSdConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<Authorization>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth2: Option<OAuth2>,

    #[serde(default, rename = "proxyURL", skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_redirects: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_config: Option<TlsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
}
