//! Compiled scrape configuration
//!
//! Output-side types: what one `ScrapeConfig` compiles into and how the
//! aggregate document is rendered. Field declaration order is output order,
//! so reordering fields here changes the generated file.

use crate::auth::{AuthorizationFragment, BasicAuthFragment, OAuth2Fragment, TlsFragment};
use crate::crd::RelabelConfig;
use crate::discovery::Section;
use crate::error::Result;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Operator-wide settings shared by every compilation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrapeDefaults {
    /// Lower bound for resource scrape intervals, e.g. `30s`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_scrape_interval: Option<String>,

    /// Upper bound for resource scrape intervals, e.g. `5m`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_scrape_interval: Option<String>,

    /// Namespace label used when a resource does not set its own
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforced_namespace_label: Option<String>,

    /// Force `honor_labels: false` on every job
    pub override_honor_labels: bool,
}

impl ScrapeDefaults {
    /// Load defaults from a YAML document
    pub fn from_yaml(input: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(input)?)
    }
}

/// A credential value copied out of the secret cache into the output
///
/// Serializes as the plain value, which is what the agent needs, but
/// `Debug` stays redacted so logging an assembled job is safe.
#[derive(Clone, PartialEq, Eq)]
pub struct RenderedSecret(String);

impl RenderedSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RenderedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl Serialize for RenderedSecret {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Relabeling rule in the agent's snake_case shape
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RelabelRule {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modulus: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(rename = "if", skip_serializing_if = "Option::is_none")]
    pub if_: Option<String>,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl RelabelRule {
    /// Rule stamping every series with the namespace it was scraped for
    pub fn enforce_namespace(label: &str, namespace: &str) -> Self {
        Self {
            target_label: Some(label.to_string()),
            replacement: Some(namespace.to_string()),
            ..Default::default()
        }
    }
}

impl From<&RelabelConfig> for RelabelRule {
    fn from(rc: &RelabelConfig) -> Self {
        Self {
            source_labels: rc.source_labels.clone(),
            separator: rc.separator.clone(),
            target_label: rc.target_label.clone(),
            regex: rc.regex.clone(),
            modulus: rc.modulus,
            replacement: rc.replacement.clone(),
            action: rc.action.clone(),
            if_: rc.if_.clone(),
            match_: rc.match_.clone(),
            labels: rc.labels.clone(),
        }
    }
}

/// Mechanism sections of one job, already in canonical order
///
/// Flattened into the job so each section becomes a top-level key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sections(pub Vec<Section>);

impl Sections {
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Sections {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for section in &self.0 {
            map.serialize_entry(section.mechanism.section_key(), &section.fragments)?;
        }
        map.end()
    }
}

/// One compiled scrape job
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssembledJobConfig {
    pub job_name: String,
    pub honor_labels: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrape_interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrape_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub honor_timestamps: Option<bool>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_redirects: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_config: Option<TlsFragment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<BasicAuthFragment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization: Option<AuthorizationFragment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth2: Option<OAuth2Fragment>,
    /// Always emitted, `[]` when there are no rules
    pub relabel_configs: Vec<RelabelRule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metric_relabel_configs: Vec<RelabelRule>,
    #[serde(flatten)]
    pub sections: Sections,
}

impl AssembledJobConfig {
    /// Render this job as a YAML document
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// The aggregate document handed to the sink
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ScrapeConfigFile {
    pub scrape_configs: Vec<AssembledJobConfig>,
}

impl ScrapeConfigFile {
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Job names in output order
    pub fn job_names(&self) -> Vec<&str> {
        self.scrape_configs
            .iter()
            .map(|job| job.job_name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(name: &str) -> AssembledJobConfig {
        AssembledJobConfig {
            job_name: name.to_string(),
            honor_labels: false,
            scrape_interval: None,
            scrape_timeout: None,
            metrics_path: None,
            honor_timestamps: None,
            params: BTreeMap::new(),
            scheme: None,
            follow_redirects: None,
            proxy_url: None,
            sample_limit: None,
            series_limit: None,
            tls_config: None,
            basic_auth: None,
            authorization: None,
            oauth2: None,
            relabel_configs: Vec::new(),
            metric_relabel_configs: Vec::new(),
            sections: Sections::default(),
        }
    }

    #[test]
    fn test_minimal_job_always_has_relabel_configs() {
        let yaml = job("scrapeConfig/default/empty").to_yaml().unwrap();
        assert_eq!(
            yaml,
            "job_name: scrapeConfig/default/empty\nhonor_labels: false\nrelabel_configs: []\n"
        );
    }

    #[test]
    fn test_rendered_secret_debug_is_redacted() {
        let mut j = job("scrapeConfig/default/secret");
        j.basic_auth = Some(BasicAuthFragment {
            username: Some(RenderedSecret::new("admin")),
            password: Some(RenderedSecret::new("dangerous")),
            password_file: None,
        });

        let debug = format!("{:?}", j);
        assert!(!debug.contains("dangerous"));
        assert!(j.to_yaml().unwrap().contains("password: dangerous"));
    }

    #[test]
    fn test_enforce_namespace_rule() {
        let mut j = job("scrapeConfig/team-a/app");
        j.relabel_configs
            .push(RelabelRule::enforce_namespace("namespace", "team-a"));
        let yaml = j.to_yaml().unwrap();
        assert!(yaml.contains("relabel_configs:\n- target_label: namespace\n  replacement: team-a\n"));
    }

    #[test]
    fn test_relabel_rule_from_resource() {
        let rc = RelabelConfig {
            source_labels: vec!["__meta_kubernetes_pod_label_app".to_string()],
            target_label: Some("app".to_string()),
            if_: Some("{job=\"x\"}".to_string()),
            ..Default::default()
        };
        let rule = RelabelRule::from(&rc);
        assert_eq!(rule.source_labels, rc.source_labels);
        assert_eq!(rule.if_, rc.if_);

        let value = serde_yaml::to_value(&rule).unwrap();
        assert!(value.get("if").is_some());
        assert!(value.get("action").is_none());
    }

    #[test]
    fn test_defaults_from_yaml() {
        let defaults = ScrapeDefaults::from_yaml(
            "minScrapeInterval: 30s\nmaxScrapeInterval: 5m\noverrideHonorLabels: true\n",
        )
        .unwrap();
        assert_eq!(defaults.min_scrape_interval.as_deref(), Some("30s"));
        assert_eq!(defaults.max_scrape_interval.as_deref(), Some("5m"));
        assert!(defaults.enforced_namespace_label.is_none());
        assert!(defaults.override_honor_labels);
    }

    #[test]
    fn test_file_job_names() {
        let file = ScrapeConfigFile {
            scrape_configs: vec![job("scrapeConfig/a/x"), job("scrapeConfig/b/y")],
        };
        assert_eq!(file.job_names(), vec!["scrapeConfig/a/x", "scrapeConfig/b/y"]);
        assert!(file.to_yaml().unwrap().starts_with("scrape_configs:\n- job_name: scrapeConfig/a/x\n"));
    }
}
