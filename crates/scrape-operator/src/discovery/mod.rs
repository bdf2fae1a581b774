//! Service discovery section builders
//!
//! Every discovery mechanism a `ScrapeConfig` can declare has one builder that
//! turns a single sub-spec entry into an output fragment. Builders are
//! registered against a [`Mechanism`] tag and always run in
//! [`Mechanism::CANONICAL_ORDER`], so the position of a section in the output
//! never depends on how the resource was written.
//!
//! A mechanism with no entries produces no section at all.

mod cloud;
mod consul;
mod kubernetes;
mod targets;

pub use cloud::{
    AzureSdFragment, DigitalOceanSdFragment, Ec2FilterFragment, Ec2SdFragment, GceSdFragment,
    OpenStackSdFragment,
};
pub use consul::ConsulSdFragment;
pub use kubernetes::{KubernetesSdFragment, NamespacesFragment, SelectorFragment};
pub use targets::{DnsSdFragment, FileSdFragment, HttpSdFragment, StaticFragment};

use crate::auth::CredentialScope;
use crate::crd::{ScrapeConfigSpec, SCRAPE_CONFIG_KIND_PREFIX};
use crate::secrets::{SecretCache, SecretCacheKey};
use serde::Serialize;
use std::fmt;

/// Discovery mechanism tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mechanism {
    Static,
    File,
    Http,
    Kubernetes,
    Consul,
    Dns,
    Ec2,
    Azure,
    Gce,
    OpenStack,
    DigitalOcean,
}

/// Builds the whole section of one mechanism, `None` when it has no entries
type SectionBuilder = fn(&ScrapeConfigSpec, &ResourceScope<'_>) -> Option<SectionFragments>;

impl Mechanism {
    /// Order in which sections appear in a compiled job
    pub const CANONICAL_ORDER: [Mechanism; 11] = [
        Mechanism::Static,
        Mechanism::File,
        Mechanism::Http,
        Mechanism::Kubernetes,
        Mechanism::Consul,
        Mechanism::Dns,
        Mechanism::Ec2,
        Mechanism::Azure,
        Mechanism::Gce,
        Mechanism::OpenStack,
        Mechanism::DigitalOcean,
    ];

    /// Top-level key of this mechanism's section in the agent config
    pub fn section_key(&self) -> &'static str {
        match self {
            Mechanism::Static => "static_configs",
            Mechanism::File => "file_sd_configs",
            Mechanism::Http => "http_sd_configs",
            Mechanism::Kubernetes => "kubernetes_sd_configs",
            Mechanism::Consul => "consul_sd_configs",
            Mechanism::Dns => "dns_sd_configs",
            Mechanism::Ec2 => "ec2_sd_configs",
            Mechanism::Azure => "azure_sd_configs",
            Mechanism::Gce => "gce_sd_configs",
            Mechanism::OpenStack => "openstack_sd_configs",
            Mechanism::DigitalOcean => "digitalocean_sd_configs",
        }
    }

    /// Secret cache key segment for credentials declared inside this mechanism
    pub fn discriminator(&self) -> &'static str {
        match self {
            Mechanism::Static => "static",
            Mechanism::File => "filesd",
            Mechanism::Http => "httpsd",
            Mechanism::Kubernetes => "kubernetessd",
            Mechanism::Consul => "consulsd",
            Mechanism::Dns => "dnssd",
            Mechanism::Ec2 => "ec2sd",
            Mechanism::Azure => "azuresd",
            Mechanism::Gce => "gcesd",
            Mechanism::OpenStack => "openstacksd",
            Mechanism::DigitalOcean => "digitaloceansd",
        }
    }

    /// Number of entries the resource declares for this mechanism
    pub fn declared(&self, spec: &ScrapeConfigSpec) -> usize {
        match self {
            Mechanism::Static => spec.static_configs.len(),
            Mechanism::File => spec.file_sd_configs.len(),
            Mechanism::Http => spec.http_sd_configs.len(),
            Mechanism::Kubernetes => spec.kubernetes_sd_configs.len(),
            Mechanism::Consul => spec.consul_sd_configs.len(),
            Mechanism::Dns => spec.dns_sd_configs.len(),
            Mechanism::Ec2 => spec.ec2_sd_configs.len(),
            Mechanism::Azure => spec.azure_sd_configs.len(),
            Mechanism::Gce => spec.gce_sd_configs.len(),
            Mechanism::OpenStack => spec.openstack_sd_configs.len(),
            Mechanism::DigitalOcean => spec.digitalocean_sd_configs.len(),
        }
    }

    fn builder(&self) -> SectionBuilder {
        match self {
            Mechanism::Static => static_section,
            Mechanism::File => file_section,
            Mechanism::Http => http_section,
            Mechanism::Kubernetes => kubernetes_section,
            Mechanism::Consul => consul_section,
            Mechanism::Dns => dns_section,
            Mechanism::Ec2 => ec2_section,
            Mechanism::Azure => azure_section,
            Mechanism::Gce => gce_section,
            Mechanism::OpenStack => openstack_section,
            Mechanism::DigitalOcean => digitalocean_section,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Mechanism::Static => "static",
            Mechanism::File => "file",
            Mechanism::Http => "http",
            Mechanism::Kubernetes => "kubernetes",
            Mechanism::Consul => "consul",
            Mechanism::Dns => "dns",
            Mechanism::Ec2 => "ec2",
            Mechanism::Azure => "azure",
            Mechanism::Gce => "gce",
            Mechanism::OpenStack => "openstack",
            Mechanism::DigitalOcean => "digitalocean",
        }
    }
}

impl fmt::Display for Mechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! section_builder {
    ($name:ident, $mechanism:expr, $field:ident, $build:path, $variant:ident) => {
        fn $name(spec: &ScrapeConfigSpec, scope: &ResourceScope<'_>) -> Option<SectionFragments> {
            scope
                .collect($mechanism, &spec.$field, $build)
                .map(SectionFragments::$variant)
        }
    };
}

section_builder!(static_section, Mechanism::Static, static_configs, targets::build_static, Static);
section_builder!(file_section, Mechanism::File, file_sd_configs, targets::build_file, File);
section_builder!(http_section, Mechanism::Http, http_sd_configs, targets::build_http, Http);
section_builder!(
    kubernetes_section,
    Mechanism::Kubernetes,
    kubernetes_sd_configs,
    kubernetes::build_kubernetes,
    Kubernetes
);
section_builder!(consul_section, Mechanism::Consul, consul_sd_configs, consul::build_consul, Consul);
section_builder!(dns_section, Mechanism::Dns, dns_sd_configs, targets::build_dns, Dns);
section_builder!(ec2_section, Mechanism::Ec2, ec2_sd_configs, cloud::build_ec2, Ec2);
section_builder!(azure_section, Mechanism::Azure, azure_sd_configs, cloud::build_azure, Azure);
section_builder!(gce_section, Mechanism::Gce, gce_sd_configs, cloud::build_gce, Gce);
section_builder!(
    openstack_section,
    Mechanism::OpenStack,
    openstack_sd_configs,
    cloud::build_openstack,
    OpenStack
);
section_builder!(
    digitalocean_section,
    Mechanism::DigitalOcean,
    digitalocean_sd_configs,
    cloud::build_digitalocean,
    DigitalOcean
);

/// Fragments of one section; all entries share the mechanism's shape
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum SectionFragments {
    Static(Vec<StaticFragment>),
    File(Vec<FileSdFragment>),
    Http(Vec<HttpSdFragment>),
    Kubernetes(Vec<KubernetesSdFragment>),
    Consul(Vec<ConsulSdFragment>),
    Dns(Vec<DnsSdFragment>),
    Ec2(Vec<Ec2SdFragment>),
    Azure(Vec<AzureSdFragment>),
    Gce(Vec<GceSdFragment>),
    OpenStack(Vec<OpenStackSdFragment>),
    DigitalOcean(Vec<DigitalOceanSdFragment>),
}

impl SectionFragments {
    pub fn len(&self) -> usize {
        match self {
            SectionFragments::Static(f) => f.len(),
            SectionFragments::File(f) => f.len(),
            SectionFragments::Http(f) => f.len(),
            SectionFragments::Kubernetes(f) => f.len(),
            SectionFragments::Consul(f) => f.len(),
            SectionFragments::Dns(f) => f.len(),
            SectionFragments::Ec2(f) => f.len(),
            SectionFragments::Azure(f) => f.len(),
            SectionFragments::Gce(f) => f.len(),
            SectionFragments::OpenStack(f) => f.len(),
            SectionFragments::DigitalOcean(f) => f.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One non-empty mechanism section of a compiled job
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub mechanism: Mechanism,
    pub fragments: SectionFragments,
}

/// Identity of the resource being compiled plus the cache it reads from
#[derive(Debug, Clone, Copy)]
pub struct ResourceScope<'a> {
    pub namespace: &'a str,
    pub name: &'a str,
    pub cache: &'a SecretCache,
}

impl<'a> ResourceScope<'a> {
    pub fn new(namespace: &'a str, name: &'a str, cache: &'a SecretCache) -> Self {
        Self {
            namespace,
            name,
            cache,
        }
    }

    /// Credential scope of the job-level settings
    pub fn top_level(&self) -> CredentialScope<'a> {
        let key = SecretCacheKey::top_level(SCRAPE_CONFIG_KIND_PREFIX, self.namespace, self.name);
        CredentialScope::new(self.namespace, key, self.cache)
    }

    /// Credential scope of entry `index` of `mechanism`
    pub fn entry(&self, mechanism: Mechanism, index: usize) -> CredentialScope<'a> {
        let key = SecretCacheKey::new(
            SCRAPE_CONFIG_KIND_PREFIX,
            self.namespace,
            self.name,
            mechanism.discriminator(),
            index,
        );
        CredentialScope::new(self.namespace, key, self.cache)
    }

    fn collect<S, F>(
        &self,
        mechanism: Mechanism,
        entries: &[S],
        build: impl Fn(&S, &CredentialScope<'a>) -> F,
    ) -> Option<Vec<F>> {
        if entries.is_empty() {
            return None;
        }
        Some(
            entries
                .iter()
                .enumerate()
                .map(|(index, entry)| build(entry, &self.entry(mechanism, index)))
                .collect(),
        )
    }
}

/// Build every non-empty section of `spec`, in canonical order
pub fn build_sections(spec: &ScrapeConfigSpec, scope: &ResourceScope<'_>) -> Vec<Section> {
    Mechanism::CANONICAL_ORDER
        .iter()
        .filter_map(|mechanism| {
            let fragments = (mechanism.builder())(spec, scope)?;
            tracing::trace!(
                mechanism = %mechanism,
                entries = fragments.len(),
                "Built discovery section"
            );
            Some(Section {
                mechanism: *mechanism,
                fragments,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{DnsSdConfig, FileSdConfig, GceSdConfig, StaticConfig};

    #[test]
    fn test_canonical_order_is_complete_and_unique() {
        let keys: Vec<_> = Mechanism::CANONICAL_ORDER
            .iter()
            .map(|m| m.section_key())
            .collect();
        let unique: std::collections::HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
        assert_eq!(keys.first(), Some(&"static_configs"));
        assert_eq!(keys.last(), Some(&"digitalocean_sd_configs"));

        let mut sorted = Mechanism::CANONICAL_ORDER;
        sorted.sort();
        assert_eq!(sorted, Mechanism::CANONICAL_ORDER);
    }

    #[test]
    fn test_entry_keys_use_discriminator_and_index() {
        let cache = SecretCache::new();
        let scope = ResourceScope::new("default", "httpsd-1", &cache);
        assert_eq!(
            scope.entry(Mechanism::Http, 1).key().as_str(),
            "scrapeConfig/default/httpsd-1/httpsd/1"
        );
        assert_eq!(
            scope.top_level().key().as_str(),
            "scrapeConfig/default/httpsd-1//0"
        );
    }

    #[test]
    fn test_empty_mechanisms_produce_no_section() {
        let cache = SecretCache::new();
        let scope = ResourceScope::new("default", "empty", &cache);
        assert!(build_sections(&ScrapeConfigSpec::default(), &scope).is_empty());
    }

    #[test]
    fn test_sections_follow_canonical_order() {
        let spec = ScrapeConfigSpec {
            gce_sd_configs: vec![GceSdConfig {
                project: "p".to_string(),
                zone: "z".to_string(),
                ..Default::default()
            }],
            dns_sd_configs: vec![DnsSdConfig {
                names: vec!["a.example.com".to_string()],
                ..Default::default()
            }],
            file_sd_configs: vec![FileSdConfig {
                files: vec!["targets.json".to_string()],
            }],
            static_configs: vec![StaticConfig::default(), StaticConfig::default()],
            ..Default::default()
        };
        let cache = SecretCache::new();
        let scope = ResourceScope::new("default", "ordered", &cache);

        let sections = build_sections(&spec, &scope);
        let mechanisms: Vec<_> = sections.iter().map(|s| s.mechanism).collect();
        assert_eq!(
            mechanisms,
            vec![
                Mechanism::Static,
                Mechanism::File,
                Mechanism::Dns,
                Mechanism::Gce
            ]
        );
        assert_eq!(sections[0].fragments.len(), 2);
        for mechanism in &mechanisms {
            assert!(mechanism.declared(&spec) > 0);
        }
    }
}
