//! Property-based tests for scrape job compilation
//!
//! These tests use proptest to generate random resources and verify
//! invariants that must hold for every compiled job.

use proptest::prelude::*;
use scrape_operator::crd::{
    AzureSdConfig, BasicAuth, ConsulSdConfig, DigitalOceanSdConfig, DnsSdConfig, Ec2SdConfig,
    FileSdConfig, GceSdConfig, HttpSdConfig, KubernetesSdConfig, OpenStackSdConfig,
    SecretKeySelector, StaticConfig,
};
use scrape_operator::prelude::*;
use scrape_operator::secrets::BasicAuthCredentials;
use tokio_util::sync::CancellationToken;

fn spec_with_counts(counts: &[usize], interval: Option<&str>) -> ScrapeConfigSpec {
    let n = |m: Mechanism| counts[m as usize];
    ScrapeConfigSpec {
        scrape_interval: interval.map(str::to_string),
        static_configs: (0..n(Mechanism::Static))
            .map(|i| StaticConfig {
                targets: vec![format!("host-{}:9100", i)],
                ..Default::default()
            })
            .collect(),
        file_sd_configs: (0..n(Mechanism::File))
            .map(|i| FileSdConfig {
                files: vec![format!("targets-{}.json", i)],
            })
            .collect(),
        http_sd_configs: (0..n(Mechanism::Http))
            .map(|i| HttpSdConfig {
                url: format!("http://sd-{}.internal/targets", i),
                ..Default::default()
            })
            .collect(),
        kubernetes_sd_configs: (0..n(Mechanism::Kubernetes))
            .map(|_| KubernetesSdConfig {
                role: "pod".to_string(),
                ..Default::default()
            })
            .collect(),
        consul_sd_configs: (0..n(Mechanism::Consul))
            .map(|i| ConsulSdConfig {
                server: format!("consul-{}:8500", i),
                ..Default::default()
            })
            .collect(),
        dns_sd_configs: (0..n(Mechanism::Dns))
            .map(|i| DnsSdConfig {
                names: vec![format!("srv-{}.example.com", i)],
                ..Default::default()
            })
            .collect(),
        ec2_sd_configs: (0..n(Mechanism::Ec2))
            .map(|_| Ec2SdConfig {
                region: Some("eu-west-1".to_string()),
                ..Default::default()
            })
            .collect(),
        azure_sd_configs: (0..n(Mechanism::Azure))
            .map(|i| AzureSdConfig {
                subscription_id: format!("sub-{}", i),
                ..Default::default()
            })
            .collect(),
        gce_sd_configs: (0..n(Mechanism::Gce))
            .map(|_| GceSdConfig {
                project: "project".to_string(),
                zone: "zone-a".to_string(),
                ..Default::default()
            })
            .collect(),
        openstack_sd_configs: (0..n(Mechanism::OpenStack))
            .map(|_| OpenStackSdConfig {
                role: "instance".to_string(),
                ..Default::default()
            })
            .collect(),
        digitalocean_sd_configs: (0..n(Mechanism::DigitalOcean))
            .map(|i| DigitalOceanSdConfig {
                port: Some(9100 + i as i32),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn resource(namespace: &str, name: &str, spec: ScrapeConfigSpec) -> ScrapeConfig {
    let mut sc = ScrapeConfig::new(name, spec);
    sc.metadata.namespace = Some(namespace.to_string());
    sc
}

fn top_level_keys(yaml: &str) -> Vec<String> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
    value
        .as_mapping()
        .unwrap()
        .keys()
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect()
}

prop_compose! {
    fn arbitrary_spec()(
        counts in prop::collection::vec(0usize..3, Mechanism::CANONICAL_ORDER.len()),
        interval in prop::option::of(prop::sample::select(vec!["5s", "30s", "1m", "10m", "1h"])),
    ) -> ScrapeConfigSpec {
        spec_with_counts(&counts, interval)
    }
}

prop_compose! {
    fn arbitrary_name()(s in "[a-z][a-z0-9-]{0,12}") -> String {
        s
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Compiling the same snapshot twice yields byte-identical output
    #[test]
    fn test_compile_is_deterministic(spec in arbitrary_spec(), name in arbitrary_name()) {
        let sc = resource("default", &name, spec);
        let defaults = ScrapeDefaults {
            min_scrape_interval: Some("30s".to_string()),
            max_scrape_interval: Some("5m".to_string()),
            ..Default::default()
        };
        let cache = SecretCache::new();

        let first = compile(&sc, &defaults, &cache).unwrap().to_yaml().unwrap();
        let second = compile(&sc, &defaults, &cache).unwrap().to_yaml().unwrap();
        prop_assert_eq!(first, second);
    }

    /// A section is present iff its mechanism has entries, in canonical order
    #[test]
    fn test_sections_present_iff_declared(spec in arbitrary_spec()) {
        let sc = resource("default", "job", spec);
        let job = compile(&sc, &ScrapeDefaults::default(), &SecretCache::new()).unwrap();
        let keys = top_level_keys(&job.to_yaml().unwrap());

        let expected: Vec<String> = Mechanism::CANONICAL_ORDER
            .iter()
            .filter(|m| m.declared(&sc.spec) > 0)
            .map(|m| m.section_key().to_string())
            .collect();
        let relabel = keys.iter().position(|k| k == "relabel_configs").unwrap();
        prop_assert_eq!(&keys[relabel + 1..], &expected[..]);

        for section in job.sections.iter() {
            prop_assert_eq!(section.fragments.len(), section.mechanism.declared(&sc.spec));
        }
    }

    /// Credentials appear iff the cache holds a value for the use-site
    #[test]
    fn test_credentials_present_iff_cached(cached in any::<bool>(), name in arbitrary_name()) {
        let spec = ScrapeConfigSpec {
            basic_auth: Some(BasicAuth {
                username: Some(SecretKeySelector {
                    name: "creds".to_string(),
                    key: "username".to_string(),
                    optional: None,
                }),
                ..Default::default()
            }),
            ..spec_with_counts(&[1; 11], None)
        };
        let sc = resource("default", &name, spec);

        let mut cache = SecretCache::new();
        if cached {
            let key = SecretCacheKey::top_level("scrapeConfig", "default", &name);
            cache.insert_basic_auth(&key, BasicAuthCredentials::new("admin", "dangerous"));
        }

        let yaml = compile(&sc, &ScrapeDefaults::default(), &cache).unwrap().to_yaml().unwrap();
        prop_assert_eq!(top_level_keys(&yaml).contains(&"basic_auth".to_string()), cached);
        prop_assert!(!yaml.contains("username: ''"));
    }

    /// Job names in one aggregate document never repeat
    #[test]
    fn test_aggregate_job_names_unique(
        names in prop::collection::vec((prop::sample::select(vec!["a", "b"]), arbitrary_name()), 1..12),
    ) {
        let resources: Vec<_> = names
            .iter()
            .map(|(ns, name)| resource(ns, name, spec_with_counts(&[1; 11], None)))
            .collect();

        let out = compile_all(
            &resources,
            &ScrapeDefaults::default(),
            &SecretCache::new(),
            &CancellationToken::new(),
        )
        .unwrap();

        let jobs = out.file.job_names();
        let mut sorted = jobs.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(&jobs, &sorted);
        prop_assert_eq!(jobs.len() + out.failures.len(), resources.len());
    }
}
