//! Target-list mechanisms: static, file, HTTP and DNS discovery

use crate::auth::{AuthorizationFragment, BasicAuthFragment, CredentialScope, TlsFragment};
use crate::crd::{DnsSdConfig, FileSdConfig, HttpSdConfig, StaticConfig};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StaticFragment {
    pub targets: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FileSdFragment {
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HttpSdFragment {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<BasicAuthFragment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization: Option<AuthorizationFragment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_config: Option<TlsFragment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DnsSdFragment {
    pub names: Vec<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
}

pub(super) fn build_static(spec: &StaticConfig, _creds: &CredentialScope<'_>) -> StaticFragment {
    StaticFragment {
        targets: spec.targets.clone(),
        labels: spec.labels.clone(),
    }
}

pub(super) fn build_file(spec: &FileSdConfig, _creds: &CredentialScope<'_>) -> FileSdFragment {
    FileSdFragment {
        files: spec.files.clone(),
    }
}

pub(super) fn build_http(spec: &HttpSdConfig, creds: &CredentialScope<'_>) -> HttpSdFragment {
    HttpSdFragment {
        url: spec.url.clone(),
        basic_auth: creds.basic_auth(spec.basic_auth.as_ref()),
        authorization: creds.authorization(spec.authorization.as_ref()),
        tls_config: creds.tls_config(spec.tls_config.as_ref()),
        proxy_url: spec.proxy_url.clone(),
    }
}

pub(super) fn build_dns(spec: &DnsSdConfig, _creds: &CredentialScope<'_>) -> DnsSdFragment {
    DnsSdFragment {
        names: spec.names.clone(),
        type_: spec.type_.clone(),
        port: spec.port,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{Authorization, SecretKeySelector, SecretOrConfigMap, TlsConfig};
    use crate::discovery::{Mechanism, ResourceScope};
    use crate::secrets::SecretCache;

    #[test]
    fn test_http_entries_resolve_their_own_credentials() {
        let cache_scope_key = |index| {
            crate::secrets::SecretCacheKey::new(
                "scrapeConfig",
                "default",
                "httpsd-1",
                "httpsd",
                index,
            )
        };
        let mut cache = SecretCache::new();
        cache.insert_authorization(&cache_scope_key(1), "auth-secret");
        let scope = ResourceScope::new("default", "httpsd-1", &cache);

        let spec = HttpSdConfig {
            url: "http://www.test2.com".to_string(),
            authorization: Some(Authorization {
                type_: Some("Bearer".to_string()),
                credentials: Some(SecretKeySelector {
                    name: "auth".to_string(),
                    key: "token".to_string(),
                    optional: None,
                }),
                credentials_file: None,
            }),
            tls_config: Some(TlsConfig {
                ca: SecretOrConfigMap {
                    secret: Some(SecretKeySelector {
                        name: "tls-secret".to_string(),
                        key: "ca".to_string(),
                        optional: None,
                    }),
                    config_map: None,
                },
                ..Default::default()
            }),
            ..Default::default()
        };

        let first = build_http(&spec, &scope.entry(Mechanism::Http, 0));
        assert!(first.authorization.as_ref().unwrap().credentials.is_none());

        let second = build_http(&spec, &scope.entry(Mechanism::Http, 1));
        assert_eq!(
            second
                .authorization
                .as_ref()
                .unwrap()
                .credentials
                .as_ref()
                .unwrap()
                .as_str(),
            "auth-secret"
        );
        assert_eq!(
            second.tls_config.as_ref().unwrap().ca_file.as_deref(),
            Some("/etc/vmagent-tls/certs/default_tls-secret_ca")
        );
    }

    #[test]
    fn test_dns_fragment_shape() {
        let cache = SecretCache::new();
        let scope = ResourceScope::new("default", "dns", &cache);
        let spec = DnsSdConfig {
            names: vec!["vmagent-0.vmagent.default.svc.cluster.local".to_string()],
            type_: None,
            port: Some(8429),
        };
        let yaml = serde_yaml::to_string(&build_dns(&spec, &scope.entry(Mechanism::Dns, 0))).unwrap();
        assert_eq!(
            yaml,
            "names:\n- vmagent-0.vmagent.default.svc.cluster.local\nport: 8429\n"
        );
    }

    #[test]
    fn test_static_without_labels() {
        let cache = SecretCache::new();
        let scope = ResourceScope::new("default", "s", &cache);
        let spec = StaticConfig {
            targets: vec!["10.0.0.1:9100".to_string()],
            labels: BTreeMap::new(),
        };
        let value =
            serde_yaml::to_value(build_static(&spec, &scope.entry(Mechanism::Static, 0))).unwrap();
        assert!(value.get("labels").is_none());
        assert!(value.get("targets").is_some());
    }
}
