//! Authentication and TLS fragment builders
//!
//! Shared by the job-level settings and by every discovery mechanism that can
//! carry its own credentials. Each builder receives the [`CredentialScope`] of
//! its use-site so cache lookups use the key the population pass wrote.

use crate::config::RenderedSecret;
use crate::crd::{Authorization, BasicAuth, OAuth2, TlsConfig};
use crate::secrets::{SecretCache, SecretCacheKey, SecretField, SensitiveString};
use serde::Serialize;
use std::collections::BTreeMap;

/// Directory the agent mounts TLS assets from referenced Secrets and ConfigMaps into
pub const TLS_ASSETS_DIR: &str = "/etc/vmagent-tls/certs";

/// Path of a mounted TLS asset, `<mount-root>/<namespace>_<object>_<key>`
///
/// Returns `None` when the reference lacks an object name or a key, since
/// nothing would be mounted for it.
pub fn tls_asset_path(namespace: &str, object: &str, key: &str) -> Option<String> {
    if object.is_empty() || key.is_empty() {
        return None;
    }
    Some(format!("{}/{}_{}_{}", TLS_ASSETS_DIR, namespace, object, key))
}

/// `basic_auth` block
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct BasicAuthFragment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<RenderedSecret>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<RenderedSecret>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_file: Option<String>,
}

/// `authorization` block
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AuthorizationFragment {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<RenderedSecret>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<String>,
}

/// `oauth2` block
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct OAuth2Fragment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<RenderedSecret>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<RenderedSecret>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret_file: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub endpoint_params: BTreeMap<String, String>,
    pub token_url: String,
}

/// `tls_config` block
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TlsFragment {
    pub insecure_skip_verify: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
}

/// One credential use-site: the resource namespace, its cache key, and the cache
#[derive(Debug, Clone)]
pub struct CredentialScope<'a> {
    namespace: &'a str,
    key: SecretCacheKey,
    cache: &'a SecretCache,
}

impl<'a> CredentialScope<'a> {
    pub fn new(namespace: &'a str, key: SecretCacheKey, cache: &'a SecretCache) -> Self {
        Self {
            namespace,
            key,
            cache,
        }
    }

    pub fn key(&self) -> &SecretCacheKey {
        &self.key
    }

    /// Resolve a single-value secret field of this use-site
    pub fn value(&self, field: SecretField) -> Option<RenderedSecret> {
        rendered(self.cache.value(&self.key, field))
    }

    /// Build the `basic_auth` block; `None` when nothing resolved
    pub fn basic_auth(&self, spec: Option<&BasicAuth>) -> Option<BasicAuthFragment> {
        let spec = spec?;
        let creds = self.cache.basic_auth(&self.key);

        let username = creds.and_then(|c| rendered(c.username.as_ref()));
        let password_file = spec.password_file.clone().filter(|p| !p.is_empty());
        let password = match password_file {
            Some(_) => None,
            None => creds.and_then(|c| rendered(c.password.as_ref())),
        };
        let fragment = BasicAuthFragment {
            username,
            password,
            password_file,
        };

        if fragment == BasicAuthFragment::default() {
            return None;
        }
        Some(fragment)
    }

    /// Build the `authorization` block; `None` when nothing resolved
    pub fn authorization(&self, spec: Option<&Authorization>) -> Option<AuthorizationFragment> {
        let spec = spec?;
        let credentials_file = spec.credentials_file.clone().filter(|f| !f.is_empty());
        let credentials = match credentials_file {
            Some(_) => None,
            None => rendered(self.cache.authorization(&self.key)),
        };
        let fragment = AuthorizationFragment {
            type_: spec.type_.clone().filter(|t| !t.is_empty()),
            credentials,
            credentials_file,
        };

        if fragment == AuthorizationFragment::default() {
            return None;
        }
        Some(fragment)
    }

    /// Build the `oauth2` block
    ///
    /// The client secret is emitted only when the spec references one; a
    /// secret sitting in the cache for an OAuth2 block that declares none is
    /// ignored.
    pub fn oauth2(&self, spec: Option<&OAuth2>) -> Option<OAuth2Fragment> {
        let spec = spec?;
        let creds = self.cache.oauth2(&self.key);
        let client_secret_file = spec.client_secret_file.clone().filter(|f| !f.is_empty());

        let client_secret = match (&spec.client_secret, &client_secret_file) {
            (Some(_), None) => creds.and_then(|c| rendered(c.client_secret.as_ref())),
            _ => None,
        };

        Some(OAuth2Fragment {
            client_id: creds.and_then(|c| rendered(c.client_id.as_ref())),
            client_secret,
            client_secret_file,
            scopes: spec.scopes.clone(),
            endpoint_params: spec.endpoint_params.clone(),
            token_url: spec.token_url.clone(),
        })
    }

    /// Build the `tls_config` block
    ///
    /// Explicit file paths win over Secret/ConfigMap references.
    pub fn tls_config(&self, spec: Option<&TlsConfig>) -> Option<TlsFragment> {
        let spec = spec?;

        let ca_file = file_or_asset(&spec.ca_file, || {
            spec.ca
                .object_key()
                .and_then(|(object, key)| tls_asset_path(self.namespace, object, key))
        });
        let cert_file = file_or_asset(&spec.cert_file, || {
            spec.cert
                .object_key()
                .and_then(|(object, key)| tls_asset_path(self.namespace, object, key))
        });
        let key_file = file_or_asset(&spec.key_file, || {
            spec.key_secret
                .as_ref()
                .and_then(|s| tls_asset_path(self.namespace, &s.name, &s.key))
        });

        Some(TlsFragment {
            insecure_skip_verify: spec.insecure_skip_verify,
            ca_file,
            cert_file,
            key_file,
            server_name: spec.server_name.clone().filter(|s| !s.is_empty()),
        })
    }
}

fn rendered(value: Option<&SensitiveString>) -> Option<RenderedSecret> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| RenderedSecret::new(v.expose_secret()))
}

fn file_or_asset(file: &Option<String>, asset: impl FnOnce() -> Option<String>) -> Option<String> {
    match file.as_deref() {
        Some(path) if !path.is_empty() => Some(path.to_string()),
        _ => asset(),
    }
}
