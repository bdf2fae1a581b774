//! Secret resolution cache
//!
//! Credentials referenced by a `ScrapeConfig` are resolved by a separate
//! population pass that reads Kubernetes Secrets and stores the values under
//! deterministic [`SecretCacheKey`]s. The compiler only builds the same keys
//! and looks them up; it never writes to the cache.
//!
//! A key identifies one credential use-site:
//!
//! ```text
//! <kind>/<namespace>/<name>/<discriminator>/<index>[/<field>]
//! ```
//!
//! The discriminator names the discovery mechanism (empty for the job-level
//! credentials) and the index is the zero-based position of the entry within
//! that mechanism's list. Kubernetes names never contain `/`, so two distinct
//! use-sites cannot produce the same key.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;

/// A resolved credential value
///
/// `Debug` and `Display` never print the value, so the cache and anything
/// holding its values can be logged safely.
#[derive(Clone)]
pub struct SensitiveString(SecretString);

impl SensitiveString {
    /// Wrap a resolved value
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    /// Expose the value; only the fragment builders should need this
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }

    /// Whether the resolved value is empty
    pub fn is_empty(&self) -> bool {
        self.expose_secret().is_empty()
    }
}

impl fmt::Debug for SensitiveString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Display for SensitiveString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl<'de> Deserialize<'de> for SensitiveString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::new(value))
    }
}

/// Username and password resolved for one basic auth use-site
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BasicAuthCredentials {
    #[serde(default)]
    pub username: Option<SensitiveString>,
    #[serde(default)]
    pub password: Option<SensitiveString>,
}

impl BasicAuthCredentials {
    /// Credentials with both halves resolved
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(SensitiveString::new(username)),
            password: Some(SensitiveString::new(password)),
        }
    }
}

/// Client id and secret resolved for one OAuth2 use-site
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2Credentials {
    #[serde(default)]
    pub client_id: Option<SensitiveString>,
    #[serde(default)]
    pub client_secret: Option<SensitiveString>,
}

impl OAuth2Credentials {
    /// Credentials with both halves resolved
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: Some(SensitiveString::new(client_id)),
            client_secret: Some(SensitiveString::new(client_secret)),
        }
    }
}

/// Mechanism fields backed by a single secret value rather than an auth block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretField {
    /// Consul ACL token
    Token,
    /// AWS access key id
    AccessKey,
    /// AWS secret access key
    SecretKey,
    /// Azure client secret
    ClientSecret,
    /// OpenStack password
    Password,
    /// OpenStack application credential secret
    ApplicationCredentialSecret,
}

impl SecretField {
    /// Key suffix for this field
    pub fn as_str(&self) -> &'static str {
        match self {
            SecretField::Token => "token",
            SecretField::AccessKey => "access_key",
            SecretField::SecretKey => "secret_key",
            SecretField::ClientSecret => "client_secret",
            SecretField::Password => "password",
            SecretField::ApplicationCredentialSecret => "application_credential_secret",
        }
    }
}

/// Deterministic identifier of one credential use-site
///
/// Shared between the population pass and the compiler; both must build keys
/// through this type only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SecretCacheKey(String);

impl SecretCacheKey {
    /// Key for entry `index` of the mechanism identified by `discriminator`
    pub fn new(kind: &str, namespace: &str, name: &str, discriminator: &str, index: usize) -> Self {
        Self(format!(
            "{}/{}/{}/{}/{}",
            kind, namespace, name, discriminator, index
        ))
    }

    /// Key for the job-level credentials of a resource
    pub fn top_level(kind: &str, namespace: &str, name: &str) -> Self {
        Self::new(kind, namespace, name, "", 0)
    }

    /// Key for a single-value secret field of this use-site
    pub fn field(&self, field: SecretField) -> Self {
        Self(format!("{}/{}", self.0, field.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecretCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only snapshot of resolved credentials for one reconciliation cycle
///
/// Lookups return `None` for a missing key; that is an ordinary outcome and
/// the corresponding output field is simply omitted. The snapshot is never
/// mutated once compilation starts, so it can be shared by reference across
/// concurrent compilations.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretCache {
    #[serde(default)]
    basic_auth: HashMap<String, BasicAuthCredentials>,
    #[serde(default)]
    authorization: HashMap<String, SensitiveString>,
    #[serde(default)]
    oauth2: HashMap<String, OAuth2Credentials>,
    #[serde(default)]
    values: HashMap<String, SensitiveString>,
}

impl SecretCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a cache snapshot dumped by the population pass
    pub fn from_yaml(input: &str) -> crate::error::Result<Self> {
        Ok(serde_yaml::from_str(input)?)
    }

    pub fn insert_basic_auth(&mut self, key: &SecretCacheKey, creds: BasicAuthCredentials) {
        self.basic_auth.insert(key.0.clone(), creds);
    }

    pub fn insert_authorization(&mut self, key: &SecretCacheKey, credentials: impl Into<String>) {
        self.authorization
            .insert(key.0.clone(), SensitiveString::new(credentials));
    }

    pub fn insert_oauth2(&mut self, key: &SecretCacheKey, creds: OAuth2Credentials) {
        self.oauth2.insert(key.0.clone(), creds);
    }

    pub fn insert_value(&mut self, key: &SecretCacheKey, field: SecretField, value: impl Into<String>) {
        self.values
            .insert(key.field(field).0, SensitiveString::new(value));
    }

    pub fn basic_auth(&self, key: &SecretCacheKey) -> Option<&BasicAuthCredentials> {
        self.basic_auth.get(key.as_str())
    }

    pub fn authorization(&self, key: &SecretCacheKey) -> Option<&SensitiveString> {
        self.authorization.get(key.as_str())
    }

    pub fn oauth2(&self, key: &SecretCacheKey) -> Option<&OAuth2Credentials> {
        self.oauth2.get(key.as_str())
    }

    pub fn value(&self, key: &SecretCacheKey, field: SecretField) -> Option<&SensitiveString> {
        self.values.get(key.field(field).as_str())
    }

    /// Total number of cached use-sites
    pub fn len(&self) -> usize {
        self.basic_auth.len() + self.authorization.len() + self.oauth2.len() + self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for SecretCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretCache")
            .field("basic_auth", &self.basic_auth.len())
            .field("authorization", &self.authorization.len())
            .field("oauth2", &self.oauth2.len())
            .field("values", &self.values.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        assert_eq!(
            SecretCacheKey::top_level("scrapeConfig", "default", "static-1").as_str(),
            "scrapeConfig/default/static-1//0"
        );
        assert_eq!(
            SecretCacheKey::new("scrapeConfig", "default", "httpsd-1", "httpsd", 1).to_string(),
            "scrapeConfig/default/httpsd-1/httpsd/1"
        );
        assert_eq!(
            SecretCacheKey::new("scrapeConfig", "default", "c", "consulsd", 0)
                .field(SecretField::Token)
                .as_str(),
            "scrapeConfig/default/c/consulsd/0/token"
        );
    }

    #[test]
    fn test_keys_do_not_collide() {
        let keys = [
            SecretCacheKey::top_level("scrapeConfig", "default", "a"),
            SecretCacheKey::new("scrapeConfig", "default", "a", "httpsd", 0),
            SecretCacheKey::new("scrapeConfig", "default", "a", "httpsd", 1),
            SecretCacheKey::new("scrapeConfig", "default", "a", "kubernetessd", 0),
            SecretCacheKey::new("scrapeConfig", "other", "a", "httpsd", 0),
            SecretCacheKey::new("scrapeConfig", "default", "b", "httpsd", 0),
            SecretCacheKey::new("scrapeConfig", "default", "a", "httpsd", 0).field(SecretField::Token),
        ];
        let unique: std::collections::HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
    }

    #[test]
    fn test_lookup_hit_and_miss() {
        let key = SecretCacheKey::top_level("scrapeConfig", "default", "static-1");
        let mut cache = SecretCache::new();
        cache.insert_basic_auth(&key, BasicAuthCredentials::new("admin", "dangerous"));

        let creds = cache.basic_auth(&key).unwrap();
        assert_eq!(creds.username.as_ref().unwrap().expose_secret(), "admin");
        assert!(cache
            .basic_auth(&SecretCacheKey::top_level("scrapeConfig", "default", "static-2"))
            .is_none());
        assert!(cache.authorization(&key).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_field_values_are_scoped_by_field() {
        let key = SecretCacheKey::new("scrapeConfig", "default", "ec2", "ec2sd", 0);
        let mut cache = SecretCache::new();
        cache.insert_value(&key, SecretField::AccessKey, "AKIA");

        assert_eq!(
            cache.value(&key, SecretField::AccessKey).unwrap().expose_secret(),
            "AKIA"
        );
        assert!(cache.value(&key, SecretField::SecretKey).is_none());
    }

    #[test]
    fn test_debug_never_prints_values() {
        let key = SecretCacheKey::top_level("scrapeConfig", "default", "static-1");
        let mut cache = SecretCache::new();
        cache.insert_basic_auth(&key, BasicAuthCredentials::new("admin", "dangerous"));
        cache.insert_authorization(&key, "bearer-token");

        let debug = format!("{:?} {:?}", cache, cache.basic_auth(&key));
        assert!(!debug.contains("dangerous"));
        assert!(!debug.contains("bearer-token"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_from_yaml_snapshot() {
        let cache = SecretCache::from_yaml(
            r#"
basicAuth:
  scrapeConfig/default/file-1//0:
    username: user
authorization:
  scrapeConfig/default/httpsd-1/httpsd/1: auth-secret
oauth2:
  scrapeConfig/default/do/digitaloceansd/0:
    clientId: some-id
    clientSecret: some-secret
values:
  scrapeConfig/default/c/consulsd/0/token: consul-token
"#,
        )
        .unwrap();

        let file_key = SecretCacheKey::top_level("scrapeConfig", "default", "file-1");
        let creds = cache.basic_auth(&file_key).unwrap();
        assert!(creds.password.is_none());
        assert_eq!(cache.len(), 4);

        let consul_key = SecretCacheKey::new("scrapeConfig", "default", "c", "consulsd", 0);
        assert_eq!(
            cache
                .value(&consul_key, SecretField::Token)
                .unwrap()
                .expose_secret(),
            "consul-token"
        );
    }
}
