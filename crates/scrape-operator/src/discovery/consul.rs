//! Consul catalog discovery

use crate::auth::{
    AuthorizationFragment, BasicAuthFragment, CredentialScope, OAuth2Fragment, TlsFragment,
};
use crate::config::RenderedSecret;
use crate::crd::ConsulSdConfig;
use crate::secrets::SecretField;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConsulSdFragment {
    pub server: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<RenderedSecret>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datacenter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_separator: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub node_meta: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_stale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<BasicAuthFragment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization: Option<AuthorizationFragment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth2: Option<OAuth2Fragment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_redirects: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_config: Option<TlsFragment>,
}

pub(super) fn build_consul(spec: &ConsulSdConfig, creds: &CredentialScope<'_>) -> ConsulSdFragment {
    ConsulSdFragment {
        server: spec.server.clone(),
        token: spec
            .token_ref
            .as_ref()
            .and_then(|_| creds.value(SecretField::Token)),
        datacenter: spec.datacenter.clone(),
        namespace: spec.namespace.clone(),
        partition: spec.partition.clone(),
        scheme: spec.scheme.clone(),
        services: spec.services.clone(),
        tags: spec.tags.clone(),
        tag_separator: spec.tag_separator.clone(),
        node_meta: spec.node_meta.clone(),
        allow_stale: spec.allow_stale,
        basic_auth: creds.basic_auth(spec.basic_auth.as_ref()),
        authorization: creds.authorization(spec.authorization.as_ref()),
        oauth2: creds.oauth2(spec.oauth2.as_ref()),
        proxy_url: spec.proxy_url.clone(),
        follow_redirects: spec.follow_redirects,
        tls_config: creds.tls_config(spec.tls_config.as_ref()),
    }
}
