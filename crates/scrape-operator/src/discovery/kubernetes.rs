//! Kubernetes API discovery

use crate::auth::{
    AuthorizationFragment, BasicAuthFragment, CredentialScope, OAuth2Fragment, TlsFragment,
};
use crate::crd::{K8sSelectorConfig, KubernetesSdConfig, NamespaceDiscovery};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KubernetesSdFragment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_server: Option<String>,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<BasicAuthFragment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization: Option<AuthorizationFragment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth2: Option<OAuth2Fragment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_config: Option<TlsFragment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_redirects: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespaces: Option<NamespacesFragment>,
    /// Only ever `Some(true)`; the agent treats a missing key as false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attach_metadata: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selectors: Vec<SelectorFragment>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NamespacesFragment {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub own_namespace: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SelectorFragment {
    pub role: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub field: String,
}

pub(super) fn build_kubernetes(
    spec: &KubernetesSdConfig,
    creds: &CredentialScope<'_>,
) -> KubernetesSdFragment {
    KubernetesSdFragment {
        api_server: spec.api_server.clone(),
        role: spec.role.clone(),
        basic_auth: creds.basic_auth(spec.basic_auth.as_ref()),
        authorization: creds.authorization(spec.authorization.as_ref()),
        oauth2: creds.oauth2(spec.oauth2.as_ref()),
        tls_config: creds.tls_config(spec.tls_config.as_ref()),
        proxy_url: spec.proxy_url.clone(),
        follow_redirects: spec.follow_redirects,
        namespaces: spec.namespaces.as_ref().and_then(namespaces),
        attach_metadata: spec.attach_metadata.node.filter(|node| *node),
        selectors: spec.selectors.iter().map(selector).collect(),
    }
}

fn namespaces(ns: &NamespaceDiscovery) -> Option<NamespacesFragment> {
    if !ns.own_namespace && ns.names.is_empty() {
        return None;
    }
    Some(NamespacesFragment {
        own_namespace: ns.own_namespace,
        names: ns.names.clone(),
    })
}

fn selector(sel: &K8sSelectorConfig) -> SelectorFragment {
    SelectorFragment {
        role: sel.role.clone(),
        label: sel.label.clone(),
        field: sel.field.clone(),
    }
}
