//! Cloud provider discovery: EC2, Azure, GCE, OpenStack and DigitalOcean
//!
//! Provider API credentials that are not one of the shared auth blocks are
//! looked up per field under the entry's cache key, and only when the entry
//! actually references them.

use crate::auth::{AuthorizationFragment, CredentialScope, OAuth2Fragment, TlsFragment};
use crate::config::RenderedSecret;
use crate::crd::{
    AzureSdConfig, DigitalOceanSdConfig, Ec2Filter, Ec2SdConfig, GceSdConfig, OpenStackSdConfig,
    SecretKeySelector,
};
use crate::secrets::SecretField;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Ec2SdFragment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<RenderedSecret>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<RenderedSecret>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Ec2FilterFragment>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Ec2FilterFragment {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AzureSdFragment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication_method: Option<String>,
    pub subscription_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<RenderedSecret>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GceSdFragment {
    pub project: String,
    pub zone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_separator: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OpenStackSdFragment {
    pub role: String,
    /// Required by the agent schema, emitted even when empty
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub userid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<RenderedSecret>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_credential_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_credential_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_credential_secret: Option<RenderedSecret>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_tenants: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_config: Option<TlsFragment>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DigitalOceanSdFragment {
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
}

fn referenced(
    reference: &Option<SecretKeySelector>,
    creds: &CredentialScope<'_>,
    field: SecretField,
) -> Option<RenderedSecret> {
    reference.as_ref().and_then(|_| creds.value(field))
}

pub(super) fn build_ec2(spec: &Ec2SdConfig, creds: &CredentialScope<'_>) -> Ec2SdFragment {
    Ec2SdFragment {
        region: spec.region.clone(),
        access_key: referenced(&spec.access_key, creds, SecretField::AccessKey),
        secret_key: referenced(&spec.secret_key, creds, SecretField::SecretKey),
        role_arn: spec.role_arn.clone(),
        port: spec.port,
        filters: spec.filters.iter().map(ec2_filter).collect(),
    }
}

fn ec2_filter(filter: &Ec2Filter) -> Ec2FilterFragment {
    Ec2FilterFragment {
        name: filter.name.clone(),
        values: filter.values.clone(),
    }
}

pub(super) fn build_azure(spec: &AzureSdConfig, creds: &CredentialScope<'_>) -> AzureSdFragment {
    AzureSdFragment {
        environment: spec.environment.clone(),
        authentication_method: spec.authentication_method.clone(),
        subscription_id: spec.subscription_id.clone(),
        tenant_id: spec.tenant_id.clone(),
        client_id: spec.client_id.clone(),
        client_secret: referenced(&spec.client_secret, creds, SecretField::ClientSecret),
        resource_group: spec.resource_group.clone(),
        port: spec.port,
    }
}

pub(super) fn build_gce(spec: &GceSdConfig, _creds: &CredentialScope<'_>) -> GceSdFragment {
    GceSdFragment {
        project: spec.project.clone(),
        zone: spec.zone.clone(),
        filter: spec.filter.clone(),
        port: spec.port,
        tag_separator: spec.tag_separator.clone(),
    }
}

pub(super) fn build_openstack(
    spec: &OpenStackSdConfig,
    creds: &CredentialScope<'_>,
) -> OpenStackSdFragment {
    OpenStackSdFragment {
        role: spec.role.clone(),
        region: spec.region.clone(),
        identity_endpoint: spec.identity_endpoint.clone(),
        username: spec.username.clone(),
        userid: spec.user_id.clone(),
        password: referenced(&spec.password, creds, SecretField::Password),
        domain_name: spec.domain_name.clone(),
        domain_id: spec.domain_id.clone(),
        project_name: spec.project_name.clone(),
        project_id: spec.project_id.clone(),
        application_credential_name: spec.application_credential_name.clone(),
        application_credential_id: spec.application_credential_id.clone(),
        application_credential_secret: referenced(
            &spec.application_credential_secret,
            creds,
            SecretField::ApplicationCredentialSecret,
        ),
        all_tenants: spec.all_tenants,
        port: spec.port,
        availability: spec.availability.clone(),
        tls_config: creds.tls_config(spec.tls_config.as_ref()),
    }
}

pub(super) fn build_digitalocean(
    spec: &DigitalOceanSdConfig,
    creds: &CredentialScope<'_>,
) -> DigitalOceanSdFragment {
    DigitalOceanSdFragment {
        authorization: creds.authorization(spec.authorization.as_ref()),
        oauth2: creds.oauth2(spec.oauth2.as_ref()),
        proxy_url: spec.proxy_url.clone(),
        follow_redirects: spec.follow_redirects,
        tls_config: creds.tls_config(spec.tls_config.as_ref()),
        port: spec.port,
    }
}
