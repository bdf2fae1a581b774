//! # Scrape Operator
//!
//! Compiles `ScrapeConfig` custom resources into the `scrape_configs` section
//! of a metrics agent configuration file.
//!
//! The interesting part of the operator is the compiler: a resource may
//! declare any number of service discovery mechanisms, each with its own
//! authentication and TLS material, and the compiler must turn it into a
//! byte-stable job definition while resolving every credential from a secret
//! cache populated elsewhere. Watching resources, populating the cache and
//! persisting the output belong to the surrounding reconciler.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scrape_operator::prelude::*;
//!
//! let defaults = ScrapeDefaults {
//!     min_scrape_interval: Some("30s".to_string()),
//!     max_scrape_interval: Some("5m".to_string()),
//!     ..Default::default()
//! };
//! let cache = SecretCache::from_yaml(&snapshot)?;
//!
//! let job = compile(&resource, &defaults, &cache)?;
//! println!("{}", job.to_yaml()?);
//! ```
//!
//! ## Pipeline
//!
//! 1. **Interval**: the resource interval is clamped to the operator bounds
//! 2. **Job settings**: name, honor labels, HTTP client and auth settings
//! 3. **Sections**: one section per declared discovery mechanism, always in
//!    [`discovery::Mechanism::CANONICAL_ORDER`]
//! 4. **Render**: the assembled job serializes with `serde_yaml`
//!
//! ## Custom Resource Definition
//!
//! ```yaml
//! apiVersion: monitoring.scrape-operator.dev/v1beta1
//! kind: ScrapeConfig
//! metadata:
//!   name: static-1
//!   namespace: default
//! spec:
//!   scrapeInterval: 10s
//!   basicAuth:
//!     username:
//!       name: creds
//!       key: username
//!     password:
//!       name: creds
//!       key: password
//!   staticConfigs:
//!     - targets: ["http://test1.com", "http://test2.com"]
//!       labels:
//!         bar: baz
//! ```
//!
//! ## Secrets
//!
//! Credentials are looked up by [`secrets::SecretCacheKey`], which encodes the
//! resource, the discovery mechanism and the entry index. Values are held in
//! redacting wrappers so neither the cache nor a compiled job leaks them
//! through `Debug`.
//!
//! ## Metrics
//!
//! [`compiler::compile_all`] records:
//!
//! - `scrape_operator_compiled_jobs_total` - Jobs compiled
//! - `scrape_operator_compile_failures_total` - Resources that failed to compile
//! - `scrape_operator_compile_duration_seconds` - Pass latency

pub mod auth;
pub mod compiler;
pub mod config;
pub mod crd;
pub mod discovery;
pub mod error;
pub mod interval;
pub mod secrets;

pub mod prelude {
    //! Re-exports for convenient usage
    pub use crate::compiler::{compile, compile_all, CompileFailure, CompiledScrapeConfigs};
    pub use crate::config::{AssembledJobConfig, ScrapeConfigFile, ScrapeDefaults};
    pub use crate::crd::{ScrapeConfig, ScrapeConfigSpec};
    pub use crate::discovery::Mechanism;
    pub use crate::error::{OperatorError, Result};
    pub use crate::secrets::{SecretCache, SecretCacheKey};
}
