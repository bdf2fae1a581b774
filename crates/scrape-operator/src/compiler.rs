//! Scrape job compilation
//!
//! [`compile`] turns one `ScrapeConfig` into one [`AssembledJobConfig`]. It is
//! a pure function of the resource, the operator defaults and the secret
//! cache snapshot: no I/O, no shared mutable state, and the same inputs always
//! produce the same output.
//!
//! [`compile_all`] runs a whole reconciliation pass over many resources and
//! produces the aggregate `scrape_configs` document.

use crate::config::{AssembledJobConfig, RelabelRule, ScrapeConfigFile, ScrapeDefaults, Sections};
use crate::crd::{ScrapeConfig, SCRAPE_CONFIG_KIND_PREFIX};
use crate::discovery::{build_sections, ResourceScope};
use crate::error::{OperatorError, Result};
use crate::interval::resolve_scrape_interval;
use crate::secrets::SecretCache;
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Job name of a resource, `scrapeConfig/<namespace>/<name>`
pub fn job_name(namespace: &str, name: &str) -> String {
    format!("{}/{}/{}", SCRAPE_CONFIG_KIND_PREFIX, namespace, name)
}

/// Builder assembling the scrape job of one `ScrapeConfig`
pub struct JobBuilder<'a> {
    resource: &'a ScrapeConfig,
    name: String,
    namespace: String,
    defaults: &'a ScrapeDefaults,
    cache: &'a SecretCache,
}

impl<'a> JobBuilder<'a> {
    /// Create a new job builder
    pub fn new(
        resource: &'a ScrapeConfig,
        defaults: &'a ScrapeDefaults,
        cache: &'a SecretCache,
    ) -> Result<Self> {
        let name = resource
            .metadata
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| OperatorError::InvalidConfig("resource name is required".to_string()))?;

        let namespace = resource
            .metadata
            .namespace
            .clone()
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| "default".to_string());

        Ok(Self {
            resource,
            name,
            namespace,
            defaults,
            cache,
        })
    }

    pub fn job_name(&self) -> String {
        job_name(&self.namespace, &self.name)
    }

    /// Build the job
    pub fn build(&self) -> Result<AssembledJobConfig> {
        let spec = &self.resource.spec;
        let scope = ResourceScope::new(&self.namespace, &self.name, self.cache);
        let creds = scope.top_level();

        let scrape_interval = resolve_scrape_interval(
            spec.scrape_interval.as_deref(),
            self.defaults.min_scrape_interval.as_deref(),
            self.defaults.max_scrape_interval.as_deref(),
        )?;

        let sections = build_sections(spec, &scope);

        Ok(AssembledJobConfig {
            job_name: self.job_name(),
            honor_labels: self.honor_labels(),
            scrape_interval,
            scrape_timeout: spec.scrape_timeout.clone().filter(|t| !t.is_empty()),
            metrics_path: spec.path.clone().filter(|p| !p.is_empty()),
            honor_timestamps: spec.honor_timestamps,
            params: spec.params.clone(),
            scheme: spec.scheme.clone().filter(|s| !s.is_empty()),
            follow_redirects: spec.follow_redirects,
            proxy_url: spec.proxy_url.clone().filter(|p| !p.is_empty()),
            sample_limit: spec.sample_limit,
            series_limit: spec.series_limit,
            tls_config: creds.tls_config(spec.tls_config.as_ref()),
            basic_auth: creds.basic_auth(spec.basic_auth.as_ref()),
            authorization: creds.authorization(spec.authorization.as_ref()),
            oauth2: creds.oauth2(spec.oauth2.as_ref()),
            relabel_configs: self.relabel_configs(),
            metric_relabel_configs: spec
                .metric_relabel_configs
                .iter()
                .map(RelabelRule::from)
                .collect(),
            sections: Sections(sections),
        })
    }

    fn honor_labels(&self) -> bool {
        if self.defaults.override_honor_labels {
            return false;
        }
        self.resource.spec.honor_labels.unwrap_or(false)
    }

    /// Label stamping the resource namespace, resource setting first
    fn enforced_namespace_label(&self) -> Option<&str> {
        self.resource
            .spec
            .enforced_namespace_label
            .as_deref()
            .or(self.defaults.enforced_namespace_label.as_deref())
            .filter(|label| !label.is_empty())
    }

    fn relabel_configs(&self) -> Vec<RelabelRule> {
        let mut rules: Vec<RelabelRule> = self
            .resource
            .spec
            .relabel_configs
            .iter()
            .map(RelabelRule::from)
            .collect();
        if let Some(label) = self.enforced_namespace_label() {
            rules.push(RelabelRule::enforce_namespace(label, &self.namespace));
        }
        rules
    }
}

/// Compile one resource into its scrape job
#[instrument(
    skip(resource, defaults, cache),
    fields(name = ?resource.metadata.name, namespace = ?resource.metadata.namespace)
)]
pub fn compile(
    resource: &ScrapeConfig,
    defaults: &ScrapeDefaults,
    cache: &SecretCache,
) -> Result<AssembledJobConfig> {
    let job = JobBuilder::new(resource, defaults, cache)?.build()?;
    debug!(
        job = %job.job_name,
        sections = job.sections.len(),
        interval = ?job.scrape_interval,
        "Compiled scrape job"
    );
    Ok(job)
}

/// A resource that failed to compile; the rest of the pass is unaffected
#[derive(Debug)]
pub struct CompileFailure {
    pub namespace: String,
    pub name: String,
    pub error: OperatorError,
}

/// Outcome of one aggregate pass
#[derive(Debug, Default)]
pub struct CompiledScrapeConfigs {
    /// Successfully compiled jobs, sorted by job name
    pub file: ScrapeConfigFile,
    pub failures: Vec<CompileFailure>,
}

impl CompiledScrapeConfigs {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Metrics for compilation passes
#[derive(Clone)]
pub struct CompilerMetrics {
    /// Counter for compiled jobs
    pub jobs: metrics::Counter,
    /// Counter for resources that failed to compile
    pub failures: metrics::Counter,
    /// Histogram for pass duration
    pub duration: metrics::Histogram,
}

impl CompilerMetrics {
    pub fn new() -> Self {
        Self {
            jobs: metrics::counter!("scrape_operator_compiled_jobs_total"),
            failures: metrics::counter!("scrape_operator_compile_failures_total"),
            duration: metrics::histogram!("scrape_operator_compile_duration_seconds"),
        }
    }
}

impl Default for CompilerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile every resource of one reconciliation cycle
///
/// Jobs come out sorted by job name. A resource whose job name was already
/// produced earlier in `resources` is reported as a failure and skipped. The
/// cancellation token is checked between resources; a cancelled pass
/// returns [`OperatorError::Cancelled`] and its partial output is dropped.
#[instrument(skip_all, fields(resources = resources.len()))]
pub fn compile_all(
    resources: &[ScrapeConfig],
    defaults: &ScrapeDefaults,
    cache: &SecretCache,
    cancel: &CancellationToken,
) -> Result<CompiledScrapeConfigs> {
    let start = std::time::Instant::now();
    let metrics = CompilerMetrics::new();

    let mut out = CompiledScrapeConfigs::default();
    let mut seen = HashSet::new();

    for (compiled, resource) in resources.iter().enumerate() {
        if cancel.is_cancelled() {
            warn!(compiled, "Compilation pass cancelled");
            metrics.duration.record(start.elapsed().as_secs_f64());
            return Err(OperatorError::Cancelled { compiled });
        }

        let name = resource.metadata.name.clone().unwrap_or_default();
        let namespace = resource
            .metadata
            .namespace
            .clone()
            .unwrap_or_else(|| "default".to_string());

        let result = compile(resource, defaults, cache).and_then(|job| {
            if seen.insert(job.job_name.clone()) {
                Ok(job)
            } else {
                Err(OperatorError::DuplicateJob(job.job_name))
            }
        });

        match result {
            Ok(job) => {
                metrics.jobs.increment(1);
                out.file.scrape_configs.push(job);
            }
            Err(error) => {
                warn!(name = %name, namespace = %namespace, error = %error, "Failed to compile ScrapeConfig");
                metrics.failures.increment(1);
                out.failures.push(CompileFailure {
                    namespace,
                    name,
                    error,
                });
            }
        }
    }

    out.file
        .scrape_configs
        .sort_by(|a, b| a.job_name.cmp(&b.job_name));
    metrics.duration.record(start.elapsed().as_secs_f64());

    info!(
        jobs = out.file.scrape_configs.len(),
        failures = out.failures.len(),
        "Compilation pass complete"
    );
    Ok(out)
}
