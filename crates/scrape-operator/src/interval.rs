//! Scrape interval resolution
//!
//! A resource may override the scrape interval, but the operator bounds it:
//! values below `minScrapeInterval` become the minimum, values above
//! `maxScrapeInterval` become the maximum. The emitted value is always one of
//! the literals as written, never a re-rendered duration.

use crate::error::{OperatorError, Result};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

/// Duration grammar the agent accepts: `<digits><unit>` groups, no whitespace
static AGENT_DURATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+(ms|s|m|h|d|w|y))+$").unwrap());

/// Parse a duration literal such as `30s`, `5m` or `1h30m`
///
/// Literals outside the agent's grammar are rejected even when humantime
/// could read them (`5min`, `1h 30m`, `1M`), since the literal is emitted as
/// written.
pub fn parse_duration(field: &'static str, value: &str) -> Result<Duration> {
    if !AGENT_DURATION_REGEX.is_match(value) {
        return Err(OperatorError::InvalidDuration {
            field,
            value: value.to_string(),
            reason: "expected <digits><ms|s|m|h|d|w|y> groups such as 30s or 1m30s".to_string(),
        });
    }
    humantime::parse_duration(value).map_err(|e| OperatorError::InvalidDuration {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Resolve the effective scrape interval of one job
///
/// Returns `None` when the resource declares no interval: the agent then
/// applies its own global default. Bounds are validated even when unused so a
/// broken operator setting surfaces on the first compilation.
pub fn resolve_scrape_interval(
    interval: Option<&str>,
    min: Option<&str>,
    max: Option<&str>,
) -> Result<Option<String>> {
    let min = min
        .filter(|m| !m.is_empty())
        .map(|m| parse_duration("minScrapeInterval", m).map(|d| (m, d)))
        .transpose()?;
    let max = max
        .filter(|m| !m.is_empty())
        .map(|m| parse_duration("maxScrapeInterval", m).map(|d| (m, d)))
        .transpose()?;

    let interval = match interval.filter(|i| !i.is_empty()) {
        Some(interval) => interval,
        None => return Ok(None),
    };
    let requested = parse_duration("scrapeInterval", interval)?;

    if let Some((literal, bound)) = min {
        if requested < bound {
            return Ok(Some(literal.to_string()));
        }
    }
    if let Some((literal, bound)) = max {
        if requested > bound {
            return Ok(Some(literal.to_string()));
        }
    }
    Ok(Some(interval.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_interval_is_omitted() {
        assert_eq!(resolve_scrape_interval(None, None, None).unwrap(), None);
        assert_eq!(
            resolve_scrape_interval(None, Some("30s"), Some("5m")).unwrap(),
            None
        );
        assert_eq!(resolve_scrape_interval(Some(""), Some("30s"), None).unwrap(), None);
    }

    #[test]
    fn test_clamped_up_to_minimum() {
        let resolved = resolve_scrape_interval(Some("10s"), Some("30s"), Some("5m")).unwrap();
        assert_eq!(resolved.as_deref(), Some("30s"));
    }

    #[test]
    fn test_clamped_down_to_maximum() {
        let resolved = resolve_scrape_interval(Some("10m"), Some("30s"), Some("5m")).unwrap();
        assert_eq!(resolved.as_deref(), Some("5m"));
    }

    #[test]
    fn test_within_bounds_passes_through_literal() {
        let resolved = resolve_scrape_interval(Some("1m30s"), Some("30s"), Some("5m")).unwrap();
        assert_eq!(resolved.as_deref(), Some("1m30s"));

        let resolved = resolve_scrape_interval(Some("30s"), Some("30s"), Some("5m")).unwrap();
        assert_eq!(resolved.as_deref(), Some("30s"));
    }

    #[test]
    fn test_absent_bound_is_unbounded() {
        let resolved = resolve_scrape_interval(Some("1s"), None, Some("5m")).unwrap();
        assert_eq!(resolved.as_deref(), Some("1s"));

        let resolved = resolve_scrape_interval(Some("2h"), Some("30s"), None).unwrap();
        assert_eq!(resolved.as_deref(), Some("2h"));
    }

    #[test]
    fn test_invalid_literals_are_errors() {
        let err = resolve_scrape_interval(Some("often"), None, None).unwrap_err();
        assert!(matches!(
            err,
            OperatorError::InvalidDuration {
                field: "scrapeInterval",
                ..
            }
        ));

        let err = resolve_scrape_interval(None, Some("soon"), None).unwrap_err();
        assert!(matches!(
            err,
            OperatorError::InvalidDuration {
                field: "minScrapeInterval",
                ..
            }
        ));

        let err = resolve_scrape_interval(Some("10s"), None, Some("5 parsecs")).unwrap_err();
        assert!(matches!(
            err,
            OperatorError::InvalidDuration {
                field: "maxScrapeInterval",
                ..
            }
        ));
    }

    #[test]
    fn test_literals_outside_agent_grammar_are_errors() {
        for literal in ["5min", "1h 30m", "1M", " 60s ", "10 minutes", "2hours", "30", "s"] {
            let err = resolve_scrape_interval(Some(literal), Some("1s"), Some("100d")).unwrap_err();
            assert!(
                matches!(
                    err,
                    OperatorError::InvalidDuration {
                        field: "scrapeInterval",
                        ..
                    }
                ),
                "{literal:?} should be rejected"
            );
        }

        let err = resolve_scrape_interval(Some("30s"), Some("30 s"), None).unwrap_err();
        assert!(matches!(
            err,
            OperatorError::InvalidDuration {
                field: "minScrapeInterval",
                ..
            }
        ));
    }

    #[test]
    fn test_agent_units_are_accepted() {
        for literal in ["500ms", "1h30m", "2d", "1w", "1y", "1m30s500ms"] {
            let resolved = resolve_scrape_interval(Some(literal), None, None).unwrap();
            assert_eq!(resolved.as_deref(), Some(literal));
        }
    }
}
