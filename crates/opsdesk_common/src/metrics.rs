//! Metric threshold analyzer.
//!
//! A fixed rule table maps known component metrics to severity
//! findings. Rules are evaluated in table order and independently; the
//! output order of issues is the table order, never a severity sort.

use crate::types::{Issue, MetricSnapshot, Severity};

/// One diagnostic check: (component, metric, bound, severity) plus the
/// finding text.
pub struct ThresholdRule {
    /// Key of the component section in the snapshot.
    pub component: &'static str,
    /// Display name carried into the Issue.
    pub display_name: &'static str,
    pub metric: &'static str,
    pub threshold: f64,
    pub severity: Severity,
    describe: fn(f64) -> String,
}

/// The rule table. Order is a behavioral contract: it fixes the order
/// of emitted issues.
pub const THRESHOLD_RULES: &[ThresholdRule] = &[
    ThresholdRule {
        component: "authentication_service",
        display_name: "Authentication Service",
        metric: "error_rate_percent",
        threshold: 5.0,
        severity: Severity::High,
        describe: |v| format!("Error rate is {}% (threshold: 5%)", v),
    },
    ThresholdRule {
        component: "authentication_service",
        display_name: "Authentication Service",
        metric: "avg_response_time_ms",
        threshold: 500.0,
        severity: Severity::Medium,
        describe: |v| format!("Slow response time: {}ms (threshold: 500ms)", v),
    },
    ThresholdRule {
        component: "redis_connection",
        display_name: "Redis Connection",
        metric: "avg_response_time_ms",
        threshold: 100.0,
        severity: Severity::High,
        describe: |v| format!("Very slow response: {}ms (threshold: 100ms)", v),
    },
    ThresholdRule {
        component: "redis_connection",
        display_name: "Redis Connection",
        metric: "timeout_count",
        threshold: 0.0,
        severity: Severity::Critical,
        describe: |v| format!("{} connection timeouts detected", v),
    },
    ThresholdRule {
        component: "dashboard_service",
        display_name: "Dashboard Service",
        metric: "avg_response_time_ms",
        threshold: 3000.0,
        severity: Severity::High,
        describe: |v| format!("Very slow response: {}ms (threshold: 3000ms)", v),
    },
    ThresholdRule {
        component: "database_queries",
        display_name: "Database Queries",
        metric: "avg_query_time_ms",
        threshold: 1000.0,
        severity: Severity::High,
        describe: |v| format!("Slow query performance: {}ms avg (threshold: 1000ms)", v),
    },
    ThresholdRule {
        component: "server_resources",
        display_name: "Server Resources",
        metric: "memory_percent",
        threshold: 85.0,
        severity: Severity::Medium,
        describe: |v| format!("High memory usage: {}% (threshold: 85%)", v),
    },
    ThresholdRule {
        component: "server_resources",
        display_name: "Server Resources",
        metric: "disk_io_percent",
        threshold: 80.0,
        severity: Severity::High,
        describe: |v| format!("High disk I/O: {}% (threshold: 80%)", v),
    },
    ThresholdRule {
        component: "database_pool",
        display_name: "Database Pool",
        metric: "pool_utilization_percent",
        threshold: 90.0,
        severity: Severity::Critical,
        describe: |v| format!("Connection pool nearly exhausted: {}% (threshold: 90%)", v),
    },
];

/// Run every rule against the snapshot and return the triggered
/// findings in rule-table order.
///
/// A rule only applies when its component section is present; within a
/// present section a missing metric reads as 0. Comparison is strictly
/// greater-than. Rules never suppress each other. An empty snapshot
/// yields no issues.
pub fn analyze(snapshot: &MetricSnapshot) -> Vec<Issue> {
    let mut issues = Vec::new();

    for rule in THRESHOLD_RULES {
        let Some(section) = snapshot.get(rule.component) else {
            continue;
        };
        let value = section.get(rule.metric).copied().unwrap_or(0.0);
        if value > rule.threshold {
            issues.push(Issue {
                severity: rule.severity,
                component: rule.display_name.to_string(),
                issue: (rule.describe)(value),
                metric: rule.metric.to_string(),
            });
        }
    }

    issues
}
