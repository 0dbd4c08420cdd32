//! Minimal metrics registry for the gateway.
//!
//! Labels are flattened into sorted key vectors to keep deterministic
//! ordering in the rendered output.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        let mut rows: Vec<(String, u64)> = self
            .map
            .iter()
            .map(|r| {
                let label_str = r
                    .key()
                    .iter()
                    .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                    .collect::<Vec<_>>()
                    .join(",");
                (label_str, r.value().load(Ordering::Relaxed))
            })
            .collect();
        rows.sort();
        for (labels, val) in rows {
            let _ = writeln!(out, "{}{{{}}} {}", name, labels, val);
        }
    }
}

#[derive(Default)]
pub struct GatewayMetrics {
    pub http_requests: CounterVec,
    pub policy_decisions: CounterVec,
    pub auth_failures: CounterVec,
    draining: AtomicBool,
}

impl GatewayMetrics {
    /// Mark draining state.
    pub fn set_draining(&self) {
        self.draining.store(true, Ordering::Relaxed);
    }
    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Relaxed)
    }

    /// Render all registered metrics plus any extra gauges provided by callers.
    pub fn render(&self, extra: &[(&str, u64)]) -> String {
        let mut out = String::new();
        self.http_requests.render("csrhub_http_requests_total", &mut out);
        self.policy_decisions.render("csrhub_policy_decisions_total", &mut out);
        self.auth_failures.render("csrhub_auth_failures_total", &mut out);

        let _ = writeln!(
            out,
            "# TYPE csrhub_draining gauge\ncsrhub_draining {}",
            if self.is_draining() { 1 } else { 0 }
        );
        for (k, v) in extra {
            let _ = writeln!(out, "# TYPE {} gauge\n{} {}", k, k, v);
        }
        out
    }
}
