use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    analyses_total: AtomicU64,
    classifier_calls_total: AtomicU64,
    segment_failures_total: AtomicU64,
    boosts_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub analyses_total: u64,
    pub classifier_calls_total: u64,
    pub segment_failures_total: u64,
    pub boosts_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_analysis(&self) {
        self.analyses_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_classifier_call(&self) {
        self.classifier_calls_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_segment_failure(&self) {
        self.segment_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_boost(&self) {
        self.boosts_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let analyses = self.analyses_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            analyses_total: analyses,
            classifier_calls_total: self.classifier_calls_total.load(Ordering::Relaxed),
            segment_failures_total: self.segment_failures_total.load(Ordering::Relaxed),
            boosts_total: self.boosts_total.load(Ordering::Relaxed),
            avg_latency_millis: if analyses == 0 {
                0.0
            } else {
                latency as f64 / analyses as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,buddy_api=info,buddy_agents=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}
