use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Counters for one `lorekeep` run
#[derive(Default)]
pub struct Metrics {
    documents_read: AtomicUsize,
    entities_extracted: AtomicUsize,
    duplicate_groups: AtomicUsize,
    merges_applied: AtomicUsize,
    entities_removed: AtomicUsize,

    // Timing (in microseconds)
    total_ingest_time_us: AtomicU64,
    total_extract_time_us: AtomicU64,
    total_resolve_time_us: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_ingest(&self, duration: Duration, documents: usize) {
        self.total_ingest_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.documents_read.fetch_add(documents, Ordering::Relaxed);
    }

    pub fn record_extract(&self, duration: Duration, entities: usize) {
        self.total_extract_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.entities_extracted.fetch_add(entities, Ordering::Relaxed);
    }

    pub fn record_resolve(&self, duration: Duration, groups: usize) {
        self.total_resolve_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.duplicate_groups.fetch_add(groups, Ordering::Relaxed);
    }

    pub fn record_merge(&self, removed: usize) {
        self.merges_applied.fetch_add(1, Ordering::Relaxed);
        self.entities_removed.fetch_add(removed, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let documents = self.documents_read.load(Ordering::Relaxed);
        MetricsSnapshot {
            documents_read: documents,
            entities_extracted: self.entities_extracted.load(Ordering::Relaxed),
            duplicate_groups: self.duplicate_groups.load(Ordering::Relaxed),
            merges_applied: self.merges_applied.load(Ordering::Relaxed),
            entities_removed: self.entities_removed.load(Ordering::Relaxed),
            avg_ingest_time_ms: avg_time_ms(&self.total_ingest_time_us, documents),
            avg_extract_time_ms: avg_time_ms(&self.total_extract_time_us, documents),
            resolve_time_ms: avg_time_ms(&self.total_resolve_time_us, 1),
        }
    }
}

fn avg_time_ms(total_us: &AtomicU64, count: usize) -> f64 {
    let total = total_us.load(Ordering::Relaxed) as f64;
    if count > 0 {
        total / count as f64 / 1000.0 // Convert to ms
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub documents_read: usize,
    pub entities_extracted: usize,
    pub duplicate_groups: usize,
    pub merges_applied: usize,
    pub entities_removed: usize,
    pub avg_ingest_time_ms: f64,
    pub avg_extract_time_ms: f64,
    pub resolve_time_ms: f64,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts() {
        let metrics = Metrics::new();
        metrics.record_ingest(Duration::from_millis(4), 2);
        metrics.record_extract(Duration::from_millis(2), 7);
        metrics.record_extract(Duration::from_millis(2), 3);
        metrics.record_merge(1);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_read, 2);
        assert_eq!(snapshot.entities_extracted, 10);
        assert_eq!(snapshot.merges_applied, 1);
        assert_eq!(snapshot.entities_removed, 1);
        assert!((snapshot.avg_ingest_time_ms - 2.0).abs() < f64::EPSILON);
        assert!((snapshot.avg_extract_time_ms - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Metrics::new().snapshot();
        assert_eq!(snapshot.avg_ingest_time_ms, 0.0);
    }
}
