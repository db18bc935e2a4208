//! Routing and compression metrics.
//!
//! # Metrics
//! - `cacheroute_failover_attempts_total` (counter): requests sent to a
//!   failover target after an earlier target failed
//! - `cacheroute_failover_exhausted_total` (counter): requests for which
//!   every failover target failed
//! - `cacheroute_codec_maps_built_total` (counter): per-thread codec maps built
//! - `cacheroute_codec_map_size` (gauge): codecs in the last built map

/// Record one failed-over attempt.
pub fn record_failover_attempt() {
    metrics::counter!("cacheroute_failover_attempts_total").increment(1);
}

/// Record a request that failed on every failover target.
pub fn record_failover_exhausted() {
    metrics::counter!("cacheroute_failover_exhausted_total").increment(1);
}

/// Record a per-thread codec map build.
pub fn record_codec_map_built(size: usize) {
    metrics::counter!("cacheroute_codec_maps_built_total").increment(1);
    metrics::gauge!("cacheroute_codec_map_size").set(size as f64);
}
