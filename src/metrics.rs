//! Prometheus metrics
//!
//! Exposes request rates and latencies, upload counts, and which processing
//! path (language model or rule-based) served each operation.
//!
//! NOTE: document IDs are never used as labels to keep cardinality bounded.

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry};

lazy_static! {
    /// Global metrics registry
    pub static ref METRICS_REGISTRY: Registry = Registry::new();

    // ============================================================================
    // Request Metrics
    // ============================================================================

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "eduneuro_http_request_duration_seconds",
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["method", "endpoint", "status"]
    ).unwrap();

    /// Total HTTP requests
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("eduneuro_http_requests_total", "Total HTTP requests"),
        &["method", "endpoint", "status"]
    ).unwrap();

    // ============================================================================
    // Document Metrics
    // ============================================================================

    /// Uploaded documents by file type
    pub static ref DOCUMENTS_UPLOADED_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("eduneuro_documents_uploaded_total", "Total uploaded documents"),
        &["file_type"]
    ).unwrap();

    /// Rejected uploads by error code
    pub static ref UPLOAD_REJECTIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("eduneuro_upload_rejections_total", "Total rejected uploads"),
        &["code"]
    ).unwrap();

    /// Documents currently stored
    pub static ref DOCUMENTS_STORED: IntGauge = IntGauge::new(
        "eduneuro_documents_stored",
        "Number of documents in storage"
    ).unwrap();

    // ============================================================================
    // Processing Metrics
    // ============================================================================

    /// Processing operations by operation and source (llm / rule_based)
    pub static ref PROCESSING_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("eduneuro_processing_total", "Total text processing operations"),
        &["operation", "source"]
    ).unwrap();

    /// Language model call latency
    pub static ref LLM_REQUEST_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "eduneuro_llm_request_duration_seconds",
            "Language model request duration"
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0]),
        &["endpoint", "result"]
    ).unwrap();
}

/// Register all metrics with the global registry
pub fn register_metrics() -> Result<(), prometheus::Error> {
    METRICS_REGISTRY.register(Box::new(HTTP_REQUEST_DURATION.clone()))?;
    METRICS_REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()))?;

    METRICS_REGISTRY.register(Box::new(DOCUMENTS_UPLOADED_TOTAL.clone()))?;
    METRICS_REGISTRY.register(Box::new(UPLOAD_REJECTIONS_TOTAL.clone()))?;
    METRICS_REGISTRY.register(Box::new(DOCUMENTS_STORED.clone()))?;

    METRICS_REGISTRY.register(Box::new(PROCESSING_TOTAL.clone()))?;
    METRICS_REGISTRY.register(Box::new(LLM_REQUEST_DURATION.clone()))?;

    Ok(())
}

/// Encode the registry in the Prometheus text format
pub fn gather_text() -> Result<String, prometheus::Error> {
    use prometheus::Encoder;

    let encoder = prometheus::TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();

    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;

    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
