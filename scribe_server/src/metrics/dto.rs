use std::time::Duration;

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder,
};
use scribe_core::summarizer::dto::{SummarizationResult, SummaryStyle};

/// Prometheus collectors for the HTTP surface and the summarization jobs.
pub struct ServerMetrics {
    registry: Registry,
    http_requests: IntCounterVec,
    http_request_duration: Histogram,
    summarizations: IntCounterVec,
    summarization_duration: Histogram,
}

impl ServerMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let http_requests = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests"),
            &["method", "endpoint"],
        )?;
        let http_request_duration = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration",
        ))?;
        let summarizations = IntCounterVec::new(
            Opts::new("summarizations_total", "Total summarizations"),
            &["summary_type"],
        )?;
        let summarization_duration = Histogram::with_opts(HistogramOpts::new(
            "summarization_duration_seconds",
            "Summarization duration",
        ))?;

        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(http_request_duration.clone()))?;
        registry.register(Box::new(summarizations.clone()))?;
        registry.register(Box::new(summarization_duration.clone()))?;

        Ok(Self {
            registry,
            http_requests,
            http_request_duration,
            summarizations,
            summarization_duration,
        })
    }

    pub fn record_request(&self, method: &str, endpoint: &str, elapsed: Duration) {
        self.http_requests
            .with_label_values(&[method, endpoint])
            .inc();
        self.http_request_duration.observe(elapsed.as_secs_f64());
    }

    /// Counted when a job is accepted, like the request counter.
    pub fn record_submission(&self, style: SummaryStyle) {
        self.summarizations
            .with_label_values(&[style.as_str()])
            .inc();
    }

    pub fn observe_summarization(&self, result: &SummarizationResult) {
        self.summarization_duration
            .observe(result.processing_time.unwrap_or_default());
    }

    /// Text exposition format, with its content type.
    pub fn encode(&self) -> prometheus::Result<(String, Vec<u8>)> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok((encoder.format_type().to_string(), buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encodes_recorded_values() {
        let metrics = ServerMetrics::new().unwrap();
        metrics.record_submission(SummaryStyle::KeyPoints);
        metrics.record_submission(SummaryStyle::KeyPoints);

        let mut result =
            SummarizationResult::new("original text", "short".to_string(), 1, SummaryStyle::Brief);
        result.processing_time = Some(2.5);
        metrics.observe_summarization(&result);

        let (content_type, body) = metrics.encode().unwrap();
        let body = String::from_utf8(body).unwrap();

        assert!(content_type.starts_with("text/plain"));
        assert!(body.contains("summarizations_total{summary_type=\"key_points\"} 2"));
        assert!(body.contains("summarization_duration_seconds_sum 2.5"));
        assert!(body.contains("summarization_duration_seconds_count 1"));
    }
}
