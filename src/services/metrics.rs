//! Metrics collection and Prometheus integration service.

use prometheus::{CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::time::{Duration, Instant};

/// Route whose own requests are not recorded
pub const METRICS_ROUTE: &str = "/api/metrics";

/// Application metrics collector for Prometheus integration
#[derive(Clone)]
pub struct AppMetrics {
    pub registry: Registry,
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub weather_provider_requests_total: CounterVec,
    pub app_uptime_seconds: Gauge,
    pub app_info: CounterVec,
    pub start_time: Instant,
}

impl AppMetrics {
    /// Create a new collector with its own registry
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "status", "route"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
            ]),
            &["method", "route"],
        )?;

        // One increment per outbound provider call, so a 5-day range counts 5
        let weather_provider_requests_total = CounterVec::new(
            Opts::new(
                "weather_provider_requests_total",
                "Outbound weather provider calls by endpoint and outcome",
            ),
            &["endpoint", "outcome"],
        )?;

        let app_uptime_seconds = Gauge::new("app_uptime_seconds", "Application uptime in seconds")?;

        let app_info = CounterVec::new(
            Opts::new("app_info", "Application information"),
            &["version", "commit", "build_time"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(weather_provider_requests_total.clone()))?;
        registry.register(Box::new(app_uptime_seconds.clone()))?;
        registry.register(Box::new(app_info.clone()))?;

        app_info
            .with_label_values(&[
                env!("CARGO_PKG_VERSION"),
                crate::handlers::version::build_commit(),
                crate::handlers::version::build_time(),
            ])
            .inc();

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            weather_provider_requests_total,
            app_uptime_seconds,
            app_info,
            start_time: Instant::now(),
        })
    }

    /// Record an HTTP request with method, route, status, and duration
    pub fn record_request(&self, method: &str, route: &str, status: u16, duration: Duration) {
        if route == METRICS_ROUTE {
            return;
        }

        self.http_requests_total
            .with_label_values(&[method, &status.to_string(), route])
            .inc();

        self.http_request_duration_seconds
            .with_label_values(&[method, route])
            .observe(duration.as_secs_f64());
    }

    /// Record one call to the weather provider
    pub fn record_provider_call(&self, endpoint: &str, success: bool) {
        let outcome = if success { "success" } else { "error" };
        self.weather_provider_requests_total
            .with_label_values(&[endpoint, outcome])
            .inc();
    }

    /// Update the application uptime gauge
    pub fn update_uptime(&self) {
        self.app_uptime_seconds
            .set(self.start_time.elapsed().as_secs_f64());
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder.encode_to_string(&metric_families)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_calls_rendered() {
        let metrics = AppMetrics::new().unwrap();
        metrics.record_provider_call("history", true);
        metrics.record_provider_call("history", true);
        metrics.record_provider_call("current", false);

        let counter = &metrics.weather_provider_requests_total;
        assert_eq!(counter.with_label_values(&["history", "success"]).get(), 2.0);
        assert_eq!(counter.with_label_values(&["current", "error"]).get(), 1.0);

        let rendered = metrics.render().unwrap();
        assert!(rendered.contains("weather_provider_requests_total"));
    }

    #[test]
    fn test_metrics_route_not_recorded() {
        let metrics = AppMetrics::new().unwrap();
        metrics.record_request("GET", METRICS_ROUTE, 200, Duration::from_millis(3));
        metrics.record_request("GET", "/requests/{id}", 404, Duration::from_millis(3));

        let counter = &metrics.http_requests_total;
        assert_eq!(counter.with_label_values(&["GET", "200", METRICS_ROUTE]).get(), 0.0);
        assert_eq!(counter.with_label_values(&["GET", "404", "/requests/{id}"]).get(), 1.0);
    }
}
