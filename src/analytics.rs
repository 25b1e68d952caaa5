/// Sink for named usage events with string parameters
pub trait AnalyticsSink {
    fn log_event(&self, name: &str, params: &[(&str, String)]);
}

/// Forwards analytics events to the `log` facade under the `analytics` target
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAnalytics;

impl AnalyticsSink for LogAnalytics {
    fn log_event(&self, name: &str, params: &[(&str, String)]) {
        let rendered: Vec<String> = params.iter().map(|(key, value)| format!("{key}={value}")).collect();
        log::info!(target: "analytics", "{} {}", name, rendered.join(" "));
    }
}
