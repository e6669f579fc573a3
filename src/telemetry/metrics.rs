//! Prometheus metrics

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// A command was handled, labelled by command name
    Command(&'static str),
    /// A quote fetch failed, labelled by error kind
    QuoteError(&'static str),
    /// A poll answer was stored
    VoteRecorded,
    /// A poll answer was rejected
    VoteRejected,
    /// A poll summary delivery attempt
    Announcement { delivered: bool },
}

/// Increment a counter by one
pub fn increment_counter(metric: CounterMetric) {
    match metric {
        CounterMetric::Command(command) => {
            ::metrics::counter!("coinbot_commands_total", "command" => command).increment(1);
        }
        CounterMetric::QuoteError(kind) => {
            ::metrics::counter!("coinbot_quote_errors_total", "kind" => kind).increment(1);
        }
        CounterMetric::VoteRecorded => {
            ::metrics::counter!("coinbot_votes_recorded_total").increment(1);
        }
        CounterMetric::VoteRejected => {
            ::metrics::counter!("coinbot_votes_rejected_total").increment(1);
        }
        CounterMetric::Announcement { delivered } => {
            let outcome = if delivered { "delivered" } else { "failed" };
            ::metrics::counter!("coinbot_announcements_total", "outcome" => outcome).increment(1);
        }
    }
}

/// Serve `/metrics` on `port` from a Prometheus recorder.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    ::metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;

    tracing::info!(port, "Prometheus metrics exporter listening");
    Ok(())
}
