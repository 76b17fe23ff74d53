use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use super::TracingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn output_layer(json: bool) -> BoxedLayer {
    if json {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer().with_target(true).compact().boxed()
    }
}

/// Installs the global subscriber once at start-up. `RUST_LOG` overrides the
/// configured filter.
pub fn init_tracing(config: &TracingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    tracing_subscriber::registry()
        .with(output_layer(config.json_format))
        .with(filter)
        .init();

    tracing::info!(
        environment = %config.environment,
        json = config.json_format,
        filter = %config.default_filter,
        "Logging ready"
    );
}
