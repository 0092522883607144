use dotenv::dotenv;
use engine::app::{self, AppError, AppProperties, AppResult};
use error_stack::ResultExt;
use error_stack::fmt::ColorMode;
use items_app::config::{AppConfig, Storage};
use items_app::{SERVICE_NAME, build_app};
use items_core::{Entity, Field, ItemModel};
use metrics_exporter_prometheus::PrometheusHandle;
use repositories::memory::MemoryModel;
use repositories::mongodb::{Connection, ConnectionDetails};
use tracing::{debug, error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() {
    match try_main().await {
        Ok(_) => info!("item service shutting down"),
        Err(e) => {
            error!("item service exited with error: {e:?}");
        }
    }
}

fn init_logging() {
    error_stack::Report::set_color_mode(ColorMode::None);

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("ITEMS_LOG"))
        .init();
}

async fn try_main() -> AppResult<()> {
    // loaded first so ITEMS_LOG can come from the file
    let dotenv_result = dotenv();
    init_logging();

    if let Err(e) = dotenv_result {
        warn!("failed to load .env file: {e}");
    }

    let config = AppConfig::from_env().change_context(AppError)?;
    debug!(
        "configured for port {} with metrics {}",
        config.port,
        if config.metrics { "on" } else { "off" }
    );

    let metrics = if config.metrics {
        Some(engine::metrics::setup_recorder().change_context(AppError)?)
    } else {
        None
    };

    match config.storage {
        Storage::Memory => {
            warn!("items are kept in memory and are lost on shutdown");
            serve(
                MemoryModel::<Entity>::new(),
                MemoryModel::<Field>::new(),
                metrics,
                config.port,
            )
            .await
        }
        Storage::MongoDb { uri } => {
            let connection = Connection::open(ConnectionDetails::Url(uri))
                .await
                .change_context(AppError)?;

            let result = serve(
                connection.model::<Entity>(),
                connection.model::<Field>(),
                metrics,
                config.port,
            )
            .await;

            connection.close().await;
            result
        }
    }
}

async fn serve<E, F>(
    entities: E,
    fields: F,
    metrics: Option<PrometheusHandle>,
    port: u16,
) -> AppResult<()>
where
    E: ItemModel<Schema = Entity>,
    F: ItemModel<Schema = Field>,
{
    app::run(
        build_app(entities, fields, metrics),
        AppProperties {
            service_name: SERVICE_NAME,
            port,
        },
        app::shutdown_signal(),
    )
    .await
}
