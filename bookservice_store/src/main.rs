use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use paperclip::actix::OpenApiExt;
use tracing_actix_web::TracingLogger;

use bookservice_store::app_config::config_app;
use bookservice_store::books_repository::{InMemoryBookRepository, PostgresBooksRepository};
use bookservice_store::handlers::SharedBookRepository;
use bookservice_store::settings::Settings;
use bookservice_store::telemetry::{init_telemetry, shutdown_telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    init_telemetry(&settings.telemetry)?;

    let books_repository: SharedBookRepository = if settings.database.in_memory {
        tracing::info!("Using in-memory book repository");
        Arc::new(InMemoryBookRepository::default())
    } else {
        Arc::new(
            PostgresBooksRepository::init(settings.database.clone().into())
                .await
                .context("Failed to init postgres")?,
        )
    };

    tracing::info!(
        "starting HTTP server at http://{}:{}",
        settings.server.host,
        settings.server.port
    );
    HttpServer::new(move || {
        App::new()
            .wrap_api()
            .app_data(web::Data::new(books_repository.clone()))
            .wrap(TracingLogger::default())
            .configure(config_app)
            .with_json_spec_at("/apispec/v2")
            .build()
    })
    .bind((settings.server.host.as_str(), settings.server.port))?
    .run()
    .await?;

    shutdown_telemetry();
    Ok(())
}
