//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use household_notes::doc::ApiDoc;
use household_notes::domain::NoteService;
use household_notes::inbound::http::health::{HealthState, health, live, ready};
use household_notes::inbound::http::notes;
use household_notes::inbound::http::state::HttpState;
use household_notes::outbound::persistence::DieselNoteRepository;
use household_notes::settings::CorsOrigins;
use household_notes::Trace;

/// Build the CORS policy: all methods and headers, configured origins.
///
/// Credentials are never allowed; the API has no cookie or auth state.
fn build_cors(origins: &CorsOrigins) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);
    match origins {
        CorsOrigins::Any => cors.allow_any_origin(),
        CorsOrigins::List(list) => list
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin)),
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    cors_origins: CorsOrigins,
    swagger_enabled: bool,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        cors_origins,
        swagger_enabled,
    } = deps;

    let api = web::scope("/api/v1").configure(notes::configure);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(build_cors(&cors_origins))
        .wrap(Trace)
        .service(api)
        .service(health)
        .service(ready)
        .service(live)
        .configure(|cfg| {
            if swagger_enabled {
                cfg.service(web::redirect("/docs", "/docs/")).service(
                    SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
                );
            }
        })
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        bind_addr,
        cors_origins,
        swagger_enabled,
        db_pool,
    } = config;

    #[cfg(feature = "metrics")]
    let metrics = actix_web_prom::PrometheusMetricsBuilder::new("household_notes")
        .endpoint("/metrics")
        .build()
        .map_err(|err| std::io::Error::other(format!("configure Prometheus metrics: {err}")))?;

    let service = Arc::new(NoteService::new(
        Arc::new(DieselNoteRepository::new(db_pool)),
        Arc::new(DefaultClock),
    ));
    let http_state = web::Data::new(HttpState::from_service(service));

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            cors_origins: cors_origins.clone(),
            swagger_enabled,
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, swagger_enabled, "HTTP server listening");
    health_state.mark_ready();
    Ok(server)
}
