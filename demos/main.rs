use std::{fmt, sync::Mutex};

use actix_web::{
    error,
    http::{header::ContentType, StatusCode},
    middleware::Logger,
    web::{self, Bytes},
    App, HttpResponse, HttpServer,
};
use actix_web_access_log::{logger, AccessLog, RequestId, RequestIdVariable};

#[derive(Debug)]
enum AppError {
    EmptyName,
    StorePoisoned,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::EmptyName => write!(f, "name must not be empty"),
            AppError::StorePoisoned => write!(f, "greeting store is unavailable"),
        }
    }
}

impl std::error::Error for AppError {}

impl error::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            AppError::EmptyName => StatusCode::BAD_REQUEST,
            AppError::StorePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Default)]
struct Greetings {
    names: Mutex<Vec<String>>,
}

async fn create(
    greetings: web::Data<Greetings>,
    request_id: RequestId,
    body: Bytes,
) -> Result<HttpResponse, AppError> {
    let name = String::from_utf8_lossy(&body).trim().to_owned();
    if name.is_empty() {
        log::warn!("rejecting empty name");
        return Err(AppError::EmptyName);
    }

    log::info!("storing greeting for {name}");
    greetings
        .names
        .lock()
        .map_err(|_| AppError::StorePoisoned)?
        .push(name.clone());

    Ok(HttpResponse::Created()
        .content_type(ContentType::plaintext())
        .body(format!("hello, {name} ({request_id})")))
}

async fn list(greetings: web::Data<Greetings>) -> Result<HttpResponse, AppError> {
    let names = greetings
        .names
        .lock()
        .map_err(|_| AppError::StorePoisoned)?
        .join("\n");

    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(names))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("UP")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    logger::init();

    let greetings = web::Data::new(Greetings::default());

    HttpServer::new(move || {
        App::new()
            .app_data(greetings.clone())
            .wrap(Logger::new("%{request-id}xi %a \"%r\" %s %b %T").add_request_id())
            .wrap(AccessLog::default().include_in_response(true))
            .service(
                web::resource("/api/hello")
                    .route(web::post().to(create))
                    .route(web::get().to(list)),
            )
            .route("/actuator/health", web::get().to(health))
    })
    .bind("127.0.0.1:8080")?
    .run()
    .await
}
