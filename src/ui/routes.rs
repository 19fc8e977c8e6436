//! # Web Server Routes
//!
//! Actix handlers for the input form, the tokenize/plot/predict endpoint and the
//! history listing, plus the server bootstrap. All mutable state lives in
//! [`AppState`], which is built once and shared with every worker through
//! `web::Data`.

use actix_files::Files;
use actix_web::dev::Server;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpMessage, HttpRequest, HttpResponse, HttpServer, Responder, ResponseError};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::history::HistoryStore;
use crate::plot::{build_series, predict, PlotPayload};
use crate::tokenizer::{TokenizeError, TokenizerWrapper, WordTokenizer};
use crate::ui::templates;

/// Shared server state: the sentence history, the tokenizer and the jitter source.
pub struct AppState {
    pub history: HistoryStore,
    tokenizer: Box<dyn WordTokenizer>,
    jitter: Mutex<StdRng>,
}

impl AppState {
    pub fn new(tokenizer: Box<dyn WordTokenizer>, jitter_seed: Option<u64>) -> Self {
        let rng = match jitter_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            history: HistoryStore::new(),
            tokenizer,
            jitter: Mutex::new(rng),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self, TokenizeError> {
        Ok(Self::new(Box::new(TokenizerWrapper::new()?), config.jitter_seed))
    }

    /// Runs the whole pipeline for one sentence.
    ///
    /// Validation and tokenization happen before anything is recorded, so a
    /// rejected or failed request leaves the history exactly as it was.
    pub fn process_sentence(&self, sentence: Option<&str>) -> Result<PlotPayload, AppError> {
        let sentence = match sentence {
            Some(s) if !s.is_empty() => s,
            _ => return Err(AppError::MissingInput),
        };

        let tokens = self.tokenizer.tokenize(sentence)?;
        debug!("Tokenized {:?} into {:?}", sentence, tokens);
        if tokens.is_empty() {
            info!("Sentence produced no tokens; returning an empty plot");
        }

        let series = {
            let mut rng = self.jitter.lock().unwrap_or_else(PoisonError::into_inner);
            build_series(&tokens, &mut *rng)
        };
        let prediction = predict(&tokens);
        let history = self.history.record_and_snapshot(sentence);

        Ok(PlotPayload {
            tokens,
            series,
            prediction,
            history,
        })
    }
}

/// Largest request body accepted on any route. Sentences themselves are not
/// length-limited; this only bounds how much a single request may buffer.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Body of `POST /tokenize`, either form-encoded or JSON.
#[derive(Deserialize, Debug, Default)]
pub struct TokenizeRequest {
    #[serde(default)]
    pub sentence: Option<String>,
}

/// How a tokenize request wants its answer (and its errors) shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Html,
    Json,
}

impl ResponseFormat {
    fn from_content_type(content_type: &str) -> Self {
        if content_type == "application/json" || content_type.ends_with("+json") {
            ResponseFormat::Json
        } else {
            ResponseFormat::Html
        }
    }
}

/// Pulls the `sentence` field out of a raw request body.
///
/// JSON bodies are parsed as JSON; anything else is treated as
/// `application/x-www-form-urlencoded`. A body that is empty, malformed or of
/// an unsupported type simply has no sentence, which the caller rejects as
/// missing input.
pub fn parse_sentence(format: ResponseFormat, body: &[u8]) -> Option<String> {
    let request = match format {
        ResponseFormat::Json => serde_json::from_slice::<TokenizeRequest>(body).ok()?,
        ResponseFormat::Html => {
            let encoded = std::str::from_utf8(body).ok()?;
            web::Query::<TokenizeRequest>::from_query(encoded).ok()?.into_inner()
        }
    };
    request.sentence
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

fn log_failure(err: &AppError) {
    match err {
        AppError::MissingInput => warn!("Rejected tokenize request: {}", err),
        _ => error!("Tokenize request failed: {}", err),
    }
}

/// Serves the input form together with the current history (`GET /`).
pub async fn index(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(templates::render_index_page(&state.history.snapshot()))
}

/// Returns the history snapshot as a JSON array, oldest first (`GET /history`).
pub async fn history(state: web::Data<AppState>) -> impl Responder {
    web::Json(state.history.snapshot())
}

/// Tokenizes the submitted sentence, records it and returns the plot (`POST /tokenize`).
///
/// Form submissions get the HTML plot page; JSON submissions get the
/// [`PlotPayload`] back as JSON, and JSON-shaped errors.
pub async fn tokenize(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let format = ResponseFormat::from_content_type(req.content_type());
    let sentence = parse_sentence(format, &body);
    let result = state.process_sentence(sentence.as_deref());

    match format {
        ResponseFormat::Json => match result {
            Ok(payload) => {
                info!("Tokenized JSON request into {} tokens", payload.tokens.len());
                Ok(HttpResponse::Ok().json(&payload))
            }
            Err(err) => {
                log_failure(&err);
                Ok(HttpResponse::build(err.status_code()).json(ErrorBody {
                    error: err.user_message(),
                }))
            }
        },
        ResponseFormat::Html => {
            let payload = result.inspect_err(log_failure)?;
            info!("Tokenized form request into {} tokens", payload.tokens.len());
            Ok(HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(templates::render_plot_page(&payload)))
        }
    }
}

/// Registers the application routes and the request body limit.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
        .route("/", web::get().to(index))
        .route("/tokenize", web::post().to(tokenize))
        .route("/history", web::get().to(history));
}

fn configure_static(cfg: &mut web::ServiceConfig, static_dir: Option<&Path>) {
    if let Some(dir) = static_dir {
        cfg.service(Files::new("/static", dir));
    }
}

/// Binds the server without starting it, returning the addresses actually bound.
///
/// Binding to port 0 lets the OS pick a free port, which the tests rely on.
pub fn bind_server(
    config: &ServerConfig,
    state: web::Data<AppState>,
) -> std::io::Result<(Server, Vec<SocketAddr>)> {
    let static_dir: Option<PathBuf> = config.static_dir.clone();
    let server = HttpServer::new(move || {
        let static_dir = static_dir.clone();
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure_routes)
            .configure(move |cfg| configure_static(cfg, static_dir.as_deref()))
    })
    .bind(config.bind_address())?;

    let addrs = server.addrs();
    Ok((server.run(), addrs))
}

/// Initializes and runs the Actix web server until it is shut down.
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let state = AppState::from_config(&config).map_err(std::io::Error::other)?;
    let (server, addrs) = bind_server(&config, web::Data::new(state))?;
    for addr in &addrs {
        info!("App listening at http://{}", addr);
    }
    server.await
}
