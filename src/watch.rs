// ABOUTME: Watch module for monitoring note changes and refreshing the card preview
// ABOUTME: Provides debounced rebuilds and a local preview server with card navigation

use log::{debug, error, info, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use notify::{RecursiveMode, Watcher};
use notify_debouncer_full::new_debouncer;
use parking_lot::{Mutex, RwLock};
use tiny_http::{Header, Response, Server, StatusCode};

use crate::errors::{CardError, Result};
use crate::markdown::{self, MarkdownOptions};
use crate::pagination::Direction;
use crate::preview::PageShell;
use crate::resources::{Stylesheet, stylesheet_tags};
use crate::session::{PreviewSession, RebuildOutcome, ValidityChange};
use crate::utils;

pub type SharedSession = Arc<Mutex<PreviewSession>>;

/// Configuration for watch mode
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Path to the markdown file to watch
    pub markdown_path: PathBuf,

    /// Output HTML file path
    pub html_output: PathBuf,

    /// Extra stylesheet paths or URLs
    pub stylesheets: Vec<String>,

    pub embed_resources: bool,

    pub markdown: MarkdownOptions,

    /// Debounce time in milliseconds
    pub debounce_ms: u64,

    /// Whether to serve the preview using a local web server
    pub serve: bool,

    /// Port for local web server
    pub port: u16,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            markdown_path: PathBuf::new(),
            html_output: PathBuf::new(),
            stylesheets: Vec::new(),
            embed_resources: true,
            markdown: MarkdownOptions::default(),
            debounce_ms: 500,
            serve: false,
            port: 8080,
        }
    }
}

/// A response produced by the preview server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub location: Option<&'static str>,
}

impl Reply {
    fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
            location: None,
        }
    }

    fn redirect_home() -> Self {
        Self {
            location: Some("/"),
            ..Self::new(303, "text/plain", "See Other")
        }
    }

    fn not_found() -> Self {
        Self::new(404, "text/plain", "404 Not Found")
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .as_deref()
    {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Answer one preview server request.
/// `/` renders the session, `/prev` and `/next` navigate, `/state` reports navigation as JSON,
/// anything else is served from `static_dir`.
pub fn route(session: &SharedSession, shell: &PageShell, static_dir: &Path, url: &str) -> Reply {
    let path = url.split(['?', '#']).next().unwrap_or("/");
    match path {
        "/" | "/index.html" => {
            let html = session.lock().to_html(shell, true, true);
            Reply::new(200, "text/html; charset=utf-8", html)
        }
        "/prev" | "/next" => {
            let direction = if path == "/prev" {
                Direction::Prev
            } else {
                Direction::Next
            };
            let moved = session.lock().navigate(direction);
            debug!("Navigate {:?} moved: {}", direction, moved);
            Reply::redirect_home()
        }
        "/state" => {
            let nav = session.lock().nav_state();
            match serde_json::to_vec(&nav) {
                Ok(body) => Reply::new(200, "application/json", body),
                Err(e) => Reply::new(500, "text/plain", format!("Failed to encode state: {}", e)),
            }
        }
        _ => serve_static(static_dir, path),
    }
}

fn serve_static(static_dir: &Path, url_path: &str) -> Reply {
    let relative = Path::new(url_path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        warn!("Refusing request outside the note directory: {}", url_path);
        return Reply::not_found();
    }

    let file_path = static_dir.join(relative);
    if !file_path.is_file() {
        return Reply::not_found();
    }
    match fs::read(&file_path) {
        Ok(content) => Reply::new(200, content_type_for(&file_path), content),
        Err(e) => {
            error!("Failed to read file {:?}: {}", file_path, e);
            Reply::new(500, "text/plain", format!("Failed to read file: {}", e))
        }
    }
}

/// Start a simple HTTP server to serve the live preview
fn start_server(
    session: SharedSession,
    shell: Arc<RwLock<PageShell>>,
    static_dir: PathBuf,
    port: u16,
) -> Result<()> {
    let server = Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| CardError::WatchError(format!("Failed to start HTTP server: {}", e)))?;

    thread::spawn(move || {
        info!("HTTP server listening on http://localhost:{}", port);
        println!("Preview available at http://localhost:{}", port);

        for request in server.incoming_requests() {
            let reply = route(&session, &shell.read(), &static_dir, request.url());
            debug!("{} -> {}", request.url(), reply.status);

            let mut response = Response::from_data(reply.body).with_status_code(StatusCode(reply.status));
            if let Ok(header) = Header::from_bytes("Content-Type", reply.content_type) {
                response = response.with_header(header);
            }
            if let Some(location) = reply.location {
                if let Ok(header) = Header::from_bytes("Location", location) {
                    response = response.with_header(header);
                }
            }
            if let Err(e) = request.respond(response) {
                error!("Failed to send response: {}", e);
            }
        }
    });

    Ok(())
}

/// Re-render the note into the session and write the preview page
pub fn refresh(
    config: &WatchConfig,
    session: &SharedSession,
    shell: &RwLock<PageShell>,
    open: bool,
) -> Result<RebuildOutcome> {
    let document = markdown::load_document(&config.markdown_path, &config.markdown)?;
    shell.write().stylesheets = stylesheet_tags(&config.stylesheets, config.embed_resources)?;

    let mut session = session.lock();
    let outcome = if open {
        session.open(&config.markdown_path, document)
    } else {
        session.rebuild(document)
    };

    match outcome {
        RebuildOutcome::Deferred => info!("Preview is locked, keeping the current cards"),
        RebuildOutcome::Rebuilt { sections, validity } => {
            if let Some(ValidityChange::BecameInvalid) = validity {
                warn!("{:?} has no level-2 headings, showing guidance", config.markdown_path);
            }
            let html = session.to_html(&shell.read(), true, config.serve);
            markdown::write_html_to_file(&html, &config.html_output)?;
            info!("Preview refreshed with {} cards: {:?}", sections, config.html_output);
        }
    }
    Ok(outcome)
}

/// Starts watching a markdown file and refreshes the preview when it changes
pub fn watch_markdown(config: WatchConfig, session: PreviewSession, shell: PageShell) -> Result<()> {
    utils::validate_file_exists(&config.markdown_path)?;
    utils::ensure_parent_directory_exists(&config.html_output)?;

    let session: SharedSession = Arc::new(Mutex::new(session));
    let shell = Arc::new(RwLock::new(shell));

    refresh(&config, &session, &shell, true)?;

    let watch_path = match config.markdown_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let abs_watch_path = utils::get_absolute_path(&watch_path)?;

    if config.serve {
        start_server(session.clone(), shell.clone(), abs_watch_path.clone(), config.port)?;
    }

    let (tx, rx) = mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(config.debounce_ms), None, tx)
        .map_err(|e| CardError::WatchError(format!("Failed to create file watcher: {}", e)))?;

    debouncer
        .watcher()
        .watch(&abs_watch_path, RecursiveMode::Recursive)
        .map_err(|e| {
            CardError::WatchError(format!(
                "Failed to start watching directory {:?}: {}",
                abs_watch_path, e
            ))
        })?;

    info!("Watching for changes in {:?}", abs_watch_path);
    println!(
        "Watching for changes in {:?} (Press Ctrl+C to stop)",
        watch_path
    );

    for result in rx {
        match result {
            Ok(events) => {
                let relevant = events
                    .iter()
                    .flat_map(|event| event.paths.iter())
                    .any(|path| is_relevant_path(path, &config));
                if relevant {
                    if let Err(e) = refresh(&config, &session, &shell, false) {
                        error!("Failed to refresh preview: {}", e);
                    }
                }
            }
            Err(errors) => error!("Watch error: {:?}", errors),
        }
    }

    Ok(())
}

/// The note itself or one of its local stylesheets
pub(crate) fn is_relevant_path(path: &Path, config: &WatchConfig) -> bool {
    let Ok(path_abs) = utils::get_absolute_path(path) else {
        return false;
    };

    let md_path_abs = utils::get_absolute_path(&config.markdown_path)
        .unwrap_or_else(|_| config.markdown_path.clone());
    if path_abs == md_path_abs {
        return true;
    }

    config
        .stylesheets
        .iter()
        .map(|s| Stylesheet::new(s))
        .filter(|s| !s.is_remote)
        .filter_map(|s| utils::get_absolute_path(Path::new(&s.path)).ok())
        .any(|css| css == path_abs)
}
