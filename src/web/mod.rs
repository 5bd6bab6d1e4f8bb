//! Embedded web dashboard for sportsviz.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page dashboard with one panel per chart page and a config editor
//! - JSON API endpoints for selector options, rendered views and config management
//!
//! Launched via `sportsviz web` (default: `http://127.0.0.1:8501`).

mod api;
mod frontend;

use std::io::Cursor;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::config::SportsvizConfig;

/// Per-server settings that outlive a single request. Everything else is
/// re-read from the config and the data file on each request.
#[derive(Debug, Clone, Default)]
pub struct State {
    /// `--data` from the command line, which beats the config file.
    pub data_override: Option<PathBuf>,
}

impl State {
    pub fn data_path(&self, config: &SportsvizConfig) -> PathBuf {
        self.data_override
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.data.path))
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard server on the given address.
///
/// Blocks the current thread and handles requests sequentially. A failing
/// request answers 500 without stopping the server.
pub fn serve(addr: &str, open: bool, state: State) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("sportsviz dashboard running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    if open {
        let _ = open_browser(&format!("http://{addr}"));
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let result = dispatch(&state, &method, &url, body.as_deref());

        let status = match result {
            Ok(resp) => {
                let status = resp.status_code().0;
                let _ = request.respond(resp);
                status
            }
            Err(e) => {
                let body = serde_json::json!({ "error": format!("{e:#}") }).to_string();
                let resp = Response::from_data(body.into_bytes())
                    .with_header(content_type_json())
                    .with_status_code(StatusCode(500));
                let _ = request.respond(resp);
                500
            }
        };

        println!(
            "{} {} {} {}",
            method,
            url,
            status,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

fn dispatch(
    state: &State,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => serve_frontend(),

        // API: data
        (&Method::Get, "/api/options") => api::get_options(state),
        (&Method::Get, p) if p.starts_with("/api/views/") => {
            api::get_view(state, &p["/api/views/".len()..], url)
        }

        // API: configuration
        (&Method::Get, "/api/config") => api::get_config(),
        (&Method::Put, "/api/config") => api::put_config(body.unwrap_or("{}")),
        (&Method::Post, "/api/config/reset") => api::post_config_reset(),

        (&Method::Get, "/api/health") => api::get_health(state),

        _ => not_found(),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn serve_frontend() -> Result<Response<Cursor<Vec<u8>>>> {
    Ok(Response::from_data(frontend::INDEX_HTML.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200)))
}

fn not_found() -> Result<Response<Cursor<Vec<u8>>>> {
    let body = r#"{"error": "not found"}"#;
    Ok(Response::from_data(body.as_bytes().to_vec())
        .with_header(content_type_json())
        .with_status_code(StatusCode(404)))
}

pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8")
        .expect("static header is valid")
}

fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8").expect("static header is valid")
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_paths_are_not_found() {
        let resp = dispatch(&State::default(), &Method::Get, "/nope", None).unwrap();
        assert_eq!(resp.status_code(), StatusCode(404));
        let resp = dispatch(&State::default(), &Method::Delete, "/api/config", None).unwrap();
        assert_eq!(resp.status_code(), StatusCode(404));
    }

    #[test]
    fn index_is_served() {
        let resp = dispatch(&State::default(), &Method::Get, "/", None).unwrap();
        assert_eq!(resp.status_code(), StatusCode(200));
    }

    #[test]
    fn unknown_view_is_a_bad_request() {
        let resp = dispatch(&State::default(), &Method::Get, "/api/views/radar", None).unwrap();
        assert_eq!(resp.status_code(), StatusCode(400));
    }

    #[test]
    fn missing_data_file_is_a_server_error() {
        let state = State {
            data_override: Some(PathBuf::from("/definitely/not/here.csv")),
        };
        assert!(dispatch(&state, &Method::Get, "/api/options", None).is_err());
        assert!(dispatch(&state, &Method::Get, "/api/views/yearly", None).is_err());
    }

    #[test]
    fn data_override_beats_config() {
        let config = SportsvizConfig::default();
        assert_eq!(State::default().data_path(&config), PathBuf::from("rwc.csv"));
        let state = State {
            data_override: Some(PathBuf::from("/tmp/other.csv")),
        };
        assert_eq!(state.data_path(&config), PathBuf::from("/tmp/other.csv"));
    }
}
