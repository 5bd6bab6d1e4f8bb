//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content.

use std::collections::HashMap;
use std::io::Cursor;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tiny_http::{Response, StatusCode};

use crate::analytics::Statistic;
use crate::config::{self, SportsvizConfig};
use crate::data::{self, ActivityType};
use crate::logging::RenderLogger;
use crate::views::{self, Magnitude, ViewRequest};

use super::{State, content_type_json};

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

/// Config API response: the config as JSON plus the equivalent TOML.
#[derive(Serialize)]
struct ConfigResponse {
    config: SportsvizConfig,
    toml_text: String,
}

/// Config update request, a list of key-value pairs.
#[derive(serde::Deserialize)]
struct ConfigUpdateRequest {
    updates: Vec<ConfigKeyValue>,
}

#[derive(serde::Deserialize)]
struct ConfigKeyValue {
    key: String,
    value: String,
}

#[derive(Serialize)]
struct HealthResponse {
    version: &'static str,
    data_path: String,
    data_ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_error: Option<String>,
    records: usize,
    config_exists: bool,
    logging_enabled: bool,
    log_entries: usize,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

/// A `{"error": ...}` response with the given status.
fn error_response(status: u16, message: &str) -> Response<Cursor<Vec<u8>>> {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status))
}

/// Decoded `key=value` pairs of the query string. Later duplicates win.
fn parse_query(url: &str) -> HashMap<String, String> {
    let Some((_, query)) = url.split_once('?') else {
        return HashMap::new();
    };
    query
        .split('&')
        .filter_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            Some((percent_decode(k), percent_decode(v)))
        })
        .collect()
}

/// Decode `%XX` escapes and `+` as space. Malformed escapes are kept verbatim.
fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => match (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                (Some(high), Some(low)) => {
                    out.push(high * 16 + low);
                    i += 2;
                }
                _ => out.push(b'%'),
            },
            other => out.push(other),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

/// A non-empty query value.
fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn year_param(params: &HashMap<String, String>, key: &str) -> Result<Option<i32>> {
    param(params, key)
        .map(|v| {
            v.parse::<i32>()
                .with_context(|| format!("invalid {key} '{v}', expected a year"))
        })
        .transpose()
}

fn activity_param(params: &HashMap<String, String>, key: &str) -> Option<ActivityType> {
    param(params, key).map(ActivityType::parse)
}

/// Build the request for page `page` from its query parameters. Missing
/// selections are left for the renderer to default.
fn view_request(
    page: &str,
    params: &HashMap<String, String>,
    default_statistic: Statistic,
) -> Result<ViewRequest> {
    let statistic = match param(params, "statistic") {
        Some(value) => Statistic::parse(value)?,
        None => default_statistic,
    };

    let request = match page {
        "yearly" => ViewRequest::Yearly {
            activity: activity_param(params, "activity"),
            statistic,
        },
        "monthly" => ViewRequest::Monthly {
            activity: activity_param(params, "activity"),
            statistic,
            year: year_param(params, "year")?,
        },
        "year-comparison" => ViewRequest::YearComparison {
            activity: activity_param(params, "activity"),
            statistic,
            base: year_param(params, "base")?,
            comparison: year_param(params, "comparison")?,
        },
        "activity-comparison" => ViewRequest::ActivityComparison {
            year: year_param(params, "year")?,
            statistic,
            base: activity_param(params, "base"),
            comparison: activity_param(params, "comparison"),
        },
        "recent" => ViewRequest::RecentYears {
            activity: activity_param(params, "activity"),
            statistic,
        },
        "time-share" => ViewRequest::TimeShare {
            year: year_param(params, "year")?,
        },
        "evolution" => ViewRequest::Evolution {
            magnitude: match param(params, "magnitude") {
                Some(value) => Magnitude::parse(value)?,
                None => Magnitude::default(),
            },
        },
        other => bail!("unknown view '{other}'"),
    };
    Ok(request)
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/options`: selector values for every page.
pub fn get_options(state: &State) -> Result<Response<Cursor<Vec<u8>>>> {
    let cfg = config::load();
    let dataset = data::load(state.data_path(&cfg))?;
    let options = views::options(&dataset, &cfg.view_settings(), cfg.views.default_statistic);
    json_response(&options)
}

/// `GET /api/views/{page}?...`: one rendered chart.
///
/// Bad selections answer 400; an unreadable data file is a server error.
pub fn get_view(state: &State, page: &str, url: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let cfg = config::load();
    let request = match view_request(page, &parse_query(url), cfg.views.default_statistic) {
        Ok(request) => request,
        Err(e) => return Ok(error_response(400, &format!("{e:#}"))),
    };

    let dataset = data::load(state.data_path(&cfg))?;
    let logger = RenderLogger::from_config(&cfg.logging);
    match logger.render(&dataset, &request, &cfg.view_settings()) {
        Ok(chart) => json_response(&chart),
        Err(e) => Ok(error_response(400, &format!("{e:#}"))),
    }
}

/// `GET /api/config`: current effective configuration.
pub fn get_config() -> Result<Response<Cursor<Vec<u8>>>> {
    let cfg = config::load();
    let toml_text = toml::to_string_pretty(&cfg).unwrap_or_default();

    let resp = ConfigResponse {
        config: cfg,
        toml_text,
    };

    json_response(&resp)
}

/// `PUT /api/config`: update configuration keys.
///
/// Expects JSON body: `{ "updates": [{ "key": "views.recent_years", "value": "5" }] }`
pub fn put_config(body: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let req: ConfigUpdateRequest =
        serde_json::from_str(body).context("invalid JSON in config update request")?;

    let mut errors: Vec<String> = Vec::new();
    let mut applied: Vec<String> = Vec::new();

    for kv in &req.updates {
        match config::set_config_value(&kv.key, &kv.value) {
            Ok(()) => applied.push(format!("{} = {}", kv.key, kv.value)),
            Err(e) => errors.push(format!("{}: {e:#}", kv.key)),
        }
    }

    let result = serde_json::json!({
        "applied": applied,
        "errors": errors,
        "success": errors.is_empty(),
    });

    json_response(&result)
}

/// `POST /api/config/reset`: reset config to defaults.
pub fn post_config_reset() -> Result<Response<Cursor<Vec<u8>>>> {
    config::reset_config().context("failed to reset config")?;

    let result = serde_json::json!({
        "success": true,
        "message": "Configuration reset to defaults",
    });

    json_response(&result)
}

/// `GET /api/health`: data file, config and log status.
pub fn get_health(state: &State) -> Result<Response<Cursor<Vec<u8>>>> {
    let cfg = config::load();
    let data_path = state.data_path(&cfg);
    let (records, data_error) = match data::load(&data_path) {
        Ok(dataset) => (dataset.len(), None),
        Err(e) => (0, Some(format!("{e:#}"))),
    };

    let config_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let logger = RenderLogger::from_config(&cfg.logging);

    let resp = HealthResponse {
        version: env!("CARGO_PKG_VERSION"),
        data_path: data_path.display().to_string(),
        data_ok: data_error.is_none(),
        data_error,
        records,
        config_exists,
        logging_enabled: cfg.logging.enabled,
        log_entries: logger.read_all_entries().len(),
    };

    json_response(&resp)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_query_decodes_pairs() {
        let params = parse_query("/api/views/monthly?activity=Running&year=2023&statistic=time");
        assert_eq!(params["activity"], "Running");
        assert_eq!(params["year"], "2023");
        assert_eq!(params["statistic"], "time");

        let params = parse_query("/api/views/yearly?activity=Nordic+Walking&x=a%2Cb");
        assert_eq!(params["activity"], "Nordic Walking");
        assert_eq!(params["x"], "a,b");
    }

    #[test]
    fn parse_query_handles_missing_and_malformed() {
        assert!(parse_query("/api/views/yearly").is_empty());
        assert!(parse_query("/api/views/yearly?flag").is_empty());
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }

    #[test]
    fn view_request_from_query() {
        let params = parse_query("?year=2022&base=Running&comparison=Walking&statistic=distance");
        let request = view_request("activity-comparison", &params, Statistic::Count).unwrap();
        assert_eq!(
            request,
            ViewRequest::ActivityComparison {
                year: Some(2022),
                statistic: Statistic::Distance,
                base: Some(ActivityType::Running),
                comparison: Some(ActivityType::Walking),
            }
        );
    }

    #[test]
    fn view_request_uses_default_statistic() {
        let request = view_request("yearly", &HashMap::new(), Statistic::Time).unwrap();
        assert_eq!(
            request,
            ViewRequest::Yearly {
                activity: None,
                statistic: Statistic::Time,
            }
        );
        let params = parse_query("?magnitude=relative");
        assert_eq!(
            view_request("evolution", &params, Statistic::Count).unwrap(),
            ViewRequest::Evolution {
                magnitude: Magnitude::Relative
            }
        );
    }

    #[test]
    fn view_request_rejects_bad_values() {
        assert!(view_request("unknown", &HashMap::new(), Statistic::Count).is_err());
        assert!(view_request("monthly", &parse_query("?year=twenty"), Statistic::Count).is_err());
        assert!(view_request("yearly", &parse_query("?statistic=speed"), Statistic::Count).is_err());
        assert!(view_request("evolution", &parse_query("?magnitude=log"), Statistic::Count).is_err());
    }

    #[test]
    fn config_update_request_deserializes() {
        let json = r#"{"updates": [{"key": "views.recent_years", "value": "5"}]}"#;
        let req: ConfigUpdateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.updates.len(), 1);
        assert_eq!(req.updates[0].key, "views.recent_years");
        assert_eq!(req.updates[0].value, "5");
    }

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            version: "0.1.0",
            data_path: "rwc.csv".to_string(),
            data_ok: false,
            data_error: Some("failed to open data file".to_string()),
            records: 0,
            config_exists: false,
            logging_enabled: true,
            log_entries: 0,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"data_ok\":false"));
        assert!(json.contains("\"data_error\""));
    }
}
