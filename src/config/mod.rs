/// Configuration system for sportsviz.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** from [`schema::SportsvizConfig::default()`]
/// 2. **User global config** at `~/.sportsviz/config.toml`
/// 3. **Project local config** at `.sportsviz.toml` in the current working directory
/// 4. **Environment variables** `SPORTSVIZ_*` (highest precedence)
///
/// # Usage
///
/// ```rust,ignore
/// use sportsviz::config;
///
/// let cfg = config::load();
/// let dataset = sportsviz::data::load(&cfg.data.path)?;
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::SportsvizConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration: defaults → global TOML → project
/// TOML → env vars.
pub fn load() -> SportsvizConfig {
    let mut config = layered_config(&[global_config_path(), project_config_path()]);
    apply_env_overrides(&mut config);
    config
}

/// Merge the TOML files at `paths` over the defaults, later files winning
/// key by key. A layer that is unreadable, malformed, or holds a value of
/// the wrong type is skipped as a whole.
fn layered_config(paths: &[Option<PathBuf>]) -> SportsvizConfig {
    let Ok(mut merged) = toml::Value::try_from(SportsvizConfig::default()) else {
        return SportsvizConfig::default();
    };

    for layer in paths.iter().filter_map(|path| load_toml_file(path.as_deref())) {
        let mut candidate = merged.clone();
        merge_config(&mut candidate, layer);
        if candidate.clone().try_into::<SportsvizConfig>().is_ok() {
            merged = candidate;
        }
    }

    merged.try_into().unwrap_or_default()
}

/// Load a TOML file as a raw value tree if it exists and parses.
fn load_toml_file(path: Option<&Path>) -> Option<toml::Value> {
    let content = fs::read_to_string(path?).ok()?;
    toml::from_str(&content).ok()
}

/// Recursively merge `overlay` into `base`. Tables merge key by key; any
/// other value replaces what was there.
fn merge_config(base: &mut toml::Value, overlay: toml::Value) {
    match overlay {
        toml::Value::Table(overlay_table) if base.is_table() => {
            if let Some(base_table) = base.as_table_mut() {
                for (key, value) in overlay_table {
                    match base_table.get_mut(&key) {
                        Some(existing) => merge_config(existing, value),
                        None => {
                            base_table.insert(key, value);
                        }
                    }
                }
            }
        }
        other => *base = other,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// `~/.sportsviz/config.toml`
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".sportsviz").join("config.toml"))
}

/// `.sportsviz.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".sportsviz.toml"))
}

pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Supported variables:
/// - `SPORTSVIZ_DATA`: CSV path
/// - `SPORTSVIZ_ADDR`: web listen address
/// - `SPORTSVIZ_OPEN_BROWSER`: open the dashboard on start (`1`/`true`/`yes`/`on`)
/// - `SPORTSVIZ_LOGGING`: render log on/off
/// - `SPORTSVIZ_LOG_LEVEL`: minimum log level
/// - `SPORTSVIZ_RECENT_YEARS`: years on the recent-years page
fn apply_env_overrides(config: &mut SportsvizConfig) {
    if let Ok(val) = std::env::var("SPORTSVIZ_DATA")
        && !val.is_empty()
    {
        config.data.path = val;
    }
    if let Ok(val) = std::env::var("SPORTSVIZ_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
    if let Ok(val) = std::env::var("SPORTSVIZ_OPEN_BROWSER") {
        config.web.open_browser = is_truthy(&val);
    }
    if let Ok(val) = std::env::var("SPORTSVIZ_LOGGING") {
        config.logging.enabled = is_truthy(&val);
    }
    if let Ok(val) = std::env::var("SPORTSVIZ_LOG_LEVEL")
        && !val.is_empty()
    {
        config.logging.level = val.to_ascii_lowercase();
    }
    if let Ok(val) = std::env::var("SPORTSVIZ_RECENT_YEARS")
        && let Ok(years) = val.parse::<u32>()
    {
        config.views.recent_years = years;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.sportsviz/config.toml`.
///
/// Fails if the file already exists unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    write_default_config(&path, force)?;
    Ok(path)
}

fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    fs::write(path, SportsvizConfig::default_toml()).context("failed to write config file")
}

/// Set a dotted key such as `views.recent_years` in the global config file.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_at(&path, key, value)
}

/// Set a dotted key in the config file at `path`, starting from the
/// defaults when the file does not exist yet. The result must still
/// deserialize as a valid config.
fn set_config_value_at(path: &Path, key: &str, value: &str) -> Result<()> {
    let content = if path.exists() {
        fs::read_to_string(path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&SportsvizConfig::default())
            .context("failed to serialize default config")?
    };

    let mut value_table: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut value_table, key, value)?;

    let output =
        toml::to_string_pretty(&value_table).context("failed to serialize updated config")?;
    toml::from_str::<SportsvizConfig>(&output)
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path. The new value
/// takes the type of the value it replaces.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let (parents, leaf) = match key.rsplit_once('.') {
        Some((parents, leaf)) => (parents.split('.').collect::<Vec<_>>(), leaf),
        None => (Vec::new(), key),
    };
    if leaf.is_empty() {
        anyhow::bail!("empty config key");
    }

    let mut current = root;
    for part in parents {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table above '{key}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(toml::Value::Table(_)) => {
            anyhow::bail!("'{key}' is a section, set one of its keys instead")
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("config key not found: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Overwrite the global config with defaults.
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// The effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
