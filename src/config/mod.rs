/// Configuration system for socialflow.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: hardcoded in [`schema::SocialFlowConfig::default()`]
/// 2. **User global config**: `~/.socialflow/config.toml`
/// 3. **Project local config**: `.socialflow.toml` in the current directory
/// 4. **Environment variables**: `SOCIALFLOW_*` and the bare Langflow
///    secret names (highest precedence)
///
/// File layers are deep-merged at the TOML table level, so a project file
/// that only sets `[flow] endpoint` keeps the token from the global file.
///
/// # Usage
///
/// ```rust,ignore
/// use socialflow::config;
///
/// let cfg = config::load();
/// let client = LangflowClient::from_config(&cfg.flow)?;
/// ```
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::{FlowConfig, PacingConfig, SocialFlowConfig};

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges defaults → global TOML → project TOML → env vars. Unreadable or
/// malformed files are skipped; the other layers still apply.
pub fn load() -> SocialFlowConfig {
    let mut config = load_layers([global_config_path(), project_config_path()]);
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Deep-merge the file layers in order, later paths winning.
fn load_layers<I>(paths: I) -> SocialFlowConfig
where
    I: IntoIterator<Item = Option<PathBuf>>,
{
    let mut merged = toml::Value::Table(toml::map::Map::new());

    for path in paths {
        if let Some(layer) = load_toml_value(path) {
            merge_values(&mut merged, layer);
        }
    }

    merged.try_into().unwrap_or_default()
}

/// Read a TOML file as an untyped value tree.
///
/// A file the schema rejects is dropped as a whole, so one bad value never
/// poisons the merge of the other layers.
fn load_toml_value(path: Option<PathBuf>) -> Option<toml::Value> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    let value: toml::Value = toml::from_str(&content).ok()?;
    let _: SocialFlowConfig = value.clone().try_into().ok()?;
    Some(value)
}

/// Recursively merge `overlay` into `base`. Tables merge key by key; any
/// other value in the overlay replaces the base value.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Directory holding the global config and the analysis log.
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".socialflow"))
}

fn global_config_path() -> Option<PathBuf> {
    home_dir().map(|dir| dir.join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".socialflow.toml"))
}

/// Path of the global config file, for display and init.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Path of the project config file, for display.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> Option<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None => Some(PathBuf::from(path)),
    }
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment overrides using `lookup` to read variables.
///
/// Supported variables:
/// - `SOCIALFLOW_LANGFLOW_ID` / `LANGFLOW_ID`: deployment id
/// - `SOCIALFLOW_FLOW_ID` / `FLOW_ID`: flow id
/// - `SOCIALFLOW_APP_TOKEN` / `APP_TOKEN`: bearer token
/// - `SOCIALFLOW_BASE_URL`, `SOCIALFLOW_ENDPOINT`, `SOCIALFLOW_TIMEOUT_MS`
/// - `SOCIALFLOW_REVEAL_DELAY_MS`: per-character reveal delay
/// - `SOCIALFLOW_ADDR`: dashboard listen address
/// - `SOCIALFLOW_LOGGING`: analysis log on/off
///
/// The prefixed name wins when both spellings are set.
pub fn apply_env_overrides<F>(config: &mut SocialFlowConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let either = |prefixed: &str, bare: &str| non_empty(prefixed).or_else(|| non_empty(bare));

    // Flow
    if let Some(val) = either("SOCIALFLOW_LANGFLOW_ID", "LANGFLOW_ID") {
        config.flow.deployment_id = val;
    }
    if let Some(val) = either("SOCIALFLOW_FLOW_ID", "FLOW_ID") {
        config.flow.flow_id = val;
    }
    if let Some(val) = either("SOCIALFLOW_APP_TOKEN", "APP_TOKEN") {
        config.flow.app_token = val;
    }
    if let Some(val) = non_empty("SOCIALFLOW_BASE_URL") {
        config.flow.base_url = val;
    }
    if let Some(val) = non_empty("SOCIALFLOW_ENDPOINT") {
        config.flow.endpoint = val;
    }
    if let Some(ms) = non_empty("SOCIALFLOW_TIMEOUT_MS").and_then(|v| v.parse::<u64>().ok()) {
        config.flow.timeout_ms = ms;
    }

    // Pacing
    if let Some(ms) = non_empty("SOCIALFLOW_REVEAL_DELAY_MS").and_then(|v| v.parse::<u64>().ok())
    {
        config.pacing.reveal_delay_ms = ms;
    }

    // Server / logging
    if let Some(val) = non_empty("SOCIALFLOW_ADDR") {
        config.server.addr = val;
    }
    if let Some(val) = lookup("SOCIALFLOW_LOGGING") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the annotated default config to `~/.socialflow/config.toml`.
///
/// Fails if the file exists unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.socialflow/ directory")?;
    }

    fs::write(&path, SocialFlowConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a dotted key (e.g. `flow.app_token`) in the global config file.
///
/// Starts from the existing file, or from serialized defaults when there is
/// none, and writes the result back.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let mut root: toml::Value = if path.exists() {
        let content = fs::read_to_string(&path).context("failed to read config file")?;
        toml::from_str(&content).context("failed to parse config as TOML value")?
    } else {
        let defaults = toml::to_string_pretty(&SocialFlowConfig::default())
            .context("failed to serialize default config")?;
        toml::from_str(&defaults).context("failed to parse serialized defaults")?
    };

    set_toml_value(&mut root, key, value)?;

    // Reject values the schema cannot load.
    let _: SocialFlowConfig = root
        .clone()
        .try_into()
        .with_context(|| format!("invalid value for '{key}': {value}"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// Missing sections are created. The new value takes the type of the value
/// it replaces, or of the schema default for a new key.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let Some((section, leaf)) = key.split_once('.') else {
        anyhow::bail!("config key must be 'section.field', got '{key}'");
    };

    let defaults = toml::Value::try_from(SocialFlowConfig::default())
        .context("failed to serialize default config")?;
    let template = defaults
        .get(section)
        .and_then(|s| s.get(leaf))
        .with_context(|| format!("unknown config key: '{key}'"))?;

    let table = root
        .as_table_mut()
        .context("config root is not a table")?
        .entry(section.to_string())
        .or_insert_with(|| toml::Value::Table(toml::map::Map::new()))
        .as_table_mut()
        .with_context(|| format!("expected table at '{section}'"))?;

    let new_value = match table.get(leaf).unwrap_or(template) {
        toml::Value::Boolean(_) => toml::Value::Boolean(is_truthy(raw_value)),
        toml::Value::Integer(_) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        _ => toml::Value::String(raw_value.to_string()),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults.
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// The effective config as TOML, with the token masked.
pub fn show_effective_config() -> Result<String> {
    let mut config = load();
    config.flow.app_token = config.flow.masked_token();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy(" yes "));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn bare_secret_names_are_read() {
        let mut config = SocialFlowConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[("LANGFLOW_ID", "dep"), ("FLOW_ID", "flow"), ("APP_TOKEN", "tok")]),
        );
        assert_eq!(config.flow.deployment_id, "dep");
        assert_eq!(config.flow.flow_id, "flow");
        assert_eq!(config.flow.app_token, "tok");
    }

    #[test]
    fn prefixed_names_win_over_bare() {
        let mut config = SocialFlowConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[("APP_TOKEN", "bare"), ("SOCIALFLOW_APP_TOKEN", "prefixed")]),
        );
        assert_eq!(config.flow.app_token, "prefixed");
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = SocialFlowConfig::default();
        config.flow.app_token = "from-file".to_string();
        apply_env_overrides(&mut config, env(&[("APP_TOKEN", "  ")]));
        assert_eq!(config.flow.app_token, "from-file");
    }

    #[test]
    fn numeric_and_bool_overrides() {
        let mut config = SocialFlowConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("SOCIALFLOW_TIMEOUT_MS", "5000"),
                ("SOCIALFLOW_REVEAL_DELAY_MS", "0"),
                ("SOCIALFLOW_LOGGING", "off"),
                ("SOCIALFLOW_ADDR", "0.0.0.0:9000"),
            ]),
        );
        assert_eq!(config.flow.timeout_ms, 5000);
        assert_eq!(config.pacing.reveal_delay_ms, 0);
        assert!(!config.logging.enabled);
        assert_eq!(config.server.addr, "0.0.0.0:9000");
    }

    #[test]
    fn invalid_numbers_keep_previous_value() {
        let mut config = SocialFlowConfig::default();
        apply_env_overrides(&mut config, env(&[("SOCIALFLOW_TIMEOUT_MS", "soon")]));
        assert_eq!(config.flow.timeout_ms, 30_000);
    }

    #[test]
    fn merge_values_keeps_keys_from_both_layers() {
        let mut base: toml::Value =
            toml::from_str("[flow]\napp_token = \"t\"\nendpoint = \"a\"\n").unwrap();
        let overlay: toml::Value =
            toml::from_str("[flow]\nendpoint = \"b\"\n[server]\naddr = \"x:1\"\n").unwrap();
        merge_values(&mut base, overlay);

        let config: SocialFlowConfig = base.try_into().unwrap();
        assert_eq!(config.flow.app_token, "t");
        assert_eq!(config.flow.endpoint, "b");
        assert_eq!(config.server.addr, "x:1");
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "socialflow-config-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn load_layers_merges_global_and_project() {
        let dir = temp_dir("merge");
        let global = dir.join("config.toml");
        let project = dir.join(".socialflow.toml");
        fs::write(&global, "[flow]\ndeployment_id = \"dep\"\napp_token = \"tok\"\n").unwrap();
        fs::write(&project, "[flow]\ntimeout_ms = 5000\n").unwrap();

        let config = load_layers([Some(global), Some(project)]);
        assert_eq!(config.flow.deployment_id, "dep");
        assert_eq!(config.flow.app_token, "tok");
        assert_eq!(config.flow.timeout_ms, 5000);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn mistyped_layer_does_not_discard_other_layers() {
        let dir = temp_dir("mistyped");
        let global = dir.join("config.toml");
        let project = dir.join(".socialflow.toml");
        fs::write(&global, "[flow]\ndeployment_id = \"dep\"\napp_token = \"tok\"\n").unwrap();
        fs::write(&project, "[flow]\ntimeout_ms = \"slow\"\nendpoint = \"other\"\n").unwrap();

        let config = load_layers([Some(global), Some(project)]);
        assert_eq!(config.flow.deployment_id, "dep");
        assert_eq!(config.flow.app_token, "tok");
        // The rejected file is skipped whole, including its valid keys.
        assert_eq!(config.flow.endpoint, "socialmedia-1");
        assert_eq!(config.flow.timeout_ms, 30_000);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unreadable_and_missing_layers_are_skipped() {
        let dir = temp_dir("missing");
        let broken = dir.join("config.toml");
        fs::write(&broken, "[flow\nthis is not toml").unwrap();

        let config = load_layers([Some(broken), Some(dir.join("absent.toml")), None]);
        assert_eq!(config.flow, FlowConfig::default());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn set_toml_value_updates_existing_string() {
        let mut root: toml::Value = toml::from_str("[flow]\nendpoint = \"a\"\n").unwrap();
        set_toml_value(&mut root, "flow.endpoint", "b").unwrap();
        assert_eq!(root["flow"]["endpoint"].as_str(), Some("b"));
    }

    #[test]
    fn set_toml_value_uses_schema_type_for_new_key() {
        let mut root: toml::Value = toml::from_str("").unwrap();
        set_toml_value(&mut root, "pacing.reveal_delay_ms", "10").unwrap();
        set_toml_value(&mut root, "server.open_browser", "no").unwrap();
        assert_eq!(root["pacing"]["reveal_delay_ms"].as_integer(), Some(10));
        assert_eq!(root["server"]["open_browser"].as_bool(), Some(false));
    }

    #[test]
    fn set_toml_value_rejects_unknown_and_malformed_keys() {
        let mut root: toml::Value = toml::from_str("").unwrap();
        assert!(set_toml_value(&mut root, "flow.nope", "x").is_err());
        assert!(set_toml_value(&mut root, "flow", "x").is_err());
        assert!(set_toml_value(&mut root, "flow.timeout_ms", "abc").is_err());
    }

    #[test]
    fn expand_home_leaves_absolute_paths() {
        assert_eq!(
            expand_home("/tmp/log.jsonl"),
            Some(PathBuf::from("/tmp/log.jsonl"))
        );
    }
}
