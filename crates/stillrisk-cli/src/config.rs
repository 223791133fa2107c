use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use stillrisk_core::i18n::Language;
use stillrisk_explain::openrouter::{OpenRouterConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use stillrisk_model::normalize::AlignPolicy;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

/// Environment variable that overrides the remote explainer model.
pub const MODEL_OVERRIDE_ENV: &str = "OPENROUTER_MODEL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StillriskConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    #[serde(default = "default_manifest_path")]
    pub manifest_path: PathBuf,
    /// TrueType font embedded in PDF reports. Needed for Arabic output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Reject unknown flag spellings and manifest features the input cannot
    /// produce instead of reading them as "no" and 0.0.
    #[serde(default)]
    pub strict_inputs: bool,
    #[serde(default)]
    pub remote: RemoteExplainerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteExplainerConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_remote_model")]
    pub model: String,
    /// Name of the environment variable holding the API key. The key itself
    /// is never written to the config file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model_path() -> PathBuf {
    PathBuf::from("xgb_model.json")
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("features_used.txt")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_remote_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

impl Default for StillriskConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            model_path: default_model_path(),
            manifest_path: default_manifest_path(),
            font_path: None,
            language: Language::default(),
            output_dir: default_output_dir(),
            strict_inputs: false,
            remote: RemoteExplainerConfig::default(),
        }
    }
}

impl Default for RemoteExplainerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_base_url(),
            model: default_remote_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StillriskConfig {
    /// Alignment policy for the normalizer. `force_strict` comes from `--strict`.
    pub fn align_policy(&self, force_strict: bool) -> AlignPolicy {
        if force_strict || self.strict_inputs {
            AlignPolicy::Strict
        } else {
            AlignPolicy::Permissive
        }
    }

    /// Apply environment overrides. `lookup` is usually `std::env::var(..).ok()`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(model) = lookup(MODEL_OVERRIDE_ENV).filter(|m| !m.trim().is_empty()) {
            tracing::debug!(%model, "remote model overridden from environment");
            self.remote.model = model.trim().to_string();
        }
    }

    /// The remote explainer API key, read from the configured variable.
    pub fn api_key(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        lookup(&self.remote.api_key_env).filter(|k| !k.trim().is_empty())
    }

    /// Settings for the remote explainer, or `None` when it is disabled or
    /// no key is available.
    pub fn remote_explainer(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Option<OpenRouterConfig> {
        if !self.remote.enabled {
            return None;
        }
        let Some(api_key) = self.api_key(lookup) else {
            tracing::warn!(
                variable = %self.remote.api_key_env,
                "remote explanations enabled but no API key set; using rules"
            );
            return None;
        };
        Some(OpenRouterConfig {
            base_url: self.remote.base_url.clone(),
            model: self.remote.model.clone(),
            api_key,
            timeout: Duration::from_secs(self.remote.timeout_secs),
        })
    }
}

/// Redacted config info safe to print.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigInfo {
    pub config_version: u32,
    pub model_path: String,
    pub manifest_path: String,
    pub font_path: Option<String>,
    pub language: Language,
    pub output_dir: String,
    pub strict_inputs: bool,
    pub remote_enabled: bool,
    pub remote_base_url: String,
    pub remote_model: String,
    pub api_key_env: String,
    pub api_key_hint: Option<String>,
}

fn default_config_path() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("stillrisk").join("config.json"))
}

/// The explicit path if given, otherwise `<config_dir>/stillrisk/config.json`.
pub fn config_path(explicit: Option<&Path>) -> eyre::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_config_path(),
    }
}

/// Load the config at `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> eyre::Result<StillriskConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(StillriskConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: StillriskConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update stillrisk."
        ));
    }

    // v0 → v1: hand-written files without a version share the v1 shape
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("stamped unversioned config as v1");
    }

    // Future migrations go here:
    // if from_version < 2 { ... }

    Ok(json)
}

pub fn save_config(config: &StillriskConfig, path: &Path) -> eyre::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    let file_name = path
        .file_name()
        .ok_or_else(|| eyre::eyre!("config path {} has no file name", path.display()))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = dir.join(tmp_name);
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

pub fn config_info(
    config: &StillriskConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ConfigInfo {
    ConfigInfo {
        config_version: config.config_version,
        model_path: config.model_path.display().to_string(),
        manifest_path: config.manifest_path.display().to_string(),
        font_path: config.font_path.as_ref().map(|p| p.display().to_string()),
        language: config.language,
        output_dir: config.output_dir.display().to_string(),
        strict_inputs: config.strict_inputs,
        remote_enabled: config.remote.enabled,
        remote_base_url: config.remote.base_url.clone(),
        remote_model: config.remote.model.clone(),
        api_key_env: config.remote.api_key_env.clone(),
        api_key_hint: config.api_key(lookup).map(|k| redact_key(&k)),
    }
}

pub fn redact_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}
