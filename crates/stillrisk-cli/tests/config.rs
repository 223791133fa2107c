use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::json;

use stillrisk_cli::config::{
    config_info, config_path, load_config, migrate, redact_key, save_config, StillriskConfig,
    CURRENT_VERSION,
};
use stillrisk_core::i18n::Language;
use stillrisk_model::normalize::AlignPolicy;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(&dir.path().join("config.json")).unwrap();

    assert_eq!(config, StillriskConfig::default());
    assert_eq!(config.model_path, PathBuf::from("xgb_model.json"));
    assert_eq!(config.manifest_path, PathBuf::from("features_used.txt"));
    assert_eq!(config.language, Language::English);
    assert!(!config.strict_inputs);
    assert!(!config.remote.enabled);
    assert_eq!(config.remote.api_key_env, "OPENROUTER_API_KEY");
}

#[test]
fn save_then_load_preserves_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let mut config = StillriskConfig::default();
    config.language = Language::Arabic;
    config.font_path = Some(PathBuf::from("/fonts/Amiri-Regular.ttf"));
    config.remote.enabled = true;
    config.config_version = 0;
    save_config(&config, &path).unwrap();

    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded.config_version, CURRENT_VERSION);
    assert_eq!(loaded.language, Language::Arabic);
    assert_eq!(loaded.font_path, config.font_path);
    assert!(loaded.remote.enabled);
    assert!(!path.with_extension("json.tmp").exists());
}

#[cfg(unix)]
#[test]
fn saved_config_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    save_config(&StillriskConfig::default(), &path).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn unversioned_config_is_stamped_as_current() {
    let migrated = migrate(json!({ "language": "ar", "strict_inputs": true }), 0).unwrap();
    assert_eq!(migrated["config_version"], 1);

    let config: StillriskConfig = serde_json::from_value(migrated).unwrap();
    assert_eq!(config.language, Language::Arabic);
    assert!(config.strict_inputs);
    assert!(!config.remote.enabled);
}

#[test]
fn unversioned_file_is_migrated_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "model_path": "models/m.json" }"#).unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.config_version, 1);
    assert_eq!(config.model_path, PathBuf::from("models/m.json"));
    assert!(!config.strict_inputs);
}

#[test]
fn newer_config_is_refused() {
    let err = migrate(json!({ "config_version": 9 }), 9).unwrap_err();
    assert!(err.to_string().contains("newer"));
}

#[test]
fn model_override_comes_from_environment() {
    let mut config = StillriskConfig::default();
    config.apply_overrides(env(&[("OPENROUTER_MODEL", "meta/llama-3:free")]));
    assert_eq!(config.remote.model, "meta/llama-3:free");

    config.apply_overrides(env(&[("OPENROUTER_MODEL", "  ")]));
    assert_eq!(config.remote.model, "meta/llama-3:free");
}

#[test]
fn remote_explainer_needs_flag_and_key() {
    let mut config = StillriskConfig::default();
    let with_key = env(&[("OPENROUTER_API_KEY", "sk-or-0123456789")]);
    assert!(config.remote_explainer(&with_key).is_none());

    config.remote.enabled = true;
    assert!(config.remote_explainer(env(&[])).is_none());

    let remote = config.remote_explainer(&with_key).unwrap();
    assert_eq!(remote.api_key, "sk-or-0123456789");
    assert_eq!(remote.base_url, "https://openrouter.ai/api/v1");
    assert_eq!(remote.timeout.as_secs(), 20);
}

#[test]
fn info_redacts_the_api_key() {
    let config = StillriskConfig::default();
    let info = config_info(&config, env(&[("OPENROUTER_API_KEY", "sk-or-0123456789")]));

    assert_eq!(info.api_key_hint.as_deref(), Some("sk-o...6789"));
    let printed = serde_json::to_string(&info).unwrap();
    assert!(!printed.contains("0123456789"));
}

#[test]
fn short_keys_are_fully_masked() {
    assert_eq!(redact_key("abc"), "****");
    assert_eq!(redact_key("12345678"), "****");
}

#[test]
fn explicit_config_path_wins() {
    let explicit = PathBuf::from("/tmp/custom.json");
    assert_eq!(config_path(Some(&explicit)).unwrap(), explicit);
}

#[test]
fn default_policy_is_permissive() {
    let mut config = StillriskConfig::default();
    assert_eq!(config.align_policy(false), AlignPolicy::Permissive);
    assert_eq!(config.align_policy(true), AlignPolicy::Strict);

    config.strict_inputs = true;
    assert_eq!(config.align_policy(false), AlignPolicy::Strict);
}
