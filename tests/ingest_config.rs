// tests/ingest_config.rs
use std::{env, fs};

use tracnghiem_feed::ingest::config::{
    load_sources_default, load_sources_from, IngestConfig, ENV_PATH,
};
use tracnghiem_feed::Category;

#[test]
fn parse_toml_and_json_paths() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("sources.toml");
    fs::write(
        &p_toml,
        r#"
refresh_secs = 60

[[sources]]
category = "Quiz"
url = "https://sheets.test/quiz.tsv"
"#,
    )
    .unwrap();
    let cfg = load_sources_from(&p_toml).unwrap();
    assert_eq!(cfg.refresh_secs, 60);
    assert_eq!(cfg.sources.len(), 1);
    assert_eq!(cfg.sources[0].category, Category::Quiz);

    let p_json = dir.path().join("sources.json");
    fs::write(
        &p_json,
        r#"{"max_numbered_fields": 20, "sources": [{"category": "12 Con giáp", "url": "https://x"}]}"#,
    )
    .unwrap();
    let cj = load_sources_from(&p_json).unwrap();
    assert_eq!(cj.max_numbered_fields, 20);
    assert_eq!(cj.sources[0].category, Category::ConGiap);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_sources_from(&dir.path().join("nope.toml")).is_err());
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();

    env::remove_var(ENV_PATH);

    // 1) nothing on disk → built-in seed
    let v = load_sources_default().unwrap();
    assert_eq!(v, IngestConfig::default_seed());

    // 2) config/sources.toml fallback
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(
        cfg_dir.join("sources.toml"),
        "[[sources]]\ncategory = \"Cung hoàng đạo\"\nurl = \"https://from-toml\"\n",
    )
    .unwrap();
    let vt = load_sources_default().unwrap();
    assert_eq!(vt.sources[0].url, "https://from-toml");

    // 3) env wins
    let p_env = tmp.path().join("override.json");
    fs::write(
        &p_env,
        r#"{"sources":[{"category":"Quiz","url":"https://from-env"}]}"#,
    )
    .unwrap();
    env::set_var(ENV_PATH, p_env.display().to_string());
    let ve = load_sources_default().unwrap();
    assert_eq!(ve.sources[0].url, "https://from-env");

    // 4) env pointing nowhere is an error
    env::set_var(ENV_PATH, tmp.path().join("missing.toml").display().to_string());
    assert!(load_sources_default().is_err());
    env::remove_var(ENV_PATH);

    env::set_current_dir(&old).unwrap();
}
