//! Integration tests for the tanker command
//!
//! Each test seeds a temporary SQLite database, writes a JSON input file and
//! drives `run()` with parsed command-line arguments.

use clap::Parser;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tanker_cli::{run, Args};
use tanker_common::config::TomlConfig;
use tanker_common::db::connect;

struct Fixture {
    _dir: tempfile::TempDir,
    db_path: PathBuf,
    input_path: PathBuf,
}

async fn fixture(input: Value) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("records.db");
    let input_path = dir.path().join("input.json");

    let pool = connect(&db_path).await.unwrap();
    sqlx::query("CREATE TABLE files (id INTEGER PRIMARY KEY, foo TEXT, size INTEGER)")
        .execute(&pool)
        .await
        .unwrap();
    for id in 1..=4 {
        sqlx::query("INSERT INTO files (id, foo, size) VALUES (?, 'bar', ?)")
            .bind(id)
            .bind(id * 10)
            .execute(&pool)
            .await
            .unwrap();
    }
    pool.close().await;

    std::fs::write(&input_path, serde_json::to_string(&input).unwrap()).unwrap();

    Fixture {
        _dir: dir,
        db_path,
        input_path,
    }
}

fn args(fixture: &Fixture, extra: &[&str]) -> Args {
    let mut argv: Vec<String> = vec![
        "tanker".into(),
        "--database".into(),
        path_arg(&fixture.db_path),
        "--table".into(),
        "files".into(),
    ];
    argv.extend(extra.iter().map(|s| s.to_string()));
    argv.push(path_arg(&fixture.input_path));
    Args::try_parse_from(argv).unwrap()
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

#[tokio::test]
async fn test_fill_collection() {
    let fixture = fixture(json!([{"file": 2}, {"file": [3, ""]}, {"file": null}])).await;
    let args = args(&fixture, &["--field", "file"]);

    let output = run(&args, &TomlConfig::default()).await.unwrap();

    assert_eq!(
        output,
        json!([
            {"file": 2, "file_data": {"id": 2, "foo": "bar", "size": 20}},
            {"file": [3, ""], "file_data": {"3": {"id": 3, "foo": "bar", "size": 30}}},
            {"file": "", "file_data": {}},
        ])
    );
}

#[tokio::test]
async fn test_fill_item_with_suffix_and_select() {
    let fixture = fixture(json!({"file": 1, "cover": 4})).await;
    let args = args(
        &fixture,
        &["--field", "file,cover", "--suffix", "_row", "--select", "foo"],
    );

    let output = run(&args, &TomlConfig::default()).await.unwrap();

    assert_eq!(
        output,
        json!({
            "file": 1,
            "cover": 4,
            "file_row": {"foo": "bar"},
            "cover_row": {"foo": "bar"},
        })
    );
}

#[tokio::test]
async fn test_get_mode_prints_mapping() {
    let fixture = fixture(json!([{"file": 2}, {"file": 1}, {"file": 9}])).await;
    let args = args(&fixture, &["--field", "file", "--get"]);

    let output = run(&args, &TomlConfig::default()).await.unwrap();

    assert_eq!(
        output,
        json!({
            "1": {"id": 1, "foo": "bar", "size": 10},
            "2": {"id": 2, "foo": "bar", "size": 20},
        })
    );
}

#[tokio::test]
async fn test_table_and_suffix_from_config_file() {
    let fixture = fixture(json!({"file": 3})).await;
    let argv = vec![
        "tanker".to_string(),
        "--database".to_string(),
        path_arg(&fixture.db_path),
        "--field".to_string(),
        "file".to_string(),
        path_arg(&fixture.input_path),
    ];
    let args = Args::try_parse_from(argv).unwrap();
    let config = TomlConfig {
        table: Some("files".to_string()),
        suffix: Some("_cfg".to_string()),
        ..TomlConfig::default()
    };

    let output = run(&args, &config).await.unwrap();
    assert_eq!(output["file_cfg"], json!({"id": 3, "foo": "bar", "size": 30}));
}

#[tokio::test]
async fn test_missing_table_is_error() {
    let fixture = fixture(json!({"file": 3})).await;
    let argv = vec![
        "tanker".to_string(),
        "--database".to_string(),
        path_arg(&fixture.db_path),
        "--field".to_string(),
        "file".to_string(),
        path_arg(&fixture.input_path),
    ];
    let args = Args::try_parse_from(argv).unwrap();

    let err = run(&args, &TomlConfig::default()).await.unwrap_err();
    assert!(err.to_string().contains("No table given"));
}

#[tokio::test]
async fn test_invalid_input_document_is_error() {
    let fixture = fixture(json!("not records")).await;
    let args = args(&fixture, &["--field", "file"]);

    assert!(run(&args, &TomlConfig::default()).await.is_err());
}
