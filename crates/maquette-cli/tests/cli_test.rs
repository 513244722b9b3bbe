use assert_cmd::Command;
use std::fs;

const DOC: &str = r#"{
  "environment": { "grid": { "size": 200, "tile_size": 0.5 } },
  "sites": [
    {
      "id": "site-1",
      "kind": "site",
      "name": "plot",
      "children": [
        {
          "id": "building-1",
          "kind": "building",
          "name": "main building",
          "children": [
            {
              "id": "level-1",
              "kind": "level",
              "name": "ground floor",
              "children": [
                { "id": "slab-1", "kind": "slab", "name": "ground slab", "size": [8.0, 6.0] },
                {
                  "id": "wall-1",
                  "kind": "wall",
                  "name": "north wall",
                  "start": [0.0, 0.0],
                  "end": [5.0, 0.0]
                }
              ]
            }
          ]
        }
      ]
    }
  ]
}"#;

fn cli() -> Command {
    Command::new(assert_cmd::cargo_bin!("maquette-cli"))
}

#[test]
fn validate_reports_the_node_count() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("scene.json");
    fs::write(&input, DOC).expect("write fixture");

    let assert = cli()
        .args(["validate", input.to_string_lossy().as_ref()])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf-8");
    let summary: serde_json::Value = serde_json::from_str(stdout.trim()).expect("json summary");
    assert_eq!(summary["valid"], serde_json::json!(true));
    assert_eq!(summary["nodes"], serde_json::json!(5));
}

#[test]
fn validate_reads_from_stdin_without_a_file_argument() {
    let assert = cli().arg("validate").write_stdin(DOC).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf-8");
    assert!(stdout.contains(r#""valid":true"#), "stdout: {stdout}");
}

#[test]
fn validate_honors_the_pretty_flag() {
    let assert = cli()
        .args(["validate", "--pretty"])
        .write_stdin(DOC)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf-8");
    let summary: serde_json::Value = serde_json::from_str(stdout.trim()).expect("json summary");
    assert_eq!(summary["valid"], serde_json::json!(true));
    // Pretty output is multi-line and indented.
    assert!(stdout.trim().contains("\n  "), "stdout: {stdout}");
}

#[test]
fn invalid_documents_fail_with_a_diagnostic_on_stderr() {
    // A door directly under a level is not a permitted child.
    let bad = DOC.replace(
        r#""kind": "slab", "name": "ground slab", "size": [8.0, 6.0]"#,
        r#""kind": "door", "name": "bad door""#,
    );

    let assert = cli().arg("validate").write_stdin(bad).assert().failure();
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).expect("utf-8");
    assert!(!stderr.trim().is_empty());
}

#[test]
fn inspect_counts_nodes_by_kind() {
    let assert = cli().arg("inspect").write_stdin(DOC).assert().success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf-8");
    let out: serde_json::Value = serde_json::from_str(stdout.trim()).expect("json summary");
    assert_eq!(out["sites"], serde_json::json!(1));
    assert_eq!(out["nodes"], serde_json::json!(5));
    let by_kind = out["by_kind"].as_array().expect("by_kind array");
    assert!(by_kind.contains(&serde_json::json!(["wall", 1])));
    assert!(by_kind.contains(&serde_json::json!(["slab", 1])));
}

#[test]
fn reprocess_round_trips_the_document() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("out.json");

    cli()
        .args(["reprocess", "--pretty", "--out", out.to_string_lossy().as_ref()])
        .write_stdin(DOC)
        .assert()
        .success();

    let saved = fs::read_to_string(&out).expect("read output");
    let document: serde_json::Value = serde_json::from_str(&saved).expect("json document");
    assert_eq!(document["sites"][0]["id"], serde_json::json!("site-1"));
    // Derived attributes never appear in saved documents.
    assert!(!saved.contains("elevation"));
}

#[test]
fn unknown_commands_print_usage() {
    let assert = cli().arg("frobnicate").assert().failure();
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).expect("utf-8");
    assert!(stderr.contains("usage:"), "stderr: {stderr}");
}
