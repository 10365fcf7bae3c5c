//! CLI integration tests for the rest-catalog binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("rest-catalog"))
}

// Helper to create a temp resource file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const POST: &str = r#"{
    "name": "post",
    "description": "Blog posts",
    "schema": {
        "top_level": { "many": "latest" },
        "step": { "named": [
            { "path": "id", "endpoint": { "single": { "by": { "read": "blog::PostId" } } } }
        ] }
    },
    "handlers": {
        "list": { "outputs": [{ "kind": "json", "type": "blog::Post" }] },
        "get": { "outputs": [{ "kind": "json", "type": "blog::Post" }] },
        "selects": [{ "path": "info", "handler": {} }]
    },
    "children": [
        {
            "name": "draft",
            "description": "Unpublished drafts",
            "private": true,
            "schema": { "step": { "named": [] } },
            "handlers": { "create": {} }
        }
    ]
}"#;

mod derive_command {
    use super::*;

    #[test]
    fn basic_derive() {
        let dir = TempDir::new().unwrap();
        let resource = write_temp_file(&dir, "post.json", POST);

        cmd()
            .args(["derive", resource.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""description":"List posts""#))
            .stdout(predicate::str::contains(r#""description":"Retrieve information data""#))
            .stdout(predicate::str::contains(r#""accessor":true"#));
    }

    #[test]
    fn derive_with_pretty() {
        let dir = TempDir::new().unwrap();
        let resource = write_temp_file(&dir, "post.json", POST);

        cmd()
            .args(["derive", resource.to_str().unwrap(), "--pretty"])
            .assert()
            .success()
            // Pretty output has newlines and indentation
            .stdout(predicate::str::contains("{\n"));
    }

    #[test]
    fn private_children_included_by_default() {
        let dir = TempDir::new().unwrap();
        let resource = write_temp_file(&dir, "post.json", POST);

        cmd()
            .args(["derive", resource.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""description":"Create draft""#));
    }

    #[test]
    fn no_private_skips_private_children() {
        let dir = TempDir::new().unwrap();
        let resource = write_temp_file(&dir, "post.json", POST);

        cmd()
            .args(["derive", resource.to_str().unwrap(), "--no-private"])
            .assert()
            .success()
            .stdout(predicate::str::contains("draft").not());
    }

    #[test]
    fn unresolvable_type_fails() {
        let dir = TempDir::new().unwrap();
        let resource = write_temp_file(
            &dir,
            "post.json",
            r#"{
                "name": "post",
                "schema": { "step": { "named": [] } },
                "handlers": { "create": { "inputs": [{ "kind": "json", "type": "List<Post" }] } }
            }"#,
        );

        cmd()
            .args(["derive", resource.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("post/create/inputs/0"));
    }

    #[test]
    fn lenient_drops_unresolvable_payload() {
        let dir = TempDir::new().unwrap();
        let resource = write_temp_file(
            &dir,
            "post.json",
            r#"{
                "name": "post",
                "schema": { "step": { "named": [] } },
                "handlers": { "create": { "inputs": [{ "kind": "json", "type": "List<Post" }] } }
            }"#,
        );

        cmd()
            .args(["derive", resource.to_str().unwrap(), "--lenient"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""inputs":[]"#));
    }

    #[test]
    fn log_level_writes_to_stderr() {
        let dir = TempDir::new().unwrap();
        let resource = write_temp_file(&dir, "post.json", POST);

        cmd()
            .args(["--log-level", "info", "derive", resource.to_str().unwrap()])
            .assert()
            .success()
            .stderr(predicate::str::contains("catalogue derived"));
    }
}

mod lint_command {
    use super::*;

    #[test]
    fn clean_document_passes() {
        let dir = TempDir::new().unwrap();
        write_temp_file(&dir, "post.json", POST);

        cmd()
            .args(["lint", dir.path().to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("1 files checked, all passed"));
    }

    #[test]
    fn duplicate_paths_fail() {
        let dir = TempDir::new().unwrap();
        write_temp_file(
            &dir,
            "post.json",
            r#"{
                "name": "post",
                "description": "Blog posts",
                "schema": { "step": { "named": [] } },
                "handlers": { "actions": [
                    { "path": "publish", "handler": {} },
                    { "path": "publish", "handler": {} }
                ] }
            }"#,
        );

        cmd()
            .args(["lint", dir.path().to_str().unwrap()])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("E003"));
    }

    #[test]
    fn warnings_fail_only_in_strict_mode() {
        let dir = TempDir::new().unwrap();
        let resource = write_temp_file(
            &dir,
            "post.json",
            r#"{ "name": "post", "schema": { "step": { "named": [] } } }"#,
        );

        cmd()
            .args(["lint", resource.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("W002"));

        cmd()
            .args(["lint", resource.to_str().unwrap(), "--strict"])
            .assert()
            .code(1);
    }

    #[test]
    fn json_output() {
        let dir = TempDir::new().unwrap();
        write_temp_file(&dir, "broken.json", "{ not json");

        let output = cmd()
            .args(["lint", dir.path().to_str().unwrap(), "--format", "json"])
            .assert()
            .code(1)
            .get_output()
            .stdout
            .clone();

        let result: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(result["files_checked"], 1);
        assert_eq!(result["results"][0]["diagnostics"][0]["code"], "E001");
    }

    #[test]
    fn quiet_hides_passing_files() {
        let dir = TempDir::new().unwrap();
        write_temp_file(&dir, "post.json", POST);

        cmd()
            .args(["lint", dir.path().to_str().unwrap(), "--quiet"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Linting").not())
            .stdout(predicate::str::contains("post.json").not());
    }

    #[test]
    fn missing_path() {
        cmd()
            .args(["lint", "/nonexistent/resources"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("path not found"));
    }
}

mod error_handling {
    use super::*;

    #[test]
    fn file_not_found() {
        cmd()
            .args(["derive", "/nonexistent/post.json"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("file not found"));
    }

    #[test]
    fn invalid_json() {
        let dir = TempDir::new().unwrap();
        let resource = write_temp_file(&dir, "post.json", "{ not json");

        cmd()
            .args(["derive", resource.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid JSON"));
    }

    #[test]
    fn not_a_resource_document() {
        let dir = TempDir::new().unwrap();
        let resource = write_temp_file(&dir, "post.json", r#"{ "name": "post" }"#);

        cmd()
            .args(["derive", resource.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid resource document"));
    }
}

mod help_and_version {
    use super::*;

    #[test]
    fn help_flag() {
        cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("derive"))
            .stdout(predicate::str::contains("lint"));
    }

    #[test]
    fn version_flag() {
        cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("rest-catalog"));
    }

    #[test]
    fn missing_resource_argument() {
        cmd().arg("derive").assert().failure();
    }
}

mod remote {
    use super::*;

    #[test]
    fn derive_from_url() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/post.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(POST)
            .create();

        cmd()
            .args(["derive", &format!("{}/post.json", server.url())])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""name":"post""#));
        mock.assert();
    }

    #[test]
    fn derive_url_404() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/missing.json").with_status(404).create();

        cmd()
            .args(["derive", &format!("{}/missing.json", server.url())])
            .assert()
            .code(3) // Network errors are exit code 3
            .stderr(predicate::str::contains("failed to fetch"));
    }
}
