use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SITEKIT_ENV: [&str; 6] = [
    "SITEKIT_SERVER_ADMIN",
    "SITEKIT_HTTP_HOST",
    "SITEKIT_LOCALE",
    "SITEKIT_SMTP_PASSWORD",
    "SITEKIT_HTTP_TIMEOUT",
    "RUST_LOG",
];

/// Isolated home and config directory per test
struct TestEnv {
    tmp: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            tmp: TempDir::new().expect("create temp dir"),
        }
    }

    fn path(&self) -> &Path {
        self.tmp.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("sitekit");
        for var in SITEKIT_ENV {
            cmd.env_remove(var);
        }
        cmd.env("HOME", self.path())
            .arg("--config-dir")
            .arg(self.path().join("config"));
        cmd
    }

    fn set(&self, key: &str, value: &str) {
        self.cmd()
            .args(["config", "set", key, value])
            .assert()
            .success();
    }
}

#[test]
fn test_validate_accepts_good_fields() {
    let env = TestEnv::new();
    env.cmd()
        .args([
            "validate",
            "--username",
            "valid_name1",
            "--email",
            "someone@example.com",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("username"))
        .stdout(predicate::str::contains("ok"));
}

#[test]
fn test_validate_json_reports_rejections() {
    let env = TestEnv::new();
    let output = env
        .cmd()
        .args([
            "validate",
            "--password",
            "abcdefg1",
            "--name",
            "Ann",
            "--json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("password is invalid (noupper)"))
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).expect("valid json output");
    assert_eq!(report[0]["field"], "password");
    assert_eq!(report[0]["result"], "noupper");
    assert_eq!(report[0]["valid"], false);
    assert_eq!(report[1]["result"], "ok");
}

#[test]
fn test_validate_confirm_mismatch() {
    let env = TestEnv::new();
    env.cmd()
        .args(["validate", "--password", "Secret12", "--confirm", "Secret13"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("mismatch"));
}

#[test]
fn test_validate_needs_a_field() {
    let env = TestEnv::new();
    env.cmd()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to validate"));
}

#[test]
fn test_escape_and_strip() {
    let env = TestEnv::new();
    env.cmd()
        .args(["escape", "<b>Tom & Jerry</b>"])
        .assert()
        .success()
        .stdout("&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;\n");

    env.cmd()
        .args(["escape", "--strip", "<b>Tom & Jerry</b>"])
        .assert()
        .success()
        .stdout("Tom & Jerry\n");
}

#[test]
fn test_wrap() {
    let env = TestEnv::new();
    env.cmd()
        .args(["wrap", "--width", "10", "The quick brown fox"])
        .assert()
        .success()
        .stdout("The quick\nbrown fox\n");
}

#[test]
fn test_hash_length() {
    let env = TestEnv::new();
    env.cmd()
        .args(["hash", "--length", "16"])
        .assert()
        .success()
        .stdout(predicate::str::is_match("^[0-9a-f]{16}\n$").expect("valid regex"));
}

#[test]
fn test_gravatar() {
    let env = TestEnv::new();
    env.cmd()
        .args(["gravatar", "Someone@Example.com", "--size", "120"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("http://www.gravatar.com/avatar/"))
        .stdout(predicate::str::contains("?d=wavatar&amp;s=120&amp;r=g"));
}

#[test]
fn test_dir_list_and_delete() {
    let env = TestEnv::new();
    let site = env.path().join("site");
    fs::create_dir_all(site.join("themes")).expect("create themes");
    fs::create_dir_all(site.join("assets")).expect("create assets");
    fs::write(site.join("index.php"), "<?php").expect("write file");

    env.cmd()
        .args(["dir", "list"])
        .arg(&site)
        .assert()
        .success()
        .stdout(predicate::str::contains("assets"))
        .stdout(predicate::str::contains("themes"))
        .stdout(predicate::str::contains("index.php").not());

    env.cmd()
        .args(["dir", "delete"])
        .arg(&site)
        .assert()
        .failure()
        .stderr(predicate::str::contains("without --yes"));
    assert!(site.exists());

    env.cmd()
        .args(["dir", "delete", "--yes"])
        .arg(&site)
        .assert()
        .success();
    assert!(!site.exists());

    env.cmd()
        .args(["dir", "delete", "--yes"])
        .arg(&site)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_dir_normalize() {
    let env = TestEnv::new();
    env.cmd()
        .args(["dir", "normalize", "themes/base"])
        .assert()
        .success()
        .stdout("/themes/base/\n");
}

#[test]
fn test_data_uri() {
    let env = TestEnv::new();
    let image = env.path().join("pixel.png");
    fs::write(&image, [0x89, b'P', b'N', b'G']).expect("write image");

    env.cmd()
        .arg("data-uri")
        .arg(&image)
        .assert()
        .success()
        .stdout("data:image/png;base64,iVBORw==\n");

    let text = env.path().join("notes.txt");
    fs::write(&text, "hello").expect("write text");
    env.cmd()
        .arg("data-uri")
        .arg(&text)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Hint: Supported formats"));
}

#[test]
fn test_zip_missing_archive() {
    let env = TestEnv::new();
    env.cmd()
        .arg("zip")
        .arg(env.path().join("missing.zip"))
        .arg(env.path().join("out"))
        .assert()
        .failure();
}

#[test]
fn test_config_set_and_show() {
    let env = TestEnv::new();
    env.set("site.http_host", "example.test");
    env.set("mail.smtp_port", "2525");

    assert!(env.path().join("config").join("config.toml").exists());

    env.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("example.test"))
        .stdout(predicate::str::contains("2525"));

    env.cmd()
        .args(["config", "set", "site.colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("site.colour"));

    env.cmd()
        .args(["config", "set", "mail.smtp_port", "many"])
        .assert()
        .failure();
}

#[test]
fn test_mail_preview_requires_server_admin() {
    let env = TestEnv::new();
    env.cmd()
        .args([
            "mail",
            "preview",
            "--to",
            "user@example.com",
            "--subject",
            "Hi",
            "--body",
            "<b>Hello</b>",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "No administrative mail address configured",
        ))
        .stderr(predicate::str::contains("site.server_admin"));
}

#[test]
fn test_mail_preview() {
    let env = TestEnv::new();
    env.set("site.server_admin", "admin@example.test");
    env.set("site.http_host", "example.test");

    env.cmd()
        .args([
            "mail",
            "preview",
            "--to",
            "user@example.com",
            "--subject",
            "Welcome",
            "--body",
            "<b>Hello</b> there",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("To: user@example.com"))
        .stdout(predicate::str::contains(
            "From: \"example.test\" <admin@example.test>",
        ))
        .stdout(predicate::str::contains("Reply-To: <admin@example.test>"))
        .stdout(predicate::str::contains("multipart/alternative"))
        .stdout(predicate::str::contains("Hello there"));
}

#[test]
fn test_mail_send_through_file_backend() {
    let env = TestEnv::new();
    let outbox = env.path().join("outbox");
    fs::create_dir_all(&outbox).expect("create outbox");
    env.set("site.server_admin", "admin@example.test");
    env.set("mail.backend", "file");
    env.set("mail.file_dir", &outbox.display().to_string());

    let body = env.path().join("body.html");
    fs::write(&body, "<p>From a file</p>").expect("write body");

    env.cmd()
        .args([
            "mail",
            "send",
            "--to",
            "user@example.com",
            "--subject",
            "Report",
            "--from",
            "reports@example.test",
            "--body-file",
        ])
        .arg(&body)
        .assert()
        .success()
        .stdout(predicate::str::contains("via file"));

    let written: Vec<_> = fs::read_dir(&outbox)
        .expect("read outbox")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "eml"))
        .collect();
    assert_eq!(written.len(), 1);
    let message = fs::read_to_string(written[0].path()).expect("read eml");
    assert!(message.contains("Reply-To: <reports@example.test>"));
    assert!(message.contains("From a file"));
}

#[test]
fn test_sql_script_with_prefix() {
    let env = TestEnv::new();
    let script = env.path().join("install.sql");
    fs::write(
        &script,
        "CREATE TABLE ph7_members (id INTEGER PRIMARY KEY);\n\
         INSERT INTO ph7_members (id) VALUES (1);\n",
    )
    .expect("write script");
    let database = format!("sqlite://{}", env.path().join("site.db").display());

    env.cmd()
        .arg("sql")
        .arg(&script)
        .args([
            "--database",
            &database,
            "--old-prefix",
            "ph7_",
            "--new-prefix",
            "site_",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("rows affected"));
    assert!(env.path().join("site.db").exists());

    env.cmd()
        .arg("sql")
        .arg(env.path().join("missing.sql"))
        .args(["--database", &database])
        .assert()
        .failure();
}

#[test]
fn test_tr_without_catalog() {
    let env = TestEnv::new();
    env.cmd()
        .args(["tr", "Hello %0%, meet %1%", "Ann", "Bob"])
        .assert()
        .success()
        .stdout("Hello Ann, meet Bob\n");

    env.cmd()
        .args(["tr", "%n% file", "--plural", "%n% files", "--count", "3"])
        .assert()
        .success()
        .stdout("3 files\n");

    env.cmd()
        .args(["tr", "%n% file", "--plural", "%n% files", "--count", "1"])
        .assert()
        .success()
        .stdout("1 file\n");
}

#[test]
fn test_tr_with_catalog() {
    let env = TestEnv::new();
    let locales = env.path().join("locales");
    let messages = locales.join("fr").join("LC_MESSAGES");
    fs::create_dir_all(&messages).expect("create catalog dir");
    fs::write(
        messages.join("messages.po"),
        "msgid \"\"\nmsgstr \"\"\n\"Language: fr\\n\"\n\nmsgid \"Welcome\"\nmsgstr \"Bienvenue\"\n",
    )
    .expect("write catalog");
    env.set("site.locale_dir", &locales.display().to_string());

    env.cmd()
        .args(["tr", "Welcome", "--locale", "fr"])
        .assert()
        .success()
        .stdout("Bienvenue\n");

    env.cmd()
        .args(["tr", "Welcome", "--locale", "de"])
        .assert()
        .success()
        .stdout("Welcome\n");
}

#[test]
fn test_url_check_unreachable() {
    let env = TestEnv::new();
    env.set("http.timeout_secs", "2");
    env.cmd()
        .args(["url", "check", "http://127.0.0.1:1/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not reachable"));
}

#[test]
fn test_validate_rejects_display_name_email() {
    let env = TestEnv::new();
    env.cmd()
        .args(["validate", "--email", "Name <a@b.com>", "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("bademail"));

    env.cmd()
        .args(["validate", "--email", "user@localhost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("email is invalid (bademail)"));
}
