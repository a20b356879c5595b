use assert_cmd::Command;
use predicates::prelude::*;

fn shelf() -> Command {
    let mut cmd = Command::cargo_bin("shelf").unwrap();
    cmd.env("SHELF_CONFIG_DIR", "/nonexistent/shelf-config")
        .env_remove("SHELF_ENV")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn list_prints_catalogue_without_a_database() {
    shelf()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("find-all-books"))
        .stdout(predicate::str::contains("find-in-stock-after-2010"))
        .stdout(predicate::str::contains("analyze-index-performance"))
        .stdout(predicate::str::contains("Connected").not());
}

#[test]
fn help_mentions_runner_commands() {
    shelf()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("seed"))
        .stdout(predicate::str::contains("paginate-books"));
}

#[test]
fn unknown_operation_fails_before_connecting() {
    shelf()
        .args(["run", "--only", "find-all-books,no-such-query"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown operation(s): no-such-query"))
        .stdout(predicate::str::contains("Connected").not());
}

#[test]
fn unsupported_environment_is_rejected() {
    shelf()
        .env("SHELF_ENV", "qa")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported environment 'qa'"));
}

#[test]
fn unreachable_server_still_reports_closing() {
    shelf()
        .args([
            "find-all-books",
            "--uri",
            "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=300&connectTimeoutMS=300",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Connection closed"))
        .stdout(predicate::str::contains("Connected to MongoDB").not());
}

#[test]
fn zero_page_size_in_settings_is_rejected_before_connecting() {
    shelf()
        .env("SHELF_RUN__PARAMS__PAGE_SIZE", "0")
        .arg("paginate-books")
        .assert()
        .failure()
        .stderr(predicate::str::contains("page_size must be at least 1"))
        .stdout(predicate::str::contains("Connected").not());
}
