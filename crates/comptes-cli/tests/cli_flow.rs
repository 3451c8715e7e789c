use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use rust_decimal::Decimal;
use serde_json::Value;
use tempfile::TempDir;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_comptes"))
}

/// Config and data directory for one test, removed on drop.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config").join("config.toml")
    }

    fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(bin())
            .args(args)
            .env("COMPTES_CONFIG", self.config_path())
            .env("COMPTES_DATA_DIR", self.data_dir())
            .env_remove("COMPTES_LOG")
            .output()
            .expect("run comptes")
    }

    fn ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "{:?} failed: stdout={}, stderr={}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    fn json(&self, args: &[&str]) -> Value {
        let stdout = self.ok(args);
        serde_json::from_str(&stdout).expect("parse json output")
    }

    fn init(&self) {
        self.ok(&["init"]);
    }
}

fn decimal(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("decimal string")
        .parse()
        .expect("parse decimal")
}

fn add_groceries(ws: &Workspace) -> String {
    let added = ws.json(&[
        "add", "-a", "BANQUE", "-m", "-25.50", "--desc", "Courses", "-c", "ALM", "-t", "URG",
        "-o", "2024-01-15", "--json",
    ]);
    added["transaction"]["id"]
        .as_str()
        .expect("transaction id")
        .to_string()
}

fn exists(path: &Path) -> bool {
    path.exists()
}

#[test]
fn test_cli_init_writes_config_and_catalogs() {
    let ws = Workspace::new();
    let stdout = ws.ok(&["init"]);
    assert!(stdout.contains("status=ok"));
    assert!(exists(&ws.config_path()));
    assert!(exists(&ws.data_dir().join("accounts.json")));
    assert!(exists(&ws.data_dir().join("movements.json")));

    let accounts = ws.json(&["list", "--accounts", "--json"]);
    assert_eq!(accounts[0]["id"], "BANQUE");
    assert_eq!(decimal(&accounts[0]["current_balance"]), Decimal::new(1500, 0));

    let categories = ws.ok(&["list", "--categories"]);
    assert!(categories.contains("Alimentation (ALM)"));
}

#[test]
fn test_cli_init_keeps_existing_transactions() {
    let ws = Workspace::new();
    ws.init();
    add_groceries(&ws);
    ws.init();

    let list = ws.json(&["list", "--json"]);
    assert_eq!(list.as_array().expect("array").len(), 1);
}

#[test]
fn test_cli_missing_config_message() {
    let ws = Workspace::new();
    let output = ws.run(&["list"]);
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No config found at"));
    assert!(stderr.contains("comptes init"));
}

#[test]
fn test_cli_add_and_list_formats() {
    let ws = Workspace::new();
    ws.init();
    let id = add_groceries(&ws);

    let list = ws.json(&["list", "--json"]);
    let tx = &list[0];
    assert_eq!(tx["id"], id.as_str());
    assert_eq!(tx["date"], "2024-01-15");
    assert_eq!(decimal(&tx["amount"]), Decimal::new(-2550, 2));
    assert_eq!(tx["categories"][0], "Alimentation");
    assert_eq!(tx["tags"][0], "Urgent");

    let codes = ws.json(&["list", "--codes", "--format", "json"]);
    assert_eq!(codes[0]["categories"][0], "ALM");

    let csv = ws.ok(&["list", "--format", "csv"]);
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("id,date,amount,description,categories,tags")
    );
    assert!(lines.next().expect("csv row").contains("-25.50,Courses"));

    let plain = ws.ok(&["list"]);
    assert!(plain.contains("Active Transactions:"));
    assert!(plain.contains("2024-01-15: -25.50 EUR - Courses"));
}

#[test]
fn test_cli_add_rejects_unknown_reference() {
    let ws = Workspace::new();
    ws.init();
    let output = ws.run(&["add", "-a", "NOPE", "-m", "-1", "--desc", "x"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("NOPE"));

    let output = ws.run(&["add", "-a", "BANQUE", "--desc", "x"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("amount is required"));
}

#[test]
fn test_cli_add_rejects_clashing_id() {
    let ws = Workspace::new();
    ws.init();
    let payload = r#"{"id":"loyer-2024-01","account":"BANQUE","amount":-800,"description":"Loyer"}"#;
    ws.ok(&["add", payload]);

    let again = ws.run(&["add", payload]);
    assert_eq!(again.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&again.stderr).contains("loyer-2024-01"));

    ws.ok(&["delete", "loyer-2024-01", "-m", "doublon"]);
}

#[test]
fn test_cli_edit_then_undo_restores_original() {
    let ws = Workspace::new();
    ws.init();
    let id = add_groceries(&ws);

    let edited = ws.json(&[
        "edit", &id[..8], r#"{"amount":-30.00}"#, "-m", "ticket corrigé", "--json",
    ]);
    let child = edited["transaction"]["id"].as_str().expect("child id").to_string();
    assert_ne!(child, id);

    let history = ws.json(&["list", "--history", "--json"]);
    assert_eq!(history.as_array().expect("array").len(), 2);
    assert_eq!(history[0]["is_active"], false);
    assert_eq!(history[0]["edit_comment"], "ticket corrigé");
    assert_eq!(history[1]["parent_id"], id.as_str());

    ws.ok(&["undo", &child]);
    let active = ws.json(&["list", "--json"]);
    assert_eq!(active.as_array().expect("array").len(), 1);
    assert_eq!(active[0]["id"], id.as_str());
    assert_eq!(decimal(&active[0]["amount"]), Decimal::new(-2550, 2));
}

#[test]
fn test_cli_delete_needs_message_and_known_id() {
    let ws = Workspace::new();
    ws.init();
    let id = add_groceries(&ws);

    let missing = ws.run(&["delete", &id]);
    assert_eq!(missing.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&missing.stderr).contains("Message is mandatory"));

    let unknown = ws.run(&["delete", "ffffffff", "-m", "doublon"]);
    assert_eq!(unknown.status.code(), Some(3));

    ws.ok(&["delete", &id, "-m", "doublon"]);
    let again = ws.run(&["delete", &id, "-m", "doublon"]);
    assert_eq!(again.status.code(), Some(5));

    let balance = ws.json(&["balance", "--json"]);
    assert_eq!(decimal(&balance[0]["current_balance"]), Decimal::new(1500, 0));
}

#[test]
fn test_cli_hard_delete_requires_force_without_tty() {
    let ws = Workspace::new();
    ws.init();
    let id = add_groceries(&ws);

    let refused = ws.run(&["delete", &id, "-m", "erreur", "--hard"]);
    assert_eq!(refused.status.code(), Some(4));

    ws.ok(&["delete", &id, "-m", "erreur", "--hard", "--force"]);
    let history = ws.json(&["list", "--history", "--json"]);
    assert!(history.as_array().expect("array").is_empty());
}

#[test]
fn test_cli_batch_commit_flow() {
    let ws = Workspace::new();
    ws.init();

    let begun = ws.json(&["--json", "begin", "Courses", "semaine"]);
    let batch_id = begun["batch"]["id"].as_str().expect("batch id").to_string();
    assert_eq!(begun["batch"]["description"], "Courses semaine");

    ws.ok(&["account", "BANQUE"]);
    ws.ok(&["category", "ALM"]);
    ws.ok(&["add", "-m", "-10", "--desc", "Pain"]);
    ws.ok(&["add", "-m", "-4.20", "--desc", "Lait"]);

    let context = ws.json(&["context", "show", "--json"]);
    assert_eq!(context["current_batch"], batch_id.as_str());
    assert_eq!(context["defaults"]["account"], "BANQUE");

    assert!(ws.ok(&["list"]).contains("No transactions found."));

    let committed = ws.json(&["commit", "--json"]);
    assert_eq!(committed["committed"], 2);

    let list = ws.json(&["list", "--json"]);
    assert_eq!(list.as_array().expect("array").len(), 2);
    assert_eq!(list[0]["categories"][0], "Alimentation");

    let batches = ws.json(&["list", "--batches", "--json"]);
    assert_eq!(batches[0]["state"], "committed");

    let context = ws.json(&["context", "--json"]);
    assert!(context.get("current_batch").is_none());

    let balance = ws.json(&["balance", "--json"]);
    assert_eq!(decimal(&balance[0]["current_balance"]), Decimal::new(148580, 2));
}

#[test]
fn test_cli_batch_rollback_discards() {
    let ws = Workspace::new();
    ws.init();
    ws.ok(&["begin"]);
    ws.ok(&["add", "-a", "BANQUE", "-m", "-99", "--desc", "Erreur"]);

    let rolled = ws.json(&["rollback", "--json"]);
    assert_eq!(rolled["discarded"], 1);
    assert!(ws.ok(&["list"]).contains("No transactions found."));

    let output = ws.run(&["commit"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no current batch"));
}

#[test]
fn test_cli_defaults_need_a_batch() {
    let ws = Workspace::new();
    ws.init();
    let output = ws.run(&["account", "BANQUE"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("comptes begin"));
}

#[test]
fn test_cli_sqlite_backend() {
    let ws = Workspace::new();
    ws.ok(&["init", "--backend", "sqlite"]);
    assert!(exists(&ws.data_dir().join("comptes.db")));

    add_groceries(&ws);
    let list = ws.json(&["list", "--json"]);
    assert_eq!(list.as_array().expect("array").len(), 1);
}
