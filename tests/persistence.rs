use std::fs;

use plaindb::command::parse_command;
use plaindb::engine::Record;
use plaindb::execution::{Outcome, Session};
use plaindb::storage::Storage;
use plaindb::types::Value;
use tempfile::tempdir;

fn run(session: &mut Session, line: &str) -> Outcome {
    let command = parse_command(line).unwrap().unwrap();
    session.execute(command).unwrap()
}

fn select_rows(session: &mut Session, line: &str) -> Vec<Record> {
    match run(session, line) {
        Outcome::Rows { rows, .. } => rows,
        other => panic!("expected rows, got {other:?}"),
    }
}

#[test]
fn data_survives_a_session_restart() {
    let dir = tempdir().unwrap();

    {
        let mut session = Session::new(Storage::new(dir.path()));
        run(&mut session, "create_table users name:str age:int");
        run(&mut session, r#"insert into users values ("Ann", 28)"#);
        run(&mut session, r#"insert into users values ("Bo", 30)"#);
    }

    let mut session = Session::new(Storage::new(dir.path()));
    let rows = select_rows(&mut session, "select from users");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("ID"), Some(&Value::Int(1)));
    assert_eq!(rows[0].get("age"), Some(&Value::Int(28)));
    assert_eq!(rows[1].get("name"), Some(&Value::Str("Bo".to_string())));
}

#[test]
fn identity_continues_from_persisted_rows() {
    let dir = tempdir().unwrap();

    {
        let mut session = Session::new(Storage::new(dir.path()));
        run(&mut session, "create_table pets name:str");
        run(&mut session, "insert into pets values (Rex)");
        run(&mut session, "insert into pets values (Tom)");
        run(&mut session, "delete from pets where ID = 2");
    }

    let mut session = Session::new(Storage::new(dir.path()));
    run(&mut session, "insert into pets values (Ada)");
    let rows = select_rows(&mut session, "select from pets");
    assert_eq!(rows[1].get("ID"), Some(&Value::Int(3)));
}

#[test]
fn metadata_file_is_readable_json_in_creation_order() {
    let dir = tempdir().unwrap();
    let mut session = Session::new(Storage::new(dir.path()));
    run(&mut session, "create_table zoo animal:str");
    run(&mut session, "create_table aviary bird:str");

    let text = fs::read_to_string(dir.path().join("metadata.json")).unwrap();
    let zoo = text.find("\"zoo\"").unwrap();
    let aviary = text.find("\"aviary\"").unwrap();
    assert!(zoo < aviary);
    assert!(text.contains("\"type\": \"str\""));
}

#[test]
fn scalars_round_trip_without_coercion_across_restarts() {
    let dir = tempdir().unwrap();

    {
        let mut session = Session::new(Storage::new(dir.path()));
        run(&mut session, "create_table mixed label:str count:int live:bool");
        run(&mut session, r#"insert into mixed values ("42", 42, true)"#);
    }

    let mut session = Session::new(Storage::new(dir.path()));
    let rows = select_rows(&mut session, "select from mixed");
    assert_eq!(rows[0].get("label"), Some(&Value::Str("42".to_string())));
    assert_eq!(rows[0].get("count"), Some(&Value::Int(42)));
    assert_eq!(rows[0].get("live"), Some(&Value::Bool(true)));
}

#[test]
fn drop_table_removes_the_definition_but_not_the_rows_file() {
    let dir = tempdir().unwrap();
    let mut session = Session::new(Storage::new(dir.path()));
    run(&mut session, "create_table users name:str");
    run(&mut session, "insert into users values (Ann)");
    run(&mut session, "drop_table users");

    let command = parse_command("select from users").unwrap().unwrap();
    assert!(session.execute(command).is_err());
    // Row data cleanup is deliberately left to the operator.
    assert!(dir.path().join("users.json").exists());
}
