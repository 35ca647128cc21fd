use std::time::Instant;

use log::{debug, info};

use crate::cache::QueryCache;
use crate::command::Command;
use crate::engine::{self, Record};
use crate::error::{DbError, DbResult};
use crate::predicate::{parse_set_clause, parse_where_clause};
use crate::storage::Storage;

/// What a command produced, for the REPL to render.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Rows {
        columns: Vec<String>,
        rows: Vec<Record>,
    },
    Message(String),
    Exit,
}

/// One interactive session: storage plus the select cache. The catalog
/// is reloaded from disk for every command, so edits made to the
/// metadata file between commands are picked up.
pub struct Session {
    storage: Storage,
    cache: QueryCache,
}

impl Session {
    pub fn new(storage: Storage) -> Self {
        Session {
            storage,
            cache: QueryCache::new(),
        }
    }

    pub fn execute(&mut self, command: Command) -> DbResult<Outcome> {
        match command {
            Command::CreateTable { table, columns } => self.create_table(&table, &columns),
            Command::DropTable { table } => self.drop_table(&table),
            Command::ListTables => self.list_tables(),
            Command::Insert { table, values } => self.insert(&table, &values),
            Command::Select { table, clause } => self.select(&table, &clause),
            Command::Update { table, clause } => self.update(&table, &clause),
            Command::Delete { table, clause } => self.delete(&table, &clause),
            Command::Help => Ok(Outcome::Message(help_text())),
            Command::Exit => Ok(Outcome::Exit),
        }
    }

    fn create_table(&mut self, table: &str, columns: &[String]) -> DbResult<Outcome> {
        let catalog = self.storage.load_catalog()?;
        let updated = catalog.create_table(table, columns)?;
        self.storage.save_catalog(&updated)?;
        info!("table '{table}' created");
        Ok(Outcome::Message(format!("Table '{table}' created.")))
    }

    fn drop_table(&mut self, table: &str) -> DbResult<Outcome> {
        let catalog = self.storage.load_catalog()?;
        let updated = catalog.drop_table(table)?;
        self.storage.save_catalog(&updated)?;
        self.cache.invalidate_all();
        info!("table '{table}' dropped");
        Ok(Outcome::Message(format!("Table '{table}' dropped.")))
    }

    fn list_tables(&self) -> DbResult<Outcome> {
        let catalog = self.storage.load_catalog()?;
        let tables = catalog.list_tables();
        if tables.is_empty() {
            return Ok(Outcome::Message("No tables defined.".to_string()));
        }
        let mut lines = vec!["Tables:".to_string()];
        for (name, columns) in tables {
            let cols: Vec<String> = columns
                .iter()
                .map(|c| format!("{}:{}", c.name, c.ty))
                .collect();
            lines.push(format!("  - {name}: {}", cols.join(", ")));
        }
        Ok(Outcome::Message(lines.join("\n")))
    }

    fn insert(&mut self, table: &str, values: &[String]) -> DbResult<Outcome> {
        let catalog = self.storage.load_catalog()?;
        let rows = self.storage.load_rows(table)?;
        let updated = timed("insert", || engine::insert(&catalog, table, values, &rows))?;
        self.storage.save_rows(table, &updated)?;
        self.cache.invalidate_all();
        Ok(Outcome::Message(format!("Row inserted into '{table}'.")))
    }

    fn select(&mut self, table: &str, clause: &[String]) -> DbResult<Outcome> {
        let catalog = self.storage.load_catalog()?;
        let schema = catalog.get_table(table)?;
        let predicate = parse_where_clause(clause, 0, schema)?;
        let columns: Vec<String> = schema.columns.iter().map(|c| c.name.clone()).collect();

        let rows = self.storage.load_rows(table)?;
        let key = QueryCache::key(table, predicate.as_ref());
        let result = self
            .cache
            .get_or_compute(&key, || timed("select", || engine::select(&rows, predicate.as_ref())));
        Ok(Outcome::Rows {
            columns,
            rows: result,
        })
    }

    fn update(&mut self, table: &str, clause: &[String]) -> DbResult<Outcome> {
        let catalog = self.storage.load_catalog()?;
        let schema = catalog.get_table(table)?;
        let set_fields = parse_set_clause(clause, 0, schema)?;
        let where_idx = clause
            .iter()
            .position(|t| t.eq_ignore_ascii_case("where"))
            .ok_or(DbError::MissingWhere)?;
        let predicate =
            parse_where_clause(clause, where_idx, schema)?.ok_or(DbError::MissingWhere)?;

        let rows = self.storage.load_rows(table)?;
        let updated = timed("update", || engine::update(&rows, &set_fields, &predicate));
        self.storage.save_rows(table, &updated)?;
        self.cache.invalidate_all();
        Ok(Outcome::Message(format!("Rows updated in '{table}'.")))
    }

    fn delete(&mut self, table: &str, clause: &[String]) -> DbResult<Outcome> {
        let catalog = self.storage.load_catalog()?;
        let schema = catalog.get_table(table)?;
        let predicate = parse_where_clause(clause, 0, schema)?
            .ok_or_else(|| DbError::Syntax("expected where <column> = <value>".to_string()))?;

        let rows = self.storage.load_rows(table)?;
        let remaining = timed("delete", || engine::delete(&rows, &predicate));
        self.storage.save_rows(table, &remaining)?;
        self.cache.invalidate_all();
        Ok(Outcome::Message(format!("Rows deleted from '{table}'.")))
    }
}

fn timed<T>(op: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let result = f();
    debug!("{op} took {:?}", start.elapsed());
    result
}

pub fn help_text() -> String {
    let commands = [
        (
            "create_table <name> <col:type> ...",
            "create a table; types are str, int, bool",
        ),
        ("drop_table <name>", "remove a table definition"),
        ("list_tables", "show every table and its columns"),
        (
            "insert into <name> values (<v1>, ...)",
            "append a row; ID is assigned automatically",
        ),
        (
            "select from <name> [where <col> = <value>]",
            "show rows, optionally filtered",
        ),
        (
            "update <name> set <col> = <value> where <col> = <value>",
            "change matching rows",
        ),
        (
            "delete from <name> where <col> = <value>",
            "remove matching rows",
        ),
        ("help, ?", "show this message"),
        ("exit, quit", "leave the shell"),
    ];
    let width = commands.iter().map(|(cmd, _)| cmd.len()).max().unwrap_or(0);
    let mut lines = vec!["Commands:".to_string()];
    for (cmd, desc) in commands {
        lines.push(format!("  {cmd:<width$} - {desc}"));
    }
    lines.join("\n")
}
