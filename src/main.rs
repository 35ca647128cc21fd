use std::io::{self, Write};

use log::warn;

use plaindb::command::{Command, parse_command};
use plaindb::engine::Record;
use plaindb::execution::{Outcome, Session};
use plaindb::storage::Storage;

const DEFAULT_DATA_DIR: &str = "data";

fn main() -> io::Result<()> {
    env_logger::init();

    let root = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
    let mut session = Session::new(Storage::new(root));

    println!("plaindb interactive shell. Type 'help' for commands, 'exit' to quit.");

    loop {
        print!("db> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            println!();
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("Error: {e}");
                continue;
            }
        };

        if let Some(action) = destructive_action(&command) {
            if !confirm(action)? {
                println!("Cancelled.");
                continue;
            }
        }

        match session.execute(command) {
            Ok(Outcome::Rows { columns, rows }) => render_rows(&columns, &rows),
            Ok(Outcome::Message(message)) => println!("{message}"),
            Ok(Outcome::Exit) => break,
            Err(e) => {
                warn!("command failed: {e}");
                println!("Error: {e}");
            }
        }
    }
    Ok(())
}

fn destructive_action(command: &Command) -> Option<&'static str> {
    match command {
        Command::DropTable { .. } => Some("drop the table"),
        Command::Delete { .. } => Some("delete rows"),
        _ => None,
    }
}

fn confirm(action: &str) -> io::Result<bool> {
    print!("Are you sure you want to {action}? [y/n]: ");
    io::stdout().flush()?;
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Aligned text table, columns in schema order so ID comes first.
fn render_rows(columns: &[String], rows: &[Record]) {
    if rows.is_empty() {
        println!("No rows found.");
        return;
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|col| record.get(col).map(|v| v.to_string()).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{c:<width$}", width = *w))
        .collect();
    println!("| {} |", header.join(" | "));

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    println!("|-{}-|", rule.join("-+-"));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{c:<width$}", width = *w))
            .collect();
        println!("| {} |", line.join(" | "));
    }
}
