use crate::error::{DbError, DbResult};

/// A parsed command line. `clause` fields carry the raw tokens from the
/// first keyword of the clause onward (`where ...` / `set ... where ...`)
/// for the predicate evaluator, which needs the table schema to type
/// the values.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateTable { table: String, columns: Vec<String> },
    DropTable { table: String },
    ListTables,
    Insert { table: String, values: Vec<String> },
    Select { table: String, clause: Vec<String> },
    Update { table: String, clause: Vec<String> },
    Delete { table: String, clause: Vec<String> },
    Help,
    Exit,
}

/// Split a command line on whitespace, honoring single and double
/// quotes so values like `"Ann Lee"` stay one token. Quotes are
/// stripped; an unbalanced quote is a syntax error.
pub fn tokenize(line: &str) -> DbResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_token = false;

    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None => match ch {
                '"' | '\'' => {
                    quote = Some(ch);
                    in_token = true;
                }
                c if c.is_whitespace() => {
                    if in_token {
                        tokens.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                }
                c => {
                    current.push(c);
                    in_token = true;
                }
            },
        }
    }
    if quote.is_some() {
        return Err(DbError::Syntax("unbalanced quote".to_string()));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Insert values arrive as `("Ann", 28)`; strip the surrounding parens
/// and commas the tokenizer leaves on each token.
fn clean_value(token: &str) -> String {
    token
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim_matches(',')
        .trim()
        .to_string()
}

/// Parse one command line. Blank input is `Ok(None)`; an unrecognized
/// command is a syntax error that points at `help`.
pub fn parse_command(line: &str) -> DbResult<Option<Command>> {
    let tokens = tokenize(line)?;
    let Some(first) = tokens.first() else {
        return Ok(None);
    };

    let command = match first.to_ascii_lowercase().as_str() {
        "create_table" => {
            if tokens.len() < 3 {
                return Err(DbError::Syntax(
                    "usage: create_table <name> <column:type> ...".to_string(),
                ));
            }
            Command::CreateTable {
                table: tokens[1].clone(),
                columns: tokens[2..].to_vec(),
            }
        }
        "drop_table" => {
            if tokens.len() < 2 {
                return Err(DbError::Syntax("usage: drop_table <name>".to_string()));
            }
            Command::DropTable {
                table: tokens[1].clone(),
            }
        }
        "list_tables" => Command::ListTables,
        "insert" => {
            if tokens.len() < 5
                || !tokens[1].eq_ignore_ascii_case("into")
                || !tokens[3].eq_ignore_ascii_case("values")
            {
                return Err(DbError::Syntax(
                    "usage: insert into <table> values (<value>, ...)".to_string(),
                ));
            }
            Command::Insert {
                table: tokens[2].clone(),
                values: tokens[4..].iter().map(|t| clean_value(t)).collect(),
            }
        }
        "select" => {
            if tokens.len() < 3 || !tokens[1].eq_ignore_ascii_case("from") {
                return Err(DbError::Syntax(
                    "usage: select from <table> [where <column> = <value>]".to_string(),
                ));
            }
            Command::Select {
                table: tokens[2].clone(),
                clause: tokens[3..].to_vec(),
            }
        }
        "update" => {
            if tokens.len() < 2 {
                return Err(DbError::Syntax(
                    "usage: update <table> set <column> = <value> where <column> = <value>"
                        .to_string(),
                ));
            }
            Command::Update {
                table: tokens[1].clone(),
                clause: tokens[2..].to_vec(),
            }
        }
        "delete" => {
            if tokens.len() < 3 || !tokens[1].eq_ignore_ascii_case("from") {
                return Err(DbError::Syntax(
                    "usage: delete from <table> where <column> = <value>".to_string(),
                ));
            }
            Command::Delete {
                table: tokens[2].clone(),
                clause: tokens[3..].to_vec(),
            }
        }
        "help" | "?" => Command::Help,
        "exit" | "quit" => Command::Exit,
        other => {
            return Err(DbError::Syntax(format!(
                "unknown command '{other}', type 'help' for the command list"
            )));
        }
    };
    Ok(Some(command))
}
