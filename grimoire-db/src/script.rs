//! Bootstrap SQL script execution.
//!
//! Schema and seed scripts are plain text: semicolon-delimited
//! statements with `/* */` block and `--` line comments. Comments are
//! stripped (quoted literals respected), statements executed one at a
//! time, and `DROP` statements skipped unless explicitly allowed.

use rusqlite::Connection;

use crate::error::DbResult;

/// Runs every statement of `sql` on `conn`. `DROP` statements only
/// execute when `allow_drop` is set.
pub fn run_script(conn: &Connection, sql: &str, allow_drop: bool) -> DbResult<()> {
    for statement in split_statements(sql) {
        if !allow_drop && statement.to_uppercase().starts_with("DROP") {
            continue;
        }
        conn.execute_batch(&statement)?;
    }
    Ok(())
}

/// Strips comments, splits on `;`, trims, and drops empty statements.
pub fn split_statements(sql: &str) -> Vec<String> {
    strip_comments(sql)
        .split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(PartialEq)]
enum State {
    Normal,
    SingleQuoted,
    LineComment,
    BlockComment,
}

/// Removes `--` line and `/* */` block comments. Comment markers
/// inside single-quoted SQL literals are left alone; the standard
/// `''` escape keeps quote tracking honest.
fn strip_comments(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    let mut state = State::Normal;

    while let Some(c) = chars.next() {
        match state {
            State::Normal => match c {
                '\'' => {
                    state = State::SingleQuoted;
                    out.push(c);
                }
                '-' if chars.peek() == Some(&'-') => {
                    chars.next();
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = State::BlockComment;
                }
                _ => out.push(c),
            },
            State::SingleQuoted => {
                out.push(c);
                if c == '\'' {
                    // A doubled quote stays inside the literal.
                    if chars.peek() == Some(&'\'') {
                        out.push('\'');
                        chars.next();
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if c == '\n' {
                    out.push(c);
                    state = State::Normal;
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Normal;
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_comments_stripped() {
        let statements = split_statements("-- header\nSELECT 1; -- trailing\nSELECT 2;");
        assert_eq!(statements, vec!["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn block_comments_stripped_across_lines() {
        let statements = split_statements("/* a\nmultiline\ncomment */ SELECT 1;");
        assert_eq!(statements, vec!["SELECT 1"]);
    }

    #[test]
    fn comment_markers_inside_literals_kept() {
        let statements =
            split_statements("INSERT INTO t VALUES ('a -- b', 'c /* d */', 'it''s');");
        assert_eq!(
            statements,
            vec!["INSERT INTO t VALUES ('a -- b', 'c /* d */', 'it''s')"]
        );
    }

    #[test]
    fn empty_statements_dropped() {
        assert!(split_statements(" ;; \n ; /* only comments */ ;").is_empty());
    }

    #[test]
    fn drop_statements_skipped_without_flag() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();

        run_script(&conn, "DROP TABLE t; INSERT INTO t VALUES (1);", false).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn drop_statements_executed_with_flag() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();

        run_script(&conn, "DROP TABLE t;", true).unwrap();
        assert!(conn.prepare("SELECT * FROM t").is_err());
    }
}
