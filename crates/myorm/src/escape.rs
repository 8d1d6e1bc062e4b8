//! Backtick identifier quoting (MySQL dialect).
//!
//! [`escape_field`] is applied to every field, table and join target a builder
//! receives. It quotes plain identifiers and leaves anything that already looks
//! like SQL alone:
//!
//! - `name` -> `` `name` ``
//! - `u.name` -> `` `u`.`name` ``
//! - `u.name as author` -> `` `u`.`name` as author ``
//! - `COUNT(id)`, `a, b`, `` `already` `` -> unchanged
//!
//! # Example
//! ```ignore
//! use myorm::escape_field;
//!
//! assert_eq!(escape_field("users.id")?, "`users`.`id`");
//! # Ok::<(), myorm::OrmError>(())
//! ```

use crate::error::{OrmError, OrmResult};

/// Identifier quote character.
pub const QUOTE: char = '`';

/// Wrap a single identifier segment in backticks.
///
/// `*` is never quoted so `u.*` keeps its meaning.
fn quote_segment(segment: &str) -> String {
    if segment == "*" {
        return segment.to_string();
    }
    let mut out = String::with_capacity(segment.len() + 2);
    out.push(QUOTE);
    out.push_str(segment);
    out.push(QUOTE);
    out
}

/// Count `?` placeholders, skipping anything inside `'...'`, `"..."` or `` `...` ``.
pub(crate) fn count_placeholders(sql: &str) -> usize {
    let mut count = 0;
    let mut quote: Option<char> = None;
    for ch in sql.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => match ch {
                '\'' | '"' | QUOTE => quote = Some(ch),
                '?' => count += 1,
                _ => {}
            },
        }
    }
    count
}

/// Split a trailing ` as <alias>` (case-insensitive) off an expression.
///
/// The keyword must not start the string; `as x` alone is not an alias.
/// A second ` as ` is rejected.
pub(crate) fn split_alias(expr: &str) -> OrmResult<(&str, Option<&str>)> {
    let lowered = expr.to_ascii_lowercase();
    match lowered.find(" as ") {
        Some(pos) if pos > 0 => {
            let alias = expr[pos + 4..].trim();
            if alias.is_empty() || alias.to_ascii_lowercase().contains(" as ") {
                return Err(OrmError::InvalidIdentifier(format!(
                    "'{expr}' has an invalid alias"
                )));
            }
            Ok((expr[..pos].trim(), Some(alias)))
        }
        _ => Ok((expr, None)),
    }
}

/// True when the expression is left untouched by the escaper.
fn is_passthrough(expr: &str) -> bool {
    (expr.contains('(') && expr.contains(')')) || expr.contains(',') || expr.contains(QUOTE)
}

/// Quote `column` or `table.column`.
fn quote_path(path: &str) -> OrmResult<String> {
    if path.is_empty() {
        return Err(OrmError::InvalidIdentifier("empty identifier".to_string()));
    }

    let mut segments = path.split('.');
    let first = segments.next().unwrap_or_default();
    let second = segments.next();
    if segments.next().is_some() {
        return Err(OrmError::InvalidIdentifier(format!(
            "'{path}' has more than one '.'"
        )));
    }

    match second {
        None => Ok(quote_segment(first)),
        Some(column) => {
            if first.is_empty() || column.is_empty() {
                return Err(OrmError::InvalidIdentifier(format!(
                    "'{path}' has an empty segment"
                )));
            }
            Ok(format!("{}.{}", quote_segment(first), quote_segment(column)))
        }
    }
}

/// Escape a field expression.
///
/// Rules, in order:
/// 1. contains both `(` and `)` -> unchanged (function call)
/// 2. contains `,` -> unchanged (composite fragment)
/// 3. contains a backtick -> unchanged (already escaped)
/// 4. a trailing ` as <alias>` is split off and re-appended unquoted
/// 5. `column` is quoted whole, `table.column` is quoted per side
///
/// Identifiers with more than one `.`, or more than one ` as `, are rejected.
pub fn escape_field(field: &str) -> OrmResult<String> {
    let field = field.trim();
    if is_passthrough(field) {
        return Ok(field.to_string());
    }

    let (path, alias) = split_alias(field)?;
    let quoted = quote_path(path)?;

    Ok(match alias {
        Some(alias) => format!("{quoted} as {alias}"),
        None => quoted,
    })
}

/// Escape a table reference used by `FROM` or `JOIN`.
///
/// Same rules as [`escape_field`], except the alias is quoted as well:
/// `users as u` -> `` `users` as `u` ``.
pub fn escape_table(table: &str) -> OrmResult<String> {
    let table = table.trim();
    if is_passthrough(table) {
        return Ok(table.to_string());
    }

    let (path, alias) = split_alias(table)?;
    let quoted = quote_path(path)?;

    Ok(match alias {
        Some(alias) => format!("{quoted} as {}", quote_segment(alias)),
        None => quoted,
    })
}

/// Escape a table reference with any alias removed (`INSERT INTO` target).
pub fn escape_table_name(table: &str) -> OrmResult<String> {
    let table = table.trim();
    if is_passthrough(table) {
        return Ok(table.to_string());
    }
    let (path, _) = split_alias(table)?;
    quote_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_simple() {
        assert_eq!(escape_field("name").unwrap(), "`name`");
    }

    #[test]
    fn escape_trims_input() {
        assert_eq!(escape_field("  name ").unwrap(), "`name`");
    }

    #[test]
    fn escape_dotted() {
        assert_eq!(escape_field("users.id").unwrap(), "`users`.`id`");
    }

    #[test]
    fn escape_keeps_alias_unquoted() {
        assert_eq!(escape_field("u.name as author").unwrap(), "`u`.`name` as author");
        assert_eq!(escape_field("name AS n").unwrap(), "`name` as n");
    }

    #[test]
    fn escape_passes_function_calls() {
        assert_eq!(escape_field("COUNT(id)").unwrap(), "COUNT(id)");
        assert_eq!(escape_field("COUNT(p.id) as total").unwrap(), "COUNT(p.id) as total");
    }

    #[test]
    fn escape_passes_composites_and_quoted() {
        assert_eq!(escape_field("a, b").unwrap(), "a, b");
        assert_eq!(escape_field("`u`.`id`").unwrap(), "`u`.`id`");
    }

    #[test]
    fn escape_half_open_paren_is_quoted() {
        assert_eq!(escape_field("weird(").unwrap(), "`weird(`");
    }

    #[test]
    fn escape_star() {
        assert_eq!(escape_field("*").unwrap(), "*");
        assert_eq!(escape_field("u.*").unwrap(), "`u`.*");
    }

    #[test]
    fn escape_rejects_two_dots() {
        assert!(matches!(
            escape_field("db.users.id"),
            Err(OrmError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn escape_rejects_empty() {
        assert!(escape_field("").is_err());
        assert!(escape_field(".id").is_err());
    }

    #[test]
    fn table_alias_is_quoted() {
        assert_eq!(escape_table("users as u").unwrap(), "`users` as `u`");
        assert_eq!(escape_table("users").unwrap(), "`users`");
    }

    #[test]
    fn table_name_drops_alias() {
        assert_eq!(escape_table_name("users as u").unwrap(), "`users`");
        assert_eq!(escape_table_name("users AS u").unwrap(), "`users`");
    }

    #[test]
    fn leading_as_is_not_an_alias() {
        assert_eq!(split_alias("as x").unwrap(), ("as x", None));
    }

    #[test]
    fn escape_rejects_repeated_alias() {
        assert!(matches!(
            escape_field("a as b as c"),
            Err(OrmError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            escape_table("users AS u as x"),
            Err(OrmError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn placeholders_in_quotes_are_not_counted() {
        assert_eq!(count_placeholders("note <> '?' AND id = ?"), 1);
        assert_eq!(count_placeholders("`a?` = ? OR b = \"?\""), 1);
        assert_eq!(count_placeholders("a = ? AND b IN (?, ?)"), 3);
    }
}
