//! INSERT statement rendering.

use crate::error::{Error, Result};
use crate::value::{rows_to_sql, Row};

use super::Destination;

/// Renders `INSERT INTO db.table[ (cols)] VALUES ..`.
pub(crate) fn insert_sql(
    destination: &Destination,
    rows: &[Row],
    fields: &[String],
) -> Result<String> {
    if rows.is_empty() {
        return Err(Error::EmptyInsert);
    }
    if let Some(index) = rows.iter().position(Vec::is_empty) {
        return Err(Error::InvalidArguments(format!("row {index} has no values")));
    }

    let mut sql = format!("INSERT INTO {destination}");

    if !fields.is_empty() {
        sql.push_str(" (");
        sql.push_str(&fields.join(", "));
        sql.push(')');
    }

    sql.push_str(" VALUES ");
    sql.push_str(&rows_to_sql(rows));

    Ok(sql)
}
