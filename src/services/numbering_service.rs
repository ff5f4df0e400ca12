//! Numbering Service - per-screen sequence allocation and code formatting

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, EntityTrait, Statement};

use crate::domain::errors::DomainError;
use crate::models::counter::{self, Entity as Counter};

/// How a counter definition renders its codes.
///
/// Stored as a plain string column on the counter row so the style is an
/// explicit configuration choice instead of being inferred from the prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatStyle {
    /// Master data: `screen_id + separator + padded_sequence`
    MasterData,
    /// Transactional documents:
    /// `prefix + separator + separator + date + separator + padded_sequence`
    Transactional,
}

impl FormatStyle {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "master_data" => Ok(FormatStyle::MasterData),
            "transactional" => Ok(FormatStyle::Transactional),
            other => Err(DomainError::Validation(format!(
                "Unknown format style '{}'",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatStyle::MasterData => "master_data",
            FormatStyle::Transactional => "transactional",
        }
    }
}

/// Allocate the next sequence value for a screen.
///
/// The read-modify-write is a single UPDATE .. RETURNING statement, so two
/// concurrent allocations for the same screen serialize on the row and can
/// never observe the same value. A NULL counter starts from 0.
///
/// Runs on whatever connection or transaction the caller passes; rolling back
/// the enclosing transaction rolls the increment back with it.
pub async fn allocate<C: ConnectionTrait>(conn: &C, screen_id: &str) -> Result<i64, DomainError> {
    let now = chrono::Utc::now().to_rfc3339();

    let stmt = Statement::from_sql_and_values(
        conn.get_database_backend(),
        "UPDATE counters SET sequence_value = COALESCE(sequence_value, 0) + 1, updated_at = ? \
         WHERE screen_id = ? RETURNING sequence_value",
        [now.into(), screen_id.into()],
    );

    let row = conn.query_one(stmt).await?.ok_or(DomainError::NotFound)?;
    let value: i64 = row.try_get("", "sequence_value")?;

    Ok(value)
}

/// Render a sequence value as a formatted code.
///
/// Pure given its inputs. The result is truncated to the first `max_length`
/// characters; since the padded sequence sits at the end of the template, any
/// truncation can clip it, which is reported as a warning because such a
/// configuration can mint colliding codes.
pub fn format_code(
    def: &counter::Model,
    sequence: i64,
    today: NaiveDate,
) -> Result<String, DomainError> {
    let style = FormatStyle::parse(&def.format_style)?;

    let width = def.digit_width.max(0) as usize;
    let padded = format!("{:0width$}", sequence, width = width);

    let code = match style {
        FormatStyle::MasterData => {
            format!("{}{}{}", def.screen_id, def.separator, padded)
        }
        FormatStyle::Transactional => {
            let date = def
                .date_format
                .as_deref()
                .map(|fmt| date_component(fmt, today))
                .unwrap_or_default();
            format!(
                "{}{}{}{}{}{}",
                def.prefix, def.separator, def.separator, date, def.separator, padded
            )
        }
    };

    let max = def.max_length.max(0) as usize;
    if code.chars().count() > max {
        tracing::warn!(
            "Code '{}' for screen {} exceeds max length {}; truncation clips the sequence and can mint colliding codes",
            code,
            def.screen_id,
            def.max_length
        );
        return Ok(code.chars().take(max).collect());
    }

    Ok(code)
}

/// Allocate and format in one call, inside the caller's transaction.
pub async fn next_code<C: ConnectionTrait>(
    conn: &C,
    screen_id: &str,
    today: NaiveDate,
) -> Result<String, DomainError> {
    // 1. Load the counter definition
    let def = Counter::find_by_id(screen_id)
        .one(conn)
        .await?
        .ok_or(DomainError::NotFound)?;

    // 2. Allocate the next sequence value
    let sequence = allocate(conn, screen_id).await?;

    // 3. Render the code
    format_code(&def, sequence, today)
}

/// Apply a `YYYY`/`YY`/`MM`/`DD` token pattern to a date.
///
/// Literal characters pass through unchanged; `%` is escaped so a stray
/// percent in configuration cannot break chrono's formatter.
fn date_component(fmt: &str, today: NaiveDate) -> String {
    let pattern = fmt
        .replace('%', "%%")
        .replace("YYYY", "%Y")
        .replace("YY", "%y")
        .replace("MM", "%m")
        .replace("DD", "%d");
    today.format(&pattern).to_string()
}
