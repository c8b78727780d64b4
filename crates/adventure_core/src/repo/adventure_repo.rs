//! Adventure repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist adventures together with their activity and attribute links.
//! - Translate a `PredicateSet` into one parameterized SQL query.
//!
//! # Invariants
//! - `create_adventure` calls `Adventure::validate()` and writes all three
//!   tables in one transaction.
//! - SQL filtering agrees with `PredicateSet::matches` for ASCII text.
//! - Results are ordered by title (case-insensitive), then id.
//! - `has_any_filter == false` is resolved by `UnfilteredPolicy`, never by
//!   an implicit "match nothing".

use super::{is_unique_violation, parse_uuid, RepoError, RepoResult};
use crate::model::adventure::{Adventure, AdventureId};
use crate::model::predicate::{
    Predicate, PredicateSet, UnfilteredPolicy, FIELD_ACTIVITY, FIELD_AGE, FIELD_COUNTRY,
    FIELD_DURATION_HOURS, FIELD_LOCATION, FIELD_STRENUOUSNESS, FIELD_TITLE,
};
use log::{debug, info};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeMap;

const ADVENTURE_SELECT_SQL: &str = "SELECT
    id,
    title,
    location,
    country_slug,
    duration_hours,
    recommended_age,
    strenuousness,
    image_url,
    created_by
FROM adventures";

/// Repository interface for the adventure collection.
pub trait AdventureRepository {
    fn create_adventure(&self, adventure: &Adventure) -> RepoResult<AdventureId>;
    fn get_adventure(&self, id: AdventureId) -> RepoResult<Option<Adventure>>;
    fn list_adventures(
        &self,
        predicates: &PredicateSet,
        policy: UnfilteredPolicy,
    ) -> RepoResult<Vec<Adventure>>;
    fn delete_adventure(&self, id: AdventureId) -> RepoResult<()>;
}

/// SQLite-backed adventure repository.
pub struct SqliteAdventureRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAdventureRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn hydrate(&self, mut adventure: Adventure) -> RepoResult<Adventure> {
        let id = adventure.id.to_string();

        let mut stmt = self.conn.prepare_cached(
            "SELECT activity_slug FROM adventure_activities
             WHERE adventure_id = ?1
             ORDER BY activity_slug ASC;",
        )?;
        adventure.activity_slugs = stmt
            .query_map([id.as_str()], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare_cached(
            "SELECT key, value FROM adventure_attributes WHERE adventure_id = ?1;",
        )?;
        adventure.attributes = stmt
            .query_map([id.as_str()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(adventure)
    }
}

impl AdventureRepository for SqliteAdventureRepository<'_> {
    fn create_adventure(&self, adventure: &Adventure) -> RepoResult<AdventureId> {
        adventure.validate()?;
        let id = adventure.id.to_string();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO adventures (
                id,
                title,
                location,
                country_slug,
                duration_hours,
                recommended_age,
                strenuousness,
                image_url,
                created_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                id.as_str(),
                adventure.title.as_str(),
                adventure.location.as_str(),
                adventure.country_slug.as_deref(),
                adventure.duration_hours,
                adventure.recommended_age.as_deref(),
                adventure.strenuousness.as_deref(),
                adventure.image_url.as_deref(),
                adventure.created_by.as_deref(),
            ],
        )
        .map_err(|err| {
            if is_unique_violation(&err) {
                RepoError::InvalidData(format!("adventure id already exists: {id}"))
            } else {
                RepoError::from(err)
            }
        })?;

        for slug in &adventure.activity_slugs {
            tx.execute(
                "INSERT OR IGNORE INTO adventure_activities (adventure_id, activity_slug)
                 VALUES (?1, ?2);",
                params![id.as_str(), slug.as_str()],
            )?;
        }
        for (key, value) in &adventure.attributes {
            tx.execute(
                "INSERT INTO adventure_attributes (adventure_id, key, value)
                 VALUES (?1, ?2, ?3);",
                params![id.as_str(), key.as_str(), value.as_str()],
            )?;
        }
        tx.commit()?;

        debug!(
            "event=adventure_create module=repo status=ok activities={} attributes={}",
            adventure.activity_slugs.len(),
            adventure.attributes.len()
        );
        Ok(adventure.id)
    }

    fn get_adventure(&self, id: AdventureId) -> RepoResult<Option<Adventure>> {
        let sql = format!("{ADVENTURE_SELECT_SQL} WHERE id = ?1;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => {
                let adventure = parse_adventure_row(row)?;
                Ok(Some(self.hydrate(adventure)?))
            }
            None => Ok(None),
        }
    }

    fn list_adventures(
        &self,
        predicates: &PredicateSet,
        policy: UnfilteredPolicy,
    ) -> RepoResult<Vec<Adventure>> {
        if !predicates.has_any_filter && policy == UnfilteredPolicy::ReturnNone {
            info!("event=adventure_query module=repo status=skipped reason=unfiltered");
            return Ok(Vec::new());
        }

        let mut sql = format!("{ADVENTURE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        for predicate in &predicates.predicates {
            push_predicate_clause(&mut sql, &mut bind_values, predicate);
        }
        sql.push_str(" ORDER BY title COLLATE NOCASE ASC, id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut base = Vec::new();
        while let Some(row) = rows.next()? {
            base.push(parse_adventure_row(row)?);
        }
        drop(rows);

        let adventures = base
            .into_iter()
            .map(|adventure| self.hydrate(adventure))
            .collect::<RepoResult<Vec<_>>>()?;

        info!(
            "event=adventure_query module=repo status=ok predicates={} results={}",
            predicates.predicates.len(),
            adventures.len()
        );
        Ok(adventures)
    }

    fn delete_adventure(&self, id: AdventureId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM adventures WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

/// Columns that hold single text values and can be filtered directly.
fn text_column(field: &str) -> Option<&'static str> {
    match field {
        FIELD_COUNTRY => Some("country_slug"),
        FIELD_AGE => Some("recommended_age"),
        FIELD_STRENUOUSNESS => Some("strenuousness"),
        FIELD_TITLE => Some("title"),
        FIELD_LOCATION => Some("location"),
        _ => None,
    }
}

fn push_predicate_clause(sql: &mut String, bind_values: &mut Vec<Value>, predicate: &Predicate) {
    match predicate {
        Predicate::Equals { field, value } => {
            if field == FIELD_ACTIVITY {
                sql.push_str(
                    " AND EXISTS (
                        SELECT 1 FROM adventure_activities aa
                        WHERE aa.adventure_id = adventures.id
                          AND aa.activity_slug = ?
                    )",
                );
                bind_values.push(Value::Text(value.clone()));
            } else if let Some(column) = text_column(field) {
                sql.push_str(&format!(" AND {column} = ?"));
                bind_values.push(Value::Text(value.clone()));
            } else {
                sql.push_str(
                    " AND EXISTS (
                        SELECT 1 FROM adventure_attributes attr
                        WHERE attr.adventure_id = adventures.id
                          AND attr.key = ?
                          AND attr.value = ?
                    )",
                );
                bind_values.push(Value::Text(field.clone()));
                bind_values.push(Value::Text(value.clone()));
            }
        }
        Predicate::Range { field, min, max } => {
            if field != FIELD_DURATION_HOURS {
                // No other numeric column exists; mirror in-memory "missing never matches".
                sql.push_str(" AND 0");
                return;
            }
            sql.push_str(" AND duration_hours IS NOT NULL");
            if let Some(min) = min {
                sql.push_str(" AND duration_hours >= ?");
                bind_values.push(Value::Integer(*min));
            }
            if let Some(max) = max {
                sql.push_str(" AND duration_hours <= ?");
                bind_values.push(Value::Integer(*max));
            }
        }
        Predicate::Contains { field, value } => {
            let needle = Value::Text(value.to_lowercase());
            if field == FIELD_ACTIVITY {
                sql.push_str(
                    " AND EXISTS (
                        SELECT 1 FROM adventure_activities aa
                        WHERE aa.adventure_id = adventures.id
                          AND instr(lower(aa.activity_slug), ?) > 0
                    )",
                );
                bind_values.push(needle);
            } else if let Some(column) = text_column(field) {
                sql.push_str(&format!(
                    " AND {column} IS NOT NULL AND instr(lower({column}), ?) > 0"
                ));
                bind_values.push(needle);
            } else {
                sql.push_str(
                    " AND EXISTS (
                        SELECT 1 FROM adventure_attributes attr
                        WHERE attr.adventure_id = adventures.id
                          AND attr.key = ?
                          AND instr(lower(attr.value), ?) > 0
                    )",
                );
                bind_values.push(Value::Text(field.clone()));
                bind_values.push(needle);
            }
        }
    }
}

fn parse_adventure_row(row: &Row<'_>) -> RepoResult<Adventure> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, "adventures.id")?;
    let duration_hours: Option<f64> = row.get("duration_hours")?;
    if let Some(hours) = duration_hours {
        if !hours.is_finite() || hours < 0.0 {
            return Err(RepoError::InvalidData(format!(
                "invalid duration_hours `{hours}` for adventure {id}"
            )));
        }
    }

    Ok(Adventure {
        id,
        title: row.get("title")?,
        location: row.get("location")?,
        country_slug: row.get("country_slug")?,
        activity_slugs: Vec::new(),
        duration_hours,
        recommended_age: row.get("recommended_age")?,
        strenuousness: row.get("strenuousness")?,
        image_url: row.get("image_url")?,
        created_by: row.get("created_by")?,
        attributes: BTreeMap::new(),
    })
}
