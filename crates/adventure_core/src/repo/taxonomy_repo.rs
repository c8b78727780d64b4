//! Taxonomy repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist activity and country items with their derived slugs.
//! - Load the full taxonomy for URL decoding and chip rendering.
//!
//! # Invariants
//! - The stored `slug` column always equals `slugify(name)`.
//! - Slugs are unique per kind; a duplicate insert reports `DuplicateSlug`.
//! - Items are listed by name (case-insensitive), then id.

use super::{is_unique_violation, parse_uuid, RepoError, RepoResult};
use crate::model::taxonomy::{Taxonomy, TaxonomyItem, TaxonomyItemId, TaxonomyKind};
use log::debug;
use rusqlite::{params, Connection, Row};

/// Repository interface for taxonomy items.
pub trait TaxonomyRepository {
    fn create_item(&self, item: &TaxonomyItem) -> RepoResult<TaxonomyItemId>;
    fn list_items(&self, kind: TaxonomyKind) -> RepoResult<Vec<TaxonomyItem>>;

    /// Loads both collections.
    fn load_taxonomy(&self) -> RepoResult<Taxonomy> {
        let activities = self.list_items(TaxonomyKind::Activity)?;
        let countries = self.list_items(TaxonomyKind::Country)?;
        debug!(
            "event=taxonomy_load module=repo status=ok activities={} countries={}",
            activities.len(),
            countries.len()
        );
        Ok(Taxonomy::new(activities, countries))
    }
}

/// SQLite-backed taxonomy repository.
pub struct SqliteTaxonomyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaxonomyRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaxonomyRepository for SqliteTaxonomyRepository<'_> {
    fn create_item(&self, item: &TaxonomyItem) -> RepoResult<TaxonomyItemId> {
        if item.id.is_nil() {
            return Err(RepoError::InvalidTaxonomyItem(
                "item id must not be nil".to_string(),
            ));
        }
        let slug = item.slug();
        if slug.is_empty() {
            return Err(RepoError::InvalidTaxonomyItem(
                "item name must not be blank".to_string(),
            ));
        }

        let sql = format!(
            "INSERT INTO {} (id, name, emoji, slug) VALUES (?1, ?2, ?3, ?4);",
            table_for(item.kind)
        );
        self.conn
            .execute(
                &sql,
                params![
                    item.id.to_string(),
                    item.name.trim(),
                    item.emoji.as_deref(),
                    slug.as_str()
                ],
            )
            .map_err(|err| {
                if is_unique_violation(&err) {
                    RepoError::DuplicateSlug {
                        kind: item.kind,
                        slug: slug.clone(),
                    }
                } else {
                    RepoError::from(err)
                }
            })?;

        Ok(item.id)
    }

    fn list_items(&self, kind: TaxonomyKind) -> RepoResult<Vec<TaxonomyItem>> {
        let sql = format!(
            "SELECT id, name, emoji, slug FROM {} ORDER BY name COLLATE NOCASE ASC, id ASC;",
            table_for(kind)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row, kind)?);
        }
        Ok(items)
    }
}

fn table_for(kind: TaxonomyKind) -> &'static str {
    match kind {
        TaxonomyKind::Activity => "activities",
        TaxonomyKind::Country => "countries",
    }
}

fn parse_item_row(row: &Row<'_>, kind: TaxonomyKind) -> RepoResult<TaxonomyItem> {
    let table = table_for(kind);
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, &format!("{table}.id"))?;
    let item = TaxonomyItem {
        id,
        name: row.get("name")?,
        emoji: row.get("emoji")?,
        kind,
    };

    let stored_slug: String = row.get("slug")?;
    if stored_slug != item.slug() {
        return Err(RepoError::InvalidData(format!(
            "{table}.slug `{stored_slug}` does not match name `{}`",
            item.name
        )));
    }
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::{SqliteTaxonomyRepository, TaxonomyRepository};
    use crate::db::open_db_in_memory;
    use crate::model::taxonomy::{TaxonomyItem, TaxonomyKind};
    use crate::repo::RepoError;

    #[test]
    fn same_slug_is_allowed_across_kinds_but_not_within() {
        let conn = open_db_in_memory().expect("open in-memory catalog");
        let repo = SqliteTaxonomyRepository::new(&conn);
        repo.create_item(&TaxonomyItem::new(TaxonomyKind::Activity, "Georgia"))
            .expect("insert activity");
        repo.create_item(&TaxonomyItem::new(TaxonomyKind::Country, "Georgia"))
            .expect("same slug as a country is allowed");

        let err = repo
            .create_item(&TaxonomyItem::new(TaxonomyKind::Country, "  georgia "))
            .expect_err("second georgia country must be a duplicate");
        assert!(matches!(
            err,
            RepoError::DuplicateSlug { kind: TaxonomyKind::Country, ref slug } if slug == "georgia"
        ));
    }

    #[test]
    fn blank_names_are_rejected() {
        let conn = open_db_in_memory().expect("open in-memory catalog");
        let repo = SqliteTaxonomyRepository::new(&conn);
        let err = repo
            .create_item(&TaxonomyItem::new(TaxonomyKind::Activity, "   "))
            .expect_err("blank name must be rejected");
        assert!(matches!(err, RepoError::InvalidTaxonomyItem(_)));
    }
}
