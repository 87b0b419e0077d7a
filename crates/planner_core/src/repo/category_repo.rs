//! Category repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `categories` table.
//! - Own the detach-then-delete step that keeps notes alive.
//!
//! # Invariants
//! - Write paths call `Category::validate()` before SQL mutations.
//! - `delete_category` clears `notes.category_uuid` and removes the category in
//!   one transaction; no note row is ever deleted by it.
//! - Listing order is `name ASC` (case-insensitive), then `uuid ASC`.

use crate::model::category::{Category, CategoryId, Rgba};
use crate::repo::note_repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use chrono::{DateTime, Utc};
use log::info;
use rusqlite::{params, Connection, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    background_red,
    background_green,
    background_blue,
    background_alpha,
    text_red,
    text_green,
    text_blue,
    text_alpha,
    created_at
FROM categories";

/// Repository interface for category persistence.
pub trait CategoryRepository {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId>;
    fn update_category(&self, category: &Category) -> RepoResult<()>;
    /// Detaches referencing notes, then deletes the category.
    ///
    /// Returns how many notes were detached.
    fn delete_category(&self, id: CategoryId) -> RepoResult<usize>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId> {
        category.validate()?;

        let [bg_red, bg_green, bg_blue, bg_alpha] = category.background.channels();
        let [text_red, text_green, text_blue, text_alpha] = category.text.channels();
        self.conn.execute(
            "INSERT INTO categories (
                uuid,
                name,
                background_red,
                background_green,
                background_blue,
                background_alpha,
                text_red,
                text_green,
                text_blue,
                text_alpha,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                category.id.to_string(),
                category.name.as_str(),
                bg_red,
                bg_green,
                bg_blue,
                bg_alpha,
                text_red,
                text_green,
                text_blue,
                text_alpha,
                category.created_at.map(|at| at.timestamp_millis()),
            ],
        )?;

        Ok(category.id)
    }

    fn update_category(&self, category: &Category) -> RepoResult<()> {
        category.validate()?;

        let [bg_red, bg_green, bg_blue, bg_alpha] = category.background.channels();
        let [text_red, text_green, text_blue, text_alpha] = category.text.channels();
        let changed = self.conn.execute(
            "UPDATE categories
             SET
                name = ?1,
                background_red = ?2,
                background_green = ?3,
                background_blue = ?4,
                background_alpha = ?5,
                text_red = ?6,
                text_green = ?7,
                text_blue = ?8,
                text_alpha = ?9,
                created_at = ?10
             WHERE uuid = ?11;",
            params![
                category.name.as_str(),
                bg_red,
                bg_green,
                bg_blue,
                bg_alpha,
                text_red,
                text_green,
                text_blue,
                text_alpha,
                category.created_at.map(|at| at.timestamp_millis()),
                category.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(category.id));
        }

        Ok(())
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<usize> {
        let id_text = id.to_string();
        let tx = self.conn.unchecked_transaction()?;

        let detached = tx.execute(
            "UPDATE notes SET category_uuid = NULL WHERE category_uuid = ?1;",
            [id_text.as_str()],
        )?;
        let deleted = tx.execute(
            "DELETE FROM categories WHERE uuid = ?1;",
            [id_text.as_str()],
        )?;
        if deleted == 0 {
            // Dropping `tx` rolls the detach back.
            return Err(RepoError::NotFound(id));
        }

        tx.commit()?;
        info!(
            "event=category_delete module=repo status=ok detached_notes={}",
            detached
        );
        Ok(detached)
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }

        Ok(None)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL} ORDER BY name COLLATE NOCASE ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();

        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }

        Ok(categories)
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let id = parse_uuid(&row.get::<_, String>("uuid")?, "categories.uuid")?;

    let created_at = match row.get::<_, Option<i64>>("created_at")? {
        Some(millis) => Some(DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid timestamp `{millis}` in categories.created_at"
            ))
        })?),
        None => None,
    };

    let category = Category {
        id,
        name: row.get("name")?,
        background: Rgba::new(
            row.get("background_red")?,
            row.get("background_green")?,
            row.get("background_blue")?,
            row.get("background_alpha")?,
        ),
        text: Rgba::new(
            row.get("text_red")?,
            row.get("text_green")?,
            row.get("text_blue")?,
            row.get("text_alpha")?,
        ),
        created_at,
    };
    category.validate()?;
    Ok(category)
}
