use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use rusqlite::{Connection, params, params_from_iter};

use crate::models::{MenuItem, NewMenuItem};

const MENU_COLUMNS: &str = "id, name, description, price, image, category";

pub struct Database {
    conn: Connection,
}

impl Database {
    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let db = Database { conn };
        db.ensure_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.ensure_schema()?;
        Ok(db)
    }

    /// Create the menu and settings tables if they are missing. Safe to call repeatedly.
    pub fn ensure_schema(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;
        tracing::debug!(version, "checking database schema");

        if version < 1 {
            self.conn
                .execute_batch(
                    "CREATE TABLE IF NOT EXISTS menu (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        name TEXT NOT NULL,
                        description TEXT,
                        price REAL NOT NULL,
                        image TEXT,
                        category TEXT NOT NULL
                    );

                    CREATE INDEX IF NOT EXISTS idx_menu_name ON menu(name);
                    CREATE INDEX IF NOT EXISTS idx_menu_category ON menu(category);

                    CREATE TABLE IF NOT EXISTS user_settings (
                        key TEXT PRIMARY KEY NOT NULL,
                        value TEXT NOT NULL,
                        updated_at TEXT NOT NULL
                    );

                    PRAGMA user_version = 1;",
                )
                .context("Failed to create menu schema")?;
        }

        Ok(())
    }

    // --- Row mapping helpers ---

    fn menu_item_from_row(row: &rusqlite::Row) -> rusqlite::Result<MenuItem> {
        Ok(MenuItem {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            price: row.get(3)?,
            image: row.get(4)?,
            category: row.get(5)?,
        })
    }

    // --- Menu ---

    /// Replace the whole menu with `items` in a single transaction.
    ///
    /// Either every row is written or the previous menu is left untouched.
    pub fn replace_all(&self, items: &[NewMenuItem]) -> Result<usize> {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to start menu sync transaction")?;

        tx.execute("DELETE FROM menu", [])
            .context("Failed to clear menu")?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO menu (name, description, price, image, category)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for item in items {
                stmt.execute(params![
                    item.name,
                    item.description,
                    item.price,
                    item.image,
                    item.category,
                ])
                .with_context(|| format!("Failed to insert menu item '{}'", item.name))?;
            }
        }

        tx.commit().context("Failed to commit menu sync")?;
        Ok(items.len())
    }

    pub fn select_all(&self) -> Result<Vec<MenuItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {MENU_COLUMNS} FROM menu ORDER BY name, id"))?;
        let items = stmt
            .query_map([], Self::menu_item_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    pub fn select_distinct_categories(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT category FROM menu ORDER BY category")?;
        let categories = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(categories)
    }

    /// Items in any of `categories` whose name contains `substring`, ignoring case.
    /// An empty category list or empty substring disables that filter.
    pub fn select_filtered(&self, categories: &[String], substring: &str) -> Result<Vec<MenuItem>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if !categories.is_empty() {
            let placeholders = vec!["?"; categories.len()].join(", ");
            clauses.push(format!("category IN ({placeholders})"));
            values.extend(categories.iter().cloned());
        }

        if !substring.is_empty() {
            let escaped = substring
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            clauses.push("name LIKE ? ESCAPE '\\'".to_string());
            values.push(format!("%{escaped}%"));
        }

        let mut sql = format!("SELECT {MENU_COLUMNS} FROM menu");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY name, id");
        tracing::debug!(%sql, ?values, "filtering menu");

        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map(params_from_iter(values.iter()), Self::menu_item_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    pub fn count_menu_items(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM menu", [], |row| row.get(0))
            .context("Failed to count menu items")
    }

    // --- User Settings ---

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let now = Local::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO user_settings (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM user_settings WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    pub fn delete_setting(&self, key: &str) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM user_settings WHERE key = ?1", params![key])?;
        Ok(rows > 0)
    }

    /// Delete several settings at once, returning how many existed.
    pub fn delete_settings(&self, keys: &[&str]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut removed = 0;
        for key in keys {
            removed += tx.execute("DELETE FROM user_settings WHERE key = ?1", params![key])?;
        }
        tx.commit()?;
        Ok(removed)
    }
}
