#![allow(dead_code)]

pub mod databases {
    use rusqlite::Connection;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Two tables with a foreign key between them.
    pub const SHOP_DDL: &str = "
        CREATE TABLE users (
            id INTEGER PRIMARY KEY NOT NULL,
            email VARCHAR(255) NOT NULL,
            age INT NULL
        );
        CREATE TABLE order_items (
            id INTEGER PRIMARY KEY NOT NULL,
            user_id INTEGER NOT NULL REFERENCES users(id),
            unit_price NUMERIC(10,2) NOT NULL,
            note TEXT
        );
    ";

    /// A SQLite database built from `ddl` inside a fresh temporary directory.
    ///
    /// Keep the returned `TempDir` alive for as long as the file is used.
    pub fn sqlite_database(ddl: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(ddl).unwrap();
        (dir, path)
    }

    /// The [`SHOP_DDL`] database.
    pub fn shop_database() -> (TempDir, PathBuf) {
        sqlite_database(SHOP_DDL)
    }
}

pub mod output {
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    /// Every file under `root`, keyed by its path relative to `root`.
    pub fn read_tree(root: &Path) -> BTreeMap<PathBuf, String> {
        let mut files = BTreeMap::new();
        collect(root, root, &mut files);
        files
    }

    fn collect(root: &Path, dir: &Path, files: &mut BTreeMap<PathBuf, String>) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in entries {
            let path = entry.unwrap().path();
            if path.is_dir() {
                collect(root, &path, files);
            } else {
                let relative = path.strip_prefix(root).unwrap().to_path_buf();
                files.insert(relative, std::fs::read_to_string(&path).unwrap());
            }
        }
    }
}
