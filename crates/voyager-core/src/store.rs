//! SQLite-backed persistent state.
//!
//! One connection per context, single writer. Tables:
//! - `objects(id, type_tag, data)` — immutable encoded values, append-only
//! - `stack(pos, object_id)` — pos is 1..depth, 1 at the bottom
//! - `directories(id, parent_id, name)` — tree rooted at HOME
//! - `variables(id, dir_id, name, object_id)` — `(dir_id, name)` unique
//! - `history(seq, pos, object_id)` / `history_seqs(seq)` — stack snapshots
//! - `meta(key, value)` — current directory, undo pointer, angle mode
//!
//! Transaction bracketing is explicit (`begin`/`commit`/`rollback`);
//! the interpreter opens exactly one outer transaction per evaluation.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::value::Value;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS objects (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        type_tag INTEGER NOT NULL,
        data TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS stack (
        pos INTEGER PRIMARY KEY,
        object_id INTEGER NOT NULL REFERENCES objects(id)
    );
    CREATE TABLE IF NOT EXISTS directories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        parent_id INTEGER REFERENCES directories(id),
        name TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS variables (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        dir_id INTEGER NOT NULL REFERENCES directories(id),
        name TEXT NOT NULL,
        object_id INTEGER NOT NULL REFERENCES objects(id),
        UNIQUE(dir_id, name)
    );
    CREATE TABLE IF NOT EXISTS history (
        seq INTEGER NOT NULL,
        pos INTEGER NOT NULL,
        object_id INTEGER NOT NULL REFERENCES objects(id),
        PRIMARY KEY(seq, pos)
    );
    CREATE TABLE IF NOT EXISTS history_seqs (
        seq INTEGER PRIMARY KEY
    );
    CREATE TABLE IF NOT EXISTS meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
";

/// Persistent store owning the database connection.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the store at `path`, or in memory when `path` is `None`.
    /// Creates the schema and the HOME directory on first open.
    pub fn open(path: Option<&Path>) -> Result<Store> {
        let conn = match path {
            Some(p) => Connection::open(p)?,
            None => Connection::open_in_memory()?,
        };
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        conn.execute_batch(SCHEMA)?;
        let store = Store { conn };
        store.ensure_home()?;
        Ok(store)
    }

    fn ensure_home(&self) -> Result<()> {
        let home: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM directories WHERE parent_id IS NULL AND name='HOME'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        if home.is_none() {
            self.conn.execute(
                "INSERT INTO directories (parent_id, name) VALUES (NULL, 'HOME')",
                [],
            )?;
            let home = self.conn.last_insert_rowid();
            self.set_meta("current_dir", &home.to_string())?;
            self.set_meta("undo_seq", "0")?;
        }
        Ok(())
    }

    fn insert_object(&self, value: &Value) -> Result<i64> {
        let (tag, data) = value.encode();
        self.conn.execute(
            "INSERT INTO objects (type_tag, data) VALUES (?1, ?2)",
            params![tag, data],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    // --- Stack ---

    pub fn push(&mut self, value: &Value) -> Result<()> {
        let object_id = self.insert_object(value)?;
        let depth = self.depth()?;
        self.conn.execute(
            "INSERT INTO stack (pos, object_id) VALUES (?1, ?2)",
            params![depth + 1, object_id],
        )?;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Value> {
        let depth = self.depth()?;
        if depth == 0 {
            return Err(crate::error::EngineError::TooFewArguments);
        }
        let value = self.read_stack_pos(depth)?;
        self.conn
            .execute("DELETE FROM stack WHERE pos = ?1", params![depth])?;
        Ok(value)
    }

    /// Read a stack level without removing it. Level 1 is the top.
    pub fn peek(&self, level: i64) -> Result<Value> {
        let depth = self.depth()?;
        if level < 1 || level > depth {
            return Err(crate::error::EngineError::TooFewArguments);
        }
        self.read_stack_pos(depth - level + 1)
    }

    fn read_stack_pos(&self, pos: i64) -> Result<Value> {
        let (tag, data): (i64, String) = self.conn.query_row(
            "SELECT o.type_tag, o.data FROM stack s \
             JOIN objects o ON s.object_id = o.id WHERE s.pos = ?1",
            params![pos],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Value::decode(tag, &data)
    }

    pub fn depth(&self) -> Result<i64> {
        let d: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM stack", [], |row| row.get(0))?;
        Ok(d)
    }

    pub fn clear_stack(&mut self) -> Result<()> {
        self.conn.execute("DELETE FROM stack", [])?;
        Ok(())
    }

    // --- History ---

    /// Record the current stack under the next sequence number and move
    /// the undo pointer to it. Empty stacks still consume a sequence.
    pub fn snapshot_stack(&mut self) -> Result<i64> {
        let seq = self.history_max_seq()? + 1;
        self.conn
            .execute("INSERT INTO history_seqs (seq) VALUES (?1)", params![seq])?;
        self.conn.execute(
            "INSERT INTO history (seq, pos, object_id) \
             SELECT ?1, pos, object_id FROM stack",
            params![seq],
        )?;
        self.set_undo_seq(seq)?;
        Ok(seq)
    }

    /// Replace the stack with the snapshot at `seq`. Sequence 0 is the
    /// empty birth state. Returns false when the snapshot is unknown.
    pub fn restore_stack(&mut self, seq: i64) -> Result<bool> {
        if seq == 0 {
            self.clear_stack()?;
            self.set_undo_seq(0)?;
            return Ok(true);
        }
        let known: Option<i64> = self
            .conn
            .query_row(
                "SELECT seq FROM history_seqs WHERE seq = ?1",
                params![seq],
                |row| row.get(0),
            )
            .optional()?;
        if known.is_none() {
            return Ok(false);
        }
        self.clear_stack()?;
        self.conn.execute(
            "INSERT INTO stack (pos, object_id) \
             SELECT pos, object_id FROM history WHERE seq = ?1",
            params![seq],
        )?;
        self.set_undo_seq(seq)?;
        Ok(true)
    }

    pub fn history_max_seq(&self) -> Result<i64> {
        let seq: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(seq), 0) FROM history_seqs",
            [],
            |row| row.get(0),
        )?;
        Ok(seq)
    }

    pub fn current_undo_seq(&self) -> Result<i64> {
        Ok(self
            .get_meta("undo_seq")?
            .and_then(|s| s.parse().ok())
            .unwrap_or(0))
    }

    pub fn set_undo_seq(&mut self, seq: i64) -> Result<()> {
        self.set_meta("undo_seq", &seq.to_string())
    }

    // --- Variables ---

    /// Upsert a variable binding under a directory.
    pub fn store_variable(&mut self, dir_id: i64, name: &str, value: &Value) -> Result<()> {
        let object_id = self.insert_object(value)?;
        self.conn.execute(
            "INSERT INTO variables (dir_id, name, object_id) VALUES (?1, ?2, ?3) \
             ON CONFLICT(dir_id, name) DO UPDATE SET object_id = excluded.object_id",
            params![dir_id, name, object_id],
        )?;
        Ok(())
    }

    pub fn recall_variable(&self, dir_id: i64, name: &str) -> Result<Option<Value>> {
        let row: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT o.type_tag, o.data FROM variables v \
                 JOIN objects o ON v.object_id = o.id \
                 WHERE v.dir_id = ?1 AND v.name = ?2",
                params![dir_id, name],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        match row {
            Some((tag, data)) => Ok(Some(Value::decode(tag, &data)?)),
            None => Ok(None),
        }
    }

    pub fn purge_variable(&mut self, dir_id: i64, name: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "DELETE FROM variables WHERE dir_id = ?1 AND name = ?2",
            params![dir_id, name],
        )?;
        Ok(changed > 0)
    }

    pub fn list_variables(&self, dir_id: i64) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM variables WHERE dir_id = ?1 ORDER BY name")?;
        let names = stmt
            .query_map(params![dir_id], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    // --- Directories ---

    pub fn home_dir_id(&self) -> Result<i64> {
        let id: i64 = self.conn.query_row(
            "SELECT id FROM directories WHERE parent_id IS NULL AND name='HOME'",
            [],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    pub fn create_directory(&mut self, parent_id: i64, name: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO directories (parent_id, name) VALUES (?1, ?2)",
            params![parent_id, name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn find_directory(&self, parent_id: i64, name: &str) -> Result<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM directories WHERE parent_id = ?1 AND name = ?2",
                params![parent_id, name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    pub fn current_dir(&self) -> Result<i64> {
        match self.get_meta("current_dir")? {
            Some(s) => s
                .parse()
                .map_err(|_| crate::error::EngineError::Storage("bad current_dir".into())),
            None => self.home_dir_id(),
        }
    }

    pub fn set_current_dir(&mut self, dir_id: i64) -> Result<()> {
        self.set_meta("current_dir", &dir_id.to_string())
    }

    // --- Transactions ---

    pub fn begin(&mut self) -> Result<()> {
        self.conn.execute_batch("BEGIN")?;
        Ok(())
    }

    pub fn commit(&mut self) -> Result<()> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    pub fn rollback(&mut self) -> Result<()> {
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }

    // --- Meta ---

    pub fn get_meta(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Angle mode for the trig commands; RAD unless set otherwise.
    pub fn angle_mode(&self) -> Result<String> {
        Ok(self
            .get_meta("angle_mode")?
            .unwrap_or_else(|| "RAD".to_string()))
    }
}
