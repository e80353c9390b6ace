//! SQLite-backed claim ledger

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

use super::{Claim, ClaimStore};
use crate::types::{NotaryError, Result};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS claims (
    id TEXT PRIMARY KEY NOT NULL,
    user_hash TEXT NOT NULL,
    user_name TEXT NOT NULL,
    scheme TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    token_code TEXT NOT NULL UNIQUE,
    is_eligible INTEGER NOT NULL,
    blockchain_hash TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_claims_tx_hash ON claims(blockchain_hash);
"#;

/// Durable claim ledger on a single SQLite connection
pub struct SqliteClaimLedger {
    conn: Mutex<Connection>,
}

impl SqliteClaimLedger {
    /// Open or create the ledger database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        info!("Opening claim ledger at {}", path.display());

        let conn = Connection::open(path)
            .map_err(|e| NotaryError::Ledger(format!("failed to open ledger: {}", e)))?;

        // WAL keeps concurrent token lookups cheap while a claim is being
        // appended
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| NotaryError::Ledger(format!("failed to set PRAGMA: {}", e)))?;

        let ledger = Self {
            conn: Mutex::new(conn),
        };
        ledger.init_schema()?;
        Ok(ledger)
    }

    /// In-memory ledger (for tests)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| NotaryError::Ledger(format!("failed to open in-memory ledger: {}", e)))?;

        let ledger = Self {
            conn: Mutex::new(conn),
        };
        ledger.init_schema()?;
        Ok(ledger)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| NotaryError::Ledger(format!("failed to create schema: {}", e)))?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| NotaryError::Ledger(format!("lock poisoned: {}", e)))
    }

    fn from_row(row: &Row) -> std::result::Result<Claim, rusqlite::Error> {
        let timestamp: String = row.get("timestamp")?;
        let timestamp = DateTime::parse_from_rfc3339(&timestamp)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    4,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;

        Ok(Claim {
            id: row.get("id")?,
            user_hash: row.get("user_hash")?,
            user_name: row.get("user_name")?,
            scheme: row.get("scheme")?,
            timestamp,
            token_code: row.get("token_code")?,
            is_eligible: row.get("is_eligible")?,
            blockchain_hash: row.get("blockchain_hash")?,
        })
    }
}

impl ClaimStore for SqliteClaimLedger {
    fn put(&self, claim: &Claim) -> Result<()> {
        let conn = self.lock()?;

        // Single INSERT: atomic, and the UNIQUE constraint on token_code is
        // the final word on collisions even across processes
        conn.execute(
            "INSERT INTO claims
                (id, user_hash, user_name, scheme, timestamp, token_code, is_eligible, blockchain_hash)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                claim.id,
                claim.user_hash,
                claim.user_name,
                claim.scheme,
                claim.timestamp.to_rfc3339(),
                claim.token_code,
                claim.is_eligible,
                claim.blockchain_hash,
            ],
        )
        .map_err(|e| NotaryError::Ledger(format!("append failed: {}", e)))?;

        Ok(())
    }

    fn get(&self, token_code: &str) -> Result<Option<Claim>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT * FROM claims WHERE token_code = ?1",
            params![token_code],
            Self::from_row,
        )
        .optional()
        .map_err(|e| NotaryError::Ledger(format!("lookup failed: {}", e)))
    }

    fn find_by_tx_hash(&self, hash: &str) -> Result<Option<Claim>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT * FROM claims WHERE blockchain_hash = ?1 LIMIT 1",
            params![hash],
            Self::from_row,
        )
        .optional()
        .map_err(|e| NotaryError::Ledger(format!("lookup failed: {}", e)))
    }

    fn scan(&self) -> Result<Vec<Claim>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT * FROM claims ORDER BY timestamp ASC")
            .map_err(|e| NotaryError::Ledger(format!("prepare failed: {}", e)))?;

        let rows = stmt
            .query_map([], Self::from_row)
            .map_err(|e| NotaryError::Ledger(format!("scan failed: {}", e)))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| NotaryError::Ledger(format!("scan row failed: {}", e)))
    }
}
