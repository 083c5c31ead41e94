//! Factgraph Storage Layer
//!
//! Implements the [`FactStore`] trait on SQLite.
//!
//! # Architecture
//!
//! - One `facts` table with a uniqueness constraint on `(subject, predicate, object)`
//! - Upsert is a single conditional `INSERT ... ON CONFLICT DO UPDATE ... WHERE`
//!   statement, so concurrent writers converge on the highest confidence
//! - Batches run inside one `IMMEDIATE` transaction and roll back as a unit
//! - Feedback and decay are read-modify-write inside an `IMMEDIATE` transaction,
//!   with the arithmetic delegated to [`factgraph_domain::confidence`]
//!
//! # Examples
//!
//! ```no_run
//! use factgraph_store::SqliteStore;
//!
//! let store = SqliteStore::in_memory().unwrap();
//! // Store is now ready for fact operations
//! ```

#![warn(missing_docs)]

use factgraph_domain::confidence::{self, FEEDBACK_LOCK_SCORE};
use factgraph_domain::{
    BatchSummary, Fact, FactId, FactStore, Feedback, Relation, TriplePattern, UpsertOutcome,
    Validation,
};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// How long a writer waits for another connection's lock before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const FACT_COLUMNS: &str =
    "id, subject, predicate, object, confidence, provenance, extracted_at, validation, feedback_score";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error (transport or transaction failure)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of FactStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should open its own
/// `SqliteStore` on the same database file; the conditional upsert and the
/// busy timeout keep concurrent writers consistent.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use factgraph_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("facts.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open a private in-memory store (useful for testing)
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Number of stored facts
    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM facts", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Convert FactId to bytes for storage
    fn fact_id_to_bytes(id: FactId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Convert bytes to FactId
    fn bytes_to_fact_id(bytes: &[u8]) -> Result<FactId, StoreError> {
        if bytes.len() != 16 {
            return Err(StoreError::InvalidData(format!(
                "Expected 16 bytes for FactId, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(bytes);
        Ok(FactId::from_value(u128::from_be_bytes(arr)))
    }

    fn row_to_fact(row: &Row<'_>) -> rusqlite::Result<Fact> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let id = Self::bytes_to_fact_id(&id_bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Blob, Box::new(e))
        })?;

        let validation_str: String = row.get(7)?;
        let validation = Validation::parse(&validation_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                7,
                rusqlite::types::Type::Text,
                Box::new(StoreError::InvalidData(format!(
                    "Unknown validation tag: {}",
                    validation_str
                ))),
            )
        })?;

        let predicate: String = row.get(2)?;

        Ok(Fact {
            id,
            subject: row.get(1)?,
            predicate: Relation::parse(&predicate),
            object: row.get(3)?,
            confidence: row.get(4)?,
            provenance: row.get(5)?,
            extracted_at: row.get::<_, i64>(6)? as u64,
            validation,
            feedback_score: row.get(8)?,
        })
    }

    /// Conditional upsert on any connection (plain or inside a transaction)
    ///
    /// The comparison and the write are one statement. `RETURNING id` yields
    /// the candidate's id on insert, the stored id on update, and no row when
    /// the stored fact wins. A `derived` fact never replaces a `baseline` or
    /// `user` row, whatever its confidence.
    fn upsert_on(conn: &Connection, fact: &Fact) -> Result<UpsertOutcome, StoreError> {
        let id_bytes = Self::fact_id_to_bytes(fact.id);

        let returned: Option<Vec<u8>> = conn
            .query_row(
                "INSERT INTO facts (id, subject, predicate, object, confidence, provenance, extracted_at, validation, feedback_score)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(subject, predicate, object) DO UPDATE SET
                     confidence = excluded.confidence,
                     provenance = excluded.provenance,
                     extracted_at = excluded.extracted_at,
                     validation = excluded.validation,
                     feedback_score = CASE
                         WHEN excluded.validation IN ('baseline', 'user') THEN 0
                         ELSE facts.feedback_score
                     END
                 WHERE excluded.confidence > facts.confidence
                   AND (facts.feedback_score > ?10 OR excluded.validation IN ('baseline', 'user'))
                   AND NOT (facts.validation IN ('baseline', 'user') AND excluded.validation = 'derived')
                 RETURNING id",
                params![
                    &id_bytes,
                    &fact.subject,
                    fact.predicate.as_str(),
                    &fact.object,
                    fact.confidence,
                    &fact.provenance,
                    fact.extracted_at as i64,
                    fact.validation.as_str(),
                    fact.feedback_score,
                    FEEDBACK_LOCK_SCORE,
                ],
                |row| row.get(0),
            )
            .optional()?;

        let outcome = match returned {
            None => UpsertOutcome::Unchanged,
            Some(bytes) if bytes == id_bytes => UpsertOutcome::Inserted,
            Some(_) => UpsertOutcome::Updated,
        };

        tracing::debug!(
            subject = %fact.subject,
            predicate = %fact.predicate,
            object = %fact.object,
            confidence = fact.confidence,
            ?outcome,
            "upsert"
        );

        Ok(outcome)
    }

    fn get_on(conn: &Connection, id: FactId) -> Result<Option<Fact>, StoreError> {
        let id_bytes = Self::fact_id_to_bytes(id);
        let fact = conn
            .query_row(
                &format!("SELECT {} FROM facts WHERE id = ?1", FACT_COLUMNS),
                params![&id_bytes],
                Self::row_to_fact,
            )
            .optional()?;
        Ok(fact)
    }

    /// Read a fact, compute its next state, and write it back under one write lock
    fn modify<F>(&mut self, id: FactId, change: F) -> Result<Option<Fact>, StoreError>
    where
        F: FnOnce(&Fact) -> (f64, i64),
    {
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(mut fact) = Self::get_on(&tx, id)? else {
            return Ok(None);
        };

        let (confidence, feedback_score) = change(&fact);
        tx.execute(
            "UPDATE facts SET confidence = ?2, feedback_score = ?3 WHERE id = ?1",
            params![Self::fact_id_to_bytes(id), confidence, feedback_score],
        )?;
        tx.commit()?;

        fact.confidence = confidence;
        fact.feedback_score = feedback_score;
        Ok(Some(fact))
    }
}

impl FactStore for SqliteStore {
    type Error = StoreError;

    fn upsert(&mut self, fact: Fact) -> Result<UpsertOutcome, Self::Error> {
        Self::upsert_on(&self.conn, &fact)
    }

    fn batch_upsert(&mut self, facts: Vec<Fact>) -> Result<BatchSummary, Self::Error> {
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut summary = BatchSummary::default();

        // Dropping the transaction on an early return rolls the batch back
        for fact in &facts {
            summary.record(Self::upsert_on(&tx, fact)?);
        }

        tx.commit()?;

        tracing::debug!(
            inserted = summary.inserted,
            updated = summary.updated,
            unchanged = summary.unchanged,
            "batch upsert committed"
        );
        Ok(summary)
    }

    fn get_fact(&self, id: FactId) -> Result<Option<Fact>, Self::Error> {
        Self::get_on(&self.conn, id)
    }

    fn query(&self, pattern: &TriplePattern, min_confidence: f64) -> Result<Vec<Fact>, Self::Error> {
        let mut sql = format!("SELECT {} FROM facts WHERE confidence >= ?", FACT_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(min_confidence)];

        if let Some(subject) = &pattern.subject {
            sql.push_str(" AND subject = ?");
            params.push(Box::new(subject.clone()));
        }

        if let Some(predicate) = &pattern.predicate {
            sql.push_str(" AND predicate = ?");
            params.push(Box::new(predicate.as_str().to_string()));
        }

        if let Some(object) = &pattern.object {
            sql.push_str(" AND object = ?");
            params.push(Box::new(object.clone()));
        }

        sql.push_str(" ORDER BY confidence DESC, extracted_at DESC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let facts = stmt
            .query_map(&param_refs[..], Self::row_to_fact)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(facts)
    }

    fn delete(&mut self, id: FactId) -> Result<bool, Self::Error> {
        let removed = self
            .conn
            .execute("DELETE FROM facts WHERE id = ?1", params![Self::fact_id_to_bytes(id)])?;
        Ok(removed > 0)
    }

    fn decay_confidence(&mut self, id: FactId, rate: f64) -> Result<Option<f64>, Self::Error> {
        let fact = self.modify(id, |fact| {
            (confidence::decay(fact.confidence, rate), fact.feedback_score)
        })?;
        Ok(fact.map(|f| f.confidence))
    }

    fn record_feedback(&mut self, id: FactId, feedback: Feedback) -> Result<Option<Fact>, Self::Error> {
        self.modify(id, |fact| {
            let score = fact.feedback_score + feedback.delta();
            (confidence::apply_feedback(fact.confidence, score), score)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fact_id_bytes_round_trip() {
        let id = FactId::new();
        let bytes = SqliteStore::fact_id_to_bytes(id);
        assert_eq!(bytes.len(), 16);
        assert_eq!(SqliteStore::bytes_to_fact_id(&bytes).unwrap(), id);
    }

    #[test]
    fn test_bytes_to_fact_id_rejects_wrong_length() {
        assert!(SqliteStore::bytes_to_fact_id(&[0u8; 4]).is_err());
    }

    #[test]
    fn test_upsert_reports_outcomes() {
        let mut store = SqliteStore::in_memory().unwrap();

        let first = Fact::new("a", Relation::SuppliesTo, "b", 0.6, "doc:1", Validation::Model);
        let weaker = Fact::new("a", Relation::SuppliesTo, "b", 0.4, "doc:2", Validation::Model);
        let stronger = Fact::new("a", Relation::SuppliesTo, "b", 0.8, "doc:3", Validation::Model);

        assert_eq!(store.upsert(first.clone()).unwrap(), UpsertOutcome::Inserted);
        assert_eq!(store.upsert(weaker).unwrap(), UpsertOutcome::Unchanged);
        assert_eq!(store.upsert(stronger).unwrap(), UpsertOutcome::Updated);

        // Identity survives the update
        let stored = store.get_fact(first.id).unwrap().unwrap();
        assert_eq!(stored.confidence, 0.8);
        assert_eq!(stored.provenance, "doc:3");
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_equal_confidence_is_unchanged() {
        let mut store = SqliteStore::in_memory().unwrap();
        let fact = Fact::new("a", Relation::SuppliesTo, "b", 0.6, "doc:1", Validation::Model);
        let same = Fact::new("a", Relation::SuppliesTo, "b", 0.6, "doc:2", Validation::Model);

        store.upsert(fact).unwrap();
        assert_eq!(store.upsert(same).unwrap(), UpsertOutcome::Unchanged);
    }
}
