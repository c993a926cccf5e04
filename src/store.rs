use crate::{ConnectionMode, DatabaseConfig, PageRecord, Result};
use rusqlite::{params, Connection};
use tracing::{debug, info, warn};

// ── Persisted rows ────────────────────────────────────────────────────────────

/// A row as stored in the destination table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: i64,
    pub page_no: u32,
    pub data: String,
    pub image: Option<String>,
}

/// A page whose row could not be written.
#[derive(Debug, Clone)]
pub struct PersistFailure {
    pub page_number: u32,
    pub reason: String,
}

/// Outcome of persisting a batch of page records.
#[derive(Debug, Clone, Default)]
pub struct PersistReport {
    /// Rows successfully stored.
    pub inserted: usize,

    /// Pages that were skipped, in page order.
    pub failures: Vec<PersistFailure>,
}

impl PersistReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn record_failure(&mut self, page_number: u32, reason: String) {
        warn!("Error inserting data for page {page_number}: {reason}");
        self.failures.push(PersistFailure {
            page_number,
            reason,
        });
    }
}

// ── PageStore ─────────────────────────────────────────────────────────────────

/// Schema setup and row inserts for page records.
///
/// The store holds configuration only; connections are opened per operation
/// according to [`DatabaseConfig::connection`].
///
/// ```no_run
/// use pdf2table::{DatabaseConfig, ImagePresence, PageRecord, PageStore};
///
/// let store = PageStore::new(DatabaseConfig::default()).unwrap();
/// store.ensure_schema().unwrap();
///
/// let record = PageRecord::new(0, "Hello".into(), ImagePresence::No);
/// let id = store.insert(&record).unwrap();
/// println!("stored as row {id}");
/// ```
#[derive(Debug, Clone)]
pub struct PageStore {
    config: DatabaseConfig,
}

impl PageStore {
    /// Validates the configuration; does not touch the database.
    pub fn new(config: DatabaseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    // ── Schema ────────────────────────────────────────────────────────────────

    /// Create the destination table if it does not exist. Safe to call any
    /// number of times.
    pub fn ensure_schema(&self) -> Result<()> {
        debug!("Connecting to the database at {}", self.config.path.display());
        let conn = self.connect()?;

        debug!("Executing table creation query");
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id      INTEGER PRIMARY KEY AUTOINCREMENT,
                page_no INTEGER NOT NULL,
                data    TEXT NOT NULL,
                image   VARCHAR(10)
            );",
            self.config.table
        ))?;

        info!("Table '{}' created or already exists", self.config.table);
        Ok(())
    }

    // ── Inserts ───────────────────────────────────────────────────────────────

    /// Insert one record on its own connection and return the new row id.
    pub fn insert(&self, record: &PageRecord) -> Result<i64> {
        let conn = self.connect()?;
        Ok(self.insert_on(&conn, record)?)
    }

    /// Insert every record in order.
    ///
    /// A failed row is logged, recorded in the report and skipped; the
    /// remaining rows are still attempted. `Err` is returned only when a
    /// [`ConnectionMode::Shared`] run cannot open or commit its connection.
    pub fn persist_all(&self, records: &[PageRecord]) -> Result<PersistReport> {
        match self.config.connection {
            ConnectionMode::PerRow => Ok(self.persist_per_row(records)),
            ConnectionMode::Shared => self.persist_shared(records),
        }
    }

    /// Read back every row in insertion order.
    pub fn rows(&self) -> Result<Vec<TableRow>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT id, page_no, data, image FROM {} ORDER BY id",
            self.config.table
        ))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(TableRow {
                    id: row.get(0)?,
                    page_no: row.get(1)?,
                    data: row.get(2)?,
                    image: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    // ── Private ───────────────────────────────────────────────────────────────

    fn connect(&self) -> rusqlite::Result<Connection> {
        Connection::open(&self.config.path)
    }

    fn insert_on(&self, conn: &Connection, record: &PageRecord) -> rusqlite::Result<i64> {
        conn.execute(
            &format!(
                "INSERT INTO {} (page_no, data, image) VALUES (?1, ?2, ?3)",
                self.config.table
            ),
            params![
                record.page_number(),
                record.text(),
                record.image().as_str()
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn persist_per_row(&self, records: &[PageRecord]) -> PersistReport {
        let mut report = PersistReport::default();

        for record in records {
            match self.insert(record) {
                Ok(_) => {
                    info!("Data for page {} inserted successfully", record.page_number());
                    report.inserted += 1;
                }
                Err(e) => report.record_failure(record.page_number(), e.to_string()),
            }
        }

        report
    }

    fn persist_shared(&self, records: &[PageRecord]) -> Result<PersistReport> {
        let mut report = PersistReport::default();
        let mut conn = self.connect()?;
        let mut tx = conn.transaction()?;

        for record in records {
            let savepoint = tx.savepoint()?;
            // Dropping the savepoint without committing rolls back this row only.
            let outcome = match self.insert_on(&savepoint, record) {
                Ok(_) => savepoint.commit(),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(()) => {
                    info!("Data for page {} inserted successfully", record.page_number());
                    report.inserted += 1;
                }
                Err(e) => report.record_failure(record.page_number(), e.to_string()),
            }
        }

        tx.commit()?;
        Ok(report)
    }
}
