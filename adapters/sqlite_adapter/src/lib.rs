use linkscan_core::domain::ExportBundle;
use linkscan_core::ports::{ExportError, LinkExporter};
use linkscan_core::utils::to_iso8601;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

const SCHEMA: &str = r#"
    CREATE TABLE `images` (
        `ID` INTEGER PRIMARY KEY AUTOINCREMENT,
        `Specific_ID` VARCHAR(50),
        `Link` VARCHAR(150) NOT NULL,
        `Link_Type` VARCHAR(50) NOT NULL,
        `Raw_Link` VARCHAR(150) NOT NULL,
        `Date_Posted` DATETIME NOT NULL,
        `User_Posted` VARCHAR(50) NOT NULL,
        `Channel_Posted` VARCHAR(50) NOT NULL,
        `Message_Text` TEXT NOT NULL
    );
    CREATE TABLE `export_meta` (
        `Total` INTEGER NOT NULL,
        `Created` DATETIME NOT NULL,
        `Channels` TEXT NOT NULL
    );
"#;

fn sql_err(e: rusqlite::Error) -> ExportError {
    ExportError::Sqlite(e.to_string())
}

/// SQLite implementation of the LinkExporter trait
pub struct SqliteExporter {
    db_path: PathBuf,
}

impl SqliteExporter {
    /// Creates a new SqliteExporter writing to the given database path
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    fn output_dir(&self) -> &Path {
        match self.db_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    /// Creates the schema and inserts the whole bundle in one transaction
    fn write_database(&self, conn: &mut Connection, bundle: &ExportBundle) -> Result<usize, ExportError> {
        conn.execute_batch(SCHEMA).map_err(sql_err)?;

        let tx = conn.transaction().map_err(sql_err)?;
        let mut saved = 0;
        {
            let mut stmt = tx
                .prepare(
                    r#"
                    INSERT INTO `images` (
                        Specific_ID, Link, Link_Type, Raw_Link, Date_Posted, User_Posted, Channel_Posted, Message_Text
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    "#,
                )
                .map_err(sql_err)?;

            for link in &bundle.links {
                saved += stmt
                    .execute(params![
                        link.specific_id,
                        link.link,
                        link.link_type,
                        link.raw_link,
                        to_iso8601(&link.date),
                        link.user,
                        link.channel,
                        link.message,
                    ])
                    .map_err(sql_err)?;
            }

            let channels = serde_json::to_string(&bundle.channels)?;
            tx.execute(
                "INSERT INTO `export_meta` (Total, Created, Channels) VALUES (?1, ?2, ?3)",
                params![bundle.total as i64, to_iso8601(&bundle.created), channels],
            )
            .map_err(sql_err)?;
        }
        tx.commit().map_err(sql_err)?;

        Ok(saved)
    }
}

impl LinkExporter for SqliteExporter {
    fn export(&self, bundle: &ExportBundle) -> Result<usize, ExportError> {
        // Build the database next to the target and move it into place when
        // complete, so a failed run never leaves a half-written file
        let temp = NamedTempFile::new_in(self.output_dir()).map_err(|source| ExportError::Io {
            path: self.db_path.clone(),
            source,
        })?;

        let mut conn = Connection::open(temp.path()).map_err(sql_err)?;
        let saved = self.write_database(&mut conn, bundle)?;
        conn.close().map_err(|(_, e)| sql_err(e))?;

        temp.persist(&self.db_path).map_err(|e| ExportError::Persist {
            path: self.db_path.clone(),
            source: e.error,
        })?;

        debug!("Inserted {} rows into {}", saved, self.db_path.display());
        Ok(saved)
    }

    fn describe(&self) -> String {
        "an SQLite3 database".to_string()
    }

    fn output_path(&self) -> &Path {
        &self.db_path
    }
}
