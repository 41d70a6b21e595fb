mod models;

pub use models::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};

/// Where the store lives and where corrupted copies are moved aside.
#[derive(Clone, Debug)]
pub struct StoreLayout {
    pub database_path: PathBuf,
    pub backup_folder: PathBuf,
}

/// The `respostas` table, bound to the database file chosen at startup.
#[derive(Clone, Debug)]
pub struct ReportStore {
    pool: SqlitePool,
    path: PathBuf,
    backup: Option<PathBuf>,
}

impl ReportStore {
    /// Opens the store, creating it if absent. An existing file that fails
    /// the integrity probe is backed up and replaced by a fresh database at a
    /// different path; the corrupted file itself is left untouched.
    pub async fn open(layout: &StoreLayout) -> Result<Self, sqlx::Error> {
        let path = layout.database_path.clone();

        if !path.exists() {
            let pool = create_pool(&path).await?;
            run_migrations(&pool).await?;
            tracing::info!("Created report database at {:?}", path);
            return Ok(Self { pool, path, backup: None });
        }

        match open_checked(&path).await {
            Ok(pool) => {
                run_migrations(&pool).await?;
                Ok(Self { pool, path, backup: None })
            }
            Err(e) => {
                tracing::warn!("Database {:?} failed integrity probe: {}", path, e);
                Self::recover(layout).await
            }
        }
    }

    async fn recover(layout: &StoreLayout) -> Result<Self, sqlx::Error> {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let corrupted = &layout.database_path;

        let backup_path = sibling_path(&layout.backup_folder, corrupted, "corrupted", &stamp);
        let backup = match backup_file(corrupted, &backup_path) {
            Ok(()) => {
                tracing::warn!("Backed up corrupted database to {:?}", backup_path);
                Some(backup_path)
            }
            Err(e) => {
                tracing::error!("Could not back up corrupted database {:?}: {}", corrupted, e);
                None
            }
        };

        let parent = corrupted.parent().unwrap_or_else(|| Path::new("."));
        let fresh_path = sibling_path(parent, corrupted, "recovered", &stamp);
        let pool = create_pool(&fresh_path).await?;
        run_migrations(&pool).await?;
        tracing::warn!("Using fresh database at {:?}", fresh_path);

        Ok(Self {
            pool,
            path: fresh_path,
            backup,
        })
    }

    /// Database file in use for the lifetime of this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Backup written during corruption recovery, if any.
    pub fn backup_path(&self) -> Option<&Path> {
        self.backup.as_deref()
    }

    pub async fn insert_report(
        &self,
        submission: &Submission,
        pdf_name: &str,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO respostas (name, role, motivation, performance, objectives, pdf_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&submission.name)
        .bind(&submission.role)
        .bind(&submission.motivation)
        .bind(&submission.performance)
        .bind(&submission.objectives)
        .bind(pdf_name)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Removes the record for `pdf_name`. Zero rows affected is not an error.
    pub async fn delete_report(&self, pdf_name: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM respostas WHERE pdf_name = $1")
            .bind(pdf_name)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn get_report(&self, pdf_name: &str) -> Result<Option<ReportRecord>, sqlx::Error> {
        sqlx::query_as::<_, ReportRecord>("SELECT * FROM respostas WHERE pdf_name = $1")
            .bind(pdf_name)
            .fetch_optional(&self.pool)
            .await
    }

    /// Every record, most recent first.
    pub async fn list_history(&self) -> Result<Vec<HistoryEntry>, sqlx::Error> {
        sqlx::query_as::<_, HistoryEntry>(
            "SELECT name, role, pdf_name FROM respostas ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

async fn create_pool(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

async fn open_checked(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let pool = create_pool(path).await?;
    if let Err(e) = sqlx::query("SELECT name FROM sqlite_master LIMIT 1")
        .fetch_optional(&pool)
        .await
    {
        pool.close().await;
        return Err(e);
    }
    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// `<dir>/<stem>_<tag>_<stamp>.<ext>` for the database at `original`.
fn sibling_path(dir: &Path, original: &Path, tag: &str, stamp: &str) -> PathBuf {
    let stem = original
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("database");
    let ext = original
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("db");
    dir.join(format!("{}_{}_{}.{}", stem, tag, stamp, ext))
}

fn backup_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if let Some(dir) = to.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::copy(from, to)?;
    Ok(())
}
