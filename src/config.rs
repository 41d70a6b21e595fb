use std::path::{Path, PathBuf};

const DEFAULT_PERSISTENT_DATA_DIR: &str = "/app/data";

#[derive(Clone, Debug)]
pub struct Config {
    pub data_dir: PathBuf,
    pub pdf_folder: PathBuf,
    pub database_path: PathBuf,
    pub backup_folder: PathBuf,
    pub persistence: bool,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();

        let persistence = std::env::var("REPORT_PERSISTENCE")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        // Without a store everything lives next to the process, like a plain dev run.
        let data_dir = match std::env::var("DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) if persistence => PathBuf::from(DEFAULT_PERSISTENT_DATA_DIR),
            Err(_) => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };

        let pdf_folder = data_dir.join(
            std::env::var("PDF_FOLDER").unwrap_or_else(|_| "temp_pdfs".to_string()),
        );
        let database_path = data_dir.join(
            std::env::var("DATABASE_FILE").unwrap_or_else(|_| "database.db".to_string()),
        );
        let backup_folder = data_dir.join(
            std::env::var("BACKUP_FOLDER").unwrap_or_else(|_| "backups".to_string()),
        );

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .unwrap_or(5000);

        Ok(Self {
            data_dir,
            pdf_folder,
            database_path,
            backup_folder,
            persistence,
            host,
            port,
        })
    }

    /// Default directory layout rooted at `data_dir`, ignoring the environment.
    pub fn with_data_dir(data_dir: impl AsRef<Path>, persistence: bool) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Self {
            pdf_folder: data_dir.join("temp_pdfs"),
            database_path: data_dir.join("database.db"),
            backup_folder: data_dir.join("backups"),
            data_dir,
            persistence,
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }

    pub fn store_layout(&self) -> crate::db::StoreLayout {
        crate::db::StoreLayout {
            database_path: self.database_path.clone(),
            backup_folder: self.backup_folder.clone(),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
