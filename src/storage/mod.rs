use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use uuid::Uuid;

static UNSAFE_NAME_CHARS: OnceLock<Regex> = OnceLock::new();

fn unsafe_name_chars() -> &'static Regex {
    UNSAFE_NAME_CHARS.get_or_init(|| Regex::new(r"[^A-Za-z0-9_-]").unwrap())
}

/// `Report_<name>_<uuid>.pdf`, with the name reduced to filename-safe characters.
pub fn build_report_filename(name: &str) -> String {
    let safe = unsafe_name_chars().replace_all(name.trim(), "_");
    let safe = if safe.is_empty() { "anonymous".into() } else { safe };
    format!("Report_{}_{}.pdf", safe, Uuid::new_v4().simple())
}

/// Resolves a client-supplied filename inside `folder`, rejecting anything
/// that could escape it.
pub fn resolve_report_path(folder: &Path, filename: &str) -> Option<PathBuf> {
    if filename.is_empty()
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
    {
        return None;
    }
    Some(folder.join(filename))
}

/// Deletes a report file. Returns whether a file was actually removed.
pub fn remove_report_file(path: &Path) -> std::io::Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

pub fn ensure_dirs(pdf_folder: &Path, backup_folder: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(pdf_folder)?;
    std::fs::create_dir_all(backup_folder)?;
    Ok(())
}
