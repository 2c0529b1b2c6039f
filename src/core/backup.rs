use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{confirm, warning};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database at `db_path` to `dest`, zipping it when `compress`
    /// is set. Returns the file that was finally written, or `None` when the
    /// user declined to overwrite an existing one.
    pub fn backup(
        db_path: &str,
        dest: &Path,
        compress: bool,
        force: bool,
    ) -> AppResult<Option<PathBuf>> {
        let src = Path::new(db_path);
        if db_path == ":memory:" || !src.exists() {
            return Err(AppError::Other(format!("Database not found: {db_path}")));
        }

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        if dest.exists() && !force {
            warning(format!("The file '{}' already exists.", dest.display()));
            if !confirm("Overwrite?")? {
                return Ok(None);
            }
        }

        fs::copy(src, dest)?;

        let final_path = if compress {
            let zipped = compress_backup(dest)?;
            if let Err(e) = fs::remove_file(dest) {
                warn!(path = %dest.display(), error = %e, "uncompressed copy left behind");
            }
            zipped
        } else {
            dest.to_path_buf()
        };

        info!(path = %final_path.display(), compress, "backup written");

        // audit trail only; the backup itself already succeeded
        if let Ok(conn) = Connection::open(src) {
            let _ = ttlog(
                &conn,
                "backup",
                &final_path.to_string_lossy(),
                if compress {
                    "Backup created and compressed"
                } else {
                    "Backup created"
                },
            );
        }

        Ok(Some(final_path))
    }
}

fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let entry_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "rsleeptracker.sqlite".to_string());

    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut f = fs::File::open(path)?;
    zip.start_file(entry_name, options)
        .map_err(std::io::Error::other)?;
    std::io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(std::io::Error::other)?;

    Ok(zip_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use crate::db::log::load_log;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rst-backup-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn backup_copies_and_logs() {
        let dir = scratch("plain");
        let db = dir.join("nights.sqlite");
        init_db(&Connection::open(&db).unwrap()).unwrap();

        let dest = dir.join("out/copy.sqlite");
        let written = BackupLogic::backup(db.to_str().unwrap(), &dest, false, false)
            .unwrap()
            .unwrap();
        assert_eq!(written, dest);
        assert!(dest.exists());

        let log = load_log(&Connection::open(&db).unwrap()).unwrap();
        assert!(log.iter().any(|(_, _, op, _, _)| op == "backup"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn compressed_backup_replaces_the_copy_with_a_zip() {
        let dir = scratch("zip");
        let db = dir.join("nights.sqlite");
        init_db(&Connection::open(&db).unwrap()).unwrap();

        let dest = dir.join("copy.sqlite");
        let written = BackupLogic::backup(db.to_str().unwrap(), &dest, true, true)
            .unwrap()
            .unwrap();
        assert_eq!(written.extension().and_then(|e| e.to_str()), Some("zip"));
        assert!(!dest.exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_database_is_an_error() {
        let dest = std::env::temp_dir().join("never-written.sqlite");
        assert!(BackupLogic::backup("/nonexistent/db.sqlite", &dest, false, true).is_err());
        assert!(BackupLogic::backup(":memory:", &dest, false, true).is_err());
    }
}
