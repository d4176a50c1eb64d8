use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Writes `content` to `path` so that readers see either the previous file or
/// the complete new one, never a partial write.
///
/// The data goes to a temporary sibling first, is synced, and is then renamed
/// over the target. Missing parent directories are created.
pub(crate) fn write(path: &Path, content: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let temp_path = temp_sibling(path);
    let written = write_synced(&temp_path, content).and_then(|()| fs::rename(&temp_path, path));
    if written.is_err() {
        // Best effort; the original error is what matters.
        let _ = fs::remove_file(&temp_path);
        return written;
    }

    #[cfg(unix)]
    {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}

fn write_synced(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(content)?;
    file.sync_all()
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    path.with_file_name(format!(".{name}.tmp.{}", std::process::id()))
}
