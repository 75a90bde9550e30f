use anyhow::{Result, Context};
use log::warn;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @generates: Sibling path with the extension replaced
    pub fn sibling_with_extension<P: AsRef<Path>>(path: P, extension: &str) -> PathBuf {
        path.as_ref().with_extension(extension.trim_start_matches('.'))
    }

    /// Find files with a specific extension under a directory.
    ///
    /// Directories named in `exclude_dirs` are not descended into, and
    /// symlinked directories are not followed. Entries that cannot be read
    /// are logged and skipped. The order of the returned paths is unspecified.
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str, exclude_dirs: &[String]) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        let walker = WalkDir::new(dir.as_ref())
            .into_iter()
            .filter_entry(|entry| {
                // The root itself is never excluded
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !exclude_dirs.iter().any(|name| entry.file_name().to_string_lossy() == name.as_str())
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    /// Whether `target` exists and was modified strictly after `source`
    pub fn is_up_to_date<P1: AsRef<Path>, P2: AsRef<Path>>(source: P1, target: P2) -> Result<bool> {
        let target = target.as_ref();
        if !target.exists() {
            return Ok(false);
        }

        let source_modified = fs::metadata(source.as_ref())
            .and_then(|m| m.modified())
            .with_context(|| format!("Failed to read modification time: {:?}", source.as_ref()))?;
        let target_modified = fs::metadata(target)
            .and_then(|m| m.modified())
            .with_context(|| format!("Failed to read modification time: {:?}", target))?;

        Ok(target_modified > source_modified)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file atomically.
    ///
    /// The content goes to a temporary file in the same directory which is
    /// then renamed over `path`. On failure the temporary file is removed and
    /// `path` is left untouched. An existing target keeps its permissions; a
    /// new one gets the same mode a plain create would (0666 minus umask).
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut builder = tempfile::Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Applied at open time, so the process umask still masks it
            builder.permissions(fs::Permissions::from_mode(0o666));
        }

        let mut temp = builder
            .tempfile_in(parent)
            .with_context(|| format!("Failed to create temporary file in {:?}", parent))?;
        if let Ok(existing) = fs::metadata(path) {
            if existing.is_file() {
                temp.as_file()
                    .set_permissions(existing.permissions())
                    .with_context(|| format!("Failed to copy permissions of {:?}", path))?;
            }
        }
        temp.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write temporary file for {:?}", path))?;
        temp.as_file().sync_all()
            .with_context(|| format!("Failed to flush temporary file for {:?}", path))?;
        temp.persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace file: {:?}", path))?;

        Ok(())
    }

    // @returns: File name for log lines
    pub fn display_name<P: AsRef<Path>>(path: P) -> String {
        path.as_ref()
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| path.as_ref().display().to_string())
    }
}
