/*!
 * Common test utilities for the nbconv test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use nbconv::Config;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Routes library log output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Sample teaching notebook with markdown, code and metadata
pub fn sample_notebook(title: &str) -> String {
    format!(
        r##"{{
 "cells": [
  {{
   "cell_type": "markdown",
   "id": "intro",
   "metadata": {{}},
   "source": ["# {title}\n", "\n", "Complete the exercise and run the checks."]
  }},
  {{
   "cell_type": "code",
   "execution_count": 1,
   "id": "exercise",
   "metadata": {{"tags": ["exercise"]}},
   "outputs": [],
   "source": ["def shuffle_trials(trials):\n", "    import random\n", "    random.shuffle(trials)\n", "    return trials"]
  }},
  {{
   "cell_type": "code",
   "execution_count": 2,
   "id": "check",
   "metadata": {{}},
   "outputs": [{{"name": "stdout", "output_type": "stream", "text": ["ok\n"]}}],
   "source": "assert sorted(shuffle_trials([3, 1, 2])) == [1, 2, 3]\nprint(\"ok\")"
  }}
 ],
 "metadata": {{
  "kernelspec": {{"display_name": "Python 3", "language": "python", "name": "python3"}}
 }},
 "nbformat": 4,
 "nbformat_minor": 5
}}
"##
    )
}

/// Creates a sample notebook file whose mtime lies in the past
pub fn create_test_notebook(dir: &Path, filename: &str) -> Result<PathBuf> {
    let path = create_test_file(dir, filename, &sample_notebook(filename))?;
    backdate(&path, 60)?;
    Ok(path)
}

/// Moves a file's modification time `secs` seconds into the past
pub fn backdate(path: &Path, secs: u64) -> Result<()> {
    let past = SystemTime::now() - Duration::from_secs(secs);
    fs::File::options().write(true).open(path)?.set_modified(past)?;
    Ok(())
}

/// Modification time of a file
pub fn modified(path: &Path) -> Result<SystemTime> {
    Ok(fs::metadata(path)?.modified()?)
}

/// Test configuration without a progress bar
pub fn test_config(from_format: &str, to_format: &str, workers: usize) -> Config {
    Config {
        from_format: from_format.to_string(),
        to_format: to_format.to_string(),
        workers,
        show_progress: false,
        ..Config::default()
    }
}
