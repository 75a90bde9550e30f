/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use nbconv::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "lesson.ipynb", "{}")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.ipynb"));
}

/// Test that find_files walks subdirectories and matches case-insensitively
#[test]
fn test_find_files_withNestedDirectories_shouldFindAllMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "02_flow_control/loops.ipynb", "{}")?;
    common::create_test_file(root, "05_functions/deep/primes.IPYNB", "{}")?;
    common::create_test_file(root, "05_functions/primes.py", "")?;
    common::create_test_file(root, "README.md", "")?;

    let found: HashSet<PathBuf> = FileManager::find_files(root, "ipynb", &[])?.into_iter().collect();

    let expected: HashSet<PathBuf> = [
        root.join("02_flow_control/loops.ipynb"),
        root.join("05_functions/deep/primes.IPYNB"),
    ]
    .into_iter()
    .collect();
    assert_eq!(found, expected);

    Ok(())
}

/// Test that a leading dot in the extension is accepted
#[test]
fn test_find_files_withDottedExtension_shouldMatch() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "script.py", "")?;

    assert_eq!(FileManager::find_files(temp_dir.path(), ".py", &[])?.len(), 1);

    Ok(())
}

/// Test that excluded directories are not descended into
#[test]
fn test_find_files_withExcludedDirectory_shouldSkipIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "lesson.ipynb", "{}")?;
    common::create_test_file(root, ".ipynb_checkpoints/lesson-checkpoint.ipynb", "{}")?;

    let excluded = vec![".ipynb_checkpoints".to_string()];
    let found = FileManager::find_files(root, "ipynb", &excluded)?;

    assert_eq!(found, vec![root.join("lesson.ipynb")]);

    Ok(())
}

/// Test that an empty directory yields no files and no error
#[test]
fn test_find_files_withEmptyDirectory_shouldReturnEmpty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    assert!(FileManager::find_files(temp_dir.path(), "ipynb", &[])?.is_empty());

    Ok(())
}

/// Test that read_to_string returns file content correctly
#[test]
fn test_read_to_string_withValidFile_shouldReturnContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = "print('Grüße')";
    let test_file = common::create_test_file(temp_dir.path(), "greet.py", content)?;

    assert_eq!(FileManager::read_to_string(&test_file)?, content);

    Ok(())
}

/// Test that write_atomic replaces existing content in one step
#[test]
fn test_write_atomic_withExistingTarget_shouldReplaceContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = common::create_test_file(temp_dir.path(), "lesson.py", "old")?;

    FileManager::write_atomic(&target, "new ✓")?;

    assert_eq!(fs::read_to_string(&target)?, "new ✓");
    assert_eq!(fs::read_dir(temp_dir.path())?.count(), 1);

    Ok(())
}

/// Test that is_up_to_date requires a strictly newer target
#[test]
fn test_is_up_to_date_withOlderSource_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_notebook(temp_dir.path(), "lesson.ipynb")?;
    let target = temp_dir.path().join("lesson.py");

    assert!(!FileManager::is_up_to_date(&source, &target)?);

    fs::write(&target, "")?;
    assert!(FileManager::is_up_to_date(&source, &target)?);

    common::backdate(&target, 120)?;
    assert!(!FileManager::is_up_to_date(&source, &target)?);

    Ok(())
}
