/*!
 * Integration tests for single-file conversion
 */

use anyhow::Result;
use std::fs;
use nbconv::notebook::ipynb;
use nbconv::{convert_file, ConversionError, ConversionJob, ConversionOutcome};
use crate::common;

/// Test that a second conversion of an unchanged source is skipped
#[test]
fn test_convert_file_withUnchangedSource_shouldSkipSecondRun() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_notebook(temp_dir.path(), "flow_control.ipynb")?;
    let target = temp_dir.path().join("flow_control.py");
    let job = ConversionJob::new(&source, "ipynb", "py");

    let first = convert_file(&job, false)?;
    assert_eq!(first, ConversionOutcome::Converted { target: target.clone() });
    let written_at = common::modified(&target)?;
    let content = fs::read_to_string(&target)?;

    let second = convert_file(&job, false)?;
    assert_eq!(second, ConversionOutcome::Skipped { target: target.clone() });
    assert_eq!(common::modified(&target)?, written_at);
    assert_eq!(fs::read_to_string(&target)?, content);

    Ok(())
}

/// Test that deleting the target brings it back with the same content
#[test]
fn test_convert_file_withDeletedTarget_shouldRecreateEquivalentContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_notebook(temp_dir.path(), "functions.ipynb")?;
    let target = temp_dir.path().join("functions.py");
    let job = ConversionJob::new(&source, "notebook", "python");

    convert_file(&job, false)?;
    let first_content = fs::read_to_string(&target)?;

    fs::remove_file(&target)?;
    let outcome = convert_file(&job, false)?;

    assert!(matches!(outcome, ConversionOutcome::Converted { .. }));
    assert_eq!(fs::read_to_string(&target)?, first_content);

    Ok(())
}

/// Test that force_overwrite converts even when the target is up to date
#[test]
fn test_convert_file_withForceOverwrite_shouldConvertAgain() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_notebook(temp_dir.path(), "fixtures.ipynb")?;
    let job = ConversionJob::new(&source, "ipynb", "py");

    convert_file(&job, false)?;
    let outcome = convert_file(&job, true)?;

    assert!(matches!(outcome, ConversionOutcome::Converted { .. }));

    Ok(())
}

/// Test that a script converts back to a notebook next to it
#[test]
fn test_convert_file_scriptToNotebook_shouldWriteIpynb() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(
        temp_dir.path(),
        "cli.py",
        "# %% [markdown]\n# Command line interfaces\n\n# %%\nimport argparse\n",
    )?;
    common::backdate(&source, 60)?;

    let outcome = convert_file(&ConversionJob::new(&source, "py", "ipynb"), false)?;
    let target = temp_dir.path().join("cli.ipynb");
    assert_eq!(outcome.target(), target.as_path());

    let doc = ipynb::parse(&fs::read_to_string(&target)?)?;
    assert_eq!(doc.cells.len(), 2);
    assert_eq!(doc.cells[0].source, "Command line interfaces");
    assert_eq!(doc.cells[1].source, "import argparse");

    Ok(())
}

/// Test that an unsupported pair leaves the directory untouched
#[test]
fn test_convert_file_withSameFormats_shouldFailWithoutWriting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "monkey_patching.py", "x = 1\n")?;

    let result = convert_file(&ConversionJob::new(&source, "py", "python"), false);

    assert!(matches!(result, Err(ConversionError::InvalidFormatPair { .. })));
    assert_eq!(fs::read_dir(temp_dir.path())?.count(), 1);
    assert_eq!(fs::read_to_string(&source)?, "x = 1\n");

    Ok(())
}

/// Test that a malformed notebook does not produce a target
#[test]
fn test_convert_file_withMalformedNotebook_shouldNotWriteTarget() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "broken.ipynb", "{\"cells\": [}")?;

    let result = convert_file(&ConversionJob::new(&source, "ipynb", "py"), false);

    assert!(matches!(result, Err(ConversionError::Read { .. })));
    assert!(!temp_dir.path().join("broken.py").exists());

    Ok(())
}

/// Test that non-ASCII content survives the conversion
#[test]
fn test_convert_file_withUnicodeContent_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(
        temp_dir.path(),
        "unicode.py",
        "# %% [markdown]\n# Réaction → 反応 ✓\n\n# %%\nprint(\"naïve\")\n",
    )?;
    common::backdate(&source, 60)?;

    convert_file(&ConversionJob::new(&source, "py", "ipynb"), false)?;
    let doc = ipynb::parse(&fs::read_to_string(temp_dir.path().join("unicode.ipynb"))?)?;

    assert_eq!(doc.cells[0].source, "Réaction → 反応 ✓");
    assert_eq!(doc.cells[1].source, "print(\"naïve\")");

    Ok(())
}

/// Test that an unwritable target yields a write error and leaves no temporary file
#[test]
fn test_convert_file_withDirectoryAtTarget_shouldReportWriteError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_notebook(temp_dir.path(), "blocked.ipynb")?;
    let target = temp_dir.path().join("blocked.py");
    fs::create_dir(&target)?;

    let err = convert_file(&ConversionJob::new(&source, "ipynb", "py"), true).unwrap_err();

    assert!(matches!(err, ConversionError::Write { ref path, .. } if *path == target));
    assert!(target.is_dir());
    let mut names: Vec<String> = fs::read_dir(temp_dir.path())?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().to_string()))
        .collect::<Result<_, _>>()?;
    names.sort();
    assert_eq!(names, vec!["blocked.ipynb".to_string(), "blocked.py".to_string()]);

    Ok(())
}
