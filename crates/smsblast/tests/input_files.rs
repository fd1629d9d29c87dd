use std::fs;

use smsblast::{load_message_body, load_recipients, InputError};

#[test]
fn recipients_are_normalized_deduplicated_and_sorted() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("numbers.txt");
    fs::write(
        &path,
        "+91 98765 43210\n\
         \n\
         +1 415 555 2671\n\
         not-a-number\n\
         +14155552671\n\
         +44 20 7183 8750\n\
         12345\n",
    )?;

    let numbers = load_recipients(&path)?;
    // Formatting variants of the same number collapse, and the list comes
    // back in a stable order regardless of file order.
    assert_eq!(
        numbers,
        vec!["+14155552671", "+442071838750", "+919876543210"]
    );
    Ok(())
}

#[test]
fn surrounding_whitespace_on_lines_is_ignored() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("numbers.txt");
    fs::write(&path, "  +14155552671  \n\t\n")?;

    assert_eq!(load_recipients(&path)?, vec!["+14155552671"]);
    Ok(())
}

#[test]
fn missing_numbers_file_is_its_own_error() {
    let err = load_recipients(std::path::Path::new("/nonexistent/numbers.txt")).unwrap_err();
    assert!(matches!(err, InputError::NotFound { .. }));
}

#[test]
fn a_file_of_junk_yields_no_valid_numbers() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("numbers.txt");
    fs::write(&path, "hello\nworld\n12345\n\n")?;

    let err = load_recipients(&path).unwrap_err();
    assert!(matches!(err, InputError::NoValidNumbers { .. }));
    Ok(())
}

#[test]
fn an_empty_numbers_file_yields_no_valid_numbers() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("numbers.txt");
    fs::write(&path, "")?;

    let err = load_recipients(&path).unwrap_err();
    assert!(matches!(err, InputError::NoValidNumbers { .. }));
    Ok(())
}

#[test]
fn message_body_is_the_first_line_stripped() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("content.txt");
    fs::write(&path, "  Service window tonight 22:00  \nignored second line\n")?;

    assert_eq!(load_message_body(&path)?, "Service window tonight 22:00");
    Ok(())
}

#[test]
fn blank_first_line_means_empty_message() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("content.txt");
    fs::write(&path, "   \nreal text on the second line\n")?;

    let err = load_message_body(&path).unwrap_err();
    assert!(matches!(err, InputError::EmptyMessage { .. }));
    Ok(())
}

#[test]
fn empty_content_file_means_empty_message() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("content.txt");
    fs::write(&path, "")?;

    let err = load_message_body(&path).unwrap_err();
    assert!(matches!(err, InputError::EmptyMessage { .. }));
    Ok(())
}

#[test]
fn missing_content_file_is_its_own_error() {
    let err = load_message_body(std::path::Path::new("/nonexistent/content.txt")).unwrap_err();
    assert!(matches!(err, InputError::NotFound { .. }));
}
