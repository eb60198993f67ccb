use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Builds the log file name for a batch started at `timestamp`
///
/// The suffix has nanosecond resolution, e.g. `mailsweep20261019T142501123456789.txt`.
pub fn log_file_name(prefix: &str, timestamp: DateTime<Local>) -> String {
    format!("{}{}.txt", prefix, timestamp.format("%Y%m%dT%H%M%S%9f"))
}

/// Writes the log artifact of a batch to a fresh file in `directory`
///
/// The file is created exclusively; if a file with the timestamped name
/// already exists a numeric suffix is added instead of overwriting it.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(std::io::Error)` - The file could not be created or written
pub fn write_log(directory: &Path, prefix: &str, contents: &str) -> std::io::Result<PathBuf> {
    let base_name = log_file_name(prefix, Local::now());
    let stem = base_name.trim_end_matches(".txt");

    let mut attempt = 0u32;
    loop {
        let path = if attempt == 0 {
            directory.join(&base_name)
        } else {
            directory.join(format!("{}-{}.txt", stem, attempt))
        };

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(contents.as_bytes())?;
                file.flush()?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists && attempt < 100 => attempt += 1,
            Err(e) => return Err(e),
        }
    }
}
