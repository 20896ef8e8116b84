//! Load meeting definitions from YAML files, directories or stdin.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use meeting_engine::meeting::STDIN_SOURCE;
use meeting_engine::{Meeting, MeetingRecord};
use tracing::{debug, info};

/// Path argument that means "read one definition from stdin".
pub const STDIN_PATH: &str = "-";

/// Load every meeting reachable from `path`.
///
/// `path` may be a single `.yaml` file, a directory searched recursively for
/// `.yaml` files (visited in sorted order), or `-` for stdin. `today` anchors
/// schedules that have no `start_date`.
pub fn load_meetings(path: &Path, today: NaiveDate) -> Result<Vec<Meeting>> {
    if path.as_os_str() == STDIN_PATH {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        return Ok(vec![parse_meeting(&buf, STDIN_SOURCE, today)?]);
    }

    let files = if path.is_dir() {
        let mut files = Vec::new();
        collect_yaml_files(path, &mut files)?;
        files.sort();
        files
    } else if path.is_file() && is_yaml(path) {
        vec![path.to_path_buf()]
    } else {
        Vec::new()
    };

    if files.is_empty() {
        bail!(
            "No .yaml file, directory containing .yaml files, or YAML data found at {}",
            path.display()
        );
    }

    let meetings = files
        .iter()
        .map(|file| load_file(file, today))
        .collect::<Result<Vec<_>>>()?;
    info!(count = meetings.len(), "loaded meetings");
    Ok(meetings)
}

fn load_file(path: &Path, today: NaiveDate) -> Result<Meeting> {
    debug!(path = %path.display(), "loading meeting definition");
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let source_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_meeting(&text, &source_name, today)
}

/// Parse one YAML meeting definition read from `source_name`.
pub fn parse_meeting(text: &str, source_name: &str, today: NaiveDate) -> Result<Meeting> {
    let record: MeetingRecord = serde_yaml::from_str(text)
        .with_context(|| format!("Failed to parse YAML meeting definition in {}", source_name))?;
    Ok(Meeting::from_record(record, source_name, today)?)
}

fn collect_yaml_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
            .path();
        if path.is_dir() {
            collect_yaml_files(&path, files)?;
        } else if is_yaml(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_yaml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "yaml")
}
