//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Data a command was asked for (page content, ids, links) goes to stdout
//! and is printed even in quiet mode, so it can be piped. Status messages
//! go to stderr and respect the quiet flag. Diagnostics go through
//! `tracing`, not through this module.

use std::fmt::Display;

use crate::remote::PageInfo;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - data only
    Quiet,
    /// Normal mode - data plus status messages
    Normal,
    /// Debug mode - also enables debug logging
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print requested data to stdout (always shown).
pub fn data(message: impl Display) {
    println!("{}", message);
}

/// Print a status message to stderr (respects quiet mode).
pub fn status(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Human-readable byte size.
pub fn format_size(bytes: i64) -> String {
    const UNITS: [&str; 3] = ["KiB", "MiB", "GiB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = "B";
    for next in UNITS {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{:.1} {}", value, unit)
}

/// Format page entries as aligned columns: modified time, size, id.
pub fn format_page_table(entries: &[PageInfo]) -> String {
    let rows: Vec<(String, String, &str)> = entries
        .iter()
        .map(|entry| {
            let modified = entry
                .last_modified
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            let size = entry.size.map(format_size).unwrap_or_else(|| "-".to_string());
            (modified, size, entry.id.as_str())
        })
        .collect();

    let size_width = rows.iter().map(|(_, s, _)| s.len()).max().unwrap_or(0);

    rows.iter()
        .map(|(modified, size, id)| {
            format!("{:<16}  {:>width$}  {}", modified, size, id, width = size_width)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PageId;
    use chrono::{TimeZone, Utc};

    #[test]
    fn verbosity_flags() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn sizes() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MiB");
    }

    #[test]
    fn page_table_aligns_sizes() {
        let entries = vec![
            PageInfo {
                id: PageId::new("a").unwrap(),
                size: Some(12),
                last_modified: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()),
            },
            PageInfo {
                id: PageId::new("ns:b").unwrap(),
                size: Some(2048),
                last_modified: None,
            },
        ];
        let table = format_page_table(&entries);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "2024-03-01 09:30     12 B  a");
        assert_eq!(lines[1], "-                 2.0 KiB  ns:b");
    }
}
