//! Data structures for reporting parsed entries.
//!
//! These types are serializable to JSON for machine-readable output and are also used
//! for human-readable printing in `main`.

use std::path::PathBuf;

use desktop_entries::{
    Sections,
    desktop::{self, DESKTOP_ENTRY},
};
use serde::Serialize;

/// The parse result for a single `.desktop` file.
///
/// Carries the most commonly read `[Desktop Entry]` keys next to the full section map.
#[derive(Debug, Serialize)]
pub struct Finding {
    /// Full path to the `.desktop` file.
    pub desktop_file: PathBuf,

    /// Value of the `Name=` key (if present).
    pub name: Option<String>,

    /// Value of the `Exec=` key (if present).
    pub exec: Option<String>,

    /// Program token extracted from `Exec=`.
    pub program: Option<String>,

    /// Value of the `Type=` key (if present).
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// Whether `Hidden=true` or `NoDisplay=true`.
    pub hidden: bool,

    /// Parse outcome.
    pub status: Status,
}

/// Outcome of parsing a `.desktop` file.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Status {
    /// The file was read; all of its sections.
    Parsed { sections: Sections },

    /// The file could not be read.
    Failed { reason: String },
}

impl Finding {
    /// Summarizes a successfully parsed file.
    pub fn parsed(desktop_file: PathBuf, sections: Sections) -> Self {
        let key = |k: &str| desktop::get(&sections, DESKTOP_ENTRY, k).map(str::to_string);

        let exec = key("Exec");
        let hidden = desktop::parse_bool(desktop::get(&sections, DESKTOP_ENTRY, "Hidden"))
            || desktop::parse_bool(desktop::get(&sections, DESKTOP_ENTRY, "NoDisplay"));

        Self {
            desktop_file,
            name: key("Name"),
            program: exec.as_deref().and_then(desktop::exec_program),
            exec,
            kind: key("Type"),
            hidden,
            status: Status::Parsed { sections },
        }
    }

    /// Records a file that could not be read.
    pub fn failed(desktop_file: PathBuf, reason: String) -> Self {
        Self {
            desktop_file,
            name: None,
            exec: None,
            program: None,
            kind: None,
            hidden: false,
            status: Status::Failed { reason },
        }
    }
}
