//! `.desktop` file parsing.
//!
//! A file is turned into a two-level mapping: section header (e.g. `[Desktop Entry]`) to
//! key to raw value. Values are never coerced, unescaped, or split; `Name[fr]` stays a
//! literal key. The helpers at the bottom of this module read typed values out of that
//! mapping without changing it.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use tracing::debug;

use crate::{
    error::{Error, Result},
    fs::{FileSystem, RealFs},
};

/// Header of the main section of every desktop entry.
pub const DESKTOP_ENTRY: &str = "[Desktop Entry]";

/// Keys of one section mapped to their raw values.
pub type Section = BTreeMap<String, String>;

/// Section headers mapped to their key-value pairs.
pub type Sections = BTreeMap<String, Section>;

/// A single `.desktop` file, parsed on first access and cached afterwards.
///
/// The file is read at most once per successful parse. A failed read is not cached, so the
/// next call to [`DesktopFile::entries`] tries again.
#[derive(Debug)]
pub struct DesktopFile<F = RealFs> {
    path: PathBuf,
    fs: F,
    sections: OnceLock<Sections>,
}

impl DesktopFile {
    /// Creates a lazily parsed entry for `path` on the real filesystem.
    ///
    /// Relative paths are made absolute against the current working directory.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_fs(path, RealFs)
    }
}

impl<F: FileSystem> DesktopFile<F> {
    /// Creates a lazily parsed entry for `path` read through `fs`.
    pub fn with_fs(path: impl Into<PathBuf>, fs: F) -> Self {
        let path = path.into();
        // `absolute` only fails for an empty path or a missing working directory; the read
        // will then report the real problem.
        let path = std::path::absolute(&path).unwrap_or(path);

        Self {
            path,
            fs,
            sections: OnceLock::new(),
        }
    }

    /// Absolute path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed sections, reading the file on the first call only.
    ///
    /// # Errors
    /// - [`Error::Read`] if the file is missing, unreadable, or not valid UTF-8.
    pub fn entries(&self) -> Result<&Sections> {
        if let Some(sections) = self.sections.get() {
            return Ok(sections);
        }

        let content = self
            .fs
            .read_to_string(&self.path)
            .map_err(|source| Error::Read {
                path: self.path.clone(),
                source,
            })?;
        let parsed = parse_sections(&content);
        debug!(file = %self.path.display(), sections = parsed.len(), "Parsed desktop file");

        Ok(self.sections.get_or_init(|| parsed))
    }

    /// Raw value of `key` in the section `header`, if both exist.
    ///
    /// # Errors
    /// - [`Error::Read`] as for [`DesktopFile::entries`].
    pub fn get(&self, header: &str, key: &str) -> Result<Option<&str>> {
        Ok(get(self.entries()?, header, key))
    }
}

/// Parse `.desktop` text into sections.
///
/// - A section starts at a line of the form `[...]` (trailing whitespace ignored, no `]`
///   inside). The trimmed line is the section's header.
/// - Inside a section, non-empty lines that do not start with `#` and contain `=` are split
///   on the first `=`; key and value are kept exactly as written. Later keys overwrite.
/// - Lines before the first header are ignored. A header-like line that is not well formed
///   (e.g. `[Broken`) stays part of the current section body.
/// - A repeated header replaces the earlier section entirely.
pub fn parse_sections(content: &str) -> Sections {
    let mut sections = Sections::new();
    let mut current: Option<(String, Section)> = None;

    for line in content.lines() {
        if let Some(header) = section_header(line) {
            if let Some((h, section)) = current.take() {
                sections.insert(h, section);
            }
            current = Some((header.to_string(), Section::new()));
            continue;
        }

        let Some((_, section)) = current.as_mut() else {
            continue;
        };
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            section.insert(k.to_string(), v.to_string());
        }
    }

    if let Some((h, section)) = current {
        sections.insert(h, section);
    }

    sections
}

/// Returns the header if `line` is a well-formed section header.
fn section_header(line: &str) -> Option<&str> {
    let line = line.trim_end();
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    (!inner.contains(']')).then_some(line)
}

/// Raw value of `key` in the section `header` of already parsed `sections`.
pub fn get<'a>(sections: &'a Sections, header: &str, key: &str) -> Option<&'a str> {
    sections
        .get(header)
        .and_then(|s| s.get(key))
        .map(String::as_str)
}

/// Parse a `.desktop` boolean string.
///
/// Accepts common truthy values:
/// - `true`, `1`, `yes` (case-insensitive)
pub fn parse_bool(v: Option<&str>) -> bool {
    matches!(
        v.map(|s| s.trim().to_ascii_lowercase()).as_deref(),
        Some("true") | Some("1") | Some("yes")
    )
}

/// Program token of an `Exec=` value after shell-splitting.
///
/// Handles typical patterns:
/// - `cmd arg1 arg2` → `cmd`
/// - `env VAR=1 VAR2=2 cmd arg` → `cmd`
///
/// Returns `None` if the line cannot be split or holds no plausible program.
pub fn exec_program(exec: &str) -> Option<String> {
    let tokens = shlex::split(exec)?;
    let mut rest = tokens.iter();
    let mut first = rest.next()?;

    // Skip `env` with its options and assignments
    if first == "env" {
        first = rest.find(|t| !t.starts_with('-') && !t.contains('='))?;
    }

    if first.starts_with('%') {
        return None;
    }
    Some(first.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        ffi::OsString,
        io,
        sync::atomic::{AtomicUsize, Ordering},
    };

    const SIMPLE: &str =
        "[Desktop Entry]\nName=Test App\nExec=testapp\n# comment line\nType=Application\n";

    /// Serves a single fixed file and counts reads.
    struct SpyFs {
        content: Option<&'static str>,
        reads: AtomicUsize,
    }

    impl SpyFs {
        fn new(content: Option<&'static str>) -> Self {
            Self {
                content,
                reads: AtomicUsize::new(0),
            }
        }
    }

    impl FileSystem for SpyFs {
        fn list_names(&self, _dir: &Path) -> io::Result<Vec<OsString>> {
            Ok(Vec::new())
        }

        fn read_to_string(&self, _path: &Path) -> io::Result<String> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.content
                .map(str::to_string)
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }
    }

    fn section(pairs: &[(&str, &str)]) -> Section {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_single_section_and_skips_comments() {
        let sections = parse_sections(SIMPLE);

        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[DESKTOP_ENTRY],
            section(&[
                ("Name", "Test App"),
                ("Exec", "testapp"),
                ("Type", "Application")
            ])
        );
    }

    #[test]
    fn keeps_sections_apart() {
        let sections = parse_sections(
            "[Desktop Entry]\nName=Browser\nActions=new-window;\n\n\
             [Desktop Action new-window]\nName=New Window\nExec=browser --new-window\n",
        );

        assert_eq!(sections.len(), 2);
        assert_eq!(
            sections[DESKTOP_ENTRY],
            section(&[("Name", "Browser"), ("Actions", "new-window;")])
        );
        assert_eq!(
            sections["[Desktop Action new-window]"],
            section(&[("Name", "New Window"), ("Exec", "browser --new-window")])
        );
    }

    #[test]
    fn last_duplicate_key_wins() {
        let sections = parse_sections("[Desktop Entry]\nFoo=1\nBar=x\nFoo=2\n");
        assert_eq!(get(&sections, DESKTOP_ENTRY, "Foo"), Some("2"));
        assert_eq!(get(&sections, DESKTOP_ENTRY, "Bar"), Some("x"));
    }

    #[test]
    fn repeated_header_replaces_whole_section() {
        let sections = parse_sections("[Desktop Entry]\nA=1\nB=2\n[Desktop Entry]\nC=3\n");
        assert_eq!(sections[DESKTOP_ENTRY], section(&[("C", "3")]));
    }

    #[test]
    fn values_and_keys_stay_raw() {
        let sections = parse_sections(
            "[Desktop Entry]\nName[fr]=Navigateur\nExec=app --opt=a=b\nKey = spaced \n",
        );
        let entry = &sections[DESKTOP_ENTRY];

        assert_eq!(entry["Name[fr]"], "Navigateur");
        assert_eq!(entry["Exec"], "app --opt=a=b");
        assert_eq!(entry["Key "], " spaced ");
    }

    #[test]
    fn ignores_lines_without_equals_and_text_before_first_header() {
        let sections = parse_sections("Stray=before\n[Desktop Entry]\njust text\nName=A\n");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[DESKTOP_ENTRY], section(&[("Name", "A")]));
    }

    #[test]
    fn recognizes_headers_regardless_of_case() {
        let sections = parse_sections("[Desktop Entry]\nA=1\n[x-vendor data]\nB=2\n");
        assert_eq!(sections["[x-vendor data]"], section(&[("B", "2")]));
        assert_eq!(sections[DESKTOP_ENTRY], section(&[("A", "1")]));
    }

    #[test]
    fn malformed_header_is_absorbed_into_current_section() {
        let sections = parse_sections("[Desktop Entry]\nA=1\n[Broken\nB=2\n[a]b]\n");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[DESKTOP_ENTRY], section(&[("A", "1"), ("B", "2")]));
    }

    #[test]
    fn handles_crlf_and_trailing_header_whitespace() {
        let sections = parse_sections("[Desktop Entry]  \r\nName=A\r\n");
        assert_eq!(sections[DESKTOP_ENTRY], section(&[("Name", "A")]));
    }

    #[test]
    fn entries_are_read_once_and_cached() {
        let spy = SpyFs::new(Some(SIMPLE));
        let file = DesktopFile::with_fs("/apps/test.desktop", &spy);

        let first = file.entries().unwrap() as *const Sections;
        let second = file.entries().unwrap() as *const Sections;

        assert_eq!(first, second);
        assert_eq!(spy.reads.load(Ordering::SeqCst), 1);
        assert_eq!(file.get(DESKTOP_ENTRY, "Exec").unwrap(), Some("testapp"));
        assert_eq!(spy.reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn read_failure_is_reported_and_not_cached() {
        let spy = SpyFs::new(None);
        let file = DesktopFile::with_fs("/apps/missing.desktop", &spy);

        let err = file.entries().unwrap_err();
        assert!(matches!(
            err,
            Error::Read { ref path, .. } if path == Path::new("/apps/missing.desktop")
        ));

        assert!(file.entries().is_err());
        assert_eq!(spy.reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn relative_paths_become_absolute() {
        let file = DesktopFile::with_fs("relative.desktop", SpyFs::new(None));
        assert!(file.path().is_absolute());
        assert!(file.path().ends_with("relative.desktop"));
    }

    #[test]
    fn parse_bool_accepts_common_truthy_values() {
        assert!(parse_bool(Some("true")));
        assert!(parse_bool(Some(" YES ")));
        assert!(parse_bool(Some("1")));
        assert!(!parse_bool(Some("false")));
        assert!(!parse_bool(None));
    }

    #[test]
    fn exec_program_extracts_the_command() {
        assert_eq!(exec_program("firefox %u").as_deref(), Some("firefox"));
        assert_eq!(
            exec_program("env -i FOO=1 BAR=2 \"/opt/My App/run\" --flag").as_deref(),
            Some("/opt/My App/run")
        );
        assert_eq!(exec_program("env FOO=1"), None);
        assert_eq!(exec_program("%F"), None);
        assert_eq!(exec_program(""), None);
        assert_eq!(exec_program("broken \"quote"), None);
    }
}
