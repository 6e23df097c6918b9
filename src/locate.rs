//! Directory discovery for `.desktop` files.
//!
//! This module collects application directories following XDG conventions plus
//! common extras (Flatpak/Snap exports) and any base directory from the XDG search path
//! that has an `applications` subdirectory. From those directories it builds the list of
//! `.desktop` files in priority order: user-local files first, shadowing system copies
//! with the same file name.

// -- std imports
use std::{
    collections::HashSet,
    env,
    ffi::OsString,
    io,
    path::{Path, PathBuf},
    sync::OnceLock,
};

// -- crate imports
use tracing::debug;
use xdg::BaseDirectories;

// -- module imports
use crate::{
    error::{Error, Result},
    fs::{FileSystem, RealFs},
};

/// Name of the subdirectory holding `.desktop` files inside an XDG data directory.
const APPLICATIONS: &str = "applications";

/// File name suffix of desktop entries.
const DESKTOP_SUFFIX: &str = ".desktop";

/// Marker of editor backup files, which are never listed.
const BACKUP_MARKER: char = '~';

/// User-local applications directory, relative to the home directory.
const USER_APPLICATIONS: &str = ".local/share/applications";

/// User-local Flatpak exports, relative to the home directory.
const USER_FLATPAK_APPLICATIONS: &str = ".local/share/flatpak/exports/share/applications";

/// What to do with a directory that exists in the search set but cannot be listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnlistablePolicy {
    /// Treat the directory as absent.
    #[default]
    Skip,
    /// Report [`Error::ListDir`].
    Fail,
}

/// How file names shared between several directories are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Only the preferred (user-local) directory shadows others. A name found in two system
    /// directories is listed twice.
    #[default]
    PreferredOnly,
    /// The first directory providing a name wins; later copies are dropped.
    FirstWins,
}

/// Inputs of the locator.
///
/// Built from the process environment with [`LocatorConfig::from_env`], or by hand in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorConfig {
    /// Home directory of the invoking user.
    pub home: PathBuf,

    /// Base directories searched for an `applications` subdirectory, in priority order
    /// (normally `$XDG_DATA_DIRS`).
    pub data_dirs: Vec<PathBuf>,

    /// Handling of directories that cannot be listed.
    pub unlistable: UnlistablePolicy,

    /// Handling of file names present in several directories.
    pub duplicates: DuplicatePolicy,
}

impl LocatorConfig {
    /// Config for `home` with no extra base directories and default policies.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            data_dirs: Vec::new(),
            unlistable: UnlistablePolicy::default(),
            duplicates: DuplicatePolicy::default(),
        }
    }

    /// Reads `HOME` and `XDG_DATA_DIRS` from the process environment.
    ///
    /// `XDG_DATA_DIRS` falls back to `/usr/local/share:/usr/share` when unset.
    ///
    /// # Errors
    /// - [`Error::NoHome`] if `HOME` is unset or empty.
    pub fn from_env() -> Result<Self> {
        let home = env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .ok_or(Error::NoHome)?;

        Ok(Self::with_env_data_dirs(home))
    }

    /// Config for an explicit `home`, with base directories still read from `XDG_DATA_DIRS`.
    ///
    /// Unlike [`LocatorConfig::from_env`] this never looks at `HOME`.
    pub fn with_env_data_dirs(home: impl Into<PathBuf>) -> Self {
        Self {
            data_dirs: Self::env_data_dirs(),
            ..Self::new(home)
        }
    }

    /// `$XDG_DATA_DIRS`, or `/usr/local/share:/usr/share` when unset.
    pub fn env_data_dirs() -> Vec<PathBuf> {
        BaseDirectories::new().get_data_dirs()
    }

    /// The user-local applications directory, which outranks every other directory.
    pub fn preferred_dir(&self) -> PathBuf {
        self.home.join(USER_APPLICATIONS)
    }

    /// Fixed candidate directories, highest priority first.
    fn seed_dirs(&self) -> Vec<PathBuf> {
        vec![
            self.preferred_dir(),
            PathBuf::from("/usr/local/share/applications"),
            PathBuf::from("/usr/share/applications"),
            self.home.join(USER_FLATPAK_APPLICATIONS),
            PathBuf::from("/var/lib/flatpak/exports/share/applications"),
            PathBuf::from("/var/lib/snapd/desktop/applications"),
        ]
    }
}

/// Locations of the `.desktop` files on this system.
///
/// The directory set is computed on construction; the file list on first use. Both are kept
/// for the lifetime of the value, so later filesystem changes are not picked up.
#[derive(Debug)]
pub struct DesktopFilesLocation<F = RealFs> {
    config: LocatorConfig,
    fs: F,
    dirs: Vec<PathBuf>,
    files: OnceLock<Vec<PathBuf>>,
}

impl DesktopFilesLocation {
    /// Locator over the real filesystem.
    ///
    /// # Errors
    /// - [`Error::ListDir`] if a base directory cannot be listed under
    ///   [`UnlistablePolicy::Fail`].
    pub fn new(config: LocatorConfig) -> Result<Self> {
        Self::with_fs(config, RealFs)
    }
}

impl<F: FileSystem> DesktopFilesLocation<F> {
    /// Locator reading directories through `fs`.
    ///
    /// # Errors
    /// - [`Error::ListDir`] as for [`DesktopFilesLocation::new`].
    pub fn with_fs(config: LocatorConfig, fs: F) -> Result<Self> {
        let dirs = find_desktop_file_dirs(&config, &fs)?;
        debug!(count = dirs.len(), "Collected application dirs: {dirs:#?}");

        Ok(Self {
            config,
            fs,
            dirs,
            files: OnceLock::new(),
        })
    }

    /// Configuration the locator was built with.
    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Every directory that may contain `.desktop` files, highest priority first, without
    /// duplicates.
    pub fn directories(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Every `.desktop` file in priority order.
    ///
    /// Files of the preferred directory come first, in listing order, and hide same-named
    /// files elsewhere. Backup files (`~` in the name) and other suffixes are left out.
    ///
    /// # Errors
    /// - [`Error::ListDir`] if a directory exists but cannot be listed under
    ///   [`UnlistablePolicy::Fail`]. The failure is not cached.
    pub fn files(&self) -> Result<&[PathBuf]> {
        if let Some(files) = self.files.get() {
            return Ok(files);
        }

        let files = self.files_by_priority()?;
        debug!(count = files.len(), "Collected desktop files");
        Ok(self.files.get_or_init(|| files))
    }

    fn files_by_priority(&self) -> Result<Vec<PathBuf>> {
        let preferred = self.config.preferred_dir();
        let mut out = Vec::new();

        let mut seen: HashSet<String> = HashSet::new();
        if self.dirs.contains(&preferred) {
            for name in self.desktop_names(&preferred)? {
                out.push(preferred.join(&name));
                seen.insert(name);
            }
        }
        let preferred_names = seen.clone();

        for dir in self.dirs.iter().filter(|d| **d != preferred) {
            for name in self.desktop_names(dir)? {
                let shadowed = match self.config.duplicates {
                    DuplicatePolicy::PreferredOnly => preferred_names.contains(&name),
                    DuplicatePolicy::FirstWins => !seen.insert(name.clone()),
                };
                if !shadowed {
                    out.push(dir.join(name));
                }
            }
        }

        Ok(out)
    }

    /// Names of `.desktop` files in `dir`, in listing order. A missing directory is empty.
    fn desktop_names(&self, dir: &Path) -> Result<Vec<String>> {
        let names = match self.fs.list_names(dir) {
            Ok(names) => names,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(dir = %dir.display(), "Skipping missing application dir");
                return Ok(Vec::new());
            }
            Err(e) => {
                return unlistable(dir, e, self.config.unlistable).map(|()| Vec::new());
            }
        };

        Ok(names.into_iter().filter_map(desktop_name).collect())
    }
}

/// Seed directories plus `<base>/applications` for each base directory that has one.
fn find_desktop_file_dirs(config: &LocatorConfig, fs: &impl FileSystem) -> Result<Vec<PathBuf>> {
    let mut dirs = config.seed_dirs();

    for base in &config.data_dirs {
        let names = match fs.list_names(base) {
            Ok(names) => names,
            Err(e) => {
                unlistable(base, e, config.unlistable)?;
                continue;
            }
        };

        if names.iter().any(|n| n == APPLICATIONS) {
            let candidate = base.join(APPLICATIONS);
            if !dirs.contains(&candidate) {
                dirs.push(candidate);
            }
        }
    }

    Ok(dirs)
}

/// Applies `policy` to a listing failure of `dir`.
fn unlistable(dir: &Path, source: io::Error, policy: UnlistablePolicy) -> Result<()> {
    match policy {
        UnlistablePolicy::Skip => {
            debug!(dir = %dir.display(), error = %source, "Skipping unlistable dir");
            Ok(())
        }
        UnlistablePolicy::Fail => Err(Error::ListDir {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Keeps UTF-8 names ending in `.desktop` that are not backups.
fn desktop_name(name: OsString) -> Option<String> {
    let name = name.into_string().ok()?;
    (!name.contains(BACKUP_MARKER) && name.ends_with(DESKTOP_SUFFIX)).then_some(name)
}
