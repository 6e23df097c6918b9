//! Locate and parse XDG `.desktop` entries.
//!
//! [`DesktopFilesLocation`] finds the directories that may hold desktop entries and lists
//! the files in them by priority; [`DesktopFile`] parses one of those files into its
//! sections. Neither reads the process environment: build a [`LocatorConfig`] with
//! [`LocatorConfig::from_env`] at the edge of the program and pass it in.

pub mod desktop;
pub mod error;
pub mod fs;
pub mod locate;

pub use desktop::{DesktopFile, Section, Sections};
pub use error::{Error, Result};
pub use fs::{FileSystem, RealFs};
pub use locate::{DesktopFilesLocation, DuplicatePolicy, LocatorConfig, UnlistablePolicy};
