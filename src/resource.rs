//! Sheets and recordings that belong to a song.
//!
//! Resources are found by file name: a file belongs to a song when its name
//! contains the song title and ends with one of the extensions of the
//! resource type.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::{debug, warn};
use walkdir::WalkDir;

use crate::error::OutputWriteError;
use crate::song::SongRecord;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ResourceType {
    /// Music sheets
    #[default]
    Sheet,
    /// Audio recordings
    Media,
}

impl ResourceType {
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ResourceType::Sheet => &[".png", ".pdf"],
            ResourceType::Media => &[".mp3", ".m4a", ".wav"],
        }
    }
}

/// Extensions a search accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Extensions {
    Default(ResourceType),
    Custom(String),
}

impl Extensions {
    /// The default extensions of `kind`, or only `custom` when given.
    ///
    /// A custom extension may be written with or without its leading dot.
    pub fn new(kind: ResourceType, custom: Option<&str>) -> Self {
        match custom {
            Some(ext) if ext.starts_with('.') => Extensions::Custom(ext.to_string()),
            Some(ext) => Extensions::Custom(format!(".{ext}")),
            None => Extensions::Default(kind),
        }
    }

    fn matches(&self, filename: &str) -> bool {
        match self {
            Extensions::Default(kind) => kind.extensions().iter().any(|ext| filename.ends_with(ext)),
            Extensions::Custom(ext) => filename.ends_with(ext.as_str()),
        }
    }
}

/// Whether `filename` is a resource of the song titled `title`.
///
/// Files use `你`/`他` where titles use `祢`/`祂`. A name containing the title
/// in full-width parentheses, such as `恩典之路（赞美之泉）`, belongs to another
/// song.
pub fn matches_resource(title: &str, filename: &str, extensions: &Extensions) -> bool {
    let search_title = title.replace('祢', "你").replace('祂', "他");
    filename.contains(&search_title)
        && !filename.contains(&format!("（{search_title}）"))
        && extensions.matches(filename)
}

/// Resources of a song anywhere below `dir`, sorted by path.
///
/// Symbolic links are not followed. Entries that cannot be read are logged and
/// skipped, so a missing `dir` yields nothing.
pub fn find_resources(song: &SongRecord, dir: &Path, extensions: &Extensions) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Cannot search resources for {} in {}: {}", song.title, dir.display(), err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let is_resource = entry
            .file_name()
            .to_str()
            .map_or(false, |name| matches_resource(&song.title, name, extensions));
        if is_resource {
            debug!("Found resource for {}: {}", song.title, entry.path().display());
            found.push(entry.into_path());
        }
    }

    if found.is_empty() {
        warn!("Resource for {} is not found", song.title);
    }
    found.sort();
    found
}

/// Copy `resources` into `to`, or into `to/<title>/` when `subfolder` is set.
///
/// An existing destination folder is reused. Returns how many files were
/// copied.
pub fn copy_resources(
    song: &SongRecord,
    resources: &[PathBuf],
    to: &Path,
    subfolder: bool,
) -> Result<usize, OutputWriteError> {
    if resources.is_empty() {
        return Ok(0);
    }

    let destination = if subfolder {
        to.join(song.file_stem())
    } else {
        to.to_path_buf()
    };
    fs::create_dir_all(&destination).map_err(|source| OutputWriteError::Io {
        path: destination.clone(),
        source,
    })?;

    for resource in resources {
        let Some(name) = resource.file_name() else {
            continue;
        };
        let target = destination.join(name);
        debug!(
            "Copying song {} from {} to {}",
            song.title,
            resource.display(),
            target.display()
        );
        fs::copy(resource, &target).map_err(|source| OutputWriteError::Io {
            path: target.clone(),
            source,
        })?;
    }

    Ok(resources.len())
}

/// Where resources are collected from and copied to.
#[derive(Clone, Debug)]
pub struct CollectOptions {
    pub library: PathBuf,
    pub destination: PathBuf,
    pub extensions: Extensions,
    pub subfolder: bool,
}

/// Find every song's resources in the library and copy them over, returning
/// the number of files copied.
pub fn collect_resources(
    songs: &[SongRecord],
    options: &CollectOptions,
) -> Result<usize, OutputWriteError> {
    let mut copied = 0;
    for song in songs {
        let resources = find_resources(song, &options.library, &options.extensions);
        copied += copy_resources(song, &resources, &options.destination, options.subfolder)?;
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sheets() -> Extensions {
        Extensions::new(ResourceType::Sheet, None)
    }

    #[test]
    fn matching_follows_file_naming() {
        assert!(matches_resource("恩典", "恩典-1.png", &sheets()));
        assert!(matches_resource("恩典", "恩典.pdf", &sheets()));
        assert!(matches_resource("祢是我的", "你是我的.png", &sheets()));
        assert!(!matches_resource("恩典", "恩典.mp3", &sheets()));
        assert!(!matches_resource("赞美之泉", "恩典之路（赞美之泉）.png", &sheets()));
        assert!(!matches_resource("恩典", "平安.png", &sheets()));
    }

    #[test]
    fn media_and_custom_extensions() {
        let media = Extensions::new(ResourceType::Media, None);
        assert!(matches_resource("恩典", "恩典.mp3", &media));
        assert!(matches_resource("恩典", "恩典 live.m4a", &media));
        assert!(!matches_resource("恩典", "恩典.png", &media));

        let custom = Extensions::new(ResourceType::Sheet, Some("jpg"));
        assert_eq!(custom, Extensions::Custom(".jpg".to_string()));
        assert!(matches_resource("恩典", "恩典.jpg", &custom));
        assert!(!matches_resource("恩典", "恩典.png", &custom));
        assert_eq!(
            Extensions::new(ResourceType::Media, Some(".ogg")),
            Extensions::Custom(".ogg".to_string())
        );
    }

    #[test]
    fn missing_directory_has_no_resources() {
        let dir = TempDir::new().unwrap();
        let found = find_resources(&SongRecord::new("恩典"), &dir.path().join("missing"), &sheets());
        assert!(found.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loops_are_not_followed() {
        let dir = TempDir::new().unwrap();
        let folder = dir.path().join("恩典");
        fs::create_dir_all(folder.join("z")).unwrap();
        fs::create_dir_all(folder.join("a")).unwrap();
        fs::write(folder.join("z/恩典.png"), b"").unwrap();
        std::os::unix::fs::symlink("..", folder.join("a/loop")).unwrap();

        let found = find_resources(&SongRecord::new("恩典"), &folder, &sheets());
        assert_eq!(found, [folder.join("z/恩典.png")]);
    }

    #[test]
    fn copy_into_title_subfolder_reuses_existing_folder() {
        let dir = TempDir::new().unwrap();
        let library = dir.path().join("library");
        fs::create_dir_all(library.join("2020")).unwrap();
        fs::write(library.join("2020/恩典.png"), b"sheet").unwrap();
        fs::write(library.join("恩典.mp3"), b"audio").unwrap();
        let to = dir.path().join("docs/library/sheet");
        fs::create_dir_all(to.join("恩典")).unwrap();

        let options = CollectOptions {
            library,
            destination: to.clone(),
            extensions: sheets(),
            subfolder: true,
        };
        let songs = [SongRecord::new("恩典"), SongRecord::new("Amazing Grace")];
        assert_eq!(collect_resources(&songs, &options).unwrap(), 1);
        assert_eq!(fs::read(to.join("恩典/恩典.png")).unwrap(), b"sheet");
        assert!(!to.join("恩典/恩典.mp3").exists());
        assert!(!to.join("Amazing Grace").exists());
    }

    #[test]
    fn copy_flat_puts_files_directly_in_destination() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("恩典.mp3");
        fs::write(&source, b"audio").unwrap();
        let to = dir.path().join("media");

        let copied = copy_resources(&SongRecord::new("恩典"), &[source], &to, false).unwrap();
        assert_eq!(copied, 1);
        assert_eq!(fs::read(to.join("恩典.mp3")).unwrap(), b"audio");
    }

    #[test]
    fn copy_failure_is_output_write_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let source = dir.path().join("恩典.png");
        fs::write(&source, b"").unwrap();

        let err = copy_resources(&SongRecord::new("恩典"), &[source], &blocker, true).unwrap_err();
        assert!(matches!(err, OutputWriteError::Io { .. }));
    }
}
