//! Filesystem helpers for location files, built on `cap-std` and `camino`.
//!
//! Every helper resolves an ambient directory for the target and then works
//! relative to it, so callers pass plain UTF-8 paths.
#![forbid(unsafe_code)]

use std::io::{self, Read, Write};
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open a UTF-8 file path for reading.
///
/// # Errors
///
/// Propagates the I/O error when the file cannot be opened.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Read a whole file into a string.
///
/// # Errors
///
/// Fails when the file cannot be opened or is not valid UTF-8.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let mut file = open_utf8_file(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Replace the contents of `path` with `contents`.
///
/// Missing parent directories are created. The data is written to a
/// temporary sibling first and renamed over the target, so readers never
/// observe a half-written file.
///
/// # Errors
///
/// Propagates failures to create directories, write or rename.
pub fn write_file(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, file_name) = open_dir_and_file(path)?;
    let staging = format!(".{file_name}.tmp");
    {
        let mut file = dir.create(&staging)?;
        file.write_all(contents)?;
        file.sync_all()?;
    }
    dir.rename(&staging, &dir, &file_name)
}

/// Return whether a path exists and is a regular file.
///
/// # Errors
///
/// Fails when the parent directory cannot be opened.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    match dir.metadata(name.as_str()) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Derive a sibling path by appending `suffix` to the file stem.
///
/// # Examples
/// ```
/// use camino::Utf8Path;
/// use roundtrip_fs::sibling_with_suffix;
///
/// let input = Utf8Path::new("data/capitals.json");
/// assert_eq!(
///     sibling_with_suffix(input, "_with_coords"),
///     Utf8Path::new("data/capitals_with_coords.json"),
/// );
/// ```
#[must_use]
pub fn sibling_with_suffix(path: &Utf8Path, suffix: &str) -> Utf8PathBuf {
    let stem = path.file_stem().unwrap_or("locations");
    let file_name = match path.extension() {
        Some(extension) => format!("{stem}{suffix}.{extension}"),
        None => format!("{stem}{suffix}"),
    };
    path.with_file_name(file_name)
}

/// Resolve the ambient directory holding `path` and return it with the file
/// name.
///
/// # Errors
///
/// Fails when `path` has no file name or its directory cannot be opened.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} should include a file name")))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Ensure the parent directory for `path` exists.
///
/// # Errors
///
/// Propagates failures to open the base directory or create the missing
/// components.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }

    let (base_dir, relative) = base_dir_and_relative(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base_dir.create_dir_all(&relative)
}

/// Split a parent path into an ambient base directory and a relative suffix.
///
/// cap-std refuses absolute paths, so absolute parents are opened at their
/// root (or Windows prefix) and the remainder is returned relative to it.
fn base_dir_and_relative(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();

    let (base, relative) = match std_parent.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix_str = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            let base = Utf8PathBuf::from(prefix_str).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .or_else(|_| std_parent.strip_prefix(prefix.as_os_str()))
                .map_err(|_| io::Error::other("failed to strip prefix from parent path"))?
                .to_path_buf();
            (base, relative)
        }
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .map_err(|_| io::Error::other("failed to strip root from absolute path"))?
                .to_path_buf();
            (base, relative)
        }
        _ => (Utf8PathBuf::from("."), std_parent.to_path_buf()),
    };

    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    let relative = Utf8PathBuf::from_path_buf(relative)
        .map_err(|_| io::Error::other("non-UTF-8 parent path"))?;
    Ok((dir, relative))
}
