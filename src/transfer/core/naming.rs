use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix inserted before the extension of every received file
pub const OUTPUT_SUFFIX: &str = "_out";

/// Derive the output name for a received filename.
///
/// `report.txt` becomes `report_out.txt`, `data` becomes `data_out` and
/// `a.b.c` becomes `a.b_out.c`. Any directory part of the name is kept.
/// Two different senders can map onto the same output name.
pub fn output_filename(filename: &Path) -> PathBuf {
    let mut name = OsString::new();
    if let Some(stem) = filename.file_stem() {
        name.push(stem);
    }
    name.push(OUTPUT_SUFFIX);
    if let Some(ext) = filename.extension() {
        name.push(".");
        name.push(ext);
    }

    match filename.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Name to put on the wire for a local file: its final path component.
pub fn wire_filename(path: &Path) -> Option<Vec<u8>> {
    let name = path.file_name()?;
    Some(os_to_bytes(name.to_os_string()))
}

/// Interpret received filename bytes as a path.
#[cfg(unix)]
pub fn path_from_wire(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
pub fn path_from_wire(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(unix)]
fn os_to_bytes(name: OsString) -> Vec<u8> {
    use std::os::unix::ffi::OsStringExt;
    name.into_vec()
}

#[cfg(not(unix))]
fn os_to_bytes(name: OsString) -> Vec<u8> {
    name.to_string_lossy().into_owned().into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn out(name: &str) -> PathBuf {
        output_filename(Path::new(name))
    }

    #[test]
    fn test_output_names() {
        assert_eq!(out("report.txt"), PathBuf::from("report_out.txt"));
        assert_eq!(out("data"), PathBuf::from("data_out"));
        assert_eq!(out("a.b.c"), PathBuf::from("a.b_out.c"));
    }

    #[test]
    fn test_output_name_edge_cases() {
        assert_eq!(out(""), PathBuf::from("_out"));
        assert_eq!(out(".bashrc"), PathBuf::from(".bashrc_out"));
        assert_eq!(out("dir/file.tar"), PathBuf::from("dir/file_out.tar"));
    }

    #[test]
    fn test_wire_filename_takes_last_component() {
        assert_eq!(
            wire_filename(Path::new("/tmp/some/report.txt")).unwrap(),
            b"report.txt"
        );
        assert!(wire_filename(Path::new("/")).is_none());
    }

    #[test]
    fn test_path_from_wire() {
        assert_eq!(path_from_wire(b"notes.md"), PathBuf::from("notes.md"));
    }
}
