//! Join-key normalization.
//!
//! The single correctness-critical invariant of the pipeline: two raw paths
//! naming the same on-disk file, coming from any two sources, must normalize
//! to an identical `JoinKey`. Normalization applies the source's prefix-strip
//! rule and lower-cases the remainder. Separators are left alone; inputs are
//! already-resolved absolute paths from the extraction tools.

use crate::source::PrefixStripRule;
use thiserror::Error;

/// A normalized, case-insensitive file-path join key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JoinKey(String);

impl JoinKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for JoinKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A raw path that cannot serve as a join key. Rows carrying one are
/// excluded from correlation and reported, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unkeyable {
    #[error("empty path")]
    Empty,

    #[error("unexpected absolute prefix on path: {0}")]
    ForeignPrefix(String),
}

/// Normalize a raw extractor path into a join key.
pub fn normalize(raw: &str, rule: PrefixStripRule) -> Result<JoinKey, Unkeyable> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Unkeyable::Empty);
    }

    let stripped = match rule {
        PrefixStripRule::DotSlash => strip_dot_slash(raw)?,
        PrefixStripRule::DriveLetter => strip_drive_letter(raw)?,
        PrefixStripRule::DevicePath => strip_device_path(raw)?,
    };

    if stripped.is_empty() {
        return Err(Unkeyable::Empty);
    }

    Ok(JoinKey(stripped.to_lowercase()))
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/')
}

fn strip_dot_slash(path: &str) -> Result<&str, Unkeyable> {
    let rest = path.strip_prefix(".\\").unwrap_or(path);
    if has_drive_prefix(rest) || rest.starts_with("\\\\") {
        return Err(Unkeyable::ForeignPrefix(path.to_string()));
    }
    Ok(rest)
}

fn strip_drive_letter(path: &str) -> Result<&str, Unkeyable> {
    if has_drive_prefix(path) {
        return Ok(&path[3..]);
    }
    // Bare `X:` without a separator, or a UNC/device path, is not this rule.
    if path.starts_with("\\\\") || path.as_bytes().get(1) == Some(&b':') {
        return Err(Unkeyable::ForeignPrefix(path.to_string()));
    }
    Ok(path)
}

fn strip_device_path(path: &str) -> Result<&str, Unkeyable> {
    if let Some(rest) = path.strip_prefix("\\\\.\\") {
        if has_drive_prefix(rest) {
            return Ok(&rest[3..]);
        }
        return Err(Unkeyable::ForeignPrefix(path.to_string()));
    }
    // A plain drive prefix also shows up when the collector is given a
    // bare partition argument. Anything else absolute is foreign.
    strip_drive_letter(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_source_paths_converge() {
        // The same file as each extractor emits it.
        let mft = normalize("Windows\\System32\\cmd.exe", PrefixStripRule::DotSlash).unwrap();
        let mft_dotted =
            normalize(".\\Windows\\System32\\cmd.exe", PrefixStripRule::DotSlash).unwrap();
        let shim = normalize("C:\\Windows\\System32\\CMD.EXE", PrefixStripRule::DriveLetter).unwrap();
        let amcache =
            normalize("c:\\windows\\system32\\cmd.exe", PrefixStripRule::DriveLetter).unwrap();
        let i30 = normalize(
            "\\\\.\\C:\\Windows\\System32\\cmd.exe",
            PrefixStripRule::DevicePath,
        )
        .unwrap();

        assert_eq!(mft.as_str(), "windows\\system32\\cmd.exe");
        assert_eq!(mft, mft_dotted);
        assert_eq!(mft, shim);
        assert_eq!(mft, amcache);
        assert_eq!(mft, i30);
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let a = normalize("C:\\Foo\\Bar.exe", PrefixStripRule::DriveLetter).unwrap();
        let b = normalize("C:\\Foo\\Bar.exe", PrefixStripRule::DriveLetter).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_path_is_unkeyable() {
        assert_eq!(
            normalize("", PrefixStripRule::DriveLetter),
            Err(Unkeyable::Empty)
        );
        assert_eq!(
            normalize("   ", PrefixStripRule::DotSlash),
            Err(Unkeyable::Empty)
        );
        // Prefix only, nothing left to key on.
        assert_eq!(
            normalize("C:\\", PrefixStripRule::DriveLetter),
            Err(Unkeyable::Empty)
        );
    }

    #[test]
    fn test_foreign_prefix_is_unkeyable_not_sliced() {
        // A UNC path under the drive-letter rule must not be blind-sliced.
        assert!(matches!(
            normalize("\\\\server\\share\\f.exe", PrefixStripRule::DriveLetter),
            Err(Unkeyable::ForeignPrefix(_))
        ));
        // A drive path sneaking into MFT output is wrong-shaped too.
        assert!(matches!(
            normalize("C:\\Windows\\cmd.exe", PrefixStripRule::DotSlash),
            Err(Unkeyable::ForeignPrefix(_))
        ));
        // Bare `X:` with no separator.
        assert!(matches!(
            normalize("C:cmd.exe", PrefixStripRule::DriveLetter),
            Err(Unkeyable::ForeignPrefix(_))
        ));
    }

    #[test]
    fn test_relative_paths_pass_through() {
        let k = normalize("Windows\\Temp\\a.exe", PrefixStripRule::DriveLetter).unwrap();
        assert_eq!(k.as_str(), "windows\\temp\\a.exe");
        let k = normalize("Windows\\Temp\\a.exe", PrefixStripRule::DevicePath).unwrap();
        assert_eq!(k.as_str(), "windows\\temp\\a.exe");
    }
}
