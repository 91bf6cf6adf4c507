//! Artifact source catalog.
//!
//! One entry per forensic artifact feeding the correlation: the Master File
//! Table, the ShimCache (AppCompatCache), the Amcache hive, and NTFS $I30
//! index slack. Each source declares the columns the pipeline requires from
//! its extracted CSV and the prefix-strip rule its raw paths need before
//! they can serve as a join key.

use serde::{Deserialize, Serialize};

/// Canonical join-key column name in every projected table.
pub const MERGE_KEY: &str = "merge_key";

/// Path column name shared by all extractor CSVs (lower-cased form).
pub const PATH_COLUMN: &str = "full path with the name";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Mft,
    Shimcache,
    Amcache,
    I30,
}

impl Source {
    /// Fixed join order: MFT ⋈ ShimCache ⋈ Amcache ⋈ I30.
    pub const ALL: [Source; 4] = [Source::Mft, Source::Shimcache, Source::Amcache, Source::I30];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Mft => "mft",
            Source::Shimcache => "shimcache",
            Source::Amcache => "amcache",
            Source::I30 => "i30",
        }
    }

    /// Required columns (lower-cased), path column first. A source CSV
    /// missing any of these is a fatal error. Headers are matched
    /// case-insensitively on read.
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            Source::Mft => &[
                PATH_COLUMN,
                "si<fn",
                "useczeros",
                "created0x10",
                "created0x30",
                "lastmodified0x10",
                "lastmodified0x30",
                "lastrecordchange0x10",
                "lastrecordchange0x30",
            ],
            Source::Shimcache => &[PATH_COLUMN, "lastmodifiedtimeutc"],
            Source::Amcache => &[PATH_COLUMN, "linkdate"],
            Source::I30 => &[PATH_COLUMN, "mtime", "atime", "ctime", "btime", "mftid"],
        }
    }

    /// How this source embeds the volume prefix in its raw paths.
    pub fn strip_rule(&self) -> PrefixStripRule {
        match self {
            // MFTECmd reconstructs paths as `.\Windows\...`
            Source::Mft => PrefixStripRule::DotSlash,
            // `C:\Windows\...`
            Source::Shimcache | Source::Amcache => PrefixStripRule::DriveLetter,
            // Velociraptor OSPath: `\\.\C:\Windows\...`
            Source::I30 => PrefixStripRule::DevicePath,
        }
    }
}

/// Per-source path prefix handling.
///
/// Each rule strips its own marker when present and passes already-relative
/// paths through unchanged. A path carrying a *different* absolute marker is
/// rejected as unkeyable rather than blind-sliced at a fixed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixStripRule {
    /// Strip a leading `.\` (MFT reconstructed paths).
    DotSlash,
    /// Strip a leading `X:\` drive prefix.
    DriveLetter,
    /// Strip a leading `\\.\X:\` device-path prefix (drive-only also accepted).
    DevicePath,
}
