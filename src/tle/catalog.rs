//! Multi-record TLE catalog loading.
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use log::{debug, warn};

use crate::error::Error;
use crate::tle::{line_checksum_valid, ElementSet, TleError};

/// One retained catalog record: display name and its raw line pair,
/// kept textual so the full element parse happens per selection.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Display name, blank-trimmed
    pub name: String,
    /// First element line
    pub line1: String,
    /// Second element line
    pub line2: String,
}

impl CatalogEntry {
    /// Parses this entry into a validated [ElementSet]
    pub fn elements(&self) -> Result<ElementSet, TleError> {
        ElementSet::from_lines(&self.name, &self.line1, &self.line2)
    }
}

/// Name to element line pair mapping, loaded wholesale from a plain
/// text resource of repeating (name, line 1, line 2) groups.
/// Iteration follows insertion order; that order carries no semantic
/// weight for the prediction sweep.
#[derive(Default, Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Loads a [Catalog] from a file. A missing or unreadable file is
    /// surfaced as [Error::ResourceUnavailable]: no partial catalog is
    /// assumed usable.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Loads a [Catalog] from any readable text resource.
    ///
    /// Groups are (name, '1 ' line, '2 ' line). Blank lines between
    /// groups are permitted. A group whose follow-up lines do not open
    /// with '1' then '2', or whose lines fail the checksum rule, is
    /// dropped without aborting the load. Duplicate names replace the
    /// earlier entry.
    pub fn from_reader<R: Read>(reader: BufReader<R>) -> Result<Self, Error> {
        let mut entries: Vec<CatalogEntry> = Vec::new();

        let mut lines = reader.lines();

        while let Some(line) = lines.next() {
            let line = line?;
            let name = line.trim_end();

            if name.is_empty() || line.starts_with('1') || line.starts_with('2') {
                continue;
            }

            let Some(line1) = lines.next() else {
                break;
            };
            let line1 = line1?;
            if !line1.starts_with('1') {
                debug!("\"{}\": group skipped (missing line 1)", name);
                continue;
            }

            let Some(line2) = lines.next() else {
                break;
            };
            let line2 = line2?;
            if !line2.starts_with('2') {
                debug!("\"{}\": group skipped (missing line 2)", name);
                continue;
            }

            if !line_checksum_valid(&line1) || !line_checksum_valid(&line2) {
                warn!("\"{}\": dropped (checksum)", name);
                continue;
            }

            let entry = CatalogEntry {
                name: name.to_string(),
                line1,
                line2,
            };

            match entries.iter_mut().find(|e| e.name == entry.name) {
                Some(previous) => *previous = entry,
                None => entries.push(entry),
            }
        }

        Ok(Self { entries })
    }

    /// Returns the [CatalogEntry] going by this display name
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Iterates all retained entries, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// All retained display names, in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Number of retained records
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was retained
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
