//! Horizon measurement lists.
//!
//! A list is plain text: one point per line as two whitespace-separated
//! angles (azimuth, then altitude or zenith distance), with any further
//! fields ignored. Blank lines and lines starting with `#` are skipped.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use glam::DVec3;
use skyline_math::{AngleUnit, direction_from_azalt};

/// Unit and vertical reference of the two angles on each line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizonListMode {
    #[default]
    AzDegAltDeg,
    AzDegZdDeg,
    AzRadAltRad,
    AzRadZdRad,
    AzGradAltGrad,
    AzGradZdGrad,
}

impl HorizonListMode {
    pub const ALL: [HorizonListMode; 6] = [
        HorizonListMode::AzDegAltDeg,
        HorizonListMode::AzDegZdDeg,
        HorizonListMode::AzRadAltRad,
        HorizonListMode::AzRadZdRad,
        HorizonListMode::AzGradAltGrad,
        HorizonListMode::AzGradZdGrad,
    ];

    /// Name used in landscape descriptions.
    pub fn as_str(self) -> &'static str {
        match self {
            HorizonListMode::AzDegAltDeg => "azDeg_altDeg",
            HorizonListMode::AzDegZdDeg => "azDeg_zdDeg",
            HorizonListMode::AzRadAltRad => "azRad_altRad",
            HorizonListMode::AzRadZdRad => "azRad_zdRad",
            HorizonListMode::AzGradAltGrad => "azGrad_altGrad",
            HorizonListMode::AzGradZdGrad => "azGrad_zdGrad",
        }
    }

    /// Unit both angles are recorded in.
    pub fn unit(self) -> AngleUnit {
        match self {
            HorizonListMode::AzDegAltDeg | HorizonListMode::AzDegZdDeg => AngleUnit::Degrees,
            HorizonListMode::AzRadAltRad | HorizonListMode::AzRadZdRad => AngleUnit::Radians,
            HorizonListMode::AzGradAltGrad | HorizonListMode::AzGradZdGrad => AngleUnit::Gradians,
        }
    }

    /// Whether the second angle is a zenith distance rather than an altitude.
    pub fn uses_zenith_distance(self) -> bool {
        matches!(
            self,
            HorizonListMode::AzDegZdDeg
                | HorizonListMode::AzRadZdRad
                | HorizonListMode::AzGradZdGrad
        )
    }

    /// Parse a mode name, falling back to [`HorizonListMode::AzDegAltDeg`]
    /// with a warning.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            log::warn!("Unknown horizon list mode '{name}', assuming azDeg_altDeg");
            Self::default()
        })
    }

    /// Unit direction for one recorded point.
    pub fn direction(self, azimuth: f64, vertical: f64) -> DVec3 {
        let unit = self.unit();
        let altitude = if self.uses_zenith_distance() {
            unit.quarter_turn() - vertical
        } else {
            vertical
        };
        direction_from_azalt(unit.to_radians(azimuth), unit.to_radians(altitude))
    }
}

impl fmt::Display for HorizonListMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HorizonListMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s.trim())
            .ok_or_else(|| format!("unknown horizon list mode '{s}'"))
    }
}

fn parse_record(line: &str) -> Option<(f64, f64)> {
    let mut fields = line.split_whitespace();
    let azimuth = fields.next()?.parse().ok()?;
    let vertical = fields.next()?.parse().ok()?;
    Some((azimuth, vertical))
}

/// Decode every record of a list. Malformed lines, including lines that
/// are not valid UTF-8, are skipped with a warning; only an I/O error ends
/// the list early.
pub fn decode_reader<R: BufRead>(reader: R, mode: HorizonListMode) -> Vec<DVec3> {
    let mut directions = Vec::new();
    for (index, line) in reader.split(b'\n').enumerate() {
        let bytes = match line {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Horizon list unreadable after line {index}: {e}");
                break;
            }
        };
        let line = String::from_utf8_lossy(&bytes);
        let record = line.trim();
        if record.is_empty() || record.starts_with('#') {
            continue;
        }
        match parse_record(record) {
            Some((azimuth, vertical)) => directions.push(mode.direction(azimuth, vertical)),
            None => log::warn!("Skipping malformed horizon list line {}: '{record}'", index + 1),
        }
    }
    directions
}

pub fn decode_str(text: &str, mode: HorizonListMode) -> Vec<DVec3> {
    decode_reader(text.as_bytes(), mode)
}

/// Decode a list file. A file that cannot be opened yields an empty list.
pub fn decode_file(path: &Path, mode: HorizonListMode) -> Vec<DVec3> {
    match File::open(path) {
        Ok(file) => {
            let directions = decode_reader(BufReader::new(file), mode);
            log::debug!(
                "Read {} horizon points from {}",
                directions.len(),
                path.display()
            );
            directions
        }
        Err(e) => {
            log::warn!("Cannot open horizon list {}: {e}", path.display());
            Vec::new()
        }
    }
}
