//! Map file parsing
//!
//! A map file contains one waypoint per line as five whitespace separated
//! numbers: `x y s dx dy`. Blank lines are ignored.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::Path;

use nalgebra::Vector2;

use super::{TrackError, Waypoint};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Read the waypoints from the map file at the given path.
pub fn load_waypoints<P: AsRef<Path>>(path: P) -> Result<Vec<Waypoint>, TrackError> {
    let map_str = std::fs::read_to_string(path).map_err(TrackError::MapFileError)?;
    parse_waypoints(&map_str)
}

/// Parse waypoints from the contents of a map file.
pub fn parse_waypoints(map_str: &str) -> Result<Vec<Waypoint>, TrackError> {
    let mut waypoints = Vec::new();

    for (i, line) in map_str.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let fields = line
            .split_whitespace()
            .map(|f| f.parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|e| TrackError::MalformedLine {
                line: i + 1,
                reason: e.to_string(),
            })?;

        if fields.len() != 5 {
            return Err(TrackError::MalformedLine {
                line: i + 1,
                reason: format!("expected 5 fields, found {}", fields.len()),
            });
        }

        waypoints.push(Waypoint {
            position_m: Vector2::new(fields[0], fields[1]),
            s_m: fields[2],
            normal: Vector2::new(fields[3], fields[4]),
        });
    }

    Ok(waypoints)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
