//! Basic and legacy snapshot file formats.
//!
//! The basic format is three comma-separated scientific-notation doubles
//! per line, `x,y,a`, with no header on write and tolerance for one on
//! read, grounded in `AnnularCell::save` / `AnnularCell::fillFromFile`. The
//! legacy format is the older revision's whitespace-delimited eight-column
//! layout, `index x y a q1 q2 q3 q4`, grounded in
//! `fillAnnularCellFromFile` / `saveAnnularCellToFile`: only the position
//! and angle are used, the index and order-parameter columns are
//! discarded on read.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use rods_cell::AnnularCell;
use rods_core::Rod;

use crate::error::SnapshotError;

fn split_basic_row(line: &str) -> Option<[f64; 3]> {
    let mut fields = line.split(',').map(|s| s.trim());
    let x: f64 = fields.next()?.parse().ok()?;
    let y: f64 = fields.next()?.parse().ok()?;
    let a: f64 = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some([x, y, a])
}

/// Load a basic 3-column snapshot into `cell`, replacing its ensemble.
///
/// At most `cell.params().num_rods` lines are consulted; any indices
/// beyond the file's rod count are left at the sentinel pose and recorded
/// as missing. A leading line that does not parse as three doubles is
/// treated as an optional header and skipped; any later malformed line is
/// fatal.
pub fn load_snapshot(cell: &mut AnnularCell, path: impl AsRef<Path>) -> Result<usize, SnapshotError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let num_rods = cell.params().num_rods;

    let mut rods = Vec::with_capacity(num_rods);
    for (i, line) in reader.lines().enumerate() {
        if rods.len() >= num_rods {
            break;
        }
        let line = line?;
        match split_basic_row(&line) {
            Some([x, y, a]) => rods.push(Rod::new(x, y, a)),
            None if i == 0 && rods.is_empty() => continue, // tolerate a header row
            None => {
                return Err(SnapshotError::MalformedLine {
                    line: i + 1,
                    content: line,
                })
            }
        }
    }

    let found = rods.len();
    let missing: Vec<usize> = (found..num_rods).collect();
    for idx in &missing {
        rods.push(cell.rod(*idx));
    }
    cell.load_rods(rods, missing);
    Ok(found)
}

/// Write `cell`'s rod ensemble as a basic 3-column snapshot, no header.
pub fn save_snapshot(cell: &AnnularCell, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
    let mut file = File::create(path)?;
    for rod in cell.rods() {
        writeln!(file, "{:e},{:e},{:e}", rod.x, rod.y, rod.angle)?;
    }
    Ok(())
}

fn legacy_tokens(line: &str) -> Vec<&str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Load a legacy 8-column snapshot (`index x y a q1 q2 q3 q4`) into `cell`,
/// reading at most `num_rods_in_file` lines and discarding the index and
/// order-parameter columns. Indices beyond the file's rod count are left
/// at the sentinel pose and recorded as missing, matching
/// `fillAnnularCellFromFile`.
pub fn load_legacy_snapshot(
    cell: &mut AnnularCell,
    path: impl AsRef<Path>,
    num_rods_in_file: usize,
) -> Result<usize, SnapshotError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let num_rods = cell.params().num_rods;
    let to_read = num_rods_in_file.min(num_rods);

    let mut rods = Vec::with_capacity(num_rods);
    for (i, line) in reader.lines().enumerate() {
        if rods.len() >= to_read {
            break;
        }
        let line = line?;
        let tokens = legacy_tokens(&line);
        if tokens.len() < 8 {
            return Err(SnapshotError::MalformedLine {
                line: i + 1,
                content: line,
            });
        }
        let parsed: Result<Vec<f64>, _> = tokens[1..4].iter().map(|t| t.parse::<f64>()).collect();
        match parsed {
            Ok(v) => rods.push(Rod::new(v[0], v[1], v[2])),
            Err(_) => {
                return Err(SnapshotError::MalformedLine {
                    line: i + 1,
                    content: line,
                })
            }
        }
    }

    if rods.len() < to_read {
        return Err(SnapshotError::TooFewRods {
            found: rods.len(),
            expected: to_read,
        });
    }

    let found = rods.len();
    let missing: Vec<usize> = (found..num_rods).collect();
    for idx in &missing {
        rods.push(cell.rod(*idx));
    }
    cell.load_rods(rods, missing);
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rods_core::Parameters;

    fn cell() -> AnnularCell {
        AnnularCell::new(Parameters::with_defaults(1.0, 4.0, 20.0, 70.0, 3, 0).unwrap())
    }

    #[test]
    fn round_trips_a_basic_snapshot() {
        let dir = tempdir();
        let path = dir.join("basic.csv");

        let mut cell = cell();
        cell.load_rods(
            vec![Rod::new(1.0, 2.0, 0.1), Rod::new(-3.0, 4.0, -0.2), Rod::new(0.0, 0.0, 0.0)],
            vec![],
        );
        save_snapshot(&cell, &path).unwrap();

        let mut reloaded = cell();
        let found = load_snapshot(&mut reloaded, &path).unwrap();
        assert_eq!(found, 3);
        for (a, b) in cell.rods().iter().zip(reloaded.rods()) {
            assert!((a.x - b.x).abs() < 1e-9);
            assert!((a.y - b.y).abs() < 1e-9);
            assert!((a.angle - b.angle).abs() < 1e-9);
        }
    }

    #[test]
    fn tolerates_a_leading_header_row() {
        let dir = tempdir();
        let path = dir.join("with_header.csv");
        std::fs::write(&path, "x,y,a\n1e0,2e0,0.1e0\n-3e0,4e0,-0.2e0\n0e0,0e0,0e0\n").unwrap();

        let mut loaded = cell();
        let found = load_snapshot(&mut loaded, &path).unwrap();
        assert_eq!(found, 3);
        assert!((loaded.rod(0).x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn short_files_leave_remaining_indices_missing() {
        let dir = tempdir();
        let path = dir.join("short.csv");
        std::fs::write(&path, "1e0,2e0,0.1e0\n").unwrap();

        let mut loaded = cell();
        let found = load_snapshot(&mut loaded, &path).unwrap();
        assert_eq!(found, 1);
        assert_eq!(loaded.missing(), &[1, 2]);
    }

    #[test]
    fn malformed_non_leading_line_is_fatal() {
        let dir = tempdir();
        let path = dir.join("bad.csv");
        std::fs::write(&path, "1e0,2e0,0.1e0\nnot,a,row,at,all\n0e0,0e0,0e0\n").unwrap();

        let mut loaded = cell();
        let err = load_snapshot(&mut loaded, &path).unwrap_err();
        assert!(matches!(err, SnapshotError::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn reads_a_legacy_eight_column_file_discarding_q_columns() {
        let dir = tempdir();
        let path = dir.join("legacy.csv");
        std::fs::write(
            &path,
            "0 1.0 2.0 0.1 0.9 0.8 0.7 0.6\n1 -3.0 4.0 -0.2 0.5 0.4 0.3 0.2\n",
        )
        .unwrap();

        let mut loaded = cell();
        let found = load_legacy_snapshot(&mut loaded, &path, 2).unwrap();
        assert_eq!(found, 2);
        assert!((loaded.rod(0).x - 1.0).abs() < 1e-9);
        assert!((loaded.rod(1).y - 4.0).abs() < 1e-9);
        assert_eq!(loaded.missing(), &[2]);
    }

    fn tempdir() -> std::path::PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("rods-io-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }
}
