//! Extended analysis output: the per-rod configuration plus its local
//! order parameters.
//!
//! Seven comma-separated scientific-notation doubles per line, no header,
//! no leading index column: `x,y,a,dir,q2,q4,qS`. Grounded in the final
//! revision's `Analysis::analize`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use rods_analysis::LocalOrder;
use rods_core::Rod;

use crate::error::SnapshotError;

/// Write one line per rod: its pose followed by its local order parameters.
///
/// `rods.len()` must equal `orders.len()`; a mismatch is a logic error in
/// the caller (both are produced from the same configuration), not a
/// recoverable I/O condition, so it panics rather than returning a
/// `SnapshotError`.
pub fn save_analysis_output(
    rods: &[Rod],
    orders: &[LocalOrder],
    path: impl AsRef<Path>,
) -> Result<(), SnapshotError> {
    assert_eq!(rods.len(), orders.len(), "rods and orders must have matching length");

    let mut file = File::create(path)?;
    for (rod, order) in rods.iter().zip(orders) {
        writeln!(
            file,
            "{:e},{:e},{:e},{:e},{:e},{:e},{:e}",
            rod.x, rod.y, rod.angle, order.director, order.q2, order.q4, order.q_s
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_line_per_rod() {
        let rods = vec![Rod::new(1.0, 2.0, 0.1), Rod::new(-1.0, -2.0, -0.1)];
        let orders = vec![
            LocalOrder { director: 0.1, q2: 0.9, q4: 0.8, q_s: 0.1 },
            LocalOrder { director: -0.1, q2: 0.7, q4: 0.6, q_s: 0.2 },
        ];

        let mut path = std::env::temp_dir();
        path.push(format!("rods-io-analysis-{}.csv", std::process::id()));
        save_analysis_output(&rods, &orders, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].split(',').count(), 7);
    }

    #[test]
    #[should_panic]
    fn mismatched_lengths_panics() {
        let rods = vec![Rod::new(0.0, 0.0, 0.0)];
        let orders = Vec::new();
        let _ = save_analysis_output(&rods, &orders, "/dev/null");
    }
}
