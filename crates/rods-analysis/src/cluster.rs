//! Cluster and defect extraction via link lists and connected components.
//!
//! A link is an unordered pair of rod indices `(left, right)`, `left <
//! right`, satisfying a domain predicate. [`group_links`] groups a list of
//! links (in ascending-`left` order) into connected components, using the
//! original's negated-root-in-slot-0 encoding: a component's root key maps
//! to a vector whose first element is the key itself (non-negative) for a
//! root, or `-root_key` for a non-root member; every following element is
//! a flat list of member indices. This is a direct, deliberately literal
//! port of `analysisRoutines.cpp::getTrees`, kept rather than replaced with
//! a textbook disjoint-set because its grouping behavior is exercised
//! against one by property tests.

use indexmap::IndexMap;

use rods_core::{AnalysisParams, Rod};
use rods_space::Grid;

use crate::error::AnalysisError;

/// An unordered pair of rod indices, always `left < right`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    /// The smaller index.
    pub left: usize,
    /// The larger index.
    pub right: usize,
}

/// Reduce an orientation difference into `[0, pi/2]`, exploiting the
/// rod's own `pi`-periodicity (matching `areInSameCluster`'s fold).
fn reduced_angle_diff(a: f64, b: f64, half_pi: f64, pi: f64) -> f64 {
    let diff = (a - b).abs();
    if diff > half_pi {
        pi - diff
    } else {
        diff
    }
}

/// Build cluster links: rod pairs within `cluster_max_dist` of each other
/// whose reduced orientation difference is under `cluster_max_angle`,
/// enumerated via the grid's box neighborhoods.
///
/// Grounded in `getClusterLinks`.
pub fn cluster_links(rods: &[Rod], grid: &Grid, analysis: &AnalysisParams) -> Vec<Link> {
    use std::f64::consts::PI;
    let max_dist_sq = analysis.cluster_max_dist * analysis.cluster_max_dist;
    let mut links = Vec::new();
    for (i, rod) in rods.iter().enumerate() {
        for j in grid.neighbors(rod.x, rod.y) {
            if i < j
                && rod.distance_sq(&rods[j]) < max_dist_sq
                && reduced_angle_diff(rod.angle, rods[j].angle, PI / 2.0, PI) < analysis.cluster_max_angle
            {
                links.push(Link { left: i, right: j });
            }
        }
    }
    links
}

/// Build defect links: pairs of "low tetratic order" rods (`q4` under
/// `defect_q4_ceiling`) within `defect_max_dist` of each other.
///
/// O(k^2) over the low-order subset, matching `getDefectsLinks`, which
/// does not use the grid (defects are expected to be a small minority of
/// the ensemble).
///
/// Returns [`AnalysisError::LengthMismatch`] if `q4` does not have one
/// entry per rod, since `q4` is indexed by rod index below.
pub fn defect_links(rods: &[Rod], q4: &[f64], analysis: &AnalysisParams) -> Result<Vec<Link>, AnalysisError> {
    if q4.len() != rods.len() {
        return Err(AnalysisError::LengthMismatch {
            rods: rods.len(),
            expected: q4.len(),
        });
    }

    let max_dist_sq = analysis.defect_max_dist * analysis.defect_max_dist;
    let low_order: Vec<usize> = (0..rods.len())
        .filter(|&i| q4[i] < analysis.defect_q4_ceiling)
        .collect();

    let mut links = Vec::new();
    for &i in &low_order {
        for &j in &low_order {
            if i < j && rods[i].distance_sq(&rods[j]) < max_dist_sq {
                links.push(Link { left: i, right: j });
            }
        }
    }
    Ok(links)
}

/// Group a link list into connected components, keyed by root index.
///
/// `links` must be in ascending-`left` order (the order [`cluster_links`]
/// and [`defect_links`] already produce). A root's value vector starts
/// with its own (non-negative) key followed by its flat member list; a
/// non-root member's value vector holds a single element, `-root`.
pub fn group_links(links: &[Link]) -> IndexMap<i64, Vec<i64>> {
    let mut trees: IndexMap<i64, Vec<i64>> = IndexMap::new();

    for lk in links {
        let left = lk.left as i64;
        let right = lk.right as i64;
        let left_has_root = trees.contains_key(&left);
        let right_has_root = trees.contains_key(&right);

        if !left_has_root && !right_has_root {
            trees.insert(left, vec![left, right]);
            trees.insert(right, vec![-left]);
        } else if left_has_root && !right_has_root {
            if trees[&left][0] < left {
                let root = -trees[&left][0];
                trees.get_mut(&root).unwrap().push(right);
                trees.insert(right, vec![-root]);
            } else {
                trees.get_mut(&left).unwrap().push(right);
                trees.insert(right, vec![-left]);
            }
        } else if !left_has_root && right_has_root {
            let root = -trees[&right][0];
            trees.get_mut(&root).unwrap().push(left);
            trees.insert(left, vec![-root]);
        } else {
            // Both endpoints already belong to some component. The
            // component with the smaller root index always survives,
            // matching the original's raw-slot0 comparison.
            let left_root = if trees[&left][0] < left {
                -trees[&left][0]
            } else {
                left
            };
            let right_root = -trees[&right][0];
            let (root, leaf) = if left_root < right_root {
                (left_root, right_root)
            } else if right_root < left_root {
                (right_root, left_root)
            } else {
                continue; // already the same component
            };

            let members = trees[&leaf].clone();
            for i in members {
                trees.get_mut(&i).unwrap()[0] = -root;
                trees.get_mut(&root).unwrap().push(i);
            }
            trees.get_mut(&leaf).unwrap().truncate(1);
        }
    }

    trees
}

/// Drop components whose member count is under `min_size`.
///
/// Non-root (leaf) entries always have exactly one element and so are
/// always dropped by this pass, leaving only surviving root entries.
pub fn erase_small_components(trees: &mut IndexMap<i64, Vec<i64>>, min_size: usize) {
    trees.retain(|_, members| members.len() >= min_size);
}

/// A connected component surviving [`erase_small_components`].
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    /// Member rod indices.
    pub members: Vec<usize>,
    /// Cartesian centroid of the member rods' centers.
    pub centroid_xy: (f64, f64),
    /// Polar centroid, `(radius, angle)`.
    pub centroid_polar: (f64, f64),
}

/// Summarize the surviving root entries of `trees` into [`Component`]s,
/// each carrying its member list and centroid.
pub fn components(trees: &IndexMap<i64, Vec<i64>>, rods: &[Rod]) -> Vec<Component> {
    trees
        .iter()
        .filter(|(&root, members)| members[0] >= 0 && root >= 0)
        .map(|(_, members)| {
            let idx: Vec<usize> = members.iter().map(|&m| m as usize).collect();
            let n = idx.len() as f64;
            let (sum_x, sum_y) = idx
                .iter()
                .fold((0.0, 0.0), |(sx, sy), &i| (sx + rods[i].x, sy + rods[i].y));
            let cx = sum_x / n;
            let cy = sum_y / n;
            Component {
                members: idx,
                centroid_xy: (cx, cy),
                centroid_polar: ((cx * cx + cy * cy).sqrt(), cy.atan2(cx)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn a_chain_of_links_forms_one_component() {
        let links = vec![
            Link { left: 0, right: 1 },
            Link { left: 1, right: 2 },
            Link { left: 2, right: 3 },
        ];
        let mut trees = group_links(&links);
        erase_small_components(&mut trees, 2);
        let comps = components(&trees, &[Rod::new(0.0, 0.0, 0.0); 4]);
        assert_eq!(comps.len(), 1);
        let mut members = comps[0].members.clone();
        members.sort_unstable();
        assert_eq!(members, vec![0, 1, 2, 3]);
    }

    #[test]
    fn two_disjoint_links_form_two_components() {
        let links = vec![Link { left: 0, right: 1 }, Link { left: 2, right: 3 }];
        let mut trees = group_links(&links);
        erase_small_components(&mut trees, 2);
        let comps = components(&trees, &[Rod::new(0.0, 0.0, 0.0); 4]);
        assert_eq!(comps.len(), 2);
    }

    #[test]
    fn merging_two_existing_components_via_a_bridge_link() {
        let links = vec![
            Link { left: 0, right: 1 },
            Link { left: 2, right: 3 },
            Link { left: 1, right: 2 },
        ];
        let mut trees = group_links(&links);
        erase_small_components(&mut trees, 2);
        let comps = components(&trees, &[Rod::new(0.0, 0.0, 0.0); 4]);
        assert_eq!(comps.len(), 1);
        let mut members = comps[0].members.clone();
        members.sort_unstable();
        assert_eq!(members, vec![0, 1, 2, 3]);
    }

    #[test]
    fn an_isolated_index_with_no_link_has_no_component() {
        let links = vec![Link { left: 0, right: 1 }];
        let mut trees = group_links(&links);
        erase_small_components(&mut trees, 2);
        let comps = components(&trees, &[Rod::new(0.0, 0.0, 0.0); 3]);
        assert_eq!(comps.len(), 1);
        assert!(!comps[0].members.contains(&2));
    }

    #[test]
    fn components_below_min_size_are_dropped() {
        let links = vec![Link { left: 0, right: 1 }];
        let mut trees = group_links(&links);
        erase_small_components(&mut trees, 5);
        let comps = components(&trees, &[Rod::new(0.0, 0.0, 0.0); 2]);
        assert!(comps.is_empty());
    }

    #[test]
    fn centroid_is_the_mean_of_member_positions() {
        let links = vec![Link { left: 0, right: 1 }];
        let mut trees = group_links(&links);
        erase_small_components(&mut trees, 2);
        let rods = vec![Rod::new(0.0, 0.0, 0.0), Rod::new(2.0, 0.0, 0.0)];
        let comps = components(&trees, &rods);
        assert_eq!(comps.len(), 1);
        assert!((comps[0].centroid_xy.0 - 1.0).abs() < 1e-12);
        assert!((comps[0].centroid_xy.1 - 0.0).abs() < 1e-12);
    }

    fn reference_partition(n: usize, links: &[Link]) -> Vec<usize> {
        let mut parent: Vec<usize> = (0..n).collect();
        fn find(parent: &mut [usize], x: usize) -> usize {
            if parent[x] != x {
                parent[x] = find(parent, parent[x]);
            }
            parent[x]
        }
        for lk in links {
            let (ra, rb) = (find(&mut parent, lk.left), find(&mut parent, lk.right));
            if ra != rb {
                parent[ra.max(rb)] = ra.min(rb);
            }
        }
        (0..n).map(|i| find(&mut parent, i)).collect()
    }

    proptest! {
        #[test]
        fn grouping_matches_a_reference_disjoint_set(
            raw_edges in proptest::collection::vec((0usize..8, 0usize..8), 0..20),
        ) {
            let mut edges: Vec<Link> = raw_edges
                .into_iter()
                .filter(|&(a, b)| a != b)
                .map(|(a, b)| if a < b { Link { left: a, right: b } } else { Link { left: b, right: a } })
                .collect();
            edges.sort_by_key(|lk| lk.left);

            let reference = reference_partition(8, &edges);
            let trees = group_links(&edges);

            // Every pair that the reference says are in the same component
            // must also resolve to the same root in our tree encoding, and
            // vice versa, for every index touched by at least one edge.
            let touched: std::collections::HashSet<usize> = edges
                .iter()
                .flat_map(|lk| [lk.left, lk.right])
                .collect();

            let root_of = |i: usize| -> i64 {
                let v = &trees[&(i as i64)];
                if v[0] >= 0 {
                    i as i64
                } else {
                    -v[0]
                }
            };

            for &i in &touched {
                for &j in &touched {
                    let same_reference = reference[i] == reference[j];
                    let same_trees = root_of(i) == root_of(j);
                    prop_assert_eq!(same_reference, same_trees, "mismatch for {} and {}", i, j);
                }
            }
        }
    }
}
