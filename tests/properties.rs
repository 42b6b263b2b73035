//! Model-based property tests for both trees.
//!
//! Coordinates are small integers so that ties on an axis are common.

use std::collections::BTreeSet;

use pointtree::{Error, KdTree, Point, PointRegionQuadtree};
use proptest::prelude::*;

type Coords = (i32, i32, i32);

fn to_point(&(x, y, z): &Coords) -> Point {
    Point::from([x as f64, y as f64, z as f64])
}

fn point_sets() -> impl Strategy<Value = (BTreeSet<Coords>, Vec<bool>)> {
    (
        prop::collection::btree_set((0i32..8, 0i32..8, 0i32..8), 1..48),
        prop::collection::vec(any::<bool>(), 48),
    )
}

fn split(points: &BTreeSet<Coords>, mask: &[bool]) -> (Vec<Coords>, Vec<Coords>) {
    let (deleted, kept): (Vec<_>, Vec<_>) = points
        .iter()
        .zip(mask)
        .partition(|(_, &delete)| delete);
    (
        deleted.into_iter().map(|(c, _)| *c).collect(),
        kept.into_iter().map(|(c, _)| *c).collect(),
    )
}

proptest! {
    #[test]
    fn quadtree_insert_then_contains((points, _) in point_sets()) {
        let mut qt = PointRegionQuadtree::new();
        for c in &points {
            prop_assert!(qt.insert(to_point(c)));
        }
        prop_assert_eq!(qt.len(), points.len());
        for c in &points {
            prop_assert!(qt.contains(&to_point(c)), "{:?} should be found", c);
        }
    }

    #[test]
    fn quadtree_delete_keeps_survivors((points, mask) in point_sets()) {
        let mut qt = PointRegionQuadtree::new();
        for c in &points {
            qt.insert(to_point(c));
        }
        let (deleted, kept) = split(&points, &mask);
        for c in &deleted {
            prop_assert!(qt.delete(&to_point(c)), "{:?} should be deleted", c);
            prop_assert!(!qt.contains(&to_point(c)));
        }
        for c in &deleted {
            prop_assert!(!qt.delete(&to_point(c)), "{:?} is already gone", c);
        }
        for c in &kept {
            prop_assert!(qt.contains(&to_point(c)), "{:?} should survive", c);
        }
        prop_assert_eq!(qt.len(), kept.len());
        prop_assert_eq!(qt.dimension(), Some(3));
    }

    #[test]
    fn kdtree_duplicates_are_ignored((points, _) in point_sets()) {
        let mut tree = KdTree::new();
        for c in points.iter().chain(&points) {
            prop_assert!(tree.insert(to_point(c)).is_ok());
        }
        prop_assert_eq!(tree.len(), points.len());
    }

    #[test]
    fn kdtree_delete_keeps_survivors((points, mask) in point_sets()) {
        let mut tree = KdTree::new();
        for c in &points {
            tree.insert(to_point(c)).unwrap();
        }
        let (deleted, kept) = split(&points, &mask);
        for c in &deleted {
            prop_assert!(tree.delete(&to_point(c)).is_ok(), "{:?} should be deleted", c);
            prop_assert!(!tree.contains(&to_point(c)));
        }
        for c in &deleted {
            prop_assert_eq!(
                tree.delete(&to_point(c)),
                Err(Error::NotFound(to_point(c).to_string()))
            );
        }
        for c in &kept {
            prop_assert!(tree.contains(&to_point(c)), "{:?} should survive", c);
        }
        prop_assert_eq!(tree.len(), kept.len());
    }

    #[test]
    fn kdtree_find_min_matches_scan((points, mask) in point_sets(), axis in 0usize..3) {
        let mut tree = KdTree::new();
        for c in &points {
            tree.insert(to_point(c)).unwrap();
        }
        let (deleted, kept) = split(&points, &mask);
        for c in &deleted {
            tree.delete(&to_point(c)).unwrap();
        }

        let expected = kept
            .iter()
            .map(|c| to_point(c)[axis])
            .fold(None, |min: Option<f64>, v| Some(min.map_or(v, |m| m.min(v))));
        prop_assert_eq!(tree.find_min(axis).map(|p| p[axis]), expected);
    }
}
