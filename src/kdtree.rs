use std::fmt;

use crate::{Error, Point, Result};

const INDENT: usize = 5;

/// A k-d tree over points of any fixed dimension.
///
/// The root cuts on axis 0 and every child cuts on the axis after its
/// parent's, wrapping around. Points smaller than a node on its cutting axis go
/// left, greater-or-equal points go right. The tree is a set: inserting a point
/// that is already present leaves it unchanged.
///
/// With the `serde` feature the tree is stored as its points in pre-order and
/// rebuilt by inserting them again.
#[derive(Debug, Default)]
pub struct KdTree {
    root: Option<Box<Node>>,
}

impl KdTree {
    /// Create a new empty k-d tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Dimension of the stored points, if any are stored
    pub fn dimension(&self) -> Option<usize> {
        self.root.as_ref().map(|root| root.point.dimension())
    }

    /// Number of points stored
    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.len())
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Stored points in pre-order: node, left subtree, right subtree
    pub fn points(&self) -> Vec<&Point> {
        let mut points = Vec::with_capacity(self.len());
        if let Some(root) = &self.root {
            root.collect_points(&mut points);
        }
        points
    }

    /// Insert a point into the tree
    ///
    /// Inserting a point already in the tree is a no-op. Fails if the point has
    /// no coordinates, a NaN or infinite coordinate, or a dimension that differs
    /// from the stored points.
    pub fn insert(&mut self, point: Point) -> Result<()> {
        if point.dimension() == 0 {
            return Err(Error::ZeroDimension);
        }
        if let Some(dimension) = self.dimension() {
            point.check_dimension(dimension)?;
        }
        point.check_finite()?;
        self.root = Some(Node::insert(self.root.take(), point, 0));
        Ok(())
    }

    /// Check whether a point equal to `point` is stored in the tree
    pub fn contains(&self, point: &Point) -> bool {
        match (&self.root, self.dimension()) {
            (Some(root), Some(dimension)) if point.dimension() == dimension => root.contains(point),
            _ => false,
        }
    }

    /// Delete a point from the tree
    ///
    /// A deleted internal node takes the minimum point along its cutting axis
    /// from one of its subtrees, which is then deleted from that subtree in turn.
    ///
    /// **Returns** [`Error::NotFound`] if the point is not in the tree; the tree
    /// is left untouched in that case.
    pub fn delete(&mut self, point: &Point) -> Result<()> {
        // The recursive delete consumes the search path, so a miss must be
        // ruled out before it starts.
        if !self.contains(point) {
            return Err(Error::NotFound(point.to_string()));
        }
        self.root = Node::delete(self.root.take(), point)?;
        Ok(())
    }

    /// The stored point with the smallest coordinate along `axis`
    ///
    /// Ties go to the point closest to the root.
    pub fn find_min(&self, axis: usize) -> Option<&Point> {
        let root = self.root.as_ref()?;
        if axis < root.point.dimension() {
            Some(root.find_min(axis))
        } else {
            None
        }
    }

    /// Write the tree to stdout sideways: right subtree above, left below
    pub fn print(&self) {
        print!("{self}");
    }
}

impl TryFrom<Vec<Point>> for KdTree {
    type Error = Error;

    /// Build a tree by inserting `points` in order
    fn try_from(points: Vec<Point>) -> Result<Self> {
        let mut tree = Self::new();
        for point in points {
            tree.insert(point)?;
        }
        Ok(tree)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for KdTree {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.points())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for KdTree {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let points = <Vec<Point> as serde::Deserialize>::deserialize(deserializer)?;
        Self::try_from(points).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for KdTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => root.write_indented(f, 0),
            None => Ok(()),
        }
    }
}

#[derive(Debug)]
struct Node {
    point: Point,
    cut_dim: usize,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    fn new(point: Point, cut_dim: usize) -> Self {
        Self {
            point,
            cut_dim,
            left: None,
            right: None,
        }
    }

    fn in_left_subtree(&self, point: &Point) -> bool {
        point[self.cut_dim] < self.point[self.cut_dim]
    }

    fn next_cut_dim(&self) -> usize {
        (self.cut_dim + 1) % self.point.dimension()
    }

    fn len(&self) -> usize {
        1 + [&self.left, &self.right]
            .into_iter()
            .flatten()
            .map(|c| c.len())
            .sum::<usize>()
    }

    fn insert(node: Option<Box<Node>>, point: Point, cut_dim: usize) -> Box<Node> {
        let Some(mut node) = node else {
            return Box::new(Node::new(point, cut_dim));
        };
        if node.point == point {
            return node;
        }

        let next = node.next_cut_dim();
        if node.in_left_subtree(&point) {
            node.left = Some(Self::insert(node.left.take(), point, next));
        } else {
            node.right = Some(Self::insert(node.right.take(), point, next));
        }
        node
    }

    fn collect_points<'a>(&'a self, points: &mut Vec<&'a Point>) {
        points.push(&self.point);
        for child in [&self.left, &self.right].into_iter().flatten() {
            child.collect_points(points);
        }
    }

    fn contains(&self, point: &Point) -> bool {
        if self.point == *point {
            return true;
        }
        let child = if self.in_left_subtree(point) {
            &self.left
        } else {
            &self.right
        };
        child.as_ref().is_some_and(|c| c.contains(point))
    }

    fn find_min(&self, axis: usize) -> &Point {
        if self.cut_dim == axis {
            // everything on the right is >= on this axis
            return match &self.left {
                Some(left) => left.find_min(axis),
                None => &self.point,
            };
        }

        [&self.left, &self.right]
            .into_iter()
            .flatten()
            .fold(&self.point, |min, child| {
                min_along(min, child.find_min(axis), axis)
            })
    }

    fn delete(node: Option<Box<Node>>, point: &Point) -> Result<Option<Box<Node>>> {
        let Some(mut node) = node else {
            return Err(Error::NotFound(point.to_string()));
        };

        if node.point == *point {
            if let Some(right) = node.right.take() {
                let min = right.find_min(node.cut_dim).clone();
                node.right = Self::delete(Some(right), &min)?;
                node.point = min;
            } else if let Some(left) = node.left.take() {
                // every point left is >= min on the cut axis, so it moves right
                let min = left.find_min(node.cut_dim).clone();
                node.right = Self::delete(Some(left), &min)?;
                node.point = min;
            } else {
                return Ok(None);
            }
        } else if node.in_left_subtree(point) {
            node.left = Self::delete(node.left.take(), point)?;
        } else {
            node.right = Self::delete(node.right.take(), point)?;
        }
        Ok(Some(node))
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        if let Some(right) = &self.right {
            right.write_indented(f, indent + INDENT)?;
        }
        writeln!(f, "{:width$}{}", "", self.point, width = indent)?;
        if let Some(left) = &self.left {
            left.write_indented(f, indent + INDENT)?;
        }
        Ok(())
    }
}

/// The smaller of two points along `axis`, preferring `a` on ties
fn min_along<'a>(a: &'a Point, b: &'a Point, axis: usize) -> &'a Point {
    if a[axis] <= b[axis] {
        a
    } else {
        b
    }
}
