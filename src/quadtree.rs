use std::fmt;

use crate::{
    util::{child_count, slot_index, MAX_QUADTREE_DIMENSION},
    Error, Point, Result,
};

const INDENT: usize = 4;

/// A point-region quadtree over points of any fixed dimension.
///
/// Each node stores one point and `2^d` child slots. A point descends into the
/// slot whose bit pattern records, axis by axis, whether it is smaller than or
/// greater-or-equal to the node's point. Axis 0 is the least significant bit.
///
/// The dimension is fixed by the first inserted point and kept for the
/// lifetime of the tree, even after every point has been deleted.
///
/// With the `serde` feature the tree is stored as its dimension and its points
/// in pre-order, and rebuilt by inserting them again.
#[derive(Debug, Default)]
pub struct PointRegionQuadtree {
    root: Option<Box<Node>>,
    dimension: Option<usize>,
}

impl PointRegionQuadtree {
    /// Create a new empty quadtree
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a quadtree whose root holds `point`
    pub fn with_root(point: Point) -> Result<Self> {
        let mut qt = Self::new();
        qt.try_insert(point)?;
        Ok(qt)
    }

    /// Dimension shared by every point in the tree, once one has been inserted
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// The point stored at the root
    pub fn root(&self) -> Option<&Point> {
        self.root.as_ref().map(|root| &root.point)
    }

    /// Number of points stored
    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.len())
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Stored points in pre-order: each node before the subtrees in its slots
    ///
    /// Inserting them in this order into an empty tree rebuilds the same shape.
    pub fn points(&self) -> Vec<&Point> {
        let mut points = Vec::with_capacity(self.len());
        if let Some(root) = &self.root {
            root.collect_points(&mut points);
        }
        points
    }

    /// Insert a point into the quadtree
    ///
    /// **Returns** a boolean value indicating if the point was inserted successfully.
    /// Points whose dimension differs from the tree's are rejected.
    pub fn insert(&mut self, point: Point) -> bool {
        match self.try_insert(point) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("quadtree insert rejected: {err}");
                false
            }
        }
    }

    /// Insert a point, reporting why it was rejected
    pub fn try_insert(&mut self, point: Point) -> Result<()> {
        self.admit(&point)?;
        self.dimension.get_or_insert(point.dimension());

        let node = Box::new(Node::new(point));
        match self.root.as_mut() {
            Some(root) => root.graft(node),
            None => self.root = Some(node),
        }
        Ok(())
    }

    /// Check whether a point equal to `point` is stored in the tree
    pub fn contains(&self, point: &Point) -> bool {
        if let Some(dimension) = self.dimension {
            if let Err(err) = point.check_dimension(dimension) {
                log::warn!("quadtree lookup rejected: {err}");
                return false;
            }
        }
        self.root.as_ref().is_some_and(|root| root.contains(point))
    }

    /// Delete a point from the quadtree
    ///
    /// The removed node's child subtrees are grafted back in from the root,
    /// keeping their internal structure where it still addresses correctly.
    ///
    /// **Returns** false if the point was not in the tree
    pub fn delete(&mut self, point: &Point) -> bool {
        if !self.contains(point) {
            return false;
        }

        let Some(root) = self.root.as_mut() else {
            return false;
        };
        if root.point == *point {
            self.delete_root();
            return true;
        }

        match root.detach(point) {
            Some(removed) => {
                for orphan in removed.into_children() {
                    root.graft(orphan);
                }
                true
            }
            None => false,
        }
    }

    /// Write the tree to stdout, one point per line, indented by depth
    pub fn print(&self) {
        print!("{self}");
    }

    /// Rebuild a tree from a dimension lock and points in pre-order
    fn from_parts(dimension: Option<usize>, points: Vec<Point>) -> Result<Self> {
        let mut qt = Self::new();
        if let Some(dimension) = dimension {
            check_dimension_limits(dimension)?;
            qt.dimension = Some(dimension);
        }
        for point in points {
            qt.try_insert(point)?;
        }
        Ok(qt)
    }

    fn admit(&self, point: &Point) -> Result<()> {
        match self.dimension {
            Some(dimension) => point.check_dimension(dimension)?,
            None => check_dimension_limits(point.dimension())?,
        }
        point.check_finite()
    }

    /// Remove the root, promoting its first child subtree in its place
    fn delete_root(&mut self) {
        let Some(root) = self.root.take() else {
            return;
        };
        let mut orphans = root.into_children().into_iter();
        self.root = orphans.next();
        if let Some(new_root) = self.root.as_mut() {
            log::debug!("promoted {} to quadtree root", new_root.point);
            for orphan in orphans {
                new_root.graft(orphan);
            }
        }
    }
}

impl TryFrom<Vec<Point>> for PointRegionQuadtree {
    type Error = Error;

    /// Build a tree by inserting `points` in order
    fn try_from(points: Vec<Point>) -> Result<Self> {
        Self::from_parts(None, points)
    }
}

impl fmt::Display for PointRegionQuadtree {
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
    children: Box<[Option<Box<Node>>]>,
}

impl Node {
    fn new(point: Point) -> Self {
        let children = empty_slots(point.dimension());
        Self { point, children }
    }

    fn len(&self) -> usize {
        1 + self.children.iter().flatten().map(|c| c.len()).sum::<usize>()
    }

    fn collect_points<'a>(&'a self, points: &mut Vec<&'a Point>) {
        points.push(&self.point);
        for child in self.children.iter().flatten() {
            child.collect_points(points);
        }
    }

    fn contains(&self, point: &Point) -> bool {
        if self.point == *point {
            return true;
        }
        match &self.children[slot_index(point, &self.point)] {
            Some(child) => child.contains(point),
            None => false,
        }
    }

    /// Attach `subtree` at the first empty slot on its address path.
    ///
    /// A subtree whose points would split across this node's slots cannot hang
    /// under one of them, so its root is attached alone and its children are
    /// grafted from here one by one.
    fn graft(&mut self, mut subtree: Box<Node>) {
        let slot = slot_index(&subtree.point, &self.point);
        if !subtree.fits(slot, &self.point) {
            log::trace!("splitting subtree at {} under {}", subtree.point, self.point);
            let children = subtree.take_children();
            self.graft(subtree);
            for child in children {
                self.graft(child);
            }
            return;
        }

        if let Some(child) = self.children[slot].as_mut() {
            child.graft(subtree);
        } else {
            self.children[slot] = Some(subtree);
        }
    }

    /// Whether every point in this subtree addresses to `slot` of `pivot`
    fn fits(&self, slot: usize, pivot: &Point) -> bool {
        slot_index(&self.point, pivot) == slot
            && self.children.iter().flatten().all(|c| c.fits(slot, pivot))
    }

    /// Unlink the descendant holding `point`, searching below this node
    fn detach(&mut self, point: &Point) -> Option<Box<Node>> {
        let slot = slot_index(point, &self.point);
        let child = self.children[slot].as_mut()?;
        if child.point == *point {
            return self.children[slot].take();
        }
        child.detach(point)
    }

    fn take_children(&mut self) -> Vec<Box<Node>> {
        let children = std::mem::replace(&mut self.children, empty_slots(self.point.dimension()));
        children.into_vec().into_iter().flatten().collect()
    }

    fn into_children(self) -> Vec<Box<Node>> {
        self.children.into_vec().into_iter().flatten().collect()
    }

    /// Lower half of the slots, then this point, then the upper half
    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let (lower, upper) = self.children.split_at(self.children.len() / 2);
        for child in lower.iter().flatten() {
            child.write_indented(f, indent + INDENT)?;
        }
        writeln!(f, "{:width$}{}", "", self.point, width = indent)?;
        for child in upper.iter().flatten() {
            child.write_indented(f, indent + INDENT)?;
        }
        Ok(())
    }
}

fn check_dimension_limits(dimension: usize) -> Result<()> {
    match dimension {
        0 => Err(Error::ZeroDimension),
        dimension if dimension > MAX_QUADTREE_DIMENSION => Err(Error::DimensionTooLarge {
            dimension,
            max: MAX_QUADTREE_DIMENSION,
        }),
        _ => Ok(()),
    }
}

fn empty_slots(dimension: usize) -> Box<[Option<Box<Node>>]> {
    std::iter::repeat_with(|| None)
        .take(child_count(dimension))
        .collect()
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct Snapshot<P> {
    dimension: Option<usize>,
    points: Vec<P>,
}

#[cfg(feature = "serde")]
impl serde::Serialize for PointRegionQuadtree {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let snapshot = Snapshot {
            dimension: self.dimension,
            points: self.points(),
        };
        serde::Serialize::serialize(&snapshot, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PointRegionQuadtree {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Snapshot { dimension, points }: Snapshot<Point> =
            serde::Deserialize::deserialize(deserializer)?;
        Self::from_parts(dimension, points).map_err(serde::de::Error::custom)
    }
}
