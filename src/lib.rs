//! Spatial indexes over points of any fixed dimension.
//!
//! - [`PointRegionQuadtree`]: every node splits space into `2^d` regions
//!   around its own point.
//! - [`KdTree`]: a binary tree whose nodes cut on one axis each, cycling
//!   through the axes with depth.
//!
//! Both trees support insertion, membership queries, deletion and a textual
//! dump of their structure.
//!
//! ```
//! use pointtree::{KdTree, Point, PointRegionQuadtree};
//!
//! let mut qt = PointRegionQuadtree::new();
//! assert!(qt.insert(Point::from([12.0, 6.0])));
//! assert!(qt.insert(Point::from([1.0, 11.0])));
//! assert!(qt.contains(&Point::from([1.0, 11.0])));
//! assert!(!qt.insert(Point::from([1.0, 2.0, 3.0])));
//!
//! let mut kd = KdTree::new();
//! kd.insert(Point::from([3.0, 4.0])).unwrap();
//! kd.insert(Point::from([1.0, 5.0])).unwrap();
//! kd.delete(&Point::from([3.0, 4.0])).unwrap();
//! assert!(kd.contains(&Point::from([1.0, 5.0])));
//! ```

mod error;
mod kdtree;
mod point;
mod quadtree;
mod util;

pub use error::{Error, Result};
pub use kdtree::KdTree;
pub use point::Point;
pub use quadtree::PointRegionQuadtree;
pub use util::MAX_QUADTREE_DIMENSION;
