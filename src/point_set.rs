//! Point sets: the data element edited by [`PointSetInteractor`](crate::PointSetInteractor).
//!
//! Points are stored per time step under a stable index. Removing a point
//! leaves a gap; new points fill the first free index.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::operation_ids::{OPDESELECTPOINT, OPINSERT, OPMOVE, OPREMOVE, OPSELECTPOINT};
use crate::geometry::{BoundingBox3D, Geometry3D, Point3D};
use crate::interactor::DataElement;

// ============================================================================
// Operations
// ============================================================================

/// Kind of edit applied to a point set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointOpKind {
    /// Insert a point at an index, selected or not as the operation says.
    Insert,
    /// Remove the point at an index
    Remove,
    /// Move the point at an index to a new position
    Move,
    Select,
    Deselect,
}

impl PointOpKind {
    pub fn operation_type(&self) -> i32 {
        match self {
            PointOpKind::Insert => OPINSERT,
            PointOpKind::Remove => OPREMOVE,
            PointOpKind::Move => OPMOVE,
            PointOpKind::Select => OPSELECTPOINT,
            PointOpKind::Deselect => OPDESELECTPOINT,
        }
    }
}

/// An edit of one point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointOperation {
    pub kind: PointOpKind,
    pub index: usize,
    /// Position for inserts and moves; informational otherwise
    pub position: Point3D,
    pub time_step: usize,
    /// Selection of an inserted point
    #[serde(default = "default_selected")]
    pub selected: bool,
}

fn default_selected() -> bool {
    true
}

impl PointOperation {
    /// An edit of the point at `index`. Inserts create a selected point.
    pub fn new(kind: PointOpKind, index: usize, position: Point3D, time_step: usize) -> Self {
        Self {
            kind,
            index,
            position,
            time_step,
            selected: true,
        }
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

// ============================================================================
// Point Set
// ============================================================================

/// A stored point and its selection flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointEntry {
    pub position: Point3D,
    pub selected: bool,
}

/// Indexed points per time step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointSet {
    name: String,
    time_steps: Vec<BTreeMap<usize, PointEntry>>,
}

impl PointSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_time_steps(name, 1)
    }

    pub fn with_time_steps(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            time_steps: vec![BTreeMap::new(); count.max(1)],
        }
    }

    fn points(&self, time_step: usize) -> Option<&BTreeMap<usize, PointEntry>> {
        self.time_steps.get(time_step)
    }

    fn points_mut(&mut self, time_step: usize) -> &mut BTreeMap<usize, PointEntry> {
        if time_step >= self.time_steps.len() {
            self.time_steps.resize(time_step + 1, BTreeMap::new());
        }
        &mut self.time_steps[time_step]
    }

    /// Number of points at a time step.
    pub fn size(&self, time_step: usize) -> usize {
        self.points(time_step).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self, time_step: usize) -> bool {
        self.size(time_step) == 0
    }

    pub fn index_exists(&self, index: usize, time_step: usize) -> bool {
        self.points(time_step)
            .is_some_and(|points| points.contains_key(&index))
    }

    pub fn point(&self, index: usize, time_step: usize) -> Option<Point3D> {
        self.points(time_step)?.get(&index).map(|e| e.position)
    }

    pub fn is_selected(&self, index: usize, time_step: usize) -> bool {
        self.points(time_step)
            .and_then(|points| points.get(&index))
            .is_some_and(|e| e.selected)
    }

    /// Indices in ascending order.
    pub fn indices(&self, time_step: usize) -> Vec<usize> {
        self.points(time_step)
            .map(|points| points.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Indices of selected points in ascending order.
    pub fn selected_indices(&self, time_step: usize) -> Vec<usize> {
        self.points(time_step)
            .map(|points| {
                points
                    .iter()
                    .filter(|(_, e)| e.selected)
                    .map(|(i, _)| *i)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn selected_count(&self, time_step: usize) -> usize {
        self.selected_indices(time_step).len()
    }

    /// Lowest index not holding a point.
    pub fn first_free_index(&self, time_step: usize) -> usize {
        let Some(points) = self.points(time_step) else {
            return 0;
        };
        (0..).find(|i| !points.contains_key(i)).unwrap_or(points.len())
    }

    /// Index of the first point within `distance` of `position`.
    ///
    /// A distance of 0 requires an exact match.
    pub fn search_point(&self, position: &Point3D, distance: f64, time_step: usize) -> Option<usize> {
        self.points(time_step)?
            .iter()
            .find(|(_, e)| e.position.distance(position) <= distance)
            .map(|(i, _)| *i)
    }

    /// Apply an edit. Returns false if the index does not fit the edit.
    pub fn execute_operation(&mut self, op: &PointOperation) -> bool {
        let points = self.points_mut(op.time_step);
        match op.kind {
            PointOpKind::Insert => {
                points.insert(
                    op.index,
                    PointEntry {
                        position: op.position,
                        selected: op.selected,
                    },
                );
                true
            }
            PointOpKind::Remove => points.remove(&op.index).is_some(),
            PointOpKind::Move => match points.get_mut(&op.index) {
                Some(entry) => {
                    entry.position = op.position;
                    true
                }
                None => false,
            },
            PointOpKind::Select | PointOpKind::Deselect => match points.get_mut(&op.index) {
                Some(entry) => {
                    entry.selected = op.kind == PointOpKind::Select;
                    true
                }
                None => false,
            },
        }
    }
}

impl DataElement for PointSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn time_steps(&self) -> usize {
        self.time_steps.len()
    }

    /// Bounding box of the points. `None` for an empty time step.
    fn geometry(&self, time_step: usize) -> Option<Geometry3D> {
        let mut positions = self.points(time_step)?.values().map(|e| e.position);
        let first = positions.next()?;
        let bounds = positions.fold(BoundingBox3D::new(first, first), |b, p| {
            BoundingBox3D::new(
                Point3D::new(b.min.x.min(p.x), b.min.y.min(p.y), b.min.z.min(p.z)),
                Point3D::new(b.max.x.max(p.x), b.max.y.max(p.y), b.max.z.max(p.z)),
            )
        });
        Some(Geometry3D::from_world_bounds(bounds))
    }
}
