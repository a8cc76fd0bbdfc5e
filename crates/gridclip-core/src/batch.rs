//! Homogeneous shape batches and the single-or-batch query input.

use crate::error::StructuralError;
use crate::id::ShapeId;
use crate::shape::{Shape, ShapeKind};
use geo::Geometry;

/// A non-empty array of shapes that all share one [`ShapeKind`].
///
/// The position of a shape in the batch is its [`ShapeId`] in every result
/// table produced from the batch.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeBatch {
    shapes: Vec<Shape>,
    kind: ShapeKind,
}

impl ShapeBatch {
    /// Validate and wrap `shapes`.
    ///
    /// Fails with [`StructuralError::EmptyBatch`] for an empty vector and
    /// [`StructuralError::MixedBatch`] when kinds differ.
    pub fn new(shapes: Vec<Shape>) -> Result<Self, StructuralError> {
        let kind = shapes
            .first()
            .map(Shape::kind)
            .ok_or(StructuralError::EmptyBatch)?;
        if let Some((index, found)) = shapes
            .iter()
            .map(Shape::kind)
            .enumerate()
            .find(|(_, k)| *k != kind)
        {
            return Err(StructuralError::MixedBatch {
                expected: kind,
                found,
                index,
            });
        }
        Ok(Self { shapes, kind })
    }

    /// Shared kind of every shape.
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Number of shapes; never zero.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Always `false`; batches are non-empty by construction.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shapes in submission order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Shapes paired with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &Shape)> + '_ {
        self.shapes
            .iter()
            .enumerate()
            .map(|(i, s)| (ShapeId(i), s))
    }

    /// Unwrap into the underlying vector.
    pub fn into_shapes(self) -> Vec<Shape> {
        self.shapes
    }
}

impl TryFrom<Vec<Geometry<f64>>> for ShapeBatch {
    type Error = StructuralError;

    fn try_from(geometries: Vec<Geometry<f64>>) -> Result<Self, Self::Error> {
        let shapes = geometries
            .into_iter()
            .map(Shape::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(shapes)
    }
}

/// Input accepted by the query operations: one shape, or a batch.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryInput {
    /// A single shape, reported as `ShapeId(0)`.
    Single(Shape),
    /// A homogeneous batch.
    Batch(ShapeBatch),
}

impl QueryInput {
    /// Shapes in submission order.
    pub fn shapes(&self) -> &[Shape] {
        match self {
            Self::Single(s) => std::slice::from_ref(s),
            Self::Batch(b) => b.shapes(),
        }
    }

    /// Number of shapes.
    pub fn len(&self) -> usize {
        self.shapes().len()
    }

    /// Always `false`; see [`ShapeBatch::is_empty`].
    pub fn is_empty(&self) -> bool {
        self.shapes().is_empty()
    }

    /// Shared kind of the input shapes.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Single(s) => s.kind(),
            Self::Batch(b) => b.kind(),
        }
    }

    /// Shapes paired with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &Shape)> + '_ {
        self.shapes()
            .iter()
            .enumerate()
            .map(|(i, s)| (ShapeId(i), s))
    }
}

impl From<Shape> for QueryInput {
    fn from(s: Shape) -> Self {
        Self::Single(s)
    }
}

impl From<ShapeBatch> for QueryInput {
    fn from(b: ShapeBatch) -> Self {
        Self::Batch(b)
    }
}
