//! The query shape union and its conversions from `geo` geometries.

use crate::error::StructuralError;
use geo::{
    BoundingRect, Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon, Rect,
};
use std::fmt;

/// A 2D point with an optional elevation.
///
/// The z value never takes part in clipping; it is only consulted when a
/// query asks for layer classification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointZ {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Elevation, if known.
    pub z: Option<f64>,
}

impl PointZ {
    /// A point without elevation.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// A point with elevation `z`.
    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Planar coordinate.
    #[inline]
    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }

    /// Planar point.
    #[inline]
    pub fn point(&self) -> Point<f64> {
        Point::new(self.x, self.y)
    }
}

impl From<Point<f64>> for PointZ {
    fn from(p: Point<f64>) -> Self {
        Self::new(p.x(), p.y())
    }
}

impl From<Coord<f64>> for PointZ {
    fn from(c: Coord<f64>) -> Self {
        Self::new(c.x, c.y)
    }
}

impl From<(f64, f64)> for PointZ {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<(f64, f64, f64)> for PointZ {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::with_z(x, y, z)
    }
}

/// Concrete kind tag of a [`Shape`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Single point.
    Point,
    /// Collection of points.
    MultiPoint,
    /// Single polyline.
    LineString,
    /// Collection of polylines.
    MultiLineString,
    /// Single polygon, holes allowed.
    Polygon,
    /// Collection of polygons.
    MultiPolygon,
}

impl ShapeKind {
    /// Dimensional family of this kind.
    pub fn family(self) -> ShapeFamily {
        match self {
            Self::Point | Self::MultiPoint => ShapeFamily::Point,
            Self::LineString | Self::MultiLineString => ShapeFamily::Line,
            Self::Polygon | Self::MultiPolygon => ShapeFamily::Polygon,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Point => "Point",
            Self::MultiPoint => "MultiPoint",
            Self::LineString => "LineString",
            Self::MultiLineString => "MultiLineString",
            Self::Polygon => "Polygon",
            Self::MultiPolygon => "MultiPolygon",
        };
        f.write_str(name)
    }
}

/// Dimension of a shape; selects which clipper handles it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeFamily {
    /// 0-dimensional shapes.
    Point,
    /// 1-dimensional shapes.
    Line,
    /// 2-dimensional shapes.
    Polygon,
}

/// A query shape.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Single point.
    Point(PointZ),
    /// Points, possibly repeated.
    MultiPoint(Vec<PointZ>),
    /// Polyline.
    LineString(LineString<f64>),
    /// Polylines.
    MultiLineString(MultiLineString<f64>),
    /// Polygon with optional holes.
    Polygon(Polygon<f64>),
    /// Polygons.
    MultiPolygon(MultiPolygon<f64>),
}

impl Shape {
    /// Kind tag.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Point(_) => ShapeKind::Point,
            Self::MultiPoint(_) => ShapeKind::MultiPoint,
            Self::LineString(_) => ShapeKind::LineString,
            Self::MultiLineString(_) => ShapeKind::MultiLineString,
            Self::Polygon(_) => ShapeKind::Polygon,
            Self::MultiPolygon(_) => ShapeKind::MultiPolygon,
        }
    }

    /// Dimensional family.
    pub fn family(&self) -> ShapeFamily {
        self.kind().family()
    }

    /// True when the shape has no coordinates at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Point(_) => false,
            Self::MultiPoint(pts) => pts.is_empty(),
            Self::LineString(ls) => ls.0.is_empty(),
            Self::MultiLineString(mls) => mls.0.iter().all(|ls| ls.0.is_empty()),
            Self::Polygon(p) => p.exterior().0.is_empty(),
            Self::MultiPolygon(mp) => mp.0.iter().all(|p| p.exterior().0.is_empty()),
        }
    }

    /// The points of a point-family shape, empty for other families.
    pub fn points(&self) -> &[PointZ] {
        match self {
            Self::Point(p) => std::slice::from_ref(p),
            Self::MultiPoint(pts) => pts,
            _ => &[],
        }
    }

    /// Axis-aligned bounds, `None` for an empty shape.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            Self::Point(p) => Some(Rect::new(p.coord(), p.coord())),
            Self::MultiPoint(pts) => {
                MultiPoint::new(pts.iter().map(PointZ::point).collect()).bounding_rect()
            }
            Self::LineString(ls) => ls.bounding_rect(),
            Self::MultiLineString(mls) => mls.bounding_rect(),
            Self::Polygon(p) => p.bounding_rect(),
            Self::MultiPolygon(mp) => mp.bounding_rect(),
        }
    }

    /// Planar `geo` geometry of this shape; z values are dropped.
    pub fn to_geometry(&self) -> Geometry<f64> {
        match self {
            Self::Point(p) => Geometry::Point(p.point()),
            Self::MultiPoint(pts) => {
                Geometry::MultiPoint(MultiPoint::new(pts.iter().map(PointZ::point).collect()))
            }
            Self::LineString(ls) => Geometry::LineString(ls.clone()),
            Self::MultiLineString(mls) => Geometry::MultiLineString(mls.clone()),
            Self::Polygon(p) => Geometry::Polygon(p.clone()),
            Self::MultiPolygon(mp) => Geometry::MultiPolygon(mp.clone()),
        }
    }

    fn from_collection(parts: Vec<Geometry<f64>>) -> Result<Self, StructuralError> {
        if parts.is_empty() {
            return Err(StructuralError::UnsupportedShape {
                kind: "empty GeometryCollection".into(),
            });
        }
        let shapes = parts
            .into_iter()
            .map(Shape::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let family = shapes[0].family();
        if shapes.iter().any(|s| s.family() != family) {
            return Err(StructuralError::UnsupportedShape {
                kind: "mixed-dimension GeometryCollection".into(),
            });
        }
        let merged = match family {
            ShapeFamily::Point => {
                Shape::MultiPoint(shapes.iter().flat_map(|s| s.points().to_vec()).collect())
            }
            ShapeFamily::Line => {
                let mut lines = Vec::new();
                for s in shapes {
                    match s {
                        Shape::LineString(ls) => lines.push(ls),
                        Shape::MultiLineString(mls) => lines.extend(mls.0),
                        _ => {}
                    }
                }
                Shape::MultiLineString(MultiLineString::new(lines))
            }
            ShapeFamily::Polygon => {
                let mut polys = Vec::new();
                for s in shapes {
                    match s {
                        Shape::Polygon(p) => polys.push(p),
                        Shape::MultiPolygon(mp) => polys.extend(mp.0),
                        _ => {}
                    }
                }
                Shape::MultiPolygon(MultiPolygon::new(polys))
            }
        };
        Ok(merged)
    }
}

impl TryFrom<Geometry<f64>> for Shape {
    type Error = StructuralError;

    /// Normalize a `geo` geometry into a query shape.
    ///
    /// `Line`, `Rect` and `Triangle` are widened to their general kinds. A
    /// geometry collection is accepted only when all its members share a
    /// dimension, and becomes the matching multi-shape.
    #[allow(unreachable_patterns)]
    fn try_from(geometry: Geometry<f64>) -> Result<Self, Self::Error> {
        match geometry {
            Geometry::Point(p) => Ok(Shape::Point(p.into())),
            Geometry::MultiPoint(mp) => Ok(Shape::MultiPoint(
                mp.0.into_iter().map(PointZ::from).collect(),
            )),
            Geometry::Line(l) => Ok(Shape::LineString(LineString::new(vec![l.start, l.end]))),
            Geometry::LineString(ls) => Ok(Shape::LineString(ls)),
            Geometry::MultiLineString(mls) => Ok(Shape::MultiLineString(mls)),
            Geometry::Polygon(p) => Ok(Shape::Polygon(p)),
            Geometry::MultiPolygon(mp) => Ok(Shape::MultiPolygon(mp)),
            Geometry::Rect(r) => Ok(Shape::Polygon(r.to_polygon())),
            Geometry::Triangle(t) => Ok(Shape::Polygon(t.to_polygon())),
            Geometry::GeometryCollection(gc) => Shape::from_collection(gc.0),
            _ => Err(StructuralError::UnsupportedShape {
                kind: "unknown geometry".into(),
            }),
        }
    }
}

impl From<PointZ> for Shape {
    fn from(p: PointZ) -> Self {
        Shape::Point(p)
    }
}

impl From<LineString<f64>> for Shape {
    fn from(ls: LineString<f64>) -> Self {
        Shape::LineString(ls)
    }
}

impl From<MultiLineString<f64>> for Shape {
    fn from(mls: MultiLineString<f64>) -> Self {
        Shape::MultiLineString(mls)
    }
}

impl From<Polygon<f64>> for Shape {
    fn from(p: Polygon<f64>) -> Self {
        Shape::Polygon(p)
    }
}

impl From<MultiPolygon<f64>> for Shape {
    fn from(mp: MultiPolygon<f64>) -> Self {
        Shape::MultiPolygon(mp)
    }
}
