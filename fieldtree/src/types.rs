// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer geometry: points, sizes and center-anchored rectangles.
//!
//! A [`Rect`] keeps its center doubled (the *twice-center*) so that the
//! half-unit centers produced by subdividing an odd extent stay exact. All
//! comparisons run on *twice-extents* (`2·center ± size`), and squared
//! distances are accumulated in `i128`.

use core::fmt;

/// A point with integer coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i64,
    /// Vertical coordinate.
    pub y: i64,
}

impl Point {
    /// Create a point.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// This point expressed in twice-coordinates.
    pub(crate) const fn doubled(self) -> Self {
        Self {
            x: self.x * 2,
            y: self.y * 2,
        }
    }
}

/// A width/height pair.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Horizontal extent.
    pub width: i64,
    /// Vertical extent.
    pub height: i64,
}

impl Size {
    /// Create a size.
    pub const fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle anchored at its center.
///
/// Edges are inclusive: a point on the boundary is contained, and two
/// rectangles sharing an edge intersect.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    center2: Point,
    size: Size,
}

impl Rect {
    /// Create a rectangle from its center and size.
    pub const fn new(center: Point, size: Size) -> Self {
        Self {
            center2: center.doubled(),
            size,
        }
    }

    /// Create a rectangle from center coordinates and dimensions.
    pub const fn from_center_size(cx: i64, cy: i64, width: i64, height: i64) -> Self {
        Self::new(Point::new(cx, cy), Size::new(width, height))
    }

    /// Create a rectangle whose center is given in twice-coordinates.
    pub(crate) const fn from_twice_center(center2: Point, size: Size) -> Self {
        Self { center2, size }
    }

    /// The center in twice-coordinates. Exact even for half-unit centers.
    pub const fn twice_center(&self) -> Point {
        self.center2
    }

    /// The center, rounded toward negative infinity when it lies on a half unit.
    pub const fn center(&self) -> Point {
        Point::new(self.center2.x.div_euclid(2), self.center2.y.div_euclid(2))
    }

    /// Width and height.
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Width.
    pub const fn width(&self) -> i64 {
        self.size.width
    }

    /// Height.
    pub const fn height(&self) -> i64 {
        self.size.height
    }

    /// Minimum corner in twice-coordinates.
    pub const fn twice_min(&self) -> Point {
        Point::new(
            self.center2.x - self.size.width,
            self.center2.y - self.size.height,
        )
    }

    /// Maximum corner in twice-coordinates.
    pub const fn twice_max(&self) -> Point {
        Point::new(
            self.center2.x + self.size.width,
            self.center2.y + self.size.height,
        )
    }

    /// The four corners in twice-coordinates: min/min, max/min, min/max, max/max.
    pub const fn corners(&self) -> [Point; 4] {
        let lo = self.twice_min();
        let hi = self.twice_max();
        [
            Point::new(lo.x, lo.y),
            Point::new(hi.x, lo.y),
            Point::new(lo.x, hi.y),
            Point::new(hi.x, hi.y),
        ]
    }

    /// Area, widened so that large extents cannot overflow.
    pub fn area(&self) -> i128 {
        i128::from(self.size.width) * i128::from(self.size.height)
    }

    /// Whether the point lies inside or on the boundary.
    pub const fn contains_point(&self, p: Point) -> bool {
        self.contains_twice_point(p.doubled())
    }

    /// Whether a point given in twice-coordinates lies inside or on the boundary.
    pub const fn contains_twice_point(&self, p2: Point) -> bool {
        let lo = self.twice_min();
        let hi = self.twice_max();
        lo.x <= p2.x && p2.x <= hi.x && lo.y <= p2.y && p2.y <= hi.y
    }

    /// Whether `other` lies entirely within this rectangle.
    pub const fn contains_rect(&self, other: &Self) -> bool {
        let (lo, hi) = (self.twice_min(), self.twice_max());
        let (olo, ohi) = (other.twice_min(), other.twice_max());
        lo.x <= olo.x && lo.y <= olo.y && ohi.x <= hi.x && ohi.y <= hi.y
    }

    /// Whether this rectangle lies entirely within `other`.
    pub const fn contained_by_rect(&self, other: &Self) -> bool {
        other.contains_rect(self)
    }

    /// Whether the two rectangles overlap or touch.
    pub const fn intersects(&self, other: &Self) -> bool {
        let (lo, hi) = (self.twice_min(), self.twice_max());
        let (olo, ohi) = (other.twice_min(), other.twice_max());
        !(hi.x < olo.x || ohi.x < lo.x || hi.y < olo.y || ohi.y < lo.y)
    }

    /// Four times the squared distance from `p` to the nearest point of this
    /// rectangle; zero when `p` is inside or on the boundary.
    pub fn twice_distance_sq(&self, p: Point) -> i128 {
        self.gap_sq(i128::from(p.x) * 2, i128::from(p.y) * 2)
    }

    /// Like [`Rect::twice_distance_sq`], for a point already given in
    /// twice-coordinates, so half-unit points are measured exactly.
    pub fn twice_distance_sq_to_twice_point(&self, p2: Point) -> i128 {
        self.gap_sq(i128::from(p2.x), i128::from(p2.y))
    }

    fn gap_sq(&self, x2: i128, y2: i128) -> i128 {
        let gap = |v2: i128, c2: i64, extent: i64| -> i128 {
            ((v2 - i128::from(c2)).abs() - i128::from(extent)).max(0)
        };
        let dx = gap(x2, self.center2.x, self.size.width);
        let dy = gap(y2, self.center2.y, self.size.height);
        dx * dx + dy * dy
    }

    /// Squared distance from `p` to the nearest edge, zero when inside.
    pub fn distance_sq_to_point(&self, p: Point) -> f64 {
        self.twice_distance_sq(p) as f64 / 4.0
    }

    /// Whether all four corners lie within `radius` of `center`.
    pub fn contained_by_circle(&self, center: Point, radius: i64) -> bool {
        let c2 = center.doubled();
        let limit = 4 * i128::from(radius) * i128::from(radius);
        self.corners().iter().all(|corner| {
            let dx = i128::from(corner.x) - i128::from(c2.x);
            let dy = i128::from(corner.y) - i128::from(c2.y);
            dx * dx + dy * dy <= limit
        })
    }

    /// Whether the circle reaches this rectangle.
    pub fn intersects_circle(&self, center: Point, radius: i64) -> bool {
        self.twice_distance_sq(center) <= 4 * i128::from(radius) * i128::from(radius)
    }

    /// Same center, each dimension multiplied by `factor` and truncated.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "enlarged extents are truncated toward zero by definition"
    )]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            center2: self.center2,
            size: Size::new(
                (self.size.width as f64 * factor) as i64,
                (self.size.height as f64 * factor) as i64,
            ),
        }
    }
}

/// Writes a twice-coordinate as a plain coordinate with at most one decimal.
fn write_half(f: &mut fmt::Formatter<'_>, v2: i64) -> fmt::Result {
    if v2 < 0 {
        f.write_str("-")?;
    }
    let v2 = v2.unsigned_abs();
    if v2 % 2 == 0 {
        write!(f, "{}", v2 / 2)
    } else {
        write!(f, "{}.5", v2 / 2)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lo = self.twice_min();
        let hi = self.twice_max();
        f.write_str("(")?;
        write_half(f, lo.x)?;
        f.write_str(", ")?;
        write_half(f, lo.y)?;
        f.write_str(") - (")?;
        write_half(f, hi.x)?;
        f.write_str(", ")?;
        write_half(f, hi.y)?;
        f.write_str(")")
    }
}
