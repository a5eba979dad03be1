// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The capability a user object needs to be indexed.

use crate::types::{Point, Rect, Size};

/// An object with an integer axis-aligned bounding box.
///
/// Equality is the identity used by removal: two objects that compare equal
/// are interchangeable as far as the tree is concerned.
pub trait Spatial: PartialEq {
    /// Horizontal center of the bounding box.
    fn center_x(&self) -> i64;
    /// Vertical center of the bounding box.
    fn center_y(&self) -> i64;
    /// Width of the bounding box.
    fn width(&self) -> i64;
    /// Height of the bounding box.
    fn height(&self) -> i64;

    /// The bounding box assembled from the accessors above.
    ///
    /// The tree reads objects only through this method. Override it when the
    /// integer accessors cannot express the exact box.
    fn bounds(&self) -> Rect {
        Rect::new(
            Point::new(self.center_x(), self.center_y()),
            Size::new(self.width(), self.height()),
        )
    }
}

/// A rectangle with a half-unit center reports [`Rect::center`], rounded
/// toward negative infinity, from `center_x` and `center_y`. Its `bounds` is
/// the rectangle itself, so the tree always sees the exact box.
impl Spatial for Rect {
    fn center_x(&self) -> i64 {
        self.center().x
    }

    fn center_y(&self) -> i64 {
        self.center().y
    }

    fn width(&self) -> i64 {
        Self::width(self)
    }

    fn height(&self) -> i64 {
        Self::height(self)
    }

    fn bounds(&self) -> Rect {
        *self
    }
}

/// A user object paired with the bounding box captured when it was inserted.
///
/// Later changes to the object's geometry are not observed by the tree.
#[derive(Clone, Debug)]
pub struct SpatialObj<T> {
    obj: T,
    bounds: Rect,
}

impl<T: Spatial> SpatialObj<T> {
    /// Capture `obj` together with its current bounds.
    pub fn new(obj: T) -> Self {
        let bounds = obj.bounds();
        Self { obj, bounds }
    }
}

impl<T> SpatialObj<T> {
    /// The wrapped object.
    pub const fn get(&self) -> &T {
        &self.obj
    }

    /// The bounds captured at insertion.
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Unwrap the object.
    pub fn into_inner(self) -> T {
        self.obj
    }
}

impl<T: PartialEq> PartialEq for SpatialObj<T> {
    fn eq(&self, other: &Self) -> bool {
        self.obj == other.obj
    }
}
