// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlapping 3×3 partition topology.

use crate::config::FieldConfig;
use crate::topology::{Cells, Topology};
use crate::types::{Point, Rect, Size};

/// Nine half-size children per field, stepped by a quarter of the extent.
///
/// Neighboring children overlap by half their extent, so an object near a
/// cell boundary still fits entirely inside some cell. Adjacent fields produce
/// some identical cells; those are created once and shared. Operating bounds
/// equal actual bounds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Partition;

impl Topology for Partition {
    const FAN_OUT: usize = 9;
    const SHARES_CHILDREN: bool = true;

    fn from_config(_config: &FieldConfig) -> Self {
        Self
    }

    fn initial_root(&self, config: &FieldConfig) -> Option<Rect> {
        Some(config.extent())
    }

    fn operating_bounds(&self, actual: Rect) -> Rect {
        actual
    }

    fn cells(&self, actual: Rect) -> Cells {
        let size = Size::new(actual.width() / 2, actual.height() / 2);
        let c = actual.twice_center();
        let mut out = Cells::new();
        for j in -1..=1 {
            for i in -1..=1 {
                let center = Point::new(c.x + i * size.width, c.y + j * size.height);
                out.push(Rect::from_twice_center(center, size));
            }
        }
        out
    }
}
