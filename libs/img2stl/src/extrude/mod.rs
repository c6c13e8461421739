//! Voxel extrusion of a mask into a closed triangle surface.
//!
//! Every foreground cell becomes a `scale x scale x thickness` cuboid. Top and
//! bottom faces are always emitted; a side face is emitted only when the
//! neighbor on that side is background or outside the mask, so walls between
//! two foreground cells never appear.
//!
//! Mask row 0 is placed at the top of the model (largest y).

use std::ops::Range;

use glam::DVec3;
use log::debug;
use rayon::prelude::*;

use crate::mask::Mask;
use crate::mesh::Triangle;

/// Numeric inputs of the extruder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeParams {
    /// Depth along +Z in millimeters.
    pub thickness: f64,
    /// Millimeters per mask cell edge.
    pub scale: f64,
}

impl ExtrudeParams {
    /// Creates extrusion parameters.
    pub fn new(thickness: f64, scale: f64) -> Self {
        Self { thickness, scale }
    }
}

/// Extrudes the whole mask.
///
/// Cells are visited row-major; per cell the order is top, bottom, then the
/// sides toward x-1, x+1, y+1 and y-1.
///
/// # Examples
/// ```
/// use img2stl::{extrude::{extrude, ExtrudeParams}, Mask};
///
/// let mask = Mask::from_ascii(&["#"]).unwrap();
/// let triangles = extrude(&mask, ExtrudeParams::new(2.0, 1.0));
/// assert_eq!(triangles.len(), 12);
/// ```
pub fn extrude(mask: &Mask, params: ExtrudeParams) -> Vec<Triangle> {
    let triangles = extrude_rows(mask, 0..mask.height(), params);
    debug!(
        "extruded {}x{} mask into {} triangles",
        mask.width(),
        mask.height(),
        triangles.len()
    );
    triangles
}

/// Extrudes only the rows in `rows`. Neighbor tests still see the whole
/// mask, so concatenating consecutive shards equals [`extrude`].
///
/// # Examples
/// ```
/// use img2stl::{extrude::{extrude, extrude_rows, ExtrudeParams}, Mask};
///
/// let mask = Mask::from_ascii(&["##", "#."]).unwrap();
/// let params = ExtrudeParams::new(1.0, 1.0);
/// let mut sharded = extrude_rows(&mask, 0..1, params);
/// sharded.extend(extrude_rows(&mask, 1..2, params));
/// assert_eq!(sharded, extrude(&mask, params));
/// ```
pub fn extrude_rows(mask: &Mask, rows: Range<usize>, params: ExtrudeParams) -> Vec<Triangle> {
    let rows = rows.start.min(mask.height())..rows.end.min(mask.height());
    let mut triangles = Vec::new();
    for y in rows {
        extrude_row(mask, y, params, &mut triangles);
    }
    triangles
}

/// Extrudes rows on the rayon pool and concatenates them in row order.
///
/// The output is identical to [`extrude`].
pub fn extrude_parallel(mask: &Mask, params: ExtrudeParams) -> Vec<Triangle> {
    let triangles: Vec<Triangle> = (0..mask.height())
        .into_par_iter()
        .flat_map_iter(|y| {
            let mut row = Vec::new();
            extrude_row(mask, y, params, &mut row);
            row
        })
        .collect();
    debug!(
        "extruded {}x{} mask into {} triangles on {} threads",
        mask.width(),
        mask.height(),
        triangles.len(),
        rayon::current_num_threads()
    );
    triangles
}

fn extrude_row(mask: &Mask, y: usize, params: ExtrudeParams, out: &mut Vec<Triangle>) {
    for (x, &cell) in mask.row(y).iter().enumerate() {
        if cell {
            extrude_cell(mask, x, y, params, out);
        }
    }
}

/// Side of a cell, named by the mask-space neighbor it faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    /// x - 1
    Left,
    /// x + 1
    Right,
    /// y + 1, the lower row on the model
    Bottom,
    /// y - 1, the upper row on the model
    Top,
}

impl Side {
    const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Bottom, Side::Top];

    fn offset(self) -> (isize, isize) {
        match self {
            Side::Left => (-1, 0),
            Side::Right => (1, 0),
            Side::Bottom => (0, 1),
            Side::Top => (0, -1),
        }
    }
}

fn exposed_sides(mask: &Mask, x: isize, y: isize) -> impl Iterator<Item = Side> + '_ {
    Side::ALL.into_iter().filter(move |side| {
        let (dx, dy) = side.offset();
        !mask.is_foreground(x + dx, y + dy)
    })
}

fn extrude_cell(mask: &Mask, x: usize, y: usize, params: ExtrudeParams, out: &mut Vec<Triangle>) {
    let k = params.scale;
    let z1 = params.thickness;
    let x0 = x as f64 * k;
    let x1 = (x + 1) as f64 * k;
    // flip so row 0 ends up on top
    let y0 = (mask.height() - y - 1) as f64 * k;
    let y1 = (mask.height() - y) as f64 * k;

    let p = |px: f64, py: f64, pz: f64| DVec3::new(px, py, pz);

    // top, facing +Z
    quad(out, p(x0, y0, z1), p(x1, y0, z1), p(x1, y1, z1), p(x0, y1, z1));
    // bottom, facing -Z
    quad(out, p(x0, y0, 0.0), p(x0, y1, 0.0), p(x1, y1, 0.0), p(x1, y0, 0.0));

    for side in exposed_sides(mask, x as isize, y as isize) {
        match side {
            // x = x0, facing -X
            Side::Left => quad(out, p(x0, y0, 0.0), p(x0, y0, z1), p(x0, y1, z1), p(x0, y1, 0.0)),
            // x = x1, facing +X
            Side::Right => quad(out, p(x1, y0, 0.0), p(x1, y1, 0.0), p(x1, y1, z1), p(x1, y0, z1)),
            // y = y0, facing -Y
            Side::Bottom => quad(out, p(x0, y0, 0.0), p(x1, y0, 0.0), p(x1, y0, z1), p(x0, y0, z1)),
            // y = y1, facing +Y
            Side::Top => quad(out, p(x0, y1, 0.0), p(x0, y1, z1), p(x1, y1, z1), p(x1, y1, 0.0)),
        }
    }
}

/// Splits the counter-clockwise quad `a b c d` into `a b c` and `a c d`.
#[inline]
fn quad(out: &mut Vec<Triangle>, a: DVec3, b: DVec3, c: DVec3, d: DVec3) {
    out.push(Triangle::new(a, b, c));
    out.push(Triangle::new(a, c, d));
}
