use std::collections::HashMap;

use tracing::warn;

use super::{Child, MeasureConstraints, Measurer, Placement, Slot, Strategy};
use crate::{
    NodeId,
    geom::{BoundingBox, Expanse},
};

/// A uniform grid. Cell sizes are the padded box divided evenly by the row
/// and column counts. Children outside the grid or without a cell placement
/// are logged and not placed, and a cell holds at most one child; the last
/// one wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub columns: usize,
    /// Inset on every side.
    pub padding: f32,
}

impl Grid {
    /// The child occupying each in-range cell.
    fn cells(&self, children: &[Child]) -> HashMap<(usize, usize), NodeId> {
        let mut out = HashMap::new();
        for child in children {
            match child.placement {
                Placement::Cell { row, column } if row < self.rows && column < self.columns => {
                    out.insert((row, column), child.id);
                }
                Placement::Cell { row, column } => {
                    warn!(
                        row,
                        column,
                        rows = self.rows,
                        columns = self.columns,
                        "grid cell out of range"
                    );
                }
                other => {
                    warn!(node = ?child.id, placement = ?other, "grid child without a cell");
                }
            }
        }
        out
    }
}

impl Strategy for Grid {
    fn measure(
        &self,
        children: &[Child],
        c: MeasureConstraints,
        m: &mut dyn Measurer,
    ) -> Expanse {
        if self.rows == 0 || self.columns == 0 {
            return Expanse::zero().pad(self.padding);
        }
        let inner = c.shrink(self.padding);
        let cell = MeasureConstraints {
            width: inner.width.map(|w| w / self.columns as f32),
            height: inner.height.map(|h| h / self.rows as f32),
        };
        let largest = self
            .cells(children)
            .values()
            .map(|id| m.measure(*id, cell))
            .fold(Expanse::zero(), |acc, s| {
                Expanse::new(acc.w.max(s.w), acc.h.max(s.h))
            });
        Expanse::new(
            largest.w * self.columns as f32,
            largest.h * self.rows as f32,
        )
        .pad(self.padding)
    }

    fn arrange(
        &mut self,
        area: BoundingBox,
        children: &[Child],
        _m: &mut dyn Measurer,
    ) -> Vec<Slot> {
        if self.rows == 0 || self.columns == 0 {
            return Vec::new();
        }
        let inner = area.inset(self.padding);
        let cell_w = inner.width / self.columns as f32;
        let cell_h = inner.height / self.rows as f32;
        let mut cells: Vec<_> = self.cells(children).into_iter().collect();
        cells.sort_by_key(|(cell, _)| *cell);
        cells
            .into_iter()
            .map(|((row, column), id)| {
                let bbox = BoundingBox::new(
                    inner.x + column as f32 * cell_w,
                    inner.y + row as f32 * cell_h,
                    cell_w,
                    cell_h,
                );
                Slot::new(id, bbox)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geom::Point,
        layout::testutil::{FixedMeasurer, children},
    };

    #[test]
    fn cells_are_uniform() {
        let mut m = FixedMeasurer::default();
        let a = m.sized(None, None);
        let b = m.sized(None, None);
        let kids = children(&[
            (a, Placement::Cell { row: 0, column: 0 }),
            (b, Placement::Cell { row: 1, column: 2 }),
        ]);
        let mut g = Grid {
            rows: 2,
            columns: 3,
            padding: 0.0,
        };
        let slots = g.arrange(BoundingBox::new(10.0, 0.0, 90.0, 40.0), &kids, &mut m);
        assert_eq!(slots[0].bbox, BoundingBox::new(10.0, 0.0, 30.0, 20.0));
        assert_eq!(slots[1].bbox, BoundingBox::new(70.0, 20.0, 30.0, 20.0));
    }

    #[test]
    fn out_of_range_cells_are_skipped() {
        let mut m = FixedMeasurer::default();
        let a = m.sized(None, None);
        let b = m.sized(None, None);
        let kids = children(&[
            (a, Placement::Cell { row: 2, column: 0 }),
            (b, Placement::Flow),
        ]);
        let mut g = Grid {
            rows: 2,
            columns: 2,
            padding: 0.0,
        };
        assert!(
            g.arrange(BoundingBox::new(0.0, 0.0, 10.0, 10.0), &kids, &mut m)
                .is_empty()
        );
    }

    #[test]
    fn children_without_cells_are_skipped_beside_placed_ones() {
        let mut m = FixedMeasurer::default();
        let a = m.sized(None, None);
        let b = m.sized(None, None);
        let c = m.sized(None, None);
        let kids = children(&[
            (a, Placement::Flow),
            (b, Placement::Cell { row: 1, column: 1 }),
            (c, Placement::At(Point::new(1.0, 1.0))),
        ]);
        let mut g = Grid {
            rows: 2,
            columns: 2,
            padding: 0.0,
        };
        let slots = g.arrange(BoundingBox::new(0.0, 0.0, 10.0, 10.0), &kids, &mut m);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].id, b);
        assert_eq!(slots[0].bbox, BoundingBox::new(5.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn measure_uses_largest_cell() {
        let mut m = FixedMeasurer::default();
        let a = m.fixed(4.0, 2.0);
        let b = m.fixed(3.0, 6.0);
        let kids = children(&[
            (a, Placement::Cell { row: 0, column: 0 }),
            (b, Placement::Cell { row: 0, column: 1 }),
        ]);
        let g = Grid {
            rows: 1,
            columns: 2,
            padding: 1.0,
        };
        assert_eq!(
            g.measure(&kids, MeasureConstraints::unbounded(), &mut m),
            Expanse::new(10.0, 8.0)
        );
    }
}
