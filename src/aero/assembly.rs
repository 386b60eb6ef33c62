//! Global system layout: surfaces in fixed order, contiguous rows/columns.

use crate::aero::influence::CrossBlocks;
use crate::aero::panel::{PerSurface, Surface};
use crate::error::{SimError, SimResult};
use nalgebra::{DMatrix, DVector};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemLayout {
    sizes: [usize; 4],
    offsets: [usize; 4],
}

impl SystemLayout {
    pub fn new(sizes: &PerSurface<usize>) -> Self {
        let sizes = Surface::ALL.map(|s| sizes[s]);
        let mut offsets = [0; 4];
        for i in 1..4 {
            offsets[i] = offsets[i - 1] + sizes[i - 1];
        }
        Self { sizes, offsets }
    }

    pub fn total(&self) -> usize {
        self.offsets[3] + self.sizes[3]
    }

    pub fn size(&self, surface: Surface) -> usize {
        self.sizes[surface.index()]
    }

    pub fn range(&self, surface: Surface) -> Range<usize> {
        let start = self.offsets[surface.index()];
        start..start + self.sizes[surface.index()]
    }

    /// Concatenate per-surface vectors in layout order.
    pub fn stack(&self, parts: &PerSurface<Vec<f64>>) -> SimResult<DVector<f64>> {
        let mut out = DVector::zeros(self.total());
        for surface in Surface::ALL {
            let part = &parts[surface];
            if part.len() != self.size(surface) {
                return Err(SimError::DimensionMismatch {
                    context: "right-hand side segment",
                    expected: self.size(surface),
                    found: part.len(),
                });
            }
            out.rows_mut(self.offsets[surface.index()], part.len())
                .copy_from_slice(part);
        }
        Ok(out)
    }

    /// Split a global vector back into per-surface segments.
    pub fn split(&self, global: &DVector<f64>) -> PerSurface<Vec<f64>> {
        PerSurface::from_fn(|s| global.as_slice()[self.range(s)].to_vec())
    }

    /// Lay the four diagonal and twelve off-diagonal blocks into one matrix.
    pub fn assemble(&self, self_blocks: &PerSurface<DMatrix<f64>>, cross: &CrossBlocks) -> SimResult<DMatrix<f64>> {
        let mut matrix = DMatrix::zeros(self.total(), self.total());
        for target in Surface::ALL {
            for source in Surface::ALL {
                let block = if target == source {
                    &self_blocks[target]
                } else {
                    cross.get(&(target, source)).ok_or(SimError::DimensionMismatch {
                        context: "missing cross-influence block",
                        expected: 12,
                        found: cross.len(),
                    })?
                };
                self.check_block(target, source, block)?;
                let rows = self.range(target);
                let cols = self.range(source);
                matrix
                    .view_mut((rows.start, cols.start), (rows.len(), cols.len()))
                    .copy_from(block);
            }
        }
        Ok(matrix)
    }

    fn check_block(&self, target: Surface, source: Surface, block: &DMatrix<f64>) -> SimResult<()> {
        if block.nrows() != self.size(target) {
            return Err(SimError::DimensionMismatch {
                context: "influence block rows",
                expected: self.size(target),
                found: block.nrows(),
            });
        }
        if block.ncols() != self.size(source) {
            return Err(SimError::DimensionMismatch {
                context: "influence block columns",
                expected: self.size(source),
                found: block.ncols(),
            });
        }
        Ok(())
    }
}
