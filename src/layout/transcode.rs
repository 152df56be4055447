//! Conversion between wire geometry and grid geometry
//!
//! The layout API speaks 1-based rows and columns with spans; the grid works in
//! 0-based cells. Spans carry over unchanged in both directions.

use super::error::LayoutError;
use super::types::{GridRect, PenLayout, PlacedPen};

/// Convert placed pens from the wire into grid pens.
///
/// This is where wire geometry gets validated: rows and columns must be at
/// least 1 and spans at least 1.
pub fn to_internal(pens: &[PenLayout]) -> Result<Vec<PlacedPen>, LayoutError> {
    pens.iter().map(pen_to_internal).collect()
}

/// Convert a single wire pen into a grid pen
pub fn pen_to_internal(pen: &PenLayout) -> Result<PlacedPen, LayoutError> {
    let x = one_based_to_cell(pen, "gridCol", pen.grid_col)?;
    let y = one_based_to_cell(pen, "gridRow", pen.grid_row)?;
    let w = span(pen, "colSpan", pen.col_span)?;
    let h = span(pen, "rowSpan", pen.row_span)?;
    let rect = GridRect::new(x, y, w, h)?;
    Ok(PlacedPen::new(
        pen.pen_id,
        pen.pen_name.clone(),
        pen.capacity,
        rect,
    ))
}

/// Convert grid pens back into wire form
pub fn to_external(pens: &[PlacedPen]) -> Vec<PenLayout> {
    pens.iter().map(pen_to_external).collect()
}

/// Convert a single grid pen back into wire form
pub fn pen_to_external(pen: &PlacedPen) -> PenLayout {
    PenLayout {
        pen_id: pen.id,
        pen_name: pen.name.clone(),
        capacity: pen.capacity,
        grid_row: cell_to_wire(pen.rect.y).saturating_add(1),
        grid_col: cell_to_wire(pen.rect.x).saturating_add(1),
        row_span: cell_to_wire(pen.rect.h),
        col_span: cell_to_wire(pen.rect.w),
    }
}

fn one_based_to_cell(pen: &PenLayout, field: &str, value: i32) -> Result<u32, LayoutError> {
    if value < 1 {
        return Err(LayoutError::malformed(
            &pen.pen_name,
            format!("{} must be at least 1 (got {})", field, value),
        ));
    }
    // value >= 1 so the subtraction cannot go negative
    Ok(value.unsigned_abs() - 1)
}

fn span(pen: &PenLayout, field: &str, value: i32) -> Result<u32, LayoutError> {
    if value < 1 {
        return Err(LayoutError::malformed(
            &pen.pen_name,
            format!("{} must be at least 1 (got {})", field, value),
        ));
    }
    Ok(value.unsigned_abs())
}

fn cell_to_wire(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
