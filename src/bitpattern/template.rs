use crate::bitpattern::record::BitPayload;

/// Coded payload cells per data row, calibration pixels excluded.
pub const BITS_PER_ROW: usize = 96;
/// Number of data rows.
pub const DATA_ROWS: usize = 2;
/// Black rows above the calibration row.
pub const MARGIN_ROWS_BEFORE: usize = 2;
/// Black rows below the last data row.
pub const MARGIN_ROWS_AFTER: usize = 1;
/// Black columns left of the pattern.
pub const MARGIN_COLS_BEFORE: usize = 5;
/// Black columns right of the pattern.
pub const MARGIN_COLS_AFTER: usize = 3;
/// Calibration pixels at the start of each data row.
pub const CALIBRATION_COLS: usize = 2;

/// Template height: margins, one calibration row and the data rows.
pub const TEMPLATE_HEIGHT: usize = MARGIN_ROWS_BEFORE + 1 + DATA_ROWS + MARGIN_ROWS_AFTER;
/// Template width: margins, calibration columns and the coded cells.
pub const TEMPLATE_WIDTH: usize =
    MARGIN_COLS_BEFORE + CALIBRATION_COLS + BITS_PER_ROW + MARGIN_COLS_AFTER;

/// The low-resolution bit pattern, one cell per bit, before any scaling.
///
/// Row `MARGIN_ROWS_BEFORE` is the calibration row (`1,0,1,0,...` across the calibration
/// columns and the payload width). Each data row starts with two calibration cells valued
/// `(column + row) % 2`, followed by payload bits `row * BITS_PER_ROW ..`. Everything else is black.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitPatternTemplate {
    cells: [[u8; TEMPLATE_WIDTH]; TEMPLATE_HEIGHT],
}

impl BitPatternTemplate {
    /// Lay out `payload` into a fresh template.
    pub fn build(payload: BitPayload) -> Self {
        let mut cells = [[0u8; TEMPLATE_WIDTH]; TEMPLATE_HEIGHT];
        let cal_row = MARGIN_ROWS_BEFORE;
        let x0 = MARGIN_COLS_BEFORE;

        for i in 0..(BITS_PER_ROW + CALIBRATION_COLS) {
            cells[cal_row][x0 + i] = 1 - (i % 2) as u8;
        }

        for row in 0..DATA_ROWS {
            let y = cal_row + 1 + row;
            for col in 0..CALIBRATION_COLS {
                cells[y][x0 + col] = ((col + row) % 2) as u8;
            }
            for i in 0..BITS_PER_ROW {
                cells[y][x0 + CALIBRATION_COLS + i] = payload.bit(row * BITS_PER_ROW + i);
            }
        }

        Self { cells }
    }

    /// Cell value (0 or 1) at `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    /// Template size as `(width, height)` in cells.
    pub fn dimensions(&self) -> (usize, usize) {
        (TEMPLATE_WIDTH, TEMPLATE_HEIGHT)
    }

    /// Read the payload cells back, inverse of [`BitPatternTemplate::build`].
    pub fn payload(&self) -> BitPayload {
        let mut v = 0u128;
        for row in 0..DATA_ROWS {
            let y = MARGIN_ROWS_BEFORE + 1 + row;
            for i in 0..BITS_PER_ROW {
                let k = row * BITS_PER_ROW + i;
                if k < 128 && self.cells[y][MARGIN_COLS_BEFORE + CALIBRATION_COLS + i] == 1 {
                    v |= 1u128 << k;
                }
            }
        }
        BitPayload(v)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bitpattern/template.rs"]
mod tests;
