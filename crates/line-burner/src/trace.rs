//! Exact all-touched grid walk of a segment in pixel space.
//!
//! Coordinates are fractional (column, row) positions, so pixel `(c, r)`
//! covers `[c, c + 1) × [r, r + 1)`.

/// A pixel crossed by a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchedPixel {
    pub col: usize,
    pub row: usize,
    /// Segment parameter in `[0, 1]` at the middle of the passage through
    /// this pixel.
    pub t: f64,
}

/// Every pixel of a `cols × rows` grid crossed by the segment `start → end`,
/// in walk order.
///
/// The segment is first clipped to the grid plus a one-pixel margin; pixels
/// in the margin are walked but not returned. Where the segment passes
/// exactly through a pixel corner the column step is taken first, so
/// consecutive pixels always share an edge.
pub fn trace_segment(
    start: (f64, f64),
    end: (f64, f64),
    cols: usize,
    rows: usize,
) -> Vec<TouchedPixel> {
    let Some((t_enter, t_exit)) = clip(start, end, cols as f64, rows as f64) else {
        return Vec::new();
    };

    let (dc, dr) = (end.0 - start.0, end.1 - start.1);
    let at = |t: f64| (start.0 + t * dc, start.1 + t * dr);
    let (c_in, r_in) = at(t_enter);
    let (c_out, r_out) = at(t_exit);

    let mut col = c_in.floor() as i64;
    let mut row = r_in.floor() as i64;
    let mut cols_left = ((c_out.floor() as i64) - col).unsigned_abs();
    let mut rows_left = ((r_out.floor() as i64) - row).unsigned_abs();

    let step_col: i64 = if dc > 0.0 { 1 } else { -1 };
    let step_row: i64 = if dr > 0.0 { 1 } else { -1 };

    // Parameter of the next column/row boundary and the spacing between them.
    let (mut t_next_col, t_delta_col) = boundary_params(start.0, dc, col, step_col);
    let (mut t_next_row, t_delta_row) = boundary_params(start.1, dr, row, step_row);

    let mut pixels = Vec::with_capacity((cols_left + rows_left + 1) as usize);
    let mut t_in = t_enter;

    loop {
        let next = match (cols_left, rows_left) {
            (0, 0) => None,
            (_, 0) => Some(Step::Column),
            (0, _) => Some(Step::Row),
            _ if t_next_col <= t_next_row => Some(Step::Column),
            _ => Some(Step::Row),
        };

        let t_out = match next {
            None => t_exit,
            Some(Step::Column) => t_next_col.clamp(t_in, t_exit),
            Some(Step::Row) => t_next_row.clamp(t_in, t_exit),
        };

        if (0..cols as i64).contains(&col) && (0..rows as i64).contains(&row) {
            pixels.push(TouchedPixel {
                col: col as usize,
                row: row as usize,
                t: 0.5 * (t_in + t_out),
            });
        }

        match next {
            None => break,
            Some(Step::Column) => {
                col += step_col;
                t_next_col += t_delta_col;
                cols_left -= 1;
            }
            Some(Step::Row) => {
                row += step_row;
                t_next_row += t_delta_row;
                rows_left -= 1;
            }
        }
        t_in = t_out;
    }

    pixels
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Column,
    Row,
}

fn boundary_params(origin: f64, delta: f64, cell: i64, step: i64) -> (f64, f64) {
    if delta == 0.0 {
        return (f64::INFINITY, f64::INFINITY);
    }
    let boundary = if step > 0 { cell + 1 } else { cell } as f64;
    ((boundary - origin) / delta, 1.0 / delta.abs())
}

/// Liang-Barsky clip of the segment to `[-1, cols + 1] × [-1, rows + 1]`.
///
/// Returns the entry and exit parameters on the original segment.
fn clip(start: (f64, f64), end: (f64, f64), cols: f64, rows: f64) -> Option<(f64, f64)> {
    let (dc, dr) = (end.0 - start.0, end.1 - start.1);
    let edges = [
        (-dc, start.0 + 1.0),
        (dc, cols + 1.0 - start.0),
        (-dr, start.1 + 1.0),
        (dr, rows + 1.0 - start.1),
    ];

    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((t0, t1))
}
