use std::{iter::StepBy, ops::Range};

/// Iterator over the reduced images of a 7-pass (Adam7) interlaced raster,
/// in stream order. Passes with no pixels are skipped entirely.
pub(crate) struct Adam7Passes {
    current_pass: Option<usize>,
    width: usize,
    height: usize,
}

impl Adam7Passes {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Self {
            current_pass: Some(0),
            width,
            height,
        }
    }

    const STARTING_ROW: [usize; 7] = [0, 0, 4, 0, 2, 0, 1];
    const STARTING_COL: [usize; 7] = [0, 4, 0, 2, 0, 1, 0];
    const ROW_STEP: [usize; 7] = [8, 8, 8, 4, 4, 2, 2];
    const COL_STEP: [usize; 7] = [8, 8, 4, 4, 2, 2, 1];
}

impl Iterator for Adam7Passes {
    type Item = Pass;

    fn next(&mut self) -> Option<Self::Item> {
        let mut pass = self.current_pass?;
        while pass < 7 {
            let width = self
                .width
                .saturating_sub(Self::STARTING_COL[pass])
                .div_ceil(Self::COL_STEP[pass]);
            let height = self
                .height
                .saturating_sub(Self::STARTING_ROW[pass])
                .div_ceil(Self::ROW_STEP[pass]);
            if width == 0 || height == 0 {
                pass += 1;
                continue;
            }
            self.current_pass = if pass == 6 { None } else { Some(pass + 1) };
            return Some(Pass {
                width,
                height,
                pixel_indices: PassIndices::new(
                    (Self::STARTING_ROW[pass]..self.height).step_by(Self::ROW_STEP[pass]),
                    (Self::STARTING_COL[pass]..self.width).step_by(Self::COL_STEP[pass]),
                    self.width,
                ),
            });
        }
        self.current_pass = None;
        None
    }
}

#[derive(Debug)]
pub(crate) struct Pass {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) pixel_indices: PassIndices,
}

/// Row-major raster indices the pass's pixels land on, in pass scan order.
#[derive(Debug)]
pub(crate) struct PassIndices {
    rows: StepBy<Range<usize>>,
    current_row: Option<usize>,
    column_template: StepBy<Range<usize>>,
    columns: StepBy<Range<usize>>,
    image_width: usize,
}

impl PassIndices {
    fn new(
        mut rows: StepBy<Range<usize>>,
        columns: StepBy<Range<usize>>,
        image_width: usize,
    ) -> Self {
        let current_row = rows.next();
        Self {
            rows,
            current_row,
            column_template: columns.clone(),
            columns,
            image_width,
        }
    }
}

impl Iterator for PassIndices {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(column) = self.columns.next() {
            return Some(self.current_row? * self.image_width + column);
        }
        self.current_row = Some(self.rows.next()?);
        self.columns = self.column_template.clone();
        Some(self.current_row? * self.image_width + self.columns.next()?)
    }
}

#[cfg(test)]
mod tests {
    use super::Adam7Passes;

    #[test]
    fn calculates_pass_dimensions() {
        let passes = Adam7Passes::new(8, 8);
        let expected_dimensions = [(1, 1), (1, 1), (2, 1), (2, 2), (4, 2), (4, 4), (8, 4)];
        for (pass, expected) in passes.zip(expected_dimensions) {
            assert_eq!((pass.width, pass.height), expected);
        }

        let passes = Adam7Passes::new(9, 9);
        let expected_dimensions = [(2, 2), (1, 2), (3, 1), (2, 3), (5, 2), (4, 5), (9, 4)];
        for (pass, expected) in passes.zip(expected_dimensions) {
            assert_eq!((pass.width, pass.height), expected);
        }

        let passes = Adam7Passes::new(16, 16);
        let expected_dimensions = [(2, 2), (2, 2), (4, 2), (4, 4), (8, 4), (8, 8), (16, 8)];
        for (pass, expected) in passes.zip(expected_dimensions) {
            assert_eq!((pass.width, pass.height), expected);
        }

        // Small images skip the passes that have no pixels.
        let passes = Adam7Passes::new(4, 4);
        let expected_dimensions = [(1, 1), (1, 1), (2, 1), (2, 2), (4, 2)];
        for (pass, expected) in passes.zip(expected_dimensions) {
            assert_eq!((pass.width, pass.height), expected);
        }
    }

    #[test]
    fn yields_pixel_indices_in_pass_order() {
        let passes = Adam7Passes::new(8, 8);
        let expected_indices: [&[usize]; 7] = [
            &[0],
            &[4],
            &[32, 36],
            &[2, 6, 34, 38],
            &[16, 18, 20, 22, 48, 50, 52, 54],
            &[1, 3, 5, 7, 17, 19, 21, 23, 33, 35, 37, 39, 49, 51, 53, 55],
            &[
                8, 9, 10, 11, 12, 13, 14, 15, 24, 25, 26, 27, 28, 29, 30, 31, 40, 41, 42, 43, 44,
                45, 46, 47, 56, 57, 58, 59, 60, 61, 62, 63,
            ],
        ];
        for (pass, expected) in passes.zip(expected_indices) {
            assert_eq!(pass.pixel_indices.collect::<Vec<_>>(), expected);
        }

        let passes = Adam7Passes::new(9, 9);
        let expected_lengths = [4, 2, 3, 6, 10, 20, 36];
        for (pass, expected) in passes.zip(expected_lengths) {
            assert_eq!(pass.pixel_indices.count(), expected);
        }
    }

    #[test]
    fn indices_use_the_image_width_on_non_square_rasters() {
        let passes = Adam7Passes::new(4, 2);
        let expected_dimensions = [(1, 1), (1, 1), (2, 1), (4, 1)];
        let expected_indices: [&[usize]; 4] = [&[0], &[2], &[1, 3], &[4, 5, 6, 7]];
        for (pass, (expected_dims, expected)) in
            passes.zip(expected_dimensions.into_iter().zip(expected_indices))
        {
            assert_eq!((pass.width, pass.height), expected_dims);
            assert_eq!(pass.pixel_indices.collect::<Vec<_>>(), expected);
        }

        let passes = Adam7Passes::new(3, 5);
        let expected_indices: [&[usize]; 6] = [
            &[0],
            &[12],
            &[2, 14],
            &[6, 8],
            &[1, 7, 13],
            &[3, 4, 5, 9, 10, 11],
        ];
        let mut all: Vec<usize> = Vec::new();
        for (pass, expected) in passes.zip(expected_indices) {
            let indices: Vec<usize> = pass.pixel_indices.collect();
            assert_eq!(indices, expected);
            all.extend(indices);
        }
        // Every raster position is covered exactly once.
        all.sort_unstable();
        assert_eq!(all, (0..15).collect::<Vec<_>>());
    }
}
