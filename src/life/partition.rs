//! Row-band partitioning.
//!
//! `height / threads` rows per band; the `height % threads` leftover rows all
//! go to the last band. Bands past the end of the grid are empty and their
//! workers finish immediately.

use std::ops::Range;

/// Contiguous row range `[start, end)` owned by one worker for one generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Band {
    pub start: usize,
    pub end: usize,
}

impl Band {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Iterator over the `threads` bands covering `[0, height)`.
#[derive(Clone, Debug)]
pub struct Bands {
    height: usize,
    base: usize,
    threads: usize,
    next: usize,
}

/// Split `height` rows into `threads` bands.
///
/// # Panics
/// If `threads` is zero.
pub fn bands(height: usize, threads: usize) -> Bands {
    assert!(threads > 0, "partitioning requires at least one worker");
    Bands {
        height,
        base: height / threads,
        threads,
        next: 0,
    }
}

impl Iterator for Bands {
    type Item = Band;

    fn next(&mut self) -> Option<Band> {
        if self.next == self.threads {
            return None;
        }
        let i = self.next;
        self.next += 1;

        let start = i * self.base;
        let end = if i + 1 == self.threads {
            self.height
        } else {
            start + self.base
        };
        Some(Band { start, end })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.threads - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Bands {}

#[cfg(test)]
mod tests {
    use super::{Band, bands};

    fn assert_covers(height: usize, threads: usize) {
        let all: Vec<Band> = bands(height, threads).collect();
        assert_eq!(all.len(), threads);

        let mut expect = 0;
        for band in &all {
            assert_eq!(band.start, expect, "gap or overlap at {height}/{threads}");
            assert!(band.end >= band.start);
            expect = band.end;
        }
        assert_eq!(expect, height);

        let base = height / threads;
        for band in &all[..threads - 1] {
            assert_eq!(band.len(), base);
        }
        assert_eq!(all[threads - 1].len(), base + height % threads);
    }

    #[test]
    fn bands_cover_height_exactly() {
        for height in 0..70 {
            for threads in 1..=20 {
                assert_covers(height, threads);
            }
        }
        assert_covers(512, 16);
        assert_covers(512, 7);
    }

    #[test]
    fn remainder_goes_to_last_band() {
        let all: Vec<Band> = bands(10, 3).collect();
        assert_eq!(
            all,
            vec![
                Band { start: 0, end: 3 },
                Band { start: 3, end: 6 },
                Band { start: 6, end: 10 },
            ]
        );
    }

    #[test]
    fn more_threads_than_rows_yields_empty_bands() {
        let all: Vec<Band> = bands(3, 5).collect();
        assert!(all[..4].iter().all(Band::is_empty));
        assert_eq!(all[4], Band { start: 0, end: 3 });
    }

    #[test]
    #[should_panic(expected = "at least one worker")]
    fn zero_threads_panics() {
        let _ = bands(8, 0);
    }
}
