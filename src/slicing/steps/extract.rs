use serde::Serialize;

/// Inclusive span of rows, `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowRange {
    pub start: u32,
    pub end: u32,
}

impl RowRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Number of rows covered
    pub fn height(&self) -> u32 {
        self.end - self.start + 1
    }
}

/// Collect every maximal run of `false` rows as an inclusive range.
///
/// `false` rows are the ones that are not blank, so the ranges are the content
/// sections to cut out, even though older callers described them as "blank
/// regions". Ranges come back in ascending order.
pub fn apply(rows: &[bool]) -> Vec<RowRange> {
    let mut ranges = Vec::new();
    let mut current: Option<RowRange> = None;

    for (i, &blank) in rows.iter().enumerate() {
        let i = i as u32;
        if blank {
            if let Some(range) = current.take() {
                ranges.push(range);
            }
        } else {
            match current.as_mut() {
                Some(range) => range.end = i,
                None => current = Some(RowRange::new(i, i)),
            }
        }
    }

    // A run still open at the bottom of the image
    if let Some(range) = current {
        ranges.push(range);
    }

    ranges
}
