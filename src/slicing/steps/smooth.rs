/// Default minimum length of a blank run that survives smoothing
pub const DEFAULT_MIN_TRUE_RUN: usize = 30;

/// Rewrite every `true` run shorter than `min_true_run` to `false`.
///
/// Thin blank gaps (anti-aliasing fringes, hairline separators) get absorbed
/// into the content around them, so only bands at least `min_true_run` rows
/// tall can split the page. `false` values pass through unchanged and the
/// output always has the input's length.
pub fn apply(rows: &[bool], min_true_run: usize) -> Vec<bool> {
    let mut smoothed = Vec::with_capacity(rows.len());
    let mut run = 0usize;

    for &blank in rows {
        if blank {
            run += 1;
        } else {
            flush_run(&mut smoothed, run, min_true_run);
            run = 0;
            smoothed.push(false);
        }
    }
    flush_run(&mut smoothed, run, min_true_run);

    smoothed
}

fn flush_run(out: &mut Vec<bool>, run: usize, min_true_run: usize) {
    let keep = run >= min_true_run;
    out.extend(std::iter::repeat(keep).take(run));
}
