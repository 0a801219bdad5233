//! Page history reverse diffs
//!
//! Page edits are stored as reverse diffs: hunks that turn the text written by
//! an edit back into the text it replaced. Starting from a page's current
//! content and applying its history newest-first reproduces every earlier
//! revision.
//!
//! # Design
//!
//! - Line based: texts are split on `\n`, joined back with `\n`, so trailing
//!   newlines round-trip exactly
//! - LCS over the region left after trimming the common prefix and suffix
//! - Regions larger than [`MAX_LCS_CELLS`] become one whole-region hunk, so
//!   the work per edit stays bounded
//! - Hunk line numbers refer to the newer text; hunks are in line order and
//!   are applied back to front

use pelilauta_core::schema::{HistoryEntry, Hunk, ReverseDiff};
use pelilauta_core::{Error, Result};

/// Largest LCS table (old lines × new lines) computed for one diff
pub const MAX_LCS_CELLS: usize = 4_000_000;

fn lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Compute the reverse diff turning `new` back into `old`
///
/// Returns an empty diff when the texts are equal.
///
/// # Examples
///
/// ```
/// use pelilauta_engine::history::{apply_reverse, reverse_diff};
///
/// let old = "a\nb\nc";
/// let new = "a\nB\nc\nd";
/// let diff = reverse_diff(old, new);
/// assert_eq!(apply_reverse(new, &diff).unwrap(), old);
/// ```
pub fn reverse_diff(old: &str, new: &str) -> ReverseDiff {
    if old == new {
        return Vec::new();
    }
    let a = lines(old);
    let b = lines(new);

    let prefix = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    let a_mid = &a[prefix..a.len() - suffix];
    let b_mid = &b[prefix..b.len() - suffix];

    let (n, m) = (a_mid.len(), b_mid.len());
    if n.saturating_mul(m) > MAX_LCS_CELLS {
        return vec![Hunk {
            at: prefix,
            delete: m,
            insert: a_mid.iter().map(|l| l.to_string()).collect(),
        }];
    }

    // lcs[i * w + j]: LCS length of a_mid[i..] and b_mid[j..]
    let w = m + 1;
    let mut lcs = vec![0u32; (n + 1) * w];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i * w + j] = if a_mid[i] == b_mid[j] {
                lcs[(i + 1) * w + j + 1] + 1
            } else {
                lcs[(i + 1) * w + j].max(lcs[i * w + j + 1])
            };
        }
    }

    let mut hunks = Vec::new();
    let mut open: Option<Hunk> = None;
    let (mut i, mut j) = (0, 0);
    while i < n || j < m {
        if i < n && j < m && a_mid[i] == b_mid[j] {
            if let Some(h) = open.take() {
                hunks.push(h);
            }
            i += 1;
            j += 1;
            continue;
        }

        let hunk = open.get_or_insert_with(|| Hunk {
            at: prefix + j,
            delete: 0,
            insert: Vec::new(),
        });
        if j == m || (i < n && lcs[(i + 1) * w + j] >= lcs[i * w + j + 1]) {
            // line only in old: put it back
            hunk.insert.push(a_mid[i].to_string());
            i += 1;
        } else {
            // line only in new: remove it
            hunk.delete += 1;
            j += 1;
        }
    }
    if let Some(h) = open {
        hunks.push(h);
    }
    hunks
}

/// Apply a reverse diff to `new`, producing the previous text
///
/// # Errors
///
/// `Validation` if a hunk points outside the text or hunks overlap.
pub fn apply_reverse(new: &str, diff: &[Hunk]) -> Result<String> {
    let mut out: Vec<String> = lines(new).into_iter().map(str::to_string).collect();
    let mut limit = out.len();

    for hunk in diff.iter().rev() {
        let end = hunk.at.checked_add(hunk.delete).unwrap_or(usize::MAX);
        if end > limit {
            return Err(Error::validation(format!(
                "reverse diff hunk at line {} (delete {}) does not apply to {} lines",
                hunk.at,
                hunk.delete,
                out.len()
            )));
        }
        out.splice(hunk.at..end, hunk.insert.iter().cloned());
        limit = hunk.at;
    }
    Ok(out.join("\n"))
}

/// Rebuild the content as it was `steps_back` edits ago
///
/// `history` is oldest first; `steps_back == 0` returns `current`.
///
/// # Errors
///
/// `NotFound` if fewer than `steps_back` edits are recorded.
pub fn reconstruct(current: &str, history: &[HistoryEntry], steps_back: usize) -> Result<String> {
    if steps_back > history.len() {
        return Err(Error::not_found(format!(
            "revision {} back (only {} recorded)",
            steps_back,
            history.len()
        )));
    }
    history
        .iter()
        .rev()
        .take(steps_back)
        .try_fold(current.to_string(), |text, entry| apply_reverse(&text, &entry.change))
}
