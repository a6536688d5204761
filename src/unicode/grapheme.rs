//! Grapheme cluster iteration with character offsets.

use unicode_segmentation::UnicodeSegmentation;

/// One extended grapheme cluster of a string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cluster<'a> {
    /// Byte offset of the cluster in the source string.
    pub byte_offset: usize,
    /// Char offset of the cluster in the source string.
    pub char_offset: usize,
    /// Number of chars in the cluster.
    pub char_len: usize,
    pub text: &'a str,
}

/// Iterate over extended grapheme clusters with byte and char offsets.
pub fn clusters(s: &str) -> impl Iterator<Item = Cluster<'_>> {
    let mut char_offset = 0usize;
    s.grapheme_indices(true).map(move |(byte_offset, text)| {
        let char_len = text.chars().count();
        let cluster = Cluster {
            byte_offset,
            char_offset,
            char_len,
            text,
        };
        char_offset += char_len;
        cluster
    })
}

/// Char offset of the first cluster boundary strictly after `char_idx`
/// (or the end of `s`).
#[must_use]
pub fn next_cluster_boundary(s: &str, char_idx: usize) -> usize {
    let mut end = 0;
    for cluster in clusters(s) {
        end = cluster.char_offset + cluster.char_len;
        if end > char_idx {
            return end;
        }
    }
    end.max(char_idx)
}

/// Char offset of the last cluster boundary strictly before `char_idx`
/// (or 0).
#[must_use]
pub fn prev_cluster_boundary(s: &str, char_idx: usize) -> usize {
    let mut prev = 0;
    for cluster in clusters(s) {
        if cluster.char_offset >= char_idx {
            break;
        }
        prev = cluster.char_offset;
    }
    prev
}
