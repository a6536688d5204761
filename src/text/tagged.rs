//! Tagged character buffer.
//!
//! Characters live in a rope; per-character tags are stored as a coalesced
//! run list alongside it. A tag references a [`StyleRegistry`] entry and owns
//! one reference per character it covers, so the registry's use-count for a
//! style always equals the number of characters tagged with it.
//!
//! Every mutation validates first and then applies, returning the
//! [`ParagraphSpan`] whose derived glyphs are now stale.

use crate::error::{Error, Result};
use crate::style::Style;
use crate::text::registry::{StyleId, StyleRegistry};
use crate::text::rope::RopeWrapper;
use std::ops::Range;

/// Per-character metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Character is drawn with a registered style.
    Style(StyleId),
}

impl Tag {
    /// The referenced style, if this tag carries one.
    #[must_use]
    pub fn style(self) -> Option<StyleId> {
        match self {
            Self::Style(id) => Some(id),
        }
    }
}

/// A run of `len` consecutive characters sharing a tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagRun {
    pub len: usize,
    pub tag: Option<Tag>,
}

/// Paragraph slots replaced by a mutation.
///
/// Slots `first..first + removed` of the pre-edit paragraph list correspond
/// to slots `first..first + inserted` afterwards; everything else only
/// shifts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParagraphSpan {
    pub first: usize,
    pub removed: usize,
    pub inserted: usize,
}

impl ParagraphSpan {
    /// Whether the mutation changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed == 0 && self.inserted == 0
    }
}

/// Characters plus their tags and the style registry the tags point into.
#[derive(Debug, Default)]
pub struct TaggedText {
    rope: RopeWrapper,
    runs: Vec<TagRun>,
    styles: StyleRegistry,
    revision: u64,
}

impl TaggedText {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of characters.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.is_empty()
    }

    /// Whole text as a string.
    #[must_use]
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Text of a char range.
    pub fn slice(&self, range: Range<usize>) -> Result<String> {
        self.check_range(&range)?;
        Ok(self.rope.slice(range).to_string())
    }

    #[must_use]
    pub fn char_at(&self, pos: usize) -> Option<char> {
        self.rope.char_at(pos)
    }

    /// Content revision; bumps on every successful, non-empty mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The style registry the tags reference.
    #[must_use]
    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// The underlying rope.
    #[must_use]
    pub fn rope(&self) -> &RopeWrapper {
        &self.rope
    }

    /// Coalesced tag runs covering the whole text.
    #[must_use]
    pub fn runs(&self) -> &[TagRun] {
        &self.runs
    }

    /// Tag of the character at `pos`.
    pub fn tag_at(&self, pos: usize) -> Result<Option<Tag>> {
        if pos >= self.len_chars() {
            return Err(self.out_of_range(pos));
        }
        let mut start = 0;
        for run in &self.runs {
            if pos < start + run.len {
                return Ok(run.tag);
            }
            start += run.len;
        }
        Ok(None)
    }

    /// Registered style of the character at `pos` (`None` = default style).
    pub fn style_at(&self, pos: usize) -> Result<Option<&Style>> {
        Ok(self
            .tag_at(pos)?
            .and_then(Tag::style)
            .and_then(|id| self.styles.get(id)))
    }

    /// Tag runs clipped to `range`, with absolute char ranges.
    pub fn runs_in(&self, range: Range<usize>) -> Result<Vec<(Range<usize>, Option<Tag>)>> {
        self.check_range(&range)?;
        let mut out = Vec::new();
        let mut start = 0;
        for run in &self.runs {
            let end = start + run.len;
            if end > range.start && start < range.end {
                out.push((start.max(range.start)..end.min(range.end), run.tag));
            }
            if end >= range.end {
                break;
            }
            start = end;
        }
        Ok(out)
    }

    /// Number of paragraphs.
    #[must_use]
    pub fn paragraph_count(&self) -> usize {
        self.rope.paragraph_count()
    }

    /// Paragraph containing `pos`.
    #[must_use]
    pub fn paragraph_at(&self, pos: usize) -> usize {
        self.rope.paragraph_at(pos)
    }

    /// Content range of a paragraph, excluding its terminator.
    #[must_use]
    pub fn paragraph_range(&self, idx: usize) -> Range<usize> {
        self.rope.paragraph_range(idx)
    }

    /// Offset just past a paragraph's terminator.
    #[must_use]
    pub fn paragraph_end_with_break(&self, idx: usize) -> usize {
        self.rope.paragraph_range_with_break(idx).end
    }

    /// Insert `text` at `pos`, inheriting the tag of the preceding character.
    pub fn insert(&mut self, pos: usize, text: &str) -> Result<ParagraphSpan> {
        if pos > self.len_chars() {
            return Err(self.out_of_range(pos));
        }
        let tag = if pos == 0 { None } else { self.tag_at(pos - 1)? };
        let count = text.chars().count();
        if count == 0 {
            return Ok(ParagraphSpan::default());
        }
        self.reserve_insert(count)?;
        if let Some(id) = tag.and_then(Tag::style) {
            self.styles.retain(id, count)?;
        }
        Ok(self.splice_insert(pos, text, count, tag))
    }

    /// Insert `text` at `pos` tagged with `style`.
    pub fn insert_styled(&mut self, pos: usize, text: &str, style: &Style) -> Result<ParagraphSpan> {
        if pos > self.len_chars() {
            return Err(self.out_of_range(pos));
        }
        let count = text.chars().count();
        if count == 0 {
            return Ok(ParagraphSpan::default());
        }
        self.reserve_insert(count)?;
        let id = self.styles.acquire(style.clone(), count)?;
        Ok(self.splice_insert(pos, text, count, Some(Tag::Style(id))))
    }

    /// Remove a char range, releasing the references its tags held.
    pub fn erase(&mut self, range: Range<usize>) -> Result<ParagraphSpan> {
        self.check_range(&range)?;
        if range.is_empty() {
            return Ok(ParagraphSpan::default());
        }
        let first = self.span_anchor(range.start);
        let old_last = self.rope.paragraph_at(range.end);

        let (at, released) = self.take_runs(range.clone());
        self.release_all(&released)?;
        self.rope.remove(range.clone());
        self.merge_with_previous(at);
        self.bump_revision();

        let new_last = self.rope.paragraph_at(range.start);
        Ok(ParagraphSpan {
            first,
            removed: old_last - first + 1,
            inserted: new_last - first + 1,
        })
    }

    /// Overwrite the tags of a char range; `None` resets to the default
    /// style. The text is unchanged.
    pub fn set_style(&mut self, range: Range<usize>, style: Option<&Style>) -> Result<ParagraphSpan> {
        self.check_range(&range)?;
        if range.is_empty() {
            return Ok(ParagraphSpan::default());
        }
        let count = range.len();
        self.runs.try_reserve(2)?;
        let tag = match style {
            Some(style) => Some(Tag::Style(self.styles.acquire(style.clone(), count)?)),
            None => None,
        };

        let (idx, released) = self.take_runs(range.clone());
        self.runs.insert(idx, TagRun { len: count, tag });
        self.release_all(&released)?;
        self.coalesce_around(idx);
        self.bump_revision();

        let first = self.span_anchor(range.start);
        let last = self.rope.paragraph_at(range.end);
        let n = last - first + 1;
        Ok(ParagraphSpan {
            first,
            removed: n,
            inserted: n,
        })
    }

    /// Remove everything.
    pub fn clear(&mut self) -> Result<ParagraphSpan> {
        self.erase(0..self.len_chars())
    }

    /// Replace the whole text, tagged with `style` (`None` = default style).
    ///
    /// The new content is built aside and swapped in; on failure the current
    /// text is untouched.
    pub fn replace(&mut self, text: &str, style: Option<&Style>) -> Result<ParagraphSpan> {
        let mut fresh = Self::new();
        match style {
            Some(style) => fresh.insert_styled(0, text, style)?,
            None => fresh.insert(0, text)?,
        };
        let removed = self.paragraph_count();
        fresh.revision = self.revision.wrapping_add(1);
        *self = fresh;
        Ok(ParagraphSpan {
            first: 0,
            removed,
            inserted: self.paragraph_count(),
        })
    }

    fn reserve_insert(&mut self, count: usize) -> Result<()> {
        self.len_chars()
            .checked_add(count)
            .ok_or(Error::ResourceExhausted { requested: count })?;
        self.runs.try_reserve(2)?;
        Ok(())
    }

    /// Apply a validated insertion whose references are already taken.
    fn splice_insert(&mut self, pos: usize, text: &str, count: usize, tag: Option<Tag>) -> ParagraphSpan {
        let first = self.span_anchor(pos);
        let old_last = self.rope.paragraph_at(pos);

        let idx = self.split_at(pos);
        self.runs.insert(idx, TagRun { len: count, tag });
        self.rope.insert(pos, text);
        self.coalesce_around(idx);
        self.bump_revision();

        let new_last = self.rope.paragraph_at(pos + count);
        ParagraphSpan {
            first,
            removed: old_last - first + 1,
            inserted: new_last - first + 1,
        }
    }

    /// First paragraph an edit at `pos` can touch. Starts one character
    /// early so an edit joining or splitting a CRLF pair is covered.
    fn span_anchor(&self, pos: usize) -> usize {
        self.rope.paragraph_at(pos.saturating_sub(1))
    }

    /// Split runs so one starts exactly at `pos`; returns its index (or the
    /// run count when `pos` is the end of text).
    fn split_at(&mut self, pos: usize) -> usize {
        let mut start = 0;
        for idx in 0..self.runs.len() {
            let run = self.runs[idx];
            if pos == start {
                return idx;
            }
            if pos < start + run.len {
                let head = pos - start;
                self.runs[idx].len = head;
                self.runs.insert(
                    idx + 1,
                    TagRun {
                        len: run.len - head,
                        tag: run.tag,
                    },
                );
                return idx + 1;
            }
            start += run.len;
        }
        self.runs.len()
    }

    /// Remove the runs covering `range`; returns where they were and the
    /// removed runs.
    fn take_runs(&mut self, range: Range<usize>) -> (usize, Vec<TagRun>) {
        let start_idx = self.split_at(range.start);
        let end_idx = self.split_at(range.end);
        (start_idx, self.runs.drain(start_idx..end_idx).collect())
    }

    fn release_all(&mut self, runs: &[TagRun]) -> Result<()> {
        let mut counts: Vec<(StyleId, usize)> = Vec::new();
        for run in runs {
            if let Some(id) = run.tag.and_then(Tag::style) {
                match counts.iter_mut().find(|(seen, _)| *seen == id) {
                    Some((_, n)) => *n += run.len,
                    None => counts.push((id, run.len)),
                }
            }
        }
        for (id, n) in counts {
            self.styles.release(id, n)?;
        }
        Ok(())
    }

    /// Fold run `idx` into its predecessor when their tags match.
    fn merge_with_previous(&mut self, idx: usize) {
        if idx == 0 || idx >= self.runs.len() {
            return;
        }
        if self.runs[idx - 1].tag == self.runs[idx].tag {
            self.runs[idx - 1].len += self.runs[idx].len;
            self.runs.remove(idx);
        }
    }

    /// Merge a freshly placed run at `idx` with equal neighbours.
    fn coalesce_around(&mut self, idx: usize) {
        self.merge_with_previous(idx + 1);
        self.merge_with_previous(idx);
    }

    fn check_range(&self, range: &Range<usize>) -> Result<()> {
        let len = self.len_chars();
        if range.start > range.end {
            return Err(self.out_of_range(range.start));
        }
        if range.end > len {
            return Err(self.out_of_range(range.end));
        }
        Ok(())
    }

    fn out_of_range(&self, position: usize) -> Error {
        Error::OutOfRange {
            position,
            len: self.len_chars(),
        }
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
