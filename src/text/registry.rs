//! Deduplicated, reference-counted style storage.
//!
//! Character tags hold [`StyleId`]s into a [`StyleRegistry`]. Each tagged
//! character owns one reference; an entry is reclaimed, and its slot
//! recycled, when the last reference is released.

use crate::error::{Error, Result};
use crate::log::{LogLevel, emit_log_with};
use crate::style::Style;
use std::cell::Cell;
use std::collections::BTreeMap;

/// Stable handle to a registry entry.
///
/// Ids are only meaningful for the registry that issued them and only while
/// the entry is referenced; a reclaimed slot may be reissued for a different
/// style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StyleId(u32);

impl StyleId {
    /// Raw slot index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct StyleEntry {
    style: Style,
    use_count: Cell<usize>,
}

/// Set of styles ordered for deduplication, with per-entry use-counts.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    entries: Vec<Option<StyleEntry>>,
    free_list: Vec<u32>,
    index: BTreeMap<Style, StyleId>,
}

impl StyleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `style` with one reference, reusing an equal entry.
    pub fn add(&mut self, style: Style) -> Result<StyleId> {
        self.acquire(style, 1)
    }

    /// Register `style` with `count` references, reusing an equal entry.
    ///
    /// `count` may be zero only for an existing entry's lookup; a new entry
    /// with no references is never stored.
    pub fn acquire(&mut self, style: Style, count: usize) -> Result<StyleId> {
        if let Some(&id) = self.index.get(&style) {
            self.retain(id, count)?;
            return Ok(id);
        }
        if count == 0 {
            return Err(Error::style_op("acquiring a new style with no references"));
        }

        let entry = StyleEntry {
            style: style.clone(),
            use_count: Cell::new(count),
        };
        let id = if let Some(slot) = self.free_list.pop() {
            self.entries[slot as usize] = Some(entry);
            StyleId(slot)
        } else {
            let slot = u32::try_from(self.entries.len()).map_err(|_| Error::ResourceExhausted {
                requested: self.entries.len(),
            })?;
            self.entries.try_reserve(1)?;
            self.entries.push(Some(entry));
            StyleId(slot)
        };
        self.index.insert(style, id);
        Ok(id)
    }

    /// Add `count` references to an existing entry.
    pub fn retain(&self, id: StyleId, count: usize) -> Result<()> {
        let entry = self.entry(id)?;
        let next = entry
            .use_count
            .get()
            .checked_add(count)
            .ok_or(Error::ResourceExhausted { requested: count })?;
        entry.use_count.set(next);
        Ok(())
    }

    /// Drop `count` references. Returns `true` if the entry was reclaimed.
    pub fn release(&mut self, id: StyleId, count: usize) -> Result<bool> {
        let entry = self.entry(id)?;
        let held = entry.use_count.get();
        let Some(remaining) = held.checked_sub(count) else {
            return Err(Error::style_op(format!(
                "releasing {count} references to style {} holding {held}",
                id.0
            )));
        };
        entry.use_count.set(remaining);
        if remaining > 0 {
            return Ok(false);
        }

        if let Some(entry) = self.entries[id.index()].take() {
            self.index.remove(&entry.style);
        }
        self.free_list.push(id.0);
        emit_log_with(LogLevel::Debug, || format!("reclaimed style {}", id.0));
        Ok(true)
    }

    /// Look up a live entry.
    #[must_use]
    pub fn get(&self, id: StyleId) -> Option<&Style> {
        self.entries
            .get(id.index())
            .and_then(|slot| slot.as_ref().map(|entry| &entry.style))
    }

    /// Id of the entry equal to `style`, if registered.
    #[must_use]
    pub fn find(&self, style: &Style) -> Option<StyleId> {
        self.index.get(style).copied()
    }

    /// Current use-count; zero for reclaimed or unknown ids.
    #[must_use]
    pub fn use_count(&self, id: StyleId) -> usize {
        self.entry(id).map_or(0, |entry| entry.use_count.get())
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Live entries in style order.
    pub fn iter(&self) -> impl Iterator<Item = (StyleId, &Style)> + '_ {
        self.index.iter().map(|(style, &id)| (id, style))
    }

    fn entry(&self, id: StyleId) -> Result<&StyleEntry> {
        self.entries
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or_else(|| Error::style_op(format!("unknown style {}", id.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    #[test]
    fn test_add_deduplicates() {
        let mut registry = StyleRegistry::new();
        let a = registry.add(Style::text(Rgba::RED)).unwrap();
        let b = registry.add(Style::text(Rgba::RED)).unwrap();
        let c = registry.add(Style::text(Rgba::BLUE)).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.use_count(a), 2);
        assert_eq!(registry.find(&Style::text(Rgba::BLUE)), Some(c));
    }

    #[test]
    fn test_release_reclaims_at_zero() {
        let mut registry = StyleRegistry::new();
        let id = registry.acquire(Style::text(Rgba::RED), 3).unwrap();

        assert!(!registry.release(id, 2).unwrap());
        assert_eq!(registry.use_count(id), 1);
        assert!(registry.release(id, 1).unwrap());
        assert_eq!(registry.use_count(id), 0);
        assert!(registry.get(id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_slot_reuse() {
        let mut registry = StyleRegistry::new();
        let red = registry.add(Style::text(Rgba::RED)).unwrap();
        registry.release(red, 1).unwrap();
        let blue = registry.add(Style::text(Rgba::BLUE)).unwrap();
        assert_eq!(red.index(), blue.index());
        assert_eq!(registry.get(blue), Some(&Style::text(Rgba::BLUE)));
    }

    #[test]
    fn test_over_release_is_rejected_without_change() {
        let mut registry = StyleRegistry::new();
        let id = registry.acquire(Style::text(Rgba::RED), 2).unwrap();
        let err = registry.release(id, 3).unwrap_err();
        assert!(matches!(err, Error::UnsupportedStyleOperation(_)));
        assert_eq!(registry.use_count(id), 2);
    }

    #[test]
    fn test_unknown_id() {
        let mut registry = StyleRegistry::new();
        assert!(registry.release(StyleId(7), 1).is_err());
        assert!(registry.retain(StyleId(7), 1).is_err());
        assert!(registry.get(StyleId(7)).is_none());
    }

    #[test]
    fn test_new_entry_requires_a_reference() {
        let mut registry = StyleRegistry::new();
        assert!(registry.acquire(Style::text(Rgba::RED), 0).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_retain_overflow() {
        let mut registry = StyleRegistry::new();
        let id = registry.acquire(Style::NONE, usize::MAX).unwrap();
        let err = registry.retain(id, 1).unwrap_err();
        assert!(matches!(err, Error::ResourceExhausted { .. }));
        assert_eq!(registry.use_count(id), usize::MAX);
    }

    #[test]
    fn test_iter_in_style_order() {
        let mut registry = StyleRegistry::new();
        registry.add(Style::text(Rgba::WHITE)).unwrap();
        registry.add(Style::text(Rgba::BLACK)).unwrap();
        let styles: Vec<_> = registry.iter().map(|(_, s)| s.clone()).collect();
        assert_eq!(styles, vec![Style::text(Rgba::BLACK), Style::text(Rgba::WHITE)]);
    }
}
