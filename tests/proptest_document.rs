//! Property-based tests for document editing and layout.
//!
//! Uses proptest to verify invariants that must hold across all valid edit
//! sequences.

use neotext::{DocumentOptions, MonospaceMetrics, Rgba, Style, TextDocument, WrapMode};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Printable ASCII with occasional line breaks.
fn ascii_text() -> impl Strategy<Value = String> {
    "[\\x20-\\x7E\n]{0,60}"
}

/// Mixed text with clusters, wide characters and CRLF.
fn mixed_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "a", "b", " ", "-", ".", "\n", "\r\n", "\t", "e\u{0301}", "中", "😀", "word",
        ]),
        0..30,
    )
    .prop_map(|parts| parts.concat())
}

#[derive(Clone, Debug)]
enum Edit {
    Insert { at: usize, text: String, styled: bool },
    Erase { start: usize, len: usize },
    Restyle { start: usize, len: usize, color: u8 },
    MoveCursor { to: usize },
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (any::<usize>(), mixed_text(), any::<bool>())
            .prop_map(|(at, text, styled)| Edit::Insert { at, text, styled }),
        (any::<usize>(), 0usize..8).prop_map(|(start, len)| Edit::Erase { start, len }),
        (any::<usize>(), 0usize..8, 0u8..3)
            .prop_map(|(start, len, color)| Edit::Restyle { start, len, color }),
        any::<usize>().prop_map(|to| Edit::MoveCursor { to }),
    ]
}

fn palette(color: u8) -> Style {
    match color {
        0 => Style::text(Rgba::RED),
        1 => Style::text(Rgba::GREEN),
        _ => Style::background_only(Rgba::BLUE),
    }
}

fn apply(doc: &mut TextDocument, edit: &Edit) {
    let len = doc.len_chars();
    match edit {
        Edit::Insert { at, text, styled } => {
            let at = at % (len + 1);
            let style = styled.then(|| palette(0));
            doc.insert_at(at, text, style.as_ref()).unwrap();
        }
        Edit::Erase { start, len: n } => {
            let start = start % (len + 1);
            let end = (start + n).min(len);
            doc.erase(start..end).unwrap();
        }
        Edit::Restyle { start, len: n, color } => {
            let start = start % (len + 1);
            let end = (start + n).min(len);
            doc.apply_style(start..end, Some(&palette(*color))).unwrap();
        }
        Edit::MoveCursor { to } => {
            doc.set_cursor_position(to % (len + 1)).unwrap();
        }
    }
}

fn wrapped(width: f32) -> TextDocument {
    TextDocument::with_options(
        MonospaceMetrics::new(),
        DocumentOptions::default().with_wrap_width(width),
    )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn length_tracks_edits_and_cursor_stays_in_bounds(
        edits in prop::collection::vec(edit(), 0..25)
    ) {
        let mut doc = wrapped(48.0);
        let mut expected = 0usize;
        for edit in &edits {
            let before = doc.len_chars();
            apply(&mut doc, edit);
            expected = match edit {
                Edit::Insert { text, .. } => expected + text.chars().count(),
                Edit::Erase { .. } => expected - (before - doc.len_chars()),
                _ => expected,
            };
            prop_assert_eq!(doc.len_chars(), expected);
            prop_assert!(doc.cursor_position() <= doc.len_chars());
        }
        prop_assert_eq!(doc.text().chars().count(), doc.len_chars());
    }

    #[test]
    fn use_counts_match_tagged_characters(
        edits in prop::collection::vec(edit(), 0..25)
    ) {
        let mut doc = wrapped(48.0);
        for edit in &edits {
            apply(&mut doc, edit);
        }

        let tagged = doc.tagged();
        for (id, _) in doc.styles().iter() {
            let referencing = (0..doc.len_chars())
                .filter(|&pos| {
                    tagged
                        .tag_at(pos)
                        .ok()
                        .flatten()
                        .and_then(|tag| tag.style())
                        == Some(id)
                })
                .count();
            prop_assert!(referencing > 0, "unreferenced style survived");
            prop_assert_eq!(doc.styles().use_count(id), referencing);
        }
    }

    #[test]
    fn set_text_round_trips(text in mixed_text()) {
        let mut doc = wrapped(40.0);
        doc.set_text(&text).unwrap();
        prop_assert_eq!(doc.text(), text.clone());
        prop_assert_eq!(doc.cursor_position(), text.chars().count());
    }

    #[test]
    fn refresh_is_idempotent(text in mixed_text(), offset in any::<usize>()) {
        let mut doc = wrapped(40.0);
        doc.set_text(&text).unwrap();
        let offset = offset % (doc.len_chars() + 1);

        let idx = doc.refresh_paragraph(offset).unwrap();
        let first = doc.paragraph_glyphs(idx).unwrap().to_vec();
        let lines = doc.paragraph_lines(idx).unwrap().to_vec();
        prop_assert_eq!(doc.refresh_paragraph(offset).unwrap(), idx);
        prop_assert_eq!(doc.paragraph_glyphs(idx).unwrap().to_vec(), first);
        prop_assert_eq!(doc.paragraph_lines(idx).unwrap().to_vec(), lines);
    }

    #[test]
    fn lines_fit_the_wrap_width(text in ascii_text(), columns in 1usize..12) {
        let width = columns as f32 * 8.0;
        for mode in [WrapMode::Word, WrapMode::Char] {
            let mut doc = TextDocument::with_options(
                MonospaceMetrics::new(),
                DocumentOptions::default().with_wrap_width(width).with_wrap_mode(mode),
            );
            doc.set_text(&text).unwrap();
            for idx in 0..doc.paragraph_count() {
                let lines = doc.paragraph_lines(idx).unwrap();
                for line in lines.iter() {
                    let glyphs = line.glyphs.end - line.glyphs.start;
                    prop_assert!(
                        line.width <= width + 1e-3 || glyphs == 1,
                        "line {:?} is {} wide at {}", line.chars, line.width, width
                    );
                }
            }
        }
    }

    #[test]
    fn hit_test_inverts_position(text in ascii_text(), columns in 1usize..12) {
        let mut doc = wrapped(columns as f32 * 8.0);
        doc.set_text(&text).unwrap();
        for offset in 0..=doc.len_chars() {
            let point = doc.position(offset).unwrap();
            prop_assert_eq!(doc.hit_test(point), offset, "offset {} at {:?}", offset, point);
        }
    }
}
