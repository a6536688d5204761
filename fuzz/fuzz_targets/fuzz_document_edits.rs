//! Fuzz target for document editing.
//!
//! Drives a document through arbitrary edits, key presses and layout
//! queries; none of them may panic and the caret must stay in bounds.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use neotext::{
    Alignment, DocumentOptions, KeyCode, KeyEvent, KeyModifiers, MonospaceMetrics, Point, Rgba,
    Style, TextDocument, WrapMode,
};

#[derive(Arbitrary, Debug)]
enum Op {
    Insert { at: u16, text: String, styled: bool },
    Erase { start: u16, end: u16 },
    Restyle { start: u16, end: u16 },
    Key { code: u8, ctrl: bool },
    Text(String),
    HitTest { x: i16, y: i16 },
    Wrap { width: u8, mode: u8 },
    Align(u8),
}

fn key_code(code: u8) -> KeyCode {
    match code % 11 {
        0 => KeyCode::Left,
        1 => KeyCode::Right,
        2 => KeyCode::Up,
        3 => KeyCode::Down,
        4 => KeyCode::Home,
        5 => KeyCode::End,
        6 => KeyCode::Backspace,
        7 => KeyCode::Delete,
        8 => KeyCode::Enter,
        9 => KeyCode::Tab,
        _ => KeyCode::Char(char::from(b'a' + code % 26)),
    }
}

fuzz_target!(|ops: Vec<Op>| {
    let mut doc = TextDocument::with_options(
        MonospaceMetrics::new(),
        DocumentOptions::default().with_wrap_width(64.0),
    );
    let style = Style::text(Rgba::RED);

    for op in ops.into_iter().take(64) {
        // Errors are expected for out-of-range input; panics are not.
        match op {
            Op::Insert { at, text, styled } => {
                let _ = doc.insert_at(usize::from(at), &text, styled.then_some(&style));
            }
            Op::Erase { start, end } => {
                let _ = doc.erase(usize::from(start)..usize::from(end));
            }
            Op::Restyle { start, end } => {
                let _ = doc.apply_style(usize::from(start)..usize::from(end), Some(&style));
            }
            Op::Key { code, ctrl } => {
                let modifiers = if ctrl { KeyModifiers::CTRL } else { KeyModifiers::empty() };
                doc.key_pressed(KeyEvent::new(key_code(code), modifiers));
            }
            Op::Text(text) => {
                doc.text_input(&text);
            }
            Op::HitTest { x, y } => {
                let offset = doc.hit_test(Point::new(f32::from(x), f32::from(y)));
                assert!(offset <= doc.len_chars());
            }
            Op::Wrap { width, mode } => {
                doc.set_wrap_width((width > 0).then(|| f32::from(width)));
                doc.set_wrap_mode(match mode % 3 {
                    0 => WrapMode::None,
                    1 => WrapMode::Char,
                    _ => WrapMode::Word,
                });
            }
            Op::Align(a) => doc.set_alignment(match a % 4 {
                0 => Alignment::Left,
                1 => Alignment::Right,
                2 => Alignment::Center,
                _ => Alignment::Justify,
            }),
        }
        assert!(doc.cursor_position() <= doc.len_chars());
        let _ = doc.position(doc.cursor_position());
    }
});
