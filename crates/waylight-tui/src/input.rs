//! Terminal input: crossterm events to popup events.

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use futures_util::StreamExt;
use tokio::sync::{mpsc, watch};
use waylight_popup::{InputEdit, Key, UiEvent};

use crate::view::{HitRegion, hit_test};

pub fn map_key(key: KeyEvent) -> Option<UiEvent> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let event = match key.code {
        KeyCode::Esc => UiEvent::Key(Key::Cancel),
        KeyCode::Char('c') if ctrl => UiEvent::Key(Key::Cancel),
        KeyCode::Down => UiEvent::Key(Key::Down),
        KeyCode::Char('j' | 'n') if ctrl => UiEvent::Key(Key::Down),
        KeyCode::Up => UiEvent::Key(Key::Up),
        KeyCode::Char('k' | 'p') if ctrl => UiEvent::Key(Key::Up),
        KeyCode::Enter => UiEvent::Key(Key::Confirm),
        KeyCode::Backspace => UiEvent::Edit(InputEdit::Backspace),
        KeyCode::Char('u') if ctrl => UiEvent::Edit(InputEdit::Clear),
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Char(c) => UiEvent::Edit(InputEdit::Insert(c)),
        _ => return None,
    };
    Some(event)
}

/// Map one terminal event, using `hits` to resolve clicks to result rows.
pub fn map_event(event: &Event, hits: &[HitRegion]) -> Option<UiEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => map_key(*key),
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            hit_test(hits, mouse.row).map(UiEvent::RowActivated)
        }
        Event::Paste(text) => {
            tracing::debug!("Ignoring paste of {} bytes", text.len());
            None
        }
        _ => None,
    }
}

/// Read terminal events until the stream or the popup goes away.
pub async fn forward_events(
    events: mpsc::UnboundedSender<UiEvent>,
    hits: watch::Receiver<Vec<HitRegion>>,
) {
    let mut stream = EventStream::new();

    while let Some(event) = stream.next().await {
        let event = match event {
            Ok(e) => e,
            Err(e) => {
                tracing::error!("Event stream error: {}", e);
                continue;
            }
        };

        let Some(ui_event) = map_event(&event, &hits.borrow()) else {
            continue;
        };
        tracing::debug!("UI event: {:?}", ui_event);
        if events.send(ui_event).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent};

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_navigation_keys() {
        let none = KeyModifiers::NONE;
        assert_eq!(
            map_event(&press(KeyCode::Esc, none), &[]),
            Some(UiEvent::Key(Key::Cancel))
        );
        assert_eq!(
            map_event(&press(KeyCode::Down, none), &[]),
            Some(UiEvent::Key(Key::Down))
        );
        assert_eq!(
            map_event(&press(KeyCode::Char('k'), KeyModifiers::CONTROL), &[]),
            Some(UiEvent::Key(Key::Up))
        );
        assert_eq!(
            map_event(&press(KeyCode::Enter, none), &[]),
            Some(UiEvent::Key(Key::Confirm))
        );
    }

    #[test]
    fn test_typing_becomes_edits() {
        assert_eq!(
            map_event(&press(KeyCode::Char('F'), KeyModifiers::SHIFT), &[]),
            Some(UiEvent::Edit(InputEdit::Insert('F')))
        );
        assert_eq!(
            map_event(&press(KeyCode::Backspace, KeyModifiers::NONE), &[]),
            Some(UiEvent::Edit(InputEdit::Backspace))
        );
        assert_eq!(
            map_event(&press(KeyCode::Char('u'), KeyModifiers::CONTROL), &[]),
            Some(UiEvent::Edit(InputEdit::Clear))
        );
        assert_eq!(
            map_event(&press(KeyCode::Char('x'), KeyModifiers::CONTROL), &[]),
            None
        );
    }

    #[test]
    fn test_key_release_ignored() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(map_event(&release, &[]), None);
    }

    #[test]
    fn test_click_activates_row_under_pointer() {
        let hits = vec![
            HitRegion {
                top: 4,
                bottom: 5,
                index: 0,
            },
            HitRegion {
                top: 5,
                bottom: 7,
                index: 1,
            },
        ];
        let click = |row| {
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: 3,
                row,
                modifiers: KeyModifiers::NONE,
            })
        };

        assert_eq!(map_event(&click(6), &hits), Some(UiEvent::RowActivated(1)));
        assert_eq!(map_event(&click(4), &hits), Some(UiEvent::RowActivated(0)));
        assert_eq!(map_event(&click(9), &hits), None);
    }
}
