use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, MouseButton, MouseEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    /// Left click at (column, row).
    Click(u16, u16),
    Tick,
    Resize,
}

/// Translate a raw terminal event; `None` for events the app ignores.
fn translate(event: Event) -> Option<AppEvent> {
    match event {
        Event::Key(key) => Some(AppEvent::Key(key)),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                Some(AppEvent::Click(mouse.column, mouse.row))
            }
            _ => None,
        },
        Event::Resize(_, _) => Some(AppEvent::Resize),
        _ => None,
    }
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    _tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let _tx = tx.clone();

        thread::spawn(move || {
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    let Ok(raw) = event::read() else {
                        continue;
                    };
                    if let Some(app_event) = translate(raw)
                        && tx.send(app_event).is_err()
                    {
                        return;
                    }
                } else if tx.send(AppEvent::Tick).is_err() {
                    return;
                }
            }
        });

        Self { rx, _tx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers, MouseEvent};

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 4,
            row: 9,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn left_click_is_forwarded() {
        let ev = translate(mouse(MouseEventKind::Down(MouseButton::Left)));
        assert!(matches!(ev, Some(AppEvent::Click(4, 9))));
    }

    #[test]
    fn other_mouse_events_are_dropped() {
        assert!(translate(mouse(MouseEventKind::Moved)).is_none());
        assert!(translate(mouse(MouseEventKind::Down(MouseButton::Right))).is_none());
    }

    #[test]
    fn keys_and_resizes_pass_through() {
        let key = KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE);
        assert!(matches!(translate(Event::Key(key)), Some(AppEvent::Key(_))));
        assert!(matches!(translate(Event::Resize(80, 24)), Some(AppEvent::Resize)));
    }
}
