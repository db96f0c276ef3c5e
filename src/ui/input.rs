/// Terminal input → game actions.
///
/// Every key Press/Repeat is one action (held keys auto-repeat at the
/// terminal's rate). Release events are ignored. Mouse clicks carry their
/// terminal cell; the renderer maps them onto the grid.

use std::time::Duration;

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::domain::grid::Direction;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputAction {
    Start,
    Quit,
    Step(Direction),
    /// Left click at a terminal cell.
    Click { column: u16, row: u16 },
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_START: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

pub struct InputState {
    pub actions: Vec<InputAction>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { actions: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events without blocking.
    /// Call once per frame; the previous frame's actions are discarded.
    pub fn drain_events(&mut self) {
        self.actions.clear();
        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(ev) => {
                    if let Some(action) = map_event(&ev) {
                        self.actions.push(action);
                    }
                }
                Err(_) => break,
            }
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.actions.contains(&InputAction::Quit)
    }
}

pub fn map_event(ev: &Event) -> Option<InputAction> {
    match ev {
        Event::Key(key) => map_key(key),
        Event::Mouse(mouse) => map_mouse(mouse),
        _ => None,
    }
}

fn map_key(key: &KeyEvent) -> Option<InputAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let code = key.code;
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && (code == KeyCode::Char('c') || code == KeyCode::Char('C'))
    {
        return Some(InputAction::Quit);
    }

    if KEYS_QUIT.contains(&code) {
        Some(InputAction::Quit)
    } else if KEYS_START.contains(&code) {
        Some(InputAction::Start)
    } else if KEYS_UP.contains(&code) {
        Some(InputAction::Step(Direction::Up))
    } else if KEYS_DOWN.contains(&code) {
        Some(InputAction::Step(Direction::Down))
    } else if KEYS_LEFT.contains(&code) {
        Some(InputAction::Step(Direction::Left))
    } else if KEYS_RIGHT.contains(&code) {
        Some(InputAction::Step(Direction::Right))
    } else {
        None
    }
}

fn map_mouse(mouse: &MouseEvent) -> Option<InputAction> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(InputAction::Click {
            column: mouse.column,
            row: mouse.row,
        }),
        // Wheel up lifts the raindrop, wheel down sinks it.
        MouseEventKind::ScrollUp => Some(InputAction::Step(Direction::Up)),
        MouseEventKind::ScrollDown => Some(InputAction::Step(Direction::Down)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE })
    }

    #[test]
    fn wasd_and_arrows_step() {
        assert_eq!(map_event(&key(KeyCode::Char('w'))), Some(InputAction::Step(Direction::Up)));
        assert_eq!(map_event(&key(KeyCode::Char('S'))), Some(InputAction::Step(Direction::Down)));
        assert_eq!(map_event(&key(KeyCode::Left)), Some(InputAction::Step(Direction::Left)));
        assert_eq!(map_event(&key(KeyCode::Char('d'))), Some(InputAction::Step(Direction::Right)));
    }

    #[test]
    fn space_starts_escape_quits() {
        assert_eq!(map_event(&key(KeyCode::Char(' '))), Some(InputAction::Start));
        assert_eq!(map_event(&key(KeyCode::Enter)), Some(InputAction::Start));
        assert_eq!(map_event(&key(KeyCode::Esc)), Some(InputAction::Quit));
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(map_event(&ctrl_c), Some(InputAction::Quit));
    }

    #[test]
    fn release_is_ignored() {
        let mut k = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::NONE);
        k.kind = KeyEventKind::Release;
        assert_eq!(map_event(&Event::Key(k)), None);
    }

    #[test]
    fn mouse_click_and_wheel() {
        assert_eq!(
            map_event(&mouse(MouseEventKind::Down(MouseButton::Left), 12, 3)),
            Some(InputAction::Click { column: 12, row: 3 })
        );
        assert_eq!(map_event(&mouse(MouseEventKind::ScrollUp, 0, 0)), Some(InputAction::Step(Direction::Up)));
        assert_eq!(map_event(&mouse(MouseEventKind::ScrollDown, 0, 0)), Some(InputAction::Step(Direction::Down)));
        assert_eq!(map_event(&mouse(MouseEventKind::Moved, 4, 4)), None);
        assert_eq!(map_event(&mouse(MouseEventKind::Down(MouseButton::Right), 4, 4)), None);
    }
}
