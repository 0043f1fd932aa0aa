//! Input handling: maps key/mouse events to scroll changes.
//!
//! Every handler ends by re-syncing the card so a scroll that reveals (or
//! hides) the last image retargets the animation before the next tick.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::config::{Action, MAX_ITEM_ROWS, MIN_ITEM_ROWS};

use super::state::AppState;

/// Rows moved per key press.
const KEY_SCROLL_ROWS: isize = 2;
/// Rows moved per mouse-wheel notch.
const WHEEL_SCROLL_ROWS: isize = 3;
/// Rows added or removed per image-height step.
const ITEM_ROWS_STEP: u16 = 2;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent, now: Instant) {
    // Ctrl+c always quits, regardless of bindings.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    let scroll = &mut state.scroll;
    let moved = match action {
        Action::ScrollDown => scroll.scroll_by(KEY_SCROLL_ROWS),
        Action::ScrollUp => scroll.scroll_by(-KEY_SCROLL_ROWS),
        Action::PageDown => scroll.page_down(),
        Action::PageUp => scroll.page_up(),
        Action::NextImage => {
            let rows = scroll.item_rows() as usize;
            let next = scroll.offset() / rows + 1;
            scroll.scroll_to_item(next)
        }
        Action::PrevImage => {
            let rows = scroll.item_rows() as usize;
            let top = scroll.offset() / rows;
            // Part-way into an image: snap back to its top first.
            let prev = if scroll.offset() % rows == 0 {
                top.saturating_sub(1)
            } else {
                top
            };
            scroll.scroll_to_item(prev)
        }
        Action::Top => scroll.scroll_to_top(),
        Action::Bottom => scroll.scroll_to_bottom(),
        Action::Taller => {
            let rows = scroll.item_rows().saturating_add(ITEM_ROWS_STEP);
            scroll.set_item_rows(rows.min(MAX_ITEM_ROWS))
        }
        Action::Shorter => {
            let rows = scroll.item_rows().saturating_sub(ITEM_ROWS_STEP);
            scroll.set_item_rows(rows.max(MIN_ITEM_ROWS))
        }
        Action::Reload => {
            state.reload_requested = true;
            return;
        }
        Action::Quit => {
            state.should_quit = true;
            return;
        }
    };

    if moved {
        state.status_message = None;
    }
    state.sync_card(now);
}

/// Process a mouse event.  Only the wheel scrolls; clicks are ignored.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent, now: Instant) {
    let moved = match mouse.kind {
        MouseEventKind::ScrollDown => state.scroll.scroll_by(WHEEL_SCROLL_ROWS),
        MouseEventKind::ScrollUp => state.scroll.scroll_by(-WHEEL_SCROLL_ROWS),
        _ => return,
    };
    if moved {
        state.status_message = None;
    }
    state.sync_card(now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crossterm::event::{KeyEventKind, KeyEventState};

    use crate::config::AppConfig;
    use crate::core::gallery::Gallery;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn wheel(kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn state(now: Instant) -> AppState {
        let mut config = AppConfig::default();
        config.item_rows = 10;
        let mut s = AppState::new(Gallery::builtin(), config, now);
        s.set_viewport(20, now);
        s
    }

    #[test]
    fn end_reaches_last_image_and_moves_card() {
        let t0 = Instant::now();
        let mut s = state(t0);
        handle_key(&mut s, key(KeyCode::End), t0);
        assert!(s.at_bottom());
        assert_eq!(s.animator.target(), 0.95 * 20.0);

        s.on_tick(t0 + Duration::from_millis(100));
        let mid = s.card_offset();
        assert!(mid > 0.0 && mid < 19.0);
    }

    #[test]
    fn scrolling_back_up_redirects_from_live_offset() {
        let t0 = Instant::now();
        let mut s = state(t0);
        handle_key(&mut s, key(KeyCode::End), t0);
        let t1 = t0 + Duration::from_millis(100);
        s.on_tick(t1);
        let live = s.card_offset();

        handle_key(&mut s, key(KeyCode::Home), t1);
        assert!(!s.at_bottom());
        assert_eq!(s.animator.target(), 0.0);
        assert_eq!(s.animator.sample(t1), live);
    }

    #[test]
    fn repeated_key_at_bottom_keeps_animation() {
        let t0 = Instant::now();
        let mut s = state(t0);
        handle_key(&mut s, key(KeyCode::End), t0);
        let t1 = t0 + Duration::from_millis(50);
        let before = s.animator.sample(t1 + Duration::from_millis(50));
        handle_key(&mut s, key(KeyCode::End), t1);
        assert_eq!(s.animator.sample(t1 + Duration::from_millis(50)), before);
    }

    #[test]
    fn next_and_prev_snap_to_images() {
        let t0 = Instant::now();
        let mut s = state(t0);
        handle_key(&mut s, key(KeyCode::Right), t0);
        assert_eq!(s.scroll.offset(), 10);
        handle_key(&mut s, key(KeyCode::Down), t0);
        assert_eq!(s.scroll.offset(), 12);
        handle_key(&mut s, key(KeyCode::Left), t0);
        assert_eq!(s.scroll.offset(), 10);
        handle_key(&mut s, key(KeyCode::Left), t0);
        assert_eq!(s.scroll.offset(), 0);
    }

    #[test]
    fn shrinking_items_can_reveal_the_last_image() {
        let t0 = Instant::now();
        let mut s = state(t0);
        assert!(!s.at_bottom());
        // 5 items of 4 rows fit in the 20-row viewport.
        for _ in 0..3 {
            handle_key(&mut s, key(KeyCode::Char('-')), t0);
        }
        assert_eq!(s.scroll.item_rows(), 4);
        assert!(s.at_bottom());
        assert_eq!(s.animator.target(), 0.95 * 20.0);

        handle_key(&mut s, key(KeyCode::Char('=')), t0);
        assert_eq!(s.scroll.item_rows(), 6);
        assert!(!s.at_bottom());
        assert_eq!(s.animator.target(), 0.0);
    }

    #[test]
    fn item_height_is_bounded() {
        let t0 = Instant::now();
        let mut s = state(t0);
        for _ in 0..20 {
            handle_key(&mut s, key(KeyCode::Char('[')), t0);
        }
        assert_eq!(s.scroll.item_rows(), MIN_ITEM_ROWS);
    }

    #[test]
    fn wheel_scrolls_three_rows() {
        let t0 = Instant::now();
        let mut s = state(t0);
        handle_mouse(&mut s, wheel(MouseEventKind::ScrollDown), t0);
        assert_eq!(s.scroll.offset(), 3);
        handle_mouse(&mut s, wheel(MouseEventKind::ScrollUp), t0);
        assert_eq!(s.scroll.offset(), 0);
    }

    #[test]
    fn reload_key_requests_new_batch_without_scrolling() {
        let t0 = Instant::now();
        let mut s = state(t0);
        handle_key(&mut s, key(KeyCode::Char('r')), t0);
        assert!(s.reload_requested);
        assert_eq!(s.scroll.offset(), 0);
    }

    #[test]
    fn quit_keys() {
        let t0 = Instant::now();
        let mut s = state(t0);
        handle_key(&mut s, key(KeyCode::Char('q')), t0);
        assert!(s.should_quit);

        let mut s = state(t0);
        let ctrl_c = KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char('c'))
        };
        handle_key(&mut s, ctrl_c, t0);
        assert!(s.should_quit);
    }
}
