use std::cell::RefCell;
use std::rc::Rc;

use codenames_core::Key;

pub type KeyHandler = Rc<dyn Fn(Key)>;

/// Process-wide key dispatch, the terminal stand-in for a window listener.
#[derive(Clone, Default)]
pub struct InputHub {
    listeners: Rc<RefCell<Vec<KeyHandler>>>,
}

impl InputHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, handler: KeyHandler) -> KeyListener {
        self.listeners.borrow_mut().push(handler.clone());
        KeyListener {
            handler,
            listeners: Rc::clone(&self.listeners),
        }
    }

    pub fn dispatch(&self, key: Key) {
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            (listener)(key);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

/// Registered key listener; dropping it unregisters.
pub struct KeyListener {
    handler: KeyHandler,
    listeners: Rc<RefCell<Vec<KeyHandler>>>,
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        self.listeners
            .borrow_mut()
            .retain(|item| !Rc::ptr_eq(item, &self.handler));
    }
}

/// Maps a terminal input line to a key, if it names one.
pub fn parse_key(line: &str) -> Option<Key> {
    match line.trim().to_ascii_lowercase().as_str() {
        "esc" | "escape" | "\u{1b}" => Some(Key::Escape),
        _ => None,
    }
}
