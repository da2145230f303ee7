//! Input events delivered to the frame callback

/// Keys the samples react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
}

impl Key {
    /// Convert from a winit logical key.
    pub fn from_winit(key: &winit::keyboard::Key) -> Option<Self> {
        use winit::keyboard::{Key as WKey, NamedKey};

        match key {
            WKey::Named(NamedKey::Escape) => Some(Key::Escape),
            _ => None,
        }
    }
}

/// Input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    KeyPress { key: Key },
    KeyRelease { key: Key },
    /// Window resized, in physical pixels.
    Resize { width: u32, height: u32 },
    /// The user asked to close the window.
    CloseRequested,
}

impl Event {
    /// Whether this event asks the sample to quit.
    pub fn is_exit_request(&self) -> bool {
        matches!(
            self,
            Event::CloseRequested | Event::KeyPress { key: Key::Escape }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::{Key as WKey, NamedKey};

    #[test]
    fn test_from_winit_named() {
        assert_eq!(
            Key::from_winit(&WKey::Named(NamedKey::Escape)),
            Some(Key::Escape)
        );
        assert_eq!(Key::from_winit(&WKey::Named(NamedKey::F13)), None);
    }

    #[test]
    fn test_from_winit_ignores_other_keys() {
        assert_eq!(Key::from_winit(&WKey::Character("q".into())), None);
        assert_eq!(Key::from_winit(&WKey::Named(NamedKey::Space)), None);
        assert_eq!(Key::from_winit(&WKey::Named(NamedKey::ArrowUp)), None);
    }

    #[test]
    fn test_exit_request() {
        assert!(Event::CloseRequested.is_exit_request());
        assert!(Event::KeyPress { key: Key::Escape }.is_exit_request());
        assert!(!Event::KeyRelease { key: Key::Escape }.is_exit_request());
        assert!(!Event::Resize {
            width: 1,
            height: 1
        }
        .is_exit_request());
    }
}
