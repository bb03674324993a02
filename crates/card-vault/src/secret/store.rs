//! [`InMemorySecretGateway`]: process-local session PIN holder.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::debug;

use super::{Pin, SecretGateway};

/// Thread-safe, in-memory [`SecretGateway`].
///
/// Backed by an [`ArcSwapOption`] so reads never block and set/clear swap the
/// whole value atomically. Clones share the same slot.
#[derive(Clone, Debug)]
pub struct InMemorySecretGateway {
    inner: Arc<ArcSwapOption<Pin>>,
}

impl InMemorySecretGateway {
    /// Create a gateway with no PIN set.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ArcSwapOption::empty()),
        }
    }

    /// Create a gateway already holding `pin`.
    pub fn with_pin(pin: impl Into<Pin>) -> Self {
        let gateway = Self::new();
        gateway.set_pin(pin.into());
        gateway
    }

    /// Returns `true` if a PIN is currently set.
    pub fn is_set(&self) -> bool {
        self.inner.load().is_some()
    }
}

impl Default for InMemorySecretGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretGateway for InMemorySecretGateway {
    fn get_pin(&self) -> Option<Pin> {
        self.inner.load_full().map(|pin| (*pin).clone())
    }

    fn set_pin(&self, pin: Pin) {
        self.inner.store(Some(Arc::new(pin)));
        debug!("session PIN set");
    }

    fn clear_pin(&self) {
        self.inner.store(None);
        debug!("session PIN cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initially_empty() {
        let gateway = InMemorySecretGateway::new();
        assert!(!gateway.is_set());
        assert!(gateway.get_pin().is_none());
    }

    #[test]
    fn set_and_get() {
        let gateway = InMemorySecretGateway::new();
        gateway.set_pin(Pin::new("1234"));
        assert!(gateway.is_set());
        assert_eq!(gateway.get_pin().unwrap().as_str(), "1234");
    }

    #[test]
    fn set_replaces_previous() {
        let gateway = InMemorySecretGateway::with_pin("1111");
        gateway.set_pin(Pin::new("2222"));
        assert_eq!(gateway.get_pin().unwrap().as_str(), "2222");
    }

    #[test]
    fn clear_removes_pin() {
        let gateway = InMemorySecretGateway::with_pin("1234");
        gateway.clear_pin();
        assert!(!gateway.is_set());
    }

    #[test]
    fn clones_share_state() {
        let a = InMemorySecretGateway::new();
        let b = a.clone();
        a.set_pin(Pin::new("9999"));
        assert_eq!(b.get_pin().unwrap().as_str(), "9999");
    }

    #[test]
    fn concurrent_readers_and_writer() {
        let gateway = InMemorySecretGateway::with_pin("0000");
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let g = gateway.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        if let Some(pin) = g.get_pin() {
                            assert_eq!(pin.as_str().len(), 4);
                        }
                    }
                })
            })
            .collect();
        for i in 0..100 {
            gateway.set_pin(Pin::new(format!("{i:04}")));
        }
        gateway.clear_pin();
        for r in readers {
            r.join().unwrap();
        }
        assert!(!gateway.is_set());
    }
}
