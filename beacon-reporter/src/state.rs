use parking_lot::Mutex;
use std::sync::Arc;

/// Process-wide shared mutable state. The registry is the only writer-heavy
/// user and its mutations are append-only, so a plain mutex is enough.
pub type Shared<T> = Arc<Mutex<T>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}
