//! Recording hotkey backend for tests.

use parking_lot::Mutex;

use crate::accelerator::Accelerator;
use crate::backend::HotkeyBackend;

#[derive(Default)]
pub struct RecordingHotkeys {
    registered: Mutex<Vec<Accelerator>>,
    rejected: Mutex<Vec<Accelerator>>,
    register_calls: Mutex<usize>,
    unregister_calls: Mutex<usize>,
}

impl RecordingHotkeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse to register `accelerator`, as an OS-level conflict would.
    pub fn reject(&self, accelerator: &str) {
        if let Ok(accel) = Accelerator::parse(accelerator) {
            self.rejected.lock().push(accel);
        }
    }

    pub fn registered(&self) -> Vec<String> {
        self.registered
            .lock()
            .iter()
            .map(|accel| accel.to_string())
            .collect()
    }

    pub fn register_calls(&self) -> usize {
        *self.register_calls.lock()
    }

    pub fn unregister_calls(&self) -> usize {
        *self.unregister_calls.lock()
    }
}

impl HotkeyBackend for RecordingHotkeys {
    fn register(&self, accelerator: &Accelerator) -> Result<(), String> {
        *self.register_calls.lock() += 1;
        if self.rejected.lock().contains(accelerator) {
            return Err(format!("{} is already taken", accelerator));
        }
        let mut registered = self.registered.lock();
        if registered.contains(accelerator) {
            return Err(format!("{} is already registered", accelerator));
        }
        registered.push(accelerator.clone());
        Ok(())
    }

    fn unregister_all(&self) -> Result<(), String> {
        *self.unregister_calls.lock() += 1;
        self.registered.lock().clear();
        Ok(())
    }
}
