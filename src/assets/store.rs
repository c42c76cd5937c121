use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crate::assets::texture::Texture;
use crate::foundation::error::{PanoglobeError, PanoglobeResult};

/// Opaque handle to a texture slot in a [`TextureStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub(crate) u32);

/// Load state of a texture slot.
///
/// `Pending` is a normal transient state: scenes render their placeholder colour until the slot
/// becomes `Ready`. `Failed` is terminal for the slot and equally non-fatal.
#[derive(Clone, Debug)]
pub enum TextureState {
    Pending,
    Ready(Arc<Texture>),
    Failed(String),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TextureStoreStats {
    pub loaded: u64,
    pub failed: u64,
}

struct Slot {
    label: String,
    state: TextureState,
}

type LoadMsg = (TextureHandle, PanoglobeResult<Texture>);

/// Texture registry with background decoding.
///
/// Loads run on the rayon pool and report back through a channel; results only become visible
/// when [`TextureStore::poll`] drains the channel, which the pipeline does once per frame.
pub struct TextureStore {
    slots: Vec<Slot>,
    tx: Sender<LoadMsg>,
    rx: Receiver<LoadMsg>,
    in_flight: usize,
    stats: TextureStoreStats,
}

impl Default for TextureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureStore {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            slots: Vec::new(),
            tx,
            rx,
            in_flight: 0,
            stats: TextureStoreStats::default(),
        }
    }

    /// Register an already decoded texture.
    pub fn insert(&mut self, label: impl Into<String>, texture: Texture) -> TextureHandle {
        self.push_slot(label.into(), TextureState::Ready(Arc::new(texture)))
    }

    /// Reserve a pending slot to be filled later with [`TextureStore::complete`].
    pub fn reserve(&mut self, label: impl Into<String>) -> TextureHandle {
        self.push_slot(label.into(), TextureState::Pending)
    }

    /// Start reading and decoding `path` in the background.
    pub fn load_async(&mut self, path: impl Into<PathBuf>) -> TextureHandle {
        let path = path.into();
        let handle = self.reserve(path.display().to_string());
        let tx = self.tx.clone();
        self.in_flight += 1;
        tracing::debug!(path = %path.display(), "texture load started");
        rayon::spawn(move || {
            let res = read_and_decode(&path);
            // The store may have been dropped while decoding; nothing to report to then.
            let _ = tx.send((handle, res));
        });
        handle
    }

    /// Resolve a pending slot. Failures are logged and leave the slot in `Failed`.
    pub fn complete(&mut self, handle: TextureHandle, result: PanoglobeResult<Texture>) {
        let Some(slot) = self.slots.get_mut(handle.0 as usize) else {
            tracing::warn!(?handle, "completion for unknown texture handle dropped");
            return;
        };
        match result {
            Ok(tex) => {
                tracing::info!(
                    label = %slot.label,
                    width = tex.width(),
                    height = tex.height(),
                    "texture ready"
                );
                slot.state = TextureState::Ready(Arc::new(tex));
                self.stats.loaded += 1;
            }
            Err(e) => {
                tracing::warn!(
                    label = %slot.label,
                    error = %e,
                    "texture load failed; rendering placeholder"
                );
                slot.state = TextureState::Failed(e.to_string());
                self.stats.failed += 1;
            }
        }
    }

    /// Apply every finished background load. Returns the number of slots resolved.
    pub fn poll(&mut self) -> usize {
        let mut n = 0;
        while let Ok((handle, res)) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.complete(handle, res);
            n += 1;
        }
        n
    }

    /// Block until every background load has resolved or `timeout` elapses.
    ///
    /// Returns `true` when nothing is left in flight.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.in_flight > 0 {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(left) {
                Ok((handle, res)) => {
                    self.in_flight -= 1;
                    self.complete(handle, res);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.in_flight == 0
    }

    /// Borrow a texture if its slot is ready.
    pub fn get(&self, handle: TextureHandle) -> Option<&Texture> {
        match &self.slots.get(handle.0 as usize)?.state {
            TextureState::Ready(t) => Some(t),
            _ => None,
        }
    }

    pub fn state(&self, handle: TextureHandle) -> Option<&TextureState> {
        self.slots.get(handle.0 as usize).map(|s| &s.state)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn stats(&self) -> TextureStoreStats {
        self.stats
    }

    fn push_slot(&mut self, label: String, state: TextureState) -> TextureHandle {
        let handle = TextureHandle(self.slots.len() as u32);
        self.slots.push(Slot { label, state });
        handle
    }
}

fn read_and_decode(path: &Path) -> PanoglobeResult<Texture> {
    let bytes = std::fs::read(path)
        .map_err(|e| PanoglobeError::asset(format!("read texture '{}': {e}", path.display())))?;
    Texture::decode(&bytes)
        .map_err(|e| PanoglobeError::asset(format!("decode texture '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
