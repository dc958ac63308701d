use crate::{
    models::accent::Accent,
    storage::{ACCENT_KEY, Storage, StorageError},
};

/// Accent preference, mirrored to its own storage key.
pub struct AccentStore<S: Storage> {
    accent: Accent,
    storage: S,
}

impl<S: Storage> AccentStore<S> {
    /// Reads the saved accent, falling back to the default when it is missing or unknown.
    pub fn open(storage: S) -> Self {
        let accent = match storage.read(ACCENT_KEY) {
            Ok(Some(value)) => value.parse::<Accent>().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring saved accent");
                Accent::default()
            }),
            Ok(None) => Accent::default(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read saved accent");
                Accent::default()
            }
        };
        Self { accent, storage }
    }

    pub fn accent(&self) -> Accent {
        self.accent
    }

    pub fn set(&mut self, accent: Accent) -> Result<(), StorageError> {
        self.storage.write(ACCENT_KEY, accent.as_str())?;
        self.accent = accent;
        Ok(())
    }
}
