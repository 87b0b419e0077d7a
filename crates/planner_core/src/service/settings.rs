//! Background theme preference.
//!
//! Constructed explicitly from the store and handed to whoever needs it.
//! The value is read once on construction and written on every change.

use crate::model::theme::BackgroundTheme;
use crate::repo::note_repo::RepoError;
use crate::store::PlannerStore;
use log::{error, info, warn};

/// Settings key holding the theme code.
pub const BACKGROUND_KEY: &str = "selected_background";

pub struct SettingsService<'s> {
    store: &'s PlannerStore,
    background: BackgroundTheme,
    last_error: Option<RepoError>,
}

impl<'s> SettingsService<'s> {
    pub fn new(store: &'s PlannerStore) -> Self {
        let mut service = Self {
            store,
            background: BackgroundTheme::default(),
            last_error: None,
        };
        service.load();
        service
    }

    pub fn background(&self) -> BackgroundTheme {
        self.background
    }

    pub fn last_error(&self) -> Option<&RepoError> {
        self.last_error.as_ref()
    }

    /// Reloads the stored theme. Unset or unknown codes fall back to dark.
    pub fn load(&mut self) {
        match self.store.setting_int(BACKGROUND_KEY) {
            Ok(Some(code)) => {
                self.background = BackgroundTheme::from_code(code).unwrap_or_else(|| {
                    warn!("event=settings_load module=settings status=fallback code={code}");
                    BackgroundTheme::default()
                });
                self.last_error = None;
            }
            Ok(None) => {
                self.background = BackgroundTheme::default();
                self.last_error = None;
            }
            Err(err) => {
                error!("event=settings_load module=settings status=error error={err}");
                self.background = BackgroundTheme::default();
                self.last_error = Some(err);
            }
        }
    }

    /// Persists `theme`, then selects it. A failed write keeps the previous
    /// theme.
    pub fn set_background(&mut self, theme: BackgroundTheme) {
        match self.store.set_setting_int(BACKGROUND_KEY, theme.code()) {
            Ok(()) => {
                info!(
                    "event=settings_save module=settings status=ok key={BACKGROUND_KEY} code={}",
                    theme.code()
                );
                self.background = theme;
                self.last_error = None;
            }
            Err(err) => {
                error!("event=settings_save module=settings status=error error={err}");
                self.last_error = Some(err);
            }
        }
    }
}
