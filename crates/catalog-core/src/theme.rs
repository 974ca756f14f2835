// ── Theme preference ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};
use tokio::sync::watch;

use crate::stream::StateStream;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

/// Current theme with change notification. Persistence is the caller's
/// job (see `catalog-config`).
pub struct ThemeState {
    theme: watch::Sender<Theme>,
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl ThemeState {
    pub fn new(initial: Theme) -> Self {
        let (theme, _) = watch::channel(initial);
        Self { theme }
    }

    pub fn get(&self) -> Theme {
        *self.theme.borrow()
    }

    pub fn set(&self, theme: Theme) {
        self.theme.send_if_modified(|current| {
            let changed = *current != theme;
            *current = theme;
            changed
        });
    }

    /// Flip between light and dark, returning the new theme.
    pub fn toggle(&self) -> Theme {
        let mut next = Theme::default();
        self.theme.send_modify(|current| {
            *current = current.toggled();
            next = *current;
        });
        next
    }

    pub fn is_dark(&self) -> bool {
        self.get().is_dark()
    }

    pub fn subscribe(&self) -> StateStream<Theme> {
        StateStream::new(self.theme.subscribe())
    }
}
