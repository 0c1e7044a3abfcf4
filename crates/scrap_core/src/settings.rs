//! Quality-of-life settings owned by another mod.
//!
//! Some hosts show a popup for every part moved in or out of an inventory,
//! which misbehaves when many parts change at once. The engine switches those
//! popups off while it deletes consumed parts and restores whatever the user
//! had configured afterwards.

use ahash::AHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QolFlag {
    PopupForGroupAddedInventory,
    PopupForAllPartsInGroup,
}

impl QolFlag {
    pub const ALL: [QolFlag; 2] = [
        QolFlag::PopupForGroupAddedInventory,
        QolFlag::PopupForAllPartsInGroup,
    ];
}

pub trait QolSettings {
    /// `None` when the flag is not available (e.g. the owning mod is absent).
    fn get(&self, flag: QolFlag) -> Option<bool>;

    fn set(&mut self, flag: QolFlag, value: bool);

    /// Turns every popup flag off until the returned guard is dropped.
    fn scoped_suppression(&mut self) -> SuppressionGuard<'_, Self>
    where
        Self: Sized,
    {
        SuppressionGuard::new(self)
    }
}

/// Restores the remembered flags on drop, exactly once.
pub struct SuppressionGuard<'a, S: QolSettings> {
    settings: &'a mut S,
    saved: Vec<(QolFlag, bool)>,
}

impl<'a, S: QolSettings> SuppressionGuard<'a, S> {
    fn new(settings: &'a mut S) -> Self {
        let saved: Vec<(QolFlag, bool)> = QolFlag::ALL
            .iter()
            .filter_map(|&flag| settings.get(flag).map(|value| (flag, value)))
            .collect();
        for &(flag, _) in &saved {
            settings.set(flag, false);
        }
        Self { settings, saved }
    }
}

impl<S: QolSettings> Drop for SuppressionGuard<'_, S> {
    fn drop(&mut self) {
        for (flag, value) in self.saved.drain(..) {
            self.settings.set(flag, value);
        }
    }
}

/// Used when the owning mod is not installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoQolSettings;

impl QolSettings for NoQolSettings {
    fn get(&self, _flag: QolFlag) -> Option<bool> {
        None
    }

    fn set(&mut self, _flag: QolFlag, _value: bool) {}
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryQolSettings {
    flags: AHashMap<QolFlag, bool>,
}

impl InMemoryQolSettings {
    #[must_use]
    pub fn with_flag(mut self, flag: QolFlag, value: bool) -> Self {
        self.flags.insert(flag, value);
        self
    }
}

impl QolSettings for InMemoryQolSettings {
    fn get(&self, flag: QolFlag) -> Option<bool> {
        self.flags.get(&flag).copied()
    }

    fn set(&mut self, flag: QolFlag, value: bool) {
        self.flags.insert(flag, value);
    }
}
