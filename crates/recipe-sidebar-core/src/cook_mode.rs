//! Cook Mode: a toggle that keeps the screen awake while a recipe is open.
//!
//! One controller instance owns the toggle state and whichever wake hold is
//! active. The page and preference storage are injected, so the same logic
//! runs against a browser adapter or a test double.

use std::time::Duration;

pub const COOK_MODE_BUTTON_ID: &str = "cookModeBtn";
pub const COOK_MODE_PREFERENCE_KEY: &str = "cookMode";
pub const LABEL_OFF: &str = "\u{1F373} Cook Mode";
pub const LABEL_ON: &str = "\u{1F373} Cook Mode: On";
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(30);

pub trait CookModePage {
    /// True when the page shows an ingredients or procedure section.
    fn is_recipe_page(&self) -> bool;
    fn has_toggle_button(&self) -> bool;
    fn insert_toggle_button(&mut self, id: &str, label: &str);
    fn set_toggle_label(&mut self, label: &str);
    /// Asks the platform to keep the display on. `Err` carries the reason
    /// the request was refused or is unsupported.
    fn request_screen_wake_lock(&mut self) -> std::result::Result<(), String>;
    fn release_screen_wake_lock(&mut self);
    /// Starts a periodic no-op interaction that keeps the display from idling.
    fn start_keep_alive(&mut self, interval: Duration);
    fn stop_keep_alive(&mut self);
}

pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WakeHold {
    #[default]
    Released,
    WakeLock,
    KeepAlive,
}

#[derive(Debug, Clone, Default)]
pub struct CookMode {
    active: bool,
    hold: WakeHold,
}

impl CookMode {
    /// Injects the toggle on recipe pages and restores the saved preference.
    ///
    /// Returns `None` on non-recipe pages and when a toggle button already
    /// exists, so repeated installs never stack buttons.
    pub fn install<P, S>(page: &mut P, prefs: &S) -> Option<Self>
    where
        P: CookModePage + ?Sized,
        S: PreferenceStore + ?Sized,
    {
        if !page.is_recipe_page() || page.has_toggle_button() {
            return None;
        }

        page.insert_toggle_button(COOK_MODE_BUTTON_ID, LABEL_OFF);
        let mut cook_mode = Self::default();
        if prefs.get(COOK_MODE_PREFERENCE_KEY).as_deref() == Some("on") {
            cook_mode.active = true;
            page.set_toggle_label(LABEL_ON);
            cook_mode.enable(page);
        }
        Some(cook_mode)
    }

    pub fn toggle<P, S>(&mut self, page: &mut P, prefs: &mut S)
    where
        P: CookModePage + ?Sized,
        S: PreferenceStore + ?Sized,
    {
        self.active = !self.active;
        prefs.set(
            COOK_MODE_PREFERENCE_KEY,
            if self.active { "on" } else { "off" },
        );
        page.set_toggle_label(if self.active { LABEL_ON } else { LABEL_OFF });
        if self.active {
            self.enable(page);
        } else {
            self.disable(page);
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn hold(&self) -> WakeHold {
        self.hold
    }

    fn enable<P: CookModePage + ?Sized>(&mut self, page: &mut P) {
        match page.request_screen_wake_lock() {
            Ok(()) => {
                tracing::info!(operation = "cook_mode", "wake lock enabled");
                self.hold = WakeHold::WakeLock;
            }
            Err(reason) => {
                tracing::info!(
                    operation = "cook_mode",
                    reason = %reason,
                    "wake lock unavailable; using keep-alive"
                );
                page.start_keep_alive(KEEP_ALIVE_INTERVAL);
                self.hold = WakeHold::KeepAlive;
            }
        }
    }

    fn disable<P: CookModePage + ?Sized>(&mut self, page: &mut P) {
        match self.hold {
            WakeHold::WakeLock => page.release_screen_wake_lock(),
            WakeHold::KeepAlive => page.stop_keep_alive(),
            WakeHold::Released => {}
        }
        self.hold = WakeHold::Released;
        tracing::info!(operation = "cook_mode", "cook mode disabled");
    }
}
