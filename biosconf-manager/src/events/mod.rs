//! Event helpers and default collaborators

use biosconf_api::{BootOptionValues, EventNotifier, ObjectExposer};

/// Property names carried by change events
pub mod property {
    pub const CURRENT_BOOT: &str = "CurrentBoot";
    pub const ENABLE: &str = "Enable";
    pub const MODE: &str = "Mode";
    pub const RESET_BIOS_SETTINGS: &str = "ResetBIOSSettings";
}

/// Segment after the last `.` of a bus-qualified value; unqualified values pass through
///
/// Unqualified values still produce an event, so `Enable` reports `true`/`false`.
pub fn property_value_suffix(value: &str) -> &str {
    match value.rfind('.') {
        Some(pos) => &value[pos + 1..],
        None => value,
    }
}

/// Notifier that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl EventNotifier for LogNotifier {
    fn property_changed(&self, property: &str, value: &str, object_path: &str) {
        log::info!("{} changed to {} on {}", property, value, object_path);
    }
}

/// Exposer that publishes nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullExposer;

impl ObjectExposer for NullExposer {
    fn expose(&mut self, path: &str, _values: &BootOptionValues) {
        log::trace!("Not exposing {}", path);
    }

    fn withdraw(&mut self, path: &str) {
        log::trace!("Not withdrawing {}", path);
    }
}
