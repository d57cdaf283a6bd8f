//! Secure boot state

use biosconf_api::{CurrentBoot, SecureBootMode};

/// Current boot selector, secure boot enablement and mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SecureBootState {
    pub current_boot: CurrentBoot,
    pub enable: bool,
    pub mode: SecureBootMode,
}

impl SecureBootState {
    pub fn new(current_boot: CurrentBoot, enable: bool, mode: SecureBootMode) -> Self {
        Self {
            current_boot,
            enable,
            mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = SecureBootState::default();
        assert_eq!(state.current_boot, CurrentBoot::Unknown);
        assert!(!state.enable);
        assert_eq!(state.mode, SecureBootMode::Setup);
    }
}
