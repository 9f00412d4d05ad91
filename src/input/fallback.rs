use thiserror::Error;
use tracing::{info, warn};

use crate::input::keys::VirtualKey;

/// Fallback hotkey registration errors
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The key has no equivalent in the registration API
    #[error("key {0} cannot be registered as a system hotkey")]
    UnsupportedKey(VirtualKey),

    /// The OS refused the registration (often: another app owns the key)
    #[error("failed to register hotkey {key}: {reason}")]
    Rejected {
        /// Key that was refused
        key: VirtualKey,
        /// OS-provided reason
        reason: String,
    },

    /// The OS refused to release a registration
    #[error("failed to unregister hotkey {key}: {reason}")]
    Unregister {
        /// Key that stayed registered
        key: VirtualKey,
        /// OS-provided reason
        reason: String,
    },
}

/// System-wide single-key registration (e.g. `RegisterHotKey`)
#[cfg_attr(test, mockall::automock)]
pub trait HotkeyRegistrar {
    /// Register `key` without modifiers
    ///
    /// # Errors
    /// Returns error if the OS refuses the key
    fn register(&mut self, key: VirtualKey) -> Result<(), RegistrationError>;

    /// Release a registration made by `register`
    ///
    /// # Errors
    /// Returns error if the OS refuses to release it
    fn unregister(&mut self, key: VirtualKey) -> Result<(), RegistrationError>;

    /// Opaque id that trigger notifications carry for the registered key
    fn trigger_id(&self) -> Option<u32>;
}

/// Keeps exactly one fallback hotkey registered.
///
/// Only used when the keyboard hook could not be installed. It sees trigger
/// notifications, never the raw key stream.
pub struct FallbackRegistrar {
    registrar: Box<dyn HotkeyRegistrar>,
    active: Option<VirtualKey>,
}

impl FallbackRegistrar {
    /// Register `key` and take ownership of the registration.
    ///
    /// A failed initial registration is logged; the registrar still exists so
    /// a later rebind can succeed.
    pub fn install(mut registrar: Box<dyn HotkeyRegistrar>, key: VirtualKey) -> Self {
        let active = match registrar.register(key) {
            Ok(()) => {
                info!(hotkey = %key, "fallback hotkey registered");
                Some(key)
            }
            Err(e) => {
                warn!(error = %e, "fallback hotkey not registered");
                None
            }
        };
        Self { registrar, active }
    }

    /// Key currently registered, if any
    #[must_use]
    pub const fn active(&self) -> Option<VirtualKey> {
        self.active
    }

    /// Whether a trigger notification with `id` belongs to our registration
    #[must_use]
    pub fn is_trigger(&self, id: u32) -> bool {
        self.active.is_some() && self.registrar.trigger_id() == Some(id)
    }

    /// Move the registration from `previous` to `next`: unregister, then register.
    ///
    /// # Errors
    /// Returns error if `next` could not be registered; unregister failures
    /// are logged and do not stop the new registration.
    pub fn rebind(&mut self, previous: VirtualKey, next: VirtualKey) -> Result<(), RegistrationError> {
        if self.active == Some(previous) {
            if let Err(e) = self.registrar.unregister(previous) {
                warn!(error = %e, "old fallback hotkey still registered");
            }
            self.active = None;
        }

        self.registrar.register(next)?;
        self.active = Some(next);
        info!(from = %previous, to = %next, "fallback hotkey re-registered");
        Ok(())
    }
}

impl Drop for FallbackRegistrar {
    fn drop(&mut self) {
        if let Some(key) = self.active.take() {
            if let Err(e) = self.registrar.unregister(key) {
                tracing::error!("failed to unregister fallback hotkey: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn registrar_accepting(trigger: u32) -> MockHotkeyRegistrar {
        let mut registrar = MockHotkeyRegistrar::new();
        registrar.expect_register().returning(|_| Ok(()));
        registrar.expect_unregister().returning(|_| Ok(()));
        registrar.expect_trigger_id().return_const(Some(trigger));
        registrar
    }

    #[test]
    fn test_install_registers_key() {
        let fallback = FallbackRegistrar::install(Box::new(registrar_accepting(1)), VirtualKey::F8);
        assert_eq!(fallback.active(), Some(VirtualKey::F8));
        assert!(fallback.is_trigger(1));
        assert!(!fallback.is_trigger(2));
    }

    #[test]
    fn test_failed_install_has_no_trigger() {
        let mut registrar = MockHotkeyRegistrar::new();
        registrar
            .expect_register()
            .returning(|key| Err(RegistrationError::UnsupportedKey(key)));
        registrar.expect_unregister().never();
        registrar.expect_trigger_id().return_const(Some(1_u32));

        let fallback = FallbackRegistrar::install(Box::new(registrar), VirtualKey::PACKET);
        assert_eq!(fallback.active(), None);
        assert!(!fallback.is_trigger(1));
    }

    #[test]
    fn test_rebind_after_failed_install_only_registers() {
        let mut registrar = MockHotkeyRegistrar::new();
        registrar
            .expect_register()
            .with(eq(VirtualKey::PACKET))
            .times(1)
            .returning(|key| Err(RegistrationError::UnsupportedKey(key)));
        registrar
            .expect_register()
            .with(eq(VirtualKey::F6))
            .times(1)
            .returning(|_| Ok(()));
        // Only the drop at the end of the test releases F6
        registrar
            .expect_unregister()
            .with(eq(VirtualKey::F6))
            .times(1)
            .returning(|_| Ok(()));

        let mut fallback = FallbackRegistrar::install(Box::new(registrar), VirtualKey::PACKET);
        assert!(fallback.rebind(VirtualKey::PACKET, VirtualKey::F6).is_ok());
        assert_eq!(fallback.active(), Some(VirtualKey::F6));
    }

    #[test]
    fn test_rebind_rejected_leaves_nothing_registered() {
        let mut registrar = MockHotkeyRegistrar::new();
        registrar
            .expect_register()
            .with(eq(VirtualKey::F8))
            .returning(|_| Ok(()));
        registrar
            .expect_register()
            .with(eq(VirtualKey::F6))
            .returning(|key| {
                Err(RegistrationError::Rejected {
                    key,
                    reason: "already registered".to_owned(),
                })
            });
        registrar
            .expect_unregister()
            .with(eq(VirtualKey::F8))
            .times(1)
            .returning(|_| Ok(()));

        let mut fallback = FallbackRegistrar::install(Box::new(registrar), VirtualKey::F8);
        let result = fallback.rebind(VirtualKey::F8, VirtualKey::F6);
        assert!(matches!(result, Err(RegistrationError::Rejected { .. })));
        assert_eq!(fallback.active(), None);
    }

    #[test]
    fn test_drop_unregisters_active_key() {
        let mut registrar = MockHotkeyRegistrar::new();
        registrar.expect_register().times(1).returning(|_| Ok(()));
        registrar
            .expect_unregister()
            .with(eq(VirtualKey::F8))
            .times(1)
            .returning(|_| Ok(()));

        drop(FallbackRegistrar::install(Box::new(registrar), VirtualKey::F8));
    }
}
