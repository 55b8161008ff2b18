//! Auto-wiring resolver
//!
//! Fills a service's declared dependency slots from the resolution
//! registry. Reflection is replaced with an explicit declaration: a
//! service holds its dependencies in [`Slot`]s and enumerates them
//! through the [`Wireable`] trait.
//!
//! ```ignore
//! struct ParentService {
//!     users: Slot<UsersRepo>,
//!     audit: Slot<AuditLog>, // optional collaborator
//! }
//!
//! impl Wireable for ParentService {
//!     fn slots(&mut self) -> Vec<&mut dyn WireSlot> {
//!         vec![&mut self.users, &mut self.audit]
//!     }
//! }
//! ```
//!
//! A service calls [`wire`] at the top of each public operation rather
//! than once at construction, so an instance created before any session
//! or registration exists still picks its collaborators up lazily.

use std::any::{type_name, Any};

use tracing::{debug, warn};

use crate::registry;
use uwk_domain::error::{Error, Result};

/// A declared dependency slot of kind `T`
///
/// Starts unfilled unless constructed with [`Slot::with`]. Wiring fills
/// it from the registry; a filled slot is never overwritten.
pub struct Slot<T> {
    value: Option<T>,
    optional: bool,
}

impl<T: Any + Send> Slot<T> {
    /// Declare a mandatory dependency
    pub fn required() -> Self {
        Self {
            value: None,
            optional: false,
        }
    }

    /// Declare an optional dependency; wiring skips it silently when the
    /// kind is unregistered
    pub fn optional() -> Self {
        Self {
            value: None,
            optional: true,
        }
    }

    /// Declare a slot pre-populated with `value` (e.g. a hand-built mock)
    pub fn with(value: T) -> Self {
        Self {
            value: Some(value),
            optional: false,
        }
    }

    /// Populate the slot manually
    pub fn set(&mut self, value: T) {
        self.value = Some(value);
    }

    /// Access the wired dependency
    ///
    /// An unfilled slot reports `UnregisteredKind` for its kind: the
    /// deterministic, late surface of a wiring gap.
    pub fn get(&self) -> Result<&T> {
        self.value
            .as_ref()
            .ok_or_else(|| Error::unregistered_kind(type_name::<T>()))
    }

    /// Access the dependency if present
    pub fn as_option(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

impl<T: Any + Send> Default for Slot<T> {
    fn default() -> Self {
        Self::required()
    }
}

/// Type-erased view of a [`Slot`], used by the wiring pass
pub trait WireSlot {
    /// Whether the slot already holds a value
    fn is_filled(&self) -> bool;

    /// Whether the declared kind is optional
    fn is_optional(&self) -> bool;

    /// Fully qualified name of the declared kind
    fn kind_name(&self) -> &'static str;

    /// Attempt to fill the slot from the registry; true when filled
    fn fill_from_registry(&mut self) -> bool;
}

impl<T: Any + Send> WireSlot for Slot<T> {
    fn is_filled(&self) -> bool {
        self.value.is_some()
    }

    fn is_optional(&self) -> bool {
        self.optional
    }

    fn kind_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn fill_from_registry(&mut self) -> bool {
        match registry::resolve::<T>() {
            Ok(instance) => {
                self.value = Some(instance);
                true
            }
            Err(_) => false,
        }
    }
}

/// A service whose dependency slots can be wired
pub trait Wireable {
    /// Enumerate the declared dependency slots
    fn slots(&mut self) -> Vec<&mut dyn WireSlot>;
}

/// Fill every unfilled slot of `target` from the registry
///
/// Filled slots are skipped, so repeated wiring is idempotent. An
/// unregistered optional kind is skipped silently; an unregistered
/// mandatory kind leaves the slot unfilled (the failure then surfaces
/// at first use, via [`Slot::get`]) but is logged so the integration
/// gap is visible.
pub fn wire(target: &mut dyn Wireable) {
    for slot in target.slots() {
        if slot.is_filled() {
            continue;
        }
        if slot.fill_from_registry() {
            debug!(kind = slot.kind_name(), "dependency wired");
        } else if !slot.is_optional() {
            warn!(
                kind = slot.kind_name(),
                "mandatory dependency kind is unregistered; slot left unfilled"
            );
        }
    }
}
