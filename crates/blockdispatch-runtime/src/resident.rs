//! Process-wide resident argument slots.
//!
//! An argument too large for the kernel parameter space is staged once by the host before the
//! launch and read by every lane during it. There is one slot per argument type. The slot is
//! written by [`ResidentArgs::stage`], read with [`get_arg`], and cleared when the returned
//! [`StagedArg`] guard is dropped, after the launch completed.
//!
//! Staging the same type twice while a guard is alive fails, overlapping resident launches of one
//! argument type must be serialized by the caller.

use core::{
    any::{Any, TypeId},
    ops::Deref,
};
use std::sync::Arc;

use hashbrown::HashMap;

use crate::{backtrace::BackTrace, server::LaunchError};

type Slots = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

static RESIDENT_ARGS: spin::RwLock<Option<Slots>> = spin::RwLock::new(None);

/// Staging API of the resident argument slots.
pub struct ResidentArgs;

impl ResidentArgs {
    /// Writes `arg` into the resident slot of its type.
    ///
    /// The slot stays readable until the returned guard is dropped.
    pub fn stage<A: Send + Sync + 'static>(arg: A) -> Result<StagedArg<A>, LaunchError> {
        let mut slots = RESIDENT_ARGS.write();
        let slots = slots.get_or_insert_with(HashMap::new);
        let type_id = TypeId::of::<A>();

        if slots.contains_key(&type_id) {
            return Err(LaunchError::ResidentSlotBusy {
                arg: core::any::type_name::<A>(),
                backtrace: BackTrace::capture(),
            });
        }

        let arg = Arc::new(arg);
        slots.insert(type_id, arg.clone());
        log::trace!("Staged resident argument {}", core::any::type_name::<A>());

        Ok(StagedArg { arg })
    }

    /// Whether an argument of type `A` is currently staged.
    pub fn is_staged<A: 'static>() -> bool {
        RESIDENT_ARGS
            .read()
            .as_ref()
            .is_some_and(|slots| slots.contains_key(&TypeId::of::<A>()))
    }
}

/// Returns the staged copy of the argument of type `A`, if any.
pub fn try_get_arg<A: Send + Sync + 'static>() -> Option<Arc<A>> {
    let slots = RESIDENT_ARGS.read();
    let arg = slots.as_ref()?.get(&TypeId::of::<A>())?.clone();

    arg.downcast::<A>().ok()
}

/// Returns the staged copy of the argument of type `A`.
///
/// # Panics
///
/// Panics if no argument of type `A` is staged. Resident launches always stage their argument
/// before the first lane runs.
pub fn get_arg<A: Send + Sync + 'static>() -> Arc<A> {
    match try_get_arg::<A>() {
        Some(arg) => arg,
        None => panic!(
            "No resident argument staged for {}",
            core::any::type_name::<A>()
        ),
    }
}

/// Guard keeping a resident argument staged.
///
/// Dropping the guard clears the slot.
pub struct StagedArg<A: Send + Sync + 'static> {
    arg: Arc<A>,
}

impl<A: Send + Sync + 'static> Deref for StagedArg<A> {
    type Target = A;

    fn deref(&self) -> &Self::Target {
        &self.arg
    }
}

impl<A: Send + Sync + 'static> Drop for StagedArg<A> {
    fn drop(&mut self) {
        let mut slots = RESIDENT_ARGS.write();
        let Some(slots) = slots.as_mut() else {
            return;
        };

        let type_id = TypeId::of::<A>();
        let owned = slots.get(&type_id).is_some_and(|staged| {
            let staged = Arc::as_ptr(staged) as *const ();
            core::ptr::eq(staged, Arc::as_ptr(&self.arg) as *const ())
        });

        if owned {
            slots.remove(&type_id);
            log::trace!("Cleared resident argument {}", core::any::type_name::<A>());
        }
    }
}
