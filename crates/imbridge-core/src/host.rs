//! Host-side render state: texture slots plus the current projection.
//!
//! Hosts with their own state tables implement [`HostState`] directly; this
//! module covers hosts that want the classic `activeTexture` / `bindTexture`
//! bookkeeping without writing it themselves.

use crate::backend::{BindGroupHandle, HostState};
use crate::error::TextureSlotError;
use crate::matrix::{ColumnMajor, RowMajorMatrix};

/// Number of texture units a host can address.
pub const MAX_TEXTURE_SLOTS: usize = 32;

/// Texture unit table with one active slot.
#[derive(Debug, Clone)]
pub struct TextureSlots {
    slots: [Option<BindGroupHandle>; MAX_TEXTURE_SLOTS],
    active: usize,
}

impl TextureSlots {
    pub fn new() -> Self {
        Self {
            slots: [None; MAX_TEXTURE_SLOTS],
            active: 0,
        }
    }

    /// Selects the slot later `bind` calls and lookups refer to.
    pub fn activate(&mut self, slot: usize) -> Result<(), TextureSlotError> {
        if slot >= MAX_TEXTURE_SLOTS {
            return Err(TextureSlotError {
                slot,
                max: MAX_TEXTURE_SLOTS - 1,
            });
        }
        self.active = slot;
        Ok(())
    }

    pub fn active_slot(&self) -> usize {
        self.active
    }

    /// Binds `handle` to the active slot; `None` unbinds it.
    pub fn bind(&mut self, handle: Option<BindGroupHandle>) {
        self.slots[self.active] = handle;
    }

    pub fn get(&self, slot: usize) -> Option<BindGroupHandle> {
        self.slots.get(slot).copied().flatten()
    }

    pub fn active(&self) -> Option<BindGroupHandle> {
        self.slots[self.active]
    }
}

impl Default for TextureSlots {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal [`HostState`]: a projection matrix and a texture slot table.
#[derive(Debug, Clone, Default)]
pub struct RenderState<P = RowMajorMatrix> {
    pub projection: P,
    pub textures: TextureSlots,
}

impl<P: ColumnMajor> RenderState<P> {
    pub fn new(projection: P) -> Self {
        Self {
            projection,
            textures: TextureSlots::new(),
        }
    }
}

impl<P: ColumnMajor> HostState for RenderState<P> {
    type Projection = P;

    fn projection_matrix(&self) -> &P {
        &self.projection
    }

    fn active_texture_bind_group(&self) -> Option<BindGroupHandle> {
        self.textures.active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_slot_zero_with_nothing_bound() {
        let slots = TextureSlots::new();
        assert_eq!(slots.active_slot(), 0);
        assert_eq!(slots.active(), None);
    }

    #[test]
    fn bind_targets_the_active_slot() {
        let mut slots = TextureSlots::new();
        slots.bind(Some(BindGroupHandle(7)));
        slots.activate(2).unwrap();
        slots.bind(Some(BindGroupHandle(9)));

        assert_eq!(slots.get(0), Some(BindGroupHandle(7)));
        assert_eq!(slots.get(2), Some(BindGroupHandle(9)));
        assert_eq!(slots.active(), Some(BindGroupHandle(9)));

        slots.activate(0).unwrap();
        assert_eq!(slots.active(), Some(BindGroupHandle(7)));
    }

    #[test]
    fn unbind_clears_the_slot() {
        let mut slots = TextureSlots::new();
        slots.bind(Some(BindGroupHandle(1)));
        slots.bind(None);
        assert_eq!(slots.active(), None);
    }

    #[test]
    fn out_of_range_activation_keeps_the_previous_slot() {
        let mut slots = TextureSlots::new();
        slots.activate(3).unwrap();
        let err = slots.activate(MAX_TEXTURE_SLOTS).unwrap_err();
        assert_eq!(err.slot, MAX_TEXTURE_SLOTS);
        assert_eq!(slots.active_slot(), 3);
        assert_eq!(slots.get(MAX_TEXTURE_SLOTS + 5), None);
    }

    #[test]
    fn render_state_exposes_active_texture() {
        let mut state = RenderState::new(RowMajorMatrix::IDENTITY);
        assert_eq!(state.active_texture_bind_group(), None);
        state.textures.bind(Some(BindGroupHandle(4)));
        assert_eq!(state.active_texture_bind_group(), Some(BindGroupHandle(4)));
        assert_eq!(*state.projection_matrix(), RowMajorMatrix::IDENTITY);
    }
}
