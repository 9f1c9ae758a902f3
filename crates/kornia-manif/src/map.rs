//! Group elements viewed over externally owned coefficient storage.
//!
//! Optimizers usually keep their whole state in one flat `f64` buffer. A [`GroupMap`]
//! borrows a block of that buffer and reads or updates it as a group element, so the state
//! never has to be copied into owned values and back. Exclusive borrowing guarantees that
//! two views never alias the same mutable block.

use std::marker::PhantomData;

use crate::error::{check_size, LieError};
use crate::group::LieGroup;

/// A read-only view of a group element stored in a borrowed coefficient block.
#[derive(Debug, Clone, Copy)]
pub struct GroupRef<'a, G: LieGroup> {
    data: &'a [f64],
    _group: PhantomData<G>,
}

impl<'a, G: LieGroup> GroupRef<'a, G> {
    /// Wrap a block of exactly `G::REP_SIZE` coefficients.
    pub fn new(data: &'a [f64]) -> Result<Self, LieError> {
        check_size(data, G::REP_SIZE)?;
        Ok(Self {
            data,
            _group: PhantomData,
        })
    }

    /// Read the element out of the block.
    pub fn get(&self) -> Result<G, LieError> {
        G::from_coeffs(self.data)
    }

    /// The underlying coefficients.
    pub fn as_slice(&self) -> &[f64] {
        self.data
    }
}

/// A mutable view of a group element stored in a borrowed coefficient block.
#[derive(Debug)]
pub struct GroupMap<'a, G: LieGroup> {
    data: &'a mut [f64],
    _group: PhantomData<G>,
}

impl<'a, G: LieGroup> GroupMap<'a, G> {
    /// Wrap a block of exactly `G::REP_SIZE` coefficients.
    pub fn new(data: &'a mut [f64]) -> Result<Self, LieError> {
        check_size(data, G::REP_SIZE)?;
        Ok(Self {
            data,
            _group: PhantomData,
        })
    }

    /// Read the element out of the block.
    pub fn get(&self) -> Result<G, LieError> {
        G::from_coeffs(self.data)
    }

    /// Overwrite the block with `element`.
    pub fn set(&mut self, element: &G) {
        self.data.copy_from_slice(&element.coeffs());
    }

    /// Overwrite the block with the identity element.
    pub fn set_identity(&mut self) {
        self.set(&G::identity());
    }

    /// In-place composition: `self = self ∘ other`.
    pub fn compose_assign(&mut self, other: &G) -> Result<(), LieError> {
        let composed = self.get()?.compose(other, None, None);
        self.set(&composed);
        Ok(())
    }

    /// In-place right plus: `self = self ⊕ tangent`.
    pub fn rplus_assign(&mut self, tangent: &G::Tangent) -> Result<(), LieError> {
        let updated = self.get()?.rplus(tangent, None, None);
        self.set(&updated);
        Ok(())
    }

    /// A read-only view of the same block.
    pub fn view(&self) -> GroupRef<'_, G> {
        GroupRef {
            data: &*self.data,
            _group: PhantomData,
        }
    }
}

/// Split a state buffer into consecutive mutable views, one per `G::REP_SIZE` block.
pub fn map_blocks_mut<G: LieGroup>(data: &mut [f64]) -> Result<Vec<GroupMap<'_, G>>, LieError> {
    if data.len() % G::REP_SIZE != 0 {
        return Err(LieError::UnalignedBuffer {
            len: data.len(),
            block: G::REP_SIZE,
        });
    }
    data.chunks_exact_mut(G::REP_SIZE)
        .map(GroupMap::new)
        .collect()
}
