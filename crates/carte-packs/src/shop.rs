//! The pack storefront: definitions keyed by id, listed by price.

use std::collections::BTreeMap;

use carte_ledger::Ledger;
use carte_types::{CarteError, PackDefinition, PackId, Result, UserId};
use rand::Rng;

use crate::opener::{PackOpening, open_pack};

#[derive(Debug, Clone, Default)]
pub struct PackShop {
    packs: BTreeMap<PackId, PackDefinition>,
}

impl PackShop {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_packs(packs: impl IntoIterator<Item = PackDefinition>) -> Result<Self> {
        let mut shop = Self::new();
        for pack in packs {
            shop.insert(pack)?;
        }
        Ok(shop)
    }

    /// # Errors
    /// Returns `DuplicatePack` if the id is already listed.
    pub fn insert(&mut self, pack: PackDefinition) -> Result<()> {
        if self.packs.contains_key(&pack.id) {
            return Err(CarteError::DuplicatePack(pack.id));
        }
        self.packs.insert(pack.id, pack);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: PackId) -> Option<&PackDefinition> {
        self.packs.get(&id)
    }

    #[must_use]
    pub fn find_by_slug(&self, slug: &str) -> Option<&PackDefinition> {
        self.packs.values().find(|p| p.slug == slug)
    }

    /// Packs on sale, cheapest first (ties by id).
    #[must_use]
    pub fn active_packs(&self) -> Vec<&PackDefinition> {
        let mut active: Vec<_> = self.packs.values().filter(|p| p.is_active).collect();
        active.sort_by_key(|p| (p.price, p.id));
        active
    }

    /// Look up a pack and open it for `user_id`.
    ///
    /// # Errors
    /// `PackNotFound` for an unknown id, otherwise whatever
    /// [`open_pack`] returns.
    pub fn open_pack_for_user<R: Rng + ?Sized>(
        &self,
        ledger: &Ledger,
        user_id: UserId,
        pack_id: PackId,
        rng: &mut R,
    ) -> Result<PackOpening> {
        let pack = self.get(pack_id).ok_or(CarteError::PackNotFound(pack_id))?;
        open_pack(ledger, user_id, pack, rng)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }
}
