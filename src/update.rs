use crate::objects::lookup;

/// What one processed frame changed.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Update {
    #[default]
    None,
    /// The drive acknowledged a write of `value` to this object.
    Ack { index: u16, sub_index: u8, value: Vec<u8> },
    /// Mask over the `UPDATE_*` groups whose cached values changed.
    Updated(u64),
}

impl Update {
    pub fn updated(mask: u64) -> Update {
        if mask == 0 { Update::None } else { Update::Updated(mask) }
    }

    pub fn mask(&self) -> u64 {
        match self {
            Update::Updated(mask) => *mask,
            _ => 0,
        }
    }

    pub fn is_ack(&self) -> bool {
        matches!(self, Update::Ack { .. })
    }

    pub fn is_acked(&self, index: u16, sub_index: u8) -> bool {
        matches!(self, Update::Ack { index: i, sub_index: s, .. } if *i == index && *s == sub_index)
    }

    /// True when every bit of `mask` was updated.
    pub fn is_updated(&self, mask: u64) -> bool {
        self.mask() & mask == mask
    }

    /// True when at least one bit of `mask` was updated.
    pub fn has_one_updated(&self, mask: u64) -> bool {
        self.mask() & mask != 0
    }

    /// Accumulates results over several frames. Group bits are ORed, an ack
    /// is only kept while no group bit has been seen.
    pub fn merge(&self, other: &Update) -> Update {
        let mask = self.mask() | other.mask();
        if mask != 0 {
            return Update::Updated(mask);
        }
        match (self, other) {
            (_, Update::Ack { .. }) => other.clone(),
            _ => self.clone(),
        }
    }
}

/// Groups of the object with the given identity, 0 when it is unknown.
pub fn classify(index: u16, sub_index: u8) -> u64 {
    lookup(index, sub_index).map_or(0, |object| object.update)
}

pub fn classify_all<'a, I>(objects: I) -> u64
    where I: IntoIterator<Item = &'a (u16, u8)> {
    objects
        .into_iter()
        .fold(0, |mask, (index, sub_index)| mask | classify(*index, *sub_index))
}
