use crate::constant::{COB_FUNC_PDO_STEP, COB_FUNC_RPDO_0, COB_FUNC_TPDO_0, NUM_OF_PDOS};
use crate::error::ErrorCode;

pub(crate) const MAX_PDO_MAPPING_LENGTH: u32 = 64;

/// Largest transmission type that still means "every n-th SYNC".
const MAX_SYNC_PERIOD: u8 = 240;
const TRANSMISSION_TYPE_ASYNC: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdoMappingEntry {
    pub index: u16,
    pub sub_index: u8,
    pub bits: u8,
}

impl PdoMappingEntry {
    /// Value written to the mapping parameter object (0x1600/0x1A00 + n).
    pub fn encode(&self) -> u32 {
        (self.index as u32) << 16 | (self.sub_index as u32) << 8 | self.bits as u32
    }
}

/// Ordered list of objects carried by one PDO, at most 64 bits in total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdoMapping {
    entries: Vec<PdoMappingEntry>,
}

impl PdoMapping {
    pub fn new() -> Self {
        PdoMapping::default()
    }

    pub fn add(&mut self, index: u16, sub_index: u8, bits: u8) -> Result<(), ErrorCode> {
        let total = self.total_bits() + bits as u32;
        if total > MAX_PDO_MAPPING_LENGTH {
            return Err(ErrorCode::ExceedPdoSize { bits: total });
        }
        self.entries.push(PdoMappingEntry { index, sub_index, bits });
        Ok(())
    }

    pub fn entries(&self) -> &[PdoMappingEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_bits(&self) -> u32 {
        self.entries.iter().map(|e| e.bits as u32).sum()
    }

    pub fn total_bytes(&self) -> usize {
        ((self.total_bits() + 7) / 8) as usize
    }
}

/// Communication parameters of a PDO (sub-indices 2, 3 and 5 of
/// 0x1400/0x1800 + n).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdoCommunicationParameters {
    pub transmission_type: u8,
    /// Minimum time between two transmissions, in multiples of 100us.
    pub inhibit_time: u16,
    /// Event timer in ms, 0 disables it.
    pub event_timer: u16,
}

impl PdoCommunicationParameters {
    /// Sent every `period` SYNC messages.
    pub fn sync(period: u8) -> Result<Self, ErrorCode> {
        if period == 0 || period > MAX_SYNC_PERIOD {
            return Err(ErrorCode::InvalidArgument {
                more_info: format!("sync period must be within 1..={}, got {}", MAX_SYNC_PERIOD, period),
            });
        }
        Ok(PdoCommunicationParameters { transmission_type: period, inhibit_time: 0, event_timer: 0 })
    }

    pub fn asynchronous() -> Self {
        PdoCommunicationParameters {
            transmission_type: TRANSMISSION_TYPE_ASYNC,
            inhibit_time: 0,
            event_timer: 0,
        }
    }

    /// Asynchronous, also sent every `period_ms` even without a change.
    pub fn timer(period_ms: u16) -> Self {
        PdoCommunicationParameters { event_timer: period_ms, ..Self::asynchronous() }
    }

    pub fn with_inhibit_time(self, inhibit_time: u16) -> Self {
        PdoCommunicationParameters { inhibit_time, ..self }
    }

    pub fn is_sync(&self) -> bool {
        (1..=MAX_SYNC_PERIOD).contains(&self.transmission_type)
    }
}

impl Default for PdoCommunicationParameters {
    fn default() -> Self {
        Self::asynchronous()
    }
}

pub(crate) fn check_pdo_index(index: usize) -> Result<(), ErrorCode> {
    if index >= NUM_OF_PDOS {
        return Err(ErrorCode::InvalidArgument {
            more_info: format!("PDO index {} outside 0..{}", index, NUM_OF_PDOS),
        });
    }
    Ok(())
}

/// COB-ID of the n-th PDO in the predefined connection set.
pub fn pdo_cob_id(transmit: bool, index: usize, node_id: u8) -> u16 {
    let base = if transmit { COB_FUNC_TPDO_0 } else { COB_FUNC_RPDO_0 };
    base + COB_FUNC_PDO_STEP * index as u16 + node_id as u16
}

/// Reverse of `pdo_cob_id` for the transmit side: which TPDO a function
/// code belongs to.
pub fn tpdo_index_from_function(func: u16) -> Option<usize> {
    if func < COB_FUNC_TPDO_0 || (func - COB_FUNC_TPDO_0) % COB_FUNC_PDO_STEP != 0 {
        return None;
    }
    let index = ((func - COB_FUNC_TPDO_0) / COB_FUNC_PDO_STEP) as usize;
    if index < NUM_OF_PDOS { Some(index) } else { None }
}

fn bit_mask(bits: u8) -> u64 {
    if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }
}

/// Packs values into a PDO payload. The first value occupies the least
/// significant bits, bytes are little-endian.
pub(crate) fn pack_data(values: &[(u64, u8)]) -> Vec<u8> {
    let mut merged = 0u64;
    let mut offset = 0u32;
    for &(data, bits) in values {
        if offset < 64 {
            merged |= (data & bit_mask(bits)) << offset;
        }
        offset += bits as u32;
    }
    let total_bytes = ((offset + 7) / 8).min(8) as usize;
    merged.to_le_bytes()[..total_bytes].to_vec()
}

/// Inverse of `pack_data`. `None` if the payload is shorter than the mapping.
pub(crate) fn unpack_data(data: &[u8], bits: &[u8]) -> Option<Vec<u64>> {
    let total: u32 = bits.iter().map(|&b| b as u32).sum();
    if data.len() * 8 < total as usize || total > MAX_PDO_MAPPING_LENGTH {
        return None;
    }
    let mut buf = [0u8; 8];
    let len = data.len().min(8);
    buf[..len].copy_from_slice(&data[..len]);
    let mut merged = u64::from_le_bytes(buf);
    let mut res = Vec::with_capacity(bits.len());
    for &b in bits {
        res.push(merged & bit_mask(b));
        merged = if b >= 64 { 0 } else { merged >> b };
    }
    Some(res)
}
