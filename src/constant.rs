/// Canopen Function code prefixes on COB_ID
pub(crate) const COB_FUNC_NMT: u16 = 0x000;
pub(crate) const COB_FUNC_SYNC: u16 = 0x080;
pub(crate) const COB_FUNC_TPDO_0: u16 = 0x180;
pub(crate) const COB_FUNC_RPDO_0: u16 = 0x200;
pub(crate) const COB_FUNC_PDO_STEP: u16 = 0x100;
pub(crate) const COB_FUNC_TRANSMIT_SDO: u16 = 0x580;
pub(crate) const COB_FUNC_RECEIVE_SDO: u16 = 0x600;
pub(crate) const COB_FUNC_HEARTBEAT: u16 = 0x700;
pub(crate) const COB_FUNC_MASK: u16 = 0xFF80;
pub(crate) const COB_NODE_ID_MASK: u16 = 0x7F;

/// CANOPEN Registers
pub(crate) const REG_STORE_PARAMETERS: u16 = 0x1010;
pub(crate) const REG_RESTORE_DEFAULT_PARAMETERS: u16 = 0x1011;
pub(crate) const REG_RPDO_COMMUNICATION: u16 = 0x1400;
pub(crate) const REG_RPDO_MAPPING: u16 = 0x1600;
pub(crate) const REG_TPDO_COMMUNICATION: u16 = 0x1800;
pub(crate) const REG_TPDO_MAPPING: u16 = 0x1A00;

/// Misc
pub(crate) const SAVE_MAGIC_CODE: [u8; 4] = *b"save";
pub(crate) const LOAD_MAGIC_CODE: [u8; 4] = *b"load";
pub(crate) const PDO_COB_ID_INVALID: u32 = 0x8000_0000;
pub(crate) const NUM_OF_PDOS: usize = 4;
