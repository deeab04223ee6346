/// Native scalar encoding of an object dictionary entry. The discriminants
/// are the CiA 301 data type codes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DataType {
    Integer8 = 0x2,
    Integer16 = 0x3,
    Integer32 = 0x4,
    Unsigned8 = 0x5,
    Unsigned16 = 0x6,
    Unsigned32 = 0x7,
    Integer64 = 0x15,
    Unsigned64 = 0x1B,
}

impl DataType {
    // Return size of a type in bytes.
    pub fn size(&self) -> usize {
        match self {
            DataType::Integer8 | DataType::Unsigned8 => 1,
            DataType::Integer16 | DataType::Unsigned16 => 2,
            DataType::Integer32 | DataType::Unsigned32 => 4,
            DataType::Integer64 | DataType::Unsigned64 => 8,
        }
    }

    pub fn bits(&self) -> u8 {
        (self.size() * 8) as u8
    }

    /// Encodes `value` as little-endian bytes of this type, or `None` if it
    /// does not fit.
    pub fn encode(&self, value: i64) -> Option<Vec<u8>> {
        let bytes = match self {
            DataType::Integer8 => i8::try_from(value).ok()?.to_le_bytes().to_vec(),
            DataType::Integer16 => i16::try_from(value).ok()?.to_le_bytes().to_vec(),
            DataType::Integer32 => i32::try_from(value).ok()?.to_le_bytes().to_vec(),
            DataType::Integer64 => value.to_le_bytes().to_vec(),
            DataType::Unsigned8 => u8::try_from(value).ok()?.to_le_bytes().to_vec(),
            DataType::Unsigned16 => u16::try_from(value).ok()?.to_le_bytes().to_vec(),
            DataType::Unsigned32 => u32::try_from(value).ok()?.to_le_bytes().to_vec(),
            DataType::Unsigned64 => u64::try_from(value).ok()?.to_le_bytes().to_vec(),
        };
        Some(bytes)
    }

    /// Decodes little-endian bytes. Longer inputs are truncated to the type
    /// size, shorter ones are rejected.
    pub fn decode(&self, data: &[u8]) -> Option<i64> {
        let size = self.size();
        if data.len() < size {
            return None;
        }
        let mut buf = [0u8; 8];
        buf[..size].copy_from_slice(&data[..size]);
        let value = match self {
            DataType::Integer8 => buf[0] as i8 as i64,
            DataType::Integer16 => i16::from_le_bytes([buf[0], buf[1]]) as i64,
            DataType::Integer32 => i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as i64,
            DataType::Integer64 => i64::from_le_bytes(buf),
            DataType::Unsigned8 => buf[0] as i64,
            DataType::Unsigned16 => u16::from_le_bytes([buf[0], buf[1]]) as i64,
            DataType::Unsigned32 => u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as i64,
            // Values above i64::MAX wrap, no object in the catalogue uses them.
            DataType::Unsigned64 => u64::from_le_bytes(buf) as i64,
        };
        Some(value)
    }
}
