use embedded_can::{Frame, Id, StandardId};

use crate::error::ErrorCode;
use crate::prelude::*;

/// Parses a decimal or `0x`-prefixed hexadecimal unsigned number.
pub fn parse_u32(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.starts_with("0x") || s.starts_with("0X") {
        u32::from_str_radix(&s[2..], 16).ok()
    } else {
        s.parse().ok()
    }
}

pub fn get_cob_id<F: Frame>(frame: &F) -> Option<u16> {
    if let Id::Standard(sid) = frame.id() {
        return Some(sid.as_raw());
    }
    // No standard id. We only support CAN 2.0a in current version.
    None
}

/// Index and sub-index of an SDO frame. `None` if the frame is too short.
pub fn get_index_from_can_frame<F: Frame>(frame: &F) -> Option<(u16, u8)> {
    let data = frame.data();
    if data.len() < 4 {
        return None;
    }
    Some((u16::from_le_bytes([data[1], data[2]]), data[3]))
}

pub fn flatten(slices: &[&[u8]]) -> Vec<u8> {
    slices
        .iter()
        .flat_map(|&slice| slice.iter().cloned())
        .take(8)
        .chain(core::iter::repeat(0).take(8))
        .take(8)
        .collect()
}

pub fn create_frame_with_padding<F: Frame + Debug>(cob_id: u16, data: &[u8])
    -> Result<F, ErrorCode> {
    let mut packet = Vec::from(&data[..data.len().min(8)]);
    packet.resize(8, 0);

    F::new(StandardId::new(cob_id).ok_or(ErrorCode::InvalidStandardId {cob_id})?,
           &packet).ok_or(ErrorCode::FrameCreationFailed {data: data.to_vec()})
}

pub fn create_frame<F: Frame + Debug>(cob_id: u16, data: &[u8]) -> Result<F, ErrorCode> {
    F::new(StandardId::new(cob_id).ok_or(ErrorCode::InvalidStandardId {cob_id})?, data)
        .ok_or(ErrorCode::FrameCreationFailed{data: data.to_vec()})
}

pub fn create_remote_frame<F: Frame + Debug>(cob_id: u16, dlc: usize) -> Result<F, ErrorCode> {
    F::new_remote(StandardId::new(cob_id).ok_or(ErrorCode::InvalidStandardId {cob_id})?, dlc)
        .ok_or(ErrorCode::FrameCreationFailed{data: vec![]})
}

#[cfg(test)]
pub(crate) mod test_frame {
    use embedded_can::{Frame, Id, StandardId};

    /// Minimal frame for unit tests.
    #[derive(Debug, Clone, PartialEq)]
    pub struct MockFrame {
        pub id: Id,
        pub data: Vec<u8>,
        pub remote: bool,
    }

    impl MockFrame {
        pub fn std(cob_id: u16, data: &[u8]) -> Self {
            MockFrame::new(StandardId::new(cob_id).unwrap(), data).unwrap()
        }

        pub fn raw_id(&self) -> u16 {
            match self.id {
                Id::Standard(sid) => sid.as_raw(),
                Id::Extended(_) => panic!("extended id in test frame"),
            }
        }
    }

    impl Frame for MockFrame {
        fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
            if data.len() > 8 {
                return None;
            }
            Some(MockFrame { id: id.into(), data: data.to_vec(), remote: false })
        }

        fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
            if dlc > 8 {
                return None;
            }
            Some(MockFrame { id: id.into(), data: vec![0; dlc], remote: true })
        }

        fn is_extended(&self) -> bool {
            matches!(self.id, Id::Extended(_))
        }

        fn is_remote_frame(&self) -> bool {
            self.remote
        }

        fn id(&self) -> Id {
            self.id
        }

        fn dlc(&self) -> usize {
            self.data.len()
        }

        fn data(&self) -> &[u8] {
            if self.remote { &[] } else { &self.data }
        }
    }
}

#[cfg(test)]
mod util_tests {
    use super::test_frame::MockFrame;
    use super::{create_frame, create_frame_with_padding, flatten, get_index_from_can_frame,
                parse_u32, ErrorCode};

    #[test]
    fn test_create_frame_success() {
        let result = create_frame::<MockFrame>(0x123, &[0x01, 0x02, 0x03]);
        assert!(result.is_ok());
        assert_eq!(result.unwrap().raw_id(), 0x123);
    }

    #[test]
    fn test_create_frame_invalid_standard_id() {
        let result = create_frame::<MockFrame>(0x1FFF, &[0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(ErrorCode::InvalidStandardId { cob_id: 0x1FFF })));
    }

    #[test]
    fn test_create_frame_frame_creation_failed() {
        let data = &[0u8; 9];
        match create_frame::<MockFrame>(0x123, data) {
            Err(ErrorCode::FrameCreationFailed { data: returned_data }) => {
                assert_eq!(returned_data, data);
            },
            other => panic!("Expected ErrorCode::FrameCreationFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_create_frame_with_padding() {
        let frame = create_frame_with_padding::<MockFrame>(0x601, &[0x40, 0x41, 0x60]).unwrap();
        assert_eq!(frame.data, vec![0x40, 0x41, 0x60, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_flatten() {
        assert_eq!(flatten(&[&[0x2B], &[0x40, 0x60], &[0x00], &[0x06, 0x00]]),
                   vec![0x2B, 0x40, 0x60, 0x00, 0x06, 0x00, 0, 0]);
    }

    #[test]
    fn test_get_index_from_can_frame() {
        let frame = MockFrame::std(0x581, &[0x4B, 0x41, 0x60, 0x00, 0x37, 0x02, 0, 0]);
        assert_eq!(get_index_from_can_frame(&frame), Some((0x6041, 0)));
        assert_eq!(get_index_from_can_frame(&MockFrame::std(0x581, &[0x4B])), None);
    }

    #[test]
    fn test_parse_u32() {
        assert_eq!(parse_u32("0xFFFFFFFF"), Some(4_294_967_295));
        assert_eq!(parse_u32("0x1000"), Some(4096));
        assert_eq!(parse_u32(" 4096 "), Some(4096));
        assert_eq!(parse_u32("-1"), None);
        assert_eq!(parse_u32("0x100000000"), None);
    }
}
