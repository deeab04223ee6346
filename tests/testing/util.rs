use embedded_can::{Frame, Id, StandardId};

pub const NODE_ID: u8 = 1;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// In-memory CAN frame, stands in for the driver's frame type.
#[derive(Debug, Clone, PartialEq)]
pub struct TestFrame {
    pub id: Id,
    pub data: Vec<u8>,
    pub remote: bool,
}

impl TestFrame {
    pub fn std(cob_id: u16, data: &[u8]) -> Self {
        TestFrame::new(StandardId::new(cob_id).unwrap(), data).unwrap()
    }

    pub fn raw_id(&self) -> u16 {
        match self.id {
            Id::Standard(sid) => sid.as_raw(),
            Id::Extended(_) => panic!("extended id in test frame"),
        }
    }
}

impl Frame for TestFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > 8 {
            return None;
        }
        Some(TestFrame { id: id.into(), data: data.to_vec(), remote: false })
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        if dlc > 8 {
            return None;
        }
        Some(TestFrame { id: id.into(), data: vec![0; dlc], remote: true })
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

pub fn frame_to_string(frame: &TestFrame) -> String {
    let data_string = frame
        .data
        .iter()
        .map(|x| format!("{:02X}", x))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{:03X}   [{}]  {}", frame.raw_id(), frame.data.len(), data_string)
}

/// Index and sub-index addressed by an SDO request or response.
pub fn sdo_target(frame: &TestFrame) -> (u16, u8) {
    (u16::from_le_bytes([frame.data[1], frame.data[2]]), frame.data[3])
}
