// Master-side CANopen state machine for a single remote node. It builds the
// frames the caller has to send and interprets the frames it is handed. It
// never touches the bus itself.
use std::collections::VecDeque;
use std::time::Instant;

use embedded_can::Frame;

use crate::constant::{COB_FUNC_HEARTBEAT, COB_FUNC_MASK, COB_FUNC_NMT, COB_FUNC_SYNC,
                      COB_FUNC_TRANSMIT_SDO, COB_NODE_ID_MASK, NUM_OF_PDOS, PDO_COB_ID_INVALID,
                      REG_RPDO_COMMUNICATION, REG_RPDO_MAPPING, REG_TPDO_COMMUNICATION,
                      REG_TPDO_MAPPING};
use crate::error::ErrorCode;
use crate::pdo::{check_pdo_index, pack_data, pdo_cob_id, tpdo_index_from_function, unpack_data,
                 PdoCommunicationParameters, PdoMapping};
use crate::prelude::*;
use crate::sdo_client::{download_request, parse_response, upload_request, SdoResponse};
use crate::util::{create_frame, create_remote_frame, get_cob_id};
use crate::value::{ByteConvertible, Value};
use crate::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Unknown,
    Init,
    Stopped,
    Operational,
    PreOperational,
}

impl NodeState {
    /// Node guarding replies carry a toggle bit in bit 7, it is ignored.
    pub fn from_heartbeat_code(code: u8) -> NodeState {
        match code & 0x7F {
            0 => NodeState::Init,
            4 => NodeState::Stopped,
            5 => NodeState::Operational,
            127 => NodeState::PreOperational,
            _ => NodeState::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStateTransition {
    Start,
    Stop,
    EnterPreOperational,
    ResetNode,
    ResetCommunication,
}

impl NodeStateTransition {
    pub fn command(&self) -> u8 {
        match self {
            NodeStateTransition::Start => 0x01,
            NodeStateTransition::Stop => 0x02,
            NodeStateTransition::EnterPreOperational => 0x80,
            NodeStateTransition::ResetNode => 0x81,
            NodeStateTransition::ResetCommunication => 0x82,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessMode {
    Ignored,
    Heartbeat,
    SdoUpload,
    SdoDownloadAck,
    Tpdo,
}

/// Outcome of `StateMachine::process`: what kind of frame it was and which
/// objects of the cache it changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessResult {
    pub mode: ProcessMode,
    pub updated: Vec<(u16, u8)>,
}

impl ProcessResult {
    fn ignored() -> Self {
        ProcessResult { mode: ProcessMode::Ignored, updated: vec![] }
    }

    fn with(mode: ProcessMode, updated: Vec<(u16, u8)>) -> Self {
        ProcessResult { mode, updated }
    }
}

#[derive(Debug, Clone)]
struct CachedObject {
    value: Value,
    timestamp: Instant,
}

pub struct StateMachine {
    node_id: u8,
    state: NodeState,
    objects: HashMap<(u16, u8), CachedObject>,
    /// Values written but not yet acknowledged, oldest first per object.
    pending_downloads: HashMap<(u16, u8), VecDeque<Vec<u8>>>,
    rpdo_mappings: [PdoMapping; NUM_OF_PDOS],
    tpdo_mappings: [PdoMapping; NUM_OF_PDOS],
}

impl StateMachine {
    pub fn new(node_id: u8) -> Self {
        StateMachine {
            node_id,
            state: NodeState::Unknown,
            objects: HashMap::new(),
            pending_downloads: HashMap::new(),
            rpdo_mappings: Default::default(),
            tpdo_mappings: Default::default(),
        }
    }

    pub fn node_id(&self) -> u8 {
        self.node_id
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn upload<F: Frame + Debug>(&self, index: u16, sub_index: u8) -> Result<F, ErrorCode> {
        upload_request(self.node_id, index, sub_index)
    }

    /// Expedited download. The value only enters the cache once the drive
    /// acknowledges it. Acks of the same object are matched in write order.
    pub fn download<F: Frame + Debug>(&mut self, index: u16, sub_index: u8, data: &[u8])
        -> Result<F, ErrorCode> {
        let frame = download_request(self.node_id, index, sub_index, data)?;
        self.pending_downloads.entry((index, sub_index)).or_default().push_back(data.to_vec());
        Ok(frame)
    }

    pub fn process<F: Frame>(&mut self, frame: &F) -> Result<ProcessResult, ErrorCode> {
        let cob_id = match get_cob_id(frame) {
            Some(cob_id) => cob_id,
            None => return Ok(ProcessResult::ignored()),
        };
        if frame.is_remote_frame() || cob_id & COB_NODE_ID_MASK != self.node_id as u16 {
            return Ok(ProcessResult::ignored());
        }

        let func = cob_id & COB_FUNC_MASK;
        if func == COB_FUNC_HEARTBEAT {
            return Ok(self.process_heartbeat(frame.data()));
        }
        if func == COB_FUNC_TRANSMIT_SDO {
            return self.process_sdo_response(frame);
        }
        if let Some(pdo_index) = tpdo_index_from_function(func) {
            return Ok(self.process_tpdo(pdo_index, frame.data()));
        }
        Ok(ProcessResult::ignored())
    }

    fn process_heartbeat(&mut self, data: &[u8]) -> ProcessResult {
        let code = match data.first() {
            Some(code) => *code,
            None => return ProcessResult::ignored(),
        };
        let state = NodeState::from_heartbeat_code(code);
        if state != self.state {
            info!("node {} changed state {:?} -> {:?}", self.node_id, self.state, state);
        }
        self.state = state;
        ProcessResult::with(ProcessMode::Heartbeat, vec![])
    }

    fn process_sdo_response<F: Frame>(&mut self, frame: &F) -> Result<ProcessResult, ErrorCode> {
        match parse_response(frame) {
            SdoResponse::Upload { index, sub_index, data } => {
                debug!("upload ({:#06x}, {:#04x}) = {:02x?}", index, sub_index, data);
                self.store(index, sub_index, data);
                Ok(ProcessResult::with(ProcessMode::SdoUpload, vec![(index, sub_index)]))
            }
            SdoResponse::DownloadAck { index, sub_index } => {
                debug!("download ack ({:#06x}, {:#04x})", index, sub_index);
                if let Some(data) = self.pop_pending(index, sub_index) {
                    self.store(index, sub_index, data);
                }
                Ok(ProcessResult::with(ProcessMode::SdoDownloadAck, vec![(index, sub_index)]))
            }
            SdoResponse::Abort { index, sub_index, abort_code } => {
                error!("SDO abort on ({:#06x}, {:#04x}): {}", index, sub_index, abort_code.description());
                self.pending_downloads.remove(&(index, sub_index));
                Err(ErrorCode::SdoAbort { index, sub_index, abort_code })
            }
            SdoResponse::Segmented { index, sub_index } => {
                info!("segmented upload of ({:#06x}, {:#04x}) is not supported, ignored",
                    index, sub_index);
                Ok(ProcessResult::ignored())
            }
            SdoResponse::Unsupported { cmd } => {
                debug!("ignored SDO response with command byte {:#04x}", cmd);
                Ok(ProcessResult::ignored())
            }
        }
    }

    fn pop_pending(&mut self, index: u16, sub_index: u8) -> Option<Vec<u8>> {
        let queue = self.pending_downloads.get_mut(&(index, sub_index))?;
        let data = queue.pop_front();
        if queue.is_empty() {
            self.pending_downloads.remove(&(index, sub_index));
        }
        data
    }

    fn process_tpdo(&mut self, pdo_index: usize, data: &[u8]) -> ProcessResult {
        let entries = self.tpdo_mappings[pdo_index].entries().to_vec();
        if entries.is_empty() {
            debug!("TPDO {} has no declared mapping, ignored", pdo_index);
            return ProcessResult::ignored();
        }
        let bits: Vec<u8> = entries.iter().map(|e| e.bits).collect();
        let values = match unpack_data(data, &bits) {
            Some(values) => values,
            None => {
                error!("TPDO {} payload {:02x?} shorter than its mapping", pdo_index, data);
                return ProcessResult::ignored();
            }
        };
        let mut updated = Vec::with_capacity(entries.len());
        for (entry, value) in entries.iter().zip(values) {
            let size = (entry.bits as usize + 7) / 8;
            self.store(entry.index, entry.sub_index, value.to_le_bytes()[..size].to_vec());
            updated.push((entry.index, entry.sub_index));
        }
        ProcessResult::with(ProcessMode::Tpdo, updated)
    }

    fn store(&mut self, index: u16, sub_index: u8, data: Vec<u8>) {
        let now = Instant::now();
        match self.objects.get_mut(&(index, sub_index)) {
            Some(cached) => {
                cached.value.set_data(data);
                cached.timestamp = now;
            }
            None => {
                self.objects.insert((index, sub_index),
                                    CachedObject { value: Value::new(data), timestamp: now });
            }
        }
    }

    pub fn has(&self, index: u16, sub_index: u8) -> bool {
        self.objects.contains_key(&(index, sub_index))
    }

    pub fn get_raw(&self, index: u16, sub_index: u8) -> Result<&[u8], ErrorCode> {
        self.objects
            .get(&(index, sub_index))
            .map(|cached| cached.value.data())
            .ok_or(ErrorCode::ObjectNotRead { index, sub_index })
    }

    pub fn get<T: ByteConvertible>(&self, index: u16, sub_index: u8) -> Result<T, ErrorCode> {
        let data = self.get_raw(index, sub_index)?;
        if data.len() < T::SIZE {
            return Err(ErrorCode::DataLengthMismatch {
                index, sub_index, expected: T::SIZE, actual: data.len(),
            });
        }
        Ok(T::from_bytes(&data[..T::SIZE]))
    }

    pub fn set<T: ByteConvertible>(&mut self, index: u16, sub_index: u8, value: T) {
        self.store(index, sub_index, value.to_bytes());
    }

    pub fn set_raw(&mut self, index: u16, sub_index: u8, data: &[u8]) {
        self.store(index, sub_index, data.to_vec());
    }

    /// Time of the last change of the object, `None` if it was never set.
    pub fn timestamp(&self, index: u16, sub_index: u8) -> Option<Instant> {
        self.objects.get(&(index, sub_index)).map(|cached| cached.timestamp)
    }

    pub fn sync<F: Frame + Debug>(&self) -> Result<F, ErrorCode> {
        create_frame(COB_FUNC_SYNC, &[])
    }

    /// Node guarding request. The node answers on its heartbeat COB-ID.
    pub fn query_state<F: Frame + Debug>(&self) -> Result<F, ErrorCode> {
        create_remote_frame(COB_FUNC_HEARTBEAT | self.node_id as u16, 1)
    }

    pub fn query_state_transition<F: Frame + Debug>(&self, transition: NodeStateTransition)
        -> Result<F, ErrorCode> {
        create_frame(COB_FUNC_NMT, &[transition.command(), self.node_id])
    }

    /// Frames that reconfigure one PDO: disable it, write its communication
    /// parameters, rewrite the mapping and enable it again.
    pub fn configure_pdo<F: Frame + Debug>(&mut self, transmit: bool, pdo_index: usize,
                                           parameters: &PdoCommunicationParameters,
                                           mapping: &PdoMapping) -> Result<Vec<F>, ErrorCode> {
        check_pdo_index(pdo_index)?;
        let (comm, map) = pdo_registers(transmit, pdo_index);
        let cob_id = pdo_cob_id(transmit, pdo_index, self.node_id) as u32;

        let mut frames = vec![
            self.download(comm, 1, &(cob_id | PDO_COB_ID_INVALID).to_le_bytes())?,
            self.download(comm, 2, &[parameters.transmission_type])?,
        ];
        if transmit {
            frames.push(self.download(comm, 3, &parameters.inhibit_time.to_le_bytes())?);
            frames.push(self.download(comm, 5, &parameters.event_timer.to_le_bytes())?);
        }
        frames.push(self.download(map, 0, &[0])?);
        for (i, entry) in mapping.entries().iter().enumerate() {
            frames.push(self.download(map, i as u8 + 1, &entry.encode().to_le_bytes())?);
        }
        frames.push(self.download(map, 0, &[mapping.entries().len() as u8])?);
        frames.push(self.download(comm, 1, &cob_id.to_le_bytes())?);
        Ok(frames)
    }

    pub fn disable_pdo<F: Frame + Debug>(&mut self, transmit: bool, pdo_index: usize)
        -> Result<F, ErrorCode> {
        check_pdo_index(pdo_index)?;
        let (comm, _) = pdo_registers(transmit, pdo_index);
        let cob_id = pdo_cob_id(transmit, pdo_index, self.node_id) as u32;
        let frame = self.download(comm, 1, &(cob_id | PDO_COB_ID_INVALID).to_le_bytes())?;
        if transmit {
            self.tpdo_mappings[pdo_index] = PdoMapping::new();
        } else {
            self.rpdo_mappings[pdo_index] = PdoMapping::new();
        }
        Ok(frame)
    }

    pub fn declare_rpdo_mapping(&mut self, pdo_index: usize, mapping: PdoMapping)
        -> Result<(), ErrorCode> {
        check_pdo_index(pdo_index)?;
        self.rpdo_mappings[pdo_index] = mapping;
        Ok(())
    }

    pub fn declare_tpdo_mapping(&mut self, pdo_index: usize, mapping: PdoMapping)
        -> Result<(), ErrorCode> {
        check_pdo_index(pdo_index)?;
        self.tpdo_mappings[pdo_index] = mapping;
        Ok(())
    }

    /// RPDO frame built from the current cache content of its mapped objects.
    pub fn get_rpdo_message<F: Frame + Debug>(&self, pdo_index: usize) -> Result<F, ErrorCode> {
        check_pdo_index(pdo_index)?;
        let mapping = &self.rpdo_mappings[pdo_index];
        if mapping.is_empty() {
            return Err(ErrorCode::PreconditionNotMet { what: "RPDO mapping was not declared" });
        }
        let mut values = Vec::with_capacity(mapping.entries().len());
        for entry in mapping.entries() {
            let data = self.get_raw(entry.index, entry.sub_index)?;
            let mut buf = [0u8; 8];
            let len = data.len().min(8);
            buf[..len].copy_from_slice(&data[..len]);
            values.push((u64::from_le_bytes(buf), entry.bits));
        }
        create_frame(pdo_cob_id(false, pdo_index, self.node_id), &pack_data(&values))
    }
}

fn pdo_registers(transmit: bool, pdo_index: usize) -> (u16, u16) {
    if transmit {
        (REG_TPDO_COMMUNICATION + pdo_index as u16, REG_TPDO_MAPPING + pdo_index as u16)
    } else {
        (REG_RPDO_COMMUNICATION + pdo_index as u16, REG_RPDO_MAPPING + pdo_index as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AbortCode;
    use crate::util::test_frame::MockFrame;

    #[test]
    fn test_download_is_cached_on_ack_only() {
        let mut sm = StateMachine::new(2);
        let _: MockFrame = sm.download(0x6071, 0, &[0x10, 0x00]).unwrap();
        assert!(!sm.has(0x6071, 0));

        let ack = MockFrame::std(0x582, &[0x60, 0x71, 0x60, 0x00, 0, 0, 0, 0]);
        let res = sm.process(&ack).unwrap();
        assert_eq!(res.mode, ProcessMode::SdoDownloadAck);
        assert_eq!(res.updated, vec![(0x6071, 0)]);
        assert_eq!(sm.get::<i16>(0x6071, 0).unwrap(), 0x10);
        assert!(sm.timestamp(0x6071, 0).is_some());
    }

    #[test]
    fn test_acks_of_one_object_match_write_order() {
        let mut sm = StateMachine::new(1);
        let mut mapping = PdoMapping::new();
        mapping.add(0x6041, 0, 16).unwrap();
        let _: Vec<MockFrame> = sm
            .configure_pdo(true, 0, &PdoCommunicationParameters::asynchronous(), &mapping)
            .unwrap();

        let ack = MockFrame::std(0x581, &[0x60, 0x00, 0x18, 0x01, 0, 0, 0, 0]);
        sm.process(&ack).unwrap();
        assert_eq!(sm.get_raw(0x1800, 1).unwrap(), &[0x81, 0x01, 0x00, 0x80]);
        sm.process(&ack).unwrap();
        assert_eq!(sm.get_raw(0x1800, 1).unwrap(), &[0x81, 0x01, 0x00, 0x00]);

        let map_ack = MockFrame::std(0x581, &[0x60, 0x00, 0x1A, 0x00, 0, 0, 0, 0]);
        sm.process(&map_ack).unwrap();
        assert_eq!(sm.get_raw(0x1A00, 0).unwrap(), &[0x00]);
        sm.process(&map_ack).unwrap();
        assert_eq!(sm.get_raw(0x1A00, 0).unwrap(), &[0x01]);

        // nothing left to match
        sm.process(&ack).unwrap();
        assert_eq!(sm.get_raw(0x1800, 1).unwrap(), &[0x81, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_abort_drops_every_pending_write() {
        let mut sm = StateMachine::new(1);
        let _: MockFrame = sm.download(0x6060, 0, &[0x08]).unwrap();
        let _: MockFrame = sm.download(0x6060, 0, &[0x0A]).unwrap();
        let abort = MockFrame::std(0x581, &[0x80, 0x60, 0x60, 0x00, 0x30, 0x00, 0x09, 0x06]);
        assert!(sm.process(&abort).is_err());
        let ack = MockFrame::std(0x581, &[0x60, 0x60, 0x60, 0x00, 0, 0, 0, 0]);
        sm.process(&ack).unwrap();
        assert!(!sm.has(0x6060, 0));
    }

    #[test]
    fn test_upload_response_updates_cache() {
        let mut sm = StateMachine::new(1);
        let frame = MockFrame::std(0x581, &[0x43, 0x63, 0x60, 0x00, 0x00, 0x10, 0x00, 0x00]);
        let res = sm.process(&frame).unwrap();
        assert_eq!(res.mode, ProcessMode::SdoUpload);
        assert_eq!(sm.get::<i32>(0x6063, 0).unwrap(), 4096);
    }

    #[test]
    fn test_other_node_is_ignored() {
        let mut sm = StateMachine::new(1);
        let frame = MockFrame::std(0x582, &[0x43, 0x63, 0x60, 0x00, 0x00, 0x10, 0x00, 0x00]);
        assert_eq!(sm.process(&frame).unwrap().mode, ProcessMode::Ignored);
        assert!(!sm.has(0x6063, 0));
    }

    #[test]
    fn test_abort_is_an_error() {
        let mut sm = StateMachine::new(1);
        let frame = MockFrame::std(0x581, &[0x80, 0x76, 0x60, 0x00, 0x00, 0x00, 0x02, 0x06]);
        assert_eq!(sm.process(&frame), Err(ErrorCode::SdoAbort {
            index: 0x6076,
            sub_index: 0,
            abort_code: AbortCode::ObjectDoesNotExistInObjectDictionary,
        }));
    }

    #[test]
    fn test_get_missing_and_short_objects() {
        let mut sm = StateMachine::new(1);
        assert_eq!(sm.get::<u32>(0x6075, 0), Err(ErrorCode::ObjectNotRead { index: 0x6075, sub_index: 0 }));
        sm.set_raw(0x6075, 0, &[0x01, 0x02]);
        assert_eq!(sm.get::<u32>(0x6075, 0), Err(ErrorCode::DataLengthMismatch {
            index: 0x6075, sub_index: 0, expected: 4, actual: 2,
        }));
        sm.set(0x6075, 0, 2000u32);
        assert_eq!(sm.get::<u32>(0x6075, 0).unwrap(), 2000);
    }

    #[test]
    fn test_heartbeat_and_node_guarding() {
        let mut sm = StateMachine::new(1);
        assert_eq!(sm.state(), NodeState::Unknown);
        let res = sm.process(&MockFrame::std(0x701, &[0x05])).unwrap();
        assert_eq!(res.mode, ProcessMode::Heartbeat);
        assert_eq!(sm.state(), NodeState::Operational);
        // guarding reply with the toggle bit set
        sm.process(&MockFrame::std(0x701, &[0xFF])).unwrap();
        assert_eq!(sm.state(), NodeState::PreOperational);
    }

    #[test]
    fn test_nmt_frames() {
        let sm = StateMachine::new(3);
        let start: MockFrame = sm.query_state_transition(NodeStateTransition::Start).unwrap();
        assert_eq!(start.raw_id(), 0x000);
        assert_eq!(start.data, vec![0x01, 0x03]);
        let guard: MockFrame = sm.query_state().unwrap();
        assert_eq!(guard.raw_id(), 0x703);
        assert!(guard.remote);
        let sync: MockFrame = sm.sync().unwrap();
        assert_eq!(sync.raw_id(), 0x080);
        assert!(sync.data.is_empty());
    }

    #[test]
    fn test_configure_tpdo_sequence() {
        let mut sm = StateMachine::new(1);
        let mut mapping = PdoMapping::new();
        mapping.add(0x6041, 0, 16).unwrap();
        let params = PdoCommunicationParameters::sync(1).unwrap();
        let frames: Vec<MockFrame> = sm.configure_pdo(true, 1, &params, &mapping).unwrap();
        let payloads: Vec<Vec<u8>> = frames.iter().map(|f| f.data.clone()).collect();
        assert_eq!(payloads, vec![
            vec![0x23, 0x01, 0x18, 0x01, 0x81, 0x02, 0x00, 0x80],
            vec![0x2F, 0x01, 0x18, 0x02, 0x01, 0, 0, 0],
            vec![0x2B, 0x01, 0x18, 0x03, 0x00, 0x00, 0, 0],
            vec![0x2B, 0x01, 0x18, 0x05, 0x00, 0x00, 0, 0],
            vec![0x2F, 0x01, 0x1A, 0x00, 0x00, 0, 0, 0],
            vec![0x23, 0x01, 0x1A, 0x01, 0x10, 0x00, 0x41, 0x60],
            vec![0x2F, 0x01, 0x1A, 0x00, 0x01, 0, 0, 0],
            vec![0x23, 0x01, 0x18, 0x01, 0x81, 0x02, 0x00, 0x00],
        ]);
        assert!(frames.iter().all(|f| f.raw_id() == 0x601));
    }

    #[test]
    fn test_configure_pdo_index_out_of_range() {
        let mut sm = StateMachine::new(1);
        let res: Result<Vec<MockFrame>, _> =
            sm.configure_pdo(false, 4, &PdoCommunicationParameters::asynchronous(), &PdoMapping::new());
        assert!(matches!(res, Err(ErrorCode::InvalidArgument { .. })));
    }

    #[test]
    fn test_tpdo_updates_cache() {
        let mut sm = StateMachine::new(1);
        let mut mapping = PdoMapping::new();
        mapping.add(0x6063, 0, 32).unwrap();
        mapping.add(0x606C, 0, 32).unwrap();
        sm.declare_tpdo_mapping(0, mapping).unwrap();

        let frame = MockFrame::std(0x181, &[0x00, 0x10, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]);
        let res = sm.process(&frame).unwrap();
        assert_eq!(res.mode, ProcessMode::Tpdo);
        assert_eq!(res.updated, vec![(0x6063, 0), (0x606C, 0)]);
        assert_eq!(sm.get::<i32>(0x6063, 0).unwrap(), 4096);
        assert_eq!(sm.get::<i32>(0x606C, 0).unwrap(), -1);

        // undeclared TPDO
        let res = sm.process(&MockFrame::std(0x281, &[0x01, 0x00])).unwrap();
        assert_eq!(res.mode, ProcessMode::Ignored);
    }

    #[test]
    fn test_rpdo_message() {
        let mut sm = StateMachine::new(1);
        let none: Result<MockFrame, _> = sm.get_rpdo_message(0);
        assert!(matches!(none, Err(ErrorCode::PreconditionNotMet { .. })));

        let mut mapping = PdoMapping::new();
        mapping.add(0x6071, 0, 16).unwrap();
        sm.declare_rpdo_mapping(0, mapping).unwrap();
        let missing: Result<MockFrame, _> = sm.get_rpdo_message(0);
        assert_eq!(missing, Err(ErrorCode::ObjectNotRead { index: 0x6071, sub_index: 0 }));

        sm.set(0x6071, 0, -2i16);
        let frame: MockFrame = sm.get_rpdo_message(0).unwrap();
        assert_eq!(frame.raw_id(), 0x201);
        assert_eq!(frame.data, vec![0xFE, 0xFF]);
    }

    #[test]
    fn test_disable_pdo() {
        let mut sm = StateMachine::new(1);
        let frame: MockFrame = sm.disable_pdo(true, 2).unwrap();
        assert_eq!(frame.data, vec![0x23, 0x02, 0x18, 0x01, 0x81, 0x03, 0x00, 0x80]);
    }
}
