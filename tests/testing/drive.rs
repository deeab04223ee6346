// Frames as an Elmo drive would send them back.
use elmo_ds402::objects::ObjectDescriptor;

use super::util::{TestFrame, NODE_ID};

fn sdo_response(cmd: u8, index: u16, sub_index: u8, data: &[u8]) -> TestFrame {
    let mut payload = vec![cmd];
    payload.extend_from_slice(&index.to_le_bytes());
    payload.push(sub_index);
    payload.extend_from_slice(data);
    payload.resize(8, 0);
    TestFrame::std(0x580 + NODE_ID as u16, &payload)
}

/// Expedited upload response with the size indicated.
pub fn upload_response(object: &ObjectDescriptor, value: i64) -> TestFrame {
    let data = object.encode(value).unwrap();
    let cmd = 0x43 | (((4 - data.len()) as u8) << 2);
    sdo_response(cmd, object.index, object.sub_index, &data)
}

pub fn download_ack(index: u16, sub_index: u8) -> TestFrame {
    sdo_response(0x60, index, sub_index, &[])
}

pub fn abort(index: u16, sub_index: u8, code: u32) -> TestFrame {
    sdo_response(0x80, index, sub_index, &code.to_le_bytes())
}

pub fn heartbeat(code: u8) -> TestFrame {
    TestFrame::std(0x700 + NODE_ID as u16, &[code])
}

pub fn tpdo(pdo_index: u16, data: &[u8]) -> TestFrame {
    TestFrame::std(0x180 + 0x100 * pdo_index + NODE_ID as u16, data)
}
