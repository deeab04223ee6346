// Master side of the SDO protocol. Only expedited transfers are supported:
// every object of the DS402 profile fits in four bytes.
use embedded_can::Frame;

use crate::cmd_header::{SdoInitiateCmd, CS_ABORT, SCS_INITIATE_DOWNLOAD, SCS_INITIATE_UPLOAD};
use crate::constant::COB_FUNC_RECEIVE_SDO;
use crate::error::{AbortCode, ErrorCode};
use crate::prelude::*;
use crate::util::{create_frame_with_padding, flatten, get_index_from_can_frame};

/// Decoded SDO response sent by the drive on 0x580 + node id.
#[derive(Debug, Clone, PartialEq)]
pub enum SdoResponse {
    Upload { index: u16, sub_index: u8, data: Vec<u8> },
    DownloadAck { index: u16, sub_index: u8 },
    Abort { index: u16, sub_index: u8, abort_code: AbortCode },
    /// Initiate upload response announcing a segmented transfer.
    Segmented { index: u16, sub_index: u8 },
    Unsupported { cmd: u8 },
}

pub fn upload_request<F: Frame + Debug>(node_id: u8, index: u16, sub_index: u8)
    -> Result<F, ErrorCode> {
    let cmd = u8::from(SdoInitiateCmd::upload_request());
    let bytes = flatten(&[&[cmd], &index.to_le_bytes(), &[sub_index]]);
    create_frame_with_padding(COB_FUNC_RECEIVE_SDO | node_id as u16, &bytes)
}

pub fn download_request<F: Frame + Debug>(node_id: u8, index: u16, sub_index: u8, data: &[u8])
    -> Result<F, ErrorCode> {
    if data.is_empty() || data.len() > 4 {
        return Err(ErrorCode::ByteLengthExceedsLimit { len: data.len() });
    }
    let cmd = u8::from(SdoInitiateCmd::expedited_download(data.len()));
    let bytes = flatten(&[&[cmd], &index.to_le_bytes(), &[sub_index], data]);
    create_frame_with_padding(COB_FUNC_RECEIVE_SDO | node_id as u16, &bytes)
}

pub fn parse_response<F: Frame>(frame: &F) -> SdoResponse {
    let data = frame.data();
    let (index, sub_index) = match get_index_from_can_frame(frame) {
        Some(t) => t,
        None => return SdoResponse::Unsupported { cmd: data.first().copied().unwrap_or(0) },
    };
    let cmd = SdoInitiateCmd::from(data[0]);
    match cmd.cs() {
        SCS_INITIATE_UPLOAD if cmd.e() => {
            let len = cmd.expedited_len().min(data.len().saturating_sub(4));
            SdoResponse::Upload { index, sub_index, data: data[4..4 + len].to_vec() }
        }
        SCS_INITIATE_UPLOAD => SdoResponse::Segmented { index, sub_index },
        SCS_INITIATE_DOWNLOAD => SdoResponse::DownloadAck { index, sub_index },
        CS_ABORT => {
            let code = if data.len() >= 8 {
                u32::from_le_bytes([data[4], data[5], data[6], data[7]])
            } else {
                0
            };
            SdoResponse::Abort {
                index,
                sub_index,
                abort_code: AbortCode::from_code(code).unwrap_or(AbortCode::Other),
            }
        }
        _ => SdoResponse::Unsupported { cmd: data[0] },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_frame::MockFrame;

    #[test]
    fn test_upload_request() {
        let frame: MockFrame = upload_request(3, 0x6041, 0).unwrap();
        assert_eq!(frame.raw_id(), 0x603);
        assert_eq!(frame.data, vec![0x40, 0x41, 0x60, 0x00, 0, 0, 0, 0]);
    }

    #[test]
    fn test_download_request_two_bytes() {
        let frame: MockFrame = download_request(1, 0x6040, 0, &[0x06, 0x01]).unwrap();
        assert_eq!(frame.raw_id(), 0x601);
        assert_eq!(frame.data, vec![0x2B, 0x40, 0x60, 0x00, 0x06, 0x01, 0, 0]);
    }

    #[test]
    fn test_download_request_too_long() {
        let res: Result<MockFrame, _> = download_request(1, 0x1010, 1, &[0; 5]);
        assert_eq!(res, Err(ErrorCode::ByteLengthExceedsLimit { len: 5 }));
    }

    #[test]
    fn test_parse_expedited_upload() {
        let frame = MockFrame::std(0x581, &[0x4B, 0x41, 0x60, 0x00, 0x37, 0x02, 0, 0]);
        assert_eq!(parse_response(&frame),
                   SdoResponse::Upload { index: 0x6041, sub_index: 0, data: vec![0x37, 0x02] });
    }

    #[test]
    fn test_parse_download_ack() {
        let frame = MockFrame::std(0x581, &[0x60, 0x71, 0x60, 0x00, 0, 0, 0, 0]);
        assert_eq!(parse_response(&frame), SdoResponse::DownloadAck { index: 0x6071, sub_index: 0 });
    }

    #[test]
    fn test_parse_abort() {
        let frame = MockFrame::std(0x581, &[0x80, 0x76, 0x60, 0x00, 0x00, 0x00, 0x02, 0x06]);
        assert_eq!(parse_response(&frame), SdoResponse::Abort {
            index: 0x6076,
            sub_index: 0,
            abort_code: AbortCode::ObjectDoesNotExistInObjectDictionary,
        });
    }

    #[test]
    fn test_parse_segmented_upload() {
        let frame = MockFrame::std(0x581, &[0x41, 0x08, 0x10, 0x00, 0x10, 0, 0, 0]);
        assert_eq!(parse_response(&frame), SdoResponse::Segmented { index: 0x1008, sub_index: 0 });
    }
}
