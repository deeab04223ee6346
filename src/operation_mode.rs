use crate::error::ErrorCode;
use crate::objects::MODES_OF_OPERATION_DISPLAY;

/// DS402 modes of operation (0x6060 / 0x6061).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationMode {
    None = 0,
    ProfiledPosition = 1,
    Velocity = 2,
    ProfiledVelocity = 3,
    ProfiledTorque = 4,
    Homing = 6,
    InterpolatedPosition = 7,
    CyclicSynchronousPosition = 8,
    CyclicSynchronousVelocity = 9,
    CyclicSynchronousTorque = 10,
}

impl OperationMode {
    pub fn code(&self) -> i8 {
        *self as i8
    }

    pub fn from_code(code: i64) -> Result<Self, ErrorCode> {
        let mode = match code {
            0 => OperationMode::None,
            1 => OperationMode::ProfiledPosition,
            2 => OperationMode::Velocity,
            3 => OperationMode::ProfiledVelocity,
            4 => OperationMode::ProfiledTorque,
            6 => OperationMode::Homing,
            7 => OperationMode::InterpolatedPosition,
            8 => OperationMode::CyclicSynchronousPosition,
            9 => OperationMode::CyclicSynchronousVelocity,
            10 => OperationMode::CyclicSynchronousTorque,
            _ => return Err(ErrorCode::UnrecognizedEncoding {
                index: MODES_OF_OPERATION_DISPLAY.index,
                sub_index: MODES_OF_OPERATION_DISPLAY.sub_index,
                raw: code,
            }),
        };
        Ok(mode)
    }
}
