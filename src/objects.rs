use crate::data_type::DataType;
use crate::error::ErrorCode;

/// Semantic groups an object belongs to. `Update` results are masks over
/// these bits.
pub const UPDATE_HEARTBEAT: u64 = 1 << 0;
pub const UPDATE_STATUS_WORD: u64 = 1 << 1;
pub const UPDATE_OPERATION_MODE: u64 = 1 << 2;
pub const UPDATE_FACTORS: u64 = 1 << 3;
pub const UPDATE_JOINT_POSITION: u64 = 1 << 4;
pub const UPDATE_JOINT_VELOCITY: u64 = 1 << 5;
pub const UPDATE_JOINT_CURRENT: u64 = 1 << 6;
pub const UPDATE_JOINT_STATE: u64 =
    UPDATE_JOINT_POSITION | UPDATE_JOINT_VELOCITY | UPDATE_JOINT_CURRENT;
pub const UPDATE_JOINT_LIMITS: u64 = 1 << 7;
pub const UPDATE_CAN_CONTROLLER_STATUS: u64 = 1 << 8;

/// One entry of the drive's object dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectDescriptor {
    pub name: &'static str,
    pub index: u16,
    pub sub_index: u8,
    pub data_type: DataType,
    pub update: u64,
}

impl ObjectDescriptor {
    pub const fn new(name: &'static str, index: u16, sub_index: u8, data_type: DataType, update: u64)
        -> Self {
        ObjectDescriptor { name, index, sub_index, data_type, update }
    }

    pub fn bits(&self) -> u8 {
        self.data_type.bits()
    }

    /// Little-endian bytes of `value` in the native type of the object.
    pub fn encode(&self, value: i64) -> Result<Vec<u8>, ErrorCode> {
        self.data_type.encode(value).ok_or(ErrorCode::OutOfRange {
            index: self.index,
            sub_index: self.sub_index,
            value,
        })
    }

    pub fn decode(&self, data: &[u8]) -> Result<i64, ErrorCode> {
        self.data_type.decode(data).ok_or(ErrorCode::DataLengthMismatch {
            index: self.index,
            sub_index: self.sub_index,
            expected: self.data_type.size(),
            actual: data.len(),
        })
    }
}

macro_rules! object {
    ($id:ident, $name:expr, $index:expr, $sub_index:expr, $data_type:ident, $update:expr) => {
        pub const $id: ObjectDescriptor =
            ObjectDescriptor::new($name, $index, $sub_index, DataType::$data_type, $update);
    };
}

object!(CONTROL_WORD, "ControlWord", 0x6040, 0, Unsigned16, 0);
object!(STATUS_WORD, "StatusWord", 0x6041, 0, Unsigned16, UPDATE_STATUS_WORD);
object!(MODES_OF_OPERATION, "ModesOfOperation", 0x6060, 0, Integer8, UPDATE_OPERATION_MODE);
object!(MODES_OF_OPERATION_DISPLAY, "ModesOfOperationDisplay", 0x6061, 0, Integer8,
        UPDATE_OPERATION_MODE);

object!(POSITION_ENCODER_RESOLUTION_NUM, "PositionEncoderResolutionNum", 0x608F, 1, Unsigned32,
        UPDATE_FACTORS);
object!(POSITION_ENCODER_RESOLUTION_DEN, "PositionEncoderResolutionDen", 0x608F, 2, Unsigned32,
        UPDATE_FACTORS);
object!(VELOCITY_ENCODER_RESOLUTION_NUM, "VelocityEncoderResolutionNum", 0x6090, 1, Unsigned32,
        UPDATE_FACTORS);
object!(VELOCITY_ENCODER_RESOLUTION_DEN, "VelocityEncoderResolutionDen", 0x6090, 2, Unsigned32,
        UPDATE_FACTORS);
object!(GEAR_RATIO_NUM, "GearRatioNum", 0x6091, 1, Unsigned32, UPDATE_FACTORS);
object!(GEAR_RATIO_DEN, "GearRatioDen", 0x6091, 2, Unsigned32, UPDATE_FACTORS);
object!(FEED_CONSTANT_NUM, "FeedConstantNum", 0x6092, 1, Unsigned32, UPDATE_FACTORS);
object!(FEED_CONSTANT_DEN, "FeedConstantDen", 0x6092, 2, Unsigned32, UPDATE_FACTORS);
object!(VELOCITY_FACTOR_NUM, "VelocityFactorNum", 0x6096, 1, Unsigned32, UPDATE_FACTORS);
object!(VELOCITY_FACTOR_DEN, "VelocityFactorDen", 0x6096, 2, Unsigned32, UPDATE_FACTORS);
object!(ACCELERATION_FACTOR_NUM, "AccelerationFactorNum", 0x6097, 1, Unsigned32, UPDATE_FACTORS);
object!(ACCELERATION_FACTOR_DEN, "AccelerationFactorDen", 0x6097, 2, Unsigned32, UPDATE_FACTORS);
// mA
object!(MOTOR_RATED_CURRENT, "MotorRatedCurrent", 0x6075, 0, Unsigned32, UPDATE_FACTORS);
// mNm
object!(MOTOR_RATED_TORQUE, "MotorRatedTorque", 0x6076, 0, Unsigned32, UPDATE_FACTORS);

object!(POSITION_ACTUAL_INTERNAL_VALUE, "PositionActualInternalValue", 0x6063, 0, Integer32,
        UPDATE_JOINT_POSITION);
object!(VELOCITY_ACTUAL_VALUE, "VelocityActualValue", 0x606C, 0, Integer32, UPDATE_JOINT_VELOCITY);
object!(CURRENT_ACTUAL_VALUE, "CurrentActualValue", 0x6078, 0, Integer16, UPDATE_JOINT_CURRENT);
object!(TORQUE_ACTUAL_VALUE, "TorqueActualValue", 0x6077, 0, Integer16, UPDATE_JOINT_CURRENT);

object!(SOFTWARE_POSITION_LIMIT_MIN, "SoftwarePositionLimitMin", 0x607D, 1, Integer32,
        UPDATE_JOINT_LIMITS);
object!(SOFTWARE_POSITION_LIMIT_MAX, "SoftwarePositionLimitMax", 0x607D, 2, Integer32,
        UPDATE_JOINT_LIMITS);
// Negative means no limit.
object!(MAX_MOTOR_SPEED, "MaxMotorSpeed", 0x6080, 0, Integer32, UPDATE_JOINT_LIMITS);
object!(MAX_ACCELERATION, "MaxAcceleration", 0x60C5, 0, Unsigned32, UPDATE_JOINT_LIMITS);
object!(MAX_DECELERATION, "MaxDeceleration", 0x60C6, 0, Unsigned32, UPDATE_JOINT_LIMITS);
// Per thousand of the rated current, shared by the torque and current limits.
object!(MAX_CURRENT, "MaxCurrent", 0x6073, 0, Unsigned16, UPDATE_JOINT_LIMITS);

object!(TARGET_POSITION, "TargetPosition", 0x607A, 0, Integer32, 0);
object!(TARGET_VELOCITY, "TargetVelocity", 0x60FF, 0, Integer32, 0);
object!(TARGET_TORQUE, "TargetTorque", 0x6071, 0, Integer16, 0);

// Elmo specific.
object!(CAN_CONTROLLER_STATUS, "CanControllerStatus", 0x2F45, 0, Unsigned8,
        UPDATE_CAN_CONTROLLER_STATUS);

pub const ALL_OBJECTS: &[ObjectDescriptor] = &[
    CONTROL_WORD,
    STATUS_WORD,
    MODES_OF_OPERATION,
    MODES_OF_OPERATION_DISPLAY,
    POSITION_ENCODER_RESOLUTION_NUM,
    POSITION_ENCODER_RESOLUTION_DEN,
    VELOCITY_ENCODER_RESOLUTION_NUM,
    VELOCITY_ENCODER_RESOLUTION_DEN,
    GEAR_RATIO_NUM,
    GEAR_RATIO_DEN,
    FEED_CONSTANT_NUM,
    FEED_CONSTANT_DEN,
    VELOCITY_FACTOR_NUM,
    VELOCITY_FACTOR_DEN,
    ACCELERATION_FACTOR_NUM,
    ACCELERATION_FACTOR_DEN,
    MOTOR_RATED_CURRENT,
    MOTOR_RATED_TORQUE,
    POSITION_ACTUAL_INTERNAL_VALUE,
    VELOCITY_ACTUAL_VALUE,
    CURRENT_ACTUAL_VALUE,
    TORQUE_ACTUAL_VALUE,
    SOFTWARE_POSITION_LIMIT_MIN,
    SOFTWARE_POSITION_LIMIT_MAX,
    MAX_MOTOR_SPEED,
    MAX_ACCELERATION,
    MAX_DECELERATION,
    MAX_CURRENT,
    TARGET_POSITION,
    TARGET_VELOCITY,
    TARGET_TORQUE,
    CAN_CONTROLLER_STATUS,
];

pub fn lookup(index: u16, sub_index: u8) -> Option<&'static ObjectDescriptor> {
    ALL_OBJECTS.iter().find(|o| o.index == index && o.sub_index == sub_index)
}
