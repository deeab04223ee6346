use std::time::Instant;

use embedded_can::Frame;

use crate::constant::{LOAD_MAGIC_CODE, REG_RESTORE_DEFAULT_PARAMETERS, REG_STORE_PARAMETERS,
                      SAVE_MAGIC_CODE};
use crate::control_word::ControlWord;
use crate::error::ErrorCode;
use crate::factors::Factors;
use crate::joint::{JointControlMode, JointLimitRange, JointState};
use crate::master::{NodeState, NodeStateTransition, ProcessMode, StateMachine};
use crate::motor_parameters::MotorParameters;
use crate::objects::*;
use crate::operation_mode::OperationMode;
use crate::pdo::{PdoCommunicationParameters, PdoMapping};
use crate::prelude::*;
use crate::status_word::{CanControllerStatus, StatusWord};
use crate::update::{classify_all, Update};
use crate::{debug, error};

const FACTOR_RATIO_OBJECTS: [ObjectDescriptor; 6] = [
    POSITION_ENCODER_RESOLUTION_NUM,
    POSITION_ENCODER_RESOLUTION_DEN,
    GEAR_RATIO_NUM,
    GEAR_RATIO_DEN,
    FEED_CONSTANT_NUM,
    FEED_CONSTANT_DEN,
];

/// DS402 view of one Elmo drive.
///
/// The controller only builds frames and interprets the ones it is given.
/// Sending them, waiting for the answers and timing out is up to the caller,
/// which typically feeds every received frame to `process()` until the
/// returned `Update` reports the groups it waits for.
pub struct Controller {
    machine: StateMachine,
    factors: Factors,
    motor_parameters: MotorParameters,
    rated_torque: Option<f64>,
    encoder_scale_factor: f64,
    zero_position: i64,
}

impl Controller {
    pub fn new(node_id: u8) -> Self {
        let mut machine = StateMachine::new(node_id);
        for object in FACTOR_RATIO_OBJECTS.iter() {
            machine.set(object.index, object.sub_index, 1u32);
        }
        let mut controller = Controller {
            machine,
            factors: Factors::default(),
            motor_parameters: MotorParameters::default(),
            rated_torque: None,
            encoder_scale_factor: 1.0,
            zero_position: 0,
        };
        controller.recompute_factors();
        controller
    }

    pub fn node_id(&self) -> u8 {
        self.machine.node_id()
    }

    pub fn state_machine(&self) -> &StateMachine {
        &self.machine
    }

    /// Raw value of an object from the cache.
    pub fn get(&self, object: &ObjectDescriptor) -> Result<i64, ErrorCode> {
        object.decode(self.machine.get_raw(object.index, object.sub_index)?)
    }

    pub fn has(&self, object: &ObjectDescriptor) -> bool {
        self.machine.has(object.index, object.sub_index)
    }

    pub fn timestamp(&self, object: &ObjectDescriptor) -> Option<Instant> {
        self.machine.timestamp(object.index, object.sub_index)
    }

    fn set_raw(&mut self, object: &ObjectDescriptor, value: i64) -> Result<(), ErrorCode> {
        let data = object.encode(value)?;
        self.machine.set_raw(object.index, object.sub_index, &data);
        Ok(())
    }

    fn optional(&self, object: &ObjectDescriptor) -> Result<Option<i64>, ErrorCode> {
        match self.get(object) {
            Ok(value) => Ok(Some(value)),
            Err(ErrorCode::ObjectNotRead { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn query_object<F: Frame + Debug>(&self, object: &ObjectDescriptor) -> Result<F, ErrorCode> {
        self.machine.upload(object.index, object.sub_index)
    }

    fn query_objects<F: Frame + Debug>(&self, objects: &[ObjectDescriptor]) -> Result<Vec<F>, ErrorCode> {
        objects.iter().map(|object| self.query_object(object)).collect()
    }

    /// Writes `value` to the object with an SDO download.
    pub fn send<F: Frame + Debug>(&mut self, object: &ObjectDescriptor, value: i64)
        -> Result<F, ErrorCode> {
        let data = object.encode(value)?;
        self.machine.download(object.index, object.sub_index, &data)
    }

    /// Writes the value staged in the cache for this object.
    pub fn query_download<F: Frame + Debug>(&mut self, object: &ObjectDescriptor)
        -> Result<F, ErrorCode> {
        let data = self.machine.get_raw(object.index, object.sub_index)?.to_vec();
        self.machine.download(object.index, object.sub_index, &data)
    }

    pub fn query_sync<F: Frame + Debug>(&self) -> Result<F, ErrorCode> {
        self.machine.sync()
    }

    pub fn query_node_state<F: Frame + Debug>(&self) -> Result<F, ErrorCode> {
        self.machine.query_state()
    }

    pub fn query_node_state_transition<F: Frame + Debug>(&self, transition: NodeStateTransition)
        -> Result<F, ErrorCode> {
        self.machine.query_state_transition(transition)
    }

    pub fn node_state(&self) -> NodeState {
        self.machine.state()
    }

    pub fn query_status_word<F: Frame + Debug>(&self) -> Result<F, ErrorCode> {
        self.query_object(&STATUS_WORD)
    }

    pub fn status_word(&self) -> Result<StatusWord, ErrorCode> {
        StatusWord::parse(self.get(&STATUS_WORD)? as u16)
    }

    pub fn query_can_controller_status<F: Frame + Debug>(&self) -> Result<F, ErrorCode> {
        self.query_object(&CAN_CONTROLLER_STATUS)
    }

    pub fn can_controller_status(&self) -> Result<CanControllerStatus, ErrorCode> {
        CanControllerStatus::parse(self.get(&CAN_CONTROLLER_STATUS)?)
    }

    pub fn query_operation_mode<F: Frame + Debug>(&self) -> Result<F, ErrorCode> {
        self.query_object(&MODES_OF_OPERATION_DISPLAY)
    }

    /// Mode the drive reports to be running in.
    pub fn operation_mode(&self) -> Result<OperationMode, ErrorCode> {
        OperationMode::from_code(self.get(&MODES_OF_OPERATION_DISPLAY)?)
    }

    pub fn set_operation_mode<F: Frame + Debug>(&mut self, mode: OperationMode)
        -> Result<F, ErrorCode> {
        self.send(&MODES_OF_OPERATION, mode.code() as i64)
    }

    pub fn send_control_word<F: Frame + Debug>(&mut self, control_word: ControlWord)
        -> Result<F, ErrorCode> {
        self.send(&CONTROL_WORD, control_word.encode() as i64)
    }

    /// Feeds one received frame to the state machine and tells which groups
    /// of objects it updated. Refreshed factor objects get the motor
    /// parameter overrides applied again before the factors are recomputed.
    /// Overrides that cannot be applied are logged, the update is still
    /// returned. Only SDO aborts are reported as errors.
    pub fn process<F: Frame>(&mut self, frame: &F) -> Result<Update, ErrorCode> {
        let result = self.machine.process(frame)?;
        match result.mode {
            ProcessMode::Ignored => return Ok(Update::None),
            ProcessMode::Heartbeat => return Ok(Update::updated(UPDATE_HEARTBEAT)),
            ProcessMode::SdoDownloadAck => {
                return Ok(match result.updated.first() {
                    Some(&(index, sub_index)) => Update::Ack {
                        index,
                        sub_index,
                        value: self.machine.get_raw(index, sub_index)
                            .map(|data| data.to_vec())
                            .unwrap_or_default(),
                    },
                    None => Update::None,
                });
            }
            ProcessMode::SdoUpload | ProcessMode::Tpdo => {}
        }

        let mask = classify_all(&result.updated);
        if mask & UPDATE_FACTORS != 0 {
            debug!("factor objects refreshed, applying motor parameters");
            // the frame is already cached, its groups are reported regardless
            if let Err(err) = self.apply_motor_parameters() {
                error!("motor parameters not applied: {:?}", err);
                self.recompute_factors();
            }
        }
        Ok(Update::updated(mask))
    }

    pub fn query_factors<F: Frame + Debug>(&self) -> Result<Vec<F>, ErrorCode> {
        self.query_objects(&[
            POSITION_ENCODER_RESOLUTION_NUM,
            POSITION_ENCODER_RESOLUTION_DEN,
            GEAR_RATIO_NUM,
            GEAR_RATIO_DEN,
            FEED_CONSTANT_NUM,
            FEED_CONSTANT_DEN,
            VELOCITY_FACTOR_NUM,
            VELOCITY_FACTOR_DEN,
            MOTOR_RATED_CURRENT,
            MOTOR_RATED_TORQUE,
        ])
    }

    pub fn factors(&self) -> Factors {
        self.factors
    }

    /// Rated torque in Nm. Takes precedence over the value reported by the
    /// drive or derived from the torque constant.
    pub fn set_rated_torque(&mut self, torque: f64) {
        self.rated_torque = Some(torque);
        self.recompute_factors();
    }

    pub fn rated_torque(&self) -> Option<f64> {
        self.factors.rated_torque
    }

    pub fn set_encoder_scale_factor(&mut self, scale: f64) {
        self.encoder_scale_factor = scale;
        self.recompute_factors();
    }

    pub fn motor_parameters(&self) -> MotorParameters {
        self.motor_parameters
    }

    /// Stores the overrides and applies them to the cached factor objects.
    /// They are applied again each time the drive reports factor objects.
    pub fn set_motor_parameters(&mut self, parameters: MotorParameters) -> Result<(), ErrorCode> {
        self.motor_parameters = parameters;
        self.apply_motor_parameters()
    }

    fn apply_motor_parameters(&mut self) -> Result<(), ErrorCode> {
        let params = self.motor_parameters;
        let rated_torque = match (params.torque_constant, self.optional(&MOTOR_RATED_CURRENT)?) {
            // mA * Nm/A = mNm
            (Some(constant), Some(current_ma)) => Some((current_ma as f64 * constant).round() as i64),
            (Some(_), None) => {
                debug!("rated current unknown, torque constant applied once it is read");
                None
            }
            (None, _) => None,
        };
        if let Some(torque) = rated_torque {
            MOTOR_RATED_TORQUE.encode(torque)?;
        }

        let overrides = [
            (params.encoder_ticks, POSITION_ENCODER_RESOLUTION_NUM),
            (params.encoder_revolutions, POSITION_ENCODER_RESOLUTION_DEN),
            (params.gear_motor_shaft_revolutions, GEAR_RATIO_NUM),
            (params.gear_driving_shaft_revolutions, GEAR_RATIO_DEN),
            (params.feed_length, FEED_CONSTANT_NUM),
            (params.feed_driving_shaft_revolutions, FEED_CONSTANT_DEN),
        ];
        for (value, object) in overrides.iter() {
            if let Some(value) = value {
                self.machine.set(object.index, object.sub_index, *value);
            }
        }
        if let Some(torque) = rated_torque {
            self.set_raw(&MOTOR_RATED_TORQUE, torque)?;
        }
        self.recompute_factors();
        Ok(())
    }

    fn cached_ratio(&self, object: &ObjectDescriptor) -> u32 {
        // An unreadable ratio counts as zero so that conversions refuse to run.
        self.get(object).ok().and_then(|v| u32::try_from(v).ok()).unwrap_or(0)
    }

    fn cached_rated(&self, object: &ObjectDescriptor) -> Option<f64> {
        self.get(object).ok().map(|v| v as f64 / 1000.0)
    }

    fn recompute_factors(&mut self) {
        let mut factors = Factors::default();
        factors.encoder_ticks = self.cached_ratio(&POSITION_ENCODER_RESOLUTION_NUM);
        factors.encoder_revolutions = self.cached_ratio(&POSITION_ENCODER_RESOLUTION_DEN);
        factors.gear_motor_shaft_revolutions = self.cached_ratio(&GEAR_RATIO_NUM);
        factors.gear_driving_shaft_revolutions = self.cached_ratio(&GEAR_RATIO_DEN);
        factors.feed_length = self.cached_ratio(&FEED_CONSTANT_NUM);
        factors.feed_driving_shaft_revolutions = self.cached_ratio(&FEED_CONSTANT_DEN);
        factors.rated_torque = self.rated_torque.or_else(|| self.cached_rated(&MOTOR_RATED_TORQUE));
        factors.rated_current = self.cached_rated(&MOTOR_RATED_CURRENT);
        factors.encoder_scale_factor = self.encoder_scale_factor;
        factors.update();
        self.factors = factors;
    }

    /// SDO download of a torque target in Nm. The rated torque must be known.
    pub fn set_torque_target<F: Frame + Debug>(&mut self, torque: f64) -> Result<F, ErrorCode> {
        let raw = self.factors.raw_from_torque(torque)?;
        self.send(&TARGET_TORQUE, raw)
    }

    /// Converts the present position, speed and effort fields and stores
    /// them in the target objects. The position target is shifted by the
    /// zero offset, so a target of `p` reads back as `p` from `joint_state`.
    /// All fields are checked before any is staged. Nothing is sent, use a
    /// control PDO (`get_rpdo_message`) or `query_download` for that.
    pub fn set_control_targets(&mut self, targets: &JointState) -> Result<(), ErrorCode> {
        let mut staged = Vec::with_capacity(3);
        if let Some(position) = targets.position {
            let raw = self.factors.raw_from_encoder(position)? + self.zero_position;
            staged.push((TARGET_POSITION, TARGET_POSITION.encode(raw)?));
        }
        if let Some(speed) = targets.speed {
            let raw = self.factors.raw_from_encoder(speed)?;
            staged.push((TARGET_VELOCITY, TARGET_VELOCITY.encode(raw)?));
        }
        if let Some(effort) = targets.effort {
            let raw = self.factors.raw_from_torque(effort)?;
            staged.push((TARGET_TORQUE, TARGET_TORQUE.encode(raw)?));
        }
        for (object, data) in staged {
            self.machine.set_raw(object.index, object.sub_index, &data);
        }
        Ok(())
    }

    pub fn get_rpdo_message<F: Frame + Debug>(&self, pdo_index: usize) -> Result<F, ErrorCode> {
        self.machine.get_rpdo_message(pdo_index)
    }

    pub fn query_joint_state<F: Frame + Debug>(&self) -> Result<Vec<F>, ErrorCode> {
        // TorqueActualValue holds the same reading as CurrentActualValue
        self.query_objects(&[POSITION_ACTUAL_INTERNAL_VALUE, VELOCITY_ACTUAL_VALUE, CURRENT_ACTUAL_VALUE])
    }

    /// Joint state from the cached values of the requested `UPDATE_JOINT_*`
    /// fields. Fields that are not requested stay `None`, so do `current`
    /// and `effort` while the matching rated value is unknown.
    pub fn joint_state(&self, fields: u64) -> Result<JointState, ErrorCode> {
        let mut state = JointState::default();
        if fields & UPDATE_JOINT_POSITION != 0 {
            let raw = self.raw_position()? - self.zero_position;
            state.position = Some(self.factors.raw_to_encoder(raw)?);
        }
        if fields & UPDATE_JOINT_VELOCITY != 0 {
            state.speed = Some(self.factors.raw_to_encoder(self.get(&VELOCITY_ACTUAL_VALUE)?)?);
        }
        if fields & UPDATE_JOINT_CURRENT != 0 {
            let raw = self.get(&CURRENT_ACTUAL_VALUE)?;
            state.current = unless_unrated(self.factors.raw_to_current(raw))?;
            state.effort = unless_unrated(self.factors.raw_to_torque(raw))?;
        }
        Ok(state)
    }

    pub fn query_joint_limits<F: Frame + Debug>(&self) -> Result<Vec<F>, ErrorCode> {
        self.query_objects(&[
            SOFTWARE_POSITION_LIMIT_MIN,
            SOFTWARE_POSITION_LIMIT_MAX,
            MAX_MOTOR_SPEED,
            MAX_ACCELERATION,
            MAX_DECELERATION,
            MAX_CURRENT,
        ])
    }

    /// Physical limits. Effort and current are `None` while the matching
    /// rated value is unknown.
    pub fn joint_limits(&self) -> Result<JointLimitRange, ErrorCode> {
        let mut min = JointState::default();
        let mut max = JointState::default();

        let position_min = self.get(&SOFTWARE_POSITION_LIMIT_MIN)?;
        let position_max = self.get(&SOFTWARE_POSITION_LIMIT_MAX)?;
        if position_min == 0 && position_max == 0 {
            min.position = Some(f64::NEG_INFINITY);
            max.position = Some(f64::INFINITY);
        } else {
            min.position = Some(self.factors.raw_to_encoder(position_min)?);
            max.position = Some(self.factors.raw_to_encoder(position_max)?);
        }

        let max_speed = self.get(&MAX_MOTOR_SPEED)?;
        let speed_limit = if max_speed < 0 {
            f64::INFINITY
        } else {
            self.factors.raw_to_encoder(max_speed)?
        };
        min.speed = Some(-speed_limit);
        max.speed = Some(speed_limit);

        min.acceleration = Some(f64::NEG_INFINITY);
        max.acceleration = Some(f64::INFINITY);

        let max_current = self.get(&MAX_CURRENT)?;
        let torque_limit = unless_unrated(self.factors.raw_to_torque(max_current))?;
        min.effort = torque_limit.map(|t| -t);
        max.effort = torque_limit;
        let current_limit = unless_unrated(self.factors.raw_to_current(max_current))?;
        min.current = current_limit.map(|c| -c);
        max.current = current_limit;

        Ok(JointLimitRange { min, max })
    }

    /// Frames writing the given limits. Absent fields are left untouched on
    /// the drive. An infinite position range disables the software limits,
    /// an infinite speed disables the speed limit. The shared current limit
    /// comes from `max.current`, or from `max.effort` when no current is given.
    pub fn set_joint_limits<F: Frame + Debug>(&mut self, limits: &JointLimitRange)
        -> Result<Vec<F>, ErrorCode> {
        let mut writes: Vec<(ObjectDescriptor, i64)> = Vec::new();

        if let (Some(lo), Some(hi)) = (limits.min.position, limits.max.position) {
            let (raw_lo, raw_hi) = if lo.is_infinite() || hi.is_infinite() {
                (0, 0)
            } else {
                (self.factors.raw_from_encoder(lo)?, self.factors.raw_from_encoder(hi)?)
            };
            writes.push((SOFTWARE_POSITION_LIMIT_MIN, raw_lo));
            writes.push((SOFTWARE_POSITION_LIMIT_MAX, raw_hi));
        }

        if let Some(speed) = limits.max.speed {
            let raw = if speed.is_infinite() { -1 } else { self.factors.raw_from_encoder(speed.abs())? };
            writes.push((MAX_MOTOR_SPEED, raw));
        }

        let current_limit = match (limits.max.current, limits.max.effort) {
            (Some(current), _) => Some(self.factors.raw_from_current(current)?),
            (None, Some(effort)) => Some(self.factors.raw_from_torque(effort)?),
            (None, None) => None,
        };
        if let Some(raw) = current_limit {
            writes.push((MAX_CURRENT, raw));
        }

        // validate everything before anything is queued
        for (object, raw) in writes.iter() {
            object.encode(*raw)?;
        }
        writes.iter().map(|(object, raw)| self.send(object, *raw)).collect()
    }

    pub fn set_zero_position(&mut self, position: i64) {
        self.zero_position = position;
    }

    pub fn zero_position(&self) -> i64 {
        self.zero_position
    }

    /// Position in encoder ticks, without the zero offset.
    pub fn raw_position(&self) -> Result<i64, ErrorCode> {
        self.get(&POSITION_ACTUAL_INTERNAL_VALUE)
    }

    fn mapping_of(objects: &[ObjectDescriptor]) -> Result<PdoMapping, ErrorCode> {
        let mut mapping = PdoMapping::new();
        for object in objects {
            mapping.add(object.index, object.sub_index, object.bits())?;
        }
        Ok(mapping)
    }

    /// RPDO carrying the target object of the given control mode.
    pub fn configure_control_pdo<F: Frame + Debug>(&mut self, pdo_index: usize,
                                                   mode: JointControlMode,
                                                   parameters: &PdoCommunicationParameters)
        -> Result<Vec<F>, ErrorCode> {
        let object = match mode {
            JointControlMode::Position => TARGET_POSITION,
            JointControlMode::Speed => TARGET_VELOCITY,
            JointControlMode::Effort => TARGET_TORQUE,
            other => return Err(ErrorCode::InvalidArgument {
                more_info: format!("control mode must be Position, Speed or Effort, got {:?}", other),
            }),
        };
        let mapping = Self::mapping_of(&[object])?;
        let frames = self.machine.configure_pdo(false, pdo_index, parameters, &mapping)?;
        self.machine.declare_rpdo_mapping(pdo_index, mapping)?;
        Ok(frames)
    }

    pub fn configure_status_pdo<F: Frame + Debug>(&mut self, pdo_index: usize,
                                                  parameters: &PdoCommunicationParameters)
        -> Result<Vec<F>, ErrorCode> {
        let mapping = Self::mapping_of(&[STATUS_WORD])?;
        let frames = self.machine.configure_pdo(true, pdo_index, parameters, &mapping)?;
        self.machine.declare_tpdo_mapping(pdo_index, mapping)?;
        Ok(frames)
    }

    /// Configures TPDOs `pdo_index` and `pdo_index + 1` to report the
    /// requested `UPDATE_JOINT_*` fields. All three fields need both PDOs,
    /// any subset fits in the first one. An unused PDO is disabled.
    pub fn configure_joint_state_update_pdos<F: Frame + Debug>(
        &mut self, pdo_index: usize, parameters: &PdoCommunicationParameters, fields: u64)
        -> Result<Vec<F>, ErrorCode> {
        let mut slots: [Vec<ObjectDescriptor>; 2] = [Vec::new(), Vec::new()];
        if fields & UPDATE_JOINT_STATE == UPDATE_JOINT_STATE {
            slots[0] = vec![POSITION_ACTUAL_INTERNAL_VALUE, VELOCITY_ACTUAL_VALUE];
            slots[1] = vec![CURRENT_ACTUAL_VALUE];
        } else {
            if fields & UPDATE_JOINT_POSITION != 0 {
                slots[0].push(POSITION_ACTUAL_INTERNAL_VALUE);
            }
            if fields & UPDATE_JOINT_VELOCITY != 0 {
                slots[0].push(VELOCITY_ACTUAL_VALUE);
            }
            if fields & UPDATE_JOINT_CURRENT != 0 {
                slots[0].push(CURRENT_ACTUAL_VALUE);
            }
        }

        let mut frames = Vec::new();
        for (offset, objects) in slots.iter().enumerate() {
            let index = pdo_index + offset;
            if objects.is_empty() {
                frames.push(self.machine.disable_pdo(true, index)?);
            } else {
                let mapping = Self::mapping_of(objects)?;
                frames.extend(self.machine.configure_pdo(true, index, parameters, &mapping)?);
                self.machine.declare_tpdo_mapping(index, mapping)?;
            }
        }
        Ok(frames)
    }

    /// Stores the drive configuration to non-volatile memory.
    pub fn query_save<F: Frame + Debug>(&mut self) -> Result<F, ErrorCode> {
        self.machine.download(REG_STORE_PARAMETERS, 1, &SAVE_MAGIC_CODE)
    }

    /// Restores the drive configuration from non-volatile memory.
    pub fn query_load<F: Frame + Debug>(&mut self) -> Result<F, ErrorCode> {
        self.machine.download(REG_RESTORE_DEFAULT_PARAMETERS, 1, &LOAD_MAGIC_CODE)
    }
}

/// Current and torque conversions need a rated value the drive may not
/// report. Such fields are left out instead of failing the whole read.
fn unless_unrated(value: Result<f64, ErrorCode>) -> Result<Option<f64>, ErrorCode> {
    match value {
        Ok(value) => Ok(Some(value)),
        Err(ErrorCode::PreconditionNotMet { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}
