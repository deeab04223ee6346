use core::fmt;

use bitfield_struct::bitfield;

use crate::error::ErrorCode;
use crate::objects::{CAN_CONTROLLER_STATUS, STATUS_WORD};

/// Raw layout of the DS402 status word (0x6041).
#[bitfield(u16)]
pub struct StatusWordBits {
    pub ready_to_switch_on: bool,
    pub switched_on: bool,
    pub operation_enabled: bool,
    pub fault: bool,
    pub voltage_enabled: bool,
    pub quick_stop: bool,
    pub switch_on_disabled: bool,
    pub warning: bool,
    pub manufacturer_specific_0: bool,
    pub remote: bool,
    pub target_reached: bool,
    pub internal_limit_active: bool,
    #[bits(2)]
    pub operation_mode_specific: u8,
    #[bits(2)]
    pub manufacturer_specific_1: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    NotReadyToSwitchOn,
    SwitchOnDisabled,
    ReadyToSwitchOn,
    SwitchedOn,
    OperationEnabled,
    QuickStopActive,
    FaultReactionActive,
    Fault,
}

impl State {
    pub fn name(&self) -> &'static str {
        match self {
            State::NotReadyToSwitchOn => "NOT_READY_TO_SWITCH_ON",
            State::SwitchOnDisabled => "SWITCH_ON_DISABLED",
            State::ReadyToSwitchOn => "READY_TO_SWITCH_ON",
            State::SwitchedOn => "SWITCH_ON",
            State::OperationEnabled => "OPERATION_ENABLED",
            State::QuickStopActive => "QUICK_STOP_ACTIVE",
            State::FaultReactionActive => "FAULT_REACTION_ACTIVE",
            State::Fault => "FAULT",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// State decoding rules, evaluated in order. The fault rules only look at
/// the low nibble and therefore come before every rule masking bit 6.
const STATE_RULES: [(u16, u16, State); 8] = [
    (0x0F, 0x0F, State::FaultReactionActive),
    (0x0F, 0x08, State::Fault),
    (0x4F, 0x00, State::NotReadyToSwitchOn),
    (0x4F, 0x40, State::SwitchOnDisabled),
    (0x6F, 0x21, State::ReadyToSwitchOn),
    (0x6F, 0x23, State::SwitchedOn),
    (0x6F, 0x27, State::OperationEnabled),
    (0x6F, 0x07, State::QuickStopActive),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusWord {
    pub state: State,
    pub voltage_enabled: bool,
    pub warning: bool,
    pub target_reached: bool,
    pub internal_limit_active: bool,
}

impl StatusWord {
    pub fn parse(raw: u16) -> Result<StatusWord, ErrorCode> {
        let state = STATE_RULES
            .iter()
            .find(|(mask, pattern, _)| raw & mask == *pattern)
            .map(|(_, _, state)| *state)
            .ok_or(ErrorCode::UnrecognizedEncoding {
                index: STATUS_WORD.index,
                sub_index: STATUS_WORD.sub_index,
                raw: raw as i64,
            })?;

        let bits = StatusWordBits::from(raw);
        Ok(StatusWord {
            state,
            voltage_enabled: bits.voltage_enabled(),
            warning: bits.warning(),
            target_reached: bits.target_reached(),
            internal_limit_active: bits.internal_limit_active(),
        })
    }
}

/// Elmo CAN controller status register (0x2F45). Its bits are not decoded
/// further, zero means the controller reports no error condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanControllerStatus {
    raw: u8,
}

impl CanControllerStatus {
    pub fn parse(raw: i64) -> Result<CanControllerStatus, ErrorCode> {
        let raw = u8::try_from(raw).map_err(|_| ErrorCode::UnrecognizedEncoding {
            index: CAN_CONTROLLER_STATUS.index,
            sub_index: CAN_CONTROLLER_STATUS.sub_index,
            raw,
        })?;
        Ok(CanControllerStatus { raw })
    }

    pub fn raw(&self) -> u8 {
        self.raw
    }

    pub fn is_ok(&self) -> bool {
        self.raw == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_table() {
        assert_eq!(StatusWord::parse(0x0000).unwrap().state, State::NotReadyToSwitchOn);
        assert_eq!(StatusWord::parse(0x0040).unwrap().state, State::SwitchOnDisabled);
        assert_eq!(StatusWord::parse(0x0021).unwrap().state, State::ReadyToSwitchOn);
        assert_eq!(StatusWord::parse(0x0023).unwrap().state, State::SwitchedOn);
        assert_eq!(StatusWord::parse(0x0027).unwrap().state, State::OperationEnabled);
        assert_eq!(StatusWord::parse(0x0007).unwrap().state, State::QuickStopActive);
        assert_eq!(StatusWord::parse(0x000F).unwrap().state, State::FaultReactionActive);
        assert_eq!(StatusWord::parse(0x0008).unwrap().state, State::Fault);
    }

    #[test]
    fn test_fault_has_priority_over_switch_on_disabled() {
        // bit 6 set as for SWITCH_ON_DISABLED, but the fault bit wins
        let status = StatusWord::parse(0x0048).unwrap();
        assert_eq!(status.state, State::Fault);
    }

    #[test]
    fn test_flags_are_independent_of_state() {
        let status = StatusWord::parse(0x0C37 | 0x0080).unwrap();
        assert_eq!(status.state, State::OperationEnabled);
        assert!(status.voltage_enabled);
        assert!(status.warning);
        assert!(status.target_reached);
        assert!(status.internal_limit_active);

        let status = StatusWord::parse(0x0040).unwrap();
        assert!(!status.voltage_enabled && !status.warning);
        assert!(!status.target_reached && !status.internal_limit_active);
    }

    #[test]
    fn test_unknown_pattern() {
        for raw in [0x0001u16, 0x0041] {
            assert_eq!(StatusWord::parse(raw), Err(ErrorCode::UnrecognizedEncoding {
                index: 0x6041, sub_index: 0, raw: raw as i64,
            }));
        }
    }

    #[test]
    fn test_bits_layout() {
        let bits = StatusWordBits::new().with_fault(true).with_target_reached(true);
        assert_eq!(u16::from(bits), 0x0408);
    }

    #[test]
    fn test_can_controller_status() {
        assert!(CanControllerStatus::parse(0).unwrap().is_ok());
        let status = CanControllerStatus::parse(0x20).unwrap();
        assert!(!status.is_ok());
        assert_eq!(status.raw(), 0x20);
        assert!(CanControllerStatus::parse(300).is_err());
    }
}
