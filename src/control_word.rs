use core::fmt;
use core::str::FromStr;

use bitfield_struct::bitfield;

use crate::error::ErrorCode;

/// Raw layout of the DS402 control word (0x6040).
#[bitfield(u16)]
pub struct ControlWordBits {
    pub switch_on: bool,
    pub enable_voltage: bool,
    pub quick_stop: bool,
    pub enable_operation: bool,
    #[bits(3)]
    pub operation_mode_specific: u8,
    pub fault_reset: bool,
    pub halt: bool,
    pub operation_mode_specific_1: bool,
    #[bits(1)]
    _reserved: u8,
    #[bits(5)]
    pub manufacturer_specific: u8,
}

/// Drive state machine transition requested through the control word. It
/// is encoded as asked, whether or not it is legal from the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Shutdown,
    SwitchOn,
    EnableOperation,
    DisableVoltage,
    QuickStop,
    DisableOperation,
    FaultReset,
}

const TRANSITION_NAMES: [(Transition, &str); 7] = [
    (Transition::Shutdown, "SHUTDOWN"),
    (Transition::SwitchOn, "SWITCH_ON"),
    (Transition::EnableOperation, "ENABLE_OPERATION"),
    (Transition::DisableVoltage, "DISABLE_VOLTAGE"),
    (Transition::QuickStop, "QUICK_STOP"),
    (Transition::DisableOperation, "DISABLE_OPERATION"),
    (Transition::FaultReset, "FAULT_RESET"),
];

impl Transition {
    pub fn name(&self) -> &'static str {
        TRANSITION_NAMES
            .iter()
            .find(|(t, _)| t == self)
            .map(|(_, name)| *name)
            .unwrap_or("")
    }

    /// Bits 0 to 3 and bit 7 for this transition.
    pub fn bits(&self) -> ControlWordBits {
        let bits = ControlWordBits::new();
        match self {
            Transition::Shutdown => bits.with_enable_voltage(true).with_quick_stop(true),
            Transition::SwitchOn | Transition::DisableOperation => bits
                .with_switch_on(true)
                .with_enable_voltage(true)
                .with_quick_stop(true),
            Transition::EnableOperation => bits
                .with_switch_on(true)
                .with_enable_voltage(true)
                .with_quick_stop(true)
                .with_enable_operation(true),
            Transition::DisableVoltage => bits,
            Transition::QuickStop => bits.with_enable_voltage(true),
            Transition::FaultReset => bits.with_fault_reset(true),
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transition {
    type Err = ErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TRANSITION_NAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(t, _)| *t)
            .ok_or_else(|| ErrorCode::InvalidArgument {
                more_info: format!("unknown transition {:?}", s),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlWord {
    pub transition: Transition,
    pub halt: bool,
}

impl ControlWord {
    pub fn new(transition: Transition, halt: bool) -> Self {
        ControlWord { transition, halt }
    }

    /// Halt is only set when asked for, including alongside FAULT_RESET.
    pub fn encode(&self) -> u16 {
        u16::from(self.transition.bits().with_halt(self.halt))
    }
}
