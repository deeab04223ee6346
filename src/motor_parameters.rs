use ini_core as ini;

use crate::error::ErrorCode;
use crate::util::parse_u32;

const SECTION_NAME: &str = "MotorParameters";

/// Application supplied motor description. The drive does not keep the
/// factor objects in non-volatile memory, so these values override whatever
/// it reports. Unset fields leave the drive's value in effect.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotorParameters {
    pub encoder_ticks: Option<u32>,
    pub encoder_revolutions: Option<u32>,
    pub gear_motor_shaft_revolutions: Option<u32>,
    pub gear_driving_shaft_revolutions: Option<u32>,
    pub feed_length: Option<u32>,
    pub feed_driving_shaft_revolutions: Option<u32>,
    /// Nm/A. The rated torque is derived from it and the rated current.
    pub torque_constant: Option<f64>,
}

impl MotorParameters {
    /// Reads the `[MotorParameters]` section of an INI document. Other
    /// sections and unknown keys are ignored.
    pub fn from_ini(content: &str) -> Result<MotorParameters, ErrorCode> {
        let mut params = MotorParameters::default();
        let mut in_section = false;

        for item in ini::Parser::new(content) {
            match item {
                ini::Item::Section(name) => in_section = name.trim() == SECTION_NAME,
                ini::Item::Property(key, maybe_value) if in_section => {
                    params.set_property(key.trim(), maybe_value.unwrap_or_default().trim())?;
                }
                ini::Item::Error(line) => {
                    return Err(ErrorCode::ConfigParseFailed {
                        line: String::from(line),
                        more_info: String::from("malformed line"),
                    });
                }
                _ => {}
            }
        }
        Ok(params)
    }

    fn set_property(&mut self, key: &str, value: &str) -> Result<(), ErrorCode> {
        let slot = match key {
            "EncoderTicks" => &mut self.encoder_ticks,
            "EncoderRevolutions" => &mut self.encoder_revolutions,
            "GearMotorShaftRevolutions" => &mut self.gear_motor_shaft_revolutions,
            "GearDrivingShaftRevolutions" => &mut self.gear_driving_shaft_revolutions,
            "FeedLength" => &mut self.feed_length,
            "FeedDrivingShaftRevolutions" => &mut self.feed_driving_shaft_revolutions,
            "TorqueConstant" => {
                let constant = value.parse::<f64>().map_err(|_| parse_error(key, value, "not a number"))?;
                self.torque_constant = Some(constant);
                return Ok(());
            }
            _ => return Ok(()),
        };
        *slot = Some(parse_u32(value)
            .ok_or_else(|| parse_error(key, value, "not an unsigned 32 bit integer"))?);
        Ok(())
    }
}

fn parse_error(key: &str, value: &str, reason: &str) -> ErrorCode {
    ErrorCode::ConfigParseFailed {
        line: format!("{}={}", key, value),
        more_info: String::from(reason),
    }
}
