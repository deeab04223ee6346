use crate::error::ErrorCode;
use crate::objects::{MAX_CURRENT, TARGET_TORQUE};

/// Conversion between the drive's internal units and physical units.
///
/// Positions and speeds go through three independent ratios (encoder
/// resolution, gear and feed constant) and a final application scale.
/// Currents and torques are expressed by the drive in thousandths of the
/// rated current, so both rated values are needed to interpret them.
///
/// The derived scale is cached and only refreshed by `update()`, which is a
/// pure function of the fields above it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Factors {
    pub encoder_ticks: u32,
    pub encoder_revolutions: u32,
    pub gear_motor_shaft_revolutions: u32,
    pub gear_driving_shaft_revolutions: u32,
    pub feed_length: u32,
    pub feed_driving_shaft_revolutions: u32,
    /// Nm
    pub rated_torque: Option<f64>,
    /// A
    pub rated_current: Option<f64>,
    pub encoder_scale_factor: f64,

    position_scale: Option<f64>,
}

impl Default for Factors {
    fn default() -> Self {
        let mut factors = Factors {
            encoder_ticks: 1,
            encoder_revolutions: 1,
            gear_motor_shaft_revolutions: 1,
            gear_driving_shaft_revolutions: 1,
            feed_length: 1,
            feed_driving_shaft_revolutions: 1,
            rated_torque: None,
            rated_current: None,
            encoder_scale_factor: 1.0,
            position_scale: None,
        };
        factors.update();
        factors
    }
}

impl Factors {
    /// Recomputes the derived scale. `None` when a denominator is zero.
    pub fn update(&mut self) {
        let den = self.encoder_ticks as f64
            * self.gear_motor_shaft_revolutions as f64
            * self.feed_driving_shaft_revolutions as f64;
        let num = self.encoder_revolutions as f64
            * self.gear_driving_shaft_revolutions as f64
            * self.feed_length as f64;
        self.position_scale = if den == 0.0 {
            None
        } else {
            Some(num / den * self.encoder_scale_factor)
        };
    }

    /// Physical units per raw position (or speed) unit.
    pub fn position_scale(&self) -> Option<f64> {
        self.position_scale
    }

    fn checked_position_scale(&self) -> Result<f64, ErrorCode> {
        match self.position_scale {
            Some(scale) if scale != 0.0 && scale.is_finite() => Ok(scale),
            _ => Err(ErrorCode::PreconditionNotMet {
                what: "position factors have a zero denominator or numerator",
            }),
        }
    }

    fn checked_rated_torque(&self) -> Result<f64, ErrorCode> {
        match self.rated_torque {
            Some(torque) if torque != 0.0 => Ok(torque),
            _ => Err(ErrorCode::PreconditionNotMet { what: "rated torque is unknown" }),
        }
    }

    fn checked_rated_current(&self) -> Result<f64, ErrorCode> {
        match self.rated_current {
            Some(current) if current != 0.0 => Ok(current),
            _ => Err(ErrorCode::PreconditionNotMet { what: "rated current is unknown" }),
        }
    }

    pub fn raw_to_encoder(&self, raw: i64) -> Result<f64, ErrorCode> {
        Ok(raw as f64 * self.checked_position_scale()?)
    }

    pub fn raw_from_encoder(&self, value: f64) -> Result<i64, ErrorCode> {
        let scale = self.checked_position_scale()?;
        to_integer(value / scale)
    }

    pub fn raw_to_current(&self, raw: i64) -> Result<f64, ErrorCode> {
        Ok(raw as f64 * self.checked_rated_current()? / 1000.0)
    }

    /// Raw current limit, which the drive keeps in an unsigned 16 bit field.
    pub fn raw_from_current(&self, current: f64) -> Result<i64, ErrorCode> {
        let raw = to_integer(current / self.checked_rated_current()? * 1000.0)?;
        if u16::try_from(raw).is_err() {
            return Err(ErrorCode::OutOfRange {
                index: MAX_CURRENT.index,
                sub_index: MAX_CURRENT.sub_index,
                value: raw,
            });
        }
        Ok(raw)
    }

    pub fn raw_to_torque(&self, raw: i64) -> Result<f64, ErrorCode> {
        Ok(raw as f64 * self.checked_rated_torque()? / 1000.0)
    }

    /// Raw torque target, which the drive keeps in a signed 16 bit field.
    pub fn raw_from_torque(&self, torque: f64) -> Result<i64, ErrorCode> {
        let raw = to_integer(torque / self.checked_rated_torque()? * 1000.0)?;
        if i16::try_from(raw).is_err() {
            return Err(ErrorCode::OutOfRange {
                index: TARGET_TORQUE.index,
                sub_index: TARGET_TORQUE.sub_index,
                value: raw,
            });
        }
        Ok(raw)
    }
}

fn to_integer(value: f64) -> Result<i64, ErrorCode> {
    if !value.is_finite() || value.abs() >= i64::MAX as f64 {
        return Err(ErrorCode::InvalidArgument {
            more_info: format!("{} cannot be converted to a raw value", value),
        });
    }
    Ok(value.round() as i64)
}
