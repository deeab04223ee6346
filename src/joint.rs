/// Physical state of one joint. Absent fields are `None`, never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointState {
    pub position: Option<f64>,
    pub speed: Option<f64>,
    /// Torque, Nm.
    pub effort: Option<f64>,
    /// Motor current, A.
    pub current: Option<f64>,
    pub acceleration: Option<f64>,
}

impl JointState {
    pub fn position(position: f64) -> Self {
        JointState { position: Some(position), ..JointState::default() }
    }

    pub fn speed(speed: f64) -> Self {
        JointState { speed: Some(speed), ..JointState::default() }
    }

    pub fn effort(effort: f64) -> Self {
        JointState { effort: Some(effort), ..JointState::default() }
    }

    pub fn is_empty(&self) -> bool {
        *self == JointState::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointLimitRange {
    pub min: JointState,
    pub max: JointState,
}

/// Quantity a joint is commanded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointControlMode {
    Position,
    Speed,
    Effort,
    Current,
    Acceleration,
}
