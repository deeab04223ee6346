// DS402 device profile for Elmo servo drives on top of a small master-side
// CANopen state machine. Frames are built and interpreted here, sending and
// receiving them is left to the caller's CAN driver.

extern crate alloc;

pub mod cmd_header;
pub mod control_word;
pub mod controller;
pub mod data_type;
pub mod error;
pub mod factors;
pub mod joint;
pub mod master;
pub mod motor_parameters;
pub mod objects;
pub mod operation_mode;
pub mod pdo;
pub mod sdo_client;
pub mod status_word;
pub mod update;
pub mod util;
pub mod value;

mod constant;
mod prelude;

pub use controller::Controller;
pub use error::ErrorCode;
