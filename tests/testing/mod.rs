#![allow(dead_code)]

pub mod drive;
pub mod util;
