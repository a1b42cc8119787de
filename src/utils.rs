pub mod date;
pub mod logs;
pub mod memory;
pub mod pg;
pub mod validate;
