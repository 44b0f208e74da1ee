pub mod job;
pub mod puzzle;
