pub mod dto;
pub mod handler;
pub mod queue;
pub mod storage;
pub mod worker;
