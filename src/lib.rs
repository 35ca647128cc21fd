pub mod cache;
pub mod catalog;
pub mod command;
pub mod engine;
pub mod error;
pub mod execution;
pub mod predicate;
pub mod storage;
pub mod types;
