pub mod engine;
pub mod output;
pub mod parser;
pub mod profile;
pub mod report;
