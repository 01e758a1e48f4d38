//! GPA computation core.
//!
//! A grade scale turns a letter or percentage into base points, a weighting
//! policy adjusts those points per course category, and the aggregator
//! reduces a course list into overall and per-bucket GPAs. Band tables map
//! the result to standing, honors and competitiveness labels. Nothing here
//! fails: rows that cannot be counted are skipped.

pub mod aggregate;
pub mod bands;
pub mod calculator;
pub mod planner;
pub mod policy;
pub mod scale;
pub mod types;
pub mod utility;
