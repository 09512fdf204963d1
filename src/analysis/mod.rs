/// Numeric analysis: descriptive statistics, least-squares fits, and the
/// monthly drift series. All of it is descriptive; nothing here is
/// validated, cached, or persisted.
pub mod drift;
pub mod regression;
pub mod stats;
