// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free engines over one-dimensional series.  Every engine
// takes slices, allocates its own full-length output and returns `Result`, so
// callers must handle bad parameters and short series explicitly.
//
// Dependency order: diff, ewma and rolling are leaves; rsi smooths with ewma;
// bollinger is built from rolling.

pub mod bollinger;
pub mod diff;
pub mod ewma;
pub mod rolling;
pub mod rsi;
