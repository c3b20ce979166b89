pub mod orbit;
pub mod placement;
