mod assignment;
mod demand;
mod trips;

pub use assignment::AssignmentSystem;
pub use demand::DemandSystem;
pub use trips::TripCompletionSystem;
