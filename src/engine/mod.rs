pub mod collaborators;
pub mod intake;
pub mod wizard;
