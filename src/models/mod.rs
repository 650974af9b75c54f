pub mod species;

pub use species::{Category, SpeciesRecord};
