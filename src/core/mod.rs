pub mod alphabet;
pub mod engine;
pub mod model;
pub mod normalizer;
pub mod scorer;
pub mod types;
