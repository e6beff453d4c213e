pub mod collision;
pub mod forces;
pub mod grid;
pub mod particle;
pub mod scenario;
pub mod world;
