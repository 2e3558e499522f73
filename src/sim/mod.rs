pub mod battle;
pub mod bias;
pub mod event;
pub mod feedback;
pub mod game;
pub mod quiz;
pub mod scheduler;
pub mod session;
pub mod timeline;
