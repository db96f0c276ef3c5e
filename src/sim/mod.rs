pub mod avatar;
pub mod board;
pub mod collision;
pub mod event;
pub mod field;
pub mod host;
pub mod rng;
pub mod scheduler;
pub mod screen;
pub mod services;
pub mod session;
pub mod timers;
