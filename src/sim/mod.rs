pub mod event;
pub mod leaderboard;
pub mod session;
pub mod step;
pub mod world;
