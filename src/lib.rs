pub mod aggregate;
pub mod boxscore;
pub mod data_feed;
pub mod dataset;
pub mod demo_feed;
pub mod export;
pub mod game_file;
pub mod rundown;
pub mod season;
pub mod state;
