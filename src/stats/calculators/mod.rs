pub mod averages;
pub mod leaderboard;
pub mod streaks;

pub use averages::{average_trend, game_averages, mean_score, top_shooters};
pub use leaderboard::build_leaderboard;
pub use streaks::{chronological, longest_streak, straights};
