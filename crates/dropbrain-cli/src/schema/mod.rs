pub mod best_move_report;
pub mod brain_config;
pub mod session_report;
