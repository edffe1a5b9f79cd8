// Business logic services

pub mod achievement_service;
pub mod dashboard_service;
pub mod goal_service;
pub mod plan_service;
pub mod profile_service;
pub mod progress_service;
pub mod streak_service;
pub mod workout_service;

pub use achievement_service::AchievementService;
pub use dashboard_service::DashboardService;
pub use goal_service::GoalService;
pub use plan_service::PlanService;
pub use profile_service::ProfileService;
pub use progress_service::ProgressService;
pub use streak_service::StreakService;
pub use workout_service::{UserLocks, WorkoutService};
