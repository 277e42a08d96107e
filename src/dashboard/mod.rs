mod advice;
mod view;

pub use advice::{recommended_actions, suggestions, StatusBanner};
pub use view::{DashboardView, MetricCard};
