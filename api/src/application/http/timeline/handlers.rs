pub mod analyze_timeline;
pub mod get_timeline;
