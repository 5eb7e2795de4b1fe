use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    flow::flows::symptom_patterns::AnalyzeSymptomPatternsOutput,
    identity::Identity,
    timeline::{entities::TimelineEntry, value_objects::GetTimelineFilter},
};

pub trait TimelineService: Send + Sync {
    /// Food and symptom entries of the caller, newest first, limited to what
    /// the caller's retention tier may read.
    fn get_timeline(
        &self,
        identity: Identity,
        filter: GetTimelineFilter,
    ) -> impl Future<Output = Result<Vec<TimelineEntry>, CoreError>> + Send;

    /// Runs symptom pattern analysis over the caller's stored logs in the
    /// same window as [`TimelineService::get_timeline`].
    fn analyze_timeline(
        &self,
        identity: Identity,
        filter: GetTimelineFilter,
    ) -> impl Future<Output = Result<AnalyzeSymptomPatternsOutput, CoreError>> + Send;
}
