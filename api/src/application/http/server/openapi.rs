use utoipa::OpenApi;

use crate::application::http::{
    flow::router::FlowApiDoc, food_item::router::FoodItemApiDoc, health::router::HealthApiDoc,
    symptom_log::router::SymptomLogApiDoc, timeline::router::TimelineApiDoc,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "gutlog API",
        description = "FODMAP food and symptom diary with AI flows"
    ),
    nest(
        (path = "/flows", api = FlowApiDoc),
        (path = "/food-items", api = FoodItemApiDoc),
        (path = "/symptom-logs", api = SymptomLogApiDoc),
        (path = "/timeline", api = TimelineApiDoc),
        (path = "/health", api = HealthApiDoc),
    )
)]
pub struct ApiDoc;
