pub mod fodmap_detection;
pub mod food_image;
pub mod food_similarity;
pub mod meal_suggestion;
pub mod nutrition;
pub mod symptom_patterns;
