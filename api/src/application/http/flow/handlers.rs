pub mod analyze_symptom_patterns;
pub mod check_food_similarity;
pub mod detect_fodmap;
pub mod estimate_nutrition;
pub mod identify_food_image;
pub mod suggest_meal;
