use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{
    common::entities::app_errors::{CoreError, FieldErrors},
    flow::{
        gateway::Flow,
        value_objects::{ImageData, validate_image_data_uri},
    },
};

/// Photos larger than this are rejected before upload to the model.
pub const MAX_PHOTO_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyFoodImageInput {
    /// Photo of a meal, label or menu as `data:<mime>;base64,<data>`.
    #[validate(custom(function = "validate_image_data_uri"))]
    #[serde(skip_serializing)]
    pub photo_data_uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyFoodImageOutput {
    #[validate(length(min = 1, message = "identifiedFoodName must not be empty"))]
    pub identified_food_name: String,
    #[validate(length(min = 1, message = "identifiedIngredients must not be empty"))]
    pub identified_ingredients: String,
    #[validate(length(min = 1))]
    pub estimated_portion_size: String,
    #[validate(length(min = 1))]
    pub estimated_portion_unit: String,
    /// Text read from a label or menu in the photo, if any.
    #[serde(default)]
    pub ocr_text: Option<String>,
}

pub struct IdentifyFoodImage;

const TEMPLATE: &str = r#"You help a person with IBS log what they eat.

Look at the attached photo. It shows a meal, a packaged food label or a menu.
- Name the food in identifiedFoodName.
- List its likely ingredients as a comma separated list in identifiedIngredients.
- Estimate the portion shown: a number in estimatedPortionSize and a unit (g, ml, cup, slice, piece, serving) in estimatedPortionUnit.
- If the photo contains readable text such as an ingredient label, copy it into ocrText.
"#;

impl Flow for IdentifyFoodImage {
    type Input = IdentifyFoodImageInput;
    type Output = IdentifyFoodImageOutput;

    const NAME: &'static str = "identify_food_image";

    fn template(&self) -> &'static str {
        TEMPLATE
    }

    fn output_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "identifiedFoodName": { "type": "string" },
                "identifiedIngredients": { "type": "string" },
                "estimatedPortionSize": { "type": "string" },
                "estimatedPortionUnit": { "type": "string" },
                "ocrText": { "type": "string" }
            },
            "required": [
                "identifiedFoodName", "identifiedIngredients",
                "estimatedPortionSize", "estimatedPortionUnit"
            ]
        })
    }

    fn image(&self, input: &IdentifyFoodImageInput) -> Result<Option<ImageData>, CoreError> {
        let image = ImageData::from_data_uri(&input.photo_data_uri)?;
        if image.decoded_len() > MAX_PHOTO_BYTES {
            return Err(CoreError::Validation(FieldErrors::single(
                "photoDataUri",
                "photo must be 8 MB or smaller",
            )));
        }
        Ok(Some(image))
    }
}
