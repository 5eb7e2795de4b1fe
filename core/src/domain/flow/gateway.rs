use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error, warn};
use validator::Validate;

use crate::domain::{
    common::entities::app_errors::{CoreError, FieldErrors},
    flow::{ports::LLMClient, template, value_objects::ImageData},
};

/// A single-purpose, schema-validated prompt call.
///
/// Implementors declare the input shape, the prompt template, the output
/// shape and what happens when the model fails. [`run_flow`] does the rest.
pub trait Flow: Send + Sync {
    type Input: Serialize + Validate + Send + Sync;
    type Output: DeserializeOwned + Validate + Send;

    const NAME: &'static str;

    fn template(&self) -> &'static str;

    /// JSON schema handed to the model as its response schema.
    fn output_schema(&self) -> serde_json::Value;

    /// Image attached next to the prompt, for image based flows.
    fn image(&self, _input: &Self::Input) -> Result<Option<ImageData>, CoreError> {
        Ok(None)
    }

    /// Checks that need both the input and the decoded reply.
    fn check(&self, _input: &Self::Input, _output: &Self::Output) -> Result<(), CoreError> {
        Ok(())
    }

    /// Value returned instead of an error when the model call or its reply
    /// fails. `None` means the failure is returned to the caller.
    fn fallback(&self, _input: &Self::Input) -> Option<Self::Output> {
        None
    }
}

/// Runs `flow` once against `llm`.
///
/// Input validation and template errors are returned before the model is
/// called. Model failures go through [`Flow::fallback`]. There is no retry.
#[tracing::instrument(name = "flow", skip_all, fields(flow = F::NAME))]
pub async fn run_flow<F, L>(llm: &L, flow: &F, input: F::Input) -> Result<F::Output, CoreError>
where
    F: Flow,
    L: LLMClient,
{
    input.validate().map_err(|e| {
        let fields = FieldErrors::from(e);
        debug!(errors = %fields, "flow input rejected");
        CoreError::Validation(fields)
    })?;

    let image = flow.image(&input)?;

    let context = serde_json::to_value(&input).map_err(|e| {
        error!("Failed to serialize flow input: {}", e);
        CoreError::InternalServerError
    })?;
    let prompt = template::render(flow.template(), &context)?;

    match invoke(llm, flow, &input, prompt, image).await {
        Ok(output) => Ok(output),
        Err(err) if err.is_model_failure() => match flow.fallback(&input) {
            Some(fallback) => {
                warn!(error = %err, "flow failed, returning fallback");
                Ok(fallback)
            }
            None => {
                error!(error = %err, "flow failed");
                Err(err)
            }
        },
        Err(err) => Err(err),
    }
}

async fn invoke<F, L>(
    llm: &L,
    flow: &F,
    input: &F::Input,
    prompt: String,
    image: Option<ImageData>,
) -> Result<F::Output, CoreError>
where
    F: Flow,
    L: LLMClient,
{
    let schema = flow.output_schema();

    let raw = match image {
        Some(image) => llm.generate_with_image(prompt, image, schema).await?,
        None => llm.generate_with_text(prompt, schema).await?,
    };

    parse_output(flow, input, &raw)
}

/// Decodes and validates a raw model reply for `flow`.
pub fn parse_output<F: Flow>(flow: &F, input: &F::Input, raw: &str) -> Result<F::Output, CoreError> {
    let json = extract_json_object(raw).ok_or_else(|| {
        CoreError::MalformedResponse("model reply contains no JSON object".to_string())
    })?;

    let output: F::Output = serde_json::from_str(json).map_err(|e| {
        CoreError::MalformedResponse(format!("reply does not match the output schema: {}", e))
    })?;

    output.validate().map_err(|e| {
        CoreError::MalformedResponse(format!("reply failed validation: {}", FieldErrors::from(e)))
    })?;

    flow.check(input, &output)?;

    Ok(output)
}

/// Slice of `raw` holding the outermost JSON object, tolerating markdown
/// fences or prose around it.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flow::ports::MockLLMClient;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Validate)]
    #[serde(rename_all = "camelCase")]
    struct EchoInput {
        #[validate(length(min = 1, message = "word is required"))]
        word: String,
    }

    #[derive(Debug, PartialEq, Deserialize, Validate)]
    struct EchoOutput {
        #[validate(length(min = 1))]
        echo: String,
    }

    struct Echo {
        with_fallback: bool,
    }

    impl Flow for Echo {
        type Input = EchoInput;
        type Output = EchoOutput;

        const NAME: &'static str = "echo";

        fn template(&self) -> &'static str {
            "Repeat the word {{word}}."
        }

        fn output_schema(&self) -> serde_json::Value {
            json!({ "type": "object", "properties": { "echo": { "type": "string" } } })
        }

        fn fallback(&self, _input: &EchoInput) -> Option<EchoOutput> {
            self.with_fallback.then(|| EchoOutput {
                echo: "unavailable".to_string(),
            })
        }
    }

    fn input(word: &str) -> EchoInput {
        EchoInput {
            word: word.to_string(),
        }
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_the_model() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text().never();
        llm.expect_generate_with_image().never();

        let err = run_flow(&llm, &Echo { with_fallback: true }, input(""))
            .await
            .unwrap_err();

        match err {
            CoreError::Validation(fields) => assert_eq!(fields.0[0].message, "word is required"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_renders_prompt_and_decodes_fenced_reply() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text()
            .withf(|prompt, schema| prompt == "Repeat the word kiwi." && schema["type"] == "object")
            .times(1)
            .returning(|_, _| Box::pin(async { Ok("```json\n{\"echo\": \"kiwi\"}\n```".to_string()) }));

        let output = run_flow(&llm, &Echo { with_fallback: false }, input("kiwi"))
            .await
            .unwrap();

        assert_eq!(output.echo, "kiwi");
    }

    #[tokio::test]
    async fn test_model_failure_without_fallback_is_returned() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text()
            .times(1)
            .returning(|_, _| {
                Box::pin(async { Err(CoreError::ExternalServiceError("timeout".to_string())) })
            });

        let err = run_flow(&llm, &Echo { with_fallback: false }, input("kiwi"))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::ExternalServiceError(_)));
    }

    #[tokio::test]
    async fn test_partial_reply_uses_fallback_instead_of_partial_object() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok("{\"echo\": \"\"}".to_string()) }));

        let output = run_flow(&llm, &Echo { with_fallback: true }, input("kiwi"))
            .await
            .unwrap();

        assert_eq!(output.echo, "unavailable");
    }

    #[tokio::test]
    async fn test_empty_reply_is_malformed() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(String::new()) }));

        let err = run_flow(&llm, &Echo { with_fallback: false }, input("kiwi"))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::MalformedResponse(_)));
    }

    #[test]
    fn test_extract_json_object() {
        assert_eq!(
            extract_json_object("Sure! {\"a\": {\"b\": 1}} hope that helps"),
            Some("{\"a\": {\"b\": 1}}")
        );
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} {"), None);
    }
}
