//! Fixed conversation used to ask for a product review summary.

use serde::Serialize;

const SYSTEM_PROMPT: &str = r#"Act as a smart business analyst and identify key insights and features from given reviews of a particular honey of honey selling company. Provide the summarized output in 3 sections - Positive, Negative and Recommendation/Suggestion.
All the sections should have a short paragraph.
Provide overall score to the product based on reviews on a scale of 1 to 10 with being worst as 1 and being best at 10.
Note - Do not copy paste reviews as it is in output. Do not mention anything other then fields specified. if any of the section has no output just say NA.
Output format-
{
"Positive":<output>,
"Negative":<output>,
"Suggestion":<output>,
"Score":<score>
}"#;

const ASSISTANT_ASKS_PARAMETERS: &str = "Any other parameters ?";

const USER_PARAMETERS: &str = "Yes. Some of the reviews wont make any sense or have meaning and maybe just have the product name as it is so ignore them and also provide output such that it can be used for displaying insights to dashboard. Do not mention anyting other then fields.";

const ASSISTANT_ACKNOWLEDGES: &str = "Okay I will not provide any other information then the json fields and strictly follow the json format. Provide the review list.";

/// Prefix placed in front of every review in the final user turn.
const BULLET: &str = "• ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Assistant,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Builds the five-turn conversation for one product's reviews.
///
/// The system instruction and two scripted exchanges pin the output format;
/// the last user turn carries the reviews as bullets, concatenated without
/// separators.
#[must_use]
pub fn build_messages<S: AsRef<str>>(reviews: &[S]) -> Vec<ChatMessage> {
    let bullets: String = reviews
        .iter()
        .map(|review| format!("{BULLET}{}", review.as_ref()))
        .collect();

    vec![
        ChatMessage::new(Role::System, SYSTEM_PROMPT),
        ChatMessage::new(Role::Assistant, ASSISTANT_ASKS_PARAMETERS),
        ChatMessage::new(Role::User, USER_PARAMETERS),
        ChatMessage::new(Role::Assistant, ASSISTANT_ACKNOWLEDGES),
        ChatMessage::new(Role::User, bullets),
    ]
}
