// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! OpenAI-compatible chat-completions backend.

use std::fmt;
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::Generator;
use crate::error::GenerationError;
use crate::model::{GeneratedSource, GenerationRequest, NotationKind};
use crate::route::{Route, Template};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct CompletionGenerator {
    agent: ureq::Agent,
    config: CompletionConfig,
}

impl fmt::Debug for CompletionGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = self.config.api_key.as_ref().map(|_| "<redacted>");
        f.debug_struct("CompletionGenerator")
            .field("endpoint", &self.config.endpoint)
            .field("model", &self.config.model)
            .field("api_key", &api_key)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn notation_instructions(notation: NotationKind) -> &'static str {
    match notation {
        NotationKind::Graphviz => "GraphViz DOT (a single `digraph`)",
        NotationKind::Mermaid => "Mermaid",
        NotationKind::PlantUml => "PlantUML wrapped in @startuml/@enduml",
        NotationKind::Excalidraw => "an Excalidraw scene JSON document",
    }
}

fn family(route: &Route) -> &'static str {
    match route.template {
        Template::Workflow(_) | Template::FreeformSteps | Template::Generic => "flowchart",
        Template::Sequence => "sequence",
        Template::Mindmap => "mindmap",
        Template::Organization => "organization chart",
    }
}

fn system_prompt(route: &Route) -> String {
    format!(
        "You convert descriptions into {} diagram code written in {}. Reply with the diagram \
         code only, no explanations.",
        family(route),
        notation_instructions(route.notation)
    )
}

/// Returns the body of the first fenced block, or the trimmed text when there is none.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(open) = trimmed.find("```") else {
        return trimmed;
    };
    let after_open = &trimmed[open + 3..];
    let body_start = after_open
        .find('\n')
        .map_or(after_open.len(), |idx| idx + 1);
    let body = &after_open[body_start..];
    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_owned())
}

fn map_transport(err: ureq::Error) -> GenerationError {
    match err {
        ureq::Error::Timeout(_) => GenerationError::TimedOut,
        other => GenerationError::Transport(other.to_string()),
    }
}

impl CompletionGenerator {
    pub fn new(config: CompletionConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent, config }
    }

    fn complete_blocking(
        agent: &ureq::Agent,
        config: &CompletionConfig,
        system: &str,
        description: &str,
    ) -> Result<String, GenerationError> {
        let payload = ChatRequest {
            model: &config.model,
            temperature: 0.0,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: description,
                },
            ],
        };
        let body = serde_json::to_vec(&payload)
            .map_err(|err| GenerationError::Transport(err.to_string()))?;

        let mut request = agent
            .post(config.endpoint.as_str())
            .header("Content-Type", "application/json");
        if let Some(key) = config.api_key.as_deref() {
            request = request.header("Authorization", format!("Bearer {key}"));
        }
        let mut response = request.send(&body[..]).map_err(map_transport)?;
        let status = response.status().as_u16();
        let text = response.body_mut().read_to_string().map_err(map_transport)?;

        if !(200..300).contains(&status) {
            warn!(status = status; "completion endpoint rejected request");
            return Err(GenerationError::Failed {
                status,
                message: error_message(&text),
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|_| GenerationError::Malformed)?;
        let content = parsed
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .ok_or(GenerationError::Malformed)?;
        let code = strip_code_fences(&content);
        if code.is_empty() {
            return Err(GenerationError::Malformed);
        }
        Ok(code.to_owned())
    }
}

impl Generator for CompletionGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
        route: &Route,
    ) -> Result<GeneratedSource, GenerationError> {
        let agent = self.agent.clone();
        let config = self.config.clone();
        let system = system_prompt(route);
        let description = request.description().to_owned();
        let notation = route.notation;
        debug!(
            model = config.model.as_str(),
            notation = notation.as_str();
            "requesting completion"
        );

        let code = tokio::task::spawn_blocking(move || {
            Self::complete_blocking(&agent, &config, &system, &description)
        })
        .await
        .map_err(|err| GenerationError::Transport(err.to_string()))??;

        Ok(GeneratedSource::new(notation, code))
    }
}

#[cfg(test)]
mod tests {
    use super::{error_message, strip_code_fences, system_prompt};
    use crate::model::NotationKind;
    use crate::route::resolve;

    #[test]
    fn strips_fenced_code_with_language_tag() {
        let reply = "Here you go:\n```dot\ndigraph G { a -> b }\n```\nEnjoy";
        assert_eq!(strip_code_fences(reply), "digraph G { a -> b }");
    }

    #[test]
    fn unfenced_reply_is_trimmed() {
        assert_eq!(
            strip_code_fences("  graph TD\n A --> B \n"),
            "graph TD\n A --> B"
        );
    }

    #[test]
    fn unterminated_fence_keeps_the_rest() {
        assert_eq!(
            strip_code_fences("```mermaid\ngraph TD\nA-->B"),
            "graph TD\nA-->B"
        );
    }

    #[test]
    fn error_message_prefers_structured_body() {
        let body = r#"{"error":{"message":"quota exceeded","type":"insufficient_quota"}}"#;
        assert_eq!(error_message(body), "quota exceeded");
        assert_eq!(error_message(" upstream down \n"), "upstream down");
    }

    #[test]
    fn prompt_names_family_and_notation() {
        let route = resolve("sequence");
        assert_eq!(route.notation, NotationKind::Mermaid);
        let prompt = system_prompt(&route);
        assert!(prompt.contains("sequence diagram code written in Mermaid"));
    }
}
