use crate::error::{Error, Result};
use crate::models::roadmap_document::RoadmapNode;
use crate::models::user::LearningStyle;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Duration;

#[derive(Clone)]
pub struct AIService {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl AIService {
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub async fn generate_roadmap(&self, skill: &str, style: LearningStyle) -> Result<RoadmapNode> {
        tracing::info!(skill, style = %style, model = %self.model, "Generating roadmap");

        let prompt = build_roadmap_prompt(skill, style);
        let text = self.generate_content(&prompt).await?;
        let roadmap = parse_roadmap(&text)?;

        tracing::info!(
            skill,
            sub_modules = roadmap.sub_modules.len(),
            "Roadmap document received"
        );
        Ok(roadmap)
    }

    async fn generate_content(&self, prompt: &str) -> Result<String> {
        let payload = serde_json::json!({
            "contents": [
                { "role": "user", "parts": [ { "text": prompt } ] }
            ],
            "generationConfig": {
                "temperature": 0.7,
                "responseMimeType": "application/json"
            }
        });

        let res = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!("Gemini API error {}: {}", status, text)));
        }

        let body: JsonValue = res.json().await?;
        extract_candidate_text(&body)
            .ok_or_else(|| Error::Upstream("Gemini response contained no text".to_string()))
    }
}

fn extract_candidate_text(body: &JsonValue) -> Option<String> {
    let parts = body
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

pub fn style_instruction(style: LearningStyle) -> &'static str {
    match style {
        LearningStyle::Video => {
            "Instead of a text summary, provide a JSON array of 3 specific YouTube search terms or video titles for this topic under a key called 'video_queries'."
        }
        LearningStyle::OfficialDocs => {
            "Instead of a text summary, provide a list of 2-3 official documentation URLs or standard reference book titles under a key called 'ref_links'."
        }
        LearningStyle::Text => "Provide a concise 2-sentence text summary explaining the concept.",
    }
}

pub fn build_roadmap_prompt(skill: &str, style: LearningStyle) -> String {
    let skill_json = JsonValue::String(skill.to_string()).to_string();
    format!(
        r#"You are an expert course creator. Create a comprehensive, recursive learning roadmap for the skill: {skill}.

CRITICAL: Output ONLY valid JSON.

CUSTOMIZATION: The user prefers learning via: {style}.
{instruction}

The JSON must follow this exact recursive structure:
{{
    "topic_name": {skill},
    "resources": {{
        "explanation": "Summary here (optional if other links provided)",
        "video_queries": ["Query 1", "Query 2"],
        "ref_links": ["URL 1", "URL 2"]
    }},
    "sub_modules": [
        {{
            "topic_name": "Sub-topic",
            "resources": {{ ...same structure as above... }},
            "quiz": {{
                "question_sets": [
                    {{
                        "questions": [
                            {{
                                "question": "Question text?",
                                "options": ["A", "B", "C", "D"],
                                "correct_answer": "A"
                            }}
                        ]
                    }}
                ]
            }},
            "sub_modules": []
        }}
    ]
}}
Make it 2 levels deep."#,
        skill = skill_json,
        style = style,
        instruction = style_instruction(style),
    )
}

/// Removes a surrounding Markdown code fence (```` ``` ```` or ```` ```json ````).
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    body.trim_end().trim_end_matches("```").trim()
}

pub fn parse_roadmap(raw: &str) -> Result<RoadmapNode> {
    serde_json::from_str(strip_code_fences(raw))
        .map_err(|e| Error::Upstream(format!("Malformed roadmap JSON from model: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_json_fences() {
        let raw = "```json\n{\"topic_name\": \"Rust\"}\n```";
        assert_eq!(strip_code_fences(raw), "{\"topic_name\": \"Rust\"}");
    }

    #[test]
    fn strips_bare_fences_and_whitespace() {
        let raw = "  ```\n{\"a\": 1}\n```  \n";
        assert_eq!(strip_code_fences(raw), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json{\"a\": 1}```"), "{\"a\": 1}");
    }

    #[test]
    fn leaves_plain_json_alone() {
        assert_eq!(strip_code_fences(" {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn parses_fenced_roadmap() {
        let raw = "```json\n{\"topic_name\": \"Go\", \"sub_modules\": [{\"topic_name\": \"Goroutines\"}]}\n```";
        let node = parse_roadmap(raw).unwrap();
        assert_eq!(node.topic_name, "Go");
        assert_eq!(node.sub_modules[0].topic_name, "Goroutines");
    }

    #[test]
    fn malformed_output_is_an_upstream_error() {
        let err = parse_roadmap("Sure! Here is your roadmap: {").unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[test]
    fn prompt_carries_style_instruction() {
        let prompt = build_roadmap_prompt("Rust", LearningStyle::Video);
        assert!(prompt.contains("video_queries'"));
        assert!(prompt.contains("via: video"));
        assert!(prompt.contains("\"topic_name\": \"Rust\""));

        let prompt = build_roadmap_prompt("Rust", LearningStyle::OfficialDocs);
        assert!(prompt.contains("'ref_links'"));

        let prompt = build_roadmap_prompt("Rust", LearningStyle::Text);
        assert!(prompt.contains("2-sentence text summary"));
    }

    #[test]
    fn prompt_escapes_skill_quotes() {
        let prompt = build_roadmap_prompt("the \"best\" language", LearningStyle::Text);
        assert!(prompt.contains(r#""topic_name": "the \"best\" language""#));
    }

    #[test]
    fn extracts_text_from_candidate_parts() {
        let body = json!({
            "candidates": [ { "content": { "parts": [ { "text": "{\"topic_" }, { "text": "name\": \"x\"}" } ] } } ]
        });
        assert_eq!(
            extract_candidate_text(&body).as_deref(),
            Some("{\"topic_name\": \"x\"}")
        );
        assert_eq!(extract_candidate_text(&json!({ "candidates": [] })), None);
    }
}
