//! Canned interaction templates.
//!
//! Parameterized message pairs for common multi-step behaviors. Free-text
//! parameters are sanitized before interpolation because prompt text flows
//! straight into an agent conversation.

use serde::Serialize;

const NAME_MAX_LEN: usize = 50;
const NAME_FALLBACK: &str = "friend";

/// One listable prompt template.
#[derive(Debug, Clone, Serialize)]
pub struct Prompt {
    pub name: String,
    pub description: String,
    pub arguments: Vec<PromptArgument>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// One rendered message of a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: String,
}

fn user(content: String) -> PromptMessage {
    PromptMessage {
        role: "user".to_string(),
        content,
    }
}

/// Strip everything outside `[A-Za-z0-9 ]`, collapse runs of whitespace,
/// and cap the length. Empty results fall back to a fixed placeholder.
pub fn sanitize_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let capped: String = collapsed.chars().take(NAME_MAX_LEN).collect();
    let trimmed = capped.trim();
    if trimmed.is_empty() {
        NAME_FALLBACK.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn list_prompts() -> Vec<Prompt> {
    vec![
        Prompt {
            name: "greet_person".into(),
            description: "Wake up and greet someone by name".into(),
            arguments: vec![PromptArgument {
                name: "name".into(),
                description: "Name of the person to greet".into(),
                required: false,
            }],
        },
        Prompt {
            name: "explore_surroundings".into(),
            description: "Scan the area and describe what is visible".into(),
            arguments: vec![],
        },
        Prompt {
            name: "react_to_conversation".into(),
            description: "React expressively to the mood of a conversation".into(),
            arguments: vec![PromptArgument {
                name: "mood".into(),
                description: "Conversation mood, e.g. happy, sad, surprising".into(),
                required: false,
            }],
        },
        Prompt {
            name: "find_person".into(),
            description: "Look around for a person and track their face".into(),
            arguments: vec![],
        },
    ]
}

/// Render a prompt by name. `None` for unknown prompt names.
pub fn get_prompt(name: &str, args: &serde_json::Value) -> Option<Vec<PromptMessage>> {
    let str_arg = |key: &str| args.get(key).and_then(|v| v.as_str()).unwrap_or("");
    let messages = match name {
        "greet_person" => {
            let person = sanitize_name(str_arg("name"));
            vec![user(format!(
                "Wake Reachy up with wake_up, then greet {person}: express the happy emotion \
                 (😊), speak a short friendly greeting to {person} with speak_text, and nod once."
            ))]
        }
        "explore_surroundings" => vec![user(
            "Use scan_surroundings to sweep the area, then describe what you can see in each \
             captured image. If a person is visible, use track_face to face them."
                .to_string(),
        )],
        "react_to_conversation" => {
            let mood = sanitize_name(str_arg("mood"));
            vec![user(format!(
                "React to a conversation whose mood is '{mood}'. Pick the closest supported \
                 emotion from the reachy://emotions resource, express it with express_emotion, \
                 and accompany it with a matching nod or shake_head gesture."
            ))]
        }
        "find_person" => vec![user(
            "Find a person: first try track_face. If no face is detected, use \
             scan_surroundings and inspect the captures for a person, then turn toward them \
             with move_head and confirm with track_face."
                .to_string(),
        )],
        _ => return None,
    };
    Some(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_listed_prompt_renders() {
        for prompt in list_prompts() {
            let messages = get_prompt(&prompt.name, &json!({})).unwrap();
            assert!(!messages.is_empty(), "{}", prompt.name);
            assert!(messages.iter().all(|m| m.role == "user"));
        }
    }

    #[test]
    fn unknown_prompt_is_none() {
        assert!(get_prompt("nope", &json!({})).is_none());
    }

    #[test]
    fn sanitize_strips_non_alphanumerics() {
        assert_eq!(sanitize_name("Ada <script>alert(1)</script>"), "Ada scriptalert1script");
        assert_eq!(sanitize_name("Bob; DROP TABLE users"), "Bob DROP TABLE users");
    }

    #[test]
    fn sanitize_collapses_whitespace() {
        assert_eq!(sanitize_name("  Ana   Maria  "), "Ana Maria");
    }

    #[test]
    fn sanitize_caps_length() {
        let long = "a".repeat(200);
        assert_eq!(sanitize_name(&long).len(), 50);
    }

    #[test]
    fn sanitize_falls_back_for_empty_input() {
        assert_eq!(sanitize_name(""), "friend");
        assert_eq!(sanitize_name("!!!@@@"), "friend");
        assert_eq!(sanitize_name("   "), "friend");
    }

    #[test]
    fn greet_person_uses_sanitized_name() {
        let messages = get_prompt("greet_person", &json!({"name": "Zoé!!"})).unwrap();
        assert!(messages[0].content.contains("greet Zo"));
        assert!(!messages[0].content.contains('!'));
    }
}
