//! Read-only metadata resources.
//!
//! Small JSON documents an agent can read before calling tools: the emotion
//! table, built-in sound names, physical limits, and a capability summary.
//! All content is fixed at compile time.

use crate::motion::Emotion;
use crate::robot::types::ANTENNA_LIMIT_RAD;
use serde::Serialize;
use serde_json::json;

/// Built-in sound names accepted by `play_sound`.
pub const BUILTIN_SOUNDS: [&str; 6] = [
    "confused1",
    "dance1",
    "happy1",
    "sad1",
    "surprised1",
    "wake_up",
];

/// One listable resource.
#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

fn resource(uri: &str, name: &str, description: &str) -> Resource {
    Resource {
        uri: uri.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        mime_type: "application/json".to_string(),
    }
}

pub fn list_resources() -> Vec<Resource> {
    vec![
        resource(
            "reachy://emotions",
            "Supported emotions",
            "Emoji-to-emotion table accepted by express_emotion",
        ),
        resource(
            "reachy://sounds",
            "Built-in sounds",
            "Sound names accepted by play_sound",
        ),
        resource(
            "reachy://limits",
            "Physical limits",
            "Actuator ranges and parameter clamps",
        ),
        resource(
            "reachy://capabilities",
            "Capabilities",
            "Tool names grouped by capability category",
        ),
    ]
}

/// Resolve a resource URI to its JSON content. `None` for unknown URIs.
pub fn read_resource(uri: &str) -> Option<String> {
    let content = match uri {
        "reachy://emotions" => json!({
            "emotions": Emotion::ALL
                .iter()
                .map(|e| {
                    json!({
                        "emoji": e.emoji(),
                        "name": e.name(),
                        "has_sound": e.sound().is_some(),
                    })
                })
                .collect::<Vec<_>>()
        }),
        "reachy://sounds" => json!({ "sounds": BUILTIN_SOUNDS }),
        "reachy://limits" => json!({
            "antennas": {
                "unit": "radians",
                "range": [-ANTENNA_LIMIT_RAD, ANTENNA_LIMIT_RAD],
            },
            "head": {
                "position_unit": "millimeters",
                "rotation_unit": "degrees",
                "note": "pose axes are not clamped by this server; the motion system enforces physical limits",
            },
            "duration": { "unit": "seconds", "minimum_exclusive": 0.0 },
            "gestures": { "cycles": [1, 5], "speed": [0.1, 1.0] },
            "scan": { "steps": [2, 9], "yaw_range_degrees": [30.0, 180.0], "quality": [1, 100] },
        }),
        "reachy://capabilities" => json!({
            "movement": ["move_head", "move_antennas", "look_at_point", "reset_position", "nod", "shake_head"],
            "expression": ["express_emotion", "do_barrel_roll"],
            "audio": ["play_sound", "speak_text", "detect_sound_direction"],
            "vision": ["capture_image", "scan_surroundings", "track_face"],
            "lifecycle": ["wake_up", "go_to_sleep"],
        }),
        _ => return None,
    };
    Some(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_resource_is_readable() {
        for res in list_resources() {
            let content = read_resource(&res.uri).unwrap_or_else(|| panic!("{}", res.uri));
            let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
            assert!(parsed.is_object(), "{}", res.uri);
        }
    }

    #[test]
    fn unknown_uri_is_none() {
        assert!(read_resource("reachy://nope").is_none());
    }

    #[test]
    fn emotions_resource_covers_all_variants() {
        let content = read_resource("reachy://emotions").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["emotions"].as_array().unwrap().len(), 10);
        assert!(content.contains("celebrate"));
        assert!(content.contains("🎉"));
    }

    #[test]
    fn capabilities_name_every_registered_tool() {
        let content = read_resource("reachy://capabilities").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        let count: usize = parsed
            .as_object()
            .unwrap()
            .values()
            .map(|v| v.as_array().unwrap().len())
            .sum();
        assert_eq!(count, 16);
    }

    #[test]
    fn limits_match_the_antenna_clamp() {
        let content = read_resource("reachy://limits").unwrap();
        assert!(content.contains("3.14"));
    }
}
