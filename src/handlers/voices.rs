use axum::response::Json;
use serde::Serialize;

use crate::core::catalog::{STORY_PRESETS, StoryPreset, VOICE_STYLES};

#[derive(Debug, Clone, Serialize)]
pub struct VoiceStyles {
    /// Full voice name, e.g. `en-US-JennyNeural`
    pub voice: &'static str,
    pub styles: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct VoicesResponse {
    pub voices: Vec<VoiceStyles>,
    pub presets: &'static [StoryPreset],
}

/// Handler for `GET /api/voices`
pub async fn list_voices() -> Json<VoicesResponse> {
    Json(VoicesResponse {
        voices: VOICE_STYLES
            .iter()
            .map(|&(voice, styles)| VoiceStyles { voice, styles })
            .collect(),
        presets: STORY_PRESETS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_voices() {
        let Json(response) = list_voices().await;
        assert_eq!(response.voices.len(), 5);
        let jenny = response
            .voices
            .iter()
            .find(|v| v.voice == "en-US-JennyNeural")
            .unwrap();
        assert!(jenny.styles.contains(&"whispering"));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["presets"][0]["name"], "bedtime");
        assert!(json["presets"][0]["style"].is_null());
    }
}
