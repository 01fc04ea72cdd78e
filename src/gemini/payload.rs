//! Request bodies and response parsing for `models/{model}:generateContent`.
use serde_json::{json, Value};

use crate::encoder::EncodedImage;
use crate::error::{AppError, AppResult};

/// One user turn holding the source image followed by the instruction text.
pub fn build_request(image: &EncodedImage, instruction: &str) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [
                {
                    "inlineData": {
                        "mimeType": image.mime_type,
                        "data": image.data,
                    }
                },
                { "text": instruction },
            ]
        }],
        "generationConfig": {
            "responseModalities": ["TEXT", "IMAGE"],
        }
    })
}

/// Pull the first inline image out of a response.
pub fn extract_image(response: &Value) -> AppResult<EncodedImage> {
    let candidates = response
        .get("candidates")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for candidate in candidates {
        let parts = candidate
            .get("content")
            .and_then(|c| c.get("parts"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for part in parts {
            let Some(inline) = part.get("inlineData").or_else(|| part.get("inline_data")) else {
                continue;
            };
            let data = inline.get("data").and_then(Value::as_str).unwrap_or_default();
            if data.is_empty() {
                continue;
            }
            let mime_type = inline
                .get("mimeType")
                .or_else(|| inline.get("mime_type"))
                .and_then(Value::as_str)
                .unwrap_or("image/png");
            return Ok(EncodedImage { mime_type: mime_type.to_string(), data: data.to_string() });
        }
    }

    Err(AppError::Service(no_image_reason(response)))
}

fn no_image_reason(response: &Value) -> String {
    if let Some(block) = response
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(Value::as_str)
    {
        return format!("No image returned (prompt blocked: {})", block);
    }
    let finish = response
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|c| c.first())
        .and_then(|c| c.get("finishReason"))
        .and_then(Value::as_str);
    let text = collect_text(response);
    match (finish, text.is_empty()) {
        (Some(reason), true) => format!("No image returned (finish reason: {})", reason),
        (Some(reason), false) => format!("No image returned (finish reason: {}): {}", reason, text),
        (None, false) => format!("No image returned: {}", text),
        (None, true) => "No image returned".to_string(),
    }
}

fn collect_text(response: &Value) -> String {
    let mut texts = Vec::new();
    if let Some(candidates) = response.get("candidates").and_then(Value::as_array) {
        for candidate in candidates {
            if let Some(parts) = candidate.get("content").and_then(|c| c.get("parts")).and_then(Value::as_array) {
                texts.extend(parts.iter().filter_map(|p| p.get("text").and_then(Value::as_str)));
            }
        }
    }
    texts.join(" ").trim().to_string()
}
