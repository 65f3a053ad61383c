//! Messages sent to the provider on a live call.

use super::openai_types::InputContent;
use super::types::Language;

/// System message for every live call.
pub fn build_system_message(language: Language) -> String {
    format!(
        "You are an Image Prompt Generator for generative image models.\n\
         STRICT SUBJECTLESS MODE:\n\
         - Do NOT introduce people, humans, characters, silhouettes, faces, hands, animals, creatures, or any living beings.\n\
         - Focus ONLY on environment/background, lighting, composition, camera, color, mood, textures, materials.\n\
         - Use any provided image strictly as environmental context; never infer or add subjects.\n\
         - Respond in language: {language}.\n\
         Output must be a SINGLE plain text prompt (no code block, no preface)."
    )
}

/// User content: the task brief, then the image when one is attached.
pub fn build_user_content(
    preset_text: &str,
    style_addon: &str,
    props: &str,
    tone: &str,
    detail: u8,
    image_data_url: Option<&str>,
) -> Vec<InputContent> {
    let brief = format!(
        "TASK: Produce a polished, subjectless style/background prompt suitable for image generation. \
         No subjects, no portraits, no silhouettes; environment only.\n\
         TONE: {tone}\nDETAIL_LEVEL: {detail}\n\n\
         PRESET:\n{preset_text}\n\n\
         STYLE_ADDON:\n{style}\n\n\
         PROPS (environmental objects only; optional):\n{props}\n\n\
         Constraints:\n\
         - Do not mention or imply people/animals/characters.\n\
         - Avoid brand names/logos/readable text.\n\
         - Keep it concise but expressive; 1–2 sentences are fine.\n\
         Return only the final prompt line.",
        style = style_addon.trim(),
        props = props.trim(),
    );

    let mut content = vec![InputContent::text(brief)];
    if let Some(url) = image_data_url.filter(|u| !u.is_empty()) {
        content.push(InputContent::image(url));
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_message_names_language() {
        assert!(build_system_message(Language::En).contains("Respond in language: en."));
        assert!(build_system_message(Language::De).contains("Respond in language: de."));
        assert!(build_system_message(Language::De).contains("STRICT SUBJECTLESS MODE"));
    }

    #[test]
    fn brief_carries_all_inputs() {
        let content = build_user_content("Rooftop at dusk", " warm haze ", "vents", "cinematic", 4, None);
        assert_eq!(content.len(), 1);
        let InputContent::InputText { text } = &content[0] else {
            panic!("expected text item");
        };
        assert!(text.contains("TONE: cinematic\nDETAIL_LEVEL: 4"));
        assert!(text.contains("PRESET:\nRooftop at dusk"));
        assert!(text.contains("STYLE_ADDON:\nwarm haze\n"));
        assert!(text.contains("vents"));
        assert!(text.ends_with("Return only the final prompt line."));
    }

    #[test]
    fn image_is_appended_last() {
        let content = build_user_content("x", "", "", "neutral", 3, Some("data:image/png;base64,QQ=="));
        assert_eq!(content.len(), 2);
        assert_eq!(content[1], InputContent::image("data:image/png;base64,QQ=="));
    }
}
