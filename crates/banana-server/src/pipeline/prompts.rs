//! Instruction text sent to the model.

use std::fmt::Write;

/// Instruction for the text model, sent with a single image.
pub const DESCRIBE_INSTRUCTION: &str = "Describe this image in at most 20 words. \
    Cover the main subject, its colors, the lighting and the visual style. \
    Reply with the description only.";

/// Stands in for the user intent when the request carries none.
pub const NO_INTENT_PLACEHOLDER: &str = "(none)";

const COMPOSE_RULES: [&str; 4] = [
    "Keep the canvas size and every pixel outside the blend regions exactly as they are in the base image.",
    "Do not move, resize or crop the base image or any object.",
    "Only blend edges, lighting and shadows where the objects meet the base.",
    "If anything conflicts, prefer integrating the new content cleanly.",
];

/// Builds the instruction for one blend step.
///
/// The first attached image is the current base; the objects follow in
/// order and are labelled from 1 within the step.
pub fn compose_instruction(
    base_description: &str,
    object_descriptions: &[String],
    user_intent: Option<&str>,
) -> String {
    let mut instruction = String::from(
        "Blend the objects into the base image so the result reads as one photograph. \
         The first attached image is the base; the remaining images are the objects in order.\n\n",
    );

    let _ = writeln!(instruction, "Base image: {base_description}");
    for (index, description) in object_descriptions.iter().enumerate() {
        let _ = writeln!(instruction, "Object {}: {description}", index + 1);
    }

    let intent = user_intent
        .map(str::trim)
        .filter(|intent| !intent.is_empty())
        .unwrap_or(NO_INTENT_PLACEHOLDER);
    let _ = writeln!(instruction, "User intent: {intent}");

    instruction.push_str("\nRules:\n");
    for (index, rule) in COMPOSE_RULES.iter().enumerate() {
        let _ = writeln!(instruction, "{}. {rule}", index + 1);
    }

    instruction.push_str("\nReturn only the blended image.");
    instruction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objects_are_labelled_from_one() {
        let instruction = compose_instruction(
            "a wooden table",
            &["a red apple".to_owned(), "a glass of water".to_owned()],
            Some("warmer lighting"),
        );

        assert!(instruction.contains("Base image: a wooden table"));
        assert!(instruction.contains("Object 1: a red apple"));
        assert!(instruction.contains("Object 2: a glass of water"));
        assert!(!instruction.contains("Object 3"));
        assert!(instruction.contains("User intent: warmer lighting"));
    }

    #[test]
    fn missing_intent_uses_placeholder() {
        let instruction = compose_instruction("base", &["object".to_owned()], None);
        assert!(instruction.contains("User intent: (none)"));

        let instruction = compose_instruction("base", &["object".to_owned()], Some("  "));
        assert!(instruction.contains("User intent: (none)"));
    }

    #[test]
    fn all_rules_are_present() {
        let instruction = compose_instruction("", &[], None);
        for rule in COMPOSE_RULES {
            assert!(instruction.contains(rule));
        }
        assert!(instruction.contains("4. "));
    }

    #[test]
    fn describe_instruction_asks_for_twenty_words() {
        assert!(DESCRIBE_INSTRUCTION.contains("20 words"));
    }
}
