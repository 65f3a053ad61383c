//! Model tier selection for the live call.
//!
//! Resolution order:
//! 1. Explicit model override (any non-blank value)
//! 2. Cost mode: premium keeps the selected model, cheap forces the nano tier
//! 3. Auto: vision-capable model when an image is attached, mini otherwise

use super::types::CostMode;

// ──────────────────────────────────────────────
// Tiers
// ──────────────────────────────────────────────

/// Lowest-cost model, used by `CostMode::Cheap`.
pub const CHEAP_MODEL: &str = "gpt-5-nano";

/// Text-only default for `CostMode::Auto`.
pub const AUTO_TEXT_MODEL: &str = "gpt-5-mini";

/// Vision-capable default for `CostMode::Auto`.
pub const AUTO_VISION_MODEL: &str = "gpt-4o";

// ──────────────────────────────────────────────
// Resolution
// ──────────────────────────────────────────────

/// Pick the model for one invocation.
pub fn select_model(
    selected: &str,
    override_model: &str,
    cost_mode: CostMode,
    has_image: bool,
) -> String {
    let override_model = override_model.trim();
    if !override_model.is_empty() {
        tracing::debug!(model = override_model, "Using model override");
        return override_model.to_string();
    }

    match cost_mode {
        CostMode::Premium => {
            tracing::debug!(model = selected, "cost_mode=premium, using selected model");
            selected.to_string()
        }
        CostMode::Cheap => {
            tracing::debug!(model = CHEAP_MODEL, "cost_mode=cheap");
            CHEAP_MODEL.to_string()
        }
        CostMode::Auto => {
            let chosen = if has_image {
                AUTO_VISION_MODEL
            } else {
                AUTO_TEXT_MODEL
            };
            tracing::debug!(model = chosen, has_image, "cost_mode=auto");
            chosen.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_beats_every_cost_mode() {
        for mode in [CostMode::Auto, CostMode::Cheap, CostMode::Premium] {
            assert_eq!(select_model("gpt-4o", "  my-finetune  ", mode, true), "my-finetune");
        }
    }

    #[test]
    fn blank_override_is_ignored() {
        assert_eq!(select_model("gpt-4o", "   ", CostMode::Cheap, false), CHEAP_MODEL);
    }

    #[test]
    fn premium_keeps_selected() {
        assert_eq!(select_model("gpt-4.1", "", CostMode::Premium, false), "gpt-4.1");
        assert_eq!(select_model("gpt-4.1", "", CostMode::Premium, true), "gpt-4.1");
    }

    #[test]
    fn cheap_ignores_image() {
        assert_eq!(select_model("gpt-4o", "", CostMode::Cheap, true), "gpt-5-nano");
    }

    #[test]
    fn auto_depends_on_image() {
        assert_eq!(select_model("gpt-4.1", "", CostMode::Auto, true), "gpt-4o");
        assert_eq!(select_model("gpt-4.1", "", CostMode::Auto, false), "gpt-5-mini");
    }
}
