//! Subjectless environment presets.
//!
//! Static catalog of background descriptions. Every entry describes a place,
//! never a subject; the template generator and the provider brief both start
//! from one of these texts unless the caller supplies an override.

/// Preset used when the caller does not pick one.
pub const DEFAULT_PRESET: &str = "Greenscreen Studio";

const PRESETS: &[(&str, &str)] = &[
    // Core
    (
        "Greenscreen Studio",
        "Professional studio greenscreen background only; seamless floor sweep; even key with soft fill (~2:1); \
         controlled spill; neutral exposure; crisp edge separation; uncluttered set.",
    ),
    (
        "Nature – Forest",
        "Open forest clearing; layered foliage depth; plausible ground cover; coherent time-of-day; \
         no trails implying presence; natural materials only.",
    ),
    (
        "Nature – Beach",
        "Coastal shoreline background; sand micro-variation; wet/dry transition; physically plausible waves; \
         clear horizon; consistent sky.",
    ),
    (
        "Indoor – Wohnzimmer",
        "Modern living room interior; ambient/practical lighting; cohesive palette; minimal believable clutter; \
         depth and parallax; no personal portraits.",
    ),
    (
        "Indoor – Küche",
        "Contemporary kitchen interior; directional window light; stainless/wood/ceramic textures; \
         realistic reflections; functional layout.",
    ),
    (
        "School Classroom",
        "Institutional classroom background; desks, board, daylight; realistic scale; no personal photos.",
    ),
    (
        "Office",
        "Modern office environment; soft overhead light; glass/metal materials; screen glow; tidy desks; \
         physically plausible reflections.",
    ),
    (
        "Street Day",
        "Urban street scene background; coherent signage and materials; natural daylight ambience; perspective depth; \
         avoid crowd focus.",
    ),
    (
        "Urban Night",
        "City night ambiance; mixed neon/tungsten practicals; subtle wet surfaces; readable contrast.",
    ),
    (
        "Sci-Fi Lab",
        "Futuristic lab environment; cool rim accents; volumetric hints; advanced materials; diegetic displays.",
    ),
    (
        "Fantasy Forest",
        "Mystical woodland background; soft fog; occasional bioluminescent accents; layered depth.",
    ),
    // Extended
    (
        "Minimalist Room",
        "Minimalist interior with clean lines; neutral palette; soft indirect lighting; sparse decor; \
         no personal artifacts.",
    ),
    (
        "Industrial Loft",
        "Industrial loft interior; exposed brick and ductwork; large windows; concrete/wood surfaces; \
         directional window light.",
    ),
    (
        "Baroque Interior",
        "Baroque-style room; ornate moldings; gilded frames (no portraits of people); rich fabrics; \
         warm candle-like ambience.",
    ),
    (
        "Japanese Zen Garden",
        "Traditional Japanese rock garden; raked gravel; stones; moss accents; minimal vegetation; \
         tranquil natural light.",
    ),
    (
        "High-Tech Corridor",
        "Sleek futuristic corridor; illuminated panels; cool color temperature; reflective materials; \
         subtle fog for depth.",
    ),
    (
        "Medieval Market Street",
        "Old-town medieval market street without vendors; timber-framed facades; cobblestone ground; \
         soft daylight; signs without readable text.",
    ),
    (
        "Neon Arcade",
        "Retro-futuristic arcade hall; neon signage; glossy floor; CRT cabinets (generic, no brands); \
         moody colored lighting.",
    ),
    (
        "Desert Canyon",
        "Arid desert canyon; stratified rock formations; sand and dust; harsh sunlight with deep shadows; \
         clear sky.",
    ),
    (
        "Snowy Mountain Pass",
        "High-altitude snowy pass; wind-carved drifts; overcast, cold color cast; crisp air clarity.",
    ),
    (
        "Rainy Alley",
        "Narrow city alley in rain; wet reflective pavement; gutter runoff; cool ambient light with warm window leaks.",
    ),
    (
        "Futuristic Hangar",
        "Large futuristic hangar bay; massive doors; structural ribs; accent lighting; atmospheric haze.",
    ),
    (
        "Brutalist Lobby",
        "Brutalist lobby with raw concrete; sharp geometric lines; skylight shafts; controlled contrast.",
    ),
    (
        "Art Gallery White Cube",
        "Contemporary white-cube gallery; neutral walls; clean floor; calibrated gallery lighting; \
         empty plinths/frames without readable text.",
    ),
    (
        "Coastal Cliff Overlook",
        "Rocky coastal cliff overlook; ocean horizon; wind-swept vegetation; bright daylight.",
    ),
    (
        "Tropical Greenhouse",
        "Glasshouse interior; humid air; dense tropical foliage; diffused skylight; water condensation.",
    ),
    (
        "Abandoned Warehouse",
        "Large derelict warehouse; broken windows (safe representation); dust motes; uneven light patches.",
    ),
    (
        "Subway Platform",
        "Subway platform environment; tiled walls; safety lines; fluorescent lighting; station signs without readable text.",
    ),
    (
        "Library Reading Room",
        "Spacious library reading room; wooden tables and shelves; warm lamps; hushed ambience.",
    ),
    (
        "Rooftop Terrace",
        "Urban rooftop terrace; parapet walls; city skyline; evening ambience; subtle string lights.",
    ),
];

/// Look up a preset text by its exact name.
pub fn lookup(name: &str) -> Option<&'static str> {
    PRESETS
        .iter()
        .find(|(preset, _)| *preset == name)
        .map(|(_, text)| *text)
}

/// All preset names in catalog order.
pub fn names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preset_exists() {
        assert!(lookup(DEFAULT_PRESET).is_some());
    }

    #[test]
    fn unknown_preset_is_none() {
        assert!(lookup("Moon Base").is_none());
    }

    #[test]
    fn names_are_unique() {
        let mut all: Vec<&str> = names().collect();
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total);
        assert_eq!(total, 30);
    }

    #[test]
    fn preset_texts_end_with_period() {
        for name in names() {
            let text = lookup(name).unwrap();
            assert!(text.ends_with('.'), "{name} should end with a period");
        }
    }
}
