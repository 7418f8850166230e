//! Parsers for string -> component enums for data-driven configs.

use crate::components::{CombatStyle, RespawnAnchor};

/// Case-insensitive combat style parser.
pub fn parse_combat_style(s: &str) -> Option<CombatStyle> {
    Some(match s.to_ascii_lowercase().as_str() {
        "accurate" => CombatStyle::Accurate,
        "aggressive" => CombatStyle::Aggressive,
        "defensive" => CombatStyle::Defensive,
        "controlled" => CombatStyle::Controlled,
        _ => return None,
    })
}

/// Case-insensitive respawn anchor parser with common aliases.
pub fn parse_respawn_anchor(s: &str) -> Option<RespawnAnchor> {
    Some(match s.to_ascii_lowercase().as_str() {
        // canonical
        "death" => RespawnAnchor::Death,
        "hide" => RespawnAnchor::Hide,
        // aliases
        "death_time" => RespawnAnchor::Death,
        "corpse_hide" => RespawnAnchor::Hide,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_parses() {
        assert!(parse_combat_style("aggressive").is_some());
        assert!(parse_combat_style("AcCuRaTe").is_some());
        assert!(parse_combat_style("rapid").is_none());
    }

    #[test]
    fn anchor_parses_with_alias() {
        assert_eq!(parse_respawn_anchor("death"), Some(RespawnAnchor::Death));
        assert_eq!(parse_respawn_anchor("corpse_hide"), Some(RespawnAnchor::Hide));
        assert!(parse_respawn_anchor("spawn").is_none());
    }
}
