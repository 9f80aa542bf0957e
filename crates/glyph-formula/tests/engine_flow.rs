//! End-to-end flow: sheet entities, reference resolution, roll
//! normalization, and damage analysis working together.

use glyph_core::{Ability, Character, EntityId, Folio, Rated, Skill, Value};
use glyph_formula::{
    DamageFinding, DamageFormula, ResolveScope, normalize_roll_formula, simulate_seeded,
    SimulationParameters,
};

fn build_folio() -> Folio {
    let mut character = Character::new("Ansgar");
    character.add_attribute(Rated::new("Will", 4));
    character.add_attribute(Rated::new("Forte", 3).with_modified_level(5));
    let mut swordplay = Skill::new("Swordplay", 4);
    swordplay.add_ability(Ability::new("Riposte", 2));
    character.add_skill(swordplay);
    character.add_skill(Skill::new("Shadow", 3));
    character.add_asset(Rated::new("Shadow", 1));
    let mut folio = Folio::new();
    folio.add_character(character);
    folio
}

#[test]
fn shared_names_resolve_by_collection_priority() {
    let folio = build_folio();
    let character = folio.find_by_name("Ansgar").unwrap();
    let scope = ResolveScope::new(character, &folio);
    let map = scope.resolve_references("test @shadow against Ob 2");
    match map.get("@shadow").unwrap() {
        Some(Value::Entity(entity)) => assert_eq!(entity.level, Some(3)),
        other => panic!("expected the skill, got {other:?}"),
    }
}

#[test]
fn ability_context_reaches_character_scope() {
    let folio = build_folio();
    let character = folio.find_by_name("Ansgar").unwrap();
    let ability = &character.skills[0].abilities[0];
    let scope = ResolveScope::new(ability, &folio);
    // The ability resolves a sibling attribute of its grandparent.
    let map = scope.resolve_references("@will");
    match map.get("@will").unwrap() {
        Some(Value::Entity(entity)) => assert_eq!(entity.level, Some(4)),
        other => panic!("expected the attribute, got {other:?}"),
    }
}

#[test]
fn damage_pipeline_from_raw_text() {
    let folio = build_folio();
    let character = folio.find_by_name("Ansgar").unwrap();
    let scope = ResolveScope::new(character, &folio);
    let finding = DamageFinding::new("Longsword", EntityId::new())
        .with_scope(scope)
        .with_formula(DamageFormula::new("2d6 + @Forte", "cut"))
        .with_formula(DamageFormula::new("@riposte", "cut"));
    assert_eq!(finding.full_formula(), "2d6 + @Forte + @riposte");
    assert_eq!(finding.resolved_formula(), "2d6 + 5 + 2");
    assert_eq!(finding.min_damage(), 9.0);
    assert_eq!(finding.mean_damage(), 13.0);
    assert_eq!(finding.max_damage(), 19.0);
}

#[test]
fn roll_formula_normalization_is_graph_free() {
    // The stand-in zero merges with the following spaced term, exactly
    // as it would after a real reference strip.
    assert_eq!(normalize_roll_formula("@Swordplay D + 2 D"), "0D6 + 2D6");
}

#[test]
fn probability_table_feeds_from_plain_parameters() {
    let params = SimulationParameters {
        die_faces: 6,
        success_threshold: 4,
        dice_limit: 3,
        obstacle_limit: 3,
        sample_size: 4_000,
        modifier: 0,
    };
    let table = simulate_seeded(&params, 99).unwrap();
    // Three dice at one-half each: meeting Ob 1 should be common,
    // Ob 3 rare.
    assert!(table.percent(3, 1).unwrap() > 70);
    assert!(table.percent(3, 3).unwrap() < 25);
}
