mod common;

use pretty_assertions::assert_eq;

use common::TestDb;
use grimoire_db::{AsmMapper, LanguageMapper, Mapper, SupplyMapper};
use grimoire_domain::{
    Ability, AbilityScoreModifier, Entity, EntityKind, Language, ModifierSupplier,
};

/// Test-only supplier over arbitrary collections, the shape a race or
/// background entity would have.
#[derive(Default)]
struct StubSupplier {
    asms: Vec<AbilityScoreModifier>,
    languages: Vec<Language>,
}

impl ModifierSupplier for StubSupplier {
    fn ability_score_modifiers(&self) -> &[AbilityScoreModifier] {
        &self.asms
    }

    fn languages(&self) -> &[Language] {
        &self.languages
    }
}

#[test]
fn resolving_the_same_source_twice_yields_one_id() {
    let db = TestDb::new();
    let conn = db.pool.acquire().unwrap();
    let supply = SupplyMapper::new();

    let first = supply
        .resolve_source_id(EntityKind::Feat, 42, &conn)
        .unwrap();
    let second = supply
        .resolve_source_id(EntityKind::Feat, 42, &conn)
        .unwrap();
    assert_eq!(first, second);

    // A different ref id is a different source.
    let other = supply
        .resolve_source_id(EntityKind::Feat, 43, &conn)
        .unwrap();
    assert_ne!(first, other);
}

#[test]
fn replace_is_wholesale_and_idempotent() {
    let db = TestDb::new();
    let conn = db.pool.acquire().unwrap();
    let supply = SupplyMapper::new();
    let asm_mapper = AsmMapper::new();
    let language_mapper = LanguageMapper::new();

    let mut supplier = StubSupplier::default();
    let mut asm = AbilityScoreModifier::new(Ability::Wisdom, 2);
    asm_mapper.insert(&mut asm, &conn).unwrap();
    supplier.asms.push(asm);
    let mut language = Language::new("Sylvan", "The fey.", "Elvish", true);
    language_mapper.insert(&mut language, &conn).unwrap();
    supplier.languages.push(language);

    supply
        .replace_all_for_source(EntityKind::Language, 7, &supplier, &conn)
        .unwrap();
    supply
        .replace_all_for_source(EntityKind::Language, 7, &supplier, &conn)
        .unwrap();

    let asm_ids = supply
        .find_asm_ids(EntityKind::Language, 7, &conn)
        .unwrap();
    assert_eq!(asm_ids, vec![supplier.asms[0].id().unwrap()]);
    let language_ids = supply
        .find_language_ids(EntityKind::Language, 7, &conn)
        .unwrap();
    assert_eq!(language_ids, vec![supplier.languages[0].id().unwrap()]);

    // Shrinking the supplied set shrinks the bridge.
    supplier.asms.clear();
    supply
        .replace_all_for_source(EntityKind::Language, 7, &supplier, &conn)
        .unwrap();
    assert!(supply
        .find_asm_ids(EntityKind::Language, 7, &conn)
        .unwrap()
        .is_empty());
}

#[test]
fn bridging_an_unsaved_modifier_is_rejected() {
    let db = TestDb::new();
    let conn = db.pool.acquire().unwrap();
    let supply = SupplyMapper::new();

    let supplier = StubSupplier {
        asms: vec![AbilityScoreModifier::new(Ability::Strength, 1)],
        languages: Vec::new(),
    };
    assert!(supply
        .replace_all_for_source(EntityKind::Feat, 1, &supplier, &conn)
        .is_err());
}

#[test]
fn deleting_an_absent_source_reports_failure_without_error() {
    let db = TestDb::new();
    let conn = db.pool.acquire().unwrap();
    let supply = SupplyMapper::new();

    let removed = supply
        .delete_all_for_source(EntityKind::Feat, 999, &conn)
        .unwrap();
    assert!(!removed);
}

#[test]
fn deleting_a_source_removes_its_bridge_rows() {
    let db = TestDb::new();
    let conn = db.pool.acquire().unwrap();
    let supply = SupplyMapper::new();
    let asm_mapper = AsmMapper::new();

    let mut supplier = StubSupplier::default();
    let mut asm = AbilityScoreModifier::new(Ability::Intelligence, 1);
    asm_mapper.insert(&mut asm, &conn).unwrap();
    let asm_id = asm.id().unwrap();
    supplier.asms.push(asm);

    supply
        .replace_all_for_source(EntityKind::Feat, 5, &supplier, &conn)
        .unwrap();
    assert!(supply
        .delete_all_for_source(EntityKind::Feat, 5, &conn)
        .unwrap());

    assert!(supply.find_asm_ids(EntityKind::Feat, 5, &conn).unwrap().is_empty());
    // The modifier itself is untouched; only the bridge went away.
    assert!(asm_mapper
        .find_by_id(asm_id.value(), &conn)
        .unwrap()
        .is_some());
}

#[test]
fn reading_an_unknown_source_yields_no_supplies() {
    let db = TestDb::new();
    let conn = db.pool.acquire().unwrap();
    let supply = SupplyMapper::new();

    // The read resolves (and so creates) the source, but the bridge
    // stays empty.
    assert!(supply
        .find_feat_ids(EntityKind::Language, 11, &conn)
        .unwrap()
        .is_empty());
    let sources: i64 = conn
        .query_row("SELECT COUNT(*) FROM modifier_source", [], |row| row.get(0))
        .unwrap();
    assert_eq!(sources, 1);
}
