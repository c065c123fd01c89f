mod common;

use pretty_assertions::assert_eq;
use rusqlite::params;

use common::TestDb;
use grimoire_db::{track, DbError, DomainObject, MapperRegistry, UnitOfWork};
use grimoire_domain::{Ability, AbilityScoreModifier, Entity, Language};

fn language_count(db: &TestDb, name: &str) -> i64 {
    let conn = db.pool.acquire().unwrap();
    conn.query_row(
        "SELECT COUNT(*) FROM language WHERE name = ?1",
        params![name],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn commit_flushes_all_phases_and_reports_counts() {
    let db = TestDb::new();
    let registry = MapperRegistry::standard();

    // Seed one row to update and one to delete.
    let mut setup = UnitOfWork::new();
    let doomed = track(Language::new("Doomed", "Will be removed.", "None", false));
    let kept = track(Language::new("Kept", "Will be renamed.", "None", false));
    setup.register_new(&doomed);
    setup.register_new(&kept);
    let summary = setup.commit(&db.pool, &registry).unwrap();
    assert_eq!(summary.inserted, 2);

    if let DomainObject::Language(language) = &mut *kept.borrow_mut() {
        language.description = "Renamed.".to_string();
    }

    let mut uow = UnitOfWork::new();
    let fresh = track(AbilityScoreModifier::new(Ability::Charisma, 1));
    uow.register_new(&fresh);
    uow.register_dirty(&kept);
    uow.register_deleted(&doomed);
    uow.register_work(|conn| {
        conn.execute(
            "UPDATE language SET exotic = 1 WHERE name = 'Kept'",
            [],
        )?;
        Ok(())
    });

    let summary = uow.commit(&db.pool, &registry).unwrap();
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.work_items, 1);
    assert_eq!(summary.deleted, 1);

    // The id assigned during commit is visible through the handle.
    match &*fresh.borrow() {
        DomainObject::Asm(asm) => assert!(asm.has_id()),
        other => panic!("unexpected variant: {other:?}"),
    }

    assert_eq!(language_count(&db, "Doomed"), 0);
    let conn = db.pool.acquire().unwrap();
    let exotic: bool = conn
        .query_row(
            "SELECT exotic FROM language WHERE name = 'Kept'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!(exotic);
}

#[test]
fn a_failing_insert_rolls_back_the_whole_batch() {
    let db = TestDb::new();
    let registry = MapperRegistry::standard();

    let mut setup = UnitOfWork::new();
    setup.register_new(&track(Language::new("Celestial", "Celestials.", "Celestial", true)));
    setup.commit(&db.pool, &registry).unwrap();

    // Second batch: one valid insert plus a duplicate name.
    let mut uow = UnitOfWork::new();
    uow.register_new(&track(Language::new("Infernal", "Devils.", "Infernal", true)));
    uow.register_new(&track(Language::new("Celestial", "Duplicate.", "Celestial", true)));

    let err = uow.commit(&db.pool, &registry).unwrap_err();
    assert!(matches!(err, DbError::ConstraintViolation { .. }));

    // Nothing from the failed batch landed.
    assert_eq!(language_count(&db, "Infernal"), 0);
    assert_eq!(language_count(&db, "Celestial"), 1);
}

#[test]
fn failing_deferred_work_rolls_back_earlier_phases() {
    let db = TestDb::new();
    let registry = MapperRegistry::standard();

    let mut uow = UnitOfWork::new();
    uow.register_new(&track(Language::new("Undercommon", "The depths.", "Elvish", true)));
    uow.register_work(|_| Err(DbError::IllegalOperation("deliberate failure".into())));

    assert!(uow.commit(&db.pool, &registry).is_err());
    assert_eq!(language_count(&db, "Undercommon"), 0);
}

#[test]
fn registering_the_same_handle_twice_is_a_noop() {
    let db = TestDb::new();
    let registry = MapperRegistry::standard();

    let language = track(Language::new("Goblin", "Goblinoids.", "Dwarvish", false));
    let mut uow = UnitOfWork::new();
    uow.register_new(&language);
    uow.register_new(&language);
    // Already pending insert, so dirty registration changes nothing.
    uow.register_dirty(&language);

    let summary = uow.commit(&db.pool, &registry).unwrap();
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.updated, 0);
    assert_eq!(language_count(&db, "Goblin"), 1);
}

#[test]
fn a_new_object_that_is_deleted_never_touches_the_database() {
    let db = TestDb::new();
    let registry = MapperRegistry::standard();

    let language = track(Language::new("Ephemeral", "Never persisted.", "None", false));
    let mut uow = UnitOfWork::new();
    uow.register_new(&language);
    uow.register_deleted(&language);

    assert!(uow.is_empty());
    let summary = uow.commit(&db.pool, &registry).unwrap();
    assert_eq!(summary.inserted, 0);
    assert_eq!(summary.deleted, 0);
    assert_eq!(language_count(&db, "Ephemeral"), 0);
}

#[test]
fn a_deleted_object_cannot_be_re_registered() {
    let db = TestDb::new();
    let registry = MapperRegistry::standard();

    let mut setup = UnitOfWork::new();
    let language = track(Language::new("Orcish", "Orcs.", "Dwarvish", false));
    setup.register_new(&language);
    setup.commit(&db.pool, &registry).unwrap();

    let mut uow = UnitOfWork::new();
    uow.register_deleted(&language);
    uow.register_dirty(&language);
    uow.register_new(&language);

    let summary = uow.commit(&db.pool, &registry).unwrap();
    assert_eq!(summary.deleted, 1);
    assert_eq!(summary.inserted, 0);
    assert_eq!(summary.updated, 0);
    assert_eq!(language_count(&db, "Orcish"), 0);
}

#[test]
fn commit_without_a_mapper_reports_the_kind() {
    let db = TestDb::new();
    let registry = MapperRegistry::new();

    let mut uow = UnitOfWork::new();
    uow.register_new(&track(Language::new("Unmapped", "No mapper.", "None", false)));

    let err = uow.commit(&db.pool, &registry).unwrap_err();
    assert!(matches!(err, DbError::MapperMissing(_)));
    assert_eq!(language_count(&db, "Unmapped"), 0);
}
