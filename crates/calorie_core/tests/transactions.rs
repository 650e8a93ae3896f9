use calorie_core::db::open_db_in_memory;
use calorie_core::{
    with_transaction, ActivityRecordQuery, ActivityRepository, MealRecordQuery, MealRepository,
    NewActivity, NewActivityRecord, NewMeal, NewMealRecord, NewPerson, PersonRepository,
    RecordRepository, RepoError, SqliteActivityRepository, SqliteMealRepository,
    SqlitePersonRepository, SqliteRecordRepository,
};
use chrono::NaiveDate;

#[test]
fn unit_with_duplicate_rolls_back_entirely() {
    let mut conn = open_db_in_memory().unwrap();

    let err = with_transaction(&mut conn, |unit| {
        let persons = SqlitePersonRepository::try_new(unit)?;
        persons.create_person(&NewPerson::new("414"))?;
        persons.create_person(&NewPerson::new("414"))?;
        Ok(())
    })
    .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate { .. }));

    let persons = SqlitePersonRepository::try_new(&conn).unwrap();
    assert!(persons.list_persons().unwrap().is_empty());
}

#[test]
fn session_accepts_writes_after_a_failed_unit() {
    let mut conn = open_db_in_memory().unwrap();

    let failed = with_transaction(&mut conn, |unit| {
        SqliteActivityRepository::try_new(unit)?.create_activity(&NewActivity {
            name: None,
            ..NewActivity::new("123", "Running", 600)
        })
    });
    assert!(matches!(failed, Err(RepoError::MissingField { .. })));

    let created = with_transaction(&mut conn, |unit| {
        SqliteActivityRepository::try_new(unit)?.create_activity(&NewActivity::new(
            "123", "Running", 600,
        ))
    })
    .unwrap();
    assert_eq!(created.name, "Running");
}

#[test]
fn unit_commits_parents_and_records_together() {
    let mut conn = open_db_in_memory().unwrap();
    let at = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    with_transaction(&mut conn, |unit| {
        SqlitePersonRepository::try_new(unit)?.create_person(&NewPerson::new("4566"))?;
        SqliteMealRepository::try_new(unit)?.create_meal(&NewMeal::new("1234", "Fish Soup", 2.5))?;
        SqliteActivityRepository::try_new(unit)?
            .create_activity(&NewActivity::new("run", "Running", 600))?;
        let records = SqliteRecordRepository::try_new(unit)?;
        records.create_meal_record(&NewMealRecord::new("4566", "1234", at, 1.0))?;
        records.create_activity_record(&NewActivityRecord::new("4566", "run", at, 3600))?;
        Ok(())
    })
    .unwrap();

    let records = SqliteRecordRepository::try_new(&conn).unwrap();
    let meal_records = records
        .list_meal_records(&MealRecordQuery::default())
        .unwrap();
    assert_eq!(meal_records.len(), 1);
    assert_eq!(meal_records[0].meal_id, "1234");
    assert_eq!(
        records
            .list_activity_records(&ActivityRecordQuery::default())
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn dangling_record_rolls_back_its_parents() {
    let mut conn = open_db_in_memory().unwrap();
    let at = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    let err = with_transaction(&mut conn, |unit| {
        SqlitePersonRepository::try_new(unit)?.create_person(&NewPerson::new("p1"))?;
        SqliteRecordRepository::try_new(unit)?
            .create_meal_record(&NewMealRecord::new("p1", "missing", at, 1.0))?;
        Ok(())
    })
    .unwrap_err();
    assert!(matches!(err, RepoError::DanglingReference));

    let persons = SqlitePersonRepository::try_new(&conn).unwrap();
    assert!(persons.get_person("p1").unwrap().is_none());
    assert!(SqliteMealRepository::try_new(&conn)
        .unwrap()
        .list_meals()
        .unwrap()
        .is_empty());
}

#[test]
fn swallowed_violation_still_rolls_the_unit_back() {
    let mut conn = open_db_in_memory().unwrap();
    let at = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    let err = with_transaction(&mut conn, |unit| {
        let persons = SqlitePersonRepository::try_new(unit)?;
        persons.create_person(&NewPerson::new("p1"))?;
        let dangling = SqliteRecordRepository::try_new(unit)?
            .create_meal_record(&NewMealRecord::new("p1", "ghost", at, 1.0));
        assert!(dangling.is_err());
        assert!(unit.is_poisoned());
        persons.create_person(&NewPerson::new("p2"))?;
        Ok(())
    })
    .unwrap_err();
    assert!(matches!(err, RepoError::DanglingReference));

    let persons = SqlitePersonRepository::try_new(&conn).unwrap();
    assert!(persons.list_persons().unwrap().is_empty());
}

#[test]
fn first_violation_wins_over_later_ones() {
    let mut conn = open_db_in_memory().unwrap();

    let err = with_transaction(&mut conn, |unit| {
        let persons = SqlitePersonRepository::try_new(unit)?;
        persons.create_person(&NewPerson::new("p1"))?;
        let _ = persons.create_person(&NewPerson::new("p1"));
        let _ = SqliteActivityRepository::try_new(unit)?.create_activity(&NewActivity {
            name: None,
            ..NewActivity::new("run", "Running", 600)
        });
        Ok(())
    })
    .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate { ref table } if table == "person"));
}

#[test]
fn not_found_inside_a_unit_does_not_poison_it() {
    let mut conn = open_db_in_memory().unwrap();

    with_transaction(&mut conn, |unit| {
        let persons = SqlitePersonRepository::try_new(unit)?;
        persons.create_person(&NewPerson::new("p1"))?;
        let missing = persons.delete_person("ghost");
        assert!(matches!(missing, Err(RepoError::NotFound { .. })));
        assert!(!unit.is_poisoned());
        Ok(())
    })
    .unwrap();

    let persons = SqlitePersonRepository::try_new(&conn).unwrap();
    assert_eq!(persons.list_persons().unwrap().len(), 1);
}

#[test]
fn repositories_outside_a_unit_are_not_tracked() {
    let conn = open_db_in_memory().unwrap();
    let persons = SqlitePersonRepository::try_new(&conn).unwrap();

    persons.create_person(&NewPerson::new("p1")).unwrap();
    assert!(persons.create_person(&NewPerson::new("p1")).is_err());
    persons.create_person(&NewPerson::new("p2")).unwrap();
    assert_eq!(persons.list_persons().unwrap().len(), 2);
}
