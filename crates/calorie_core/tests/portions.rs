use calorie_core::db::open_db_in_memory;
use calorie_core::{
    MealPortionKey, MealPortionQuery, MealRepository, NewMeal, NewMealPortion, NewPortion,
    PortionRepository, RepoError, SqliteMealRepository, SqlitePortionRepository,
};
use rusqlite::Connection;

fn seed(conn: &Connection) {
    let meals = SqliteMealRepository::try_new(conn).unwrap();
    let portions = SqlitePortionRepository::try_new(conn).unwrap();
    meals.create_meal(&NewMeal::new("soup", "Fish Soup", 4.0)).unwrap();
    meals.create_meal(&NewMeal::new("salad", "Salad", 1.0)).unwrap();
    portions
        .create_portion(&NewPortion::new("carrot", "Carrot", 41.0))
        .unwrap();
    portions
        .create_portion(&NewPortion {
            protein: Some(20.0),
            fat: Some(13.0),
            ..NewPortion::new("salmon", "Salmon", 208.0)
        })
        .unwrap();
    for (meal, portion, weight) in [
        ("soup", "carrot", 50.0),
        ("soup", "salmon", 120.0),
        ("salad", "carrot", 80.0),
    ] {
        portions
            .create_meal_portion(&NewMealPortion::new(meal, portion, weight))
            .unwrap();
    }
}

#[test]
fn portion_roundtrip_keeps_optional_macros() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let portions = SqlitePortionRepository::try_new(&conn).unwrap();

    let salmon = portions.get_portion("salmon").unwrap().unwrap();
    assert_eq!(salmon.calories, 208.0);
    assert_eq!(salmon.protein, Some(20.0));
    assert_eq!(salmon.fat, Some(13.0));
    assert_eq!(salmon.alcohol, None);

    let ids: Vec<_> = portions
        .list_portions()
        .unwrap()
        .into_iter()
        .map(|portion| portion.id)
        .collect();
    assert_eq!(ids, vec!["carrot", "salmon"]);
}

#[test]
fn portion_requires_name_and_calories() {
    let conn = open_db_in_memory().unwrap();
    let portions = SqlitePortionRepository::try_new(&conn).unwrap();

    let err = portions
        .create_portion(&NewPortion {
            calories: None,
            ..NewPortion::new("x", "X", 1.0)
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::MissingField { ref column, .. } if column == "calories"));
}

#[test]
fn meal_portion_required_columns_are_enforced() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let portions = SqlitePortionRepository::try_new(&conn).unwrap();

    let full = NewMealPortion::new("salad", "salmon", 60.0);
    for (draft, column) in [
        (
            NewMealPortion {
                weight_per_serving: None,
                ..full.clone()
            },
            "weight_per_serving",
        ),
        (
            NewMealPortion {
                meal_id: None,
                ..full.clone()
            },
            "meal_id",
        ),
        (
            NewMealPortion {
                portion_id: None,
                ..full.clone()
            },
            "portion_id",
        ),
    ] {
        let err = portions.create_meal_portion(&draft).unwrap_err();
        assert!(
            matches!(&err, RepoError::MissingField { table, column: actual } if table == "meal_portion" && actual == column),
            "unexpected error for {column}: {err}"
        );
    }

    assert!(portions
        .get_meal_portion(&MealPortionKey::new("salad", "salmon"))
        .unwrap()
        .is_none());
}

#[test]
fn non_finite_amounts_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let portions = SqlitePortionRepository::try_new(&conn).unwrap();

    let err = portions
        .create_portion(&NewPortion::new("bread", "Bread", f64::NAN))
        .unwrap_err();
    assert!(matches!(err, RepoError::CheckViolation(ref detail) if detail.contains("portion.calories")));

    let err = portions
        .create_portion(&NewPortion {
            fat: Some(f64::INFINITY),
            ..NewPortion::new("bread", "Bread", 265.0)
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::CheckViolation(ref detail) if detail.contains("portion.fat")));
    assert!(portions.get_portion("bread").unwrap().is_none());

    let err = portions
        .create_meal_portion(&NewMealPortion::new("salad", "salmon", f64::NAN))
        .unwrap_err();
    assert!(
        matches!(err, RepoError::CheckViolation(ref detail) if detail.contains("meal_portion.weight_per_serving"))
    );
}

#[test]
fn meal_portion_requires_existing_meal_and_portion() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let portions = SqlitePortionRepository::try_new(&conn).unwrap();

    let err = portions
        .create_meal_portion(&NewMealPortion::new("ghost", "carrot", 1.0))
        .unwrap_err();
    assert!(matches!(err, RepoError::DanglingReference));

    let err = portions
        .create_meal_portion(&NewMealPortion::new("soup", "carrot", 99.0))
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate { .. }));
}

#[test]
fn deleting_portion_removes_only_its_meal_portions() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let portions = SqlitePortionRepository::try_new(&conn).unwrap();

    portions.delete_portion("carrot").unwrap();

    let remaining = portions
        .list_meal_portions(&MealPortionQuery::default())
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].key(), MealPortionKey::new("soup", "salmon"));
}

#[test]
fn deleting_meal_removes_its_breakdown() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let meals = SqliteMealRepository::try_new(&conn).unwrap();
    let portions = SqlitePortionRepository::try_new(&conn).unwrap();

    meals.delete_meal("soup").unwrap();

    let by_meal = |meal_id: &str| {
        portions
            .list_meal_portions(&MealPortionQuery {
                meal_id: Some(meal_id.to_string()),
                ..MealPortionQuery::default()
            })
            .unwrap()
    };
    assert!(by_meal("soup").is_empty());
    assert_eq!(by_meal("salad").len(), 1);
    assert!(portions.get_portion("salmon").unwrap().is_some());
}

#[test]
fn meal_portion_delete_and_update_portion() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let portions = SqlitePortionRepository::try_new(&conn).unwrap();

    let key = MealPortionKey::new("salad", "carrot");
    portions.delete_meal_portion(&key).unwrap();
    assert!(portions.get_meal_portion(&key).unwrap().is_none());
    let err = portions.delete_meal_portion(&key).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { ref key, .. } if key == "salad-carrot"));

    let mut carrot = portions.get_portion("carrot").unwrap().unwrap();
    carrot.carbohydrate = Some(9.6);
    portions.update_portion(&carrot).unwrap();
    assert_eq!(
        portions.get_portion("carrot").unwrap().unwrap().carbohydrate,
        Some(9.6)
    );
}
