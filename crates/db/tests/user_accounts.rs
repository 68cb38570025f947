//! Integration tests for the user repository.

use sqlx::PgPool;
use yamdb_db::models::user::{CreateUser, UpdateUser};
use yamdb_db::repositories::UserRepo;

fn new_user(username: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        first_name: String::new(),
        last_name: String::new(),
        bio: String::new(),
        role: "user".to_string(),
        confirmation_code: "initial".to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn new_users_start_unconfirmed(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("alice")).await.unwrap();
    assert!(!user.is_confirmed);

    UserRepo::mark_confirmed(&pool, user.id).await.unwrap();
    let user = UserRepo::find_by_username(&pool, "alice").await.unwrap().unwrap();
    assert!(user.is_confirmed);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_username_violates_constraint(pool: PgPool) {
    UserRepo::create(&pool, &new_user("alice")).await.unwrap();
    let mut again = new_user("alice");
    again.email = "other@example.com".into();

    let err = UserRepo::create(&pool, &again).await.unwrap_err();
    assert!(yamdb_db::is_unique_violation(&err, "uq_users_username"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_applies_only_given_fields(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("alice")).await.unwrap();

    let input = UpdateUser {
        bio: Some("Reads a lot".into()),
        ..Default::default()
    };
    let updated = UserRepo::update(&pool, user.id, &input).await.unwrap().unwrap();
    assert_eq!(updated.bio, "Reads a lot");
    assert_eq!(updated.email, "alice@example.com");
    assert_eq!(updated.role, "user");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn confirmation_code_can_be_replaced(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("alice")).await.unwrap();
    assert!(UserRepo::set_confirmation_code(&pool, user.id, "fresh").await.unwrap());

    let user = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(user.confirmation_code, "fresh");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_matches_username_substring(pool: PgPool) {
    UserRepo::create(&pool, &new_user("alice")).await.unwrap();
    UserRepo::create(&pool, &new_user("malice")).await.unwrap();
    UserRepo::create(&pool, &new_user("bob")).await.unwrap();

    let found = UserRepo::list(&pool, Some("lic"), 20, 0).await.unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(UserRepo::count(&pool, None).await.unwrap(), 3);
    assert!(UserRepo::delete_by_username(&pool, "bob").await.unwrap());
    assert!(!UserRepo::delete_by_username(&pool, "bob").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_treats_wildcards_literally(pool: PgPool) {
    UserRepo::create(&pool, &new_user("film_fan")).await.unwrap();
    UserRepo::create(&pool, &new_user("filmxfan")).await.unwrap();

    let found = UserRepo::list(&pool, Some("_"), 20, 0).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].username, "film_fan");
    assert_eq!(UserRepo::count(&pool, Some("%")).await.unwrap(), 0);
}
