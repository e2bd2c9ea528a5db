//! Seeding scenarios exercised through the public API only.

use std::sync::Arc;

use faketories::{Collection, FakeInput, FaketoryContext, InMemoryCollection, partial};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Account {
    id: usize,
    email: String,
    role: String,
    active: bool,
}

fn account(i: usize) -> Account {
    Account {
        id: i,
        email: format!("user{i}@example.com"),
        role: "member".to_string(),
        active: true,
    }
}

#[tokio::test]
async fn test_seed_then_query_and_update() {
    let mut context = FaketoryContext::new();
    let accounts = context.faketory("accounts", account);

    accounts.seed(FakeInput::Count(3)).await.unwrap();
    accounts
        .seed(vec![partial(json!({ "id": 99, "role": "admin" })).unwrap()])
        .await
        .unwrap();

    let store = accounts.collection();
    let admins = store.find_many(&|a: &Account| a.role == "admin").await;
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0].email, "user0@example.com");

    let deactivated = store
        .update(
            &|a: &Account| a.role == "member",
            &partial(json!({ "active": false })).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(deactivated.len(), 3);
    assert!(store.find_first(&|a: &Account| a.active).await.is_some());

    context.reset().await;
    assert_eq!(store.count().await, 0);
}

#[tokio::test]
async fn test_shared_collection_with_validator() {
    let collection: Arc<dyn Collection<Account>> = Arc::new(
        InMemoryCollection::new("accounts").with_validator(|a: &Account| {
            if a.email.contains('@') {
                Ok(())
            } else {
                Err(format!("invalid email {:?}", a.email))
            }
        }),
    );

    let mut context = FaketoryContext::new();
    let accounts = context.faketory_with(collection.clone(), account);

    let result = accounts
        .seed(FakeInput::CountWithPartials(
            3,
            vec![
                partial(json!({})).unwrap(),
                partial(json!({ "email": "broken" })).unwrap(),
            ],
        ))
        .await;

    assert!(result.is_err());
    // The first account was stored before the second was rejected.
    assert_eq!(collection.count().await, 1);
}
