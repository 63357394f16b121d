use axum_cart_api::{
    db::{create_orm_conn, run_migrations},
    dto::cart::{AddCartItemRequest, RemoveCartItemRequest, UpdateCartItemRequest},
    middleware::auth::AuthCustomer,
    repository::cart_items as cart_repo,
    services::cart_service,
    state::AppState,
};

// Integration flow: add twice (merge), list, overwrite via update, reject bad
// quantities, keep customers isolated, delete idempotently.
#[tokio::test]
async fn add_update_list_and_delete_flow() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let customer = AuthCustomer {
        customer_id: "flow-customer-1".to_string(),
    };
    let other = AuthCustomer {
        customer_id: "flow-customer-1-other".to_string(),
    };
    reset_customer(&state, &customer.customer_id).await?;
    reset_customer(&state, &other.customer_id).await?;

    // First add creates the row.
    let added = cart_service::add_cart_item(
        &state,
        &customer,
        AddCartItemRequest {
            product_id: 42,
            quantity: 1,
        },
    )
    .await?;
    assert_eq!(added.product_id, 42);
    assert_eq!(added.quantity, 1);

    // Adding the same product again merges by summing quantities.
    let merged = cart_service::add_cart_item(
        &state,
        &customer,
        AddCartItemRequest {
            product_id: 42,
            quantity: 1,
        },
    )
    .await?;
    assert_eq!(merged.quantity, 2);

    let items = cart_service::list_cart_items(&state, &customer).await?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);

    // Update overwrites instead of merging.
    let updated = cart_service::update_cart_item(
        &state,
        &customer,
        42,
        UpdateCartItemRequest { quantity: 5 },
    )
    .await?;
    assert_eq!(updated.quantity, 5);

    // Non-positive quantities are rejected on both add and update.
    let result = cart_service::add_cart_item(
        &state,
        &customer,
        AddCartItemRequest {
            product_id: 42,
            quantity: 0,
        },
    )
    .await;
    assert!(result.is_err());
    let result = cart_service::update_cart_item(
        &state,
        &customer,
        42,
        UpdateCartItemRequest { quantity: -1 },
    )
    .await;
    assert!(result.is_err());

    // The other customer's cart stays empty throughout.
    let other_items = cart_service::list_cart_items(&state, &other).await?;
    assert!(other_items.is_empty());

    // Delete twice: the second call is a no-op, not an error.
    cart_service::delete_cart_item(&state, &customer, 42).await?;
    cart_service::delete_cart_item(&state, &customer, 42).await?;
    let items = cart_service::list_cart_items(&state, &customer).await?;
    assert!(items.is_empty());

    Ok(())
}

// Integration flow: batch removal adjusts partial quantities, deletes rows
// taken down to (or below) zero, and ignores products not in the cart.
#[tokio::test]
async fn batch_removal_flow() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let customer = AuthCustomer {
        customer_id: "flow-customer-2".to_string(),
    };
    reset_customer(&state, &customer.customer_id).await?;

    cart_service::add_cart_item(
        &state,
        &customer,
        AddCartItemRequest {
            product_id: 7,
            quantity: 10,
        },
    )
    .await?;

    // Removing less than the row holds adjusts it downwards.
    let left = cart_service::remove_cart_items(
        &state,
        &customer,
        vec![RemoveCartItemRequest {
            product_id: 7,
            quantity: 9,
        }],
    )
    .await?;
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].quantity, 1);

    // Removing more than the row holds deletes it.
    let left = cart_service::remove_cart_items(
        &state,
        &customer,
        vec![RemoveCartItemRequest {
            product_id: 7,
            quantity: 11,
        }],
    )
    .await?;
    assert!(left.is_empty());
    assert!(
        cart_service::list_cart_items(&state, &customer)
            .await?
            .is_empty()
    );

    // Mixed batch: one full removal, one adjustment, one unknown product.
    cart_service::add_cart_item(
        &state,
        &customer,
        AddCartItemRequest {
            product_id: 1,
            quantity: 5,
        },
    )
    .await?;
    cart_service::add_cart_item(
        &state,
        &customer,
        AddCartItemRequest {
            product_id: 2,
            quantity: 5,
        },
    )
    .await?;
    let left = cart_service::remove_cart_items(
        &state,
        &customer,
        vec![
            RemoveCartItemRequest {
                product_id: 1,
                quantity: 5,
            },
            RemoveCartItemRequest {
                product_id: 2,
                quantity: 2,
            },
            RemoveCartItemRequest {
                product_id: 99,
                quantity: 1,
            },
        ],
    )
    .await?;
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].product_id, 2);
    assert_eq!(left[0].quantity, 3);

    let items = cart_service::list_cart_items(&state, &customer).await?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product_id, 2);
    assert_eq!(items[0].quantity, 3);

    Ok(())
}

// Allow skipping when no DB is configured in the environment.
async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(None);
            }
        };

    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    Ok(Some(AppState { orm }))
}

// Flows run in parallel, so each cleans only its own customer's rows instead
// of truncating the table.
async fn reset_customer(state: &AppState, customer_id: &str) -> anyhow::Result<()> {
    let existing = cart_repo::find_all(&state.orm, customer_id).await?;
    cart_repo::delete_all(&state.orm, &existing).await?;
    Ok(())
}
