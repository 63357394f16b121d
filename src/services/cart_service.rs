use std::collections::HashMap;

use sea_orm::TransactionTrait;

use crate::{
    audit::log_audit,
    dto::cart::{AddCartItemRequest, CartItemDto, RemoveCartItemRequest, UpdateCartItemRequest},
    entity::cart_items,
    error::{AppError, AppResult},
    mapper,
    middleware::auth::AuthCustomer,
    repository::cart_items as cart_repo,
    state::AppState,
};

pub async fn add_cart_item(
    state: &AppState,
    customer: &AuthCustomer,
    payload: AddCartItemRequest,
) -> AppResult<CartItemDto> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let txn = state.orm.begin().await?;

    let existing = cart_repo::find_item(&txn, &customer.customer_id, payload.product_id).await?;
    let item = match existing {
        // Same (customer, product) pair: merge by summing quantities.
        Some(existing) => cart_items::Model {
            quantity: existing.quantity + payload.quantity,
            ..existing
        },
        None => cart_items::Model {
            customer_id: customer.customer_id.clone(),
            product_id: payload.product_id,
            quantity: payload.quantity,
        },
    };
    let saved = cart_repo::save(&txn, item).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(customer.customer_id.as_str()),
        "cart_add",
        Some("cart_items"),
        Some(serde_json::json!({ "product_id": saved.product_id, "quantity": saved.quantity })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(mapper::to_cart_item_dto(saved))
}

pub async fn update_cart_item(
    state: &AppState,
    customer: &AuthCustomer,
    product_id: i64,
    payload: UpdateCartItemRequest,
) -> AppResult<CartItemDto> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let txn = state.orm.begin().await?;

    // Overwrite, not merge: the row ends up with exactly the given quantity
    // whether or not it existed before.
    let saved = cart_repo::save(
        &txn,
        cart_items::Model {
            customer_id: customer.customer_id.clone(),
            product_id,
            quantity: payload.quantity,
        },
    )
    .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(customer.customer_id.as_str()),
        "cart_update",
        Some("cart_items"),
        Some(serde_json::json!({ "product_id": saved.product_id, "quantity": saved.quantity })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(mapper::to_cart_item_dto(saved))
}

pub async fn list_cart_items(
    state: &AppState,
    customer: &AuthCustomer,
) -> AppResult<Vec<CartItemDto>> {
    let items = cart_repo::find_all(&state.orm, &customer.customer_id).await?;
    Ok(mapper::to_cart_item_dtos(items))
}

pub async fn remove_cart_items(
    state: &AppState,
    customer: &AuthCustomer,
    payload: Vec<RemoveCartItemRequest>,
) -> AppResult<Vec<CartItemDto>> {
    let product_ids: Vec<i64> = payload.iter().map(|removal| removal.product_id).collect();

    let txn = state.orm.begin().await?;

    let existing = cart_repo::find_items(&txn, &customer.customer_id, &product_ids).await?;
    let (to_delete, to_adjust) = split_removals(existing, &payload);

    cart_repo::delete_all(&txn, &to_delete).await?;
    let adjusted = cart_repo::save_all(&txn, to_adjust).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(customer.customer_id.as_str()),
        "cart_remove",
        Some("cart_items"),
        Some(serde_json::json!({ "product_ids": product_ids })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(mapper::to_cart_item_dtos(adjusted))
}

pub async fn delete_cart_item(
    state: &AppState,
    customer: &AuthCustomer,
    product_id: i64,
) -> AppResult<()> {
    let txn = state.orm.begin().await?;
    cart_repo::delete_one(&txn, &customer.customer_id, product_id).await?;
    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(customer.customer_id.as_str()),
        "cart_delete",
        Some("cart_items"),
        Some(serde_json::json!({ "product_id": product_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}

/// Partition requested removals against the rows that exist. Removals for
/// products not in the cart are ignored; a duplicated product id is consumed
/// by its first entry. A row whose whole quantity (or more) is requested is
/// deleted, the rest are adjusted downwards.
fn split_removals(
    existing: Vec<cart_items::Model>,
    removals: &[RemoveCartItemRequest],
) -> (Vec<cart_items::Model>, Vec<cart_items::Model>) {
    let mut by_product: HashMap<i64, cart_items::Model> = existing
        .into_iter()
        .map(|item| (item.product_id, item))
        .collect();

    let mut to_delete = Vec::new();
    let mut to_adjust = Vec::new();
    for removal in removals {
        let Some(item) = by_product.remove(&removal.product_id) else {
            continue;
        };
        if item.quantity <= removal.quantity {
            to_delete.push(item);
        } else {
            to_adjust.push(cart_items::Model {
                quantity: item.quantity - removal.quantity,
                ..item
            });
        }
    }
    (to_delete, to_adjust)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: i64, quantity: i32) -> cart_items::Model {
        cart_items::Model {
            customer_id: "customer-123".to_string(),
            product_id,
            quantity,
        }
    }

    fn removal(product_id: i64, quantity: i32) -> RemoveCartItemRequest {
        RemoveCartItemRequest {
            product_id,
            quantity,
        }
    }

    #[test]
    fn removal_of_full_quantity_deletes_the_row() {
        let (to_delete, to_adjust) = split_removals(vec![item(7, 10)], &[removal(7, 10)]);
        assert_eq!(to_delete.len(), 1);
        assert!(to_adjust.is_empty());
    }

    #[test]
    fn removal_beyond_existing_quantity_deletes_the_row() {
        let (to_delete, to_adjust) = split_removals(vec![item(7, 10)], &[removal(7, 11)]);
        assert_eq!(to_delete.len(), 1);
        assert_eq!(to_delete[0].product_id, 7);
        assert!(to_adjust.is_empty());
    }

    #[test]
    fn partial_removal_adjusts_the_remainder() {
        let (to_delete, to_adjust) = split_removals(vec![item(7, 10)], &[removal(7, 9)]);
        assert!(to_delete.is_empty());
        assert_eq!(to_adjust.len(), 1);
        assert_eq!(to_adjust[0].quantity, 1);
    }

    #[test]
    fn removal_of_absent_product_is_ignored() {
        let (to_delete, to_adjust) = split_removals(vec![item(7, 10)], &[removal(99, 1)]);
        assert!(to_delete.is_empty());
        assert!(to_adjust.is_empty());
    }

    #[test]
    fn mixed_batch_splits_deletes_and_adjustments() {
        let existing = vec![item(1, 5), item(2, 5)];
        let removals = [removal(1, 5), removal(2, 2), removal(3, 1)];
        let (to_delete, to_adjust) = split_removals(existing, &removals);
        assert_eq!(to_delete.len(), 1);
        assert_eq!(to_delete[0].product_id, 1);
        assert_eq!(to_adjust.len(), 1);
        assert_eq!(to_adjust[0].product_id, 2);
        assert_eq!(to_adjust[0].quantity, 3);
    }

    #[test]
    fn duplicate_product_ids_are_considered_once() {
        let (to_delete, to_adjust) =
            split_removals(vec![item(7, 10)], &[removal(7, 3), removal(7, 9)]);
        assert!(to_delete.is_empty());
        assert_eq!(to_adjust.len(), 1);
        assert_eq!(to_adjust[0].quantity, 7);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let (to_delete, to_adjust) = split_removals(Vec::new(), &[]);
        assert!(to_delete.is_empty());
        assert!(to_adjust.is_empty());
    }
}
