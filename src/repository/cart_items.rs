use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, Set,
    sea_query::OnConflict,
};

use crate::{
    entity::cart_items::{ActiveModel, Column, Entity as CartItems, Model},
    error::AppResult,
};

/// Point lookup by the composite `(customer_id, product_id)` key.
pub async fn find_item<C>(
    conn: &C,
    customer_id: &str,
    product_id: i64,
) -> AppResult<Option<Model>>
where
    C: ConnectionTrait,
{
    let item = CartItems::find_by_id((customer_id.to_owned(), product_id))
        .one(conn)
        .await?;
    Ok(item)
}

/// Batch lookup restricted to the given product ids. Products without a row
/// are simply absent from the result; no ordering is guaranteed.
pub async fn find_items<C>(
    conn: &C,
    customer_id: &str,
    product_ids: &[i64],
) -> AppResult<Vec<Model>>
where
    C: ConnectionTrait,
{
    let items = CartItems::find()
        .filter(Column::CustomerId.eq(customer_id))
        .filter(Column::ProductId.is_in(product_ids.iter().copied()))
        .all(conn)
        .await?;
    Ok(items)
}

/// Every row in one customer's cart.
pub async fn find_all<C>(conn: &C, customer_id: &str) -> AppResult<Vec<Model>>
where
    C: ConnectionTrait,
{
    let items = CartItems::find()
        .filter(Column::CustomerId.eq(customer_id))
        .all(conn)
        .await?;
    Ok(items)
}

/// Insert-or-replace by composite key in a single statement.
pub async fn save<C>(conn: &C, item: Model) -> AppResult<Model>
where
    C: ConnectionTrait,
{
    let active = ActiveModel {
        customer_id: Set(item.customer_id),
        product_id: Set(item.product_id),
        quantity: Set(item.quantity),
    };
    let saved = CartItems::insert(active)
        .on_conflict(
            OnConflict::columns([Column::CustomerId, Column::ProductId])
                .update_column(Column::Quantity)
                .to_owned(),
        )
        .exec_with_returning(conn)
        .await?;
    Ok(saved)
}

/// Bulk upsert, sequenced on the caller's connection so it stays inside the
/// caller's transaction.
pub async fn save_all<C>(conn: &C, items: Vec<Model>) -> AppResult<Vec<Model>>
where
    C: ConnectionTrait,
{
    let mut saved = Vec::with_capacity(items.len());
    for item in items {
        saved.push(save(conn, item).await?);
    }
    Ok(saved)
}

/// Bulk delete by composite key.
pub async fn delete_all<C>(conn: &C, items: &[Model]) -> AppResult<()>
where
    C: ConnectionTrait,
{
    if items.is_empty() {
        return Ok(());
    }
    let mut keys = Condition::any();
    for item in items {
        keys = keys.add(
            Condition::all()
                .add(Column::CustomerId.eq(item.customer_id.as_str()))
                .add(Column::ProductId.eq(item.product_id)),
        );
    }
    CartItems::delete_many().filter(keys).exec(conn).await?;
    Ok(())
}

/// Delete by key. Deleting an absent row is a no-op, not an error.
pub async fn delete_one<C>(conn: &C, customer_id: &str, product_id: i64) -> AppResult<()>
where
    C: ConnectionTrait,
{
    CartItems::delete_many()
        .filter(Column::CustomerId.eq(customer_id))
        .filter(Column::ProductId.eq(product_id))
        .exec(conn)
        .await?;
    Ok(())
}
