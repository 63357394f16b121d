use crate::{dto::cart::CartItemDto, entity::cart_items};

/// Translate a cart row into its response shape. Pure, no failure modes.
pub fn to_cart_item_dto(item: cart_items::Model) -> CartItemDto {
    CartItemDto {
        customer_id: item.customer_id,
        product_id: item.product_id,
        quantity: item.quantity,
    }
}

pub fn to_cart_item_dtos(items: Vec<cart_items::Model>) -> Vec<CartItemDto> {
    items.into_iter().map(to_cart_item_dto).collect()
}
