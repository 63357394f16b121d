use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};

use crate::{
    dto::cart::{AddCartItemRequest, CartItemDto, RemoveCartItemRequest, UpdateCartItemRequest},
    error::AppResult,
    middleware::auth::AuthCustomer,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items", get(cart_items_list).post(add_cart_item))
        .route("/items/remove", post(remove_cart_items))
        .route(
            "/items/{product_id}",
            put(update_cart_item).delete(delete_cart_item),
        )
}

#[utoipa::path(
    get,
    path = "/v1/storefront/cart/items",
    responses(
        (status = 200, description = "List cart items for current customer", body = Vec<CartItemDto>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart_items_list(
    State(state): State<AppState>,
    customer: AuthCustomer,
) -> AppResult<Json<Vec<CartItemDto>>> {
    let items = cart_service::list_cart_items(&state, &customer).await?;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/v1/storefront/cart/items",
    request_body = AddCartItemRequest,
    responses(
        (status = 200, description = "Add to cart, merging with any existing row", body = CartItemDto),
        (status = 400, description = "Bad Request"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_cart_item(
    State(state): State<AppState>,
    customer: AuthCustomer,
    Json(payload): Json<AddCartItemRequest>,
) -> AppResult<Json<CartItemDto>> {
    let item = cart_service::add_cart_item(&state, &customer, payload).await?;
    Ok(Json(item))
}

#[utoipa::path(
    put,
    path = "/v1/storefront/cart/items/{product_id}",
    params(
        ("product_id" = i64, Path, description = "Product ID")
    ),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Set the cart row to the given quantity", body = CartItemDto),
        (status = 400, description = "Bad Request"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    customer: AuthCustomer,
    Path(product_id): Path<i64>,
    Json(payload): Json<UpdateCartItemRequest>,
) -> AppResult<Json<CartItemDto>> {
    let item = cart_service::update_cart_item(&state, &customer, product_id, payload).await?;
    Ok(Json(item))
}

#[utoipa::path(
    post,
    path = "/v1/storefront/cart/items/remove",
    request_body = Vec<RemoveCartItemRequest>,
    responses(
        (status = 200, description = "Rows left in the cart after the removal, adjusted", body = Vec<CartItemDto>),
        (status = 400, description = "Bad Request"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_cart_items(
    State(state): State<AppState>,
    customer: AuthCustomer,
    Json(payload): Json<Vec<RemoveCartItemRequest>>,
) -> AppResult<Json<Vec<CartItemDto>>> {
    let items = cart_service::remove_cart_items(&state, &customer, payload).await?;
    Ok(Json(items))
}

#[utoipa::path(
    delete,
    path = "/v1/storefront/cart/items/{product_id}",
    params(
        ("product_id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Removed from cart"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn delete_cart_item(
    State(state): State<AppState>,
    customer: AuthCustomer,
    Path(product_id): Path<i64>,
) -> AppResult<StatusCode> {
    cart_service::delete_cart_item(&state, &customer, product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
