use axum_cart_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::cart_items,
    repository::cart_items as cart_repo,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let customer_id = "demo-customer";
    let lines = [(1001_i64, 2), (1002_i64, 1), (1003_i64, 5)];

    for (product_id, quantity) in lines {
        // save() upserts, so re-running the seed is idempotent.
        cart_repo::save(
            &orm,
            cart_items::Model {
                customer_id: customer_id.to_string(),
                product_id,
                quantity,
            },
        )
        .await?;
    }

    println!("Seeded {} cart rows for {customer_id}", lines.len());
    Ok(())
}
