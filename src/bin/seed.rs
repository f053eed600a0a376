use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use kapehan_api::{config::AppConfig, db::create_pool, domain::rewards::RewardEffect};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@kapehan.ph", "admin123", "admin").await?;
    let barista_id = ensure_user(&pool, "barista@kapehan.ph", "barista123", "barista").await?;
    let customer_id = ensure_user(&pool, "customer@kapehan.ph", "customer123", "customer").await?;
    seed_menu(&pool).await?;
    seed_toppings(&pool).await?;
    seed_rewards(&pool).await?;

    println!("Seed completed. Admin: {admin_id}, Barista: {barista_id}, Customer: {customer_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_menu(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    // (name, description, category, base price, sizes)
    let items: Vec<(&str, &str, &str, i64, Vec<(&str, i64)>)> = vec![
        (
            "Kapehan Americano",
            "Double shot over hot water",
            "Drinks",
            9000,
            vec![("Regular", 9000), ("Grande", 12000)],
        ),
        (
            "Caramel Latte",
            "Espresso, steamed milk, caramel",
            "Drinks",
            12000,
            vec![("Regular", 12000), ("Grande", 15000)],
        ),
        (
            "Iced Mocha",
            "Chocolate, espresso, milk over ice",
            "Drinks",
            13000,
            vec![("Regular", 13000), ("Grande", 16000)],
        ),
        (
            "Tapa Rice Meal",
            "Beef tapa, garlic rice, egg",
            "Meals",
            18000,
            vec![],
        ),
        (
            "Longganisa Rice Meal",
            "Sweet sausage, garlic rice, egg",
            "Meals",
            17000,
            vec![],
        ),
        ("Ensaymada", "Soft brioche, cheese on top", "Pastries", 6500, vec![]),
    ];

    for (name, desc, category, base_price, sizes) in items {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            INSERT INTO menu_items (id, name, description, category, base_price)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(desc)
        .bind(category)
        .bind(base_price)
        .fetch_optional(pool)
        .await?;

        if let Some((item_id,)) = row {
            for (size_name, price) in sizes {
                sqlx::query(
                    r#"
                    INSERT INTO item_sizes (id, menu_item_id, name, price)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (menu_item_id, name) DO NOTHING
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(item_id)
                .bind(size_name)
                .bind(price)
                .execute(pool)
                .await?;
            }
        }
    }

    println!("Seeded menu");
    Ok(())
}

async fn seed_toppings(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let toppings: Vec<(&str, i64)> = vec![
        ("Extra Shot", 3000),
        ("Whipped Cream", 2000),
        ("Oat Milk", 2500),
        ("Pearls", 2000),
    ];

    for (name, price) in toppings {
        sqlx::query(
            r#"
            INSERT INTO toppings (id, name, price)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(price)
        .execute(pool)
        .await?;
    }

    println!("Seeded toppings");
    Ok(())
}

async fn seed_rewards(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    // effects are resolved once, here, from the legacy catalog wording
    let rewards: Vec<(&str, &str, i64, &str)> = vec![
        ("10% Off Your Order", "Save on the whole order", 50, "discount"),
        ("Free Grande Drink", "Any Grande drink on the house", 100, "drink"),
        ("Rice Meal Treat", "One rice meal on the house", 150, "food"),
    ];

    for (name, desc, points_cost, category) in rewards {
        let effect = RewardEffect::infer(category, name);
        let effect_json = serde_json::to_value(&effect)?;
        sqlx::query(
            r#"
            INSERT INTO rewards (id, name, description, points_cost, category, effect)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(desc)
        .bind(points_cost)
        .bind(category)
        .bind(effect_json)
        .execute(pool)
        .await?;
    }

    println!("Seeded rewards");
    Ok(())
}
