use kapehan_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    domain::rewards::RewardEffect,
    dto::cart::AddToCartRequest,
    dto::orders::CheckoutRequest,
    dto::queue::AdvanceStatusRequest,
    entity::{
        item_sizes::ActiveModel as SizeActive, menu_items::ActiveModel as ItemActive,
        rewards::ActiveModel as RewardActive, toppings::ActiveModel as ToppingActive,
        users::ActiveModel as UserActive,
    },
    error::AppError,
    middleware::auth::AuthUser,
    services::{cart_service, order_service, queue_service, reward_service},
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

// Integration flow: customer fills the cart, checks out with a redeemed
// reward, tracks the order through the queue, staff advance and collect
// payment.
#[tokio::test]
async fn checkout_redeem_and_queue_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    // Seed accounts
    let customer_id = create_user(&state, "customer", "customer@example.com", 120).await?;
    let barista_id = create_user(&state, "barista", "barista@example.com", 0).await?;

    // Seed a sized drink, a topping and a reward
    let item = ItemActive {
        id: Set(Uuid::new_v4()),
        name: Set("Caramel Latte".into()),
        description: Set(None),
        category: Set("Drinks".into()),
        base_price: Set(12000),
        available: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let grande = SizeActive {
        id: Set(Uuid::new_v4()),
        menu_item_id: Set(item.id),
        name: Set("Grande".into()),
        price: Set(15000),
    }
    .insert(&state.orm)
    .await?;

    let pearls = ToppingActive {
        id: Set(Uuid::new_v4()),
        name: Set("Pearls".into()),
        price: Set(2000),
        available: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let reward = RewardActive {
        id: Set(Uuid::new_v4()),
        name: Set("Free Grande Drink".into()),
        description: Set(None),
        points_cost: Set(100),
        category: Set("drink".into()),
        effect: Set(serde_json::to_value(RewardEffect::infer(
            "drink",
            "Free Grande Drink",
        ))?),
        available: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let customer = AuthUser {
        user_id: customer_id,
        role: "customer".into(),
    };
    let barista = AuthUser {
        user_id: barista_id,
        role: "barista".into(),
    };

    // Cart: one Grande latte with pearls
    cart_service::add_to_cart(
        &state,
        &customer,
        AddToCartRequest {
            menu_item_id: item.id,
            size_id: Some(grande.id),
            quantity: 1,
            topping_ids: vec![pearls.id],
        },
    )
    .await?;

    let cart = cart_service::list_cart(&state, &customer).await?.data.unwrap();
    assert_eq!(cart.subtotal, 15000);
    assert_eq!(cart.toppings_total, 2000);

    // Checkout with the free-Grande reward: the Grande line is free, only
    // the pearls are payable.
    let checkout = CheckoutRequest {
        payment_method: "gcash".into(),
        payment_reference: Some("GC-0001".into()),
        customer_phone: "09171234567".into(),
        reward_id: Some(reward.id),
        idempotency_key: "order-1".into(),
    };
    let placed = order_service::checkout(&state, &customer, checkout)
        .await?
        .data
        .unwrap();
    assert_eq!(placed.order.subtotal, 15000);
    assert_eq!(placed.order.toppings_total, 2000);
    assert_eq!(placed.order.discount, 15000);
    assert_eq!(placed.order.total_amount, 2000);
    assert_eq!(placed.order.status, "waiting");
    assert_eq!(placed.order.payment_status, "paid");
    assert_eq!(placed.items.len(), 1);

    // Redemption and the order committed together
    let points = reward_service::points_summary(&state, &customer)
        .await?
        .data
        .unwrap();
    assert_eq!(points.points, 20);
    assert_eq!(points.history.len(), 1);
    assert_eq!(points.history[0].delta, -100);

    // Resubmitting the same idempotency key returns the same order instead
    // of creating a duplicate.
    let replay = order_service::checkout(
        &state,
        &customer,
        CheckoutRequest {
            payment_method: "gcash".into(),
            payment_reference: Some("GC-0001".into()),
            customer_phone: "09171234567".into(),
            reward_id: Some(reward.id),
            idempotency_key: "order-1".into(),
        },
    )
    .await?;
    assert_eq!(replay.message, "Order already placed");
    assert_eq!(replay.data.unwrap().order.id, placed.order.id);

    // Second order, cash, no reward
    cart_service::add_to_cart(
        &state,
        &customer,
        AddToCartRequest {
            menu_item_id: item.id,
            size_id: Some(grande.id),
            quantity: 1,
            topping_ids: vec![],
        },
    )
    .await?;
    let second = order_service::checkout(
        &state,
        &customer,
        CheckoutRequest {
            payment_method: "cash".into(),
            payment_reference: None,
            customer_phone: "09171234567".into(),
            reward_id: None,
            idempotency_key: "order-2".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(second.order.total_amount, 15000);
    assert_eq!(second.order.payment_status, "pending");

    // P150 earns 3 points
    let points = reward_service::points_summary(&state, &customer)
        .await?
        .data
        .unwrap();
    assert_eq!(points.points, 23);

    // The tracked order is the latest one, behind the first
    let view = order_service::active_order(&state, &customer).await?.data.unwrap();
    assert_eq!(view.order.id, second.order.id);
    assert_eq!(view.position, 2);
    assert_eq!(view.position_display.label, "Your Position");
    assert_eq!(view.presentation.step, 1);
    assert!(view.presentation.message.starts_with("Estimated wait"));

    // Skipping a step is rejected
    let skip = queue_service::advance_status(
        &state,
        &barista,
        second.order.id,
        AdvanceStatusRequest {
            status: "ready".into(),
            estimated_minutes: None,
        },
    )
    .await;
    assert!(matches!(skip, Err(AppError::Conflict(_))));

    // Unknown statuses are rejected outright
    let unknown = queue_service::advance_status(
        &state,
        &barista,
        second.order.id,
        AdvanceStatusRequest {
            status: "delivered".into(),
            estimated_minutes: None,
        },
    )
    .await;
    assert!(matches!(unknown, Err(AppError::UnknownStatus(_))));

    // Customers cannot touch the queue
    let forbidden = queue_service::advance_status(
        &state,
        &customer,
        second.order.id,
        AdvanceStatusRequest {
            status: "preparing".into(),
            estimated_minutes: None,
        },
    )
    .await;
    assert!(matches!(forbidden, Err(AppError::Forbidden)));

    // Serve the first order fully; the second moves up
    for next in ["preparing", "ready", "completed"] {
        queue_service::advance_status(
            &state,
            &barista,
            placed.order.id,
            AdvanceStatusRequest {
                status: next.into(),
                estimated_minutes: None,
            },
        )
        .await?;
    }
    let view = order_service::active_order(&state, &customer).await?.data.unwrap();
    assert_eq!(view.position, 1);

    // Staff collect the cash
    let paid = queue_service::record_payment(&state, &barista, second.order.id)
        .await?
        .data
        .unwrap();
    assert_eq!(paid.payment_status, "paid");
    let again = queue_service::record_payment(&state, &barista, second.order.id).await;
    assert!(matches!(again, Err(AppError::BadRequest(_))));

    // Serve the second order and check the terminal queue view
    for next in ["preparing", "ready", "completed"] {
        queue_service::advance_status(
            &state,
            &barista,
            second.order.id,
            AdvanceStatusRequest {
                status: next.into(),
                estimated_minutes: Some(0),
            },
        )
        .await?;
    }
    let view = order_service::active_order(&state, &customer).await?.data.unwrap();
    assert_eq!(view.order.status, "completed");
    assert_eq!(view.position_display.label, "Enjoy!");
    assert!(view.presentation.celebrate);
    assert_eq!(view.presentation.message, "Thank you for your order!");

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_items, orders, cart_items, loyalty_entries, rewards, item_sizes, toppings, menu_items, audit_logs, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState {
        pool,
        orm,
        config: AppConfig {
            database_url: database_url.to_string(),
            host: "127.0.0.1".into(),
            port: 0,
            jwt_secret: "test-secret".into(),
        },
    })
}

async fn create_user(
    state: &AppState,
    role: &str,
    email: &str,
    points: i64,
) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        phone: Set(None),
        role: Set(role.into()),
        points: Set(points),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}
