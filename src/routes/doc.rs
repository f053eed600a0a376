use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{AddToCartRequest, CartItemDto, CartList},
        menu::{
            CreateMenuItemRequest, CreateToppingRequest, MenuItemWithSizes, MenuList, SizePayload,
            ToppingList, UpdateMenuItemRequest, UpdateToppingRequest,
        },
        orders::{CheckoutRequest, OrderList, OrderWithItems},
        queue::{
            ActiveOrderView, AdvanceStatusRequest, PositionBadge, QueueEntry, QueueList,
            StatusBundle,
        },
        rewards::{CreateRewardRequest, PointsSummary, RewardList, UpdateRewardRequest},
    },
    models::{ItemSize, LoyaltyEntry, MenuItem, Order, OrderItem, Reward, Topping, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, health, menu, orders, params, queue, rewards},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        menu::list_menu,
        menu::get_menu_item,
        menu::create_menu_item,
        menu::update_menu_item,
        menu::delete_menu_item,
        menu::list_toppings,
        menu::create_topping,
        menu::update_topping,
        cart::cart_list,
        cart::add_to_cart,
        cart::remove_from_cart,
        orders::list_orders,
        orders::checkout,
        orders::active_order,
        orders::get_order,
        queue::list_queue,
        queue::advance_status,
        queue::record_payment,
        rewards::list_rewards,
        rewards::points_summary,
        rewards::create_reward,
        rewards::update_reward,
        admin::list_all_orders,
        admin::get_order_admin
    ),
    components(
        schemas(
            User,
            MenuItem,
            ItemSize,
            Topping,
            Order,
            OrderItem,
            Reward,
            LoyaltyEntry,
            SizePayload,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            CreateToppingRequest,
            UpdateToppingRequest,
            MenuItemWithSizes,
            MenuList,
            ToppingList,
            AddToCartRequest,
            CartItemDto,
            CartList,
            CheckoutRequest,
            OrderList,
            OrderWithItems,
            AdvanceStatusRequest,
            StatusBundle,
            PositionBadge,
            ActiveOrderView,
            QueueEntry,
            QueueList,
            CreateRewardRequest,
            UpdateRewardRequest,
            RewardList,
            PointsSummary,
            params::Pagination,
            params::MenuQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<Order>,
            ApiResponse<MenuList>,
            ApiResponse<CartList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<ActiveOrderView>,
            ApiResponse<QueueList>,
            ApiResponse<RewardList>,
            ApiResponse<PointsSummary>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Menu", description = "Menu browsing and management"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Checkout and order tracking"),
        (name = "Queue", description = "Pickup queue management (staff)"),
        (name = "Rewards", description = "Loyalty points and rewards"),
        (name = "Admin", description = "Admin oversight endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
