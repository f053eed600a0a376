pub mod admin_service;
pub mod auth_service;
pub mod cart_service;
pub mod menu_service;
pub mod order_service;
pub mod queue_service;
pub mod reward_service;
pub mod validation;
