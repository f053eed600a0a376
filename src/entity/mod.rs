pub mod audit_logs;
pub mod cart_items;
pub mod item_sizes;
pub mod loyalty_entries;
pub mod menu_items;
pub mod order_items;
pub mod orders;
pub mod rewards;
pub mod toppings;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use cart_items::Entity as CartItems;
pub use item_sizes::Entity as ItemSizes;
pub use loyalty_entries::Entity as LoyaltyEntries;
pub use menu_items::Entity as MenuItems;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use rewards::Entity as Rewards;
pub use toppings::Entity as Toppings;
pub use users::Entity as Users;
