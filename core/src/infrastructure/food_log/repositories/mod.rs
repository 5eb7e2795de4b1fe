pub mod food_item_repository;

pub use food_item_repository::PostgresFoodItemRepository;
