pub mod collection_service;
pub mod follow_service;
pub mod ingredient_service;
pub mod recipe_service;
pub mod shopping_list_service;
pub mod tag_service;
pub mod user_service;
pub mod viewer;
