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
        auth::{LoginRequest, LoginResponse, RegisterRequest, SetPasswordRequest},
        recipes::{IngredientAmount, RecipeList, RecipePayload},
        users::{SubscriptionList, UserList},
    },
    models::{Ingredient, Recipe, RecipeIngredient, RecipeShort, Subscription, Tag, User},
    response::{ApiResponse, Meta},
    routes::{auth, health, ingredients, params, recipes, tags, users},
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
        auth::logout,
        users::register,
        users::list_users,
        users::get_user,
        users::me,
        users::set_password,
        users::subscriptions,
        users::subscribe,
        users::unsubscribe,
        tags::list_tags,
        tags::get_tag,
        ingredients::list_ingredients,
        ingredients::get_ingredient,
        recipes::list_recipes,
        recipes::get_recipe,
        recipes::create_recipe,
        recipes::update_recipe,
        recipes::delete_recipe,
        recipes::add_favorite,
        recipes::remove_favorite,
        recipes::add_to_shopping_cart,
        recipes::remove_from_shopping_cart,
        recipes::download_shopping_cart
    ),
    components(
        schemas(
            User,
            Tag,
            Ingredient,
            Recipe,
            RecipeIngredient,
            RecipeShort,
            Subscription,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            SetPasswordRequest,
            IngredientAmount,
            RecipePayload,
            RecipeList,
            UserList,
            SubscriptionList,
            params::Pagination,
            params::IngredientQuery,
            params::SubscriptionQuery,
            health::HealthData,
            Meta,
            ApiResponse<Recipe>,
            ApiResponse<RecipeList>,
            ApiResponse<RecipeShort>,
            ApiResponse<User>,
            ApiResponse<UserList>,
            ApiResponse<Subscription>,
            ApiResponse<SubscriptionList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Token issuance"),
        (name = "Users", description = "User endpoints"),
        (name = "Subscriptions", description = "Following authors"),
        (name = "Tags", description = "Recipe tags"),
        (name = "Ingredients", description = "Ingredient search"),
        (name = "Recipes", description = "Recipe endpoints"),
        (name = "Favourites", description = "Favourite recipes"),
        (name = "Shopping cart", description = "Shopping cart and list export"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
