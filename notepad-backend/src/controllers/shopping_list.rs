//! Shopping list endpoints, backed by the note titled "Shopping List".
//!
//! Every mutation loads the current list out of the note, applies the
//! change in memory and writes the canonical text form back, so the note
//! stays editable as plain text alongside these routes.

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::shopping::{ShoppingItem, ShoppingList};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveShoppingListRequest {
    #[serde(default)]
    pub items: Vec<ShoppingItem>,
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    #[serde(default)]
    pub text: String,
}

fn load_failed() -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Failed to load shopping list"
    }))
}

fn save_failed() -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Failed to save shopping list"
    }))
}

fn items_json(list: &ShoppingList) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "items": list.items
    }))
}

/// Current list, parsed out of the shopping note. An absent note is an
/// empty list, not an error.
pub async fn get_shopping_list(state: web::Data<AppState>) -> impl Responder {
    match ShoppingList::load(&state.db) {
        Ok(list) => items_json(&list),
        Err(e) => {
            log::error!("Failed to load shopping list: {}", e);
            load_failed()
        }
    }
}

/// Replace the whole list, writing it back into the shopping note
pub async fn save_shopping_list(
    state: web::Data<AppState>,
    body: web::Json<SaveShoppingListRequest>,
) -> impl Responder {
    let request = body.into_inner();

    if request.items.iter().any(|item| item.text.trim().is_empty()) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Item text is required"
        }));
    }

    match ShoppingList::new(request.items).save(&state.db) {
        Ok(note) => HttpResponse::Ok().json(note),
        Err(e) => {
            log::error!("Failed to save shopping list: {}", e);
            save_failed()
        }
    }
}

/// Append one open item
pub async fn add_item(
    state: web::Data<AppState>,
    body: web::Json<AddItemRequest>,
) -> impl Responder {
    let request = body.into_inner();

    let mut list = match ShoppingList::load(&state.db) {
        Ok(list) => list,
        Err(e) => {
            log::error!("Failed to load shopping list: {}", e);
            return load_failed();
        }
    };

    if !list.add(&request.text) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Item text is required"
        }));
    }

    match list.save(&state.db) {
        Ok(_) => items_json(&list),
        Err(e) => {
            log::error!("Failed to save shopping list: {}", e);
            save_failed()
        }
    }
}

/// Flip completion of the item at `index`
pub async fn toggle_item(state: web::Data<AppState>, path: web::Path<usize>) -> impl Responder {
    let index = path.into_inner();

    let mut list = match ShoppingList::load(&state.db) {
        Ok(list) => list,
        Err(e) => {
            log::error!("Failed to load shopping list: {}", e);
            return load_failed();
        }
    };

    if !list.toggle(index) {
        return HttpResponse::NotFound().json(serde_json::json!({
            "error": "Item not found"
        }));
    }

    match list.save(&state.db) {
        Ok(_) => items_json(&list),
        Err(e) => {
            log::error!("Failed to save shopping list: {}", e);
            save_failed()
        }
    }
}

/// Remove the item at `index`
pub async fn remove_item(state: web::Data<AppState>, path: web::Path<usize>) -> impl Responder {
    let index = path.into_inner();

    let mut list = match ShoppingList::load(&state.db) {
        Ok(list) => list,
        Err(e) => {
            log::error!("Failed to load shopping list: {}", e);
            return load_failed();
        }
    };

    if !list.remove(index) {
        return HttpResponse::NotFound().json(serde_json::json!({
            "error": "Item not found"
        }));
    }

    match list.save(&state.db) {
        Ok(_) => items_json(&list),
        Err(e) => {
            log::error!("Failed to save shopping list: {}", e);
            save_failed()
        }
    }
}

/// Drop every item, leaving an empty list in the note
pub async fn clear_items(state: web::Data<AppState>) -> impl Responder {
    let mut list = match ShoppingList::load(&state.db) {
        Ok(list) => list,
        Err(e) => {
            log::error!("Failed to load shopping list: {}", e);
            return load_failed();
        }
    };

    list.clear();

    match list.save(&state.db) {
        Ok(_) => items_json(&list),
        Err(e) => {
            log::error!("Failed to save shopping list: {}", e);
            save_failed()
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/shopping-list")
            .route("", web::get().to(get_shopping_list))
            .route("", web::put().to(save_shopping_list))
            .route("", web::delete().to(clear_items))
            .route("/items", web::post().to(add_item))
            .route("/items/{index}", web::patch().to(toggle_item))
            .route("/items/{index}", web::delete().to(remove_item)),
    );
}
