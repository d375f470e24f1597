//! Catalog commands (administrator only, except listing).

use std::io::Write;

use customshop_core::ProductId;
use customshop_storefront::{AppError, AppState};
use customshop_storefront::assistant::{Assistant, ConfiguredGenerator, TextGenerator};
use customshop_storefront::config::GeminiConfig;
use customshop_storefront::models::Product;
use customshop_storefront::services::forms::ProductForm;

use super::{CliError, require_admin, require_user};
use crate::render;

/// Changes requested by `products edit`. `None` keeps the current value.
#[derive(Debug, Default)]
pub struct ProductEdit {
    pub title: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

pub const fn product_form(
    title: String,
    price: String,
    category: String,
    image_url: String,
) -> ProductForm {
    ProductForm {
        title,
        price,
        category,
        image_url,
    }
}

pub fn list(state: &AppState, out: &mut impl Write) -> Result<(), CliError> {
    require_user(state)?;
    render::products(out, state.products())?;
    Ok(())
}

/// Add a product with a generated description.
pub async fn add(
    state: &mut AppState,
    out: &mut impl Write,
    form: &ProductForm,
    gemini: Option<&GeminiConfig>,
) -> Result<(), CliError> {
    require_admin(state)?;
    let assistant = Assistant::new(ConfiguredGenerator::from_config(gemini).map_err(AppError::from)?);
    add_with(state, out, form, &assistant).await
}

async fn add_with<G: TextGenerator>(
    state: &mut AppState,
    out: &mut impl Write,
    form: &ProductForm,
    assistant: &Assistant<G>,
) -> Result<(), CliError> {
    writeln!(out, "Writing a description...")?;
    match state.create_product(form, assistant).await? {
        Some(product) => {
            writeln!(out, "Added product {}: {}", product.id, product.title)?;
            writeln!(out, "  {}", product.description)?;
        }
        None => writeln!(out, "Product form was closed; nothing added.")?,
    }
    Ok(())
}

/// Apply `edit` to an existing product. The result is validated like a new
/// product form.
pub fn edit(
    state: &mut AppState,
    out: &mut impl Write,
    id: &str,
    edit: ProductEdit,
) -> Result<(), CliError> {
    require_admin(state)?;
    let id = ProductId::new(id);
    let current = state
        .product(&id)
        .cloned()
        .ok_or_else(|| CliError::ProductNotFound(id.to_string()))?;

    let updated = apply_edit(current, edit)?;
    state.update_product(updated.clone())?;
    writeln!(out, "Updated product {}: {} ({} €)", updated.id, updated.title, updated.price)?;
    Ok(())
}

fn apply_edit(current: Product, edit: ProductEdit) -> Result<Product, CliError> {
    // An untouched price is carried over exactly, not re-parsed from text.
    let kept_price = edit.price.is_none().then_some(current.price);
    let form = ProductForm {
        title: edit.title.unwrap_or(current.title),
        price: edit.price.unwrap_or_default(),
        category: edit.category.unwrap_or(current.category),
        image_url: edit.image_url.unwrap_or(current.image_url),
    };
    let mut draft = form.validate().map_err(AppError::from)?;
    if let Some(price) = kept_price {
        draft.price = price;
    }
    let description = edit.description.unwrap_or(current.description);
    Ok(draft.into_product(current.id, description))
}

pub fn delete(state: &mut AppState, out: &mut impl Write, id: &str) -> Result<(), CliError> {
    require_admin(state)?;
    if state.delete_product(&ProductId::new(id))? {
        writeln!(out, "Deleted product {id}.")?;
        Ok(())
    } else {
        Err(CliError::ProductNotFound(id.to_owned()))
    }
}
