//! Plain-text rendering of storefront views.

use std::io::{self, Write};

use serde_json::Value;

use customshop_core::Price;
use customshop_storefront::models::{Order, Product, SiteSettings, SocialPlatform, User};
use customshop_storefront::routes::{Route, resolve_route, show_mode_toggle};
use customshop_storefront::AppState;

/// Render whatever view the state routes to.
pub fn route(out: &mut impl Write, state: &AppState) -> io::Result<()> {
    match resolve_route(state) {
        Route::Auth => auth(out, state.settings()),
        Route::Admin => admin(out, state),
        Route::Customer => shop(out, state),
    }?;

    if show_mode_toggle(state) {
        let (label, target) = match resolve_route(state) {
            Route::Admin => ("shop", "customer"),
            _ => ("admin panel", "admin"),
        };
        writeln!(out)?;
        writeln!(out, "Switch to the {label}: customshop mode {target}")?;
    }
    Ok(())
}

fn auth(out: &mut impl Write, settings: &SiteSettings) -> io::Result<()> {
    writeln!(out, "Welcome to {}.", settings.shop_name)?;
    writeln!(out, "Log in:   customshop login -e <email> -p <password>")?;
    writeln!(out, "Register: customshop register -e <email> -p <password> -n <name>")
}

fn admin(out: &mut impl Write, state: &AppState) -> io::Result<()> {
    writeln!(out, "== {} - admin ==", state.settings().shop_name)?;
    writeln!(
        out,
        "Products: {}  Orders: {}  Revenue: {} €",
        state.products().len(),
        state.orders().len(),
        state.total_revenue()
    )?;
    writeln!(out)?;
    writeln!(out, "Catalog")?;
    products(out, state.products())?;
    writeln!(out)?;
    writeln!(out, "Orders")?;
    orders(out, state.orders())
}

fn shop(out: &mut impl Write, state: &AppState) -> io::Result<()> {
    let settings = state.settings();
    writeln!(out, "== {} ==", settings.shop_name)?;
    writeln!(out, "{}", settings.hero_title)?;
    writeln!(out, "{}", settings.hero_subtitle)?;
    writeln!(out)?;

    if state.products().is_empty() {
        writeln!(out, "No products yet.")?;
    }
    for product in state.products() {
        writeln!(
            out,
            "[{}] {} - {} € ({})",
            product.id, product.title, product.price, product.category
        )?;
        if !product.description.is_empty() {
            writeln!(out, "    {}", product.description)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", settings.footer_text)?;

    let links: Vec<String> = SocialPlatform::ALL
        .into_iter()
        .filter_map(|platform| {
            let link = settings.social_links.get(platform);
            (!link.is_empty()).then(|| format!("{} {link}", platform.key()))
        })
        .collect();
    if !links.is_empty() {
        writeln!(out, "Follow us: {}", links.join(", "))?;
    }

    if settings.show_chatbot {
        writeln!(out, "Questions? customshop chat <message>")?;
    }
    Ok(())
}

/// Who is logged in.
pub fn user(out: &mut impl Write, user: &User, is_admin: bool) -> io::Result<()> {
    let role = if is_admin { "administrator" } else { "customer" };
    writeln!(out, "{} <{}> ({role})", user.username, user.email)
}

/// One line per product.
pub fn products(out: &mut impl Write, products: &[Product]) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "  (none)");
    }
    for product in products {
        writeln!(
            out,
            "  {}  {}  {} €  [{}]",
            product.id, product.title, product.price, product.category
        )?;
    }
    Ok(())
}

/// One line per order.
pub fn orders(out: &mut impl Write, orders: &[Order]) -> io::Result<()> {
    if orders.is_empty() {
        return writeln!(out, "  (none)");
    }
    for order in orders {
        writeln!(
            out,
            "  {}  {}  {}  {} €  {} <{}>",
            order.id,
            order.date,
            order.product_title,
            order.price,
            order.customer_name,
            order.customer_email
        )?;
    }
    Ok(())
}

pub fn revenue(out: &mut impl Write, total: Price, count: usize) -> io::Result<()> {
    writeln!(out, "Total revenue: {total} € from {count} order(s)")
}

/// Every setting as `key: value`, keys as accepted by `settings set`.
pub fn settings(out: &mut impl Write, settings: &SiteSettings) -> io::Result<()> {
    let value = serde_json::to_value(settings).map_err(io::Error::other)?;
    write_fields(out, "", &value)
}

fn write_fields(out: &mut impl Write, prefix: &str, value: &Value) -> io::Result<()> {
    let Some(map) = value.as_object() else {
        return Ok(());
    };
    for (key, field) in map {
        match field {
            Value::Object(_) => write_fields(out, &format!("{prefix}{key}."), field)?,
            Value::String(s) => writeln!(out, "{prefix}{key}: {s}")?,
            other => writeln!(out, "{prefix}{key}: {other}")?,
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use customshop_storefront::models::{SettingsPatch, SocialLinksPatch};

    use super::*;
    use crate::commands::tests::{ADMIN_EMAIL, logged_in, output, state};

    fn render(state: &AppState) -> String {
        let mut buf = Vec::new();
        route(&mut buf, state).unwrap();
        output(buf)
    }

    #[test]
    fn test_logged_out_renders_auth() {
        let text = render(&state());
        assert!(text.starts_with("Welcome to My Custom Shop."));
        assert!(text.contains("customshop register"));
        assert!(!text.contains("Switch to"));
    }

    #[test]
    fn test_customer_renders_shop() {
        let mut state = logged_in("jane@example.com");
        state
            .update_settings(SettingsPatch {
                social_links: Some(SocialLinksPatch::single(
                    SocialPlatform::Instagram,
                    "https://instagram.com/shop",
                )),
                ..SettingsPatch::default()
            })
            .unwrap();

        let text = render(&state);
        assert!(text.starts_with("== My Custom Shop =="));
        assert!(text.contains("[1] Example Product - 99.00 € (General)"));
        assert!(text.contains("Follow us: instagram https://instagram.com/shop"));
        assert!(text.contains("customshop chat"));
        assert!(!text.contains("Switch to"));
    }

    #[test]
    fn test_admin_renders_dashboard_with_toggle() {
        let mut state = logged_in(ADMIN_EMAIL);
        let text = render(&state);
        assert!(text.contains("- admin =="));
        assert!(text.contains("Products: 1  Orders: 0  Revenue: 0.00 €"));
        assert!(text.contains("Switch to the shop: customshop mode customer"));

        state
            .set_view_mode(customshop_storefront::models::ViewMode::Customer)
            .unwrap();
        let text = render(&state);
        assert!(text.contains("Switch to the admin panel: customshop mode admin"));
    }

    #[test]
    fn test_settings_lists_camel_case_keys() {
        let mut buf = Vec::new();
        settings(&mut buf, &SiteSettings::default()).unwrap();
        let text = output(buf);
        assert!(text.contains("shopName: My Custom Shop\n"));
        assert!(text.contains("showChatbot: true\n"));
        assert!(text.contains("socialLinks.tiktok: \n"));
    }
}
