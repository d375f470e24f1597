//! Order commands.

use std::io::Write;

use rand::Rng;

use customshop_core::{OrderId, ProductId};
use customshop_storefront::AppState;
use customshop_storefront::services::forms::CheckoutForm;

use super::{CliError, require_admin, require_user};
use crate::render;

pub fn list(state: &AppState, out: &mut impl Write) -> Result<(), CliError> {
    require_admin(state)?;
    render::orders(out, state.orders())?;
    Ok(())
}

pub fn delete(state: &mut AppState, out: &mut impl Write, id: &str) -> Result<(), CliError> {
    require_admin(state)?;
    if state.delete_order(&OrderId::new(id))? {
        writeln!(out, "Deleted order {id}.")?;
        Ok(())
    } else {
        Err(CliError::OrderNotFound(id.to_owned()))
    }
}

/// Record `count` simulated sales.
pub fn simulate<R: Rng + ?Sized>(
    state: &mut AppState,
    out: &mut impl Write,
    count: u32,
    rng: &mut R,
) -> Result<(), CliError> {
    require_admin(state)?;
    for _ in 0..count {
        let order = state.simulate_sale(rng)?;
        writeln!(
            out,
            "Sold {} to {} for {} €",
            order.product_title, order.customer_name, order.price
        )?;
    }
    render::revenue(out, state.total_revenue(), state.orders().len())?;
    Ok(())
}

pub fn revenue(state: &AppState, out: &mut impl Write) -> Result<(), CliError> {
    require_admin(state)?;
    render::revenue(out, state.total_revenue(), state.orders().len())?;
    Ok(())
}

/// Buy a product as the logged-in user.
pub fn checkout(
    state: &mut AppState,
    out: &mut impl Write,
    product_id: &str,
    name: String,
    email: String,
    address: String,
) -> Result<(), CliError> {
    require_user(state)?;
    let form = CheckoutForm {
        name,
        email,
        address,
    };
    let order = state.checkout(&ProductId::new(product_id), &form)?;
    writeln!(
        out,
        "Thank you, {}! Order {} for {} ({} €) is confirmed.",
        order.customer_name, order.id, order.product_title, order.price
    )?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::commands::tests::{ADMIN_EMAIL, logged_in, output, state};

    fn buy(state: &mut AppState, product_id: &str) -> Result<(), CliError> {
        checkout(
            state,
            &mut Vec::new(),
            product_id,
            "Jane Doe".to_owned(),
            "jane@example.com".to_owned(),
            "1 Main St".to_owned(),
        )
    }

    #[test]
    fn test_checkout_records_order() {
        let mut state = logged_in("jane@example.com");
        buy(&mut state, "1").unwrap();
        assert_eq!(state.orders().len(), 1);
        assert_eq!(state.orders()[0].product_title, "Example Product");
        assert_eq!(state.total_revenue().to_string(), "99.00");
    }

    #[test]
    fn test_checkout_requires_login_and_known_product() {
        let mut anonymous = state();
        assert!(matches!(buy(&mut anonymous, "1"), Err(CliError::NotLoggedIn)));

        let mut state = logged_in("jane@example.com");
        let err = buy(&mut state, "missing").unwrap_err();
        assert_eq!(err.user_message(), "This product is no longer available.");
        assert!(state.orders().is_empty());
    }

    #[test]
    fn test_simulate_and_revenue() {
        let mut state = logged_in(ADMIN_EMAIL);
        let mut rng = StdRng::seed_from_u64(7);
        let mut buf = Vec::new();
        simulate(&mut state, &mut buf, 3, &mut rng).unwrap();
        assert_eq!(state.orders().len(), 3);
        assert!(output(buf).ends_with("Total revenue: 297.00 € from 3 order(s)\n"));

        let mut buf = Vec::new();
        revenue(&state, &mut buf).unwrap();
        assert_eq!(output(buf), "Total revenue: 297.00 € from 3 order(s)\n");
    }

    #[test]
    fn test_simulate_with_empty_catalog() {
        let mut state = logged_in(ADMIN_EMAIL);
        state.delete_product(&ProductId::new("1")).unwrap();
        let err = simulate(&mut state, &mut Vec::new(), 1, &mut StdRng::seed_from_u64(1)).unwrap_err();
        assert_eq!(err.user_message(), "Add at least one product to simulate a sale!");
    }

    #[test]
    fn test_order_admin_commands_reject_customers() {
        let mut state = logged_in("jane@example.com");
        buy(&mut state, "1").unwrap();
        let id = state.orders()[0].id.to_string();

        assert!(matches!(list(&state, &mut Vec::new()), Err(CliError::AdminOnly)));
        assert!(matches!(
            delete(&mut state, &mut Vec::new(), &id),
            Err(CliError::AdminOnly)
        ));
        assert_eq!(state.orders().len(), 1);
    }
}
