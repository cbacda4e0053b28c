//! Role checks applied by the services before any mutation.

use thiserror::Error;

use crate::auth::Claims;
use crate::entities::products;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct AccessDenied(pub &'static str);

const NOT_AUTHORIZED: &str = "You are not authorized to use this method";

/// Product creation: administrators and suppliers.
pub const fn require_product_manager(caller: &Claims) -> Result<(), AccessDenied> {
    if caller.roles().can_manage_products() {
        Ok(())
    } else {
        Err(AccessDenied(NOT_AUTHORIZED))
    }
}

/// Product update/delete: administrators, or the supplier who owns it.
pub fn require_product_owner(
    caller: &Claims,
    product: &products::Model,
) -> Result<(), AccessDenied> {
    require_product_manager(caller)?;

    if caller.is_admin || product.supplier_id == Some(caller.id) {
        Ok(())
    } else {
        Err(AccessDenied(NOT_AUTHORIZED))
    }
}

pub const fn require_customer(caller: &Claims) -> Result<(), AccessDenied> {
    if caller.roles().can_review() {
        Ok(())
    } else {
        Err(AccessDenied("You must be a customer to leave a review"))
    }
}

pub const fn require_admin(caller: &Claims) -> Result<(), AccessDenied> {
    if caller.roles().can_moderate() {
        Ok(())
    } else {
        Err(AccessDenied(NOT_AUTHORIZED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(id: i32, is_admin: bool, is_supplier: bool, is_customer: bool) -> Claims {
        Claims {
            sub: format!("user{id}"),
            id,
            is_admin,
            is_supplier,
            is_customer,
            exp: 0,
            iat: 0,
        }
    }

    fn product(supplier_id: Option<i32>) -> products::Model {
        products::Model {
            id: 1,
            name: "Lamp".to_string(),
            slug: "lamp".to_string(),
            description: String::new(),
            price: 100,
            image_url: String::new(),
            stock: 1,
            supplier_id,
            category_id: 1,
            rating: 0.0,
            is_active: true,
        }
    }

    #[test]
    fn test_product_manager() {
        assert!(require_product_manager(&claims(1, true, false, false)).is_ok());
        assert!(require_product_manager(&claims(1, false, true, false)).is_ok());
        assert!(require_product_manager(&claims(1, false, false, true)).is_err());
    }

    #[test]
    fn test_product_owner() {
        let owned = product(Some(2));
        assert!(require_product_owner(&claims(2, false, true, false), &owned).is_ok());
        assert!(require_product_owner(&claims(3, false, true, false), &owned).is_err());
        assert!(require_product_owner(&claims(9, true, false, false), &owned).is_ok());
        // Ownership alone is not enough once the supplier flag is revoked
        assert!(require_product_owner(&claims(2, false, false, true), &owned).is_err());
    }

    #[test]
    fn test_unowned_product_is_admin_only() {
        let orphan = product(None);
        assert!(require_product_owner(&claims(2, false, true, false), &orphan).is_err());
        assert!(require_product_owner(&claims(1, true, false, false), &orphan).is_ok());
    }

    #[test]
    fn test_customer_and_admin() {
        assert!(require_customer(&claims(1, false, false, true)).is_ok());
        assert!(require_customer(&claims(1, true, true, false)).is_err());
        assert!(require_admin(&claims(1, true, false, false)).is_ok());
        assert!(require_admin(&claims(1, false, true, true)).is_err());
    }
}
