//! Domain primitives shared by the catalog, review and auth services.
//!
//! Nothing in here touches the database; the services compose these with
//! repository calls.

pub mod rating;
pub mod slug;

use serde::{Deserialize, Serialize};

pub use rating::mean_grade;
pub use slug::slugify;

/// Capability flags carried by a user and by the tokens issued to them.
///
/// The flags are independent: a supplier may also be a customer, and an
/// administrator may hold either of the other two.
///
/// # Examples
///
/// ```rust
/// use shopfront::domain::Roles;
///
/// let roles = Roles { is_supplier: true, is_customer: true, ..Roles::default() };
/// assert!(roles.can_manage_products());
/// assert!(roles.can_review());
/// assert!(!roles.can_moderate());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Roles {
    pub is_admin: bool,
    pub is_supplier: bool,
    pub is_customer: bool,
}

impl Roles {
    /// Roles given to a freshly registered account.
    #[must_use]
    pub const fn customer() -> Self {
        Self {
            is_admin: false,
            is_supplier: false,
            is_customer: true,
        }
    }

    /// May create products, and update or delete the ones they own.
    #[must_use]
    pub const fn can_manage_products(&self) -> bool {
        self.is_admin || self.is_supplier
    }

    #[must_use]
    pub const fn can_review(&self) -> bool {
        self.is_customer
    }

    /// Review removal, category management and user administration.
    #[must_use]
    pub const fn can_moderate(&self) -> bool {
        self.is_admin
    }
}

/// Grades accepted on a review.
pub const MIN_GRADE: i32 = 1;
pub const MAX_GRADE: i32 = 5;
