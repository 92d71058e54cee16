//! Locators derived from a profile's UI text

use super::DomainProfile;
use crate::navigation::locator::Locator;

/// Name of the order-group `<select>` on the order history page
pub const ORDER_FILTER: &str = "orderFilter";

/// Name of the "keep me signed in" checkbox on the password form
pub const REMEMBER_ME: &str = "rememberMe";

const ONE_TIME_CODE_FIELD: &str = "otpCode";

impl DomainProfile {
    pub fn sign_out_link(&self) -> Locator {
        Locator::anchor_containing_text(self.sign_out)
    }

    pub fn sign_in_link(&self) -> Locator {
        Locator::anchor_containing_text(self.sign_in)
    }

    pub fn username_field(&self) -> Locator {
        Locator::input_of_type("email")
    }

    pub fn password_field(&self) -> Locator {
        Locator::input_of_type("password")
    }

    pub fn remember_me_field(&self) -> Locator {
        Locator::input_named(REMEMBER_ME)
    }

    pub fn one_time_code_field(&self) -> Locator {
        Locator::input_named(ONE_TIME_CODE_FIELD)
    }

    pub fn your_orders_link(&self) -> Locator {
        Locator::anchor_with_text(self.your_orders)
    }

    pub fn order_filter(&self) -> Locator {
        Locator::select_named(ORDER_FILTER)
    }

    pub fn order_filter_options(&self) -> Locator {
        Locator::options_of_select(ORDER_FILTER)
    }

    /// Every anchor whose href carries an order id
    pub fn invoice_anchors(&self) -> Locator {
        Locator::anchor_with_href_containing(&format!("{}=", self.id_parameter))
    }

    pub fn next_page_link(&self) -> Locator {
        Locator::anchor_with_text(self.next_page)
    }

    /// Link to the digital orders section, when the locale has one
    pub fn digital_orders_link(&self) -> Option<Locator> {
        self.digital_orders.map(Locator::anchor_containing_text)
    }
}
