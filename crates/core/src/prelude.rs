//! Common imports.
//!
//! `use moonbeam::prelude::*;` brings in everything needed to load a menu, fill a cart and place
//! orders.

pub use crate::{
    cart::{Cart, CartError, CartLine, CartTotals, LineId},
    catalog::{
        Catalog, CatalogError,
        items::{Category, MenuItem, PerSize},
        locations::Location,
        options::{
            EspressoRoast, IceLevel, MilkType, OptionKind, Size, SweetenerType, SyrupFlavor,
            Temperature, Topping, ToppingAmount,
        },
    },
    clock::{Clock, ManualClock, SystemClock},
    customization::{
        CustomizationError, CustomizationRequest, DrinkCustomization, SweetenerSelection,
        SyrupSelection, ToppingSelection, normalize,
    },
    naming::generate_name,
    orders::{
        CheckoutDetails, Order, OrderError, OrderHistory, OrderId, OrderStatus, ProgressionPlan,
        StatusUpdate,
    },
    payment::{CardBrand, PaymentError, PaymentKind, PaymentMethod, Tip},
    pricing::{PriceTable, PricingError, compute_price},
    receipt::{ReceiptError, write_receipt},
    rewards::{RewardTier, Rewards, loyalty_points},
};
