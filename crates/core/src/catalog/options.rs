//! Customization options
//!
//! Every option is a closed enum with a stable kebab-case key. The key is what appears in
//! catalog YAML and what the CLI accepts; parsing an unknown key is an
//! [`InvalidOption`](crate::customization::CustomizationError::InvalidOption).

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::customization::CustomizationError;

/// The family an option key belongs to, used when reporting bad keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    /// Cup size
    Size,
    /// Serving temperature
    Temperature,
    /// Milk
    Milk,
    /// Espresso roast
    EspressoRoast,
    /// Syrup flavor
    Syrup,
    /// Topping
    Topping,
    /// Topping amount
    ToppingAmount,
    /// Sweetener
    Sweetener,
    /// Ice level
    IceLevel,
}

impl Display for OptionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let label = match self {
            Self::Size => "size",
            Self::Temperature => "temperature",
            Self::Milk => "milk",
            Self::EspressoRoast => "espresso roast",
            Self::Syrup => "syrup",
            Self::Topping => "topping",
            Self::ToppingAmount => "topping amount",
            Self::Sweetener => "sweetener",
            Self::IceLevel => "ice level",
        };

        f.write_str(label)
    }
}

macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $name:ident => $kind:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $key:tt ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $key)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The stable key for this option.
            #[must_use]
            pub const fn key(self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                f.write_str(self.key())
            }
        }

        impl FromStr for $name {
            type Err = CustomizationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($key => Ok(Self::$variant),)+
                    other => Err(CustomizationError::InvalidOption {
                        kind: OptionKind::$kind,
                        key: other.to_string(),
                    }),
                }
            }
        }
    };
}

option_enum! {
    /// Cup size
    Size => Size {
        /// 12 oz
        Tall = "tall",
        /// 16 oz
        Grande = "grande",
        /// 20 oz
        Venti = "venti",
    }
}

impl Size {
    /// Label used in generated drink names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tall => "Tall",
            Self::Grande => "Grande",
            Self::Venti => "Venti",
        }
    }
}

option_enum! {
    /// Serving temperature
    Temperature => Temperature {
        /// Hot
        Hot = "hot",
        /// Over ice
        Iced = "iced",
        /// Blended with ice
        Blended = "blended",
    }
}

option_enum! {
    /// Milk
    MilkType => Milk {
        /// Whole milk
        Whole = "whole",
        /// Nonfat milk
        Skim = "skim",
        /// 2% milk
        TwoPercent = "2percent",
        /// Oat milk
        Oat = "oat",
        /// Almond milk
        Almond = "almond",
        /// Soy milk
        Soy = "soy",
        /// Coconut milk
        Coconut = "coconut",
        /// Oat milk foam
        OatmilkFoam = "oatmilk-foam",
    }
}

impl MilkType {
    /// The standard dairy milks, which are never called out in drink names.
    #[must_use]
    pub const fn is_default_dairy(self) -> bool {
        matches!(self, Self::Whole | Self::TwoPercent)
    }

    /// Label used in generated drink names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Whole => "Whole",
            Self::Skim => "Nonfat",
            Self::TwoPercent => "2%",
            Self::Oat => "Oatmilk",
            Self::Almond => "Almondmilk",
            Self::Soy => "Soy",
            Self::Coconut => "Coconut",
            Self::OatmilkFoam => "Oatmilk Foam",
        }
    }
}

option_enum! {
    /// Espresso roast
    EspressoRoast => EspressoRoast {
        /// House roast
        Signature = "signature",
        /// Blonde roast
        Blonde = "blonde",
        /// Decaf
        Decaf = "decaf",
    }
}

option_enum! {
    /// Syrup flavor
    SyrupFlavor => Syrup {
        /// Vanilla
        Vanilla = "vanilla",
        /// Caramel
        Caramel = "caramel",
        /// Hazelnut
        Hazelnut = "hazelnut",
        /// Mocha
        Mocha = "mocha",
        /// White mocha
        WhiteMocha = "white-mocha",
        /// Toffee nut
        ToffeeNut = "toffee-nut",
        /// Peppermint
        Peppermint = "peppermint",
        /// Raspberry
        Raspberry = "raspberry",
        /// Cinnamon dolce
        CinnamonDolce = "cinnamon-dolce",
        /// Brown sugar
        BrownSugar = "brown-sugar",
        /// Lavender
        Lavender = "lavender",
        /// Pistachio
        Pistachio = "pistachio",
    }
}

option_enum! {
    /// Topping
    Topping => Topping {
        /// Whipped cream
        WhippedCream = "whipped-cream",
        /// Caramel drizzle
        CaramelDrizzle = "caramel-drizzle",
        /// Mocha drizzle
        MochaDrizzle = "mocha-drizzle",
        /// Cinnamon powder
        CinnamonPowder = "cinnamon-powder",
        /// Vanilla powder
        VanillaPowder = "vanilla-powder",
        /// Cold foam
        ColdFoam = "cold-foam",
        /// Salted cream cold foam
        SaltedCreamFoam = "salted-cream-foam",
        /// Chocolate curls
        ChocolateCurls = "chocolate-curls",
        /// Cookie crumbles
        CookieCrumbles = "cookie-crumbles",
    }
}

option_enum! {
    /// How much of a topping goes on.
    ToppingAmount => ToppingAmount {
        /// Light
        Light = "light",
        /// Regular
        Regular = "regular",
        /// Extra, charged at one and a half times the topping price
        Extra = "extra",
    }
}

option_enum! {
    /// Sweetener
    SweetenerType => Sweetener {
        /// Classic syrup
        ClassicSyrup = "classic-syrup",
        /// Liquid cane sugar
        LiquidCaneSugar = "liquid-cane-sugar",
        /// Honey
        Honey = "honey",
        /// Stevia
        Stevia = "stevia",
        /// Splenda
        Splenda = "splenda",
        /// Raw sugar
        RawSugar = "raw-sugar",
    }
}

option_enum! {
    /// Ice level for iced and blended drinks.
    IceLevel => IceLevel {
        /// No ice
        NoIce = "no-ice",
        /// Light ice
        Light = "light",
        /// Regular ice
        Regular = "regular",
        /// Extra ice
        Extra = "extra",
    }
}
