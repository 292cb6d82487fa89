//! Moonbeam ordering CLI

use std::{
    io::{self, Write},
    process,
    str::FromStr,
    sync::Arc,
};

use clap::{Args, Parser, Subcommand};
use moonbeam::{
    cart::Cart,
    catalog::{
        Catalog,
        items::Category,
        parse_price,
        options::{
            EspressoRoast, IceLevel, MilkType, Size, SweetenerType, SyrupFlavor, Temperature,
            Topping, ToppingAmount,
        },
    },
    clock::SystemClock,
    customization::{
        CustomizationRequest, SweetenerSelection, SyrupSelection, ToppingSelection,
    },
    payment::{PaymentMethod, Tip},
    receipt::write_receipt,
};
use moonbeam_app::{
    config::AppConfig,
    identity::{StaticIdentity, User, UserId},
    loyalty::InMemoryLoyaltyLedger,
    observability,
    payments::SimulatedPaymentProcessor,
    persistence::InMemoryOrderStore,
    session::{CheckoutRequest, Services, Session},
};
use rusty_money::{Money, iso::Currency};

#[derive(Debug, Parser)]
#[command(name = "moonbeam", about = "Moonbeam café ordering CLI", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List menu items
    Menu(MenuArgs),

    /// List pickup locations
    Locations,

    /// Price and name a customized item
    Quote(QuoteArgs),

    /// Order items and print the receipt
    Checkout(CheckoutArgs),
}

#[derive(Debug, Args)]
struct MenuArgs {
    /// Only show this category (e.g. cold-brew, pastries)
    #[arg(long, value_parser = parse_category)]
    category: Option<Category>,

    /// Only show items whose name, description or tags contain this text
    #[arg(long)]
    search: Option<String>,
}

#[derive(Debug, Args)]
struct QuoteArgs {
    /// Menu item id
    item: String,

    /// How many
    #[arg(long, default_value_t = 1)]
    quantity: u32,

    #[command(flatten)]
    customize: CustomizeArgs,
}

#[derive(Debug, Args)]
struct CheckoutArgs {
    /// Items as ID or ID:QUANTITY
    #[arg(required = true, value_parser = parse_item)]
    items: Vec<(String, u32)>,

    /// Pickup location id
    #[arg(long)]
    location: String,

    /// Name called at pickup; defaults to the member name
    #[arg(long)]
    name: Option<String>,

    /// Sign in as a member with this name to earn stars
    #[arg(long)]
    member: Option<String>,

    /// Tip as a percentage of the subtotal
    #[arg(long, default_value_t = 0)]
    tip: u8,

    /// apple-pay, google-pay, card:NUMBER or moonbeam:BALANCE
    #[arg(long, default_value = "apple-pay")]
    payment: PaymentArg,

    /// Customizations applied to every drink in the order
    #[command(flatten)]
    customize: CustomizeArgs,
}

#[derive(Debug, Clone, Args)]
struct CustomizeArgs {
    /// Cup size (tall, grande, venti)
    #[arg(long)]
    size: Option<Size>,

    /// hot, iced or blended
    #[arg(long = "temp")]
    temperature: Option<Temperature>,

    /// Milk (whole, skim, 2percent, oat, almond, soy, coconut, oatmilk-foam)
    #[arg(long)]
    milk: Option<MilkType>,

    /// Espresso roast (signature, blonde, decaf)
    #[arg(long)]
    roast: Option<EspressoRoast>,

    /// Extra espresso shots
    #[arg(long)]
    shots: Option<u8>,

    /// Syrup as FLAVOR or FLAVOR=PUMPS; repeatable
    #[arg(long = "syrup", value_parser = parse_syrup)]
    syrups: Vec<SyrupSelection>,

    /// Topping as TOPPING or TOPPING=AMOUNT; repeatable
    #[arg(long = "topping", value_parser = parse_topping)]
    toppings: Vec<ToppingSelection>,

    /// Sweetener as TYPE or TYPE=PACKETS; repeatable
    #[arg(long = "sweetener", value_parser = parse_sweetener)]
    sweeteners: Vec<SweetenerSelection>,

    /// Ice level (no-ice, light, regular, extra)
    #[arg(long)]
    ice: Option<IceLevel>,

    /// Special instructions for the barista
    #[arg(long)]
    note: Option<String>,

    /// Drop the item's default syrups, toppings and sweeteners
    #[arg(long)]
    plain: bool,
}

impl CustomizeArgs {
    fn request(&self) -> CustomizationRequest {
        CustomizationRequest {
            size: self.size,
            temperature: self.temperature,
            milk: self.milk,
            espresso_roast: self.roast,
            espresso_shots: self.shots,
            syrups: selections_of(&self.syrups, self.plain),
            toppings: selections_of(&self.toppings, self.plain),
            sweeteners: selections_of(&self.sweeteners, self.plain),
            ice_level: self.ice,
            instructions: self.note.clone(),
        }
    }
}

fn selections_of<T: Clone>(chosen: &[T], plain: bool) -> Option<Vec<T>> {
    if chosen.is_empty() && !plain {
        None
    } else {
        Some(chosen.to_vec())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PaymentArg {
    ApplePay,
    GooglePay,
    Card(String),
    MoonbeamCard(String),
}

impl FromStr for PaymentArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once(':') {
            None if s.trim() == "apple-pay" => Ok(Self::ApplePay),
            None if s.trim() == "google-pay" => Ok(Self::GooglePay),
            Some(("card", number)) => Ok(Self::Card(number.to_string())),
            Some(("moonbeam", balance)) => Ok(Self::MoonbeamCard(balance.to_string())),
            _ => Err(format!("unknown payment method: {s}")),
        }
    }
}

impl PaymentArg {
    fn into_method(self, currency: &'static Currency) -> Result<PaymentMethod, String> {
        match self {
            Self::ApplePay => Ok(PaymentMethod::apple_pay()),
            Self::GooglePay => Ok(PaymentMethod::google_pay()),
            Self::Card(number) => PaymentMethod::card(&number).map_err(|error| error.to_string()),
            Self::MoonbeamCard(balance) => {
                let (minor, _) = parse_price(&format!("{balance} {}", currency.iso_alpha_code))
                    .map_err(|error| format!("invalid card balance {balance}: {error}"))?;

                Ok(PaymentMethod::moonbeam_card(Money::from_minor(minor, currency)))
            }
        }
    }
}

#[tokio::main]
pub async fn main() {
    let cli = match Cli::load() {
        Ok(cli) => cli,
        Err(error) => error.exit(),
    };

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

impl Cli {
    fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    observability::init_subscriber(&cli.config.logging).map_err(|error| error.to_string())?;

    let catalog = cli
        .config
        .load_catalog()
        .map_err(|error| format!("failed to load catalog: {error}"))?;

    match cli.command {
        Commands::Menu(args) => menu(&catalog, &args),
        Commands::Locations => locations(&catalog),
        Commands::Quote(args) => quote(&catalog, &args),
        Commands::Checkout(args) => checkout(&cli.config, catalog, args).await,
    }
}

fn menu(catalog: &Catalog, args: &MenuArgs) -> Result<(), String> {
    let mut out = io::stdout().lock();
    let query = args.search.as_deref().unwrap_or_default();

    for category in Category::ALL
        .iter()
        .filter(|category| args.category.is_none_or(|wanted| wanted == **category))
    {
        let items: Vec<_> = catalog
            .in_category(*category)
            .filter(|item| item.matches(query))
            .collect();

        if items.is_empty() {
            continue;
        }

        writeln!(out, "{category}").map_err(|error| error.to_string())?;

        for item in items {
            let badge = if item.is_new() {
                " (new)"
            } else if item.is_seasonal() {
                " (seasonal)"
            } else {
                ""
            };

            writeln!(
                out,
                "  {:<28}{:<34}{}{badge}",
                item.id(),
                item.name(),
                item.price()
            )
            .map_err(|error| error.to_string())?;
        }
    }

    Ok(())
}

fn locations(catalog: &Catalog) -> Result<(), String> {
    let mut out = io::stdout().lock();

    for location in catalog.locations() {
        let status = if location.is_open {
            format!("~{} min", location.estimated_wait_minutes)
        } else {
            "closed".to_string()
        };

        writeln!(
            out,
            "{:<14}{:<28}{:<36}{status}",
            location.id, location.name, location.address
        )
        .map_err(|error| error.to_string())?;
    }

    Ok(())
}

fn quote(catalog: &Catalog, args: &QuoteArgs) -> Result<(), String> {
    let item = catalog
        .item(&args.item)
        .ok_or_else(|| format!("unknown menu item: {}", args.item))?;

    let mut cart = Cart::new(catalog.prices().clone());
    let line = cart
        .add(item, &args.customize.request(), args.quantity)
        .map_err(|error| error.to_string())?;

    let line = cart.line(line).ok_or("quoted line missing from cart")?;
    let total = line.total().map_err(|error| error.to_string())?;

    let mut out = io::stdout().lock();

    writeln!(out, "{}", line.name()).map_err(|error| error.to_string())?;
    writeln!(out, "{} x {} = {total}", line.quantity(), line.unit_price())
        .map_err(|error| error.to_string())?;

    Ok(())
}

async fn checkout(config: &AppConfig, catalog: Catalog, args: CheckoutArgs) -> Result<(), String> {
    let payment = args.payment.into_method(catalog.currency())?;

    let identity = match args.member {
        Some(name) => StaticIdentity::signed_in(User {
            id: UserId::generate(),
            name,
            email: String::new(),
        }),
        None => StaticIdentity::guest(),
    };

    let services = Services {
        clock: Arc::new(SystemClock),
        identity: Arc::new(identity),
        orders: Arc::new(InMemoryOrderStore::new()),
        payments: Arc::new(SimulatedPaymentProcessor::new(config.payment_delay())),
        loyalty: Arc::new(InMemoryLoyaltyLedger::new()),
    };

    let mut session =
        Session::new(Arc::new(catalog), services).with_payment_timeout(config.payment_timeout());

    session
        .select_location(&args.location)
        .map_err(|error| error.to_string())?;

    let drink = args.customize.request();

    for (item_id, quantity) in &args.items {
        let is_food = session
            .catalog()
            .item(item_id)
            .is_some_and(|item| item.category().is_food());

        let request = if is_food {
            CustomizationRequest::default()
        } else {
            drink.clone()
        };

        session
            .add_to_cart(item_id, &request, *quantity)
            .map_err(|error| format!("cannot add {item_id}: {error}"))?;
    }

    let order = session
        .checkout(CheckoutRequest {
            tip: Tip::percent(args.tip),
            payment,
            pickup_name: args.name,
        })
        .await
        .map_err(|error| format!("checkout failed: {error}"))?;

    write_receipt(io::stdout().lock(), order).map_err(|error| error.to_string())?;

    if let Some(rewards) = session.rewards().await.map_err(|error| error.to_string())? {
        writeln!(
            io::stdout().lock(),
            "Star balance: {} ({} to next reward)",
            rewards.stars(),
            rewards.stars_to_next_reward()
        )
        .map_err(|error| error.to_string())?;
    }

    Ok(())
}

fn parse_category(s: &str) -> Result<Category, String> {
    let wanted = s.trim().to_lowercase().replace(['-', '_'], " ");

    Category::ALL
        .iter()
        .copied()
        .find(|category| category.to_string().to_lowercase() == wanted)
        .ok_or_else(|| format!("unknown category: {s}"))
}

fn parse_item(s: &str) -> Result<(String, u32), String> {
    match s.split_once(':') {
        Some((id, quantity)) => {
            let quantity = quantity
                .parse()
                .map_err(|error| format!("invalid quantity in {s}: {error}"))?;

            Ok((id.to_string(), quantity))
        }
        None => Ok((s.to_string(), 1)),
    }
}

fn parse_count(s: &str, count: Option<&str>, default: u8) -> Result<u8, String> {
    count.map_or(Ok(default), |count| {
        count
            .parse()
            .map_err(|error| format!("invalid count in {s}: {error}"))
    })
}

fn parse_syrup(s: &str) -> Result<SyrupSelection, String> {
    let (flavor, pumps) = split_pair(s);

    Ok(SyrupSelection {
        flavor: flavor.parse::<SyrupFlavor>().map_err(|error| error.to_string())?,
        pumps: parse_count(s, pumps, 1)?,
    })
}

fn parse_topping(s: &str) -> Result<ToppingSelection, String> {
    let (topping, amount) = split_pair(s);

    Ok(ToppingSelection {
        topping: topping.parse::<Topping>().map_err(|error| error.to_string())?,
        amount: amount
            .map_or(Ok(ToppingAmount::Regular), str::parse)
            .map_err(|error| error.to_string())?,
    })
}

fn parse_sweetener(s: &str) -> Result<SweetenerSelection, String> {
    let (sweetener, packets) = split_pair(s);

    Ok(SweetenerSelection {
        sweetener: sweetener
            .parse::<SweetenerType>()
            .map_err(|error| error.to_string())?,
        packets: parse_count(s, packets, 1)?,
    })
}

fn split_pair(s: &str) -> (&str, Option<&str>) {
    match s.split_once('=') {
        Some((key, value)) => (key, Some(value)),
        None => (s, None),
    }
}
