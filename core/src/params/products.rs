//! Product parameters and the enumerations they use.

use crate::payload::{Entry, Payload};

wire_enum! {
    /// Billing model of a product.
    ProductType, "product type" {
        Lifetime => "lifetime",
        Recurring => "recurring",
        Free => "free",
        Rental => "rental",
    }
}

wire_enum! {
    RecurringInterval, "recurring interval" {
        Day => "day",
        Week => "week",
        Month => "month",
        Year => "year",
    }
}

wire_enum! {
    /// What happens to a Discord member when their license ends.
    DiscordCancelAction, "discord cancel action" {
        Kick => "kick",
        RemovePlanRoles => "remove_plan_roles",
        RemoveAllRoles => "remove_all_roles",
        Nothing => "none",
    }
}

wire_enum! {
    /// What happens to a Telegram member when their license ends.
    TelegramCancelAction, "telegram cancel action" {
        Kick => "kick",
        Nothing => "none",
    }
}

/// A link shown on the product page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductLink {
    pub title: String,
    pub href: String,
}

impl From<&ProductLink> for Entry {
    fn from(link: &ProductLink) -> Self {
        Entry::Map(
            Payload::new()
                .with("title", link.title.as_str())
                .with("href", link.href.as_str()),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductRecurring {
    pub interval: RecurringInterval,
    pub interval_count: u32,
}

impl From<&ProductRecurring> for Entry {
    fn from(recurring: &ProductRecurring) -> Self {
        Entry::Map(
            Payload::new()
                .with("interval", recurring.interval)
                .with("interval_count", recurring.interval_count),
        )
    }
}

/// License transfer policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductTransfers {
    pub enabled: bool,
    pub cooldown_days: u32,
}

impl From<&ProductTransfers> for Entry {
    fn from(transfers: &ProductTransfers) -> Self {
        Entry::Map(
            Payload::new()
                .with("enabled", transfers.enabled)
                .with("cooldown_days", transfers.cooldown_days),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationDiscord {
    pub guild: String,
    pub roles: Vec<String>,
    pub cancel_action: DiscordCancelAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationTelegram {
    pub chat: String,
    pub cancel_action: TelegramCancelAction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductIntegrations {
    pub discord: Option<IntegrationDiscord>,
    pub telegram: Option<IntegrationTelegram>,
}

impl From<&ProductIntegrations> for Entry {
    fn from(integrations: &ProductIntegrations) -> Self {
        let discord = integrations.discord.as_ref().map(|d| {
            Payload::new()
                .with("guild", d.guild.as_str())
                .with("roles", d.roles.clone())
                .with("cancel_action", d.cancel_action)
        });
        let telegram = integrations.telegram.as_ref().map(|t| {
            Payload::new()
                .with("chat", t.chat.as_str())
                .with("cancel_action", t.cancel_action)
        });
        Entry::Map(
            Payload::new()
                .with("discord", discord)
                .with("telegram", telegram),
        )
    }
}

/// Fields shared by create and update.
fn optional_fields(
    payload: Payload,
    image: &Option<String>,
    description: &Option<String>,
    rental_period_days: Option<u32>,
    links: &Option<Vec<ProductLink>>,
    transfers: &Option<ProductTransfers>,
    integrations: &Option<ProductIntegrations>,
) -> Payload {
    payload
        .with("image", image.clone())
        .with("description", description.clone())
        .with("rental_period_days", rental_period_days)
        .with(
            "links",
            links
                .as_ref()
                .map(|links| links.iter().map(Entry::from).collect::<Vec<_>>()),
        )
        .with("transfers", transfers.as_ref().map(Entry::from))
        .with("integrations", integrations.as_ref().map(Entry::from))
}

/// `POST /products`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProductParams {
    pub name: String,
    pub product_type: ProductType,
    pub amount: f64,
    /// ISO currency code, e.g. `usd`.
    pub currency: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub rental_period_days: Option<u32>,
    pub links: Option<Vec<ProductLink>>,
    pub recurring: Option<ProductRecurring>,
    pub transfers: Option<ProductTransfers>,
    pub integrations: Option<ProductIntegrations>,
}

impl CreateProductParams {
    pub fn new(
        name: impl Into<String>,
        product_type: ProductType,
        amount: f64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            product_type,
            amount,
            currency: currency.into(),
            image: None,
            description: None,
            rental_period_days: None,
            links: None,
            recurring: None,
            transfers: None,
            integrations: None,
        }
    }

    pub fn build_payload(&self) -> Payload {
        let payload = Payload::new()
            .with("name", self.name.as_str())
            .with("type", self.product_type)
            .with("amount", self.amount)
            .with("currency", self.currency.as_str())
            .with("recurring", self.recurring.as_ref().map(Entry::from));
        optional_fields(
            payload,
            &self.image,
            &self.description,
            self.rental_period_days,
            &self.links,
            &self.transfers,
            &self.integrations,
        )
        .normalize()
    }
}

/// `PATCH /products/{id}`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateProductParams {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub rental_period_days: Option<u32>,
    pub links: Option<Vec<ProductLink>>,
    pub transfers: Option<ProductTransfers>,
    pub integrations: Option<ProductIntegrations>,
}

impl UpdateProductParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build_payload(&self) -> Payload {
        let payload = Payload::new().with("name", self.name.clone());
        optional_fields(
            payload,
            &self.image,
            &self.description,
            self.rental_period_days,
            &self.links,
            &self.transfers,
            &self.integrations,
        )
        .normalize()
    }
}
