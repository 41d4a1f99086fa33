//! Test Data Commands

use anyhow::Result;
use tracing::debug;
use clap::{Args, Subcommand, ValueEnum};
use fixturekit_testdata::entities::{API_DATA, ORDERS, PRODUCTS, USERS};
use fixturekit_testdata::{
    ApiData, ApiDataOptions, Order, OrderOptions, Product, ProductOptions, TestDataManager, User,
    UserOptions,
};

use super::Context;
use crate::output::{
    print_info, print_list, print_success, print_value, print_warning, OutputFormat, TableDisplay,
};

const ID_DISPLAY_LENGTH: usize = 8;

#[derive(Subcommand)]
pub enum DataCommands {
    /// Generate synthetic entities
    Generate(GenerateArgs),

    /// Load a saved fixture, decrypting its sensitive fields
    Load {
        /// Fixture category (directory)
        category: String,

        /// Fixture name without extension
        name: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EntityKind {
    User,
    Product,
    Order,
    Api,
}

impl EntityKind {
    fn label(self) -> &'static str {
        match self {
            EntityKind::User => USERS,
            EntityKind::Product => PRODUCTS,
            EntityKind::Order => ORDERS,
            EntityKind::Api => API_DATA,
        }
    }
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Entity type
    pub kind: EntityKind,

    /// Number of entities
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub count: u32,

    /// Persist the generated entities under <data_dir>/<type>/<NAME>.json
    #[arg(long)]
    pub save: Option<String>,

    /// User role
    #[arg(long, default_value = "user")]
    pub role: String,

    /// User email domain
    #[arg(long, default_value = "example.test")]
    pub domain: String,

    /// Store user passwords unencrypted
    #[arg(long)]
    pub plain_password: bool,

    /// Product category
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long, default_value_t = 1.0)]
    pub min_price: f64,

    #[arg(long, default_value_t = 500.0)]
    pub max_price: f64,

    /// Line items per order
    #[arg(long, default_value_t = 2)]
    pub items: usize,

    /// Endpoint for API fixtures
    #[arg(long, default_value = "/api/users")]
    pub endpoint: String,

    /// HTTP method for API fixtures
    #[arg(long, default_value = "POST")]
    pub method: String,

    /// Add a bearer secure token to API fixtures
    #[arg(long)]
    pub authenticated: bool,
}

fn short_id(id: &impl std::fmt::Display) -> String {
    id.to_string().chars().take(ID_DISPLAY_LENGTH).collect()
}

impl TableDisplay for User {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Email", "Username", "Role", "Password"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            short_id(&self.id),
            format!("{} {}", self.first_name, self.last_name),
            self.email.clone(),
            self.username.clone(),
            self.role.clone(),
            self.plain_password.clone(),
        ]
    }
}

impl TableDisplay for Product {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Category", "SKU", "Price", "Stock"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            short_id(&self.id),
            self.name.clone(),
            self.category.clone(),
            self.sku.clone(),
            format!("{:.2}", self.price),
            self.stock.to_string(),
        ]
    }
}

impl TableDisplay for Order {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "User", "Items", "Subtotal", "Tax", "Total"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            short_id(&self.id),
            short_id(&self.user_id),
            self.items.len().to_string(),
            format!("{:.2}", self.subtotal),
            format!("{:.2}", self.tax),
            format!("{:.2}", self.total),
        ]
    }
}

impl TableDisplay for ApiData {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Method", "Endpoint", "Authenticated", "Body"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            short_id(&self.id),
            self.method.clone(),
            self.endpoint.clone(),
            self.headers.contains_key("Authorization").to_string(),
            self.body.to_string(),
        ]
    }
}

pub async fn execute(cmd: DataCommands, ctx: &Context) -> Result<()> {
    let mut manager = TestDataManager::new(ctx.cipher()?, &ctx.config.data);
    debug!(data_dir = %ctx.config.data.data_dir.display(), "Test data manager ready");
    let human = matches!(ctx.format, OutputFormat::Table | OutputFormat::Plain);

    match cmd {
        DataCommands::Generate(args) => {
            generate(&mut manager, &args, ctx.format)?;

            if human {
                let stats = manager.get_data_statistics();
                print_info(&format!("Generated {} entities", stats.total_generated));
                if args.plain_password && matches!(args.kind, EntityKind::User) {
                    print_warning("User passwords are stored unencrypted");
                }
            }

            if let Some(name) = &args.save {
                let path = manager.save_generated(args.kind.label(), name).await?;
                if human {
                    print_success(&format!(
                        "Saved to {}",
                        ctx.config.data.data_dir.join(path).display()
                    ));
                }
            }
        }

        DataCommands::Load { category, name } => {
            let value = manager.load_test_data(&category, &name).await?;
            print_value(&value, ctx.format);
        }
    }

    Ok(())
}

fn generate(
    manager: &mut TestDataManager,
    args: &GenerateArgs,
    format: OutputFormat,
) -> Result<()> {
    let count = args.count as usize;
    match args.kind {
        EntityKind::User => {
            let opts = UserOptions {
                role: args.role.clone(),
                domain: args.domain.clone(),
                encrypt_password: args.plain_password.then_some(false),
                ..UserOptions::default()
            };
            print_list(&manager.generate_users(count, &opts)?, format);
        }
        EntityKind::Product => {
            print_list(&manager.generate_products(count, &product_options(args))?, format);
        }
        EntityKind::Order => {
            let opts = OrderOptions {
                item_count: args.items,
                product: product_options(args),
                ..OrderOptions::default()
            };
            let orders = (0..count)
                .map(|_| manager.generate_order(&opts))
                .collect::<Result<Vec<Order>, _>>()?;
            print_list(&orders, format);
        }
        EntityKind::Api => {
            let opts = ApiDataOptions {
                method: args.method.clone(),
                authenticated: args.authenticated,
                ..ApiDataOptions::default()
            };
            let fixtures = (0..count)
                .map(|_| manager.generate_api_data(&args.endpoint, &opts))
                .collect::<Result<Vec<_>, _>>()?;
            print_list(&fixtures, format);
        }
    }
    Ok(())
}

fn product_options(args: &GenerateArgs) -> ProductOptions {
    ProductOptions {
        category: args.category.clone(),
        min_price: args.min_price,
        max_price: args.max_price,
        ..ProductOptions::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_labels_match_registry() {
        assert_eq!(EntityKind::User.label(), "users");
        assert_eq!(EntityKind::Api.label(), "apiData");
    }

    #[test]
    fn test_zero_count_is_rejected() {
        use clap::Parser;

        #[derive(Parser)]
        struct Harness {
            #[command(subcommand)]
            cmd: DataCommands,
        }

        assert!(Harness::try_parse_from(["data", "generate", "user", "--count", "0"]).is_err());
        let parsed = Harness::try_parse_from(["data", "generate", "order", "-c", "4"]).unwrap();
        assert!(matches!(
            parsed.cmd,
            DataCommands::Generate(GenerateArgs { count: 4, .. })
        ));
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id(&"0123456789abcdef"), "01234567");
        assert_eq!(short_id(&"abc"), "abc");
    }
}
