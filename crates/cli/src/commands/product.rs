//! Product catalog commands.

use std::io::{self, Write};

use clap::Args;

use itiza_core::{ActivityFilter, ProductId};
use itiza_merchant::forms::{MetadataForm, ProductForm, ProductPatchForm};
use itiza_merchant::models::Product;
use itiza_merchant::services::{AssumeYes, Confirm};
use itiza_merchant::store::QueryState;

use super::{CommandError, Context, StdinConfirm};

/// Physical details shared by `add` and `update`.
#[derive(Debug, Args)]
pub struct MetadataArgs {
    /// Shipping weight
    #[arg(long)]
    weight: Option<String>,

    /// Dimensions, e.g. "20 x 10 x 5 cm"
    #[arg(long)]
    dimensions: Option<String>,

    /// Primary material
    #[arg(long)]
    material: Option<String>,
}

impl MetadataArgs {
    fn is_empty(&self) -> bool {
        self.weight.is_none() && self.dimensions.is_none() && self.material.is_none()
    }

    fn into_form(self) -> MetadataForm {
        MetadataForm {
            weight: self.weight,
            dimensions: self.dimensions,
            material: self.material,
        }
    }
}

/// Fields of a new product.
#[derive(Debug, Args)]
pub struct ProductArgs {
    /// Product name
    #[arg(long)]
    name: String,

    /// Product description
    #[arg(long)]
    description: String,

    /// Price, e.g. 19.99
    #[arg(long)]
    price: String,

    /// Storefront category
    #[arg(long)]
    category: String,

    /// Units in stock
    #[arg(long)]
    stock: String,

    /// Product image URL
    #[arg(long)]
    image_url: String,

    /// Comma-separated tags
    #[arg(long, default_value = "")]
    tags: String,

    #[command(flatten)]
    metadata: MetadataArgs,
}

impl From<ProductArgs> for ProductForm {
    fn from(args: ProductArgs) -> Self {
        Self {
            name: args.name,
            description: args.description,
            price: args.price,
            category: args.category,
            stock_quantity: args.stock,
            image_url: args.image_url,
            tags: args.tags,
            metadata: args.metadata.into_form(),
        }
    }
}

/// Fields to change on an existing product.
#[derive(Debug, Args)]
pub struct ProductPatchArgs {
    /// New name
    #[arg(long)]
    name: Option<String>,

    /// New description
    #[arg(long)]
    description: Option<String>,

    /// New price
    #[arg(long)]
    price: Option<String>,

    /// New category
    #[arg(long)]
    category: Option<String>,

    /// New stock level
    #[arg(long)]
    stock: Option<String>,

    /// New image URL
    #[arg(long)]
    image_url: Option<String>,

    /// Replacement comma-separated tags
    #[arg(long)]
    tags: Option<String>,

    /// Mark the product active or inactive
    #[arg(long)]
    active: Option<bool>,

    #[command(flatten)]
    metadata: MetadataArgs,
}

impl From<ProductPatchArgs> for ProductPatchForm {
    fn from(args: ProductPatchArgs) -> Self {
        let metadata = (!args.metadata.is_empty()).then(|| args.metadata.into_form());
        Self {
            name: args.name,
            description: args.description,
            price: args.price,
            category: args.category,
            stock_quantity: args.stock,
            image_url: args.image_url,
            tags: args.tags,
            metadata,
            is_active: args.active,
        }
    }
}

fn parse_product_id(id: &str) -> Result<ProductId, CommandError> {
    id.parse()
        .map_err(|_| CommandError::Invalid(format!("Invalid product ID: {id}")))
}

fn print_product(out: &mut impl Write, product: &Product) -> io::Result<()> {
    let status = if product.is_active { "active" } else { "deleted" };
    writeln!(
        out,
        "{}  {:<24}  {:>10}  {:>5}  {:<8}  {}",
        product.id,
        product.name,
        product.price,
        product.stock_quantity,
        status,
        product.tags.to_input()
    )
}

/// Create a product for the wallet's merchant.
///
/// # Errors
///
/// Returns an error if the wallet has no merchant, a field is invalid, or
/// the snapshot cannot be saved.
pub async fn add(ctx: &Context, wallet: &str, args: ProductArgs) -> Result<(), CommandError> {
    let since = ctx.store.version();
    let mut dashboard = ctx.connect(wallet).await?;

    let product = dashboard
        .session
        .create_product(&ProductForm::from(args))
        .await?;
    ctx.save_if_changed(since).await?;

    writeln!(io::stdout().lock(), "{}", product.id)?;
    Ok(())
}

/// List the wallet's products.
///
/// # Errors
///
/// Returns an error if the wallet has no merchant or the store fails.
pub async fn list(ctx: &Context, wallet: &str, filter: ActivityFilter) -> Result<(), CommandError> {
    let mut dashboard = ctx.connect(wallet).await?;
    let mut listing = dashboard.session.products(filter)?;

    let products = match listing.resolved().await {
        QueryState::Ready(products) => products,
        QueryState::Failed(err) => return Err(CommandError::Store(err)),
        QueryState::Loading => Vec::new(),
    };
    listing.unsubscribe();

    let mut out = io::stdout().lock();
    if products.is_empty() {
        writeln!(out, "No products.")?;
    }
    for product in &products {
        print_product(&mut out, product)?;
    }
    Ok(())
}

/// Change fields of one of the wallet's products.
///
/// # Errors
///
/// Returns an error if the product is not the wallet's, nothing would
/// change, or a field is invalid.
pub async fn update(
    ctx: &Context,
    wallet: &str,
    id: &str,
    args: ProductPatchArgs,
) -> Result<(), CommandError> {
    let id = parse_product_id(id)?;
    let patch = ProductPatchForm::from(args).validate()?;

    let since = ctx.store.version();
    let mut dashboard = ctx.connect(wallet).await?;
    let product = dashboard.session.update_product(id, patch).await?;
    ctx.save_if_changed(since).await?;

    print_product(&mut io::stdout().lock(), &product)?;
    Ok(())
}

/// Soft-delete one of the wallet's products.
///
/// # Errors
///
/// Returns an error if the user declines, the product is not the wallet's,
/// or the snapshot cannot be saved.
pub async fn deactivate(
    ctx: &Context,
    wallet: &str,
    id: &str,
    assume_yes: bool,
) -> Result<(), CommandError> {
    let id = parse_product_id(id)?;
    let confirm: &dyn Confirm = if assume_yes { &AssumeYes } else { &StdinConfirm };

    let since = ctx.store.version();
    let mut dashboard = ctx.connect(wallet).await?;
    let product = dashboard.session.delete_product(id, confirm).await?;
    ctx.save_if_changed(since).await?;

    print_product(&mut io::stdout().lock(), &product)?;
    Ok(())
}
