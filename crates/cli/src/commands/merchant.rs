//! Merchant account commands.

use std::io::{self, Write};

use itiza_core::ActivityFilter;
use itiza_merchant::forms::RegistrationForm;
use itiza_merchant::services::DashboardState;
use itiza_merchant::store::QueryState;

use super::{CommandError, Context};

/// Register `wallet` as a merchant.
///
/// # Errors
///
/// Returns an error if the wallet is already registered, a field is
/// invalid, or the snapshot cannot be saved.
pub async fn register(
    ctx: &Context,
    wallet: &str,
    business_name: String,
    business_address: String,
    email: String,
) -> Result<(), CommandError> {
    let since = ctx.store.version();
    let mut dashboard = ctx.connect(wallet).await?;

    let form = RegistrationForm {
        business_name,
        business_address,
        email,
    };
    let merchant = dashboard.session.register(&form).await?;
    ctx.save_if_changed(since).await?;

    writeln!(io::stdout().lock(), "{}", merchant.id)?;
    Ok(())
}

/// Print what the dashboard shows for `wallet`.
///
/// # Errors
///
/// Returns an error if the wallet is invalid or the store lookup fails.
pub async fn show(ctx: &Context, wallet: &str) -> Result<(), CommandError> {
    let mut dashboard = ctx.connect(wallet).await?;
    let state = dashboard.session.state().clone();

    match state {
        DashboardState::Registered { merchant } => {
            let mut listing = dashboard.session.products(ActivityFilter::All)?;
            let products = match listing.resolved().await {
                QueryState::Ready(products) => products,
                QueryState::Failed(err) => return Err(CommandError::Store(err)),
                QueryState::Loading => Vec::new(),
            };
            listing.unsubscribe();
            let active = products.iter().filter(|p| p.is_active).count();

            let mut out = io::stdout().lock();
            writeln!(out, "Merchant:  {}", merchant.business_name)?;
            writeln!(out, "ID:        {}", merchant.id)?;
            writeln!(out, "Wallet:    {}", merchant.wallet_address)?;
            writeln!(out, "Address:   {}", merchant.business_address)?;
            writeln!(out, "Email:     {}", merchant.email)?;
            writeln!(out, "Since:     {}", merchant.created_at.format("%Y-%m-%d"))?;
            writeln!(out, "Products:  {} ({active} active)", products.len())?;
        }
        DashboardState::Unregistered { wallet } => {
            let mut out = io::stdout().lock();
            writeln!(out, "Wallet {} is not registered.", wallet.short())?;
            writeln!(out, "Run `itiza merchant register` to create a merchant account.")?;
        }
        other => writeln!(io::stdout().lock(), "Dashboard is {}", other.name())?,
    }
    Ok(())
}
