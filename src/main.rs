use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

use nivesh::account::BankAccount;
use nivesh::auth::RegistrationProfile;
use nivesh::clock;
use nivesh::core::{Config, Exchange, FundId, Symbol};
use nivesh::feeds::{MarketDataSource, SimulatedFeed};
use nivesh::otp::OtpGate;
use nivesh::router::OrderRouter;
use nivesh::store::LedgerStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logger
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    tracing::info!("🏛️  Nivesh starting (simulated brokerage session)...");

    // 2. Configuration (config.toml if present, defaults otherwise)
    let config_path = PathBuf::from("config.toml");
    let config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        Config::default()
    };

    // 3. Market session clock
    let status = clock::current_status();
    tracing::info!("🕒 Market {} - {} (next: {})", status.phase, status.reason, status.next_open);

    // 4. Registration with OTP verification
    let store = LedgerStore::new();
    let mut otp_gate = OtpGate::new(config.otp.validity_secs);

    let profile = RegistrationProfile::new(
        "Ravi Kumar",
        "ravi.kumar@example.com",
        "9876543210",
        "secret123",
        "ABCDE1234F",
    )?;
    let email = profile.email.clone();
    let code = otp_gate.issue(profile).to_string();
    // Demo mode: the code is logged instead of sent via SMS/email
    tracing::info!("📱 OTP for {}: {}", email, code);

    otp_gate.verify(&code)?;
    let session = otp_gate
        .consume()
        .ok_or_else(|| anyhow::anyhow!("OTP session vanished before finalization"))?;
    store.finalize_registration(session)?;
    store.login(&email, "secret123")?;
    tracing::info!("✅ {} registered and logged in", email);

    // 5. Link a payout bank account
    let bank = BankAccount::new("Ravi Kumar", "123456789012", "HDFC0001234", "HDFC Bank")?;
    store
        .with_account_mut(&email, |account| account.link_bank_account(bank))
        .ok_or_else(|| anyhow::anyhow!("account missing"))?;

    // 6. Trade against the simulated feed
    let feed = SimulatedFeed::new(config.feed.jitter);
    let mut router = OrderRouter::new(&config);

    let reliance = Symbol::new("RELIANCE");
    let fund = FundId::new("SBI Bluechip Fund");

    let quote = feed
        .quote(&reliance, Exchange::Nse)
        .await?
        .ok_or_else(|| anyhow::anyhow!("no quote for {}", reliance))?;
    let nav = feed
        .nav(&fund)
        .await?
        .ok_or_else(|| anyhow::anyhow!("no NAV for {}", fund))?;

    store
        .with_account_mut(&email, |account| -> anyhow::Result<()> {
            let ledger = &mut account.ledger;
            router.deposit(ledger, Decimal::from(100_000), "Razorpay", Some("pay_demo_1"))?;
            router.buy(ledger, &reliance, Exchange::Nse, "Reliance Industries Ltd", Decimal::from(10), quote)?;
            router.buy(ledger, &reliance, Exchange::Nse, "Reliance Industries Ltd", Decimal::from(5), quote)?;
            router.sell(ledger, &reliance, Exchange::Nse, Decimal::from(5), quote)?;
            router.invest(ledger, &fund, Decimal::from(10_000), nav)?;
            Ok(())
        })
        .ok_or_else(|| anyhow::anyhow!("account missing"))??;

    // 7. Mark holdings to market from a fresh feed snapshot
    let snapshot = feed.snapshot().await;
    store
        .with_account_mut(&email, |account| account.ledger.mark_to_market(&snapshot))
        .ok_or_else(|| anyhow::anyhow!("account missing"))?;

    // 8. Withdraw with the fee schedule applied
    let receipt = store
        .with_account_mut(&email, |account| {
            let destination = account
                .primary_bank_account()
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no linked bank account"))?;
            let receipt = router.withdraw(&mut account.ledger, Decimal::from(2_000), &destination)?;
            anyhow::Ok(receipt)
        })
        .ok_or_else(|| anyhow::anyhow!("account missing"))??;
    tracing::info!(
        "🏦 Withdrawal: gross ₹{}, fee ₹{}, you receive ₹{}",
        receipt.transaction.amount,
        receipt.fee,
        receipt.net
    );

    // 9. Session summary
    store
        .with_account(&email, |account| {
            let ledger = &account.ledger;
            tracing::info!("💰 Balance: ₹{}", ledger.balance());
            tracing::info!(
                "💼 Portfolio: ₹{} across {} positions, funds ₹{} across {} holdings",
                ledger.portfolio_value(),
                ledger.positions().len(),
                ledger.funds_value(),
                ledger.fund_holdings().len()
            );
            tracing::info!("📈 Unrealized P&L: ₹{}", ledger.unrealized_pnl());
            tracing::info!(
                "📋 {} orders, {} transactions recorded",
                ledger.orders().len(),
                ledger.transactions().len()
            );
        })
        .ok_or_else(|| anyhow::anyhow!("account missing"))?;

    Ok(())
}
