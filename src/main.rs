use clap::Parser;
use epic_claimer::core::engine::unclaimed;
use epic_claimer::utils::{logger, validation::Validate};
use epic_claimer::{Account, AccountsFile, CatalogFetcher, CliConfig, Credentials, OrderHistoryFetcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting epic-claimer");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    // Discovery: list this week's giveaways.
    let catalog = CatalogFetcher::new(config.clone());
    let mut promotions = catalog.fetch_current_promotions().await?;
    if promotions.is_empty() {
        tracing::info!("No giveaways in the catalog this week");
        println!("No giveaways in the catalog this week.");
        return Ok(());
    }
    println!("This week's giveaways:");
    for promotion in &promotions {
        println!("  {} ({})", promotion.title, promotion.url);
    }

    // Status reporting per account: which giveaways remain unclaimed. The
    // interactive claim flow needs a Browser/ChallengeSolver pair wired in by
    // a library consumer; the CLI covers the HTTP half.
    for account in resolve_accounts(&config) {
        if account.cookies.is_empty() {
            tracing::warn!(
                account = %account.credentials.email,
                "no session cookies on file, skipping ownership check"
            );
            continue;
        }

        let history = OrderHistoryFetcher::new(config.clone());
        match history.fetch_claimed(&account.cookies, None, None).await {
            Ok(claimed) => {
                let worklist = unclaimed(&mut promotions, &claimed);
                if worklist.is_empty() {
                    println!(
                        "{}: all current giveaways already claimed ✅",
                        account.credentials.email
                    );
                } else {
                    println!("{}: unclaimed giveaways:", account.credentials.email);
                    for promotion in &worklist {
                        println!("  {}", promotion.title);
                    }
                }
            }
            Err(e) => {
                tracing::error!(account = %account.credentials.email, "order history check failed: {}", e);
                eprintln!("❌ {}: {}", account.credentials.email, e);
            }
        }
    }

    Ok(())
}

fn resolve_accounts(config: &CliConfig) -> Vec<Account> {
    if let Some(path) = &config.accounts {
        match AccountsFile::from_file(path) {
            Ok(file) => return file.into_accounts(),
            Err(e) => {
                tracing::error!("Failed to load accounts file: {}", e);
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        }
    }

    match (&config.email, &config.password) {
        (Some(email), Some(password)) => vec![Account {
            credentials: Credentials {
                email: email.clone(),
                password: password.clone(),
            },
            cookies: Default::default(),
        }],
        _ => {
            tracing::warn!("no accounts configured, discovery only");
            Vec::new()
        }
    }
}
